//! Riemann-sum quadrature over a [`Settings`] value.
//!
//! Every rule shares one summation loop over the `n + 1` sample points. The
//! rule only decides which boundary contribution is subtracted afterwards:
//!
//! | Rule     | Subtracted                              |
//! |----------|-----------------------------------------|
//! | Left     | `y(start) * w`                          |
//! | Right    | `y(end) * w`                            |
//! | Middle   | `(y(start) + y(end)) / 2 * w`           |
//! | Random   | `y(start) * o + y(end) * (w - o)`       |
//!
//! where `o` is the offset returned by [`compute_rule_offset`].

use rand::Rng;
use tracing::debug;

use crate::error::RiemannResult;
use crate::formula::Formula;
use crate::settings::{Sample, SamplingRule, Settings};

/// Width of one subinterval, `(end - start) / sample_count`.
///
/// A zero `sample_count` yields an infinite or NaN width; nothing here panics
/// on it.
pub fn subinterval_width(settings: &Settings) -> f64 {
    (settings.end - settings.start) / settings.sample_count as f64
}

/// Evaluate the formula at `sample_count + 1` evenly spaced abscissas from
/// `start` to `end` inclusive.
pub fn compute_samples(settings: &Settings) -> RiemannResult<Vec<Sample>> {
    let formula = Formula::from_id(settings.formula_id)?;
    let width = subinterval_width(settings);

    Ok((0..=settings.sample_count)
        .map(|i| {
            let x = settings.start + i as f64 * width;
            Sample {
                x,
                y: formula.apply(x),
            }
        })
        .collect())
}

/// Offset inside a subinterval for the configured rule. Random draws a fresh
/// value from the thread-local generator on every call.
pub fn compute_rule_offset(settings: &Settings) -> f64 {
    compute_rule_offset_with(settings, &mut rand::thread_rng())
}

/// Same as [`compute_rule_offset`] but drawing from `rng`.
pub fn compute_rule_offset_with<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> f64 {
    let width = subinterval_width(settings);
    match settings.rule {
        SamplingRule::Left => 0.0,
        SamplingRule::Right => width,
        SamplingRule::Middle => width / 2.0,
        // u in [0, 1) scaled, so degenerate widths never hit an empty range
        SamplingRule::Random => rng.gen::<f64>() * width,
    }
}

/// Corrected Riemann sum for `settings`.
pub fn compute_integral_estimate(settings: &Settings) -> RiemannResult<f64> {
    compute_integral_estimate_with(settings, &mut rand::thread_rng())
}

/// Same as [`compute_integral_estimate`] but drawing the Random offset from
/// `rng`. Exactly one offset is drawn per call.
pub fn compute_integral_estimate_with<R: Rng + ?Sized>(
    settings: &Settings,
    rng: &mut R,
) -> RiemannResult<f64> {
    let formula = Formula::from_id(settings.formula_id)?;
    let width = subinterval_width(settings);
    let offset = compute_rule_offset_with(settings, rng);

    let mut sum = 0.0;
    for sample in compute_samples(settings)? {
        sum += width * sample.y;
    }

    let first = formula.apply(settings.start);
    let last = formula.apply(settings.end);
    let correction = match settings.rule {
        SamplingRule::Left => first * width,
        SamplingRule::Right => last * width,
        SamplingRule::Middle => ((first + last) / 2.0) * width,
        SamplingRule::Random => first * offset + last * (width - offset),
    };

    let estimate = sum - correction;
    debug!(
        formula = settings.formula_id,
        samples = settings.sample_count,
        rule = %settings.rule,
        estimate,
        "computed integral estimate"
    );
    Ok(estimate)
}
