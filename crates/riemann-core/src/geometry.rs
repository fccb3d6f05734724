//! Plot geometry derived from the quadrature engine: rectangles, the
//! reference curve and axis bounds.

use rand::Rng;

use crate::error::RiemannResult;
use crate::quadrature::{compute_rule_offset_with, compute_samples, subinterval_width};
use crate::settings::{Sample, SamplingRule, Settings};

/// One approximating rectangle, anchored on the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Left edge.
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// One rectangle per sample point, shifted left by the rule offset.
pub fn bars(settings: &Settings) -> RiemannResult<Vec<Bar>> {
    bars_with(settings, &mut rand::thread_rng())
}

pub fn bars_with<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> RiemannResult<Vec<Bar>> {
    let samples = compute_samples(settings)?;
    let width = subinterval_width(settings);
    let offset = compute_rule_offset_with(settings, rng);

    Ok(samples
        .iter()
        .map(|sample| Bar {
            x: sample.x - offset,
            width,
            height: sample.y,
        })
        .collect())
}

/// Densely sampled curve over the same interval and formula, independent of
/// the configured sample count and rule.
pub fn curve(
    settings: &Settings,
    resolution: usize,
    rule: SamplingRule,
) -> RiemannResult<Vec<Sample>> {
    let dense = settings.with_sample_count(resolution).with_rule(rule);
    compute_samples(&dense)
}

/// Axis bounds: the integration interval horizontally, the sampled values
/// padded by one unit vertically.
pub fn bounds(settings: &Settings, samples: &[Sample]) -> Bounds {
    let (lo, hi) = samples
        .iter()
        .filter(|s| s.y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.y), hi.max(s.y))
        });
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (0.0, 0.0) };

    Bounds {
        x: [settings.start, settings.end],
        y: [lo - 1.0, hi + 1.0],
    }
}
