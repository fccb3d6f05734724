use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RiemannError;

// ---------------------------------------------------------------------------
// SamplingRule
// ---------------------------------------------------------------------------

/// Where inside each subinterval the rectangle height is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingRule {
    Left,
    Right,
    Middle,
    Random,
}

impl SamplingRule {
    pub const ALL: [SamplingRule; 4] = [Self::Left, Self::Right, Self::Middle, Self::Random];

    /// Next rule in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Middle,
            Self::Middle => Self::Random,
            Self::Random => Self::Left,
        }
    }
}

impl fmt::Display for SamplingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Middle => write!(f, "middle"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for SamplingRule {
    type Err = RiemannError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "1" => Ok(Self::Left),
            "right" | "2" => Ok(Self::Right),
            "middle" | "mid" | "midpoint" | "3" => Ok(Self::Middle),
            "random" | "4" => Ok(Self::Random),
            _ => Err(RiemannError::UnsupportedRule(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// One immutable quadrature configuration.
///
/// Edits never mutate a `Settings` in place: the `with_*` helpers return a
/// fresh value and the caller swaps it in wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub formula_id: i64,
    pub start: f64,
    pub end: f64,
    pub sample_count: usize,
    pub rule: SamplingRule,
}

impl Settings {
    pub fn new(
        formula_id: i64,
        start: f64,
        end: f64,
        sample_count: usize,
        rule: SamplingRule,
    ) -> Self {
        Self {
            formula_id,
            start,
            end,
            sample_count,
            rule,
        }
    }

    pub fn with_formula_id(self, formula_id: i64) -> Self {
        Self { formula_id, ..self }
    }

    pub fn with_start(self, start: f64) -> Self {
        Self { start, ..self }
    }

    pub fn with_end(self, end: f64) -> Self {
        Self { end, ..self }
    }

    pub fn with_sample_count(self, sample_count: usize) -> Self {
        Self {
            sample_count,
            ..self
        }
    }

    pub fn with_rule(self, rule: SamplingRule) -> Self {
        Self { rule, ..self }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(2, 0.0, 1.0, 10, SamplingRule::Middle)
    }
}

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}
