use serde::{Deserialize, Serialize};
use std::f64::consts::E;
use std::fmt;

use crate::error::{RiemannError, RiemannResult};

/// The closed set of integrands, keyed by task id.
///
/// `ExpDouble` (10) and `ExpDoubleAlt` (26) evaluate the same function. Both
/// ids are part of the table and must stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Exp,
    ExpDouble,
    Cube,
    ExpDoubleAlt,
    PowThree,
}

impl Formula {
    pub const ALL: [Formula; 5] = [
        Self::Exp,
        Self::ExpDouble,
        Self::Cube,
        Self::ExpDoubleAlt,
        Self::PowThree,
    ];

    pub fn from_id(id: i64) -> RiemannResult<Self> {
        match id {
            2 => Ok(Self::Exp),
            10 => Ok(Self::ExpDouble),
            22 => Ok(Self::Cube),
            26 => Ok(Self::ExpDoubleAlt),
            31 => Ok(Self::PowThree),
            other => Err(RiemannError::UnsupportedFormula(other)),
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Self::Exp => 2,
            Self::ExpDouble => 10,
            Self::Cube => 22,
            Self::ExpDoubleAlt => 26,
            Self::PowThree => 31,
        }
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Exp => E.powf(x),
            Self::ExpDouble | Self::ExpDoubleAlt => E.powf(2.0 * x),
            Self::Cube => x.powf(3.0),
            Self::PowThree => 3.0_f64.powf(x),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Exp => "y = e^x",
            Self::ExpDouble | Self::ExpDoubleAlt => "y = e^{2x}",
            Self::Cube => "y = x^3",
            Self::PowThree => "y = 3^x",
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Evaluate the formula registered under `formula_id` at `x`.
pub fn evaluate(formula_id: i64, x: f64) -> RiemannResult<f64> {
    Formula::from_id(formula_id).map(|formula| formula.apply(x))
}

/// Human-readable title for `formula_id`.
pub fn display_label(formula_id: i64) -> RiemannResult<&'static str> {
    Formula::from_id(formula_id).map(Formula::label)
}
