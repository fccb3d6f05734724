pub mod error;
pub mod formula;
pub mod geometry;
pub mod quadrature;
pub mod settings;

pub use error::{RiemannError, RiemannResult};
pub use formula::{display_label, evaluate, Formula};
pub use geometry::{bars, bars_with, bounds, curve, Bar, Bounds};
pub use quadrature::{
    compute_integral_estimate, compute_integral_estimate_with, compute_rule_offset,
    compute_rule_offset_with, compute_samples, subinterval_width,
};
pub use settings::{Sample, SamplingRule, Settings};
