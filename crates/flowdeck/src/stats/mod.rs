//! Statistics computed on demand from the current store contents.
//!
//! Nothing here is cached: callers get a fresh snapshot on every call.

mod ai;
mod cycle;
mod project;

pub use ai::AiStats;
pub use cycle::CycleStats;
pub use project::ProjectStats;

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
