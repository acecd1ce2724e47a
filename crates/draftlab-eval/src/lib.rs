//! Test-set metrics and the promotion gate (spec.md §4.5 step 6, §4.6).
mod gate;
mod metrics;

pub use gate::*;
pub use metrics::*;
