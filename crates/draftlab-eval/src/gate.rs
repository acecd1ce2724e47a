use crate::Metrics;
use draftlab_core::Config;
use serde::Deserialize;
use serde::Serialize;

/// Outcome of comparing a candidate artifact's metrics against the
/// registry's current pointer for the same tier group (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateVerdict {
    pub accepted: bool,
    pub log_loss_relative_improvement: f32,
    pub brier_relative_improvement: f32,
    pub ece_regression: f32,
}

/// A relative improvement of the metric that gets smaller (log-loss,
/// Brier) as `(old - new) / old`; positive means the candidate is better.
fn relative_improvement(old: f32, new: f32) -> f32 {
    if old <= 0.0 { 0.0 } else { (old - new) / old }
}

/// Applies the promotion policy (spec.md §4.6): accept when calibrated
/// log-loss or calibrated Brier improves by at least its configured
/// relative threshold AND ECE does not regress past its absolute
/// tolerance. With no incumbent (`current` is `None`), the candidate is
/// accepted unconditionally — there is nothing to compare against.
pub fn evaluate_gate(candidate: &Metrics, current: Option<&Metrics>, config: &Config) -> GateVerdict {
    let Some(current) = current else {
        return GateVerdict {
            accepted: true,
            log_loss_relative_improvement: 1.0,
            brier_relative_improvement: 1.0,
            ece_regression: 0.0,
        };
    };

    let log_loss_relative_improvement = relative_improvement(current.log_loss, candidate.log_loss);
    let brier_relative_improvement = relative_improvement(current.brier, candidate.brier);
    let ece_regression = (candidate.ece - current.ece).max(0.0);

    let improved = log_loss_relative_improvement >= config.gate_log_loss_improvement
        || brier_relative_improvement >= config.gate_brier_improvement;
    let accepted = improved && ece_regression <= config.gate_ece_tolerance;

    GateVerdict { accepted, log_loss_relative_improvement, brier_relative_improvement, ece_regression }
}
