use crate::Correlation;
use crate::ID;

/// Stable kind tag for every caller-visible failure (spec.md §7).
///
/// The HTTP surface (an external collaborator, out of scope here) maps
/// these to status codes; this crate only guarantees the kind tag and a
/// correlation id for log joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMlErrorKind {
    InvalidRequest,
    NoModelAvailable,
    ArtifactLoadFailed,
    FeatureVersionMismatch,
    DeadlineExceeded,
    Internal,
}

#[derive(Debug, Clone)]
pub struct DraftMlError {
    kind: DraftMlErrorKind,
    message: String,
    correlation: ID<Correlation>,
}

impl DraftMlError {
    pub fn new(kind: DraftMlErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            correlation: ID::default(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(DraftMlErrorKind::InvalidRequest, message)
    }
    pub fn no_model_available(tier_group: impl std::fmt::Display) -> Self {
        Self::new(
            DraftMlErrorKind::NoModelAvailable,
            format!("no accepted model artifact for tier group {tier_group}"),
        )
    }
    pub fn artifact_load_failed(message: impl Into<String>) -> Self {
        Self::new(DraftMlErrorKind::ArtifactLoadFailed, message)
    }
    pub fn feature_version_mismatch(expected: impl std::fmt::Display, got: impl std::fmt::Display) -> Self {
        Self::new(
            DraftMlErrorKind::FeatureVersionMismatch,
            format!("feature_version mismatch: artifact expects {expected}, assembler produced {got}"),
        )
    }
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(DraftMlErrorKind::DeadlineExceeded, message)
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(DraftMlErrorKind::Internal, message)
    }

    pub fn kind(&self) -> &DraftMlErrorKind {
        &self.kind
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn correlation(&self) -> ID<Correlation> {
        self.correlation
    }
}

impl DraftMlError {
    /// Single-line `kind=... message=... correlation=...` diagnostic for
    /// the CLI bins' stderr output (spec.md §6). The message text already
    /// carries the first failing `match_id` where one applies (the
    /// trainer's filtering step embeds it directly).
    pub fn diagnostic(&self) -> String {
        format!("kind={:?} message={} correlation={}", self.kind, self.message, self.correlation)
    }
}

impl std::fmt::Display for DraftMlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}: {} (correlation={})",
            self.kind, self.message, self.correlation
        )
    }
}

impl std::error::Error for DraftMlError {}

impl From<anyhow::Error> for DraftMlError {
    fn from(e: anyhow::Error) -> Self {
        DraftMlError::internal(e.to_string())
    }
}
