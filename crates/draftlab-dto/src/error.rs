use draftlab_core::DraftMlError;
use draftlab_core::DraftMlErrorKind;
use serde::Deserialize;
use serde::Serialize;

/// The stable kind tag plus correlation id every caller-visible failure
/// carries (spec.md §7). The HTTP surface maps `kind` to a status code;
/// this document only fixes the tag and the fields it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
    pub correlation_id: String,
}

impl From<&DraftMlError> for ErrorResponse {
    fn from(e: &DraftMlError) -> Self {
        let kind = match e.kind() {
            DraftMlErrorKind::InvalidRequest => "invalid_request",
            DraftMlErrorKind::NoModelAvailable => "no_model_available",
            DraftMlErrorKind::ArtifactLoadFailed => "artifact_load_failed",
            DraftMlErrorKind::FeatureVersionMismatch => "feature_version_mismatch",
            DraftMlErrorKind::DeadlineExceeded => "deadline_exceeded",
            DraftMlErrorKind::Internal => "internal",
        };
        Self {
            kind: kind.to_string(),
            message: e.message().to_string(),
            correlation_id: e.correlation().to_string(),
        }
    }
}

impl From<DraftMlError> for ErrorResponse {
    fn from(e: DraftMlError) -> Self {
        (&e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_is_the_snake_case_error_name() {
        let err = DraftMlError::no_model_available("mid");
        let response: ErrorResponse = err.into();
        assert_eq!(response.kind, "no_model_available");
        assert!(!response.correlation_id.is_empty());
    }
}
