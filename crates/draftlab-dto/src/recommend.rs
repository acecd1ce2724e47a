use draftlab_core::DraftMlError;
use draftlab_core::Patch;
use draftlab_core::Role;
use draftlab_core::Side;
use draftlab_core::Tier;
use draftlab_recommend::RecommendationEngine;
use draftlab_recommend::RecommendationResult;
use draftlab_records::Draft;
use serde::Deserialize;
use serde::Serialize;

/// Which of the two recommendation modes a request asks for (spec.md
/// §4.9). Pick mode names the target slot explicitly; ban mode leaves it
/// implicit, since the engine searches over the opponent's unfilled roles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendMode {
    Pick { role: Role },
    Ban,
}

/// `recommend_picks`/`recommend_bans` request document (spec.md §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub draft: Draft,
    pub tier: Tier,
    pub patch: String,
    pub side: Side,
    pub mode: RecommendMode,
    pub top_n: Option<usize>,
}

impl RecommendRequest {
    pub fn recommend(&self, engine: &RecommendationEngine) -> Result<RecommendResponse, DraftMlError> {
        let patch = Patch::parse(&self.patch)?;
        let result = match self.mode {
            RecommendMode::Pick { role } => {
                engine.recommend_picks(&self.draft, self.tier, patch, self.side, role, self.top_n)?
            }
            RecommendMode::Ban => engine.recommend_bans(&self.draft, self.tier, patch, self.side, self.top_n)?,
        };
        Ok(RecommendResponse::from(result))
    }
}

/// `recommend_picks`/`recommend_bans` response document; field names fixed
/// by spec.md §4.9.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub candidates: Vec<draftlab_recommend::RecommendedCandidate>,
    pub partial: bool,
}

impl From<RecommendationResult> for RecommendResponse {
    fn from(r: RecommendationResult) -> Self {
        Self { candidates: r.candidates, partial: r.partial }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_mode_serializes_with_its_role() {
        let mode = RecommendMode::Pick { role: Role::Mid };
        let json = serde_json::to_string(&mode).unwrap();
        assert!(json.contains("\"kind\":\"pick\""));
        assert!(json.contains("\"role\""));
    }

    #[test]
    fn ban_mode_serializes_without_a_role_field() {
        let json = serde_json::to_string(&RecommendMode::Ban).unwrap();
        assert_eq!(json, "{\"kind\":\"ban\"}");
    }
}
