use draftlab_core::ChampionId;
use serde::Deserialize;
use serde::Serialize;

/// One ranked pick or ban candidate (spec.md §4.9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCandidate {
    pub champion_id: ChampionId,
    /// Raw-probability delta, signed from the acting side's perspective,
    /// before the tier bias is applied.
    pub delta: f32,
    /// `delta + bias(tier_group) * skill_cap(candidate)` (spec.md §4.9
    /// step 4); this is what the result is sorted by.
    pub score: f32,
    pub reasons: Vec<String>,
}

/// The full result of one `recommend_picks`/`recommend_bans` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub candidates: Vec<RecommendedCandidate>,
    /// Set when the request deadline was hit mid-enumeration (spec.md
    /// §5 "Cancellation & timeouts") — `candidates` holds whatever was
    /// ranked before the cutoff rather than an incomplete sort over the
    /// full candidate pool.
    pub partial: bool,
}
