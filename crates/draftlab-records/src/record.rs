use crate::Draft;
use draftlab_core::DraftMlError;
use draftlab_core::Patch;
use draftlab_core::Tier;
use serde::Deserialize;
use serde::Serialize;

/// Optional derived scalars, consumed only by the feature assembler's
/// objectives block (spec.md §3, §4.4 block 7). `None` means the upstream
/// ingestion pipeline did not compute them for this match; the assembler
/// treats that as zero rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub ap_ad_ratio: f32,
    pub engage_score: f32,
    pub splitpush_score: f32,
    pub teamfight_synergy: f32,
}

/// One completed game (spec.md §3). Per-player stats and objectives beyond
/// `derived` are out of scope for the core (consumed upstream of this
/// pipeline) and are intentionally not modeled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub patch: Patch,
    pub tier: Tier,
    pub draft: Draft,
    pub blue_win: bool,
    pub derived: Option<DerivedFeatures>,
}

impl MatchRecord {
    /// Validates the record's draft invariants (spec.md §3). The trainer
    /// (spec.md §4.5 step 2) filters out records that fail this check
    /// rather than aborting the whole run, while the assembler (spec.md
    /// §4.5 "Any assembler exception aborts") treats a failure on a single
    /// requested record as fatal to that request.
    pub fn validate(&self) -> Result<(), DraftMlError> {
        self.draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::EMPTY_BAN;

    fn sample() -> MatchRecord {
        MatchRecord {
            match_id: "m-1".to_string(),
            patch: Patch::new(15, 20),
            tier: Tier::Gold,
            draft: Draft {
                blue_picks: [1, 2, 3, 4, 5],
                red_picks: [6, 7, 8, 9, 10],
                blue_bans: [11, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN],
                red_bans: [12, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN],
            },
            blue_win: true,
            derived: None,
        }
    }

    #[test]
    fn valid_record_roundtrips_json() {
        let record = sample();
        let json = serde_json::to_vec(&record).unwrap();
        let back: MatchRecord = serde_json::from_slice(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn validate_delegates_to_draft() {
        assert!(sample().validate().is_ok());
        let mut bad = sample();
        bad.draft.red_picks[0] = bad.draft.blue_picks[0];
        assert!(bad.validate().is_err());
    }
}
