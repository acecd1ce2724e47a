use draftlab_core::ChampionId;
use draftlab_core::DraftMlError;
use draftlab_core::Role;
use draftlab_core::Side;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;

/// Sentinel used for an empty ban slot (spec.md §3).
pub const EMPTY_BAN: ChampionId = -1;

/// Ten picks and up to ten bans for one completed draft.
///
/// Picks are ordered 5-tuples by role: index `Role::Top.index()` holds the
/// top-lane pick, etc. (spec.md §3). Storing them role-indexed rather than
/// in pick order keeps the feature assembler's role one-hot block a pure
/// array lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub blue_picks: [ChampionId; 5],
    pub red_picks: [ChampionId; 5],
    pub blue_bans: [ChampionId; 5],
    pub red_bans: [ChampionId; 5],
}

impl Draft {
    pub fn empty() -> Self {
        Self {
            blue_picks: [EMPTY_BAN; 5],
            red_picks: [EMPTY_BAN; 5],
            blue_bans: [EMPTY_BAN; 5],
            red_bans: [EMPTY_BAN; 5],
        }
    }

    pub fn picks(&self, side: Side) -> &[ChampionId; 5] {
        match side {
            Side::Blue => &self.blue_picks,
            Side::Red => &self.red_picks,
        }
    }
    pub fn picks_mut(&mut self, side: Side) -> &mut [ChampionId; 5] {
        match side {
            Side::Blue => &mut self.blue_picks,
            Side::Red => &mut self.red_picks,
        }
    }
    pub fn bans(&self, side: Side) -> &[ChampionId; 5] {
        match side {
            Side::Blue => &self.blue_bans,
            Side::Red => &self.red_bans,
        }
    }
    pub fn bans_mut(&mut self, side: Side) -> &mut [ChampionId; 5] {
        match side {
            Side::Blue => &mut self.blue_bans,
            Side::Red => &mut self.red_bans,
        }
    }

    pub fn pick_at(&self, side: Side, role: Role) -> ChampionId {
        self.picks(side)[role.index()]
    }

    /// A draft with blue and red swapped, for the side-symmetry property
    /// test (spec.md §8 scenario 3).
    pub fn swapped(&self) -> Self {
        Self {
            blue_picks: self.red_picks,
            red_picks: self.blue_picks,
            blue_bans: self.red_bans,
            red_bans: self.blue_bans,
        }
    }

    /// All champions present anywhere in the draft (picked or banned on
    /// either side), used by the recommendation engine to exclude
    /// candidates already in play (spec.md §4.9).
    pub fn occupied(&self) -> HashSet<ChampionId> {
        self.blue_picks
            .iter()
            .chain(self.red_picks.iter())
            .chain(self.blue_bans.iter())
            .chain(self.red_bans.iter())
            .copied()
            .filter(|&id| id != EMPTY_BAN)
            .collect()
    }

    /// Enforces spec.md §3's draft invariants: exactly five picks per
    /// side (no sentinel among picks), no pick duplicated across either
    /// team, and bans unique within their own side (bans may repeat
    /// across sides).
    pub fn validate(&self) -> Result<(), DraftMlError> {
        let mut seen_picks = HashSet::with_capacity(10);
        for id in self.blue_picks.iter().chain(self.red_picks.iter()) {
            if *id == EMPTY_BAN {
                return Err(DraftMlError::invalid_request(
                    "picks must not contain the empty-slot sentinel",
                ));
            }
            if !seen_picks.insert(*id) {
                return Err(DraftMlError::invalid_request(format!(
                    "champion {id} picked more than once across the draft"
                )));
            }
        }
        for (side_name, bans) in [("blue", &self.blue_bans), ("red", &self.red_bans)] {
            let mut seen = HashSet::with_capacity(5);
            for id in bans.iter().copied().filter(|&id| id != EMPTY_BAN) {
                if !seen.insert(id) {
                    return Err(DraftMlError::invalid_request(format!(
                        "champion {id} banned more than once on {side_name} side"
                    )));
                }
            }
        }
        Ok(())
    }
}
