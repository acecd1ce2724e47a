use crate::WinCount;
use draftlab_core::ChampionId;
use draftlab_core::Role;
use draftlab_core::Side;
use draftlab_core::TierGroup;
use draftlab_records::MatchRecord;
use itertools::Itertools;
use std::collections::HashMap;

/// Canonical (unordered) key for a same-team champion pair.
pub type PairKey = (ChampionId, ChampionId);
/// Key for a same-role cross-team matchup: (blue champion, red champion, role index).
pub type MatchupKey = (ChampionId, ChampionId, u8);

fn pair_key(a: ChampionId, b: ChampionId) -> PairKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// Champion, pair, and matchup win rates accumulated over one tier
/// group's matches (spec.md §4.2). Immutable once built; a rebuild
/// produces a fresh value rather than mutating this one in place, so
/// the refresher can atomically swap old for new without readers ever
/// observing a partially-built index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryIndex {
    pub tier_group: Option<TierGroup>,
    pub champ: HashMap<ChampionId, WinCount>,
    pub pair: HashMap<PairKey, WinCount>,
    pub matchup: HashMap<MatchupKey, WinCount>,
}

impl HistoryIndex {
    /// Builds an index from every match in `matches` whose tier falls in
    /// `tier_group`. Records that fail [`MatchRecord::validate`] are
    /// skipped rather than aborting the whole build, matching the
    /// trainer's tolerance for bad upstream rows (spec.md §4.5 step 2).
    pub fn build(matches: &[MatchRecord], tier_group: TierGroup) -> Self {
        let mut index = HistoryIndex { tier_group: Some(tier_group), ..Default::default() };
        for record in matches {
            if record.tier.group() != tier_group {
                continue;
            }
            if record.validate().is_err() {
                continue;
            }
            index.absorb(record);
        }
        index
    }

    fn absorb(&mut self, record: &MatchRecord) {
        let draft = &record.draft;
        for side in [Side::Blue, Side::Red] {
            let won = (side == Side::Blue) == record.blue_win;
            let picks = draft.picks(side);
            for &champ in picks {
                self.champ.entry(champ).or_default().record(won);
            }
            for pair in picks.iter().combinations(2) {
                let (&a, &b) = (pair[0], pair[1]);
                self.pair.entry(pair_key(a, b)).or_default().record(won);
            }
        }
        for role in Role::ALL {
            let blue_champ = draft.pick_at(Side::Blue, role);
            let red_champ = draft.pick_at(Side::Red, role);
            let key = (blue_champ, red_champ, role.index() as u8);
            self.matchup.entry(key).or_default().record(record.blue_win);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_core::Patch;
    use draftlab_core::Tier;
    use draftlab_records::Draft;
    use draftlab_records::EMPTY_BAN;

    fn record(blue_picks: [ChampionId; 5], red_picks: [ChampionId; 5], blue_win: bool) -> MatchRecord {
        MatchRecord {
            match_id: "m".to_string(),
            patch: Patch::new(15, 1),
            tier: Tier::Gold,
            draft: Draft {
                blue_picks,
                red_picks,
                blue_bans: [EMPTY_BAN; 5],
                red_bans: [EMPTY_BAN; 5],
            },
            blue_win,
            derived: None,
        }
    }

    #[test]
    fn build_filters_by_tier_group() {
        let mut bronze = record([1, 2, 3, 4, 5], [6, 7, 8, 9, 10], true);
        bronze.tier = Tier::Bronze;
        let matches = vec![bronze];
        let idx = HistoryIndex::build(&matches, TierGroup::High);
        assert!(idx.champ.is_empty());
    }

    #[test]
    fn build_counts_champ_pair_and_matchup() {
        let matches = vec![record([1, 2, 3, 4, 5], [6, 7, 8, 9, 10], true)];
        let idx = HistoryIndex::build(&matches, Tier::Gold.group());
        assert_eq!(idx.champ.get(&1).unwrap().wins, 1);
        assert_eq!(idx.champ.get(&6).unwrap().wins, 0);
        assert_eq!(idx.pair.get(&pair_key(1, 2)).unwrap().games, 1);
        assert_eq!(idx.matchup.get(&(1, 6, Role::Top.index() as u8)).unwrap().wins, 1);
    }

    #[test]
    fn invalid_records_are_skipped() {
        let mut bad = record([1, 2, 3, 4, 5], [1, 7, 8, 9, 10], true);
        bad.tier = Tier::Gold;
        let idx = HistoryIndex::build(&[bad], TierGroup::Mid);
        assert!(idx.champ.is_empty());
    }
}
