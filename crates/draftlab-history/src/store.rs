use crate::HistoryIndex;
use crate::MatchupKey;
use crate::PairKey;
use crate::WinCount;
use draftlab_core::ChampionId;
use draftlab_core::TierGroup;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// JSON can't carry tuple map keys directly, so the on-disk shape flattens
/// each table to a vector of entries; [`HistoryIndex`] itself keeps the
/// `HashMap`s for O(1) query-time lookups.
#[derive(Serialize, Deserialize)]
struct IndexDocument {
    champ: Vec<(ChampionId, WinCount)>,
    pair: Vec<(ChampionId, ChampionId, WinCount)>,
    matchup: Vec<(ChampionId, ChampionId, u8, WinCount)>,
}

impl From<&HistoryIndex> for IndexDocument {
    fn from(idx: &HistoryIndex) -> Self {
        Self {
            champ: idx.champ.iter().map(|(&c, &w)| (c, w)).collect(),
            pair: idx.pair.iter().map(|(&(a, b), &w)| (a, b, w)).collect(),
            matchup: idx.matchup.iter().map(|(&(b, r, role), &w)| (b, r, role, w)).collect(),
        }
    }
}

impl IndexDocument {
    fn into_index(self, tier_group: TierGroup) -> HistoryIndex {
        let champ = self.champ.into_iter().collect();
        let pair: HashMap<PairKey, WinCount> = self.pair.into_iter().map(|(a, b, w)| ((a, b), w)).collect();
        let matchup: HashMap<MatchupKey, WinCount> =
            self.matchup.into_iter().map(|(b, r, role, w)| ((b, r, role), w)).collect();
        HistoryIndex { tier_group: Some(tier_group), champ, pair, matchup }
    }
}

/// One history index per tier group, persisted as a single JSON file so a
/// refresh writes and swaps the whole store atomically (spec.md §5, §7).
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    by_tier_group: HashMap<TierGroup, HistoryIndex>,
}

impl HistoryStore {
    pub fn from_indexes(indexes: impl IntoIterator<Item = HistoryIndex>) -> Self {
        let mut by_tier_group = HashMap::new();
        for idx in indexes {
            if let Some(tier_group) = idx.tier_group {
                by_tier_group.insert(tier_group, idx);
            }
        }
        Self { by_tier_group }
    }

    pub fn get(&self, tier_group: TierGroup) -> Option<&HistoryIndex> {
        self.by_tier_group.get(&tier_group)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let doc: HashMap<String, IndexDocument> =
            self.by_tier_group.iter().map(|(g, idx)| (g.as_str().to_string(), IndexDocument::from(idx))).collect();
        let bytes = serde_json::to_vec_pretty(&doc)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        let doc: HashMap<String, IndexDocument> = serde_json::from_slice(&bytes)?;
        let mut by_tier_group = HashMap::new();
        for (key, document) in doc {
            let tier_group: TierGroup = key.parse().map_err(|_| anyhow::anyhow!("unknown tier group '{key}'"))?;
            by_tier_group.insert(tier_group, document.into_index(tier_group));
        }
        Ok(Self { by_tier_group })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_core::Tier;
    use draftlab_records::Draft;
    use draftlab_records::MatchRecord;
    use draftlab_records::EMPTY_BAN;

    #[test]
    fn save_and_load_roundtrips() {
        let record = MatchRecord {
            match_id: "m".to_string(),
            patch: draftlab_core::Patch::new(15, 1),
            tier: Tier::Gold,
            draft: Draft {
                blue_picks: [1, 2, 3, 4, 5],
                red_picks: [6, 7, 8, 9, 10],
                blue_bans: [EMPTY_BAN; 5],
                red_bans: [EMPTY_BAN; 5],
            },
            blue_win: true,
            derived: None,
        };
        let idx = HistoryIndex::build(&[record], TierGroup::Mid);
        let store = HistoryStore::from_indexes([idx]);

        let dir = std::env::temp_dir().join(format!("draftlab-history-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("history.json");
        store.save(&path).unwrap();
        let loaded = HistoryStore::load(&path).unwrap();

        let before = store.get(TierGroup::Mid).unwrap();
        let after = loaded.get(TierGroup::Mid).unwrap();
        assert_eq!(before.champ, after.champ);
        assert_eq!(before.pair, after.pair);
        assert_eq!(before.matchup, after.matchup);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn idempotent_rebuild_yields_equal_index() {
        let record = MatchRecord {
            match_id: "m".to_string(),
            patch: draftlab_core::Patch::new(15, 1),
            tier: Tier::Gold,
            draft: Draft {
                blue_picks: [1, 2, 3, 4, 5],
                red_picks: [6, 7, 8, 9, 10],
                blue_bans: [EMPTY_BAN; 5],
                red_bans: [EMPTY_BAN; 5],
            },
            blue_win: true,
            derived: None,
        };
        let matches = vec![record];
        let first = HistoryIndex::build(&matches, TierGroup::Mid);
        let second = HistoryIndex::build(&matches, TierGroup::Mid);
        assert_eq!(first, second);
    }
}
