use draftlab_core::ChampionId;
use draftlab_core::Config;
use draftlab_core::Patch;
use draftlab_core::Side;
use draftlab_records::MatchRecord;
use draftlab_records::EMPTY_BAN;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// One champion's meta signal for a single patch (spec.md §4.10). Fields
/// are `Option` rather than defaulted so an undersampled champion reports
/// null instead of a misleading zero, per spec.md §4.10's explicit call-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub pick_rate: f32,
    pub ban_rate: f32,
    pub win_rate: Option<f32>,
    pub trend: Option<f32>,
}

#[derive(Default)]
struct Accum {
    picks: u32,
    bans: u32,
    wins: u32,
    games: u32,
}

/// Per-patch aggregates over stored matches, keyed `(patch, champion)`
/// (spec.md §4.10). Built fresh each time by [`MetaSnapshot::build`]; the
/// context refresher owns publishing a new snapshot and swapping the
/// pointer readers see (spec.md §4.11).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaSnapshot {
    entries: HashMap<Patch, HashMap<ChampionId, MetaEntry>>,
}

impl MetaSnapshot {
    /// Builds aggregates for every patch present in `matches`. `trend`
    /// for a given (patch, champion) is the signed slope of win rate
    /// across the `trend_window_patches` most recent patches strictly at
    /// or before it that each independently meet `meta_min_support`; a
    /// champion lacking at least two qualifying points gets `trend: None`
    /// instead of a noisy estimate.
    pub fn build(matches: &[MatchRecord], config: &Config) -> Self {
        let mut per_patch: HashMap<Patch, HashMap<ChampionId, Accum>> = HashMap::new();
        let mut picks_per_patch: HashMap<Patch, u32> = HashMap::new();

        for record in matches {
            if record.validate().is_err() {
                continue;
            }
            let table = per_patch.entry(record.patch).or_default();
            for side in [Side::Blue, Side::Red] {
                let won = (side == Side::Blue) == record.blue_win;
                for &champ in record.draft.picks(side) {
                    let a = table.entry(champ).or_default();
                    a.picks += 1;
                    a.games += 1;
                    if won {
                        a.wins += 1;
                    }
                    *picks_per_patch.entry(record.patch).or_default() += 1;
                }
                for &champ in record.draft.bans(side).iter().filter(|&&id| id != EMPTY_BAN) {
                    table.entry(champ).or_default().bans += 1;
                }
            }
        }

        let mut ordered_patches: Vec<Patch> = per_patch.keys().copied().collect();
        ordered_patches.sort();

        let mut entries: HashMap<Patch, HashMap<ChampionId, MetaEntry>> = HashMap::new();
        for (i, &patch) in ordered_patches.iter().enumerate() {
            let table = &per_patch[&patch];
            let total_picks = picks_per_patch.get(&patch).copied().unwrap_or(0).max(1) as f32;
            let window_start = i.saturating_sub(config.trend_window_patches.saturating_sub(1));
            let window = &ordered_patches[window_start..=i];

            let mut per_champ = HashMap::with_capacity(table.len());
            for (&champ, accum) in table {
                let pick_rate = accum.picks as f32 / total_picks;
                let ban_rate = accum.bans as f32 / total_picks;
                let win_rate = if accum.games >= config.meta_min_support {
                    Some(accum.wins as f32 / accum.games as f32)
                } else {
                    None
                };
                let trend = trend_slope(&per_patch, champ, window, config.meta_min_support);
                per_champ.insert(champ, MetaEntry { pick_rate, ban_rate, win_rate, trend });
            }
            entries.insert(patch, per_champ);
        }

        Self { entries }
    }

    pub fn get(&self, patch: Patch, champion: ChampionId) -> Option<MetaEntry> {
        self.entries.get(&patch)?.get(&champion).copied()
    }

    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        self.entries.keys()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(serde_json::from_slice(&std::fs::read(path)?)?)
    }
}

fn trend_slope(
    per_patch: &HashMap<Patch, HashMap<ChampionId, Accum>>,
    champ: ChampionId,
    window: &[Patch],
    min_support: u32,
) -> Option<f32> {
    let points: Vec<(f32, f32)> = window
        .iter()
        .enumerate()
        .filter_map(|(i, patch)| {
            let accum = per_patch.get(patch)?.get(&champ)?;
            if accum.games < min_support {
                return None;
            }
            Some((i as f32, accum.wins as f32 / accum.games as f32))
        })
        .collect();
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f32;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f32>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f32>() / n;
    let num: f32 = points.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let den: f32 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if den.abs() < 1e-9 {
        Some(0.0)
    } else {
        Some(num / den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_core::Tier;
    use draftlab_records::Draft;

    fn record(patch: Patch, blue_win: bool) -> MatchRecord {
        MatchRecord {
            match_id: "m".to_string(),
            patch,
            tier: Tier::Gold,
            draft: Draft {
                blue_picks: [1, 2, 3, 4, 5],
                red_picks: [6, 7, 8, 9, 10],
                blue_bans: [11, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN],
                red_bans: [EMPTY_BAN; 5],
            },
            blue_win,
            derived: None,
        }
    }

    #[test]
    fn undersampled_champion_reports_null_win_rate() {
        let matches = vec![record(Patch::new(15, 1), true)];
        let mut config = Config::default();
        config.meta_min_support = 5;
        let snapshot = MetaSnapshot::build(&matches, &config);
        assert_eq!(snapshot.get(Patch::new(15, 1), 1).unwrap().win_rate, None);
    }

    #[test]
    fn ban_only_champion_has_zero_pick_rate() {
        let matches = vec![record(Patch::new(15, 1), true)];
        let config = Config::default();
        let snapshot = MetaSnapshot::build(&matches, &config);
        let entry = snapshot.get(Patch::new(15, 1), 11).unwrap();
        assert_eq!(entry.pick_rate, 0.0);
        assert!(entry.ban_rate > 0.0);
    }

    #[test]
    fn trend_requires_two_qualifying_points_in_window() {
        let patches = [Patch::new(15, 1), Patch::new(15, 2), Patch::new(15, 3)];
        let mut matches = Vec::new();
        for &p in &patches {
            matches.push(record(p, true));
        }
        let mut config = Config::default();
        config.meta_min_support = 1;
        config.trend_window_patches = 3;
        let snapshot = MetaSnapshot::build(&matches, &config);
        // Only one game per patch, but one point per patch qualifies, so
        // by the third patch the window has 3 qualifying points.
        assert!(snapshot.get(patches[2], 1).unwrap().trend.is_some());
        assert_eq!(snapshot.get(patches[0], 1).unwrap().trend, None);
    }

    #[test]
    fn save_and_load_roundtrips() {
        let matches = vec![record(Patch::new(15, 1), true)];
        let config = Config::default();
        let snapshot = MetaSnapshot::build(&matches, &config);
        let dir = std::env::temp_dir().join(format!("draftlab-meta-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("meta.json");
        snapshot.save(&path).unwrap();
        let loaded = MetaSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
        std::fs::remove_dir_all(&dir).ok();
    }
}
