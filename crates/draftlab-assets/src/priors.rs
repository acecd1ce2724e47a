use draftlab_core::ChampionId;
use draftlab_core::Patch;
use draftlab_core::Side;
use draftlab_core::TierGroup;
use draftlab_records::MatchRecord;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;

/// Per-champion meta signal as of one tier group and patch (spec.md §4.3
/// step 3, §4.4 block 6/7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChampionPriors {
    pub base_winrate: f32,
    pub pick_rate: f32,
    pub ban_rate: f32,
    pub trend_3patch: f32,
}

#[derive(Default)]
struct Accum {
    wins: u32,
    games: u32,
    picks: u32,
    bans: u32,
}

/// Builds priors for every champion seen in `matches` restricted to
/// `tier_group`. `recent_patches` lists, oldest first, the up-to-three
/// most recent patches used for `trend_3patch`'s slope; a champion absent
/// from at least two of them gets a trend of 0.0 rather than a noisy
/// two-point slope.
pub fn build_priors(
    matches: &[MatchRecord],
    tier_group: TierGroup,
    recent_patches: &[Patch],
    min_support: u32,
) -> HashMap<ChampionId, ChampionPriors> {
    let mut totals: HashMap<ChampionId, Accum> = HashMap::new();
    let mut total_picks: u32 = 0;
    let mut per_patch: HashMap<Patch, HashMap<ChampionId, Accum>> = HashMap::new();

    for record in matches {
        if record.tier.group() != tier_group || record.validate().is_err() {
            continue;
        }
        for side in [Side::Blue, Side::Red] {
            let won = (side == Side::Blue) == record.blue_win;
            for &champ in record.draft.picks(side) {
                let a = totals.entry(champ).or_default();
                a.picks += 1;
                a.games += 1;
                if won {
                    a.wins += 1;
                }
                total_picks += 1;

                if recent_patches.contains(&record.patch) {
                    let per = per_patch.entry(record.patch).or_default().entry(champ).or_default();
                    per.games += 1;
                    if won {
                        per.wins += 1;
                    }
                }
            }
            for &champ in record.draft.bans(side).iter().filter(|&&id| id != draftlab_records::EMPTY_BAN) {
                totals.entry(champ).or_default().bans += 1;
            }
        }
    }

    totals
        .iter()
        .map(|(&champ, accum)| {
            let base_winrate =
                if accum.games >= min_support { accum.wins as f32 / accum.games as f32 } else { 0.5 };
            let pick_rate = if total_picks > 0 { accum.picks as f32 / total_picks as f32 } else { 0.0 };
            let ban_rate = if total_picks > 0 { accum.bans as f32 / total_picks as f32 } else { 0.0 };
            let trend_3patch = trend_slope(&per_patch, champ, recent_patches, min_support);
            (champ, ChampionPriors { base_winrate, pick_rate, ban_rate, trend_3patch })
        })
        .collect()
}

fn trend_slope(
    per_patch: &HashMap<Patch, HashMap<ChampionId, Accum>>,
    champ: ChampionId,
    recent_patches: &[Patch],
    min_support: u32,
) -> f32 {
    let points: Vec<(f32, f32)> = recent_patches
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
        return 0.0;
    }
    let n = points.len() as f32;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f32>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f32>() / n;
    let num: f32 = points.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let den: f32 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if den.abs() < 1e-9 { 0.0 } else { num / den }
}
