use draftlab_champions::ChampIndex;
use draftlab_core::Patch;
use draftlab_core::Side;
use draftlab_core::TierGroup;
use draftlab_records::MatchRecord;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Deserialize;
use serde::Serialize;

/// Dense `n x d` champion embedding, rows L2-normalized (spec.md §4.3
/// step 2, §9 open question: `d` is recorded on the artifact rather than
/// assumed, since it varies by deployment between 32 and 64).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionEmbeddings {
    pub n: usize,
    pub d: usize,
    rows: Vec<Vec<f32>>,
}

impl ChampionEmbeddings {
    pub fn row(&self, index: usize) -> &[f32] {
        &self.rows[index]
    }

    /// Builds embeddings by power-iterating a centered, outcome-weighted
    /// same-team co-occurrence matrix toward its `d` dominant singular
    /// directions (a truncated-SVD stand-in that avoids pulling in a
    /// dense linear-algebra dependency the rest of the workspace doesn't
    /// otherwise need), then L2-normalizes each row.
    pub fn build(
        matches: &[MatchRecord],
        index: &ChampIndex,
        tier_group: TierGroup,
        patch: Patch,
        d: usize,
        seed: u64,
    ) -> Self {
        let n = index.n();
        let co = co_occurrence_matrix(matches, index, tier_group, patch);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut directions: Vec<Vec<f32>> = (0..d)
            .map(|_| {
                let mut v: Vec<f32> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
                normalize(&mut v);
                v
            })
            .collect();

        for _ in 0..24 {
            for k in 0..directions.len() {
                let mut next = vec![0.0f32; n];
                next.par_iter_mut().enumerate().for_each(|(i, out)| {
                    *out = (0..n).map(|j| co[i * n + j] * directions[k][j]).sum();
                });
                for earlier in directions.iter().take(k) {
                    let proj: f32 = next.iter().zip(earlier).map(|(a, b)| a * b).sum();
                    for (v, e) in next.iter_mut().zip(earlier) {
                        *v -= proj * e;
                    }
                }
                normalize(&mut next);
                directions[k] = next;
            }
        }

        let rows: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut row: Vec<f32> = directions.iter().map(|dir| dir[i]).collect();
                normalize(&mut row);
                row
            })
            .collect();

        Self { n, d, rows }
    }
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-9 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn co_occurrence_matrix(matches: &[MatchRecord], index: &ChampIndex, tier_group: TierGroup, patch: Patch) -> Vec<f32> {
    let n = index.n();
    let mut co = vec![0.0f32; n * n];
    for record in matches {
        if record.tier.group() != tier_group || record.patch != patch {
            continue;
        }
        if record.validate().is_err() {
            continue;
        }
        for side in [Side::Blue, Side::Red] {
            let won = (side == Side::Blue) == record.blue_win;
            let weight = if won { 1.0 } else { -1.0 };
            let picks: Vec<usize> =
                record.draft.picks(side).iter().filter_map(|&id| index.index_of(id).ok()).collect();
            for &a in &picks {
                for &b in &picks {
                    if a != b {
                        co[a * n + b] += weight;
                    }
                }
            }
        }
    }
    let mean = co.iter().sum::<f32>() / (n * n).max(1) as f32;
    for v in co.iter_mut() {
        *v -= mean;
    }
    co
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_core::ChampionId;
    use draftlab_core::Tier;
    use draftlab_records::Draft;
    use draftlab_records::EMPTY_BAN;

    fn index() -> ChampIndex {
        ChampIndex::from_ordered_ids((1..=10).collect::<Vec<ChampionId>>()).unwrap()
    }

    fn matches() -> Vec<MatchRecord> {
        (0..6)
            .map(|i| MatchRecord {
                match_id: format!("m-{i}"),
                patch: Patch::new(15, 1),
                tier: Tier::Gold,
                draft: Draft {
                    blue_picks: [1, 2, 3, 4, 5],
                    red_picks: [6, 7, 8, 9, 10],
                    blue_bans: [EMPTY_BAN; 5],
                    red_bans: [EMPTY_BAN; 5],
                },
                blue_win: i % 2 == 0,
                derived: None,
            })
            .collect()
    }

    #[test]
    fn rows_are_unit_length() {
        let idx = index();
        let emb = ChampionEmbeddings::build(&matches(), &idx, TierGroup::Mid, Patch::new(15, 1), 4, 7);
        for i in 0..idx.n() {
            let row = emb.row(i);
            if row.iter().any(|x| *x != 0.0) {
                let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
                assert!((norm - 1.0).abs() < 1e-3, "row {i} norm {norm}");
            }
        }
    }

    #[test]
    fn dimensions_match_request() {
        let idx = index();
        let emb = ChampionEmbeddings::build(&matches(), &idx, TierGroup::Mid, Patch::new(15, 1), 4, 7);
        assert_eq!(emb.n, idx.n());
        assert_eq!(emb.d, 4);
        assert_eq!(emb.row(0).len(), 4);
    }

    #[test]
    fn build_is_deterministic_for_a_fixed_seed() {
        let idx = index();
        let a = ChampionEmbeddings::build(&matches(), &idx, TierGroup::Mid, Patch::new(15, 1), 4, 7);
        let b = ChampionEmbeddings::build(&matches(), &idx, TierGroup::Mid, Patch::new(15, 1), 4, 7);
        assert_eq!(a.rows, b.rows);
    }
}
