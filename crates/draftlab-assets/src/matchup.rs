use draftlab_champions::ChampIndex;
use draftlab_core::Patch;
use draftlab_core::Role;
use draftlab_core::Side;
use draftlab_core::TierGroup;
use draftlab_records::MatchRecord;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct Cell {
    wins: u32,
    games: u32,
}

/// Flattened `role -> n*n` table of same-role cross-team win rates
/// (spec.md §4.3 step 1). Row `a`, column `b` holds blue champion-index
/// `a` against red champion-index `b`; the table is asymmetric because
/// side matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupMatrix {
    pub n: usize,
    pub min_support: u32,
    tables: [Vec<Cell>; 5],
}

impl MatchupMatrix {
    pub fn build(
        matches: &[MatchRecord],
        index: &ChampIndex,
        tier_group: TierGroup,
        patch: Patch,
        min_support: u32,
    ) -> Self {
        let n = index.n();
        let mut tables: [Vec<Cell>; 5] = std::array::from_fn(|_| vec![Cell::default(); n * n]);
        for record in matches {
            if record.tier.group() != tier_group || record.patch != patch {
                continue;
            }
            if record.validate().is_err() {
                continue;
            }
            for role in Role::ALL {
                let blue_id = record.draft.pick_at(Side::Blue, role);
                let red_id = record.draft.pick_at(Side::Red, role);
                let (Ok(a), Ok(b)) = (index.index_of(blue_id), index.index_of(red_id)) else {
                    continue;
                };
                let cell = &mut tables[role.index()][a * n + b];
                cell.games += 1;
                if record.blue_win {
                    cell.wins += 1;
                }
            }
        }
        Self { n, min_support, tables }
    }

    /// Blue-side advantage at this role/matchup, clipped to `[-0.5, 0.5]`
    /// and zeroed when support falls short of `min_support` (spec.md §4.3
    /// step 1, §4.4 block 6).
    pub fn advantage(&self, role: Role, blue_index: usize, red_index: usize) -> f32 {
        let cell = self.tables[role.index()][blue_index * self.n + red_index];
        if cell.games < self.min_support {
            return 0.0;
        }
        let wr = cell.wins as f32 / cell.games as f32;
        (wr - 0.5).clamp(-0.5, 0.5)
    }

    pub fn support(&self, role: Role, blue_index: usize, red_index: usize) -> u32 {
        self.tables[role.index()][blue_index * self.n + red_index].games
    }
}
