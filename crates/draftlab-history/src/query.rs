use crate::HistoryIndex;
use draftlab_core::ChampionId;
use draftlab_core::Config;
use draftlab_core::Role;
use draftlab_core::Side;
use itertools::Itertools;

/// Floor on the binomial standard error used when z-scoring a pair's
/// observed win rate, so a near-certain expected rate never produces a
/// division blow-up for a thin sample.
const MIN_STDERR: f32 = 1e-3;

impl HistoryIndex {
    pub fn champ_winrate(&self, champ: ChampionId, config: &Config) -> Option<f32> {
        let count = self.champ.get(&champ)?;
        if count.meets_support(config.champ_winrate_min_support) { count.win_rate() } else { None }
    }

    fn pair_zscore(&self, a: ChampionId, b: ChampionId, config: &Config) -> Option<f32> {
        let key = if a <= b { (a, b) } else { (b, a) };
        let count = self.pair.get(&key)?;
        if !count.meets_support(config.pair_min_support) {
            return None;
        }
        let observed = count.win_rate()?;
        let wr_a = self.champ_winrate(a, config).unwrap_or(0.5);
        let wr_b = self.champ_winrate(b, config).unwrap_or(0.5);
        let expected = (wr_a + wr_b) / 2.0;
        let stderr = (expected * (1.0 - expected) / count.games as f32).sqrt().max(MIN_STDERR);
        Some((observed - expected) / stderr)
    }

    /// Mean z-score of a team's synergy over its 10 same-team pairs
    /// (spec.md §4.2, §4.4 block 6). Pairs without enough support are
    /// excluded from the mean rather than counted as zero; a team with no
    /// qualifying pair at all gets 0.0.
    pub fn synergy(&self, team: &[ChampionId; 5], config: &Config) -> f32 {
        let scores: Vec<f32> =
            team.iter().combinations(2).filter_map(|p| self.pair_zscore(*p[0], *p[1], config)).collect();
        if scores.is_empty() { 0.0 } else { scores.iter().sum::<f32>() / scores.len() as f32 }
    }

    fn matchup_winrate(&self, blue: ChampionId, red: ChampionId, role: Role, config: &Config) -> Option<f32> {
        let count = self.matchup.get(&(blue, red, role.index() as u8))?;
        if count.meets_support(config.history_matchup_min_support) { count.win_rate() } else { None }
    }

    /// Sum, over the five same-role lane matchups, of how far the blue
    /// side's observed win rate sits from a coin flip (spec.md §4.2,
    /// §4.4 block 6). Undersampled lanes contribute 0 rather than being
    /// dropped, since the sum (not a mean) is the reported scalar.
    pub fn counter_advantage(&self, blue: &[ChampionId; 5], red: &[ChampionId; 5], config: &Config) -> f32 {
        Role::ALL
            .iter()
            .map(|&role| {
                let blue_champ = blue[role.index() as usize];
                let red_champ = red[role.index() as usize];
                self.matchup_winrate(blue_champ, red_champ, role, config).map(|wr| wr - 0.5).unwrap_or(0.0)
            })
            .sum()
    }

    /// The blue-side counterpart viewed from red is its negation: red's
    /// advantage at a lane is exactly blue's disadvantage there. Used by
    /// the feature assembler to derive the opposing scalar without a
    /// second table lookup (spec.md §4.4 block 6).
    pub fn counter_advantage_for(&self, side: Side, blue: &[ChampionId; 5], red: &[ChampionId; 5], config: &Config) -> f32 {
        let blue_side = self.counter_advantage(blue, red, config);
        match side {
            Side::Blue => blue_side,
            Side::Red => -blue_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_core::Tier;
    use draftlab_records::Draft;
    use draftlab_records::MatchRecord;
    use draftlab_records::EMPTY_BAN;

    fn config() -> Config {
        Config::default()
    }

    fn built(n_games: u32, blue_win: bool) -> HistoryIndex {
        let matches: Vec<MatchRecord> = (0..n_games)
            .map(|i| MatchRecord {
                match_id: format!("m-{i}"),
                patch: draftlab_core::Patch::new(15, 1),
                tier: Tier::Gold,
                draft: Draft {
                    blue_picks: [1, 2, 3, 4, 5],
                    red_picks: [6, 7, 8, 9, 10],
                    blue_bans: [EMPTY_BAN; 5],
                    red_bans: [EMPTY_BAN; 5],
                },
                blue_win,
                derived: None,
            })
            .collect();
        HistoryIndex::build(&matches, Tier::Gold.group())
    }

    #[test]
    fn synergy_is_zero_with_no_support() {
        let idx = HistoryIndex::default();
        assert_eq!(idx.synergy(&[1, 2, 3, 4, 5], &config()), 0.0);
    }

    #[test]
    fn synergy_is_positive_for_an_overperforming_team() {
        let idx = built(10, true);
        assert!(idx.synergy(&[1, 2, 3, 4, 5], &config()) > 0.0);
    }

    #[test]
    fn counter_advantage_favors_consistently_winning_blue_lanes() {
        let idx = built(10, true);
        let adv = idx.counter_advantage(&[1, 2, 3, 4, 5], &[6, 7, 8, 9, 10], &config());
        assert!(adv > 0.0);
    }

    #[test]
    fn counter_advantage_for_red_is_negated() {
        let idx = built(10, true);
        let blue = idx.counter_advantage_for(Side::Blue, &[1, 2, 3, 4, 5], &[6, 7, 8, 9, 10], &config());
        let red = idx.counter_advantage_for(Side::Red, &[1, 2, 3, 4, 5], &[6, 7, 8, 9, 10], &config());
        assert_eq!(blue, -red);
    }

    #[test]
    fn undersampled_matchups_contribute_nothing() {
        let idx = built(1, true);
        let mut config = config();
        config.history_matchup_min_support = 5;
        assert_eq!(idx.counter_advantage(&[1, 2, 3, 4, 5], &[6, 7, 8, 9, 10], &config), 0.0);
    }
}
