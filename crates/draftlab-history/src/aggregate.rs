use serde::Deserialize;
use serde::Serialize;

/// Wins out of games observed for some unit (a champion, a pair, a
/// same-role matchup). Zero games means "no evidence", not "50%".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WinCount {
    pub wins: u32,
    pub games: u32,
}

impl WinCount {
    pub fn record(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
    }

    pub fn win_rate(&self) -> Option<f32> {
        if self.games == 0 {
            None
        } else {
            Some(self.wins as f32 / self.games as f32)
        }
    }

    pub fn meets_support(&self, min_support: u32) -> bool {
        self.games >= min_support
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_count_has_no_win_rate() {
        assert_eq!(WinCount::default().win_rate(), None);
    }

    #[test]
    fn win_rate_divides_wins_by_games() {
        let mut c = WinCount::default();
        c.record(true);
        c.record(true);
        c.record(false);
        assert_eq!(c.win_rate(), Some(2.0 / 3.0));
    }

    #[test]
    fn support_threshold_is_inclusive() {
        let mut c = WinCount::default();
        c.record(true);
        c.record(false);
        assert!(c.meets_support(2));
        assert!(!c.meets_support(3));
    }
}
