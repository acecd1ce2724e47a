/// Runtime configuration knobs named as "Open Questions" in spec.md §9:
/// minimum-support thresholds, gate tolerances, and serving-path limits.
/// Every consumer takes a `&Config` explicitly; nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Minimum same-role cross-team games for a live matchup cell
    /// (spec.md §3 default 200).
    pub matchup_min_support: u32,
    /// Minimum co-occurrence games for a live pair/synergy cell
    /// (spec.md §4.2 default 3).
    pub pair_min_support: u32,
    /// Minimum same-role cross-team games for `matchup_winrate`
    /// (spec.md §3 default 3).
    pub history_matchup_min_support: u32,
    /// Minimum games before a champion win rate is exposed
    /// (spec.md §3 default 5).
    pub champ_winrate_min_support: u32,
    /// Minimum games for `base_winrate`/meta aggregates to report a real
    /// value instead of a neutral default (spec.md §4.3, §4.10).
    pub meta_min_support: u32,
    /// Number of most-recent patches considered for trend slopes
    /// (spec.md §4.3, §4.10 default 3).
    pub trend_window_patches: usize,
    /// Relative calibrated log-loss improvement required for gate
    /// acceptance (spec.md §4.6 default 20%).
    pub gate_log_loss_improvement: f32,
    /// Relative calibrated Brier improvement required for gate
    /// acceptance (spec.md §4.6 default 20%).
    pub gate_brier_improvement: f32,
    /// Maximum absolute ECE regression tolerated by the gate
    /// (spec.md §4.6, §9 default 0.02).
    pub gate_ece_tolerance: f32,
    /// ECE histogram bin count (spec.md §4.5 default 10).
    pub ece_bins: usize,
    /// Prediction/recommendation cache TTL (spec.md §4.8 default 60s).
    pub cache_ttl_seconds: u64,
    /// Per-request deadline (spec.md §5 default 3s).
    pub request_deadline_seconds: f32,
    /// Default number of ranked recommendation candidates returned
    /// (spec.md §4.9 default 5).
    pub recommend_top_n: usize,
    /// Candidate enumeration cap for pick mode (spec.md §4.9 default 100).
    pub recommend_pick_cap: usize,
    /// Candidate enumeration cap for ban mode (spec.md §4.9 default 80).
    pub recommend_ban_cap: usize,
    /// Top-K positive/negative contributions in an explanation
    /// (spec.md §4.8 default 3).
    pub explanation_top_k: usize,
    /// Reference season subtracted in the patch feature block
    /// (spec.md §4.4 block 4).
    pub reference_season: u16,
    /// Minimum matches for a tier group before the trainer will fit a
    /// model at all (spec.md §4.5 "Failure modes"); below this, training
    /// is a hard error and no artifact is emitted.
    pub training_min_matches: usize,
    /// Number of folds used for out-of-fold calibration (spec.md §4.5
    /// step 5 default 5).
    pub calibration_folds: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matchup_min_support: 200,
            pair_min_support: 3,
            history_matchup_min_support: 3,
            champ_winrate_min_support: 5,
            meta_min_support: 5,
            trend_window_patches: 3,
            gate_log_loss_improvement: 0.20,
            gate_brier_improvement: 0.20,
            gate_ece_tolerance: 0.02,
            ece_bins: 10,
            cache_ttl_seconds: 60,
            request_deadline_seconds: 3.0,
            recommend_top_n: 5,
            recommend_pick_cap: 100,
            recommend_ban_cap: 80,
            explanation_top_k: 3,
            reference_season: 10,
            training_min_matches: 200,
            calibration_folds: 5,
        }
    }
}

impl Config {
    /// Overrides defaults from `DRAFTML_*` environment variables. Any
    /// variable absent or unparseable falls back to the documented default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        macro_rules! load {
            ($var:literal, $field:ident) => {
                if let Ok(v) = std::env::var($var) {
                    if let Ok(parsed) = v.parse() {
                        cfg.$field = parsed;
                    }
                }
            };
        }
        load!("DRAFTML_MATCHUP_MIN_SUPPORT", matchup_min_support);
        load!("DRAFTML_PAIR_MIN_SUPPORT", pair_min_support);
        load!(
            "DRAFTML_HISTORY_MATCHUP_MIN_SUPPORT",
            history_matchup_min_support
        );
        load!("DRAFTML_CHAMP_WINRATE_MIN_SUPPORT", champ_winrate_min_support);
        load!("DRAFTML_META_MIN_SUPPORT", meta_min_support);
        load!("DRAFTML_TREND_WINDOW_PATCHES", trend_window_patches);
        load!("DRAFTML_GATE_LOG_LOSS_IMPROVEMENT", gate_log_loss_improvement);
        load!("DRAFTML_GATE_BRIER_IMPROVEMENT", gate_brier_improvement);
        load!("DRAFTML_GATE_ECE_TOLERANCE", gate_ece_tolerance);
        load!("DRAFTML_ECE_BINS", ece_bins);
        load!("DRAFTML_CACHE_TTL_SECONDS", cache_ttl_seconds);
        load!("DRAFTML_REQUEST_DEADLINE_SECONDS", request_deadline_seconds);
        load!("DRAFTML_RECOMMEND_TOP_N", recommend_top_n);
        load!("DRAFTML_RECOMMEND_PICK_CAP", recommend_pick_cap);
        load!("DRAFTML_RECOMMEND_BAN_CAP", recommend_ban_cap);
        load!("DRAFTML_EXPLANATION_TOP_K", explanation_top_k);
        load!("DRAFTML_REFERENCE_SEASON", reference_season);
        load!("DRAFTML_TRAINING_MIN_MATCHES", training_min_matches);
        load!("DRAFTML_CALIBRATION_FOLDS", calibration_folds);
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.matchup_min_support, 200);
        assert_eq!(cfg.pair_min_support, 3);
        assert_eq!(cfg.meta_min_support, 5);
        assert_eq!(cfg.gate_ece_tolerance, 0.02);
        assert_eq!(cfg.recommend_pick_cap, 100);
        assert_eq!(cfg.recommend_ban_cap, 80);
    }

    #[test]
    fn from_env_overrides_only_set_vars() {
        std::env::set_var("DRAFTML_PAIR_MIN_SUPPORT", "9");
        let cfg = Config::from_env();
        assert_eq!(cfg.pair_min_support, 9);
        assert_eq!(cfg.meta_min_support, 5);
        std::env::remove_var("DRAFTML_PAIR_MIN_SUPPORT");
    }
}
