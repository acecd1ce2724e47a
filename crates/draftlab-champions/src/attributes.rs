use draftlab_core::Damage;
use draftlab_core::Ordinal;
use draftlab_core::Role;
use serde::Deserialize;
use serde::Serialize;

/// Static per-champion tags consumed by the feature assembler and the
/// recommendation engine (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChampionAttributes {
    pub role: Role,
    pub damage: Damage,
    pub engage: Ordinal,
    pub hard_cc: Ordinal,
    pub poke: Ordinal,
    pub splitpush: Ordinal,
    pub frontline: Ordinal,
    pub skill_cap: Ordinal,
    pub scaling_early: Ordinal,
    pub scaling_mid: Ordinal,
    pub scaling_late: Ordinal,
}

impl ChampionAttributes {
    /// +1 for AP damage, -1 for AD, 0 for mixed; summed per-team for the
    /// `ap_ad_ratio` composition feature (spec.md §4.4 block 3).
    pub fn ap_ad_signed(&self) -> f32 {
        match self.damage {
            Damage::Ap => 1.0,
            Damage::Ad => -1.0,
            Damage::Mix => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ap_ad_signed_is_bounded() {
        let attrs = ChampionAttributes {
            role: Role::Mid,
            damage: Damage::Ap,
            engage: 0,
            hard_cc: 0,
            poke: 0,
            splitpush: 0,
            frontline: 0,
            skill_cap: 0,
            scaling_early: 0,
            scaling_mid: 0,
            scaling_late: 0,
        };
        assert_eq!(attrs.ap_ad_signed(), 1.0);
    }
}
