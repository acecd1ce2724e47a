use serde::Deserialize;
use serde::Serialize;

/// Competitive skill bracket for a completed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

/// Model-specialization bracket. Every [`Tier`] maps to exactly one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierGroup {
    Low,
    Mid,
    High,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    /// Deterministic, total mapping from tier to tier group (spec.md §3).
    pub const fn group(self) -> TierGroup {
        match self {
            Tier::Iron | Tier::Bronze | Tier::Silver => TierGroup::Low,
            Tier::Gold | Tier::Platinum | Tier::Emerald => TierGroup::Mid,
            Tier::Diamond | Tier::Master | Tier::Grandmaster | Tier::Challenger => {
                TierGroup::High
            }
        }
    }

    /// Stable position of this tier within [`Tier::ALL`], used for the
    /// feature assembler's tier one-hot block.
    pub const fn index(self) -> usize {
        match self {
            Tier::Iron => 0,
            Tier::Bronze => 1,
            Tier::Silver => 2,
            Tier::Gold => 3,
            Tier::Platinum => 4,
            Tier::Emerald => 5,
            Tier::Diamond => 6,
            Tier::Master => 7,
            Tier::Grandmaster => 8,
            Tier::Challenger => 9,
        }
    }
}

impl TierGroup {
    pub const ALL: [TierGroup; 3] = [TierGroup::Low, TierGroup::Mid, TierGroup::High];

    /// Recommendation bias applied to skill-cap in `draftlab-recommend`
    /// (spec.md §4.9 step 4): rewards high-skill-cap picks only in high tiers.
    pub const fn skill_bias(self) -> f32 {
        match self {
            TierGroup::Low => -0.3,
            TierGroup::Mid => 0.0,
            TierGroup::High => 0.2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TierGroup::Low => "low",
            TierGroup::Mid => "mid",
            TierGroup::High => "high",
        }
    }
}

impl std::fmt::Display for TierGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TierGroup {
    type Err = crate::DraftMlError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TierGroup::Low),
            "mid" => Ok(TierGroup::Mid),
            "high" => Ok(TierGroup::High),
            other => Err(crate::DraftMlError::invalid_request(format!(
                "unknown tier group '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_mapping_is_total_and_stable() {
        assert_eq!(Tier::Iron.group(), TierGroup::Low);
        assert_eq!(Tier::Silver.group(), TierGroup::Low);
        assert_eq!(Tier::Gold.group(), TierGroup::Mid);
        assert_eq!(Tier::Emerald.group(), TierGroup::Mid);
        assert_eq!(Tier::Diamond.group(), TierGroup::High);
        assert_eq!(Tier::Challenger.group(), TierGroup::High);
    }

    #[test]
    fn indices_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for t in Tier::ALL {
            assert!(seen.insert(t.index()));
        }
    }

    #[test]
    fn bias_ordering_rewards_high_tier_skill_cap() {
        assert!(TierGroup::High.skill_bias() > TierGroup::Mid.skill_bias());
        assert!(TierGroup::Mid.skill_bias() > TierGroup::Low.skill_bias());
    }
}
