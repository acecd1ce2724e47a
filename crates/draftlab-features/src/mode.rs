/// Which history/asset block the assembler emits in position 6 of the
/// layout (spec.md §4.4). `feature_dim` depends only on `(mode, n, d)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FeatureMode {
    Basic,
    Rich,
}

impl FeatureMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            FeatureMode::Basic => "basic",
            FeatureMode::Rich => "rich",
        }
    }
}

impl std::fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FeatureMode {
    type Err = draftlab_core::DraftMlError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(FeatureMode::Basic),
            "rich" => Ok(FeatureMode::Rich),
            other => Err(draftlab_core::DraftMlError::invalid_request(format!(
                "unknown feature mode '{other}'"
            ))),
        }
    }
}

/// Bumped whenever the layout in [`feature_dim`] or `assemble` changes
/// (spec.md §4.4 "Any change to this layout bumps `feature_version`").
pub const FEATURE_VERSION: u32 = 1;

/// Role one-hots (10N) + ban one-hots (10N) + composition (30) + patch (2)
/// + tier (10) + objectives (4) = `20N + 49`, plus either the basic
/// history block (3) or the rich block (`35 + 2d`) in position 6
/// (spec.md §4.4).
pub const fn feature_dim(mode: FeatureMode, n: usize, d: usize) -> usize {
    let base = 20 * n + 49;
    match mode {
        FeatureMode::Basic => base + 3,
        // Rich mode replaces the 3-wide history block with duo encoding
        // (18) + lane matchups (5) + meta priors (6) + ban context (4) =
        // 33 fixed scalars, plus the 2d-wide team embedding sums.
        FeatureMode::Rich => base - 3 + 33 + 2 * d,
    }
}
