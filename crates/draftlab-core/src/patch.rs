use serde::Deserialize;
use serde::Serialize;
use std::cmp::Ordering;

use crate::DraftMlError;

/// A versioned game state encoded as "season.minor" (spec.md GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patch {
    season: u16,
    minor: u16,
}

impl Patch {
    pub fn new(season: u16, minor: u16) -> Self {
        Self { season, minor }
    }

    /// Parses "season.minor" (e.g. "15.20"). Malformed input is a hard,
    /// caller-facing error rather than a best-effort guess.
    pub fn parse(s: &str) -> Result<Self, DraftMlError> {
        let (season, minor) = s
            .split_once('.')
            .ok_or_else(|| DraftMlError::invalid_request(format!("malformed patch '{s}'")))?;
        let season: u16 = season
            .parse()
            .map_err(|_| DraftMlError::invalid_request(format!("malformed patch season '{s}'")))?;
        let minor: u16 = minor
            .parse()
            .map_err(|_| DraftMlError::invalid_request(format!("malformed patch minor '{s}'")))?;
        Ok(Self { season, minor })
    }

    pub fn season(&self) -> u16 {
        self.season
    }
    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// `(season - reference_season) / 10`, feature assembler block 4.
    pub fn season_feature(&self, reference_season: u16) -> f32 {
        (self.season as f32 - reference_season as f32) / 10.0
    }
    /// `minor / 24`, feature assembler block 4.
    pub fn minor_feature(&self) -> f32 {
        self.minor as f32 / 24.0
    }
}

impl std::fmt::Display for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.season, self.minor)
    }
}

impl PartialOrd for Patch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Patch {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.season, self.minor).cmp(&(other.season, other.minor))
    }
}

/// Opaque tag identifying the feature assembler's output layout
/// (spec.md GLOSSARY: "Feature version"). Computed deterministically from
/// the inputs that determine vector layout, so a registry load can detect
/// drift without the assembler and registry sharing mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVersion(String);

impl FeatureVersion {
    /// `embedding_dim` only affects layout in rich mode (spec.md §4.4's
    /// team-embedding-sum block); basic mode's `feature_dim` is `20n+49+3`
    /// regardless of `d` (`draftlab_features::mode::feature_dim`), so
    /// folding whatever `d` happens to be in scope at call time into a
    /// basic-mode version would tag two layout-identical artifacts with
    /// different versions the moment an asset bundle with a different
    /// embedding width gets published for the same tier/patch.
    pub fn compute(mode: &str, n_champions: usize, embedding_dim: usize) -> Self {
        let d = if mode == "basic" { 0 } else { embedding_dim };
        Self(format!("v1-{mode}-n{n_champions}-d{d}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeatureVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
