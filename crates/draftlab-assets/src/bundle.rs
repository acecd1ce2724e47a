use crate::build_priors;
use crate::ChampionEmbeddings;
use crate::ChampionPriors;
use crate::MatchupMatrix;
use draftlab_champions::ChampIndex;
use draftlab_core::ChampionId;
use draftlab_core::Config;
use draftlab_core::Patch;
use draftlab_core::TierGroup;
use draftlab_records::MatchRecord;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

/// The three artifacts the asset builder produces for one (tier group,
/// patch) pair (spec.md §4.3 "Output").
#[derive(Debug, Clone)]
pub struct AssetBundle {
    pub tier_group: TierGroup,
    pub patch: Patch,
    pub matchup: MatchupMatrix,
    pub embedding: ChampionEmbeddings,
    pub priors: HashMap<ChampionId, ChampionPriors>,
}

impl AssetBundle {
    pub fn build(
        matches: &[MatchRecord],
        index: &ChampIndex,
        tier_group: TierGroup,
        patch: Patch,
        recent_patches: &[Patch],
        embedding_dim: usize,
        config: &Config,
    ) -> Self {
        let matchup = MatchupMatrix::build(matches, index, tier_group, patch, config.matchup_min_support);
        let embedding =
            ChampionEmbeddings::build(matches, index, tier_group, patch, embedding_dim, patch.season() as u64);
        let priors = build_priors(matches, tier_group, recent_patches, config.meta_min_support);
        Self { tier_group, patch, matchup, embedding, priors }
    }

    fn directory(root: &Path, tier_group: TierGroup, patch: Patch) -> PathBuf {
        root.join(tier_group.as_str()).join(patch.to_string())
    }

    pub fn save(&self, root: impl AsRef<Path>) -> anyhow::Result<()> {
        let dir = Self::directory(root.as_ref(), self.tier_group, self.patch);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("matchup.json"), serde_json::to_vec_pretty(&self.matchup)?)?;
        std::fs::write(dir.join("embedding.json"), serde_json::to_vec_pretty(&self.embedding)?)?;
        std::fs::write(dir.join("priors.json"), serde_json::to_vec_pretty(&self.priors)?)?;
        Ok(())
    }

    /// Loads a previously saved bundle. A missing directory or a missing
    /// member file is reported to the caller (the feature assembler
    /// treats that as `NoAssetsAvailable` and substitutes zero-blocks —
    /// spec.md §4.4 — rather than this function guessing a fallback).
    pub fn load(root: impl AsRef<Path>, tier_group: TierGroup, patch: Patch) -> anyhow::Result<Self> {
        let dir = Self::directory(root.as_ref(), tier_group, patch);
        let matchup: MatchupMatrix = serde_json::from_slice(&std::fs::read(dir.join("matchup.json"))?)?;
        let embedding: ChampionEmbeddings = serde_json::from_slice(&std::fs::read(dir.join("embedding.json"))?)?;
        let priors: HashMap<ChampionId, ChampionPriors> =
            serde_json::from_slice(&std::fs::read(dir.join("priors.json"))?)?;
        Ok(Self { tier_group, patch, matchup, embedding, priors })
    }
}
