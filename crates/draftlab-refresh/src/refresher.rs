use crate::RefreshReport;
use draftlab_assets::AssetBundle;
use draftlab_champions::ChampIndex;
use draftlab_core::Config;
use draftlab_core::Patch;
use draftlab_core::TierGroup;
use draftlab_history::HistoryIndex;
use draftlab_history::HistoryStore;
use draftlab_infer::InferenceEngine;
use draftlab_meta::MetaSnapshot;
use draftlab_records::MatchRecord;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

/// One `(tier_group, patch)` pair the refresher should rebuild assets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTarget {
    pub tier_group: TierGroup,
    pub patch: Patch,
}

/// Rebuilds history, meta, and asset snapshots on demand and swaps them
/// into the [`InferenceEngine`] the serving path reads from (spec.md
/// §4.11). Holds no match storage of its own — the caller supplies the
/// full match set on each call, matching the trainer's treatment of
/// ingestion as an external collaborator (spec.md §1).
pub struct ContextRefresher {
    engine: Arc<InferenceEngine>,
    meta: Arc<RwLock<MetaSnapshot>>,
    champ_index: Arc<ChampIndex>,
    assets_root: PathBuf,
    history_path: PathBuf,
    meta_path: PathBuf,
    embedding_dim: usize,
}

impl ContextRefresher {
    pub fn new(
        engine: Arc<InferenceEngine>,
        champ_index: Arc<ChampIndex>,
        assets_root: impl Into<PathBuf>,
        history_path: impl Into<PathBuf>,
        meta_path: impl Into<PathBuf>,
        embedding_dim: usize,
    ) -> Self {
        Self {
            engine,
            meta: Arc::new(RwLock::new(MetaSnapshot::default())),
            champ_index,
            assets_root: assets_root.into(),
            history_path: history_path.into(),
            meta_path: meta_path.into(),
            embedding_dim,
        }
    }

    /// The meta snapshot pointer readers should hold on to; a refresh
    /// replaces its contents in place under the write lock rather than
    /// handing out a new `Arc` each time, so callers only need to take it
    /// once.
    pub fn meta(&self) -> Arc<RwLock<MetaSnapshot>> {
        self.meta.clone()
    }

    /// Rebuilds the history index for every tier group, the meta snapshot
    /// over all patches, and the asset bundle for each `target`, then
    /// publishes all of it in one pass. Every shadow structure is fully
    /// built (and persisted to disk) before any of the engine's published
    /// pointers move, so a reader mid-request never sees history from one
    /// generation paired with assets from another.
    pub fn refresh(
        &self,
        matches: &[MatchRecord],
        targets: &[RefreshTarget],
        config: &Config,
    ) -> anyhow::Result<RefreshReport> {
        let history: Vec<(TierGroup, HistoryIndex)> = TierGroup::ALL
            .into_par_iter()
            .map(|tier_group| (tier_group, HistoryIndex::build(matches, tier_group)))
            .collect();

        let meta_snapshot = MetaSnapshot::build(matches, config);

        let asset_bundles: Vec<anyhow::Result<((TierGroup, Patch), AssetBundle)>> = targets
            .par_iter()
            .map(|target| {
                let recent = recent_patches(matches, target.patch, config.trend_window_patches);
                let bundle = AssetBundle::build(
                    matches,
                    &self.champ_index,
                    target.tier_group,
                    target.patch,
                    &recent,
                    self.embedding_dim,
                    config,
                );
                Ok(((target.tier_group, target.patch), bundle))
            })
            .collect();
        let asset_bundles: Vec<((TierGroup, Patch), AssetBundle)> =
            asset_bundles.into_iter().collect::<anyhow::Result<_>>()?;

        self.persist(&history, &meta_snapshot, &asset_bundles)?;

        for (tier_group, index) in history.iter().cloned() {
            self.engine.publish_history(tier_group, Arc::new(index));
        }
        for ((tier_group, patch), bundle) in asset_bundles.iter() {
            self.engine.publish_assets(*tier_group, *patch, Arc::new(bundle.clone()));
        }
        let meta_patches = meta_snapshot.patches().count();
        *self.meta.write().unwrap() = meta_snapshot;

        log::info!(
            "context refresh complete: {} matches, {} tier groups, {} asset bundles, {} patches",
            matches.len(),
            history.len(),
            asset_bundles.len(),
            meta_patches,
        );

        Ok(RefreshReport {
            matches_considered: matches.len(),
            history_tier_groups_rebuilt: history.len(),
            asset_bundles_rebuilt: asset_bundles.len(),
            meta_patches_rebuilt: meta_patches,
        })
    }

    fn persist(
        &self,
        history: &[(TierGroup, HistoryIndex)],
        meta: &MetaSnapshot,
        assets: &[((TierGroup, Patch), AssetBundle)],
    ) -> anyhow::Result<()> {
        if let Some(parent) = self.history_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        HistoryStore::from_indexes(history.iter().map(|(_, idx)| idx.clone())).save(&self.history_path)?;

        if let Some(parent) = self.meta_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        meta.save(&self.meta_path)?;

        for ((_, _), bundle) in assets {
            bundle.save(&self.assets_root)?;
        }
        Ok(())
    }
}

/// Distinct patches at or before `patch` present in `matches`, sorted
/// ascending and truncated to the most recent `window` — the same window
/// the meta snapshot's trend slope uses (spec.md §4.10).
fn recent_patches(matches: &[MatchRecord], patch: Patch, window: usize) -> Vec<Patch> {
    let mut patches: Vec<Patch> =
        matches.iter().map(|m| m.patch).filter(|&p| p <= patch).collect();
    patches.sort();
    patches.dedup();
    let start = patches.len().saturating_sub(window.max(1));
    patches[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_champions::AttributeMap;
    use draftlab_core::Role;
    use draftlab_core::Tier;
    use draftlab_records::Draft;
    use draftlab_records::EMPTY_BAN;
    use draftlab_registry::ModelRegistry;

    fn attrs(n: usize) -> Arc<AttributeMap> {
        let mut champions = serde_json::Map::new();
        let mut champ_index = Vec::new();
        let roles = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];
        for i in 1..=n {
            champ_index.push(i.to_string());
            champions.insert(
                i.to_string(),
                serde_json::json!({
                    "role": roles[(i - 1) % 5],
                    "damage": "Ad",
                    "engage": 1, "hard_cc": 1, "poke": 1, "splitpush": 1, "frontline": 1,
                    "skill_cap": 2, "scaling_early": 1, "scaling_mid": 2, "scaling_late": 2,
                }),
            );
        }
        let bytes = serde_json::to_vec(&serde_json::json!({
            "champions": champions,
            "champ_index": champ_index,
            "meta": { "patch": "15.1", "generated_at_unix": 0, "total_champions": n },
        }))
        .unwrap();
        Arc::new(AttributeMap::from_json(&bytes).unwrap())
    }

    fn record(patch: Patch, blue_win: bool) -> MatchRecord {
        MatchRecord {
            match_id: "m".to_string(),
            patch,
            tier: Tier::Gold,
            draft: Draft {
                blue_picks: [1, 2, 3, 4, 5],
                red_picks: [6, 7, 8, 9, 10],
                blue_bans: [EMPTY_BAN; 5],
                red_bans: [EMPTY_BAN; 5],
            },
            blue_win,
            derived: None,
        }
    }

    #[test]
    fn recent_patches_excludes_future_patches_and_respects_window() {
        let matches = vec![
            record(Patch::new(15, 1), true),
            record(Patch::new(15, 2), true),
            record(Patch::new(15, 3), true),
            record(Patch::new(15, 4), true),
        ];
        let recent = recent_patches(&matches, Patch::new(15, 3), 2);
        assert_eq!(recent, vec![Patch::new(15, 2), Patch::new(15, 3)]);
    }

    #[test]
    fn refresh_publishes_history_and_meta_and_reports_counts() {
        let n = 20;
        let attributes = attrs(n);
        let dir = std::env::temp_dir().join(format!("draftlab-refresh-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::create_dir_all(dir.join("registry")).unwrap();
        let registry = Arc::new(ModelRegistry::new(dir.join("registry")));
        registry.reload(&Config::default()).unwrap();
        let engine = Arc::new(InferenceEngine::new(registry, attributes, Config::default()));
        let champ_index = Arc::new(ChampIndex::from_ordered_ids((1..=n as i64).collect()).unwrap());

        let refresher = ContextRefresher::new(
            engine.clone(),
            champ_index,
            dir.join("assets"),
            dir.join("history.json"),
            dir.join("meta.json"),
            4,
        );

        let matches = vec![record(Patch::new(15, 1), true), record(Patch::new(15, 1), false)];
        let targets = [RefreshTarget { tier_group: TierGroup::Mid, patch: Patch::new(15, 1) }];
        let report = refresher.refresh(&matches, &targets, &Config::default()).unwrap();

        assert_eq!(report.matches_considered, 2);
        assert_eq!(report.history_tier_groups_rebuilt, TierGroup::ALL.len());
        assert_eq!(report.asset_bundles_rebuilt, 1);
        assert!(engine.history_for(TierGroup::Mid).is_some());
        assert!(engine.assets_for(TierGroup::Mid, Patch::new(15, 1)).is_some());
        assert!(dir.join("history.json").exists());
        assert!(dir.join("meta.json").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
