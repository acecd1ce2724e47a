use draftlab_core::Config;
use draftlab_core::DraftMlError;
use draftlab_core::TierGroup;
use draftlab_eval::evaluate_gate;
use draftlab_trainer::ModelCard;
use draftlab_trainer::TrainedArtifact;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;

/// One artifact file on disk, named but not necessarily loaded.
#[derive(Debug, Clone)]
struct ArtifactHandle {
    path: PathBuf,
    tier_group: TierGroup,
    artifact_id: u64,
}

/// A snapshot of one tier group's promotion history: every artifact the
/// registry found, in trained-at order, each tagged with the gate verdict
/// that decided whether it became (or kept) the live pointer.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub tier_group: TierGroup,
    pub cards: Vec<ModelCard>,
    pub current_artifact_id: Option<u64>,
}

/// Scans a directory of `TrainedArtifact` files (spec.md §6.4 naming
/// convention) and exposes, per tier group, the newest artifact that
/// survived the promotion gate against every artifact trained before it.
///
/// Loaded bundles are cached process-wide keyed by `(tier_group,
/// artifact_id)`; a per-key lock collapses concurrent first-loads of the
/// same artifact into a single disk read (spec.md §4.7).
pub struct ModelRegistry {
    directory: PathBuf,
    handles: RwLock<HashMap<TierGroup, Vec<ArtifactHandle>>>,
    current: RwLock<HashMap<TierGroup, u64>>,
    cache: RwLock<HashMap<(TierGroup, u64), Arc<TrainedArtifact>>>,
    inflight: Mutex<HashMap<(TierGroup, u64), Arc<Mutex<()>>>>,
}

impl ModelRegistry {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            handles: RwLock::new(HashMap::new()),
            current: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Re-scans the artifact directory and replays the gate chain for
    /// every tier group from oldest to newest artifact, recomputing which
    /// one is currently live. Artifacts that fail to parse their filename
    /// are skipped with a warning rather than aborting the whole scan.
    pub fn reload(&self, config: &Config) -> Result<(), DraftMlError> {
        let entries = std::fs::read_dir(&self.directory).map_err(|e| {
            DraftMlError::artifact_load_failed(format!(
                "cannot list artifact directory {}: {e}",
                self.directory.display()
            ))
        })?;

        let mut by_group: HashMap<TierGroup, Vec<ArtifactHandle>> = HashMap::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(handle) = parse_handle(&path) else {
                log::warn!("[registry] skipping unrecognized artifact filename {}", path.display());
                continue;
            };
            by_group.entry(handle.tier_group).or_default().push(handle);
        }
        for handles in by_group.values_mut() {
            handles.sort_by_key(|h| h.artifact_id);
        }

        let mut new_current = HashMap::new();
        for &tier_group in &TierGroup::ALL {
            let Some(handles) = by_group.get(&tier_group) else { continue };
            let mut accepted: Option<Arc<TrainedArtifact>> = None;
            for handle in handles {
                let candidate = self.load_cached(handle)?;
                let verdict = evaluate_gate(
                    &candidate.card.metrics_calibrated,
                    accepted.as_ref().map(|a| &a.card.metrics_calibrated),
                    config,
                );
                if verdict.accepted {
                    accepted = Some(candidate);
                }
            }
            if let Some(artifact) = accepted {
                new_current.insert(tier_group, artifact.card.trained_at_unix);
            }
        }

        *self.handles.write().unwrap() = by_group;
        *self.current.write().unwrap() = new_current;
        Ok(())
    }

    /// The tier group's current gate-accepted artifact, loading it from
    /// disk on first use. `NoModelAvailable` if no artifact for this tier
    /// group has ever been accepted (spec.md §4.7 "cold start").
    pub fn get(&self, tier_group: TierGroup) -> Result<Arc<TrainedArtifact>, DraftMlError> {
        let artifact_id = *self
            .current
            .read()
            .unwrap()
            .get(&tier_group)
            .ok_or_else(|| DraftMlError::no_model_available(tier_group))?;
        let handle = self
            .handles
            .read()
            .unwrap()
            .get(&tier_group)
            .and_then(|hs| hs.iter().find(|h| h.artifact_id == artifact_id))
            .cloned()
            .ok_or_else(|| DraftMlError::no_model_available(tier_group))?;
        self.load_cached(&handle)
    }

    /// Every tier group currently holding an accepted artifact.
    pub fn all(&self) -> Result<HashMap<TierGroup, Arc<TrainedArtifact>>, DraftMlError> {
        let ids: Vec<TierGroup> = self.current.read().unwrap().keys().copied().collect();
        ids.into_iter().map(|tg| self.get(tg).map(|a| (tg, a))).collect()
    }

    /// Full promotion history for one tier group, for inspection tooling
    /// (e.g. the `evaluate` CLI) rather than the serving path.
    pub fn snapshot(&self, tier_group: TierGroup) -> Result<RegistrySnapshot, DraftMlError> {
        let handles = self.handles.read().unwrap().get(&tier_group).cloned().unwrap_or_default();
        let mut cards = Vec::with_capacity(handles.len());
        for handle in &handles {
            cards.push(self.load_cached(handle)?.card.clone());
        }
        let current_artifact_id = self.current.read().unwrap().get(&tier_group).copied();
        Ok(RegistrySnapshot { tier_group, cards, current_artifact_id })
    }

    fn load_cached(&self, handle: &ArtifactHandle) -> Result<Arc<TrainedArtifact>, DraftMlError> {
        let key = (handle.tier_group, handle.artifact_id);
        if let Some(hit) = self.cache.read().unwrap().get(&key) {
            return Ok(hit.clone());
        }

        let flight = {
            let mut inflight = self.inflight.lock().unwrap();
            inflight.entry(key).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        let _guard = flight.lock().unwrap();

        if let Some(hit) = self.cache.read().unwrap().get(&key) {
            return Ok(hit.clone());
        }
        let artifact = TrainedArtifact::load(&handle.path).map_err(|e| {
            DraftMlError::artifact_load_failed(format!(
                "failed to load {}: {e}",
                handle.path.display()
            ))
        })?;
        let artifact = Arc::new(artifact);
        self.cache.write().unwrap().insert(key, artifact.clone());
        self.inflight.lock().unwrap().remove(&key);
        Ok(artifact)
    }
}

fn parse_handle(path: &Path) -> Option<ArtifactHandle> {
    let stem = path.file_stem()?.to_str()?;
    let (group_str, id_str) = stem.rsplit_once('-')?;
    let tier_group = TierGroup::from_str(group_str).ok()?;
    let artifact_id: u64 = id_str.parse().ok()?;
    Some(ArtifactHandle { path: path.to_path_buf(), tier_group, artifact_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_eval::Metrics;
    use draftlab_trainer::classifier;
    use draftlab_trainer::ClassifierArtifact;
    use draftlab_trainer::Calibrator;
    use draftlab_trainer::ModelType;
    use draftlab_core::Patch;
    use draftlab_features::FeatureMode;

    fn artifact(tier_group: TierGroup, trained_at_unix: u64, log_loss: f32) -> TrainedArtifact {
        let classifier = classifier::fit(
            ModelType::Linear,
            4,
            &[vec![0.0; 4], vec![1.0; 4]],
            &[false, true],
            &[vec![0.0; 4]],
            &[false],
            1,
        );
        TrainedArtifact {
            bundle: ClassifierArtifact {
                classifier,
                calibrator: Calibrator::Platt { a: 1.0, b: 0.0 },
                feature_mode: FeatureMode::Basic,
                feature_version: "v1".to_string(),
            },
            card: ModelCard {
                trained_at_unix,
                tier_group,
                model_type: ModelType::Linear,
                n_train: 10,
                n_val: 2,
                n_test: 2,
                feature_dim: 4,
                source_patch: Patch::new(15, 1),
                metrics_raw: Metrics { roc_auc: 0.6, log_loss, brier: 0.2, ece: 0.05 },
                metrics_calibrated: Metrics { roc_auc: 0.6, log_loss, brier: 0.2, ece: 0.05 },
                gate_verdict: None,
            },
        }
    }

    fn tmp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("draftlab-registry-test-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn first_artifact_for_a_tier_group_is_accepted_unconditionally() {
        let dir = tmp_dir("first");
        artifact(TierGroup::Mid, 100, 0.6).save(&dir).unwrap();
        let registry = ModelRegistry::new(&dir);
        registry.reload(&Config::default()).unwrap();
        let current = registry.get(TierGroup::Mid).unwrap();
        assert_eq!(current.card.trained_at_unix, 100);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn later_artifact_without_sufficient_improvement_does_not_displace_incumbent() {
        let dir = tmp_dir("stale-candidate");
        artifact(TierGroup::Mid, 100, 0.50).save(&dir).unwrap();
        artifact(TierGroup::Mid, 200, 0.49).save(&dir).unwrap();
        let registry = ModelRegistry::new(&dir);
        registry.reload(&Config::default()).unwrap();
        assert_eq!(registry.get(TierGroup::Mid).unwrap().card.trained_at_unix, 100);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn later_artifact_with_sufficient_improvement_displaces_incumbent() {
        let dir = tmp_dir("better-candidate");
        artifact(TierGroup::Mid, 100, 0.50).save(&dir).unwrap();
        artifact(TierGroup::Mid, 200, 0.10).save(&dir).unwrap();
        let registry = ModelRegistry::new(&dir);
        registry.reload(&Config::default()).unwrap();
        assert_eq!(registry.get(TierGroup::Mid).unwrap().card.trained_at_unix, 200);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn tier_group_with_no_artifacts_reports_no_model_available() {
        let dir = tmp_dir("empty");
        let registry = ModelRegistry::new(&dir);
        registry.reload(&Config::default()).unwrap();
        let err = registry.get(TierGroup::High).unwrap_err();
        assert_eq!(*err.kind(), draftlab_core::DraftMlErrorKind::NoModelAvailable);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn repeated_get_calls_reuse_the_cached_artifact() {
        let dir = tmp_dir("cache-reuse");
        artifact(TierGroup::Low, 7, 0.4).save(&dir).unwrap();
        let registry = ModelRegistry::new(&dir);
        registry.reload(&Config::default()).unwrap();
        let a = registry.get(TierGroup::Low).unwrap();
        let b = registry.get(TierGroup::Low).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        std::fs::remove_dir_all(&dir).ok();
    }
}
