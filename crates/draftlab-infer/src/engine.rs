use crate::cache::canonical_key;
use crate::cache::ResultCache;
use crate::labels::label_vector;
use crate::result::Contribution;
use crate::result::PredictionResult;
use draftlab_assets::AssetBundle;
use draftlab_champions::AttributeMap;
use draftlab_core::Config;
use draftlab_core::DraftMlError;
use draftlab_core::FeatureVersion;
use draftlab_core::Patch;
use draftlab_core::Tier;
use draftlab_core::TierGroup;
use draftlab_features::assemble;
use draftlab_history::HistoryIndex;
use draftlab_records::Draft;
use draftlab_records::DerivedFeatures;
use draftlab_records::EMPTY_BAN;
use draftlab_registry::ModelRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

/// Assembles features, loads the registry's current artifact for the
/// request's tier group, and returns raw/calibrated win probability plus
/// top contributing features (spec.md §4.8). History and asset snapshots
/// are published separately and held behind a `RwLock<HashMap<...>>` —
/// "read-shared, write-private" (spec.md §5): a publish swaps one entry,
/// readers already holding a clone of the old `Arc` are unaffected.
pub struct InferenceEngine {
    registry: Arc<ModelRegistry>,
    attributes: Arc<AttributeMap>,
    history: RwLock<HashMap<TierGroup, Arc<HistoryIndex>>>,
    assets: RwLock<HashMap<(TierGroup, Patch), Arc<AssetBundle>>>,
    config: Config,
    cache: ResultCache<PredictionResult>,
}

impl InferenceEngine {
    pub fn new(registry: Arc<ModelRegistry>, attributes: Arc<AttributeMap>, config: Config) -> Self {
        let cache = ResultCache::new(config.cache_ttl_seconds);
        Self { registry, attributes, history: RwLock::new(HashMap::new()), assets: RwLock::new(HashMap::new()), config, cache }
    }

    pub fn publish_history(&self, tier_group: TierGroup, index: Arc<HistoryIndex>) {
        self.history.write().unwrap().insert(tier_group, index);
    }

    pub fn publish_assets(&self, tier_group: TierGroup, patch: Patch, bundle: Arc<AssetBundle>) {
        self.assets.write().unwrap().insert((tier_group, patch), bundle);
    }

    /// Current asset snapshot for `(tier_group, patch)`, if one has been
    /// published. Used by `draftlab-recommend` to generate matchup-summary
    /// reasons without re-deriving the lookup the assembler already does.
    pub fn assets_for(&self, tier_group: TierGroup, patch: Patch) -> Option<Arc<AssetBundle>> {
        self.assets.read().unwrap().get(&(tier_group, patch)).cloned()
    }

    /// Current history snapshot for `tier_group`, if one has been published.
    pub fn history_for(&self, tier_group: TierGroup) -> Option<Arc<HistoryIndex>> {
        self.history.read().unwrap().get(&tier_group).cloned()
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `predict(record, tier_group, patch)` (spec.md §4.8). `draft` may be
    /// partial (unfilled slots at [`EMPTY_BAN`]) — the recommendation
    /// engine calls this once per tentatively-completed candidate.
    pub fn predict(
        &self,
        draft: &Draft,
        tier: Tier,
        patch: Patch,
        derived: Option<DerivedFeatures>,
    ) -> Result<PredictionResult, DraftMlError> {
        for &champ in draft
            .blue_picks
            .iter()
            .chain(draft.red_picks.iter())
            .chain(draft.blue_bans.iter())
            .chain(draft.red_bans.iter())
            .filter(|&&id| id != EMPTY_BAN)
        {
            self.attributes.get(champ)?;
        }

        let tier_group = tier.group();
        let key = canonical_key(
            tier_group.as_str(),
            &patch.to_string(),
            &draft.blue_picks,
            &draft.red_picks,
            &draft.blue_bans,
            &draft.red_bans,
            &[],
        );
        if let Some(hit) = self.cache.get(key) {
            return Ok(hit);
        }

        let artifact = self.registry.get(tier_group)?;
        let history = self.history.read().unwrap().get(&tier_group).cloned();
        let assets = self.assets.read().unwrap().get(&(tier_group, patch)).cloned();
        let mode = artifact.bundle.feature_mode;

        let d = assets.as_ref().map(|a| a.embedding.d).unwrap_or(0);
        let expected_version = FeatureVersion::compute(mode.as_str(), self.attributes.n(), d).to_string();
        if expected_version != artifact.bundle.feature_version {
            return Err(DraftMlError::feature_version_mismatch(artifact.bundle.feature_version.clone(), expected_version));
        }

        let (vector, _named) =
            assemble(draft, tier, patch, derived, &self.attributes, history.as_deref(), assets.as_deref(), mode, &self.config);

        let raw = artifact.bundle.classifier.predict_raw(&vector);
        let calibrated = artifact.bundle.calibrator.apply(raw);
        let contributions = artifact.bundle.classifier.contributions(&vector);
        let labels = label_vector(mode, &self.attributes, draft, d);

        let mut pairs: Vec<Contribution> = labels
            .into_iter()
            .zip(contributions)
            .filter(|(_, v)| *v != 0.0)
            .map(|(feature, value)| Contribution { feature, value })
            .collect();
        pairs.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap());
        let k = self.config.explanation_top_k;
        let top_positive: Vec<Contribution> = pairs.iter().filter(|c| c.value > 0.0).take(k).cloned().collect();
        let top_negative: Vec<Contribution> =
            pairs.iter().rev().filter(|c| c.value < 0.0).take(k).cloned().collect();

        let result = PredictionResult {
            blue_win_prob_raw: raw,
            blue_win_prob_calibrated: calibrated,
            confidence: PredictionResult::confidence_from(calibrated),
            top_positive,
            top_negative,
            model_version: artifact.card.trained_at_unix.to_string(),
            feature_version: artifact.bundle.feature_version.clone(),
            tier_group,
            patch,
        };
        self.cache.put(key, result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlab_champions::AttributeMap;
    use draftlab_core::DraftMlErrorKind;
    use draftlab_core::Damage;
    use draftlab_core::Role;
    use draftlab_core::Tier;
    use draftlab_features::FeatureMode;
    use draftlab_trainer::classifier;
    use draftlab_trainer::Calibrator;
    use draftlab_trainer::ClassifierArtifact;
    use draftlab_trainer::ModelCard;
    use draftlab_trainer::ModelType;
    use draftlab_trainer::TrainedArtifact;
    use draftlab_eval::Metrics;

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
                    "damage": if i % 2 == 0 { Damage::Ap } else { Damage::Ad },
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

    fn seeded_registry(dir: &std::path::Path, n: usize, feature_version: &str) -> Arc<ModelRegistry> {
        let classifier = classifier::fit(ModelType::Linear, 20 * n + 49 + 3, &[vec![0.0; 1]; 0], &[], &[], &[], 1);
        let card = ModelCard {
            trained_at_unix: 1000,
            tier_group: TierGroup::Mid,
            model_type: ModelType::Linear,
            n_train: 10,
            n_val: 1,
            n_test: 1,
            feature_dim: 20 * n + 49 + 3,
            source_patch: Patch::new(15, 1),
            metrics_raw: Metrics { roc_auc: 0.6, log_loss: 0.6, brier: 0.2, ece: 0.05 },
            metrics_calibrated: Metrics { roc_auc: 0.6, log_loss: 0.6, brier: 0.2, ece: 0.05 },
            gate_verdict: None,
        };
        let artifact = TrainedArtifact {
            bundle: ClassifierArtifact {
                classifier,
                calibrator: Calibrator::Platt { a: 1.0, b: 0.0 },
                feature_mode: FeatureMode::Basic,
                feature_version: feature_version.to_string(),
            },
            card,
        };
        artifact.save(dir).unwrap();
        let registry = Arc::new(ModelRegistry::new(dir));
        registry.reload(&Config::default()).unwrap();
        registry
    }

    fn draft(n: usize) -> Draft {
        Draft {
            blue_picks: [1, 2, 3, 4, 5],
            red_picks: [(6 % n).max(1) as i64, 7 % n.max(8).max(1) as i64, 8 % n.max(9).max(1) as i64, 9, 10],
            blue_bans: [EMPTY_BAN; 5],
            red_bans: [EMPTY_BAN; 5],
        }
    }

    #[test]
    fn unknown_champion_in_request_is_invalid_not_a_panic() {
        let n = 20;
        let attributes = attrs(n);
        let dir = std::env::temp_dir().join(format!("draftlab-infer-test-unknown-{}", std::process::id()));
        let version = FeatureVersion::compute("basic", n, 0).to_string();
        let registry = seeded_registry(&dir, n, &version);
        let engine = InferenceEngine::new(registry, attributes, Config::default());
        let mut d = draft(n);
        d.blue_picks[0] = 99999;
        let err = engine.predict(&d, Tier::Gold, Patch::new(15, 1), None).unwrap_err();
        assert_eq!(*err.kind(), DraftMlErrorKind::InvalidRequest);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn no_model_for_tier_group_is_reported() {
        let n = 20;
        let attributes = attrs(n);
        let dir = std::env::temp_dir().join(format!("draftlab-infer-test-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let registry = Arc::new(ModelRegistry::new(&dir));
        registry.reload(&Config::default()).unwrap();
        let engine = InferenceEngine::new(registry, attributes, Config::default());
        let err = engine.predict(&draft(n), Tier::Gold, Patch::new(15, 1), None).unwrap_err();
        assert_eq!(*err.kind(), DraftMlErrorKind::NoModelAvailable);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn feature_version_mismatch_is_reported_rather_than_silently_scored() {
        let n = 20;
        let attributes = attrs(n);
        let dir = std::env::temp_dir().join(format!("draftlab-infer-test-mismatch-{}", std::process::id()));
        let registry = seeded_registry(&dir, n, "stale-version");
        let engine = InferenceEngine::new(registry, attributes, Config::default());
        let err = engine.predict(&draft(n), Tier::Gold, Patch::new(15, 1), None).unwrap_err();
        assert_eq!(*err.kind(), DraftMlErrorKind::FeatureVersionMismatch);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn repeated_identical_requests_hit_the_cache() {
        let n = 20;
        let attributes = attrs(n);
        let dir = std::env::temp_dir().join(format!("draftlab-infer-test-cache-{}", std::process::id()));
        let version = FeatureVersion::compute("basic", n, 0).to_string();
        let registry = seeded_registry(&dir, n, &version);
        let engine = InferenceEngine::new(registry, attributes, Config::default());
        let a = engine.predict(&draft(n), Tier::Gold, Patch::new(15, 1), None).unwrap();
        let b = engine.predict(&draft(n), Tier::Gold, Patch::new(15, 1), None).unwrap();
        assert_eq!(a, b);
        std::fs::remove_dir_all(&dir).ok();
    }
}
