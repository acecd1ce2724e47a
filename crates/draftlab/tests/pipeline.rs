//! Wires the trainer, registry, inference, and recommendation engines
//! together end to end, the way a deployment actually would: fit an
//! artifact, write it into a registry directory, load it behind an
//! `InferenceEngine`, and drive predictions and recommendations off of
//! it. Unit tests within each crate seed a registry with a hand-built
//! classifier; these exercise the real `draftlab-trainer::train` output
//! instead, since that boundary is the one no single crate's own tests
//! can cover (spec.md §8).

use draftlab::champions::AttributeMap;
use draftlab::core::Config;
use draftlab::core::Damage;
use draftlab::core::Patch;
use draftlab::core::Role;
use draftlab::core::Side;
use draftlab::core::ChampionId;
use draftlab::core::Tier;
use draftlab::core::TierGroup;
use draftlab::eval::evaluate_gate;
use draftlab::eval::Metrics;
use draftlab::features::assemble;
use draftlab::features::FeatureMode;
use draftlab::infer::InferenceEngine;
use draftlab::recommend::RecommendationEngine;
use draftlab::records::Draft;
use draftlab::records::MatchRecord;
use draftlab::records::EMPTY_BAN;
use draftlab::registry::ModelRegistry;
use draftlab::trainer::classifier;
use draftlab::trainer::classifier::ModelType;
use draftlab::trainer::train;
use draftlab::trainer::Calibrator;
use draftlab::trainer::ClassifierArtifact;
use draftlab::trainer::ModelCard;
use draftlab::trainer::TrainRequest;
use draftlab::trainer::TrainedArtifact;
use std::sync::Arc;

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
                "engage": (i % 4) as u8, "hard_cc": 1, "poke": 1, "splitpush": 1, "frontline": 1,
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

fn synthetic_matches(n: usize) -> Vec<MatchRecord> {
    (0..n)
        .map(|i| {
            let blue_win = i % 2 == 0;
            let offset = (i % 15) as ChampionId;
            MatchRecord {
                match_id: format!("m-{i}"),
                patch: Patch::new(15, 20),
                tier: Tier::Gold,
                draft: Draft {
                    blue_picks: [1 + offset, 2 + offset, 3 + offset, 4 + offset, 5 + offset],
                    red_picks: [20 + offset, 21 + offset, 22 + offset, 23 + offset, 24 + offset],
                    blue_bans: [EMPTY_BAN; 5],
                    red_bans: [EMPTY_BAN; 5],
                },
                blue_win,
                derived: None,
            }
        })
        .collect()
}

fn tmp_dir(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("draftlab-pipeline-test-{label}-{}", std::process::id()))
}

/// Trains a real linear-model artifact for `TierGroup::Mid` on a
/// synthetic dataset and writes it into a fresh registry directory,
/// returning the directory, the live `InferenceEngine`, and the
/// attribute map it was trained against.
fn trained_engine(n: usize, matches: usize, dir_label: &str) -> (std::path::PathBuf, Arc<InferenceEngine>, Arc<AttributeMap>) {
    let attributes = attrs(n);
    let records = synthetic_matches(matches);
    let mut config = Config::default();
    config.training_min_matches = 100;
    let request = TrainRequest {
        tier_group: TierGroup::Mid,
        model_type: ModelType::Linear,
        feature_mode: FeatureMode::Basic,
        matches: &records,
        attributes: &attributes,
        history: None,
        assets: None,
        source_patch: Patch::new(15, 20),
        trained_at_unix: 1000,
        seed: 11,
    };
    let artifact = train(&request, &config).unwrap();
    let dir = tmp_dir(dir_label);
    artifact.save(&dir).unwrap();

    let registry = Arc::new(ModelRegistry::new(&dir));
    registry.reload(&config).unwrap();
    let engine = Arc::new(InferenceEngine::new(registry, attributes.clone(), config));
    (dir, engine, attributes)
}

#[test]
fn trained_artifact_predicts_a_valid_probability_on_an_empty_draft() {
    let (dir, engine, _attributes) = trained_engine(60, 300, "empty-draft");
    let result = engine.predict(&Draft::empty(), Tier::Gold, Patch::new(15, 20), None).unwrap();
    assert!((0.0..=1.0).contains(&result.blue_win_prob_raw));
    assert!((0.0..=1.0).contains(&result.blue_win_prob_calibrated));
    assert!((0.0..=100.0).contains(&result.confidence));
    assert_eq!(result.model_version, "1000");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn repeated_predictions_on_the_same_full_draft_are_self_consistent() {
    let (dir, engine, _attributes) = trained_engine(60, 300, "self-consistent");
    let draft = Draft {
        blue_picks: [1, 2, 3, 4, 5],
        red_picks: [20, 21, 22, 23, 24],
        blue_bans: [EMPTY_BAN; 5],
        red_bans: [EMPTY_BAN; 5],
    };
    let a = engine.predict(&draft, Tier::Gold, Patch::new(15, 20), None).unwrap();
    let b = engine.predict(&draft, Tier::Gold, Patch::new(15, 20), None).unwrap();
    assert_eq!(a, b);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn pick_and_ban_recommendations_respect_role_and_occupancy_against_a_real_artifact() {
    let n = 30;
    let (dir, engine, attributes) = trained_engine(n, 300, "recommend");
    let recommend = RecommendationEngine::new(engine, Config::default());

    let mut draft = Draft::empty();
    draft.blue_picks[Role::Top.index()] = 1;
    draft.blue_picks[Role::Jungle.index()] = 2;
    draft.red_picks[Role::Top.index()] = 20;

    let picks = recommend
        .recommend_picks(&draft, Tier::Gold, Patch::new(15, 20), Side::Blue, Role::Mid, None)
        .unwrap();
    let occupied = draft.occupied();
    let mut seen = std::collections::HashSet::new();
    for c in &picks.candidates {
        assert_eq!(attributes.get(c.champion_id).unwrap().role, Role::Mid);
        assert!(!occupied.contains(&c.champion_id));
        assert!(seen.insert(c.champion_id), "duplicate candidate {}", c.champion_id);
    }

    let bans = recommend.recommend_bans(&draft, Tier::Gold, Patch::new(15, 20), Side::Blue, None).unwrap();
    for c in &bans.candidates {
        assert_ne!(attributes.get(c.champion_id).unwrap().role, Role::Top);
        assert!(!occupied.contains(&c.champion_id));
    }

    std::fs::remove_dir_all(&dir).ok();
}

/// The feature assembler treats blue/red as structurally symmetric
/// roles (`draftlab-features`'s own unit tests prove the composition
/// diffs negate under `Draft::swapped()`); this checks that the
/// invariant still holds once records, champions, and core tier/patch
/// types are wired together the way the trainer and inference engine
/// actually call `assemble`.
#[test]
fn feature_assembly_is_structurally_symmetric_under_side_swap() {
    let n = 30;
    let attributes = attrs(n);
    let config = Config::default();
    let draft = Draft {
        blue_picks: [1, 2, 3, 4, 5],
        red_picks: [20, 21, 22, 23, 24],
        blue_bans: [6, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN],
        red_bans: [25, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN, EMPTY_BAN],
    };
    let (_, named_a) = assemble(
        &draft, Tier::Gold, Patch::new(15, 20), None, &attributes, None, None, FeatureMode::Basic, &config,
    );
    let (_, named_b) = assemble(
        &draft.swapped(), Tier::Gold, Patch::new(15, 20), None, &attributes, None, None, FeatureMode::Basic, &config,
    );
    assert_eq!(named_a["diff_engage_sum"], -named_b["diff_engage_sum"]);
}

#[test]
fn gate_keeps_the_incumbent_when_a_later_artifact_does_not_clear_the_improvement_floor() {
    let make = |trained_at_unix: u64, log_loss: f32| {
        let fit = classifier::fit(ModelType::Linear, 4, &[vec![0.0; 4], vec![1.0; 4]], &[false, true], &[vec![0.0; 4]], &[false], 1);
        TrainedArtifact {
            bundle: ClassifierArtifact {
                classifier: fit,
                calibrator: Calibrator::Platt { a: 1.0, b: 0.0 },
                feature_mode: FeatureMode::Basic,
                feature_version: "v1".to_string(),
            },
            card: ModelCard {
                trained_at_unix,
                tier_group: TierGroup::Low,
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
    };

    let config = Config::default();
    let incumbent = make(100, 0.50);
    let stale_candidate = make(200, 0.499);
    let verdict = evaluate_gate(&stale_candidate.card.metrics_calibrated, Some(&incumbent.card.metrics_calibrated), &config);
    assert!(!verdict.accepted);

    let dir = tmp_dir("gate-reject");
    incumbent.save(&dir).unwrap();
    stale_candidate.save(&dir).unwrap();
    let registry = ModelRegistry::new(&dir);
    registry.reload(&config).unwrap();
    assert_eq!(registry.get(TierGroup::Low).unwrap().card.trained_at_unix, 100);
    std::fs::remove_dir_all(&dir).ok();
}
