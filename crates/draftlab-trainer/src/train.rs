use crate::artifact::ClassifierArtifact;
use crate::artifact::ModelCard;
use crate::artifact::TrainedArtifact;
use crate::calibration::Calibrator;
use crate::classifier;
use crate::classifier::ModelType;
use crate::split::k_folds;
use crate::split::stratified_split;
use draftlab_assets::AssetBundle;
use draftlab_champions::AttributeMap;
use draftlab_core::Config;
use draftlab_core::DraftMlError;
use draftlab_core::Patch;
use draftlab_core::TierGroup;
use draftlab_eval::compute_metrics;
use draftlab_features::assemble;
use draftlab_features::feature_dim;
use draftlab_features::FeatureMode;
use draftlab_history::HistoryIndex;
use draftlab_records::MatchRecord;
use draftlab_records::EMPTY_BAN;

/// Everything the trainer needs to fit one tier group's classifier and
/// calibrator (spec.md §4.5). Pure inputs only: the trainer itself does
/// no match ingestion, matching the core's treatment of match storage as
/// an external collaborator (spec.md §1).
pub struct TrainRequest<'a> {
    pub tier_group: TierGroup,
    pub model_type: ModelType,
    pub feature_mode: FeatureMode,
    pub matches: &'a [MatchRecord],
    pub attributes: &'a AttributeMap,
    pub history: Option<&'a HistoryIndex>,
    pub assets: Option<&'a AssetBundle>,
    pub source_patch: Patch,
    pub trained_at_unix: u64,
    pub seed: u64,
}

/// Runs spec.md §4.5's full procedure: filter, assemble, split, fit,
/// calibrate, and score. Returns a [`TrainedArtifact`] with `gate_verdict`
/// left `None` — gating against an incumbent is the caller's job
/// (`draftlab-eval::evaluate_gate`), since the trainer has no registry
/// access of its own (spec.md §9 "explicit non-sharing of state").
pub fn train(request: &TrainRequest, config: &Config) -> Result<TrainedArtifact, DraftMlError> {
    let tier_matches: Vec<&MatchRecord> =
        request.matches.iter().filter(|m| m.tier.group() == request.tier_group).collect();

    if tier_matches.len() < config.training_min_matches {
        return Err(DraftMlError::invalid_request(format!(
            "tier group {} has {} matches, below the training floor of {}",
            request.tier_group,
            tier_matches.len(),
            config.training_min_matches
        )));
    }

    let mut vectors = Vec::with_capacity(tier_matches.len());
    let mut labels = Vec::with_capacity(tier_matches.len());
    for record in &tier_matches {
        if record.validate().is_err() {
            continue;
        }
        let ids = record
            .draft
            .blue_picks
            .iter()
            .chain(record.draft.red_picks.iter())
            .chain(record.draft.blue_bans.iter())
            .chain(record.draft.red_bans.iter())
            .copied()
            .filter(|&id| id != EMPTY_BAN);
        for champ in ids {
            if request.attributes.get(champ).is_err() {
                return Err(DraftMlError::invalid_request(format!(
                    "match_id={} references unknown champion {champ}",
                    record.match_id
                )));
            }
        }
        let (vector, _) = assemble(
            &record.draft,
            record.tier,
            record.patch,
            record.derived,
            request.attributes,
            request.history,
            request.assets,
            request.feature_mode,
            config,
        );
        vectors.push(vector);
        labels.push(record.blue_win);
    }

    if vectors.is_empty() {
        return Err(DraftMlError::invalid_request(format!(
            "no valid records survived filtering for tier group {}",
            request.tier_group
        )));
    }

    let n_features = vectors[0].len();
    let split = stratified_split(&labels, request.seed);

    let x_at = |idx: &[usize]| idx.iter().map(|&i| vectors[i].clone()).collect::<Vec<_>>();
    let y_at = |idx: &[usize]| idx.iter().map(|&i| labels[i]).collect::<Vec<_>>();

    let x_train = x_at(&split.train);
    let y_train = y_at(&split.train);
    let x_val = x_at(&split.validation);
    let y_val = y_at(&split.validation);
    let x_test = x_at(&split.test);
    let y_test = y_at(&split.test);

    let classifier = classifier::fit(
        request.model_type,
        n_features,
        &x_train,
        &y_train,
        &x_val,
        &y_val,
        request.seed,
    );

    // Cross-validated out-of-fold raw predictions over train+val feed the
    // calibrator (spec.md §4.5 step 5), so the calibrator never sees a
    // score the classifier produced on data it was fit on.
    let mut fit_idx: Vec<usize> = split.train.iter().chain(&split.validation).copied().collect();
    fit_idx.sort_unstable();
    let folds = k_folds(fit_idx.len(), config.calibration_folds.max(1), request.seed ^ 0x5eed);

    let mut oof_raw = vec![0.0f32; fit_idx.len()];
    for (fold_idx, held_out) in folds.iter().enumerate() {
        let held_out_set: std::collections::HashSet<usize> = held_out.iter().copied().collect();
        let fold_train_idx: Vec<usize> =
            (0..fit_idx.len()).filter(|i| !held_out_set.contains(i)).collect();
        if fold_train_idx.is_empty() || held_out.is_empty() {
            continue;
        }
        let fold_x_train: Vec<Vec<f32>> = fold_train_idx.iter().map(|&i| vectors[fit_idx[i]].clone()).collect();
        let fold_y_train: Vec<bool> = fold_train_idx.iter().map(|&i| labels[fit_idx[i]]).collect();
        let fold_model = classifier::fit(
            request.model_type,
            n_features,
            &fold_x_train,
            &fold_y_train,
            &fold_x_train,
            &fold_y_train,
            request.seed.wrapping_add(fold_idx as u64 + 1),
        );
        for &i in held_out {
            oof_raw[i] = fold_model.predict_raw(&vectors[fit_idx[i]]);
        }
    }
    let oof_labels: Vec<bool> = fit_idx.iter().map(|&i| labels[i]).collect();
    let calibrator = Calibrator::fit(&oof_raw, &oof_labels);

    let raw_test: Vec<f32> = x_test.iter().map(|row| classifier.predict_raw(row)).collect();
    let calibrated_test: Vec<f32> = raw_test.iter().map(|&p| calibrator.apply(p)).collect();
    let metrics_raw = compute_metrics(&raw_test, &y_test, config.ece_bins);
    let metrics_calibrated = compute_metrics(&calibrated_test, &y_test, config.ece_bins);

    let d = request.assets.map(|a| a.embedding.d).unwrap_or(0);
    let feature_version =
        draftlab_core::FeatureVersion::compute(request.feature_mode.as_str(), request.attributes.n(), d).to_string();

    Ok(TrainedArtifact {
        bundle: ClassifierArtifact {
            classifier,
            calibrator,
            feature_mode: request.feature_mode,
            feature_version,
        },
        card: ModelCard {
            trained_at_unix: request.trained_at_unix,
            tier_group: request.tier_group,
            model_type: request.model_type,
            n_train: split.train.len(),
            n_val: split.validation.len(),
            n_test: split.test.len(),
            feature_dim: feature_dim(request.feature_mode, request.attributes.n(), d),
            source_patch: request.source_patch,
            metrics_raw,
            metrics_calibrated,
            gate_verdict: None,
        },
    })
}
