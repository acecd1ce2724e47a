use serde::Deserialize;
use serde::Serialize;

/// ROC-AUC, log-loss, Brier score, and ECE over one scored set (spec.md
/// §4.5 step 6). Computed identically for raw and calibrated scores —
/// the caller decides which probabilities to pass in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub roc_auc: f32,
    pub log_loss: f32,
    pub brier: f32,
    pub ece: f32,
}

/// `probs[i]` is the predicted P(blue wins) for example `i`; `labels[i]`
/// is whether blue actually won. Panics if the slices differ in length
/// or are empty — the caller always has a matched, non-empty test set.
pub fn compute_metrics(probs: &[f32], labels: &[bool], ece_bins: usize) -> Metrics {
    assert_eq!(probs.len(), labels.len());
    assert!(!probs.is_empty());
    Metrics {
        roc_auc: roc_auc(probs, labels),
        log_loss: log_loss(probs, labels),
        brier: brier(probs, labels),
        ece: expected_calibration_error(probs, labels, ece_bins),
    }
}

/// Mann-Whitney U form of ROC-AUC: the probability a random positive
/// outranks a random negative, via rank-sum (ties split evenly).
pub fn roc_auc(probs: &[f32], labels: &[bool]) -> f32 {
    let n_pos = labels.iter().filter(|&&y| y).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }
    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| probs[a].partial_cmp(&probs[b]).unwrap());

    let mut ranks = vec![0.0f32; probs.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && probs[order[j + 1]] == probs[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f32 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f32 = labels.iter().zip(&ranks).filter(|(&y, _)| y).map(|(_, &r)| r).sum();
    let u = rank_sum_pos - (n_pos as f32 * (n_pos as f32 + 1.0)) / 2.0;
    u / (n_pos as f32 * n_neg as f32)
}

const EPS: f32 = 1e-7;

pub fn log_loss(probs: &[f32], labels: &[bool]) -> f32 {
    let sum: f32 = probs
        .iter()
        .zip(labels)
        .map(|(&p, &y)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            if y { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    sum / probs.len() as f32
}

pub fn brier(probs: &[f32], labels: &[bool]) -> f32 {
    let sum: f32 = probs.iter().zip(labels).map(|(&p, &y)| (p - if y { 1.0 } else { 0.0 }).powi(2)).sum();
    sum / probs.len() as f32
}

/// Expected Calibration Error over `bins` equal-width buckets of
/// predicted probability (spec.md §4.5 step 6, default 10 bins).
pub fn expected_calibration_error(probs: &[f32], labels: &[bool], bins: usize) -> f32 {
    let bins = bins.max(1);
    let mut bin_count = vec![0usize; bins];
    let mut bin_conf = vec![0.0f32; bins];
    let mut bin_acc = vec![0.0f32; bins];

    for (&p, &y) in probs.iter().zip(labels) {
        let idx = ((p.clamp(0.0, 1.0) * bins as f32) as usize).min(bins - 1);
        bin_count[idx] += 1;
        bin_conf[idx] += p;
        bin_acc[idx] += if y { 1.0 } else { 0.0 };
    }

    let n = probs.len() as f32;
    let mut ece = 0.0f32;
    for b in 0..bins {
        if bin_count[b] == 0 {
            continue;
        }
        let count = bin_count[b] as f32;
        let avg_conf = bin_conf[b] / count;
        let avg_acc = bin_acc[b] / count;
        ece += (count / n) * (avg_conf - avg_acc).abs();
    }
    ece
}
