use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Train/validation/test index partition, stratified so each split keeps
/// the same positive-label proportion as the whole set (spec.md §4.5
/// step 3: "stratified 80/10/10 train/validation/test split on
/// `blue_win`").
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

pub fn stratified_split(labels: &[bool], seed: u64) -> Split {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut positives: Vec<usize> = (0..labels.len()).filter(|&i| labels[i]).collect();
    let mut negatives: Vec<usize> = (0..labels.len()).filter(|&i| !labels[i]).collect();
    positives.shuffle(&mut rng);
    negatives.shuffle(&mut rng);

    let mut train = Vec::new();
    let mut validation = Vec::new();
    let mut test = Vec::new();
    for group in [&positives, &negatives] {
        let n = group.len();
        let n_train = (n as f32 * 0.8).round() as usize;
        let n_val = (n as f32 * 0.1).round() as usize;
        train.extend_from_slice(&group[..n_train.min(n)]);
        validation.extend_from_slice(&group[n_train.min(n)..(n_train + n_val).min(n)]);
        test.extend_from_slice(&group[(n_train + n_val).min(n)..]);
    }
    train.shuffle(&mut rng);
    validation.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Split { train, validation, test }
}

/// Splits the training portion into `k` roughly-equal folds for
/// cross-validated out-of-fold calibration (spec.md §4.5 step 5).
pub fn k_folds(n: usize, k: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    let mut folds = vec![Vec::new(); k.max(1)];
    for (i, idx) in indices.into_iter().enumerate() {
        folds[i % k.max(1)].push(idx);
    }
    folds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_covers_every_index_exactly_once() {
        let labels: Vec<bool> = (0..100).map(|i| i % 3 == 0).collect();
        let split = stratified_split(&labels, 1);
        let mut all: Vec<usize> =
            split.train.iter().chain(&split.validation).chain(&split.test).copied().collect();
        all.sort();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn split_is_roughly_80_10_10() {
        let labels: Vec<bool> = (0..1000).map(|i| i % 2 == 0).collect();
        let split = stratified_split(&labels, 2);
        assert!((split.train.len() as f32 / 1000.0 - 0.8).abs() < 0.02);
        assert!((split.validation.len() as f32 / 1000.0 - 0.1).abs() < 0.02);
    }

    #[test]
    fn k_folds_cover_every_index_exactly_once() {
        let folds = k_folds(23, 5, 3);
        let mut all: Vec<usize> = folds.into_iter().flatten().collect();
        all.sort();
        assert_eq!(all, (0..23).collect::<Vec<_>>());
    }
}
