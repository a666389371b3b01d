//! K-fold cross-validation over contiguous blocks of a shuffled index sequence.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::error::ValidationError;
use crate::split::Split;
use crate::strategy::ValidationStrategy;

/// K-fold configuration.
///
/// Indices are shuffled once and cut into `n_splits` blocks of
/// `n_samples / n_splits` rows. Each block is the test set of one fold and
/// its complement is the training set. The trailing `n_samples % n_splits`
/// shuffled rows belong to no block: they are never tested but train every
/// fold. With fewer rows than folds every block is empty, so each fold is a
/// trial with no test rows.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `k`       | 3       |
/// | `seed`    | 42      |
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    k: usize,
    seed: u64,
}

impl KFold {
    /// Create a k-fold strategy with `n_splits` folds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSplitCount`] if `n_splits` < 2.
    pub fn new(n_splits: usize) -> Result<Self, ValidationError> {
        if n_splits < 2 {
            return Err(ValidationError::InvalidSplitCount { n_splits });
        }
        Ok(Self {
            n_splits,
            k: 3,
            seed: 42,
        })
    }

    /// Set the classifier neighbor count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Knn`] wrapping `InvalidK` if `k` is zero.
    pub fn with_k(mut self, k: usize) -> Result<Self, ValidationError> {
        echo_knn::KnnClassifier::new(k)?;
        self.k = k;
        Ok(self)
    }

    /// Set the random seed for the shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of folds.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ValidationStrategy for KFold {
    fn name(&self) -> &'static str {
        "k_fold"
    }

    fn k(&self) -> usize {
        self.k
    }

    /// Always returns `n_splits` splits; when `n_samples < n_splits` their
    /// test sets are empty.
    #[instrument(skip(self), fields(n_splits = self.n_splits))]
    fn splits(&self, n_samples: usize) -> Result<Vec<Split>, ValidationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut shuffled: Vec<usize> = (0..n_samples).collect();
        shuffled.shuffle(&mut rng);

        let fold_size = n_samples / self.n_splits;
        debug!(fold_size, never_tested = n_samples % self.n_splits, "folds laid out");

        if fold_size == 0 {
            return Ok((0..self.n_splits)
                .map(|_| Split::complement_of(Vec::new(), n_samples))
                .collect());
        }

        Ok(shuffled
            .chunks_exact(fold_size)
            .take(self.n_splits)
            .map(|block| Split::complement_of(block.to_vec(), n_samples))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_knn::{FeatureTable, Label};

    fn dataset(n: usize) -> (FeatureTable, Vec<Label>) {
        let rows = (0..n).map(|i| vec![(i % 2) as f64 * 4.0, i as f64 * 0.05]).collect();
        let labels = (0..n).map(|i| Label::new((i % 2) as i64)).collect();
        (FeatureTable::from_rows(rows).unwrap(), labels)
    }

    #[test]
    fn invalid_fold_count() {
        assert!(matches!(
            KFold::new(0),
            Err(ValidationError::InvalidSplitCount { n_splits: 0 })
        ));
        assert!(matches!(
            KFold::new(1),
            Err(ValidationError::InvalidSplitCount { n_splits: 1 })
        ));
    }

    #[test]
    fn fewer_rows_than_folds_gives_empty_trials() {
        let (features, labels) = dataset(3);
        let trials = KFold::new(5)
            .unwrap()
            .generate_splits(&features, &labels)
            .unwrap();
        assert_eq!(trials.len(), 5);
        assert!(trials.iter().all(|t| t.is_empty()));

        let splits = KFold::new(5).unwrap().splits(3).unwrap();
        assert!(splits.iter().all(|s| s.n_test() == 0 && s.train_indices == vec![0, 1, 2]));

        let empty = FeatureTable::new(vec!["x".into()], vec![]).unwrap();
        let trials = KFold::new(2)
            .unwrap()
            .generate_splits(&empty, &[])
            .unwrap();
        assert_eq!(trials.len(), 2);
        assert!(trials.iter().all(|t| t.is_empty()));
    }

    #[test]
    fn blocks_are_disjoint_and_remainder_never_tested() {
        let n = 23;
        let n_splits = 5;
        let splits = KFold::new(n_splits).unwrap().splits(n).unwrap();
        assert_eq!(splits.len(), n_splits);

        let mut tested = vec![0usize; n];
        for split in &splits {
            assert_eq!(split.n_test(), n / n_splits);
            assert_eq!(split.n_train(), n - n / n_splits);
            for &i in &split.test_indices {
                tested[i] += 1;
            }
        }
        assert!(tested.iter().all(|&c| c <= 1), "a row appeared in two test blocks");
        assert_eq!(tested.iter().filter(|&&c| c == 0).count(), n % n_splits);
    }

    #[test]
    fn training_is_block_complement() {
        let splits = KFold::new(3).unwrap().splits(10).unwrap();
        for split in &splits {
            let mut all: Vec<usize> = split
                .train_indices
                .iter()
                .chain(&split.test_indices)
                .copied()
                .collect();
            all.sort_unstable();
            assert_eq!(all, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn divisible_dataset_tests_every_row_once() {
        let splits = KFold::new(4).unwrap().splits(20).unwrap();
        let mut tested: Vec<usize> = splits.iter().flat_map(|s| s.test_indices.clone()).collect();
        tested.sort_unstable();
        assert_eq!(tested, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn one_trial_per_fold() {
        let (features, labels) = dataset(30);
        let trials = KFold::new(5)
            .unwrap()
            .generate_splits(&features, &labels)
            .unwrap();
        assert_eq!(trials.len(), 5);
        assert!(trials.iter().all(|t| t.len() == 6));
    }

    #[test]
    fn same_seed_same_trials() {
        let (features, labels) = dataset(17);
        let kfold = KFold::new(4).unwrap().with_seed(99);
        assert_eq!(
            kfold.generate_splits(&features, &labels).unwrap(),
            kfold.generate_splits(&features, &labels).unwrap()
        );
    }
}
