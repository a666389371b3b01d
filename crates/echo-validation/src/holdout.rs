//! Holdout validation: one shuffled train/test split.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{instrument, warn};

use crate::error::ValidationError;
use crate::split::{Split, shuffle_split, validate_test_size};
use crate::strategy::ValidationStrategy;

/// Holdout configuration.
///
/// Construct via [`Holdout::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `k`       | 3       |
/// | `seed`    | 42      |
#[derive(Debug, Clone)]
pub struct Holdout {
    test_size: f64,
    k: usize,
    seed: u64,
}

impl Holdout {
    /// Create a holdout strategy holding out `floor(n * test_size)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTestSize`] if `test_size` is not in (0.0, 1.0].
    pub fn new(test_size: f64) -> Result<Self, ValidationError> {
        validate_test_size(test_size)?;
        Ok(Self {
            test_size,
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

    /// Return the test fraction.
    #[must_use]
    pub fn test_size(&self) -> f64 {
        self.test_size
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ValidationStrategy for Holdout {
    fn name(&self) -> &'static str {
        "holdout"
    }

    fn k(&self) -> usize {
        self.k
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTrainingSet`] when `floor(n * test_size) == n`,
    /// including the empty dataset.
    #[instrument(skip(self), fields(test_size = self.test_size))]
    fn splits(&self, n_samples: usize) -> Result<Vec<Split>, ValidationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let split = shuffle_split(n_samples, self.test_size, &mut rng)?;
        if split.test_indices.is_empty() {
            warn!(n_samples, "holdout split has zero test rows");
        }
        Ok(vec![split])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_knn::{FeatureTable, Label};

    fn dataset(n: usize) -> (FeatureTable, Vec<Label>) {
        let rows = (0..n).map(|i| vec![i as f64, (i % 2) as f64]).collect();
        let labels = (0..n).map(|i| Label::new((i % 2) as i64)).collect();
        (FeatureTable::from_rows(rows).unwrap(), labels)
    }

    #[test]
    fn invalid_test_size() {
        for bad in [0.0, -1.0, 1.5, f64::NAN] {
            assert!(matches!(
                Holdout::new(bad),
                Err(ValidationError::InvalidTestSize { .. })
            ));
        }
        assert!(Holdout::new(1.0).is_ok());
    }

    #[test]
    fn invalid_k() {
        let err = Holdout::new(0.2).unwrap().with_k(0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Knn(echo_knn::KnnError::InvalidK { k: 0 })
        ));
    }

    #[test]
    fn split_sizes_cover_dataset() {
        let cases = [
            (10, 0.2, 2),
            (17, 0.33, 5),
            (100, 0.5, 50),
            (3, 0.9, 2),
            (50, 0.01, 0),
        ];
        for (n, test_size, n_test) in cases {
            let splits = Holdout::new(test_size).unwrap().splits(n).unwrap();
            assert_eq!(splits.len(), 1);
            let split = &splits[0];
            assert_eq!(split.n_train() + split.n_test(), n);
            assert_eq!(split.n_test(), n_test, "n={n} test_size={test_size}");
            assert!(split.test_indices.iter().all(|i| !split.train_indices.contains(i)));
        }
    }

    #[test]
    fn full_test_size_is_config_error() {
        let (features, labels) = dataset(8);
        let err = Holdout::new(1.0)
            .unwrap()
            .generate_splits(&features, &labels)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::EmptyTrainingSet {
                n_samples: 8,
                n_test: 8
            }
        ));
    }

    #[test]
    fn single_sample_yields_empty_trial() {
        let (features, labels) = dataset(1);
        let trials = Holdout::new(0.5)
            .unwrap()
            .generate_splits(&features, &labels)
            .unwrap();
        assert_eq!(trials.len(), 1);
        assert!(trials[0].ground_truth().is_empty());
        assert!(trials[0].predicted().is_empty());
    }

    #[test]
    fn one_trial_with_test_sized_sequences() {
        let (features, labels) = dataset(20);
        let trials = Holdout::new(0.25)
            .unwrap()
            .generate_splits(&features, &labels)
            .unwrap();
        assert_eq!(trials.len(), 1);
        assert_eq!(trials[0].len(), 5);
    }

    #[test]
    fn same_seed_same_trials() {
        let (features, labels) = dataset(30);
        let holdout = Holdout::new(0.3).unwrap().with_seed(7);
        let a = holdout.generate_splits(&features, &labels).unwrap();
        let b = holdout.generate_splits(&features, &labels).unwrap();
        assert_eq!(a, b);
        assert_eq!(holdout.splits(30).unwrap(), holdout.splits(30).unwrap());
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        let a = Holdout::new(0.5).unwrap().with_seed(1).splits(40).unwrap();
        let b = Holdout::new(0.5).unwrap().with_seed(2).splits(40).unwrap();
        assert_ne!(a[0].test_indices, b[0].test_indices);
    }
}
