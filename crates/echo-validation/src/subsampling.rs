//! Random subsampling: repeated independent holdout splits.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::instrument;

use crate::error::ValidationError;
use crate::split::{Split, shuffle_split, test_count, validate_test_size};
use crate::strategy::ValidationStrategy;

/// Random subsampling configuration.
///
/// Every iteration reshuffles all rows from the same generator stream, so
/// test sets of different iterations may overlap.
///
/// # Defaults
///
/// | Parameter   | Default |
/// |-------------|---------|
/// | `n_iter`    | 10      |
/// | `test_size` | 0.2     |
/// | `k`         | 3       |
/// | `seed`      | 42      |
#[derive(Debug, Clone)]
pub struct RandomSubsampling {
    n_iter: usize,
    test_size: f64,
    k: usize,
    seed: u64,
}

impl Default for RandomSubsampling {
    fn default() -> Self {
        Self {
            n_iter: 10,
            test_size: 0.2,
            k: 3,
            seed: 42,
        }
    }
}

impl RandomSubsampling {
    /// Create a strategy running `n_iter` holdout splits of `test_size`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ValidationError::InvalidIterationCount`] | `n_iter` is zero |
    /// | [`ValidationError::InvalidTestSize`] | `test_size` is not in (0.0, 1.0] |
    pub fn new(n_iter: usize, test_size: f64) -> Result<Self, ValidationError> {
        if n_iter == 0 {
            return Err(ValidationError::InvalidIterationCount { n_iter });
        }
        validate_test_size(test_size)?;
        Ok(Self {
            n_iter,
            test_size,
            ..Self::default()
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

    /// Set the random seed for the shuffles.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of iterations.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
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

impl ValidationStrategy for RandomSubsampling {
    fn name(&self) -> &'static str {
        "random_subsampling"
    }

    fn k(&self) -> usize {
        self.k
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTrainingSet`] when `floor(n * test_size) == n`.
    #[instrument(skip(self), fields(n_iter = self.n_iter, test_size = self.test_size))]
    fn splits(&self, n_samples: usize) -> Result<Vec<Split>, ValidationError> {
        let n_test = test_count(n_samples, self.test_size);
        if n_test >= n_samples {
            return Err(ValidationError::EmptyTrainingSet { n_samples, n_test });
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.n_iter)
            .map(|_| shuffle_split(n_samples, self.test_size, &mut rng))
            .collect()
    }
}
