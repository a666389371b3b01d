//! Leave-p-out cross-validation, exhaustive or over sampled combinations.

use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use echo_knn::{FeatureTable, Label};
use tracing::{debug, instrument};

use crate::error::ValidationError;
use crate::split::Split;
use crate::strategy::{ValidationStrategy, check_labels, evaluate};
use crate::trial::Trial;

/// Leave-p-out configuration.
///
/// In exhaustive mode (the default) every size-`p` subset of rows is held
/// out once, in lexicographic order. With
/// [`with_n_combinations`](Self::with_n_combinations) the strategy instead
/// draws that many independent uniform subsets; the same subset may be
/// drawn more than once.
///
/// [`generate_splits`](ValidationStrategy::generate_splits) produces splits
/// one at a time, so only the trials are held in memory. [`splits`] collects
/// every split at once and grows as C(n, p) times n.
///
/// [`splits`]: ValidationStrategy::splits
///
/// # Defaults
///
/// | Parameter        | Default      |
/// |------------------|--------------|
/// | `n_combinations` | `None` (all) |
/// | `k`              | 3            |
/// | `seed`           | 42           |
#[derive(Debug, Clone)]
pub struct LeavePOut {
    p: usize,
    n_combinations: Option<usize>,
    k: usize,
    seed: u64,
}

impl LeavePOut {
    /// Create an exhaustive leave-`p`-out strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidP`] if `p` is zero.
    pub fn new(p: usize) -> Result<Self, ValidationError> {
        if p == 0 {
            return Err(ValidationError::InvalidP { p });
        }
        Ok(Self {
            p,
            n_combinations: None,
            k: 3,
            seed: 42,
        })
    }

    /// Switch to sampling mode with `n_combinations` random draws.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCombinationCount`] if `n_combinations` is zero.
    pub fn with_n_combinations(mut self, n_combinations: usize) -> Result<Self, ValidationError> {
        if n_combinations == 0 {
            return Err(ValidationError::InvalidCombinationCount { n_combinations });
        }
        self.n_combinations = Some(n_combinations);
        Ok(self)
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

    /// Set the random seed used in sampling mode.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of rows held out per trial.
    #[must_use]
    pub fn p(&self) -> usize {
        self.p
    }

    /// Return the sampled combination count, or `None` in exhaustive mode.
    #[must_use]
    pub fn n_combinations(&self) -> Option<usize> {
        self.n_combinations
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Lazily produce the splits for `n_samples` rows.
    fn split_iter(
        &self,
        n_samples: usize,
    ) -> Result<Box<dyn Iterator<Item = Split>>, ValidationError> {
        if n_samples == 0 {
            return Ok(Box::new(std::iter::empty()));
        }
        if self.p > n_samples {
            return Err(ValidationError::PExceedsSamples {
                p: self.p,
                n_samples,
            });
        }
        if self.p == n_samples {
            return Err(ValidationError::EmptyTrainingSet {
                n_samples,
                n_test: self.p,
            });
        }

        let p = self.p;
        Ok(match self.n_combinations {
            None => {
                debug!(expected = ?binomial(n_samples, p), "enumerating all combinations");
                Box::new(
                    Combinations::new(n_samples, p)
                        .map(move |test| Split::complement_of(test, n_samples)),
                )
            }
            Some(n_draws) => {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
                Box::new((0..n_draws).map(move |_| {
                    let mut test = index::sample(&mut rng, n_samples, p).into_vec();
                    test.sort_unstable();
                    Split::complement_of(test, n_samples)
                }))
            }
        })
    }
}

impl ValidationStrategy for LeavePOut {
    fn name(&self) -> &'static str {
        "leave_p_out"
    }

    fn k(&self) -> usize {
        self.k
    }

    /// An empty dataset yields no splits.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ValidationError::PExceedsSamples`] | `p > n_samples` on a non-empty dataset |
    /// | [`ValidationError::EmptyTrainingSet`] | `p == n_samples` |
    #[instrument(skip(self), fields(p = self.p, n_combinations = ?self.n_combinations))]
    fn splits(&self, n_samples: usize) -> Result<Vec<Split>, ValidationError> {
        Ok(self.split_iter(n_samples)?.collect())
    }

    /// Evaluates each combination as it is enumerated; splits are not collected.
    #[instrument(skip_all, fields(p = self.p, n_samples = features.n_samples()))]
    fn generate_splits(
        &self,
        features: &FeatureTable,
        labels: &[Label],
    ) -> Result<Vec<Trial>, ValidationError> {
        let n_samples = check_labels(features, labels)?;
        evaluate(self, features, labels, self.split_iter(n_samples)?)
    }
}

/// Lexicographic iterator over the size-`p` subsets of `0..n`.
///
/// Yields `[0, 1, .., p-1]` first and `[n-p, .., n-1]` last; nothing when `p > n`.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    current: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    /// Create the iterator over size-`p` subsets of `0..n`.
    #[must_use]
    pub fn new(n: usize, p: usize) -> Self {
        Self {
            n,
            current: (0..p).collect(),
            started: false,
            done: p > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current.clone());
        }

        let p = self.current.len();
        // Rightmost position that can still be incremented.
        let Some(i) = (0..p).rev().find(|&i| self.current[i] < self.n - p + i) else {
            self.done = true;
            return None;
        };
        self.current[i] += 1;
        for j in i + 1..p {
            self.current[j] = self.current[j - 1] + 1;
        }
        Some(self.current.clone())
    }
}

/// Binomial coefficient C(n, k), or `None` on overflow.
#[must_use]
pub fn binomial(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // Exact at every step: result * (n - i) is divisible by (i + 1).
        result = result.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    Some(result)
}
