//! Train/test index partitions and the shuffle-and-cut procedure shared by
//! holdout and random subsampling.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::ValidationError;

/// A partition of row indices into disjoint training and test sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Rows used to fit the classifier.
    pub train_indices: Vec<usize>,
    /// Rows held out for prediction, in evaluation order.
    pub test_indices: Vec<usize>,
}

impl Split {
    /// Build a split whose training set is every index in `0..n_samples` not in `test_indices`.
    ///
    /// Training indices come out in ascending order.
    #[must_use]
    pub fn complement_of(test_indices: Vec<usize>, n_samples: usize) -> Self {
        let mut held_out = vec![false; n_samples];
        for &i in &test_indices {
            held_out[i] = true;
        }
        let train_indices = (0..n_samples).filter(|&i| !held_out[i]).collect();
        Self {
            train_indices,
            test_indices,
        }
    }

    /// Return the number of training rows.
    #[must_use]
    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    /// Return the number of test rows.
    #[must_use]
    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }
}

/// Reject test fractions outside (0.0, 1.0]. NaN is rejected too.
pub(crate) fn validate_test_size(test_size: f64) -> Result<(), ValidationError> {
    if !(test_size > 0.0 && test_size <= 1.0) {
        return Err(ValidationError::InvalidTestSize { test_size });
    }
    Ok(())
}

/// `floor(n_samples * test_size)`.
pub(crate) fn test_count(n_samples: usize, test_size: f64) -> usize {
    (n_samples as f64 * test_size).floor() as usize
}

/// Shuffle all indices, take the first `floor(n * test_size)` as test and the rest as training.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTrainingSet`] when every row would be held out.
pub(crate) fn shuffle_split(
    n_samples: usize,
    test_size: f64,
    rng: &mut impl Rng,
) -> Result<Split, ValidationError> {
    let n_test = test_count(n_samples, test_size);
    if n_test >= n_samples {
        return Err(ValidationError::EmptyTrainingSet { n_samples, n_test });
    }
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(rng);
    let train_indices = indices.split_off(n_test);
    Ok(Split {
        train_indices,
        test_indices: indices,
    })
}
