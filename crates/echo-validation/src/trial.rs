//! Ground-truth and predicted labels for one split's test rows.

use echo_knn::Label;

use crate::error::ValidationError;

/// One (ground truth, predicted) pair of equal-length label sequences.
///
/// Produced per split by a validation strategy; `ground_truth[i]` and
/// `predicted[i]` describe the same test row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    ground_truth: Vec<Label>,
    predicted: Vec<Label>,
}

impl Trial {
    /// Build a trial from two aligned label sequences.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TrialLengthMismatch`] if the lengths differ.
    pub fn new(ground_truth: Vec<Label>, predicted: Vec<Label>) -> Result<Self, ValidationError> {
        if ground_truth.len() != predicted.len() {
            return Err(ValidationError::TrialLengthMismatch {
                n_truth: ground_truth.len(),
                n_predicted: predicted.len(),
            });
        }
        Ok(Self {
            ground_truth,
            predicted,
        })
    }

    /// Build a trial from raw integer labels.
    ///
    /// # Errors
    ///
    /// Same as [`Trial::new`].
    pub fn from_values(ground_truth: &[i64], predicted: &[i64]) -> Result<Self, ValidationError> {
        Self::new(
            ground_truth.iter().copied().map(Label::new).collect(),
            predicted.iter().copied().map(Label::new).collect(),
        )
    }

    /// A trial with no test rows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ground_truth: Vec::new(),
            predicted: Vec::new(),
        }
    }

    /// Return the ground-truth labels.
    #[must_use]
    pub fn ground_truth(&self) -> &[Label] {
        &self.ground_truth
    }

    /// Return the predicted labels.
    #[must_use]
    pub fn predicted(&self) -> &[Label] {
        &self.predicted
    }

    /// Iterate over (ground truth, predicted) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (Label, Label)> + '_ {
        self.ground_truth
            .iter()
            .copied()
            .zip(self.predicted.iter().copied())
    }

    /// Return the number of test rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ground_truth.len()
    }

    /// Return true if the trial has no test rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ground_truth.is_empty()
    }

    /// Consume the trial and return `(ground_truth, predicted)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Label>, Vec<Label>) {
        (self.ground_truth, self.predicted)
    }
}
