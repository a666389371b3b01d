//! K-nearest-neighbors classifier: fit, single-point and batch prediction.

use std::collections::HashMap;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::distance::{Neighbor, euclidean};
use crate::error::KnnError;
use crate::label::Label;
use crate::table::FeatureTable;

#[derive(Debug, Clone)]
struct TrainingSet {
    features: FeatureTable,
    labels: Vec<Label>,
}

/// A k-nearest-neighbors classifier using Euclidean distance.
///
/// Construct via [`KnnClassifier::new`] (or [`Default`], `k = 3`), then call
/// [`fit`](Self::fit) before predicting.
///
/// Neighbor selection is a stable sort by distance: rows at equal distance
/// keep their training order. When two or more labels share the highest vote
/// count, the tied label carried by the earliest training row among the
/// selected neighbors wins.
///
/// A fitted classifier is read-only during prediction and can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    training: Option<TrainingSet>,
}

impl Default for KnnClassifier {
    fn default() -> Self {
        Self { k: 3, training: None }
    }
}

impl KnnClassifier {
    /// Create an unfitted classifier consulting `k` neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::InvalidK`] if `k` is zero.
    pub fn new(k: usize) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK { k });
        }
        Ok(Self { k, training: None })
    }

    /// Store the training set. Replaces any previous fit.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::LabelCountMismatch`] | `labels.len() != features.n_samples()` |
    /// | [`KnnError::EmptyTrainingSet`] | `features` has zero rows |
    #[instrument(skip_all, fields(k = self.k, n_train = features.n_samples()))]
    pub fn fit(&mut self, features: FeatureTable, labels: Vec<Label>) -> Result<(), KnnError> {
        if labels.len() != features.n_samples() {
            return Err(KnnError::LabelCountMismatch {
                n_samples: features.n_samples(),
                n_labels: labels.len(),
            });
        }
        if features.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        debug!(n_features = features.n_features(), "classifier fitted");
        self.training = Some(TrainingSet { features, labels });
        Ok(())
    }

    /// Return the `min(k, n_train)` training rows nearest to `point`, closest first.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::NotFitted`] | [`fit`](Self::fit) was not called |
    /// | [`KnnError::PointFeatureMismatch`] | `point.len()` differs from the training schema |
    pub fn neighbors(&self, point: &[f64]) -> Result<Vec<Neighbor>, KnnError> {
        let training = self.training()?;
        self.check_width(training, point.len())?;
        Ok(nearest(training, point, self.k))
    }

    /// Predict the label of a single point by majority vote of its `k` nearest rows.
    ///
    /// # Errors
    ///
    /// Same as [`neighbors`](Self::neighbors).
    pub fn predict(&self, point: &[f64]) -> Result<Label, KnnError> {
        let training = self.training()?;
        self.check_width(training, point.len())?;
        let neighbors = nearest(training, point, self.k);
        Ok(majority_vote(&neighbors, &training.labels))
    }

    /// Predict every row of `points` in parallel.
    ///
    /// The output is aligned with the input rows.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::NotFitted`] | [`fit`](Self::fit) was not called |
    /// | [`KnnError::PointFeatureMismatch`] | `points` has a different column count than the training schema |
    pub fn predict_batch(&self, points: &FeatureTable) -> Result<Vec<Label>, KnnError> {
        let training = self.training()?;
        self.check_width(training, points.n_features())?;
        Ok(points
            .rows()
            .par_iter()
            .map(|row| majority_vote(&nearest(training, row, self.k), &training.labels))
            .collect())
    }

    /// Return the configured neighbor count.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return true once [`fit`](Self::fit) has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.training.is_some()
    }

    /// Return the number of training rows, or zero if unfitted.
    #[must_use]
    pub fn n_train(&self) -> usize {
        self.training.as_ref().map_or(0, |t| t.features.n_samples())
    }

    /// Return the training column count, if fitted.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.training.as_ref().map(|t| t.features.n_features())
    }

    fn training(&self) -> Result<&TrainingSet, KnnError> {
        self.training.as_ref().ok_or(KnnError::NotFitted)
    }

    fn check_width(&self, training: &TrainingSet, got: usize) -> Result<(), KnnError> {
        let expected = training.features.n_features();
        if got != expected {
            return Err(KnnError::PointFeatureMismatch { expected, got });
        }
        Ok(())
    }
}

/// Stable sort of all training rows by distance, truncated to `k`.
fn nearest(training: &TrainingSet, point: &[f64], k: usize) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = training
        .features
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| Neighbor {
            index,
            distance: euclidean(point, row),
        })
        .collect();
    // `sort_by` is stable, so equal distances keep training order.
    neighbors.sort_by(Neighbor::cmp_distance);
    neighbors.truncate(k);
    neighbors
}

/// Most frequent label among `neighbors`; ties go to the earliest training row.
fn majority_vote(neighbors: &[Neighbor], labels: &[Label]) -> Label {
    let mut counts: HashMap<Label, usize> = HashMap::new();
    for n in neighbors {
        *counts.entry(labels[n.index]).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);

    neighbors
        .iter()
        .filter(|n| counts[&labels[n.index]] == max_count)
        .min_by_key(|n| n.index)
        .map(|n| labels[n.index])
        .unwrap_or(Label::NEGATIVE)
}
