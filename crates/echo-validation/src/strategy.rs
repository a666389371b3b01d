//! The shared validation contract and the closed set of strategies.

use echo_knn::{FeatureTable, KnnClassifier, Label};
use tracing::{debug, info};

use crate::error::ValidationError;
use crate::holdout::Holdout;
use crate::kfold::KFold;
use crate::leave_p_out::LeavePOut;
use crate::split::Split;
use crate::subsampling::RandomSubsampling;
use crate::trial::Trial;

/// A resampling policy that evaluates the KNN classifier over generated splits.
///
/// Implementors only decide how row indices are partitioned
/// ([`splits`](Self::splits)); [`generate_splits`](Self::generate_splits) fits
/// a fresh classifier per split and records one [`Trial`] each.
pub trait ValidationStrategy {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Neighbor count for the classifier fitted on each split.
    fn k(&self) -> usize;

    /// Partition `0..n_samples` into train/test splits.
    ///
    /// Deterministic for a given strategy value: the generator is reseeded on
    /// every call.
    ///
    /// # Errors
    ///
    /// Strategy-specific configuration errors that depend on `n_samples`.
    fn splits(&self, n_samples: usize) -> Result<Vec<Split>, ValidationError>;

    /// Evaluate the classifier on every split of `features`/`labels`.
    ///
    /// Returns one [`Trial`] per split, in split order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ValidationError::LabelCountMismatch`] | `labels.len() != features.n_samples()` |
    /// | Strategy errors | From [`splits`](Self::splits) |
    /// | [`ValidationError::Knn`] | Classifier fit/predict failure |
    fn generate_splits(
        &self,
        features: &FeatureTable,
        labels: &[Label],
    ) -> Result<Vec<Trial>, ValidationError> {
        let n_samples = check_labels(features, labels)?;
        evaluate(self, features, labels, self.splits(n_samples)?)
    }
}

/// Return the row count of `features`, or an error if `labels` does not match it.
pub(crate) fn check_labels(
    features: &FeatureTable,
    labels: &[Label],
) -> Result<usize, ValidationError> {
    let n_samples = features.n_samples();
    if labels.len() != n_samples {
        return Err(ValidationError::LabelCountMismatch {
            n_samples,
            n_labels: labels.len(),
        });
    }
    Ok(n_samples)
}

/// Run one trial per split as the splits are produced.
pub(crate) fn evaluate<S, I>(
    strategy: &S,
    features: &FeatureTable,
    labels: &[Label],
    splits: I,
) -> Result<Vec<Trial>, ValidationError>
where
    S: ValidationStrategy + ?Sized,
    I: IntoIterator<Item = Split>,
{
    let trials = splits
        .into_iter()
        .enumerate()
        .map(|(trial, split)| {
            debug!(
                strategy = strategy.name(),
                trial,
                n_train = split.n_train(),
                n_test = split.n_test(),
                "evaluating split"
            );
            run_trial(features, labels, &split, strategy.k())
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        strategy = strategy.name(),
        n_samples = features.n_samples(),
        n_trials = trials.len(),
        "validation complete"
    );
    Ok(trials)
}

/// Fit a fresh classifier on the split's training rows and predict its test rows.
///
/// A split with no test rows yields an empty trial without consulting the classifier.
pub(crate) fn run_trial(
    features: &FeatureTable,
    labels: &[Label],
    split: &Split,
    k: usize,
) -> Result<Trial, ValidationError> {
    let ground_truth: Vec<Label> = split.test_indices.iter().map(|&i| labels[i]).collect();
    if ground_truth.is_empty() {
        return Ok(Trial::empty());
    }

    let train_labels: Vec<Label> = split.train_indices.iter().map(|&i| labels[i]).collect();
    let mut knn = KnnClassifier::new(k)?;
    knn.fit(features.select(&split.train_indices), train_labels)?;
    let predicted = knn.predict_batch(&features.select(&split.test_indices))?;

    Trial::new(ground_truth, predicted)
}

/// One of the four validation strategies, chosen at configuration time.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Single shuffled train/test split.
    Holdout(Holdout),
    /// Repeated independent holdout splits.
    RandomSubsampling(RandomSubsampling),
    /// Every (or a sample of) size-p test subsets.
    LeavePOut(LeavePOut),
    /// Contiguous blocks of a shuffled index sequence.
    KFold(KFold),
}

impl Strategy {
    fn inner(&self) -> &dyn ValidationStrategy {
        match self {
            Self::Holdout(s) => s,
            Self::RandomSubsampling(s) => s,
            Self::LeavePOut(s) => s,
            Self::KFold(s) => s,
        }
    }
}

impl ValidationStrategy for Strategy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn k(&self) -> usize {
        self.inner().k()
    }

    fn splits(&self, n_samples: usize) -> Result<Vec<Split>, ValidationError> {
        self.inner().splits(n_samples)
    }

    fn generate_splits(
        &self,
        features: &FeatureTable,
        labels: &[Label],
    ) -> Result<Vec<Trial>, ValidationError> {
        self.inner().generate_splits(features, labels)
    }
}

impl From<Holdout> for Strategy {
    fn from(s: Holdout) -> Self {
        Self::Holdout(s)
    }
}

impl From<RandomSubsampling> for Strategy {
    fn from(s: RandomSubsampling) -> Self {
        Self::RandomSubsampling(s)
    }
}

impl From<LeavePOut> for Strategy {
    fn from(s: LeavePOut) -> Self {
        Self::LeavePOut(s)
    }
}

impl From<KFold> for Strategy {
    fn from(s: KFold) -> Self {
        Self::KFold(s)
    }
}
