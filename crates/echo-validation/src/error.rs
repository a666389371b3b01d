use echo_knn::KnnError;

/// Errors from validation strategy configuration and split generation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Returned when test_size is not in (0.0, 1.0].
    #[error("test_size must be in (0.0, 1.0], got {test_size}")]
    InvalidTestSize {
        /// The invalid test_size value provided.
        test_size: f64,
    },

    /// Returned when n_iter is zero.
    #[error("n_iter must be at least 1, got {n_iter}")]
    InvalidIterationCount {
        /// The invalid n_iter value provided.
        n_iter: usize,
    },

    /// Returned when p is zero.
    #[error("p must be at least 1, got {p}")]
    InvalidP {
        /// The invalid p value provided.
        p: usize,
    },

    /// Returned when n_combinations is zero.
    #[error("n_combinations must be at least 1, got {n_combinations}")]
    InvalidCombinationCount {
        /// The invalid n_combinations value provided.
        n_combinations: usize,
    },

    /// Returned when n_splits is less than 2.
    #[error("n_splits must be at least 2, got {n_splits}")]
    InvalidSplitCount {
        /// The invalid n_splits value provided.
        n_splits: usize,
    },

    /// Returned when a split would leave no training rows.
    #[error("split leaves zero training rows: {n_test} of {n_samples} samples held out")]
    EmptyTrainingSet {
        /// Number of samples in the dataset.
        n_samples: usize,
        /// Number of samples assigned to the test set.
        n_test: usize,
    },

    /// Returned when p exceeds the number of samples.
    #[error("p ({p}) exceeds the number of samples ({n_samples})")]
    PExceedsSamples {
        /// The configured p.
        p: usize,
        /// Number of samples in the dataset.
        n_samples: usize,
    },

    /// Returned when the label vector does not align with the feature table.
    #[error("feature table has {n_samples} rows but {n_labels} labels were given")]
    LabelCountMismatch {
        /// Number of rows in the feature table.
        n_samples: usize,
        /// Number of labels provided.
        n_labels: usize,
    },

    /// Returned when a trial is built from sequences of different lengths.
    #[error("trial has {n_truth} ground-truth labels but {n_predicted} predictions")]
    TrialLengthMismatch {
        /// Length of the ground-truth sequence.
        n_truth: usize,
        /// Length of the predicted sequence.
        n_predicted: usize,
    },

    /// Wraps a classifier error raised while fitting or predicting a split.
    #[error("classifier error: {0}")]
    Knn(#[from] KnnError),
}
