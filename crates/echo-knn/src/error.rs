/// Errors from feature-table construction and KNN fit/predict.
#[derive(Debug, thiserror::Error)]
pub enum KnnError {
    /// Returned when the neighbor count is zero.
    #[error("k must be at least 1, got {k}")]
    InvalidK {
        /// The invalid k value provided.
        k: usize,
    },

    /// Returned when `predict` is called before `fit`.
    #[error("classifier has not been fitted")]
    NotFitted,

    /// Returned when `fit` receives a table with zero rows.
    #[error("training set has zero samples")]
    EmptyTrainingSet,

    /// Returned when the label vector length differs from the table row count.
    #[error("feature table has {n_samples} rows but {n_labels} labels were given")]
    LabelCountMismatch {
        /// Number of rows in the feature table.
        n_samples: usize,
        /// Number of labels provided.
        n_labels: usize,
    },

    /// Returned when a feature table is built with zero columns.
    #[error("feature table has zero feature columns")]
    ZeroFeatures,

    /// Returned when a row has a different number of values than there are columns.
    #[error("row {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the row.
        got: usize,
        /// The zero-based index of the offending row.
        sample_index: usize,
    },

    /// Returned when a feature value is NaN or infinite.
    #[error("non-finite value at row {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending row.
        sample_index: usize,
        /// The zero-based index of the offending column.
        feature_index: usize,
    },

    /// Returned when a query point does not match the training schema.
    #[error("query has {got} features, classifier was fitted on {expected}")]
    PointFeatureMismatch {
        /// The number of features the classifier was fitted on.
        expected: usize,
        /// The number of features in the query.
        got: usize,
    },

    /// Returned when sample ids do not align with the table rows.
    #[error("feature table has {n_samples} rows but {n_ids} sample ids were given")]
    SampleIdCountMismatch {
        /// Number of rows in the feature table.
        n_samples: usize,
        /// Number of sample ids provided.
        n_ids: usize,
    },
}
