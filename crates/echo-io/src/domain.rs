//! Domain types for echo-io.

use std::fmt;

use echo_knn::{FeatureTable, Label};

use crate::IoError;

/// Name of one run, used as the prefix of every report file it writes.
///
/// Restricted to ASCII letters, digits, `_` and `-` so it is always a safe
/// file-name component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Validate `name`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if `name` is empty or has a
    /// character outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-');
        if name.is_empty() || !name.chars().all(allowed) {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ExperimentName {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labelled dataset as read from disk, before missing values are handled.
///
/// Produced by [`DatasetReader`](crate::DatasetReader). `rows[i]`, `labels[i]`
/// and `sample_ids[i]` (when present) describe the same sample. A `None` cell
/// is a missing value.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub(crate) feature_names: Vec<String>,
    pub(crate) sample_ids: Option<Vec<String>>,
    pub(crate) rows: Vec<Vec<Option<f64>>>,
    pub(crate) labels: Vec<Label>,
}

impl RawDataset {
    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the sample ids, if the file had an id column.
    #[must_use]
    pub fn sample_ids(&self) -> Option<&[String]> {
        self.sample_ids.as_deref()
    }

    /// Return the feature cells (row-major).
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    /// Return the raw labels.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Return the number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Return the number of missing cells.
    #[must_use]
    pub fn n_missing(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_none()).count()
    }
}

/// A complete dataset with every cell present, ready for scaling and label mapping.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub(crate) feature_names: Vec<String>,
    pub(crate) sample_ids: Option<Vec<String>>,
    pub(crate) rows: Vec<Vec<f64>>,
    pub(crate) labels: Vec<Label>,
}

impl PreparedDataset {
    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the sample ids, if any.
    #[must_use]
    pub fn sample_ids(&self) -> Option<&[String]> {
        self.sample_ids.as_deref()
    }

    /// Return the feature matrix (row-major).
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Return the labels.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Return the number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Convert into a validated [`FeatureTable`] and its label vector.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Table`] if the table fails validation (for example
    /// a scaled value that is not finite).
    pub fn into_parts(self) -> Result<(FeatureTable, Vec<Label>), IoError> {
        let mut table = FeatureTable::new(self.feature_names, self.rows)?;
        if let Some(ids) = self.sample_ids {
            table = table.with_sample_ids(ids)?;
        }
        Ok((table, self.labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_names() {
        let name: ExperimentName = "wbc-knn_01".parse().unwrap();
        assert_eq!(name.to_string(), "wbc-knn_01");

        for bad in ["", "../breast cancer", "kfold.v2", "ü"] {
            assert!(
                matches!(
                    bad.parse::<ExperimentName>(),
                    Err(IoError::InvalidExperimentName { ref name }) if name == bad
                ),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn missing_cells_are_counted() {
        let raw = RawDataset {
            feature_names: vec!["a".into(), "b".into()],
            sample_ids: None,
            rows: vec![vec![Some(1.0), None], vec![None, None]],
            labels: vec![Label::new(2), Label::new(4)],
        };
        assert_eq!(raw.n_missing(), 3);
        assert_eq!(raw.n_samples(), 2);
        assert_eq!(raw.n_features(), 2);
    }

    #[test]
    fn prepared_into_parts_keeps_ids() {
        let prepared = PreparedDataset {
            feature_names: vec!["a".into()],
            sample_ids: Some(vec!["s1".into(), "s2".into()]),
            rows: vec![vec![0.0], vec![1.0]],
            labels: vec![Label::NEGATIVE, Label::POSITIVE],
        };
        let (table, labels) = prepared.into_parts().unwrap();
        assert_eq!(table.n_samples(), 2);
        assert_eq!(table.sample_ids().unwrap(), &["s1", "s2"]);
        assert_eq!(labels, vec![Label::NEGATIVE, Label::POSITIVE]);
    }
}
