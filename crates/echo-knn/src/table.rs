//! Validated row-major feature table.

use crate::error::KnnError;

/// An ordered collection of fixed-length numeric rows with named columns.
///
/// Guarantees at least one column, every row exactly `n_features` long, and
/// all values finite. Zero rows is a valid (empty) table. Rows may carry an
/// optional sample id; `sample_ids[i]` corresponds to `rows[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
    sample_ids: Option<Vec<String>>,
}

impl FeatureTable {
    /// Create a new table, validating shape and finiteness.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::ZeroFeatures`] | `feature_names` is empty |
    /// | [`KnnError::FeatureCountMismatch`] | A row length differs from `feature_names.len()` |
    /// | [`KnnError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, KnnError> {
        let expected = feature_names.len();
        if expected == 0 {
            return Err(KnnError::ZeroFeatures);
        }
        for (sample_index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(KnnError::FeatureCountMismatch {
                    expected,
                    got: row.len(),
                    sample_index,
                });
            }
            if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
                return Err(KnnError::NonFiniteValue {
                    sample_index,
                    feature_index,
                });
            }
        }
        Ok(Self {
            feature_names,
            rows,
            sample_ids: None,
        })
    }

    /// Create a table with generated column names `x0, x1, ...`.
    ///
    /// The column count is taken from the first row. An empty `rows` yields
    /// [`KnnError::ZeroFeatures`] since no schema can be inferred.
    ///
    /// # Errors
    ///
    /// Same as [`FeatureTable::new`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, KnnError> {
        let n_features = rows.first().map_or(0, Vec::len);
        let names = (0..n_features).map(|i| format!("x{i}")).collect();
        Self::new(names, rows)
    }

    /// Attach sample ids to the rows.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::SampleIdCountMismatch`] if `ids.len() != n_samples()`.
    pub fn with_sample_ids(mut self, ids: Vec<String>) -> Result<Self, KnnError> {
        if ids.len() != self.rows.len() {
            return Err(KnnError::SampleIdCountMismatch {
                n_samples: self.rows.len(),
                n_ids: ids.len(),
            });
        }
        self.sample_ids = Some(ids);
        Ok(self)
    }

    /// Build a new table from the rows at `indices`, in that order.
    ///
    /// Column names are kept; sample ids follow their rows.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            sample_ids: self
                .sample_ids
                .as_ref()
                .map(|ids| indices.iter().map(|&i| ids[i].clone()).collect()),
        }
    }

    /// Return the column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the rows (row-major).
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Return a single row, if in bounds.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Return the sample ids, if any were attached.
    #[must_use]
    pub fn sample_ids(&self) -> Option<&[String]> {
        self.sample_ids.as_deref()
    }

    /// Return the number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Return true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
