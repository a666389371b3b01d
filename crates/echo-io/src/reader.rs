//! Delimited dataset reader with missing-value detection.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use echo_knn::Label;
use tracing::{debug, info, instrument, warn};

use crate::IoError;
use crate::domain::RawDataset;

/// Reads a labelled dataset from a delimited text file.
///
/// Expected format:
/// - Header row required.
/// - One label column holding integer class labels.
/// - An optional id column; rows repeating an earlier id are dropped.
/// - Every other column is a numeric feature. Empty or non-numeric cells
///   (such as `?`) are read as missing.
///
/// The delimiter follows the extension: `csv` and `txt` are comma-separated,
/// `tsv` is tab-separated.
///
/// # Defaults
///
/// | Parameter      | Default               |
/// |----------------|-----------------------|
/// | `label_column` | `"classtype_v1"`      |
/// | `id_column`    | `"Sample code number"`|
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::UnsupportedFormat`] | Extension is not csv, txt or tsv |
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed record |
/// | [`IoError::MissingColumn`] | Label column absent from the header |
/// | [`IoError::NoFeatureColumns`] | No columns besides id and label |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidLabel`] | Label cell is not an integer |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
#[derive(Debug, Clone)]
pub struct DatasetReader {
    path: PathBuf,
    label_column: String,
    id_column: Option<String>,
}

impl DatasetReader {
    /// Create a new reader for the given file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            label_column: "classtype_v1".to_string(),
            id_column: Some("Sample code number".to_string()),
        }
    }

    /// Set the label column name.
    #[must_use]
    pub fn with_label_column(mut self, name: impl Into<String>) -> Self {
        self.label_column = name.into();
        self
    }

    /// Set the id column name, or `None` to treat every non-label column as a feature.
    ///
    /// A configured id column that is absent from the header is ignored.
    #[must_use]
    pub fn with_id_column(mut self, name: Option<String>) -> Self {
        self.id_column = name;
        self
    }

    fn delimiter(&self) -> Result<u8, IoError> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" | "txt" => Ok(b','),
            "tsv" => Ok(b'\t'),
            _ => Err(IoError::UnsupportedFormat {
                path: self.path.clone(),
                extension,
            }),
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    /// Read the file, returning a [`RawDataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<RawDataset, IoError> {
        let delimiter = self.delimiter()?;
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so a short row reports InconsistentRowLength rather
        // than a bare CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();

        let label_index = header
            .iter()
            .position(|h| h.trim() == self.label_column)
            .ok_or_else(|| IoError::MissingColumn {
                path: self.path.clone(),
                column: self.label_column.clone(),
            })?;
        let id_index = self.id_column.as_deref().and_then(|name| {
            let found = header.iter().position(|h| h.trim() == name);
            if found.is_none() {
                debug!(id_column = name, "id column not in header, reading without ids");
            }
            found
        });

        let feature_indices: Vec<usize> = (0..expected_cols)
            .filter(|&i| i != label_index && Some(i) != id_index)
            .collect();
        if feature_indices.is_empty() {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
            });
        }
        let feature_names: Vec<String> = feature_indices
            .iter()
            .map(|&i| header[i].trim().to_string())
            .collect();
        debug!(expected_cols, n_features = feature_names.len(), "read header");

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut ids = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut n_duplicates = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            if let Some(i) = id_index {
                let id = record[i].trim().to_string();
                if !seen.insert(id.clone()) {
                    n_duplicates += 1;
                    continue;
                }
                ids.push(id);
            }

            let raw_label = &record[label_index];
            let label = parse_label(raw_label).ok_or_else(|| IoError::InvalidLabel {
                path: self.path.clone(),
                row_index,
                raw: raw_label.to_string(),
            })?;
            labels.push(label);

            rows.push(
                feature_indices
                    .iter()
                    .map(|&i| parse_cell(&record[i]))
                    .collect(),
            );
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }
        if n_duplicates > 0 {
            warn!(n_duplicates, "dropped rows with repeated sample ids");
        }

        let dataset = RawDataset {
            feature_names,
            sample_ids: id_index.map(|_| ids),
            rows,
            labels,
        };
        info!(
            n_samples = dataset.n_samples(),
            n_features = dataset.n_features(),
            n_missing = dataset.n_missing(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

/// An integer label, also accepting integral floats such as `4.0`.
fn parse_label(raw: &str) -> Option<Label> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(Label::new(v));
    }
    let v = raw.parse::<f64>().ok()?;
    (v.is_finite() && v.fract() == 0.0).then(|| Label::new(v as i64))
}

/// A finite number, or `None` for anything else.
fn parse_cell(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
