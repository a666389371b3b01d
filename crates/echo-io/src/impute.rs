//! Missing-value handling: drop incomplete rows or fill per-column gaps.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::IoError;
use crate::domain::{PreparedDataset, RawDataset};

/// How missing feature cells are resolved.
///
/// Fill statistics are computed per column over the present values only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValueStrategy {
    /// Drop every row with at least one missing cell.
    Remove,
    /// Fill with the column mean.
    Mean,
    /// Fill with the column median (mean of the two middle values for even counts).
    #[default]
    Median,
    /// Fill with the most frequent value; the smallest value wins ties.
    Mode,
}

impl MissingValueStrategy {
    /// Resolve every missing cell of `raw`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::NoCompleteRows`] | `Remove` and every row has a gap |
    /// | [`IoError::AllMissing`] | A fill strategy meets a column with no present values |
    #[instrument(skip_all, fields(strategy = %self))]
    pub fn apply(self, raw: RawDataset) -> Result<PreparedDataset, IoError> {
        let RawDataset {
            feature_names,
            sample_ids,
            rows,
            labels,
        } = raw;

        let (rows, labels, sample_ids) = match self {
            Self::Remove => {
                let n_before = rows.len();
                let mut kept_rows = Vec::with_capacity(n_before);
                let mut kept_labels = Vec::with_capacity(n_before);
                let mut kept_ids = sample_ids.as_ref().map(|_| Vec::with_capacity(n_before));

                for (i, (row, label)) in rows.into_iter().zip(labels).enumerate() {
                    let Some(complete) = row.into_iter().collect::<Option<Vec<f64>>>() else {
                        continue;
                    };
                    kept_rows.push(complete);
                    kept_labels.push(label);
                    if let (Some(kept), Some(ids)) = (kept_ids.as_mut(), sample_ids.as_ref()) {
                        kept.push(ids[i].clone());
                    }
                }

                if kept_rows.is_empty() {
                    return Err(IoError::NoCompleteRows);
                }
                let n_dropped = n_before - kept_rows.len();
                if n_dropped > 0 {
                    warn!(n_dropped, "dropped rows with missing values");
                }
                (kept_rows, kept_labels, kept_ids)
            }
            Self::Mean | Self::Median | Self::Mode => {
                let fills = feature_names
                    .iter()
                    .enumerate()
                    .map(|(col, name)| {
                        let present: Vec<f64> = rows.iter().filter_map(|r| r[col]).collect();
                        self.statistic(&present).ok_or_else(|| IoError::AllMissing {
                            column: name.clone(),
                        })
                    })
                    .collect::<Result<Vec<f64>, IoError>>()?;
                debug!(?fills, "column fill values");

                let filled: Vec<Vec<f64>> = rows
                    .into_iter()
                    .map(|row| {
                        row.into_iter()
                            .zip(&fills)
                            .map(|(cell, &fill)| cell.unwrap_or(fill))
                            .collect()
                    })
                    .collect();
                (filled, labels, sample_ids)
            }
        };

        info!(n_samples = rows.len(), "missing values resolved");
        Ok(PreparedDataset {
            feature_names,
            sample_ids,
            rows,
            labels,
        })
    }

    /// The fill value for one column, or `None` when no values are present.
    fn statistic(self, present: &[f64]) -> Option<f64> {
        if present.is_empty() {
            return None;
        }
        match self {
            Self::Remove => None,
            Self::Mean => Some(present.iter().sum::<f64>() / present.len() as f64),
            Self::Median => {
                let mut sorted = present.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                Some(if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                })
            }
            Self::Mode => {
                let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
                for &v in present {
                    counts.entry(v.to_bits()).or_insert((v, 0)).1 += 1;
                }
                counts
                    .into_values()
                    .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.total_cmp(va)))
                    .map(|(v, _)| v)
            }
        }
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remove => "remove",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_knn::Label;

    fn raw(rows: Vec<Vec<Option<f64>>>) -> RawDataset {
        let n = rows.len();
        RawDataset {
            feature_names: (0..rows[0].len()).map(|i| format!("f{i}")).collect(),
            sample_ids: Some((0..n).map(|i| format!("s{i}")).collect()),
            rows,
            labels: (0..n).map(|i| Label::new((i % 2) as i64)).collect(),
        }
    }

    fn sample() -> RawDataset {
        raw(vec![
            vec![Some(1.0), Some(10.0)],
            vec![None, Some(20.0)],
            vec![Some(3.0), None],
            vec![Some(3.0), Some(40.0)],
            vec![Some(8.0), Some(20.0)],
        ])
    }

    #[test]
    fn remove_drops_incomplete_rows() {
        let ds = MissingValueStrategy::Remove.apply(sample()).unwrap();
        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.rows()[1], vec![3.0, 40.0]);
        assert_eq!(ds.sample_ids().unwrap(), &["s0", "s3", "s4"]);
        assert_eq!(
            ds.labels(),
            &[Label::new(0), Label::new(1), Label::new(0)]
        );
    }

    #[test]
    fn mean_fills_gaps() {
        let ds = MissingValueStrategy::Mean.apply(sample()).unwrap();
        assert_eq!(ds.n_samples(), 5);
        assert!((ds.rows()[1][0] - 15.0 / 4.0).abs() < 1e-12);
        assert!((ds.rows()[2][1] - 22.5).abs() < 1e-12);
    }

    #[test]
    fn median_averages_middle_pair() {
        let ds = MissingValueStrategy::Median.apply(sample()).unwrap();
        // Column 0 present: 1, 3, 3, 8 -> (3 + 3) / 2.
        assert!((ds.rows()[1][0] - 3.0).abs() < 1e-12);
        // Column 1 present: 10, 20, 20, 40 -> (20 + 20) / 2.
        assert!((ds.rows()[2][1] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn median_odd_count() {
        let ds = MissingValueStrategy::Median
            .apply(raw(vec![vec![Some(5.0)], vec![Some(1.0)], vec![None], vec![Some(2.0)]]))
            .unwrap();
        assert!((ds.rows()[2][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn mode_picks_most_frequent() {
        let ds = MissingValueStrategy::Mode.apply(sample()).unwrap();
        assert!((ds.rows()[1][0] - 3.0).abs() < 1e-12);
        assert!((ds.rows()[2][1] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn mode_ties_pick_smallest() {
        let ds = MissingValueStrategy::Mode
            .apply(raw(vec![
                vec![Some(7.0)],
                vec![Some(2.0)],
                vec![None],
                vec![Some(9.0)],
            ]))
            .unwrap();
        assert!((ds.rows()[2][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn complete_data_is_unchanged() {
        let ds = MissingValueStrategy::Mean
            .apply(raw(vec![vec![Some(1.0)], vec![Some(2.0)]]))
            .unwrap();
        assert_eq!(ds.rows(), &[vec![1.0], vec![2.0]]);
    }

    #[test]
    fn all_missing_column_error() {
        let err = MissingValueStrategy::Median
            .apply(raw(vec![vec![Some(1.0), None], vec![Some(2.0), None]]))
            .unwrap_err();
        assert!(matches!(err, IoError::AllMissing { ref column } if column == "f1"));
    }

    #[test]
    fn remove_with_no_complete_rows_error() {
        let err = MissingValueStrategy::Remove
            .apply(raw(vec![vec![None, Some(1.0)], vec![Some(1.0), None]]))
            .unwrap_err();
        assert!(matches!(err, IoError::NoCompleteRows));
    }
}
