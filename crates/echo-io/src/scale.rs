//! Column-wise feature scaling.

use std::fmt;

use tracing::{debug, instrument};

use crate::domain::PreparedDataset;

/// How each feature column is rescaled before classification.
///
/// A column whose values are all equal maps to 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingStrategy {
    /// Min-max scaling to `[0, 1]`.
    #[default]
    Normalize,
    /// Z-score with the sample standard deviation (`n - 1` denominator).
    Standardize,
}

impl ScalingStrategy {
    /// Rescale every feature column of `dataset` in place.
    #[instrument(skip_all, fields(strategy = %self, n_samples = dataset.n_samples()))]
    pub fn apply(self, dataset: &mut PreparedDataset) {
        let n_features = dataset.feature_names.len();
        for col in 0..n_features {
            let (offset, divisor) = self.column_params(dataset.rows.iter().map(|r| r[col]));
            for row in &mut dataset.rows {
                row[col] = if divisor > 0.0 {
                    (row[col] - offset) / divisor
                } else {
                    0.0
                };
            }
            debug!(col, offset, divisor, "column scaled");
        }
    }

    /// `(offset, divisor)` such that the scaled value is `(x - offset) / divisor`.
    ///
    /// A zero divisor marks a degenerate column.
    fn column_params(self, values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
        match self {
            Self::Normalize => {
                let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });
                (min, max - min)
            }
            Self::Standardize => {
                let n = values.clone().count();
                if n < 2 {
                    return (0.0, 0.0);
                }
                let mean = values.clone().sum::<f64>() / n as f64;
                let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
                (mean, variance.sqrt())
            }
        }
    }
}

impl fmt::Display for ScalingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normalize => "normalize",
            Self::Standardize => "standardize",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_knn::Label;

    fn dataset(rows: Vec<Vec<f64>>) -> PreparedDataset {
        let n = rows.len();
        PreparedDataset {
            feature_names: (0..rows[0].len()).map(|i| format!("f{i}")).collect(),
            sample_ids: None,
            rows,
            labels: vec![Label::NEGATIVE; n],
        }
    }

    #[test]
    fn normalize_maps_to_unit_interval() {
        let mut ds = dataset(vec![vec![2.0, 10.0], vec![4.0, 10.0], vec![6.0, 10.0]]);
        ScalingStrategy::Normalize.apply(&mut ds);
        let col0: Vec<f64> = ds.rows().iter().map(|r| r[0]).collect();
        assert_eq!(col0, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn constant_column_maps_to_zero() {
        let mut ds = dataset(vec![vec![2.0, 10.0], vec![4.0, 10.0]]);
        ScalingStrategy::Normalize.apply(&mut ds);
        assert!(ds.rows().iter().all(|r| r[1] == 0.0));

        let mut ds = dataset(vec![vec![7.0], vec![7.0], vec![7.0]]);
        ScalingStrategy::Standardize.apply(&mut ds);
        assert!(ds.rows().iter().all(|r| r[0] == 0.0));
    }

    #[test]
    fn standardize_uses_sample_std() {
        // Values 1, 2, 3: mean 2, sample std 1.
        let mut ds = dataset(vec![vec![1.0], vec![2.0], vec![3.0]]);
        ScalingStrategy::Standardize.apply(&mut ds);
        let col: Vec<f64> = ds.rows().iter().map(|r| r[0]).collect();
        assert!((col[0] + 1.0).abs() < 1e-12);
        assert!(col[1].abs() < 1e-12);
        assert!((col[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn standardize_single_row_is_zero() {
        let mut ds = dataset(vec![vec![5.0, -3.0]]);
        ScalingStrategy::Standardize.apply(&mut ds);
        assert_eq!(ds.rows(), &[vec![0.0, 0.0]]);
    }

    #[test]
    fn scaled_dataset_still_builds_a_table() {
        let mut ds = dataset(vec![vec![1.0, 100.0], vec![3.0, 300.0]]);
        ScalingStrategy::Standardize.apply(&mut ds);
        let (table, _) = ds.into_parts().unwrap();
        assert_eq!(table.n_features(), 2);
    }
}
