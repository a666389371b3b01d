//! Aggregation of per-trial confusion counts into a single metrics record.

use std::collections::BTreeMap;

use echo_validation::Trial;
use tracing::{debug, instrument};

use crate::confusion::BinaryConfusion;

/// Report names of the six headline metrics, in [`Metrics::entries`] order.
pub const METRIC_NAMES: [&str; 6] = [
    "Accuracy Rate",
    "Error Rate",
    "Sensitivity",
    "Specificity",
    "Geometric Mean",
    "Area Under Curve",
];

/// Aggregated classification metrics over a trial collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// Mean per-trial accuracy.
    pub accuracy: f64,
    /// Mean per-trial error rate.
    pub error_rate: f64,
    /// Sensitivity of the pooled counts.
    pub sensitivity: f64,
    /// Specificity of the pooled counts.
    pub specificity: f64,
    /// Geometric mean of the pooled sensitivity and specificity.
    pub geometric_mean: f64,
    /// Mean per-trial single-threshold AUC.
    pub auc: f64,
    /// Population standard deviation of per-trial accuracy.
    pub accuracy_std: f64,
    /// Counts summed over every trial.
    pub pooled: BinaryConfusion,
    /// Number of trials aggregated.
    pub n_trials: usize,
}

impl Metrics {
    /// Metrics of a single confusion table, with no aggregation.
    #[must_use]
    pub fn from_confusion(confusion: BinaryConfusion) -> Self {
        Self {
            accuracy: confusion.accuracy(),
            error_rate: confusion.error_rate(),
            sensitivity: confusion.sensitivity(),
            specificity: confusion.specificity(),
            geometric_mean: confusion.geometric_mean(),
            auc: confusion.auc(),
            accuracy_std: 0.0,
            pooled: confusion,
            n_trials: 1,
        }
    }

    /// The six headline metrics as `(name, value)` pairs, named per [`METRIC_NAMES`].
    #[must_use]
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        let values = [
            self.accuracy,
            self.error_rate,
            self.sensitivity,
            self.specificity,
            self.geometric_mean,
            self.auc,
        ];
        let mut out = [("", 0.0); 6];
        for (slot, (name, value)) in out.iter_mut().zip(METRIC_NAMES.into_iter().zip(values)) {
            *slot = (name, value);
        }
        out
    }

    /// The six headline metrics keyed by report name, sorted by name.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        self.entries().into_iter().collect()
    }

    /// Look up a headline metric by its report name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

/// Aggregate a trial collection into [`Metrics`].
///
/// - One trial: the metrics of that trial's counts.
/// - Several trials: accuracy, error rate and AUC are averaged over trials;
///   sensitivity and specificity are computed from counts pooled across all
///   trials, and the geometric mean from those pooled rates.
/// - No trials: every metric is 0.0.
#[instrument(skip_all, fields(n_trials = trials.len()))]
#[must_use]
pub fn calculate_metrics(trials: &[Trial]) -> Metrics {
    let per_trial: Vec<BinaryConfusion> = trials.iter().map(BinaryConfusion::from_trial).collect();

    match per_trial.as_slice() {
        [] => Metrics {
            accuracy: 0.0,
            error_rate: 0.0,
            sensitivity: 0.0,
            specificity: 0.0,
            geometric_mean: 0.0,
            auc: 0.0,
            accuracy_std: 0.0,
            pooled: BinaryConfusion::default(),
            n_trials: 0,
        },
        [single] => Metrics::from_confusion(*single),
        many => {
            let n = many.len() as f64;
            let mean = |f: fn(&BinaryConfusion) -> f64| many.iter().map(f).sum::<f64>() / n;

            let accuracy = mean(BinaryConfusion::accuracy);
            let accuracy_std = {
                let variance = many
                    .iter()
                    .map(|c| (c.accuracy() - accuracy).powi(2))
                    .sum::<f64>()
                    / n;
                variance.sqrt()
            };

            let pooled: BinaryConfusion = many.iter().copied().sum();
            let sensitivity = pooled.sensitivity();
            let specificity = pooled.specificity();
            debug!(?pooled, "pooled confusion counts");

            Metrics {
                accuracy,
                error_rate: mean(BinaryConfusion::error_rate),
                sensitivity,
                specificity,
                geometric_mean: (sensitivity * specificity).sqrt(),
                auc: mean(BinaryConfusion::auc),
                accuracy_std,
                pooled,
                n_trials: many.len(),
            }
        }
    }
}
