//! JSON report writer for validation runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use echo_metrics::Metrics;
use echo_validation::Trial;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes metrics and per-trial predictions to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_metrics.json` and
/// `{experiment}_trials.json`.
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the experiment name.
    #[must_use]
    pub fn experiment(&self) -> &ExperimentName {
        &self.experiment
    }

    /// Write aggregated metrics to `{experiment}_metrics.json`.
    ///
    /// `parameters` is any serializable record of the run configuration
    /// (strategy parameters, `k`, seed).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | `parameters` cannot be serialized |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(strategy = %strategy))]
    pub fn write_metrics<P: Serialize>(
        &self,
        strategy: &str,
        parameters: &P,
        metrics: &Metrics,
    ) -> Result<PathBuf, IoError> {
        let artifact = MetricsArtifact {
            experiment: self.experiment.as_str(),
            strategy,
            parameters,
            n_trials: metrics.n_trials,
            metrics: metrics.to_map(),
            accuracy_std: metrics.accuracy_std,
            confusion: ConfusionEntry {
                true_positives: metrics.pooled.true_positives,
                true_negatives: metrics.pooled.true_negatives,
                false_positives: metrics.pooled.false_positives,
                false_negatives: metrics.pooled.false_negatives,
            },
        };
        let path = self.write_json("metrics", &artifact)?;
        info!(path = %path.display(), "metrics written");
        Ok(path)
    }

    /// Write every trial's ground truth and predictions to `{experiment}_trials.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_trials = trials.len()))]
    pub fn write_trials(&self, trials: &[Trial]) -> Result<PathBuf, IoError> {
        let entries: Vec<TrialEntry> = trials
            .iter()
            .enumerate()
            .map(|(trial, t)| TrialEntry {
                trial,
                ground_truth: t.ground_truth().iter().map(|l| l.value()).collect(),
                predicted: t.predicted().iter().map(|l| l.value()).collect(),
            })
            .collect();
        let artifact = TrialsArtifact {
            experiment: self.experiment.as_str(),
            trials: entries,
        };
        let path = self.write_json("trials", &artifact)?;
        info!(path = %path.display(), "trials written");
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, suffix: &str, artifact: &T) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_{suffix}.json", self.experiment.as_str()));
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Private serialization structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct MetricsArtifact<'a, P: Serialize> {
    experiment: &'a str,
    strategy: &'a str,
    parameters: &'a P,
    n_trials: usize,
    metrics: BTreeMap<&'static str, f64>,
    accuracy_std: f64,
    confusion: ConfusionEntry,
}

#[derive(Serialize)]
struct ConfusionEntry {
    true_positives: usize,
    true_negatives: usize,
    false_positives: usize,
    false_negatives: usize,
}

#[derive(Serialize)]
struct TrialsArtifact<'a> {
    experiment: &'a str,
    trials: Vec<TrialEntry>,
}

#[derive(Serialize)]
struct TrialEntry {
    trial: usize,
    ground_truth: Vec<i64>,
    predicted: Vec<i64>,
}
