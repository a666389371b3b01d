use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use echo_io::{
    DatasetReader, ExperimentName, LabelMapping, MissingValueStrategy, ReportWriter,
    ScalingStrategy,
};
use echo_knn::{FeatureTable, Label};
use echo_metrics::calculate_metrics;
use echo_validation::{Holdout, KFold, LeavePOut, RandomSubsampling, Strategy, ValidationStrategy};

#[derive(Parser)]
#[command(name = "echo")]
#[command(about = "KNN classification evaluated with resampling validation strategies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel prediction (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Dataset, preparation and output parameters shared by every strategy.
#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Path to the input file (.csv, .txt or .tsv)
    #[arg(long)]
    data: PathBuf,

    /// Number of nearest neighbors
    #[arg(long, default_value_t = 3)]
    k: usize,

    /// Missing-value handling: "remove", "mean", "median" or "mode"
    #[arg(long, default_value = "median")]
    missing: String,

    /// Feature scaling: "normalize", "standardize" or "none"
    #[arg(long, default_value = "normalize")]
    scaling: String,

    /// Label mapping: "auto", "identity" (0/1) or "benign-malignant" (2/4)
    #[arg(long, default_value = "auto")]
    labels: String,

    /// Name of the class label column
    #[arg(long, default_value = "classtype_v1")]
    label_column: String,

    /// Name of the sample id column (ignored when absent from the header)
    #[arg(long, default_value = "Sample code number")]
    id_column: String,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write per-trial ground truth and predictions
    #[arg(long, default_value_t = false)]
    write_trials: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Single shuffled train/test split
    Holdout {
        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Repeated independent shuffled train/test splits
    Subsampling {
        /// Number of iterations
        #[arg(long, default_value_t = 10)]
        n_iter: usize,

        /// Fraction of rows held out in each iteration
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Every size-p subset as a test set, or a random sample of them
    LeavePOut {
        /// Number of rows held out per trial
        #[arg(long, default_value_t = 2)]
        p: usize,

        /// Sample this many combinations instead of enumerating all of them
        #[arg(long)]
        n_combinations: Option<usize>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// K-fold cross-validation over a shuffled index sequence
    KFold {
        /// Number of folds
        #[arg(long, default_value_t = 5)]
        n_splits: usize,

        #[command(flatten)]
        run: RunArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct RunOutput {
    experiment: String,
    strategy: &'static str,
    n_samples: usize,
    n_features: usize,
    n_trials: usize,
    accuracy_rate: f64,
    error_rate: f64,
    sensitivity: f64,
    specificity: f64,
    geometric_mean: f64,
    area_under_curve: f64,
    accuracy_std: f64,
    metrics_file: PathBuf,
}

#[derive(Serialize)]
struct RunParameters {
    k: usize,
    seed: u64,
    missing: String,
    scaling: String,
    #[serde(flatten)]
    strategy: serde_json::Value,
}

fn parse_missing(s: &str) -> Result<MissingValueStrategy> {
    match s {
        "remove" => Ok(MissingValueStrategy::Remove),
        "mean" => Ok(MissingValueStrategy::Mean),
        "median" => Ok(MissingValueStrategy::Median),
        "mode" => Ok(MissingValueStrategy::Mode),
        other => anyhow::bail!("unknown missing-value strategy: {other} (expected remove, mean, median, or mode)"),
    }
}

fn parse_scaling(s: &str) -> Result<Option<ScalingStrategy>> {
    match s {
        "normalize" => Ok(Some(ScalingStrategy::Normalize)),
        "standardize" => Ok(Some(ScalingStrategy::Standardize)),
        "none" => Ok(None),
        other => anyhow::bail!("unknown scaling: {other} (expected normalize, standardize, or none)"),
    }
}

fn parse_labels(s: &str) -> Result<Option<LabelMapping>> {
    match s {
        "auto" => Ok(None),
        "identity" => Ok(Some(LabelMapping::Identity)),
        "benign-malignant" => Ok(Some(LabelMapping::BenignMalignant)),
        other => anyhow::bail!("unknown label mapping: {other} (expected auto, identity, or benign-malignant)"),
    }
}

/// Read, impute, scale and map labels.
fn prepare(run: &RunArgs) -> Result<(FeatureTable, Vec<Label>)> {
    let missing = parse_missing(&run.missing)?;
    let scaling = parse_scaling(&run.scaling)?;
    let labels = parse_labels(&run.labels)?;

    let raw = DatasetReader::new(&run.data)
        .with_label_column(run.label_column.as_str())
        .with_id_column(Some(run.id_column.clone()))
        .read()
        .context("failed to read input data")?;

    let mut prepared = missing
        .apply(raw)
        .context("failed to handle missing values")?;

    if let Some(scaling) = scaling {
        scaling.apply(&mut prepared);
    }

    let mapping = match labels {
        Some(mapping) => mapping,
        None => LabelMapping::infer(prepared.labels()).context("failed to infer label mapping")?,
    };
    mapping
        .apply(&mut prepared)
        .context("failed to map labels")?;
    info!(%mapping, n_samples = prepared.n_samples(), "dataset prepared");

    Ok(prepared.into_parts()?)
}

/// Build the configured strategy and the record of its parameters.
fn build_strategy(command: &Command, seed: u64) -> Result<(Strategy, serde_json::Value, &RunArgs)> {
    Ok(match command {
        Command::Holdout { test_size, run } => {
            let strategy = Holdout::new(*test_size)?.with_k(run.k)?.with_seed(seed);
            let params = serde_json::json!({ "test_size": test_size });
            (strategy.into(), params, run)
        }
        Command::Subsampling {
            n_iter,
            test_size,
            run,
        } => {
            let strategy = RandomSubsampling::new(*n_iter, *test_size)?
                .with_k(run.k)?
                .with_seed(seed);
            let params = serde_json::json!({ "n_iter": n_iter, "test_size": test_size });
            (strategy.into(), params, run)
        }
        Command::LeavePOut {
            p,
            n_combinations,
            run,
        } => {
            let mut strategy = LeavePOut::new(*p)?.with_k(run.k)?.with_seed(seed);
            if let Some(n) = *n_combinations {
                strategy = strategy.with_n_combinations(n)?;
            }
            let params = serde_json::json!({ "p": p, "n_combinations": n_combinations });
            (strategy.into(), params, run)
        }
        Command::KFold { n_splits, run } => {
            let strategy = KFold::new(*n_splits)?.with_k(run.k)?.with_seed(seed);
            let params = serde_json::json!({ "n_splits": n_splits });
            (strategy.into(), params, run)
        }
    })
}

fn run_experiment(
    strategy: &Strategy,
    strategy_params: serde_json::Value,
    run: &RunArgs,
    seed: u64,
) -> Result<RunOutput> {
    let experiment_name = ExperimentName::new(run.experiment.clone())?;
    let (features, labels) = prepare(run)?;

    let trials = strategy
        .generate_splits(&features, &labels)
        .with_context(|| format!("{} validation failed", strategy.name()))?;
    let metrics = calculate_metrics(&trials);
    info!(
        strategy = strategy.name(),
        n_trials = metrics.n_trials,
        accuracy = metrics.accuracy,
        "metrics computed"
    );

    let writer = ReportWriter::new(Path::new(&run.output_dir), experiment_name)?;
    let params = RunParameters {
        k: strategy.k(),
        seed,
        missing: run.missing.clone(),
        scaling: run.scaling.clone(),
        strategy: strategy_params,
    };
    let metrics_file = writer.write_metrics(strategy.name(), &params, &metrics)?;
    if run.write_trials {
        writer.write_trials(&trials)?;
    }

    Ok(RunOutput {
        experiment: run.experiment.clone(),
        strategy: strategy.name(),
        n_samples: features.n_samples(),
        n_features: features.n_features(),
        n_trials: metrics.n_trials,
        accuracy_rate: metrics.accuracy,
        error_rate: metrics.error_rate,
        sensitivity: metrics.sensitivity,
        specificity: metrics.specificity,
        geometric_mean: metrics.geometric_mean,
        area_under_curve: metrics.auc,
        accuracy_std: metrics.accuracy_std,
        metrics_file,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Prediction batches run on the global rayon pool.
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let (strategy, strategy_params, run) = build_strategy(&cli.command, cli.seed)?;
    let output = run_experiment(&strategy, strategy_params, run, cli.seed)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
