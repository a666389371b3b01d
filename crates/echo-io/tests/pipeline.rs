//! End-to-end integration tests: CSV -> prepare -> validate -> metrics -> JSON.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use echo_io::{
    DatasetReader, ExperimentName, LabelMapping, MissingValueStrategy, ReportWriter,
    ScalingStrategy,
};
use echo_knn::{FeatureTable, Label};
use echo_metrics::calculate_metrics;
use echo_validation::{Holdout, KFold, LeavePOut, RandomSubsampling, ValidationStrategy};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Read the 30-sample fixture and prepare it the way the binary does.
fn prepare(missing: MissingValueStrategy) -> (FeatureTable, Vec<Label>) {
    let raw = DatasetReader::new(&fixture_path("wbc_sample.csv"))
        .read()
        .expect("fixture should parse");
    let mut prepared = missing.apply(raw).unwrap();
    ScalingStrategy::Normalize.apply(&mut prepared);
    let mapping = LabelMapping::infer(prepared.labels()).unwrap();
    assert_eq!(mapping, LabelMapping::BenignMalignant);
    mapping.apply(&mut prepared).unwrap();
    prepared.into_parts().unwrap()
}

#[test]
fn fixture_reads_with_gaps_and_duplicates() {
    let raw = DatasetReader::new(&fixture_path("wbc_sample.csv"))
        .read()
        .unwrap();
    // 31 data lines, one repeating an earlier sample id.
    assert_eq!(raw.n_samples(), 30);
    assert_eq!(raw.n_features(), 3);
    assert_eq!(raw.n_missing(), 2);
    assert_eq!(raw.sample_ids().unwrap()[0], "1000100");
}

#[test]
fn holdout_round_trip() {
    let (features, labels) = prepare(MissingValueStrategy::Median);
    assert_eq!(features.n_samples(), 30);
    assert!(features.rows().iter().flatten().all(|v| (0.0..=1.0).contains(v)));

    let holdout = Holdout::new(0.3).unwrap();
    let trials = holdout.generate_splits(&features, &labels).unwrap();
    assert_eq!(trials.len(), 1);
    assert_eq!(trials[0].len(), 9);

    let metrics = calculate_metrics(&trials);
    assert!(metrics.accuracy >= 0.9, "accuracy {}", metrics.accuracy);

    let dir = TempDir::new().unwrap();
    let writer =
        ReportWriter::new(dir.path(), ExperimentName::new("holdout_rt".into()).unwrap()).unwrap();
    let params = serde_json::json!({ "test_size": holdout.test_size(), "k": holdout.k() });
    let path = writer
        .write_metrics(holdout.name(), &params, &metrics)
        .unwrap();

    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["experiment"], "holdout_rt");
    assert_eq!(content["strategy"], "holdout");
    assert_eq!(content["parameters"]["k"], 3);
    let accuracy = content["metrics"]["Accuracy Rate"].as_f64().unwrap();
    assert!((accuracy - metrics.accuracy).abs() < 1e-12);
    let pooled: u64 = ["true_positives", "true_negatives", "false_positives", "false_negatives"]
        .iter()
        .map(|k| content["confusion"][*k].as_u64().unwrap())
        .sum();
    assert_eq!(pooled, 9);
}

#[test]
fn remove_strategy_drops_incomplete_rows() {
    let (features, labels) = prepare(MissingValueStrategy::Remove);
    assert_eq!(features.n_samples(), 28);
    assert_eq!(labels.len(), 28);
    assert_eq!(features.sample_ids().unwrap().len(), 28);
}

#[test]
fn kfold_trials_file_has_every_fold() {
    let (features, labels) = prepare(MissingValueStrategy::Mode);
    let trials = KFold::new(5)
        .unwrap()
        .generate_splits(&features, &labels)
        .unwrap();

    let dir = TempDir::new().unwrap();
    let writer = ReportWriter::new(dir.path(), ExperimentName::new("kf".into()).unwrap()).unwrap();
    let path = writer.write_trials(&trials).unwrap();
    assert_eq!(path, dir.path().join("kf_trials.json"));

    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let folds = content["trials"].as_array().unwrap();
    assert_eq!(folds.len(), 5);
    for fold in folds {
        assert_eq!(fold["ground_truth"].as_array().unwrap().len(), 6);
        assert_eq!(fold["predicted"].as_array().unwrap().len(), 6);
    }
    assert!(calculate_metrics(&trials).accuracy > 0.9);
}

#[test]
fn leave_one_out_and_subsampling_separate_classes() {
    let (features, labels) = prepare(MissingValueStrategy::Mean);

    let loo = LeavePOut::new(1)
        .unwrap()
        .generate_splits(&features, &labels)
        .unwrap();
    assert_eq!(loo.len(), 30);
    let m = calculate_metrics(&loo);
    assert!(m.accuracy > 0.95, "leave-one-out accuracy {}", m.accuracy);
    assert_eq!(m.pooled.total(), 30);

    let sub = RandomSubsampling::new(8, 0.2)
        .unwrap()
        .generate_splits(&features, &labels)
        .unwrap();
    assert_eq!(sub.len(), 8);
    assert!(calculate_metrics(&sub).sensitivity > 0.9);
}

#[test]
fn tsv_input_matches_csv_input() {
    let csv = fs::read_to_string(fixture_path("wbc_sample.csv")).unwrap();
    let mut tsv = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
    tsv.write_all(csv.replace(',', "\t").as_bytes()).unwrap();
    tsv.flush().unwrap();

    let from_csv = DatasetReader::new(&fixture_path("wbc_sample.csv"))
        .read()
        .unwrap();
    let from_tsv = DatasetReader::new(tsv.path()).read().unwrap();
    assert_eq!(from_csv.rows(), from_tsv.rows());
    assert_eq!(from_csv.labels(), from_tsv.labels());
}
