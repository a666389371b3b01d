//! Classification-performance metrics over validation trials.
//!
//! Converts each [`echo_validation::Trial`] into binary confusion counts
//! (label 1 positive, label 0 negative) and aggregates them: rate metrics are
//! averaged per trial, while sensitivity, specificity and the geometric mean
//! come from counts pooled across all trials.

mod calculator;
mod confusion;

pub use calculator::{METRIC_NAMES, Metrics, calculate_metrics};
pub use confusion::BinaryConfusion;
