//! Resampling validation strategies driving the KNN classifier.
//!
//! Each strategy partitions row indices into train/test splits under its own
//! sampling policy, fits a fresh [`echo_knn::KnnClassifier`] per split, and
//! returns one [`Trial`] of (ground truth, predicted) labels per split.
//! Randomness comes from a per-strategy seeded ChaCha8 generator, so repeated
//! calls with the same seed produce identical trials.

mod error;
mod holdout;
mod kfold;
mod leave_p_out;
mod split;
mod strategy;
mod subsampling;
mod trial;

pub use error::ValidationError;
pub use holdout::Holdout;
pub use kfold::KFold;
pub use leave_p_out::{Combinations, LeavePOut, binomial};
pub use split::Split;
pub use strategy::{Strategy, ValidationStrategy};
pub use subsampling::RandomSubsampling;
pub use trial::Trial;
