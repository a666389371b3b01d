//! K-nearest-neighbors classification over numeric feature tables.
//!
//! Pure math library, zero I/O. Provides the validated [`FeatureTable`]
//! contract shared by the rest of the workspace, Euclidean distance, and a
//! [`KnnClassifier`] with stable neighbor selection and a deterministic
//! majority vote.

mod classifier;
mod distance;
mod error;
mod label;
mod table;

pub use classifier::KnnClassifier;
pub use distance::{Neighbor, euclidean};
pub use error::KnnError;
pub use label::Label;
pub use table::FeatureTable;
