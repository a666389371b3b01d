//! File I/O, data preparation, and report serialization for the echo pipeline.

mod domain;
mod error;
mod impute;
mod labels;
mod reader;
mod scale;
mod writer;

pub use domain::{ExperimentName, PreparedDataset, RawDataset};
pub use error::IoError;
pub use impute::MissingValueStrategy;
pub use labels::LabelMapping;
pub use reader::DatasetReader;
pub use scale::ScalingStrategy;
pub use writer::ReportWriter;
