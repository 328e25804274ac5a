pub mod dataset;
pub mod romans;

pub use dataset::{Dataset, IngestError, NO_DATA};
