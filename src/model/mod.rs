pub mod batches;
pub mod matrix;

pub use batches::{BatchGroups, BatchLabels};
pub use matrix::{Matrix, is_missing};
