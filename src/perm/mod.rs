pub mod engine;
pub mod outcome;
mod pool;
pub mod summary;

pub use engine::{DscPerm, permuted_rows};
pub use outcome::{PermutationOutcomes, TaskError, TaskErrorKind};
pub use summary::NullSummary;
