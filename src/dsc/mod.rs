pub mod calc;
pub mod info;
pub mod record;

pub use calc::calculate;
pub use info::{DscInfo, EPSILON_ZERO, epsilon_zero};
pub use record::{WriteMode, read_all_from_file, read_from_file, write_all_to_file, write_to_file};

use crate::error::DscError;
use crate::model::{BatchLabels, Matrix};

/// Statistic evaluated on every permuted matrix.
pub trait Statistic: Sync {
    fn compute(&self, matrix: &Matrix, labels: &BatchLabels) -> Result<DscInfo, DscError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DscStatistic;

impl Statistic for DscStatistic {
    fn compute(&self, matrix: &Matrix, labels: &BatchLabels) -> Result<DscInfo, DscError> {
        calculate(matrix, labels)
    }
}

impl<F> Statistic for F
where
    F: Fn(&Matrix, &BatchLabels) -> Result<DscInfo, DscError> + Sync,
{
    fn compute(&self, matrix: &Matrix, labels: &BatchLabels) -> Result<DscInfo, DscError> {
        self(matrix, labels)
    }
}
