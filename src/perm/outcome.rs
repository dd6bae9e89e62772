use std::fmt;

use crate::dsc::DscInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskErrorKind {
    Failed(String),
    Panicked(String),
    /// The task never reported back.
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskError {
    pub index: usize,
    pub kind: TaskErrorKind,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TaskErrorKind::Failed(msg) => write!(f, "permutation {} failed: {msg}", self.index),
            TaskErrorKind::Panicked(msg) => {
                write!(f, "permutation {} panicked: {msg}", self.index)
            }
            TaskErrorKind::Lost => write!(f, "permutation {} produced no result", self.index),
        }
    }
}

impl std::error::Error for TaskError {}

/// Per-task results of a parallel run, in submission order.
#[derive(Debug, Clone)]
pub struct PermutationOutcomes {
    outcomes: Vec<Result<DscInfo, TaskError>>,
}

impl PermutationOutcomes {
    pub(crate) fn new(outcomes: Vec<Result<DscInfo, TaskError>>) -> Self {
        Self { outcomes }
    }

    pub fn requested(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_ok())
    }

    pub fn failures(&self) -> Vec<&TaskError> {
        self.outcomes
            .iter()
            .filter_map(|o| o.as_ref().err())
            .collect()
    }

    pub fn outcomes(&self) -> &[Result<DscInfo, TaskError>] {
        &self.outcomes
    }

    pub fn into_results(self) -> Vec<DscInfo> {
        self.outcomes.into_iter().filter_map(Result::ok).collect()
    }
}
