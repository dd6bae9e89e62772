use serde::{Deserialize, Serialize};

use crate::error::DscError;

/// What a parallel permutation run does when individual tasks fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log failed tasks and return the results that did succeed.
    #[default]
    BestEffort,
    /// Any failed task fails the whole run.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermConfig {
    pub seed: u64,
    pub permutations: usize,
    pub workers: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for PermConfig {
    fn default() -> Self {
        Self {
            seed: 314,
            permutations: 1000,
            workers: 1,
            failure_policy: FailurePolicy::BestEffort,
        }
    }
}

impl PermConfig {
    pub fn new(seed: u64, permutations: usize, workers: usize) -> Self {
        Self {
            seed,
            permutations,
            workers,
            ..Self::default()
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, DscError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| DscError::InvalidConfig(format!("unreadable config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DscError> {
        if self.workers == 0 {
            return Err(DscError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
