//! Repeated generation until a requested number of environments succeed.

use time_riders_core::{GenerationConfig, GenerationError};
use tracing::{info, warn};

use crate::{Environment, EnvironmentAssembler};

/// Environment produced by a batch together with the seed that reproduces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchEntry {
    /// Seed passed to [`EnvironmentAssembler::generate`].
    pub seed: u64,
    /// Environment generated from the seed.
    pub environment: Environment,
}

/// Outcome of a batch generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of environments the caller asked for.
    pub requested: usize,
    /// Environments that were generated, in seed order.
    pub environments: Vec<BatchEntry>,
    /// Number of generation attempts made.
    pub attempts: usize,
    /// Attempts abandoned because a rider ran out of candidate cells.
    pub unsolvable: usize,
    /// Attempts abandoned because a rider exhausted its move budget.
    pub step_limited: usize,
}

impl BatchReport {
    /// Percentage of attempts that produced an environment.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.environments.len() as f64 * 100.0 / self.attempts as f64
    }

    /// Reports whether every requested environment was generated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.environments.len() >= self.requested
    }
}

/// Generates up to `count` environments, spending at most `max_attempts` seeds.
///
/// Seeds run `base_seed, base_seed + 1, ...` with wrapping. Failures that a new
/// seed cannot fix end the batch with an error.
pub fn generate_batch(
    config: GenerationConfig,
    count: usize,
    base_seed: u64,
    max_attempts: usize,
) -> Result<BatchReport, GenerationError> {
    let assembler = EnvironmentAssembler::new(config)?;
    let mut report = BatchReport {
        requested: count,
        ..BatchReport::default()
    };
    let mut seed = base_seed;

    while report.environments.len() < count && report.attempts < max_attempts {
        report.attempts += 1;
        match assembler.generate(seed) {
            Ok(environment) => report.environments.push(BatchEntry { seed, environment }),
            Err(error @ GenerationError::Unsolvable { .. }) => {
                warn!(seed, %error, "generation attempt failed");
                report.unsolvable += 1;
            }
            Err(error @ GenerationError::StepLimitExceeded { .. }) => {
                warn!(seed, %error, "generation attempt failed");
                report.step_limited += 1;
            }
            Err(error) => return Err(error),
        }
        seed = seed.wrapping_add(1);
    }

    info!(
        generated = report.environments.len(),
        requested = count,
        attempts = report.attempts,
        success_rate = report.success_rate(),
        "batch finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_is_zero_without_attempts() {
        let report = BatchReport::default();
        assert_eq!(report.success_rate(), 0.0);
        assert!(report.is_complete());
    }

    #[test]
    fn zero_attempts_generate_nothing() {
        let report =
            generate_batch(GenerationConfig::default(), 3, 0, 0).expect("config is valid");
        assert_eq!(report.attempts, 0);
        assert!(report.environments.is_empty());
        assert!(!report.is_complete());
    }
}
