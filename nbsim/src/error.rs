//! Error types surfaced by the simulation core

use thiserror::Error;

use crate::simulation::engine::RunState;

/// Boxed error returned by trajectory recorders
pub type RecorderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure raised by a force model while evaluating accelerations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ForceError {
    /// Bodies `i` and `j` (i < j) are at zero separation
    #[error("bodies {i} and {j} have zero separation")]
    Singular { i: usize, j: usize },
}

#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected before the run starts (dt, step count, masses, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Two bodies coincided during force computation at `step`
    #[error("singular configuration at step {step}: bodies {i} and {j} have zero separation")]
    SingularConfiguration { i: usize, j: usize, step: usize },

    /// The recorder failed to persist the snapshot of `step`
    #[error("recorder failed at step {step}: {source}")]
    Recorder {
        step: usize,
        #[source]
        source: RecorderError,
    },

    #[error("simulation already finished ({0:?}); build a new one to run again")]
    AlreadyFinished(RunState),

    #[error("failed to build force worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimError {
    /// Attach the step index to a force model failure
    pub fn at_step(err: ForceError, step: usize) -> Self {
        match err {
            ForceError::Singular { i, j } => SimError::SingularConfiguration { i, j, step },
        }
    }
}
