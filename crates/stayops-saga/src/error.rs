use std::fmt::Debug;

use thiserror::Error;

/// Error from saga execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// A step failed and the remaining steps were not run.
    #[error("step '{step}' failed")]
    StepFailed {
        /// Name of the step that failed.
        step: String,
        /// The error that caused the step to fail.
        #[source]
        source: E,
    },
}

impl<E: Debug> SagaError<E> {
    #[must_use]
    pub fn step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
        }
    }

    #[must_use]
    pub fn into_source(self) -> E {
        match self {
            Self::StepFailed { source, .. } => source,
        }
    }
}
