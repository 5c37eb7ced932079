/// Result of a step that did not abort the saga.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step did its work.
    Completed(String),
    /// The step failed in a way the saga tolerates; recorded as `failed`,
    /// execution continues with the next step.
    SoftFailed(String),
}

impl StepOutcome {
    #[must_use]
    pub fn completed(message: impl Into<String>) -> Self {
        Self::Completed(message.into())
    }

    #[must_use]
    pub fn soft_failed(message: impl Into<String>) -> Self {
        Self::SoftFailed(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Completed(message) | Self::SoftFailed(message) => message,
        }
    }
}

/// A named step in a saga.
///
/// # Type Parameters
///
/// - `Ctx`: Shared dependencies (injected, not passed between steps)
pub trait SagaStep<Ctx>: Send + Sync {
    /// Data threaded through every step of the saga.
    type Data;

    /// Error type for step failures.
    type Error;

    /// Human-readable name for logging and the step trace.
    fn name(&self) -> &'static str;

    /// Execute the step against the shared data.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails in a way that must abort the saga.
    fn execute(&self, ctx: &Ctx, data: &mut Self::Data) -> Result<StepOutcome, Self::Error>;

    /// Whether `error` rejects the run instead of interrupting it.
    ///
    /// A rejected run's trace ends at this step. An interrupted run keeps
    /// its full plan, with every step that never ran marked `failed`.
    fn rejects(&self, _error: &Self::Error) -> bool {
        false
    }
}
