//! Saga pattern for atomic multi-step operations.
//!
//! A saga is a fixed, ordered list of named steps sharing one context and one
//! piece of mutable data. Every step is registered up front, so the returned
//! [`StepTrace`] lists the whole plan: steps that ran are `completed` or
//! `failed`, and when a step aborts the run every step that never ran is
//! marked `failed` with the aborting error's message. A step that
//! [rejects](SagaStep::rejects) its error instead ends the trace at itself.
//!
//! Rolling back side effects is left to the caller's transactional context.

mod builder;
mod clock;
mod error;
mod saga;
mod step;
mod trace;

pub use builder::SagaBuilder;
pub use clock::{Clock, SystemClock};
pub use error::SagaError;
pub use saga::Saga;
pub use step::{SagaStep, StepOutcome};
pub use trace::{StepRecord, StepStatus, StepTrace};
