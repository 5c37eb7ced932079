pub mod config;
mod error;
pub mod operations;
pub mod providers;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub use config::OrchestratorConfig;
pub use error::{FailureKind, OperationError, Result};
