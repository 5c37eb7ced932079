use std::path::PathBuf;

use stayops_operations::OperationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot open store '{path}'")]
    OpenStore {
        path: PathBuf,
        #[source]
        source: OperationError,
    },

    #[error("cannot load orchestrator configuration")]
    Config(#[source] OperationError),

    #[error("operation failed")]
    Operation(#[from] OperationError),

    #[error("failed to render output")]
    Render(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
