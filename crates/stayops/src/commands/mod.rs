mod cancel;
mod confirm;
mod show;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use stayops_core::{Actor, Role};
use stayops_operations::OrchestratorConfig;
use stayops_operations::config::DEFAULT_CONFIG_FILE;
use stayops_operations::operations::LifecycleOperation;
use stayops_operations::providers::{JsonFileStore, SystemClock, TracingNotifier};
use tracing::debug;

use crate::error::{CliError, Result};
use crate::output::OutputFormat;

pub(crate) type CliLifecycle = LifecycleOperation<JsonFileStore, TracingNotifier, SystemClock>;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Confirm a pending reservation
    Confirm(confirm::ConfirmArgs),
    /// Cancel a reservation
    Cancel(cancel::CancelArgs),
    /// Show a reservation with its tasks, ledger rows and audit entries
    Show(show::ShowArgs),
}

impl Commands {
    /// Returns `Ok(false)` when the command ran but its outcome was a failure.
    pub(crate) fn execute(self, session: &Session) -> Result<bool> {
        match self {
            Self::Confirm(args) => confirm::run(session, &args),
            Self::Cancel(args) => cancel::run(session, &args),
            Self::Show(args) => show::run(session, &args),
        }
    }
}

/// The authenticated user on whose behalf a lifecycle command runs.
#[derive(Args)]
pub(crate) struct ActorArgs {
    /// Id of the acting user
    #[arg(long = "actor-id")]
    id: String,

    /// Email of the acting user
    #[arg(long = "actor-email")]
    email: String,

    /// Role of the acting user
    #[arg(long = "actor-role", value_enum)]
    role: Role,
}

impl ActorArgs {
    pub(crate) fn to_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.email.clone(), self.role)
    }
}

/// Global options shared by every command.
pub(crate) struct Session {
    store_path: PathBuf,
    config_path: Option<PathBuf>,
    format: OutputFormat,
}

impl Session {
    pub(crate) fn new(
        store_path: PathBuf,
        config_path: Option<PathBuf>,
        format: OutputFormat,
    ) -> Self {
        Self {
            store_path,
            config_path,
            format,
        }
    }

    pub(crate) fn format(&self) -> OutputFormat {
        self.format
    }

    pub(crate) fn open_store(&self) -> Result<JsonFileStore> {
        JsonFileStore::open(&self.store_path).map_err(|source| CliError::OpenStore {
            path: self.store_path.clone(),
            source,
        })
    }

    fn load_config(&self) -> Result<OrchestratorConfig> {
        let config = match &self.config_path {
            Some(path) => OrchestratorConfig::load(path),
            None => OrchestratorConfig::load_or_default(&self.default_config_path()),
        };
        config.map_err(CliError::Config)
    }

    fn default_config_path(&self) -> PathBuf {
        let dir = self
            .store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        dir.join(DEFAULT_CONFIG_FILE)
    }

    pub(crate) fn lifecycle(&self) -> Result<CliLifecycle> {
        let config = self.load_config()?;
        let store = self.open_store()?;
        debug!(store = %store.path().display(), ?config, "opened lifecycle session");
        Ok(LifecycleOperation::new(
            store,
            TracingNotifier::new(),
            SystemClock,
            config,
        ))
    }
}
