use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::memory::{InMemoryStore, StoreState};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{Completion, Store, UnitOfWork};

/// Store backed by a single JSON document on disk.
///
/// The document is loaded once; every committed transaction rewrites it
/// atomically before the commit becomes visible, so a failed write rolls the
/// transaction back.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryStore,
}

impl JsonFileStore {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an entity
    /// is listed under a key different from its id.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = fs::read_to_string(&path).map_err(|source| OperationError::StoreRead {
            path: path.clone(),
            source,
        })?;
        let state: StoreState =
            serde_json::from_str(&contents).map_err(|source| OperationError::StoreParse {
                path: path.clone(),
                source,
            })?;
        check_keys(&path, &state)?;

        debug!(
            path = %path.display(),
            reservations = state.reservations.len(),
            properties = state.properties.len(),
            "loaded store file"
        );

        Ok(Self {
            path,
            inner: InMemoryStore::new(state),
        })
    }

    /// Writes `state` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn create(path: impl Into<PathBuf>, state: StoreState) -> Result<Self> {
        let path = path.into();
        write_state(&path, &state)?;
        Ok(Self {
            path,
            inner: InMemoryStore::new(state),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreState> {
        self.inner.snapshot()
    }
}

impl Store for JsonFileStore {
    fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&dyn UnitOfWork) -> Completion<T>,
    {
        self.inner
            .transaction_with_commit_hook(work, |state| write_state(&self.path, state))
    }
}

fn check_keys(path: &Path, state: &StoreState) -> Result<()> {
    let reservations = state
        .reservations
        .iter()
        .map(|(key, r)| ("reservation", key, &r.id));
    let properties = state
        .properties
        .iter()
        .map(|(key, p)| ("property", key, &p.id));

    for (entity, key, id) in reservations.chain(properties) {
        if key != id {
            return Err(OperationError::StoreKeyMismatch {
                path: path.to_path_buf(),
                entity,
                key: key.clone(),
                id: id.clone(),
            });
        }
    }
    Ok(())
}

fn write_state(path: &Path, state: &StoreState) -> Result<()> {
    let write_err = |source| OperationError::StoreWrite {
        path: path.to_path_buf(),
        source,
    };

    let json =
        serde_json::to_string_pretty(state).map_err(|source| OperationError::StoreSerialize {
            path: path.to_path_buf(),
            source,
        })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(json.as_bytes()).map_err(write_err)?;
    file.write_all(b"\n").map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), "wrote store file");
    Ok(())
}
