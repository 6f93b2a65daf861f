//! JSON-file state store.
//!
//! The mapping is kept as a single pretty-printed JSON object with sorted
//! keys. Flushes write and sync a sibling temporary file, then rename it over
//! the state file, so a crash leaves either the old or the new content in
//! place.

use crate::sync::{
    domain::{InternalId, RemoteId},
    ports::{StateStore, StateStoreError, StateStoreResult},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use tracing::{debug, info};

/// State file name used when none is configured.
pub const DEFAULT_STATE_FILE: &str = "sync_state.json";

/// State store persisted as a JSON object at a fixed path.
#[derive(Debug)]
pub struct JsonFileStateStore {
    dir: Option<Dir>,
    parent: Utf8PathBuf,
    path: Utf8PathBuf,
    file_name: String,
    entries: BTreeMap<InternalId, RemoteId>,
}

impl JsonFileStateStore {
    /// Loads the state file at `path`.
    ///
    /// A missing file yields an empty store. Nothing is written here; a missing
    /// parent directory is created by the first [`StateStore::flush`].
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Corrupt`] when the file exists but is not a
    /// JSON object of strings, and [`StateStoreError::Persistence`] for I/O
    /// failures.
    pub fn load(path: impl AsRef<Utf8Path>) -> StateStoreResult<Self> {
        let state_path = path.as_ref();
        let file_name = state_path
            .file_name()
            .ok_or_else(|| StateStoreError::Corrupt {
                path: state_path.to_string(),
                reason: "state path has no file name".to_owned(),
            })?
            .to_owned();
        let parent = match state_path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => Some(dir),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(StateStoreError::persistence(err)),
        };
        let contents = match dir.as_ref().map(|dir| dir.read_to_string(&file_name)) {
            Some(Ok(contents)) => Some(contents),
            Some(Err(err)) if err.kind() != ErrorKind::NotFound => {
                return Err(StateStoreError::persistence(err));
            }
            Some(Err(_)) | None => None,
        };
        let entries = match contents {
            Some(contents) => parse_entries(state_path, &contents)?,
            None => {
                debug!(path = %state_path, "No prior state file, starting empty");
                BTreeMap::new()
            }
        };
        info!(path = %state_path, entries = entries.len(), "Loaded sync state");

        Ok(Self {
            dir,
            parent: parent.to_owned(),
            path: state_path.to_owned(),
            file_name,
            entries,
        })
    }

    /// Returns the state file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn temp_file_name(&self) -> String {
        format!("{}.tmp", self.file_name)
    }

    fn write_atomically(&self, dir: &Dir, contents: &[u8]) -> std::io::Result<()> {
        let temp_name = self.temp_file_name();
        let mut file = dir.create(&temp_name)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        dir.rename(&temp_name, dir, &self.file_name)
    }
}

fn parse_entries(
    path: &Utf8Path,
    contents: &str,
) -> StateStoreResult<BTreeMap<InternalId, RemoteId>> {
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(contents).map_err(|err| StateStoreError::Corrupt {
        path: path.to_string(),
        reason: err.to_string(),
    })
}

impl StateStore for JsonFileStateStore {
    fn get(&self, internal_id: &InternalId) -> Option<RemoteId> {
        self.entries.get(internal_id).cloned()
    }

    fn set(&mut self, internal_id: InternalId, remote_id: RemoteId) {
        self.entries.insert(internal_id, remote_id);
    }

    fn delete(&mut self, internal_id: &InternalId) -> Option<RemoteId> {
        self.entries.remove(internal_id)
    }

    fn flush(&self) -> StateStoreResult<()> {
        let mut contents =
            serde_json::to_string_pretty(&self.entries).map_err(StateStoreError::persistence)?;
        contents.push('\n');

        let created;
        let dir = if let Some(dir) = &self.dir {
            dir
        } else {
            Dir::create_ambient_dir_all(&self.parent, ambient_authority())
                .map_err(StateStoreError::persistence)?;
            created = Dir::open_ambient_dir(&self.parent, ambient_authority())
                .map_err(StateStoreError::persistence)?;
            &created
        };
        self.write_atomically(dir, contents.as_bytes())
            .map_err(StateStoreError::persistence)?;
        debug!(path = %self.path, entries = self.entries.len(), "Flushed sync state");
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<InternalId, RemoteId> {
        self.entries.clone()
    }
}
