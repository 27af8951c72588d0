//! JSON-file-backed muted-reposts store.
//!
//! All viewers share one document keyed `prefs-muted-reposts:<viewer did>`,
//! each value a `{ "<did>": true }` map. Writes go to a temporary sibling
//! first and are renamed into place.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{MutedRepostsStore, MutedRepostsStoreError};
use crate::domain::{Did, MutedRepostsByDid};

const KEY_PREFIX: &str = "prefs-muted-reposts:";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

type StoredPreferences = BTreeMap<String, MutedRepostsByDid>;

fn storage_key(viewer: &Did) -> String {
    format!("{KEY_PREFIX}{viewer}")
}

/// Mute preferences persisted in a single JSON file.
pub struct JsonFileMutedRepostsStore {
    dir: Dir,
    file_name: String,
    write_lock: Mutex<()>,
}

impl JsonFileMutedRepostsStore {
    /// Open a store at `path`. The file itself need not exist yet; its
    /// parent directory must.
    ///
    /// # Errors
    ///
    /// Returns [`MutedRepostsStoreError::Io`] when the parent directory
    /// cannot be opened or `path` names no file.
    pub fn open(path: &Path) -> Result<Self, MutedRepostsStoreError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                MutedRepostsStoreError::io(format!("`{}` does not name a file", path.display()))
            })?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
            MutedRepostsStoreError::io(format!("open {}: {err}", parent.display()))
        })?;
        Ok(Self {
            dir,
            file_name,
            write_lock: Mutex::new(()),
        })
    }

    fn load(&self) -> Result<StoredPreferences, MutedRepostsStoreError> {
        let contents = match self.dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(StoredPreferences::new());
            }
            Err(err) => {
                return Err(MutedRepostsStoreError::io(format!(
                    "read {}: {err}",
                    self.file_name
                )));
            }
        };
        if contents.trim().is_empty() {
            return Ok(StoredPreferences::new());
        }
        serde_json::from_str(&contents).map_err(|err| {
            MutedRepostsStoreError::decode(format!("parse {}: {err}", self.file_name))
        })
    }

    fn write_atomic(&self, contents: &str) -> Result<(), MutedRepostsStoreError> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        let tmp_name = format!(
            ".{}.tmp.{}.{}.{}",
            self.file_name,
            std::process::id(),
            suffix,
            counter
        );

        let result = self
            .write_temp(&tmp_name, contents)
            .and_then(|()| self.dir.rename(&tmp_name, &self.dir, &self.file_name));
        if let Err(err) = result {
            drop(self.dir.remove_file(&tmp_name));
            return Err(MutedRepostsStoreError::io(format!(
                "write {}: {err}",
                self.file_name
            )));
        }
        Ok(())
    }

    fn write_temp(&self, tmp_name: &str, contents: &str) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = self.dir.open_with(tmp_name, &options)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }
}

#[async_trait]
impl MutedRepostsStore for JsonFileMutedRepostsStore {
    async fn read(&self, viewer: &Did) -> Result<Option<MutedRepostsByDid>, MutedRepostsStoreError> {
        let mut stored = self.load()?;
        Ok(stored.remove(&storage_key(viewer)))
    }

    async fn save(
        &self,
        viewer: &Did,
        muted: &MutedRepostsByDid,
    ) -> Result<(), MutedRepostsStoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| MutedRepostsStoreError::io("mute store lock poisoned"))?;
        let mut stored = self.load()?;
        let key = storage_key(viewer);
        if muted.is_empty() {
            stored.remove(&key);
        } else {
            stored.insert(key, muted.clone());
        }
        let contents = serde_json::to_string_pretty(&stored).map_err(|err| {
            MutedRepostsStoreError::decode(format!("encode mute preferences: {err}"))
        })?;
        self.write_atomic(&contents)?;
        debug!(viewer = %viewer, muted = muted.len(), "saved muted reposts");
        Ok(())
    }
}
