// Task store over a single JSON document

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Snapshot, Status, Task, now_second};

/// Longest accepted task description, in characters
const MAX_DESCRIPTION_LEN: usize = 255;

/// Suffix appended to the task file name when a corrupt copy is moved aside
const BACKUP_SUFFIX: &str = ".bak";

/// File-backed task store
///
/// Owns the task collection and the monotonic ID counter persisted at the
/// given path. Every mutating operation loads the snapshot, applies exactly
/// one change in memory, and writes the whole document back atomically.
/// A file that fails to parse is moved aside to `<name>.bak` and replaced
/// with a fresh empty snapshot on the next save; the unreadable bytes are
/// never discarded.
pub struct TaskStore {
    path: PathBuf,
}

/// Result of loading the persisted snapshot
#[derive(Debug)]
pub struct Loaded {
    pub snapshot: Snapshot,
    /// Where a corrupt file was moved, when recovery ran during this load
    pub backup: Option<PathBuf>,
}

impl TaskStore {
    /// Create a store over the given task file path
    ///
    /// The file does not need to exist yet; a missing file loads as an
    /// empty snapshot.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the task file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Read the persisted snapshot
    ///
    /// A missing file is not an error. A file that exists but does not parse
    /// is renamed to the backup name before a fresh snapshot is returned, so
    /// the corrupt bytes survive even if the process dies right after; the
    /// returned `Loaded::backup` names the moved file.
    pub fn load(&self) -> Result<Loaded> {
        if !self.path.exists() {
            return Ok(Loaded {
                snapshot: Snapshot::default(),
                backup: None,
            });
        }

        let raw = fs::read_to_string(&self.path)?;

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Loaded {
                snapshot,
                backup: None,
            }),
            Err(err) => {
                let backup = backup_path(&self.path);
                fs::rename(&self.path, &backup)?;
                warn!(
                    file = %self.path.display(),
                    backup = %backup.display(),
                    error = %err,
                    "task file is corrupt, moved it aside and starting fresh"
                );
                Ok(Loaded {
                    snapshot: Snapshot::default(),
                    backup: Some(backup),
                })
            }
        }
    }

    /// Serialize the full snapshot and atomically replace the task file
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the target, so a reader never observes a partial write.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, snapshot).map_err(io::Error::from)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| Error::Storage(err.error))?;

        debug!(
            file = %self.path.display(),
            tasks = snapshot.tasks.len(),
            last_id = snapshot.last_id,
            "persisted snapshot"
        );
        Ok(())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Create a new task with the next ID and `todo` status
    ///
    /// The only path that increments `last_id`.
    pub fn create(&self, description: &str) -> Result<Task> {
        let description = validate_description(description)?;

        let Loaded { mut snapshot, .. } = self.load()?;
        let id = snapshot.last_id + 1;
        let now = now_second();

        let task = Task {
            id,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        };

        snapshot.last_id = id;
        snapshot.tasks.push(task.clone());
        self.save(&snapshot)?;

        Ok(task)
    }

    /// Replace the description of an existing task
    pub fn update(&self, id: u64, description: &str) -> Result<Task> {
        let description = validate_description(description)?;

        let Loaded { mut snapshot, .. } = self.load()?;
        let task = snapshot.task_mut(id).ok_or(Error::NotFound(id))?;
        task.description = description;
        task.updated_at = now_second();
        let updated = task.clone();

        self.save(&snapshot)?;
        Ok(updated)
    }

    /// Remove a task, keeping the relative order of the rest
    ///
    /// A delete that matches nothing does not rewrite the file, so callers
    /// can tell "nothing happened" from "something changed". `last_id` is
    /// never decremented.
    pub fn delete(&self, id: u64) -> Result<()> {
        let Loaded { mut snapshot, .. } = self.load()?;

        let before = snapshot.tasks.len();
        snapshot.tasks.retain(|task| task.id != id);
        if snapshot.tasks.len() == before {
            return Err(Error::NotFound(id));
        }

        self.save(&snapshot)
    }

    /// Move an existing task to the given status
    ///
    /// The status arrives already typed; token validation lives in
    /// `Status::from_str`, so an invalid token never touches storage.
    pub fn set_status(&self, id: u64, status: Status) -> Result<Task> {
        let Loaded { mut snapshot, .. } = self.load()?;
        let task = snapshot.task_mut(id).ok_or(Error::NotFound(id))?;
        task.status = status;
        task.updated_at = now_second();
        let updated = task.clone();

        self.save(&snapshot)?;
        Ok(updated)
    }

    pub fn mark_todo(&self, id: u64) -> Result<Task> {
        self.set_status(id, Status::Todo)
    }

    pub fn mark_in_progress(&self, id: u64) -> Result<Task> {
        self.set_status(id, Status::InProgress)
    }

    pub fn mark_done(&self, id: u64) -> Result<Task> {
        self.set_status(id, Status::Done)
    }

    /// List tasks in insertion order, optionally only those with one status
    ///
    /// Read-only: never persists.
    pub fn list(&self, filter: Option<Status>) -> Result<Vec<Task>> {
        let Loaded { snapshot, .. } = self.load()?;

        match filter {
            Some(status) => Ok(snapshot
                .tasks
                .into_iter()
                .filter(|task| task.status == status)
                .collect()),
            None => Ok(snapshot.tasks),
        }
    }
}

/// Parse a caller-supplied textual task ID
///
/// Fails with the dedicated parse error on non-integer input, distinct from
/// the not-found case for a well-formed but absent ID.
pub fn parse_task_id(raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| Error::ParseId)
}

fn validate_description(raw: &str) -> Result<String> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(Error::empty_description());
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::description_too_long(MAX_DESCRIPTION_LEN));
    }
    Ok(description.to_string())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}
