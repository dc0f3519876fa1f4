//! Durable task store backed by an append-only document log.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::record::LogRecord;
use crate::store::TaskStore;
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use ticklist_protocol::{NewTask, Task, TaskId, TaskUpdate};

/// Log file name.
const LOG_FILE: &str = "tasks.log";

/// Temporary file used while compacting.
const COMPACT_FILE: &str = "tasks.log.compact";

/// Lock file name.
const LOCK_FILE: &str = "LOCK";

/// A task store persisted as a log of put/delete records.
///
/// The full collection is kept in memory; the log is replayed on open.
/// A torn or corrupt tail left by a crash is truncated away, keeping every
/// record before it.
///
/// # Directory Structure
///
/// ```text
/// data/
/// ├── LOCK        # Exclusive lock file
/// └── tasks.log   # Append-only record log
/// ```
///
/// # Thread Safety
///
/// All access goes through one internal mutex; writes append a record
/// before the in-memory view changes.
///
/// # Example
///
/// ```no_run
/// use ticklist_protocol::NewTask;
/// use ticklist_store::{FileStore, StoreConfig, TaskStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("data"), StoreConfig::default()).unwrap();
/// store.insert(NewTask::new("persistent task")).unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    config: StoreConfig,
    state: Mutex<LogState>,
    /// Held for the lifetime of the store.
    _lock_file: File,
}

#[derive(Debug)]
struct LogState {
    file: File,
    tasks: Vec<Task>,
    /// Records no longer needed to rebuild `tasks`.
    dead_records: usize,
}

impl FileStore {
    /// Opens or creates a store in the given directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory is missing and `create_if_missing` is false
    /// - Another process holds the lock
    /// - The log cannot be read or repaired
    pub fn open(dir: &Path, config: StoreConfig) -> StoreResult<Self> {
        if !dir.exists() {
            if config.create_if_missing {
                fs::create_dir_all(dir)?;
            } else {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("store directory does not exist: {}", dir.display()),
                )));
            }
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked);
        }

        let log_path = dir.join(LOG_FILE);
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&log_path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let replay = replay(&bytes);

        if replay.valid_len < bytes.len() {
            tracing::warn!(
                path = %log_path.display(),
                kept = replay.valid_len,
                dropped = bytes.len() - replay.valid_len,
                "truncating damaged log tail"
            );
            file.set_len(replay.valid_len as u64)?;
            file.sync_all()?;
        }

        tracing::debug!(
            path = %log_path.display(),
            tasks = replay.tasks.len(),
            dead = replay.dead_records,
            "opened task log"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            config,
            state: Mutex::new(LogState {
                file,
                tasks: replay.tasks,
                dead_records: replay.dead_records,
            }),
            _lock_file: lock_file,
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the log file.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// Returns the number of records that compaction would drop.
    #[must_use]
    pub fn dead_records(&self) -> usize {
        self.state.lock().dead_records
    }

    /// Rewrites the log to a single put record per live task.
    ///
    /// # Errors
    ///
    /// Returns an error if the new log cannot be written or swapped in.
    pub fn compact(&self) -> StoreResult<()> {
        let mut state = self.state.lock();
        self.compact_locked(&mut state)
    }

    fn compact_locked(&self, state: &mut LogState) -> StoreResult<()> {
        let compact_path = self.dir.join(COMPACT_FILE);
        let mut out = File::create(&compact_path)?;
        for task in &state.tasks {
            out.write_all(&LogRecord::Put(task.clone()).encode()?)?;
        }
        out.sync_all()?;
        drop(out);

        let log_path = self.log_path();
        fs::rename(&compact_path, &log_path)?;
        state.file = OpenOptions::new().read(true).append(true).open(&log_path)?;

        tracing::debug!(
            tasks = state.tasks.len(),
            dropped = state.dead_records,
            "compacted task log"
        );
        state.dead_records = 0;
        Ok(())
    }

    fn append(&self, state: &mut LogState, record: &LogRecord) -> StoreResult<()> {
        let bytes = record.encode()?;
        state.file.write_all(&bytes)?;
        state.file.flush()?;
        if self.config.sync_on_write {
            state.file.sync_data()?;
        }
        Ok(())
    }

    fn maybe_compact(&self, state: &mut LogState) -> StoreResult<()> {
        if state.dead_records > self.config.compact_threshold
            && state.dead_records > state.tasks.len()
        {
            self.compact_locked(state)?;
        }
        Ok(())
    }
}

impl TaskStore for FileStore {
    fn list(&self) -> StoreResult<Vec<Task>> {
        Ok(self.state.lock().tasks.clone())
    }

    fn get(&self, id: &TaskId) -> StoreResult<Task> {
        self.state
            .lock()
            .tasks
            .iter()
            .find(|task| &task.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn insert(&self, new_task: NewTask) -> StoreResult<Task> {
        new_task.validate()?;
        let task = Task::new(TaskId::generate(), new_task.text);

        let mut state = self.state.lock();
        self.append(&mut state, &LogRecord::Put(task.clone()))?;
        state.tasks.push(task.clone());
        Ok(task)
    }

    fn update(&self, id: &TaskId, update: TaskUpdate) -> StoreResult<Task> {
        update.validate()?;

        let mut state = self.state.lock();
        let index = position(&state.tasks, id)?;
        let mut task = state.tasks[index].clone();
        update.apply_to(&mut task);

        self.append(&mut state, &LogRecord::Put(task.clone()))?;
        state.tasks[index] = task.clone();
        state.dead_records += 1;
        self.maybe_compact(&mut state)?;
        Ok(task)
    }

    fn remove(&self, id: &TaskId) -> StoreResult<Task> {
        let mut state = self.state.lock();
        let index = position(&state.tasks, id)?;

        self.append(&mut state, &LogRecord::Delete(id.clone()))?;
        let task = state.tasks.remove(index);
        // The last put and the delete itself are both dead now.
        state.dead_records += 2;
        self.maybe_compact(&mut state)?;
        Ok(task)
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.state.lock().tasks.len())
    }
}

fn position(tasks: &[Task], id: &TaskId) -> StoreResult<usize> {
    tasks
        .iter()
        .position(|task| &task.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

struct Replay {
    tasks: Vec<Task>,
    dead_records: usize,
    valid_len: usize,
}

/// Rebuilds the collection from raw log bytes, stopping at the first
/// incomplete or corrupt record.
fn replay(bytes: &[u8]) -> Replay {
    let mut tasks: Vec<Task> = Vec::new();
    let mut dead_records = 0;
    let mut offset = 0;

    while offset < bytes.len() {
        let (record, used) = match LogRecord::decode(&bytes[offset..]) {
            Ok(Some(decoded)) => decoded,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(offset, error = %e, "stopping log replay at corrupt record");
                break;
            }
        };

        match record {
            LogRecord::Put(task) => match tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => {
                    *existing = task;
                    dead_records += 1;
                }
                None => tasks.push(task),
            },
            LogRecord::Delete(id) => match tasks.iter().position(|t| t.id == id) {
                Some(index) => {
                    tasks.remove(index);
                    dead_records += 2;
                }
                None => dead_records += 1,
            },
        }
        offset += used;
    }

    Replay {
        tasks,
        dead_records,
        valid_len: offset,
    }
}
