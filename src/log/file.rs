// src/log/file.rs

//! Durable, line-oriented log backend.
//!
//! Every entry is one JSON document on its own line. The byte offset of
//! each line is kept in memory so that scans can walk the file backwards
//! without reading it front to back. Reopening a file rebuilds that table,
//! which is how a computation resumes after the process went away.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{LogflowError, Result};
use crate::filter::Filter;
use crate::log::{ensure_ascending, Entry, Index, IndexGenerator, Log, Meta, Value};
use crate::types::Discipline;

const EXTENSION: &str = "jsonl";
const PARENT_EXTENSION: &str = "parent";

#[derive(Debug)]
struct FileState {
    /// `None` once the log has been closed.
    writer: Option<File>,
    offsets: Vec<u64>,
    end: u64,
    last: Option<Index>,
}

/// Full-history [`Log`] persisted as JSON lines.
#[derive(Debug)]
pub struct FileLog {
    id: Uuid,
    parent: Option<Uuid>,
    path: PathBuf,
    prefix: String,
    index: IndexGenerator,
    sync: bool,
    state: RwLock<FileState>,
}

impl FileLog {
    /// Create a new, empty log file `<dir>/<prefix>_<id>.jsonl`.
    pub fn create_in(dir: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        Self::create_with_index(dir.as_ref(), prefix, IndexGenerator::default())
    }

    fn create_with_index(dir: &Path, prefix: &str, index: IndexGenerator) -> Result<Self> {
        let id = Uuid::new_v4();
        let path = dir.join(format!("{prefix}_{id}.{EXTENSION}"));
        let writer = OpenOptions::new()
            .create_new(true)
            .append(true)
            .open(&path)?;

        debug!(log = %id, path = %path.display(), "created log file");

        Ok(Self {
            id,
            parent: None,
            path,
            prefix: prefix.to_string(),
            index,
            sync: true,
            state: RwLock::new(FileState {
                writer: Some(writer),
                offsets: Vec::new(),
                end: 0,
                last: None,
            }),
        })
    }

    /// Open the log stored at `path`, creating the file if it is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_index(path.as_ref(), IndexGenerator::default())
    }

    /// Like [`FileLog::open`], drawing new indexes from `index`.
    ///
    /// Recovered entries push the generator past the largest stored index.
    /// A trailing line without a newline is the remainder of an interrupted
    /// append and is cut off.
    pub fn open_with_index(path: &Path, index: IndexGenerator) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let writer = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let mut offsets = Vec::new();
        let mut end = 0u64;
        let mut last = None;
        {
            let mut reader = BufReader::new(&writer);
            let mut line = String::new();
            loop {
                line.clear();
                let read = reader.read_line(&mut line)?;
                if read == 0 {
                    break;
                }
                if !line.ends_with('\n') {
                    warn!(
                        path = %path.display(),
                        offset = end,
                        "dropping incomplete trailing line"
                    );
                    writer.set_len(end)?;
                    break;
                }
                if !line.trim().is_empty() {
                    let entry: Entry = serde_json::from_str(line.trim_end())?;
                    ensure_ascending(last, entry.index())?;
                    index.observe(entry.index());
                    last = Some(entry.index());
                    offsets.push(end);
                }
                end += read as u64;
            }
        }

        let (prefix, id) = split_file_stem(path);
        let parent = read_parent(path)?;
        info!(
            log = %id,
            path = %path.display(),
            entries = offsets.len(),
            "opened log file"
        );

        Ok(Self {
            id,
            parent,
            path: path.to_path_buf(),
            prefix,
            index,
            sync: true,
            state: RwLock::new(FileState {
                writer: Some(writer),
                offsets,
                end,
                last,
            }),
        })
    }

    /// Whether every append is flushed to stable storage before returning
    /// (default `true`).
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entry(&self, state: &mut FileState, entry: &Entry) -> Result<()> {
        ensure_ascending(state.last, entry.index())?;
        let writer = state.writer.as_mut().ok_or(LogflowError::Closed(self.id))?;

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let written = writer
            .write_all(&line)
            .and_then(|_| if self.sync { writer.sync_data() } else { Ok(()) });
        if let Err(err) = written {
            // Keep the file line-aligned for the next append and for recovery.
            if let Err(trunc) = writer.set_len(state.end) {
                warn!(log = %self.id, error = %trunc, "failed to truncate partial line");
            }
            return Err(err.into());
        }

        state.offsets.push(state.end);
        state.end += line.len() as u64;
        state.last = Some(entry.index());
        Ok(())
    }
}

impl Log for FileLog {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent(&self) -> Option<Uuid> {
        self.parent
    }

    fn discipline(&self) -> Discipline {
        Discipline::FullHistory
    }

    fn next_index(&self) -> Result<Index> {
        self.index.next()
    }

    fn append(&self, entry: Entry) -> Result<()> {
        let mut state = self.state.write();
        self.write_entry(&mut state, &entry)?;
        self.index.observe(entry.index());
        Ok(())
    }

    fn record(&self, producer: &str, value: Value, meta: Meta) -> Result<Entry> {
        let mut state = self.state.write();
        let entry = Entry::new(producer, self.index.next()?, value).with_meta(meta);
        self.write_entry(&mut state, &entry)?;
        debug!(log = %self.id, task = %producer, index = entry.index(), "entry recorded");
        Ok(entry)
    }

    fn scan(&self, filter: &mut dyn Filter) -> Result<Vec<Entry>> {
        let state = self.state.read();
        if state.writer.is_none() {
            return Err(LogflowError::Closed(self.id));
        }

        filter.reset();
        let mut result = Vec::new();
        if state.offsets.is_empty() {
            return Ok(result);
        }

        // A private handle per scan: concurrent scans must not share a cursor.
        let mut reader = BufReader::new(File::open(&self.path)?);
        let mut line = String::new();
        for &offset in state.offsets.iter().rev() {
            reader.seek(SeekFrom::Start(offset))?;
            line.clear();
            reader.read_line(&mut line)?;
            let entry: Entry = serde_json::from_str(line.trim_end())?;
            if filter.test(&entry) {
                result.push(entry);
            }
            if filter.complete() {
                break;
            }
        }
        Ok(result)
    }

    fn fork(&self, filter: &mut dyn Filter) -> Result<Self> {
        let selected = self.scan(filter)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut forked = Self::create_with_index(dir, &self.prefix, self.index.fork())
            .map_err(|err| match err {
                LogflowError::Io(source) => LogflowError::Fork {
                    log: self.id,
                    source,
                },
                other => other,
            })?
            .with_sync(self.sync);
        forked.parent = Some(self.id);
        fs::write(parent_path(&forked.path), self.id.to_string()).map_err(|source| {
            LogflowError::Fork {
                log: self.id,
                source,
            }
        })?;

        {
            let mut state = forked.state.write();
            for entry in selected.iter().rev() {
                forked.write_entry(&mut state, entry)?;
            }
        }

        debug!(
            parent = %self.id,
            log = %forked.id,
            path = %forked.path.display(),
            entries = selected.len(),
            "log file forked"
        );
        Ok(forked)
    }

    fn len(&self) -> usize {
        self.state.read().offsets.len()
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.write();
        if let Some(writer) = state.writer.take() {
            writer.sync_all()?;
            debug!(log = %self.id, path = %self.path.display(), "log file closed");
        }
        Ok(())
    }
}

/// Lineage sidecar of a forked log: `<prefix>_<uuid>.parent`, holding the
/// parent id.
fn parent_path(path: &Path) -> PathBuf {
    path.with_extension(PARENT_EXTENSION)
}

fn read_parent(path: &Path) -> Result<Option<Uuid>> {
    let sidecar = parent_path(path);
    if !sidecar.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&sidecar)?;
    match Uuid::parse_str(text.trim()) {
        Ok(parent) => Ok(Some(parent)),
        Err(err) => {
            warn!(path = %sidecar.display(), error = %err, "ignoring malformed parent id");
            Ok(None)
        }
    }
}

/// Split `<prefix>_<uuid>.jsonl` into its prefix and id. Files that do not
/// follow that naming get a fresh id and their whole stem as prefix.
fn split_file_stem(path: &Path) -> (String, Uuid) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some((prefix, tail)) = stem.rsplit_once('_') {
        if let Ok(id) = Uuid::parse_str(tail) {
            return (prefix.to_string(), id);
        }
    }
    (stem, Uuid::new_v4())
}
