//! File-backed note store: one record per line in a single flat file.
//!
//! No handle is held between calls. Every operation reads the whole file, works on the
//! lines in memory and, when it mutates, either appends one line or rewrites the whole
//! file through [NoteStore::replace_all]. There is no locking and no temp-file rename:
//! a failed rewrite can leave the file truncated.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::codec::{self, DecodedRecord, Note};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Result of an operation that validates its input before touching the file.
/// Validation failures are ordinary outcomes; the file is left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Done(T),
    /// The note body was empty or whitespace only.
    EmptyBody,
    /// `index` (1-based) is not in `1..=len`.
    OutOfRange { index: usize, len: usize },
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}

/// A decoded note with its 1-based position, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedNote {
    pub index: usize,
    pub timestamp: String,
    pub body: String,
}

impl ListedNote {
    fn from_line(index: usize, line: &str) -> Self {
        let record = codec::decode(line);
        if record.parsed_timestamp().is_none() {
            debug!("record {index} has no well-formed timestamp");
        }
        let DecodedRecord { timestamp, body } = record;
        Self {
            index,
            timestamp,
            body,
        }
    }
}

/// The note file and the operations on it. Cheap to create; holds only the path.
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    /// Bind to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Bind to `path` and create the file if it is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.ensure_exists()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the backing file, empty, if it does not exist. Parent directories are not created.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => {
                info!("created notes file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(StoreError::Create(self.path.clone(), e)),
        }
    }

    /// Every raw record line, in file order. No validation of content: bytes that are not
    /// UTF-8 come back as U+FFFD instead of failing the whole load.
    pub fn load(&self) -> Result<Vec<String>, StoreError> {
        let read_err = |e| StoreError::Read(self.path.clone(), e);
        let file = File::open(&self.path).map_err(read_err)?;
        let lines = BufReader::new(file)
            .split(b'\n')
            .map(|chunk| chunk.map(|bytes| decode_line(&bytes)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        debug!("loaded {} record(s) from {}", lines.len(), self.path.display());
        Ok(lines)
    }

    /// Encodes `note` and appends it as one line.
    pub fn append(&self, note: &Note) -> Result<String, StoreError> {
        let write_err = |e| StoreError::Write(self.path.clone(), e);
        let line = codec::encode(note);
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        // Line and terminator in a single write.
        file.write_all(format!("{line}{LINE_ENDING}").as_bytes())
            .map_err(write_err)?;
        Ok(line)
    }

    /// Truncates the file and writes `lines` back in order. Delete, edit and clear all go through here.
    pub fn replace_all<S: AsRef<str>>(&self, lines: &[S]) -> Result<(), StoreError> {
        let write_err = |e| StoreError::Write(self.path.clone(), e);
        let file = File::create(&self.path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        for line in lines {
            out.write_all(line.as_ref().as_bytes()).map_err(write_err)?;
            out.write_all(LINE_ENDING.as_bytes()).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
        debug!("rewrote {} with {} record(s)", self.path.display(), lines.len());
        Ok(())
    }

    /// Adds a note stamped now. Returns the line written.
    pub fn add(&self, body: &str) -> Result<Outcome<String>, StoreError> {
        self.add_note(&Note::now(body))
    }

    pub fn add_note(&self, note: &Note) -> Result<Outcome<String>, StoreError> {
        if codec::is_blank(&note.body) {
            warn!("rejected empty note");
            return Ok(Outcome::EmptyBody);
        }
        let line = self.append(note)?;
        info!("added note to {}", self.path.display());
        Ok(Outcome::Done(line))
    }

    /// All notes decoded, numbered from 1.
    pub fn list(&self) -> Result<Vec<ListedNote>, StoreError> {
        Ok(self
            .load()?
            .iter()
            .enumerate()
            .map(|(i, line)| ListedNote::from_line(i + 1, line))
            .collect())
    }

    /// The note at 1-based `index`, decoded.
    pub fn get(&self, index: usize) -> Result<Outcome<DecodedRecord>, StoreError> {
        let lines = self.load()?;
        Ok(match position(index, lines.len()) {
            Some(i) => Outcome::Done(codec::decode(&lines[i])),
            None => Outcome::OutOfRange {
                index,
                len: lines.len(),
            },
        })
    }

    /// Removes the note at 1-based `index`. Returns the removed raw line.
    pub fn delete(&self, index: usize) -> Result<Outcome<String>, StoreError> {
        let mut lines = self.load()?;
        let Some(i) = position(index, lines.len()) else {
            warn!("delete: index {index} out of range (1..={})", lines.len());
            return Ok(Outcome::OutOfRange {
                index,
                len: lines.len(),
            });
        };
        let removed = lines.remove(i);
        self.replace_all(&lines)?;
        info!("deleted note {index} from {}", self.path.display());
        Ok(Outcome::Done(removed))
    }

    /// Replaces the note at 1-based `index` with `body`, stamped now. Returns the old raw line.
    pub fn edit(&self, index: usize, body: &str) -> Result<Outcome<String>, StoreError> {
        self.edit_note(index, &Note::now(body))
    }

    pub fn edit_note(&self, index: usize, note: &Note) -> Result<Outcome<String>, StoreError> {
        if codec::is_blank(&note.body) {
            warn!("edit: rejected empty note");
            return Ok(Outcome::EmptyBody);
        }
        let mut lines = self.load()?;
        let Some(i) = position(index, lines.len()) else {
            warn!("edit: index {index} out of range (1..={})", lines.len());
            return Ok(Outcome::OutOfRange {
                index,
                len: lines.len(),
            });
        };
        let old = std::mem::replace(&mut lines[i], codec::encode(note));
        self.replace_all(&lines)?;
        info!("edited note {index} in {}", self.path.display());
        Ok(Outcome::Done(old))
    }

    /// Removes every note. The file stays, empty.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.replace_all::<String>(&[])?;
        info!("cleared {}", self.path.display());
        Ok(())
    }

    /// Lazily yields `(index, raw_line)` for every line containing `keyword`, ignoring case.
    /// Timestamp and body are both searched. The keyword is trimmed first.
    pub fn search(
        &self,
        keyword: &str,
    ) -> Result<impl Iterator<Item = (usize, String)>, StoreError> {
        let needle = keyword.trim().to_lowercase();
        let lines = self.load()?;
        Ok(lines
            .into_iter()
            .enumerate()
            .filter(move |(_, line)| line.to_lowercase().contains(&needle))
            .map(|(i, line)| (i + 1, line)))
    }

    /// [NoteStore::search] with the hits decoded for display.
    pub fn search_listed(&self, keyword: &str) -> Result<Vec<ListedNote>, StoreError> {
        Ok(self
            .search(keyword)?
            .map(|(index, line)| ListedNote::from_line(index, &line))
            .collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// One raw line without its `\r` terminator, decoded lossily.
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Maps a 1-based index to a 0-based position when it is in range.
fn position(index: usize, len: usize) -> Option<usize> {
    (1..=len).contains(&index).then(|| index - 1)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot create notes file {0}: {1}")]
    Create(PathBuf, std::io::Error),
    #[error("error reading notes from {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("error writing notes to {0}: {1}")]
    Write(PathBuf, std::io::Error),
}
