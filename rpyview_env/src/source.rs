//! Line sources: where each tick gets its data line from.

use crate::EnvError;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default data file polled by the viewer.
pub const DEFAULT_DATA_FILE: &str = "rpy_data.txt";

/// A source of single data lines, read once per component per tick.
///
/// # Implementations
///
/// - **Production**: `FileSource` - opens, reads and closes a file every call
/// - **Testing**: `ScriptedSource` - replays a fixed sequence of lines
pub trait LineSource {
    /// Reads the current line, without the trailing newline.
    fn read_line(&self) -> Result<String, EnvError>;

    /// Human-readable name for logs.
    fn describe(&self) -> String;
}

/// Polls a file on disk. No handle is kept between reads.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Polls `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The polled file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

impl LineSource for FileSource {
    fn read_line(&self) -> Result<String, EnvError> {
        let file = File::open(&self.path).map_err(|e| EnvError::file_access(&self.path, e))?;
        let mut bytes = Vec::new();
        BufReader::new(file)
            .read_until(b'\n', &mut bytes)
            .map_err(|e| EnvError::file_access(&self.path, e))?;

        // Undecodable bytes are bad data, not an access failure.
        let line = String::from_utf8(bytes).map_err(|e| EnvError::invalid_encoding(&self.path, e))?;

        // An empty file yields an empty line; parsing rejects it downstream.
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// One scripted read: a line, or a simulated access failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedRead {
    Line(String),
    Missing,
}

impl From<&str> for ScriptedRead {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

/// Replays a scripted sequence of reads.
///
/// Once the script runs out the last entry is served forever, the way a file
/// keeps its content until the writer replaces it.
pub struct ScriptedSource {
    reads: Mutex<VecDeque<ScriptedRead>>,
    last: Mutex<ScriptedRead>,
}

impl ScriptedSource {
    pub fn new(reads: impl IntoIterator<Item = ScriptedRead>) -> Self {
        Self {
            reads: Mutex::new(reads.into_iter().collect()),
            last: Mutex::new(ScriptedRead::Missing),
        }
    }

    /// Builds a source from plain lines.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(lines.into_iter().map(ScriptedRead::from))
    }

    /// Number of scripted reads not yet served.
    pub fn remaining(&self) -> usize {
        self.reads.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn next_read(&self) -> ScriptedRead {
        let next = self.reads.lock().ok().and_then(|mut r| r.pop_front());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(read) = next {
            *last = read;
        }
        last.clone()
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&self) -> Result<String, EnvError> {
        match self.next_read() {
            ScriptedRead::Line(line) => Ok(line),
            ScriptedRead::Missing => Err(EnvError::file_access(
                "<scripted>",
                std::io::Error::new(std::io::ErrorKind::NotFound, "scripted read missing"),
            )),
        }
    }

    fn describe(&self) -> String {
        "scripted source".to_string()
    }
}
