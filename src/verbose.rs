//! Verbose conversation log
//!
//! Injected side channel that mirrors the raw API conversation
//! (`>>> word` / `<<< word`). The core only ever calls
//! [`VerboseLog::log`]; where the lines end up is decided entirely by
//! the [`Verbosity`] configuration. Write failures after construction
//! are swallowed so a full disk can never take a session down.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Where verbose conversation lines go
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Discard everything
    #[default]
    None,

    /// Print to stdout
    Console,

    /// Write to a file; `append` keeps an existing log, otherwise the
    /// file is truncated
    File { path: PathBuf, append: bool },

    /// Print to stdout and write to a file
    Both { path: PathBuf, append: bool },
}

enum Sink {
    None,
    Console,
    File(Mutex<File>),
    Both(Mutex<File>),
}

/// The verbose log sink handed to the session and transport
pub struct VerboseLog {
    sink: Sink,
}

impl VerboseLog {
    /// Build a sink for the given configuration
    ///
    /// File-backed modes open (and possibly truncate) the file here, so
    /// a bad path fails construction rather than being discovered on
    /// the first logged word.
    pub fn new(verbosity: &Verbosity) -> io::Result<Self> {
        let sink = match verbosity {
            Verbosity::None => Sink::None,
            Verbosity::Console => Sink::Console,
            Verbosity::File { path, append } => Sink::File(Mutex::new(open(path, *append)?)),
            Verbosity::Both { path, append } => Sink::Both(Mutex::new(open(path, *append)?)),
        };
        Ok(Self { sink })
    }

    /// A sink that discards everything
    pub fn disabled() -> Self {
        Self { sink: Sink::None }
    }

    /// Emit one conversation line
    pub fn log(&self, message: &str) {
        match &self.sink {
            Sink::None => {}
            Sink::Console => println!("{message}"),
            Sink::File(file) => {
                let _ = write_line(&mut file.lock(), message);
            }
            Sink::Both(file) => {
                println!("{message}");
                let _ = write_line(&mut file.lock(), message);
            }
        }
    }
}

fn open(path: &Path, append: bool) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(append)
        .write(true)
        .truncate(!append)
        .open(path)
}

fn write_line(file: &mut File, message: &str) -> io::Result<()> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    writeln!(file, "{stamp} - {message}")
}
