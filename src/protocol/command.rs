//! Command definitions
//!
//! Commands arrive either pre-tokenized or as a raw string that is
//! split on whitespace. A message is one command or an ordered batch;
//! the discriminant is explicit rather than inferred from the value's
//! runtime shape.

use super::reply::ReplyRecord;
use super::sentence::Sentence;

/// A single command to send to the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A raw command line, split on whitespace into words
    Raw(String),

    /// Pre-tokenized words, sent as-is
    Words(Vec<String>),
}

impl Command {
    /// Tokenize into the sentence that goes on the wire
    pub fn into_sentence(self) -> Sentence {
        match self {
            Command::Raw(line) => Sentence::from_words(line.split_whitespace()),
            Command::Words(words) => Sentence::from_words(words),
        }
    }

    /// Human-readable form for error reporting
    pub fn display(&self) -> String {
        match self {
            Command::Raw(line) => line.clone(),
            Command::Words(words) => words.join(" "),
        }
    }
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        Command::Raw(line.to_string())
    }
}

impl From<String> for Command {
    fn from(line: String) -> Self {
        Command::Raw(line)
    }
}

impl From<Vec<String>> for Command {
    fn from(words: Vec<String>) -> Self {
        Command::Words(words)
    }
}

/// One conversation with the router: a single command or a batch
///
/// Batches run sequentially over the same socket; the protocol has no
/// request identifiers, so there is never more than one command in
/// flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// One command, one reply
    Command(Command),

    /// Several commands, executed in order
    Batch(Vec<Command>),
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message::Command(command)
    }
}

impl From<&str> for Message {
    fn from(line: &str) -> Self {
        Message::Command(Command::from(line))
    }
}

impl From<Vec<Command>> for Message {
    fn from(commands: Vec<Command>) -> Self {
        Message::Batch(commands)
    }
}

/// Reply to a [`Message`], mirroring its shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Records for a single command
    Single(Vec<ReplyRecord>),

    /// Per-command record lists, in submission order
    Batch(Vec<Vec<ReplyRecord>>),
}

impl Reply {
    /// Unwrap a single-command reply
    ///
    /// Returns `None` for a batch reply.
    pub fn into_single(self) -> Option<Vec<ReplyRecord>> {
        match self {
            Reply::Single(records) => Some(records),
            Reply::Batch(_) => None,
        }
    }
}
