//! Sentence and paragraph types
//!
//! A sentence is an ordered sequence of words terminated on the wire by
//! a zero-length word. The first word identifies the sentence kind: a
//! command path on send (`/login`, `/interface/print`), or a reply
//! marker on receive (`!done`, `!re`, `!trap`, `!fatal`).

use std::fmt;

/// Reply marker: the command completed
pub const DONE: &str = "!done";

/// Reply marker: a data sentence, attribute words follow
pub const DATA: &str = "!re";

/// Reply marker: the command failed (error attributes follow)
pub const TRAP: &str = "!trap";

/// Reply marker: the connection is about to be torn down
pub const FATAL: &str = "!fatal";

/// Prefix of the legacy login challenge attribute
const RET_PREFIX: &str = "=ret=";

// =============================================================================
// Sentence
// =============================================================================

/// An ordered sequence of words forming one protocol sentence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    words: Vec<String>,
}

impl Sentence {
    /// Create an empty sentence
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sentence from pre-tokenized words
    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one word
    pub fn push(&mut self, word: impl Into<String>) {
        self.words.push(word.into());
    }

    /// All words in order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The kind word, if any
    pub fn first(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the sentence has no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True for a `!done` completion sentence
    pub fn is_done(&self) -> bool {
        self.first() == Some(DONE)
    }

    /// True for a `!trap` or `!fatal` error sentence
    pub fn is_trap(&self) -> bool {
        matches!(self.first(), Some(TRAP) | Some(FATAL))
    }

    /// Legacy login challenge token, when present
    ///
    /// Older firmware answers the first `/login` with exactly two
    /// words: `!done` and `=ret=<hex challenge>`.
    pub fn challenge(&self) -> Option<&str> {
        if self.words.len() != 2 {
            return None;
        }
        self.words[1].strip_prefix(RET_PREFIX)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words.join(" "))
    }
}

// =============================================================================
// Paragraph
// =============================================================================

/// All sentences belonging to one command's reply
///
/// Collection stops at the `!done` sentence, which is kept as the final
/// element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    sentences: Vec<Sentence>,
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one received sentence
    pub fn push(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    /// All sentences in arrival order
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// The first sentence of the reply, if any
    pub fn first(&self) -> Option<&Sentence> {
        self.sentences.first()
    }

    /// Number of sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// True when nothing was received
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for sentence in &self.sentences {
            write!(f, "{sep}{sentence}")?;
            sep = "; ";
        }
        Ok(())
    }
}
