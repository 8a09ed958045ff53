//! Sentence transport
//!
//! Sends and receives whole sentences over any blocking stream. Every
//! word crossing the wire is mirrored to the verbose side channel
//! (`>>> ` outgoing, `<<< ` incoming), matching the conversation format
//! RouterOS operators expect from API debug logs.

use std::io::{Read, Write};
use std::sync::Arc;

use bytes::{BufMut, BytesMut};

use crate::error::{ApiError, Result};
use crate::protocol::codec::{self, MAX_WORD_LENGTH};
use crate::protocol::{Paragraph, Sentence};
use crate::verbose::VerboseLog;

/// Sentence-oriented transport over a blocking stream
pub struct SentenceTransport<S> {
    stream: S,
    verbose: Arc<VerboseLog>,
}

impl<S: Read + Write> SentenceTransport<S> {
    /// Wrap a connected stream
    pub fn new(stream: S, verbose: Arc<VerboseLog>) -> Self {
        Self { stream, verbose }
    }

    /// Shared access to the underlying stream
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Consume the transport, yielding the stream
    pub fn into_inner(self) -> S {
        self.stream
    }

    // -------------------------------------------------------------------------
    // Sending
    // -------------------------------------------------------------------------

    /// Send one sentence: each word length-prefixed, then the
    /// zero-length terminator
    ///
    /// All word lengths are validated up front, so an oversized word
    /// fails with [`ApiError::WordTooLong`] before a single byte is
    /// written.
    pub fn send_sentence(&mut self, sentence: &Sentence) -> Result<()> {
        for word in sentence.words() {
            let len = word.len() as u64;
            if len > MAX_WORD_LENGTH {
                return Err(ApiError::WordTooLong(len));
            }
        }

        let mut buf = BytesMut::new();
        for word in sentence.words() {
            codec::put_length(word.len() as u64, &mut buf)?;
            buf.put_slice(word.as_bytes());
        }
        // Zero-length word marks the end of the sentence
        buf.put_u8(0);

        self.stream.write_all(&buf).map_err(map_io)?;
        self.stream.flush().map_err(map_io)?;

        for word in sentence.words() {
            self.verbose.log(&format!(">>> {word}"));
        }
        self.verbose.log("");
        tracing::trace!("Sent sentence: {}", sentence);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Receiving
    // -------------------------------------------------------------------------

    /// Receive one sentence: words until a zero-length marker
    pub fn read_sentence(&mut self) -> Result<Sentence> {
        let mut sentence = Sentence::new();
        loop {
            let len = decode_length(&mut self.stream)?;
            if len == 0 {
                break;
            }
            let word = self.read_word(len as usize)?;
            self.verbose.log(&format!("<<< {word}"));
            sentence.push(word);
        }
        self.verbose.log("");
        tracing::trace!("Received sentence: {}", sentence);
        Ok(sentence)
    }

    /// Collect a full paragraph: sentences up to and including `!done`
    pub fn read_paragraph(&mut self) -> Result<Paragraph> {
        let mut paragraph = Paragraph::new();
        loop {
            let sentence = self.read_sentence()?;
            let done = sentence.is_done();
            paragraph.push(sentence);
            if done {
                return Ok(paragraph);
            }
        }
    }

    /// Read exactly `len` bytes of word payload
    ///
    /// Short reads loop; a zero-byte read means the peer closed the
    /// connection mid-word. Invalid UTF-8 is replaced, not fatal.
    fn read_word(&mut self, len: usize) -> Result<String> {
        let mut buf = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = self.stream.read(&mut buf[filled..]).map_err(map_io)?;
            if n == 0 {
                return Err(ApiError::ConnectionBroken);
            }
            filled += n;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Decode a length prefix, normalizing timeout io errors
fn decode_length(r: &mut impl Read) -> Result<u64> {
    codec::decode_length(r).map_err(|e| match e {
        ApiError::Io(io) => map_io(io),
        other => other,
    })
}

/// Map blocking-socket io failures onto the typed error kinds
///
/// `WouldBlock` and `TimedOut` are how the two socket families report
/// an expired read timeout.
fn map_io(e: std::io::Error) -> ApiError {
    match e.kind() {
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => ApiError::Timeout,
        std::io::ErrorKind::UnexpectedEof => ApiError::ConnectionBroken,
        _ => ApiError::Io(e),
    }
}
