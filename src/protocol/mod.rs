//! Protocol Module
//!
//! Types and codecs for the RouterOS binary API wire protocol.
//!
//! ## Wire Format
//!
//! ```text
//! ┌────────────┬────────────┬─────┬────────────┬────────────┬──────┐
//! │ len(word0) │   word0    │ ... │ len(wordN) │   wordN    │ 0x00 │
//! └────────────┴────────────┴─────┴────────────┴────────────┴──────┘
//! ```
//!
//! Each word is UTF-8 text prefixed by a variable-width big-endian
//! length (see [`codec`]); a zero-length word terminates the sentence.
//!
//! ## Sentence kinds (first word)
//! - `/path ...`  — command sent to the router
//! - `!re`        — data reply, attribute words follow
//! - `!done`      — completion, ends the paragraph
//! - `!trap`      — the command failed
//! - `!fatal`     — the connection is being torn down

mod command;
mod reply;
mod sentence;

pub mod codec;

pub use command::{Command, Message, Reply};
pub use reply::{trap_message, ReplyRecord};
pub use sentence::{Paragraph, Sentence, DATA, DONE, FATAL, TRAP};
