//! Transport Module
//!
//! Socket setup (plain TCP or TLS) and the sentence-oriented framing
//! layer on top of it.

mod sentence_io;
mod stream;

pub use sentence_io::SentenceTransport;
pub use stream::{connect, insecure_tls_config, wrap_tls, ApiStream};
