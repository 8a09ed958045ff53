//! # ros-api
//!
//! A synchronous client for the MikroTik RouterOS binary API:
//! - length-prefixed word framing over plain TCP or TLS
//! - sentence/paragraph assembly with typed reply classification
//! - login handshake with the legacy MD5 challenge-response fallback
//! - liveness probing and an injected verbose conversation log
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                              │
//! │        (open / login / talk / is_alive / close)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Sentence            ▲ ReplyRecord
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   SentenceTransport                          │
//! │        (words + zero-length terminator, verbose taps)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ length prefix + UTF-8 bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      ApiStream                               │
//! │                (TcpStream | rustls TLS)                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use ros_api::{ApiConfig, Session};
//!
//! # fn main() -> ros_api::Result<()> {
//! let config = ApiConfig::builder("192.168.88.1")
//!     .user("admin")
//!     .password("secret")
//!     .build();
//! let session = Session::connect(config)?;
//! for record in session.execute("/interface/print")? {
//!     println!("{:?}", record.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod protocol;
pub mod session;
pub mod transport;
pub mod verbose;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{ApiConfig, ApiConfigBuilder, DEFAULT_PORT, DEFAULT_SSL_PORT};
pub use error::{ApiError, Result};
pub use protocol::{Command, Message, Paragraph, Reply, ReplyRecord, Sentence};
pub use session::{Session, SessionState};
pub use verbose::{VerboseLog, Verbosity};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ros-api
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
