//! Error types for the RouterOS API client
//!
//! Provides a unified error type for all operations. Framing and
//! transport failures are distinct variants so callers can tell
//! "reconnect" apart from "the router rejected the command".

use thiserror::Error;

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified error type for RouterOS API operations
#[derive(Debug, Error)]
pub enum ApiError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Read or connect exceeded the configured bound
    #[error("Operation timed out")]
    Timeout,

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    /// The socket could not be established
    #[error("Failed to connect to RouterOS API. Host: {host}, port: {port}")]
    ConnectionError { host: String, port: u16 },

    /// The peer closed the connection in the middle of a word
    #[error("Socket connection broken")]
    ConnectionBroken,

    /// The session was explicitly closed; no further operations are valid
    #[error("Session is closed")]
    ConnectionClosed,

    /// TLS setup or handshake failed
    #[error("TLS error: {0}")]
    Tls(String),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    /// Word length does not fit the wire encoding (max 2^32 - 1)
    #[error("Word is too long ({0} bytes). Max length of a word is 4294967295")]
    WordTooLong(u64),

    /// The first length byte is a reserved control byte (> 0xF0)
    #[error("Invalid length prefix byte: {0:#04x}")]
    InvalidLength(u8),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Authentication rejected or the login reply was unparsable
    #[error("Login failed: {reply}")]
    LoginError { reply: String },

    /// The router answered an application command with a trap sentence
    #[error("Command {command:?} returned an error: {reply}")]
    RemoteCommandError { command: String, reply: String },

    /// A command was attempted before login completed
    #[error("Not authenticated: log in before sending commands")]
    NotAuthenticated,
}
