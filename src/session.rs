//! Session Module
//!
//! The client session that coordinates all components: socket setup,
//! login (modern and legacy), command exchanges, the liveness probe,
//! and teardown.
//!
//! ## Lifecycle
//!
//! ```text
//! Unconnected ──open()──► Connected ──login()──► Authenticated
//!                                                     │
//!                            close() / failed probe   ▼
//!                                                   Closed (terminal)
//! ```
//!
//! Application commands are only accepted in `Authenticated`; `Closed`
//! has no way out.

use std::sync::Arc;
use std::time::Duration;

use md5::{Digest, Md5};
use parking_lot::Mutex;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::protocol::{trap_message, Command, Message, Paragraph, Reply, ReplyRecord, Sentence};
use crate::transport::{self, ApiStream, SentenceTransport};
use crate::verbose::VerboseLog;

/// Read timeout used by the liveness probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Command issued by the liveness probe
const PROBE_COMMAND: &str = "/system/identity/print";

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, no socket yet
    Unconnected,

    /// Socket open, not logged in
    Connected,

    /// Logged in, ready for commands
    Authenticated,

    /// Torn down; terminal
    Closed,
}

struct Inner {
    state: SessionState,
    transport: Option<SentenceTransport<ApiStream>>,
}

/// A client session with one RouterOS device
///
/// ## Concurrency Model
///
/// The protocol has no request identifiers, so exactly one command may
/// be in flight per socket. All mutable state (socket, lifecycle
/// state) lives behind a single `Mutex`; every operation takes `&self`
/// and holds the lock for its whole request/response exchange, so a
/// shared `Session` serializes callers instead of interleaving them.
/// A batch holds the lock across all of its commands.
pub struct Session {
    config: ApiConfig,
    verbose: Arc<VerboseLog>,
    inner: Mutex<Inner>,
}

impl Session {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create an unconnected session
    ///
    /// Fails only when the verbose log sink cannot be set up (bad log
    /// file path).
    pub fn new(config: ApiConfig) -> Result<Self> {
        let verbose = Arc::new(VerboseLog::new(&config.verbosity)?);
        verbose.log("");
        verbose.log("#-----------------------------------------------#");
        verbose.log(&format!(
            "API IP - {}, USER - {}",
            config.address, config.user
        ));
        Ok(Self {
            config,
            verbose,
            inner: Mutex::new(Inner {
                state: SessionState::Unconnected,
                transport: None,
            }),
        })
    }

    /// Open, log in, and probe in one step
    ///
    /// Convenience constructor matching the common case: the returned
    /// session is `Authenticated` and has answered one probe.
    pub fn connect(config: ApiConfig) -> Result<Self> {
        let session = Self::new(config)?;
        session.open()?;
        session.login()?;
        if !session.is_alive()? {
            return Err(ApiError::ConnectionBroken);
        }
        Ok(session)
    }

    /// The configuration this session was built with
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Open the socket (and wrap it in TLS when configured)
    ///
    /// Transitions `Unconnected → Connected`. A no-op when already
    /// connected; fails with [`ApiError::ConnectionClosed`] after
    /// `close()`.
    pub fn open(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        match inner.state {
            SessionState::Closed => return Err(ApiError::ConnectionClosed),
            SessionState::Unconnected => {}
            _ => return Ok(()),
        }

        let port = self.config.effective_port();
        let sock = transport::connect(&self.config.address, port, self.config.timeout)?;

        let stream = if self.config.use_ssl {
            let tls = self
                .config
                .tls
                .clone()
                .unwrap_or_else(transport::insecure_tls_config);
            transport::wrap_tls(sock, tls, &self.config.address)?
        } else {
            ApiStream::Plain(sock)
        };

        inner.transport = Some(SentenceTransport::new(stream, Arc::clone(&self.verbose)));
        inner.state = SessionState::Connected;
        self.verbose.log("API socket connection opened.");
        tracing::debug!("Connected to {}:{}", self.config.address, port);
        Ok(())
    }

    /// Log in with the configured credentials
    ///
    /// Sends `/login` with name and password. Three reply shapes are
    /// valid:
    /// - a lone `!done`: modern login succeeded;
    /// - a trap: credentials rejected, [`ApiError::LoginError`];
    /// - `!done` with `=ret=<hex>`: older firmware requesting the
    ///   legacy challenge-response, answered with
    ///   `=response=00<md5 hex>` and re-checked the same way.
    ///
    /// Transitions `Connected → Authenticated`.
    pub fn login(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        match inner.state {
            SessionState::Closed => return Err(ApiError::ConnectionClosed),
            SessionState::Unconnected => {
                return Err(ApiError::ConnectionError {
                    host: self.config.address.clone(),
                    port: self.config.effective_port(),
                })
            }
            SessionState::Authenticated => return Ok(()),
            SessionState::Connected => {}
        }

        let mut sentence = Sentence::from_words([
            "/login".to_string(),
            format!("=name={}", self.config.user),
            format!("=password={}", self.config.password),
        ]);

        loop {
            let paragraph = Self::communicate(&mut inner, &sentence)?;
            let first = paragraph.first().ok_or_else(|| ApiError::LoginError {
                reply: "empty reply".to_string(),
            })?;

            if first.len() == 1 && first.is_done() {
                inner.state = SessionState::Authenticated;
                self.verbose.log("Logged in successfully!");
                tracing::debug!(
                    "Logged in to {} as {}",
                    self.config.address,
                    self.config.user
                );
                return Ok(());
            }

            if first.is_trap() {
                tracing::warn!("Login rejected by {}", self.config.address);
                return Err(ApiError::LoginError {
                    reply: paragraph.to_string(),
                });
            }

            if let Some(token) = first.challenge() {
                // Older firmware: answer the MD5 challenge and check
                // the second reply through the same three-way branch
                self.verbose.log("Using old login process.");
                tracing::debug!("Router requested legacy challenge-response login");
                let response =
                    legacy_response(&self.config.password, token).ok_or_else(|| {
                        ApiError::LoginError {
                            reply: format!("malformed challenge: {paragraph}"),
                        }
                    })?;
                sentence = Sentence::from_words([
                    "/login".to_string(),
                    format!("=name={}", self.config.user),
                    format!("=response={response}"),
                ]);
                continue;
            }

            return Err(ApiError::LoginError {
                reply: format!("unexpected reply to login: {paragraph}"),
            });
        }
    }

    /// Close the session
    ///
    /// Idempotent; afterwards every operation fails with
    /// [`ApiError::ConnectionClosed`].
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        Self::close_locked(&mut inner);
        tracing::debug!("Session with {} closed", self.config.address);
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Run one command and map its reply
    ///
    /// Refused with [`ApiError::NotAuthenticated`] before login (no
    /// bytes are written). A trap reply fails with
    /// [`ApiError::RemoteCommandError`]; no partial record list is
    /// ever returned.
    pub fn execute(&self, command: impl Into<Command>) -> Result<Vec<ReplyRecord>> {
        let mut inner = self.inner.lock();
        self.execute_locked(&mut inner, command.into())
    }

    /// Run a single command or an ordered batch
    ///
    /// Batch commands run sequentially over the same socket; the lock
    /// is held across the whole batch so nothing interleaves.
    pub fn talk(&self, message: impl Into<Message>) -> Result<Reply> {
        match message.into() {
            Message::Command(command) => {
                let mut inner = self.inner.lock();
                Ok(Reply::Single(self.execute_locked(&mut inner, command)?))
            }
            Message::Batch(commands) => {
                let mut inner = self.inner.lock();
                let mut replies = Vec::with_capacity(commands.len());
                for command in commands {
                    replies.push(self.execute_locked(&mut inner, command)?);
                }
                Ok(Reply::Batch(replies))
            }
        }
    }

    fn execute_locked(&self, inner: &mut Inner, command: Command) -> Result<Vec<ReplyRecord>> {
        match inner.state {
            SessionState::Closed => return Err(ApiError::ConnectionClosed),
            SessionState::Authenticated => {}
            _ => return Err(ApiError::NotAuthenticated),
        }

        let command_display = command.display();
        let sentence = command.into_sentence();
        let paragraph = Self::communicate(inner, &sentence)?;

        if let Some(first) = paragraph.first() {
            if first.is_trap() {
                tracing::warn!(
                    "Command {:?} returned an error: {}",
                    command_display,
                    trap_message(first).unwrap_or("unknown")
                );
                return Err(ApiError::RemoteCommandError {
                    command: command_display,
                    reply: paragraph.to_string(),
                });
            }
        }

        Ok(paragraph.records())
    }

    /// One request/response exchange: send a sentence, collect the
    /// paragraph up to `!done`
    fn communicate(inner: &mut Inner, sentence: &Sentence) -> Result<Paragraph> {
        let transport = inner
            .transport
            .as_mut()
            .ok_or(ApiError::ConnectionBroken)?;
        transport.send_sentence(sentence)?;
        transport.read_paragraph()
    }

    // -------------------------------------------------------------------------
    // Liveness
    // -------------------------------------------------------------------------

    /// Check that the router still answers
    ///
    /// Lowers the read timeout to two seconds, issues an identity
    /// query, and restores the configured timeout afterwards whatever
    /// happens. A timeout, broken connection, or malformed reply
    /// closes the socket and returns `false`; any other failure
    /// propagates. Success leaves the session `Authenticated`.
    pub fn is_alive(&self) -> Result<bool> {
        let mut inner = self.inner.lock();
        if inner.state != SessionState::Authenticated {
            self.verbose.log("Socket is closed.");
            return Ok(false);
        }

        let timeout_lowered = match inner.transport.as_ref() {
            Some(transport) => transport
                .stream()
                .set_read_timeout(Some(PROBE_TIMEOUT))
                .is_ok(),
            None => false,
        };
        if !timeout_lowered {
            self.verbose.log("Socket is closed.");
            Self::close_locked(&mut inner);
            return Ok(false);
        }

        let probe = self.execute_locked(&mut inner, Command::Raw(PROBE_COMMAND.to_string()));

        // Restore the configured timeout before judging the outcome
        if let Some(transport) = inner.transport.as_ref() {
            let _ = transport.stream().set_read_timeout(self.config.timeout);
        }

        match probe {
            Ok(_) => {
                self.verbose.log("Socket is open, router responds.");
                Ok(true)
            }
            Err(e) if probe_failure(&e) => {
                self.verbose.log("Router does not respond, closing socket.");
                tracing::debug!("Liveness probe failed for {}: {}", self.config.address, e);
                Self::close_locked(&mut inner);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn close_locked(inner: &mut Inner) {
        if let Some(transport) = inner.transport.take() {
            let _ = transport.into_inner().shutdown();
        }
        inner.state = SessionState::Closed;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        Self::close_locked(&mut inner);
    }
}

/// Failures the liveness probe recovers from by reporting "not alive"
fn probe_failure(e: &ApiError) -> bool {
    match e {
        ApiError::Timeout
        | ApiError::ConnectionBroken
        | ApiError::InvalidLength(_) => true,
        ApiError::Io(io) => matches!(
            io.kind(),
            std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
        ),
        _ => false,
    }
}

/// Compute the legacy login response word value
///
/// MD5 over a NUL byte, the password, and the hex-decoded challenge;
/// the wire value is `"00"` followed by the hex digest.
fn legacy_response(password: &str, token: &str) -> Option<String> {
    let challenge = hex::decode(token).ok()?;
    let mut md5 = Md5::new();
    md5.update([0u8]);
    md5.update(password.as_bytes());
    md5.update(&challenge);
    Some(format!("00{}", hex::encode(md5.finalize())))
}
