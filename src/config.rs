//! Configuration for an API session
//!
//! Centralized configuration with the router's factory defaults.

use std::sync::Arc;
use std::time::Duration;

use crate::verbose::Verbosity;

/// Default plaintext API port
pub const DEFAULT_PORT: u16 = 8728;

/// Default TLS API port
pub const DEFAULT_SSL_PORT: u16 = 8729;

/// Default user name (RouterOS factory default)
pub const DEFAULT_USER: &str = "admin";

/// Configuration for one [`Session`](crate::Session)
#[derive(Clone)]
pub struct ApiConfig {
    // -------------------------------------------------------------------------
    // Target
    // -------------------------------------------------------------------------
    /// Router address (hostname or IP)
    pub address: String,

    /// Port override; when `None` the port derives from `use_ssl`
    pub port: Option<u16>,

    // -------------------------------------------------------------------------
    // Credentials
    // -------------------------------------------------------------------------
    /// API user name
    pub user: String,

    /// API password
    pub password: String,

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------
    /// Wrap the socket in TLS after connecting
    pub use_ssl: bool,

    /// TLS client configuration; `None` selects the documented default
    /// (no peer verification, no hostname check)
    pub tls: Option<Arc<rustls::ClientConfig>>,

    /// Socket timeout applied to connect and read; `None` blocks forever
    pub timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Verbose conversation log destination
    pub verbosity: Verbosity,
}

impl ApiConfig {
    /// Config for the given router address with factory defaults
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: None,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            use_ssl: false,
            tls: None,
            timeout: None,
            verbosity: Verbosity::None,
        }
    }

    /// Create a new config builder
    pub fn builder(address: impl Into<String>) -> ApiConfigBuilder {
        ApiConfigBuilder {
            config: Self::new(address),
        }
    }

    /// The effective port: explicit override, else derived from `use_ssl`
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(if self.use_ssl {
            DEFAULT_SSL_PORT
        } else {
            DEFAULT_PORT
        })
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The password stays out of debug output
        f.debug_struct("ApiConfig")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("use_ssl", &self.use_ssl)
            .field("timeout", &self.timeout)
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiConfig`]
pub struct ApiConfigBuilder {
    config: ApiConfig,
}

impl ApiConfigBuilder {
    /// Set the API user name
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    /// Set the API password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Enable or disable the TLS transport
    pub fn use_ssl(mut self, use_ssl: bool) -> Self {
        self.config.use_ssl = use_ssl;
        self
    }

    /// Override the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    /// Supply a TLS client configuration (trust policy included)
    pub fn tls(mut self, tls: Arc<rustls::ClientConfig>) -> Self {
        self.config.tls = Some(tls);
        self
    }

    /// Set the socket timeout for connect and read
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the verbose conversation log destination
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    pub fn build(self) -> ApiConfig {
        self.config
    }
}
