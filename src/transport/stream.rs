//! Socket stream
//!
//! A connected stream to the router: plain TCP or TLS-wrapped. The
//! session owns exactly one of these; all timeout changes go through
//! [`ApiStream::set_read_timeout`] so the TLS variant stays in sync
//! with its underlying socket.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConnection, StreamOwned};

use crate::error::{ApiError, Result};

/// A connected stream, plain or TLS-wrapped
pub enum ApiStream {
    /// Raw TCP
    Plain(TcpStream),

    /// TLS over TCP
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl ApiStream {
    /// Apply a read timeout to the underlying socket
    ///
    /// `None` blocks forever. A timed-out read surfaces as
    /// `WouldBlock`/`TimedOut` from the OS and is mapped to
    /// [`ApiError::Timeout`] by the transport.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.socket().set_read_timeout(timeout)
    }

    /// Shut down both directions of the underlying socket
    pub fn shutdown(&self) -> io::Result<()> {
        self.socket().shutdown(Shutdown::Both)
    }

    fn socket(&self) -> &TcpStream {
        match self {
            ApiStream::Plain(sock) => sock,
            ApiStream::Tls(stream) => &stream.sock,
        }
    }
}

impl Read for ApiStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ApiStream::Plain(sock) => sock.read(buf),
            ApiStream::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for ApiStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ApiStream::Plain(sock) => sock.write(buf),
            ApiStream::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ApiStream::Plain(sock) => sock.flush(),
            ApiStream::Tls(stream) => stream.flush(),
        }
    }
}

// =============================================================================
// Connecting
// =============================================================================

/// Resolve and connect a TCP socket to the router
///
/// Every resolved address is tried in order; the configured timeout
/// bounds each connect attempt and is installed as the read timeout of
/// the resulting socket. Any failure maps to
/// [`ApiError::ConnectionError`] carrying the host and port.
pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream> {
    let connection_error = || ApiError::ConnectionError {
        host: host.to_string(),
        port,
    };

    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|_| connection_error())?
        .collect();

    let mut stream = None;
    for addr in &addrs {
        let attempt = match timeout {
            Some(bound) => TcpStream::connect_timeout(addr, bound),
            None => TcpStream::connect(addr),
        };
        if let Ok(sock) = attempt {
            stream = Some(sock);
            break;
        }
    }
    let stream = stream.ok_or_else(connection_error)?;

    // Request/response exchanges are small; don't batch them
    stream.set_nodelay(true).map_err(|_| connection_error())?;
    stream
        .set_read_timeout(timeout)
        .map_err(|_| connection_error())?;

    Ok(stream)
}

/// Wrap a connected socket in TLS using the caller's trust context
pub fn wrap_tls(
    sock: TcpStream,
    config: Arc<rustls::ClientConfig>,
    host: &str,
) -> Result<ApiStream> {
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|e| ApiError::Tls(format!("invalid server name {host:?}: {e}")))?;
    let conn = ClientConnection::new(config, server_name)
        .map_err(|e| ApiError::Tls(e.to_string()))?;
    Ok(ApiStream::Tls(Box::new(StreamOwned::new(conn, sock))))
}

// =============================================================================
// Default TLS trust policy
// =============================================================================

/// The documented default TLS policy: no peer verification, no
/// hostname check
///
/// RouterOS devices ship with self-signed certificates, so the default
/// context accepts any certificate. Callers that need real validation
/// pass their own `rustls::ClientConfig` instead.
pub fn insecure_tls_config() -> Arc<rustls::ClientConfig> {
    let config = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoVerification))
        .with_no_client_auth();
    Arc::new(config)
}

/// Certificate verifier that accepts everything
#[derive(Debug)]
struct NoVerification;

impl rustls::client::danger::ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}
