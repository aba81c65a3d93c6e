use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use native_tls::{HandshakeError, Protocol, TlsConnector, TlsStream};

use super::{CertificateInfo, TlsError, TlsInspectOptions, cert};

pub(crate) fn inspect(host: &str, options: &TlsInspectOptions) -> Result<CertificateInfo, TlsError> {
    let ascii = normalize_host(host)?;
    let port = options.port();
    let timeout = options.timeout();

    #[cfg(feature = "with-tracing")]
    tracing::debug!(host = ascii.as_str(), port, "inspecting TLS certificate");

    let addrs = (ascii.as_str(), port)
        .to_socket_addrs()
        .map_err(|err| connect_error(&ascii, port, err))?;
    let stream = connect_any(&ascii, port, addrs, timeout)?;
    stream
        .set_read_timeout(Some(timeout))
        .map_err(|err| connect_error(&ascii, port, err))?;
    stream
        .set_write_timeout(Some(timeout))
        .map_err(|err| connect_error(&ascii, port, err))?;

    let connector = TlsConnector::builder()
        .min_protocol_version(Some(Protocol::Tlsv12))
        .build()
        .map_err(TlsError::connector_init)?;

    // the stream is dropped on every exit path, handshake failure included
    let tls = complete_handshake(&connector, &ascii, port, stream, timeout)?;
    extract_peer_info(&ascii, &tls)
}

/// Tries every resolved address in order; the error reported is the one from
/// the last attempt.
pub(crate) fn connect_any(
    host: &str,
    port: u16,
    addrs: impl IntoIterator<Item = SocketAddr>,
    timeout: Duration,
) -> Result<TcpStream, TlsError> {
    let mut last_err: Option<io::Error> = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    let err = last_err
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"));
    Err(connect_error(host, port, err))
}

fn complete_handshake(
    connector: &TlsConnector,
    host: &str,
    port: u16,
    stream: TcpStream,
    timeout: Duration,
) -> Result<TlsStream<TcpStream>, TlsError> {
    // the stream is blocking with a read timeout, so a peer that never
    // answers surfaces as a WouldBlock handshake; past the deadline that is
    // a terminal timeout, not a reason to retry
    let deadline = Instant::now() + timeout;
    let mut result = connector.connect(host, stream);
    loop {
        match result {
            Ok(tls) => return Ok(tls),
            Err(HandshakeError::Failure(err)) => {
                return Err(classify_handshake_failure(host, port, err));
            }
            Err(HandshakeError::WouldBlock(mid)) => {
                if Instant::now() >= deadline {
                    return Err(TlsError::Timeout {
                        host: host.to_string(),
                        port,
                    });
                }
                result = mid.handshake();
            }
        }
    }
}

fn extract_peer_info(host: &str, tls: &TlsStream<TcpStream>) -> Result<CertificateInfo, TlsError> {
    let certificate = tls
        .peer_certificate()
        .map_err(TlsError::peer_certificate)?
        .ok_or_else(|| TlsError::NoPeerCertificate {
            host: host.to_string(),
        })?;
    let der = certificate.to_der().map_err(TlsError::peer_certificate)?;
    cert::parse_certificate(&der)
}

fn normalize_host(host: &str) -> Result<String, TlsError> {
    let trimmed = host.trim();
    if trimmed.is_empty() {
        return Err(TlsError::EmptyHost);
    }
    idna::domain_to_ascii(trimmed).map_err(TlsError::idna)
}

fn connect_error(host: &str, port: u16, err: io::Error) -> TlsError {
    if matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
        TlsError::Timeout {
            host: host.to_string(),
            port,
        }
    } else {
        TlsError::ConnectionFailed {
            host: host.to_string(),
            port,
            source: err,
        }
    }
}

fn classify_handshake_failure(host: &str, port: u16, err: native_tls::Error) -> TlsError {
    match handshake_error_class(&err) {
        HandshakeClass::Timeout => TlsError::Timeout {
            host: host.to_string(),
            port,
        },
        HandshakeClass::UnsupportedProtocol => TlsError::UnsupportedProtocol {
            host: host.to_string(),
        },
        HandshakeClass::Other => TlsError::HandshakeFailed {
            host: host.to_string(),
            source: err,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandshakeClass {
    Timeout,
    UnsupportedProtocol,
    Other,
}

/// Backend error strings are the only protocol-version signal native-tls
/// exposes; openssl, schannel and security-framework each word it
/// differently.
const PROTOCOL_VERSION_MARKERS: &[&str] = &[
    "unsupported protocol",
    "protocol version",
    "version too low",
    "wrong version number",
    "wrong ssl version",
];

pub(crate) fn handshake_error_class(err: &(dyn std::error::Error + 'static)) -> HandshakeClass {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) {
                return HandshakeClass::Timeout;
            }
        }
        let text = err.to_string().to_ascii_lowercase();
        if PROTOCOL_VERSION_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
        {
            return HandshakeClass::UnsupportedProtocol;
        }
        current = err.source();
    }
    HandshakeClass::Other
}
