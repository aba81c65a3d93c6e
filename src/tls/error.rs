use thiserror::Error;

/// Errors raised when inspecting a host's TLS certificate. All variants are
/// terminal for the invocation, never fatal to the process.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("host is empty")]
    EmptyHost,
    #[error("host IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("connection to {host}:{port} failed: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("connection to {host}:{port} timed out")]
    Timeout { host: String, port: u16 },
    #[error("{host} does not support TLS 1.2 or newer")]
    UnsupportedProtocol { host: String },
    #[error("TLS handshake with {host} failed: {source}")]
    HandshakeFailed {
        host: String,
        #[source]
        source: native_tls::Error,
    },
    #[error("TLS connector initialization failed: {source}")]
    ConnectorInit {
        #[source]
        source: native_tls::Error,
    },
    #[error("no peer certificate presented by {host}")]
    NoPeerCertificate { host: String },
    #[error("peer certificate could not be read: {source}")]
    PeerCertificate {
        #[source]
        source: native_tls::Error,
    },
    #[error("certificate parsing failed: {detail}")]
    CertificateParse { detail: String },
}

impl TlsError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn connector_init(source: native_tls::Error) -> Self {
        Self::ConnectorInit { source }
    }

    pub(crate) fn peer_certificate(source: native_tls::Error) -> Self {
        Self::PeerCertificate { source }
    }

    pub(crate) fn parse(detail: impl Into<String>) -> Self {
        Self::CertificateParse {
            detail: detail.into(),
        }
    }
}
