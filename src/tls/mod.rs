//! TLS certificate inspection (`with-tls` feature).
//!
//! The public entry point is [`inspect_certificate`], which performs a full
//! handshake (TLS 1.2 minimum) against the target host, reads the peer
//! certificate and extracts the metadata a report needs. Chain validity is
//! whatever the platform trust store says; no extra verification is layered
//! on top.

mod cert;
mod error;
mod inspect;
mod types;

pub use error::TlsError;
pub use types::{
    CertificateInfo, DEFAULT_TLS_TIMEOUT, ExpiryStatus, TlsInspectOptions,
};

/// Inspects the certificate presented by `host` on port 443 with the default
/// timeout.
pub fn inspect_certificate(host: &str) -> Result<CertificateInfo, TlsError> {
    inspect_certificate_with_options(host, &TlsInspectOptions::default())
}

pub fn inspect_certificate_with_options(
    host: &str,
    options: &TlsInspectOptions,
) -> Result<CertificateInfo, TlsError> {
    inspect::inspect(host, options)
}

#[cfg(test)]
mod tests;
