use std::time::Duration;

use anyhow::{Context, Result};
use dnstoolbox_lib::{
    CertificateInfo, ExpiryStatus, TlsInspectOptions, inspect_certificate_with_options,
};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct TlsSummary {
    pub host: String,
    pub port: u16,
    pub certificate: CertificateInfo,
    pub expiry: ExpiryStatus,
}

impl TlsSummary {
    pub fn human_lines(&self) -> Vec<String> {
        let cert = &self.certificate;
        let mut lines = vec![
            format!("certificate of {}:{}", self.host, self.port),
            format!("  subject: {}", cert.subject.as_deref().unwrap_or("<none>")),
            format!("  issuer: {}", cert.issuer.as_deref().unwrap_or("<none>")),
            format!("  version: {}", cert.version),
            format!("  serial: {}", cert.serial),
            format!("  not before: {}", cert.not_before),
            format!("  not after: {}", cert.not_after),
            format!("  expiry: {}", self.expiry),
        ];
        if !cert.subject_alt_names.is_empty() {
            lines.push(format!("  SANs: {}", cert.subject_alt_names.join(", ")));
        }
        if let Some(uri) = cert.ocsp_uri.as_deref() {
            lines.push(format!("  OCSP: {uri}"));
        }
        if let Some(uri) = cert.ca_issuer_uri.as_deref() {
            lines.push(format!("  CA issuers: {uri}"));
        }
        lines
    }

    pub fn any_findings(&self) -> bool {
        self.expiry.is_expired()
    }
}

pub fn run(host: &str, port: u16, timeout: Duration) -> Result<TlsSummary> {
    let options = TlsInspectOptions::new().with_port(port).with_timeout(timeout);
    let certificate = inspect_certificate_with_options(host, &options)
        .with_context(|| format!("TLS inspection of '{host}:{port}'"))?;
    let expiry = certificate.expiry_status();
    Ok(TlsSummary {
        host: host.trim().to_string(),
        port,
        certificate,
        expiry,
    })
}
