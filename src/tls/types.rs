use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Default deadline covering connect and handshake, each.
pub const DEFAULT_TLS_TIMEOUT: Duration = Duration::from_secs(10);

/// Metadata extracted from a peer certificate. Built fresh per handshake,
/// never cached. Optional fields the certificate does not carry are `None`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Value of the first subject RDN, usually the common name.
    pub subject: Option<String>,
    /// Value of the first issuer RDN.
    pub issuer: Option<String>,
    /// X.509 version as presented (3 for v3).
    pub version: u32,
    /// Serial number as colon-separated uppercase hex.
    pub serial: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// DNS subject alternative names, in certificate order.
    pub subject_alt_names: Vec<String>,
    pub ocsp_uri: Option<String>,
    pub ca_issuer_uri: Option<String>,
}

impl CertificateInfo {
    pub fn expiry_status(&self) -> ExpiryStatus {
        self.expiry_status_at(Utc::now())
    }

    /// Pure function of the validity window and `now`; days are whole-day
    /// truncated, so a certificate expiring in 36 hours is valid for 1 day.
    pub fn expiry_status_at(&self, now: DateTime<Utc>) -> ExpiryStatus {
        if self.not_after < now {
            ExpiryStatus::Expired {
                days: (now - self.not_after).num_days(),
            }
        } else {
            ExpiryStatus::Valid {
                days: (self.not_after - now).num_days(),
            }
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Valid { days: i64 },
    Expired { days: i64 },
}

impl ExpiryStatus {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid { days } => write!(f, "valid for {days} days"),
            Self::Expired { days } => write!(f, "expired {days} days ago"),
        }
    }
}

/// Options for one inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsInspectOptions {
    port: u16,
    timeout: Duration,
}

impl TlsInspectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TlsInspectOptions {
    fn default() -> Self {
        Self {
            port: 443,
            timeout: DEFAULT_TLS_TIMEOUT,
        }
    }
}
