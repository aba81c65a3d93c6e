use std::fmt;

use thiserror::Error;
use trust_dns_resolver::error::ResolveError;

/// Errors raised when querying a single resolver endpoint.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("no answer from the DNS server for the requested domain and record type")]
    NoAnswer,
    #[error("the requested domain does not exist")]
    Nxdomain,
    #[error("no nameservers are available to fulfill the request")]
    NoNameservers,
    #[error("the DNS request timed out")]
    Timeout,
    #[error("lookup failed for {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: ResolveError,
    },
    #[error("TXT record {name} contains invalid UTF-8 data: {source}")]
    TxtDataUtf8 {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl DnsError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn lookup(name: impl Into<String>, source: ResolveError) -> Self {
        Self::Lookup {
            name: name.into(),
            source,
        }
    }

    pub(crate) fn txt_data_utf8(name: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::TxtDataUtf8 {
            name: name.into(),
            source,
        }
    }

    pub fn kind(&self) -> DnsErrorKind {
        match self {
            Self::NoAnswer => DnsErrorKind::NoAnswer,
            Self::Nxdomain => DnsErrorKind::Nxdomain,
            Self::NoNameservers => DnsErrorKind::NoNameservers,
            Self::Timeout => DnsErrorKind::Timeout,
            _ => DnsErrorKind::Other,
        }
    }
}

/// Copyable failure classification stored in result matrix cells. The full
/// [`DnsError`] with its source chain stays on the single-lookup surface.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsErrorKind {
    NoAnswer,
    Nxdomain,
    NoNameservers,
    Timeout,
    Other,
}

impl DnsErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoAnswer => {
                "no answer from the DNS server for the requested domain and record type"
            }
            Self::Nxdomain => "the requested domain does not exist",
            Self::NoNameservers => "no nameservers are available to fulfill the request",
            Self::Timeout => "the DNS request timed out",
            Self::Other => "the DNS lookup failed",
        }
    }
}

impl fmt::Display for DnsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
