use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use trust_dns_resolver::proto::rr::RecordType as WireRecordType;

use super::DnsError;

/// Record categories the toolbox can query. Fixed, closed set.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Txt,
}

impl RecordType {
    pub const ALL: [RecordType; 6] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Txt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Txt => "TXT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|rtype| rtype.as_str().eq_ignore_ascii_case(trimmed))
    }

    pub(crate) fn to_wire(self) -> WireRecordType {
        match self {
            Self::A => WireRecordType::A,
            Self::Aaaa => WireRecordType::AAAA,
            Self::Cname => WireRecordType::CNAME,
            Self::Mx => WireRecordType::MX,
            Self::Ns => WireRecordType::NS,
            Self::Txt => WireRecordType::TXT,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named DNS server queried directly, bypassing the system chain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverEndpoint {
    pub name: String,
    pub address: IpAddr,
}

impl ResolverEndpoint {
    pub fn new(name: impl Into<String>, address: IpAddr) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// Ordered set of resolver endpoints. Order drives display and discrepancy
/// grouping, never correctness.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverPanel {
    endpoints: Vec<ResolverEndpoint>,
}

impl ResolverPanel {
    pub fn new(endpoints: Vec<ResolverEndpoint>) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[ResolverEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&ResolverEndpoint> {
        let trimmed = name.trim();
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.name.eq_ignore_ascii_case(trimmed))
    }

    pub fn names(&self) -> Vec<&str> {
        self.endpoints
            .iter()
            .map(|endpoint| endpoint.name.as_str())
            .collect()
    }
}

impl Default for ResolverPanel {
    fn default() -> Self {
        Self::new(vec![
            ResolverEndpoint::new("Google", IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))),
            ResolverEndpoint::new("Cloudflare", IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1))),
            ResolverEndpoint::new("Quad9", IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9))),
        ])
    }
}

/// Result of one (domain, record type, endpoint) query. An empty answer is
/// never a success: absence of records surfaces as [`DnsError::NoAnswer`].
pub type QueryOutcome = Result<Vec<String>, DnsError>;
