//! Single-endpoint DNS queries and record-fetch helpers.
//!
//! Every lookup goes through a [`DirectResolver`] bound to exactly one
//! nameserver, so a result is always attributable to a specific endpoint.
//! The public entry points are [`query_record`] and its variants; the M365
//! bundle builds on the same primitives.

mod client;
mod error;
mod fetch;
mod types;

pub use client::{DEFAULT_QUERY_TIMEOUT, DirectResolver};
pub use error::{DnsError, DnsErrorKind};
pub use types::{QueryOutcome, RecordType, ResolverEndpoint, ResolverPanel};

pub(crate) use client::LookupRecords;
pub(crate) use fetch::{first_txt_containing, subdomain_cname};

use std::time::Duration;

/// Queries `rtype` for `domain` against one panel endpoint with the default
/// timeout. The domain is normalized via IDNA before querying.
pub fn query_record(
    domain: &str,
    endpoint: &ResolverEndpoint,
    rtype: RecordType,
) -> QueryOutcome {
    query_record_with_timeout(domain, endpoint, rtype, DEFAULT_QUERY_TIMEOUT)
}

pub fn query_record_with_timeout(
    domain: &str,
    endpoint: &ResolverEndpoint,
    rtype: RecordType,
    timeout: Duration,
) -> QueryOutcome {
    let ascii = normalize_domain(domain)?;
    let resolver = DirectResolver::new(endpoint.clone(), timeout)?;
    resolver.lookup_records(&ascii, rtype)
}

/// CNAME lookup for `{label}.{domain}` against one endpoint.
pub fn query_subdomain_cname(
    label: &str,
    domain: &str,
    endpoint: &ResolverEndpoint,
) -> QueryOutcome {
    let ascii = normalize_domain(domain)?;
    let resolver = DirectResolver::new(endpoint.clone(), DEFAULT_QUERY_TIMEOUT)?;
    subdomain_cname(&resolver, label, &ascii)
}

/// First TXT value for `domain` containing `needle`. Query failures collapse
/// to `None`, the documented limitation of the TXT convenience surface.
pub fn query_first_txt_containing(
    domain: &str,
    endpoint: &ResolverEndpoint,
    needle: &str,
) -> Option<String> {
    let ascii = normalize_domain(domain).ok()?;
    let resolver = DirectResolver::new(endpoint.clone(), DEFAULT_QUERY_TIMEOUT).ok()?;
    first_txt_containing(&resolver, &ascii, needle)
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, DnsError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(DnsError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(DnsError::idna)
}

#[cfg(test)]
mod tests;
