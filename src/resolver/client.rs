use std::time::Duration;

use trust_dns_resolver::Resolver;
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::proto::rr::RData;

use super::{DnsError, RecordType, ResolverEndpoint};

/// Default per-query deadline, matching the usual stub-resolver lifetime.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// A resolver bound to exactly one nameserver, so every answer (and every
/// failure) is attributable to that endpoint. No system fallback chain, no
/// retries, no cache, no hosts file.
pub struct DirectResolver {
    endpoint: ResolverEndpoint,
    inner: Resolver,
}

impl DirectResolver {
    pub fn new(endpoint: ResolverEndpoint, timeout: Duration) -> Result<Self, DnsError> {
        let servers = NameServerConfigGroup::from_ips_clear(&[endpoint.address], 53, true);
        let config = ResolverConfig::from_parts(None, Vec::new(), servers);
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 0;
        opts.cache_size = 0;
        opts.use_hosts_file = false;
        let inner = Resolver::new(config, opts).map_err(DnsError::resolver_init)?;
        Ok(Self { endpoint, inner })
    }

    pub fn endpoint(&self) -> &ResolverEndpoint {
        &self.endpoint
    }
}

pub(crate) trait LookupRecords {
    fn lookup_records(&self, name: &str, rtype: RecordType) -> Result<Vec<String>, DnsError>;
}

impl LookupRecords for DirectResolver {
    fn lookup_records(&self, name: &str, rtype: RecordType) -> Result<Vec<String>, DnsError> {
        let lookup = self
            .inner
            .lookup(name, rtype.to_wire())
            .map_err(|err| map_resolve_error(name, err))?;

        let mut values = Vec::new();
        for record in lookup.record_iter() {
            if let Some(rdata) = record.data() {
                values.push(render_rdata(name, rdata)?);
            }
        }
        ensure_answers(values)
    }
}

/// Answer-section records in wire order, rendered in presentation format.
/// TXT data is reassembled from its character-string segments, like the raw
/// response would show it; everything else uses the standard rendering with
/// trailing dots preserved for domain-valued records.
fn render_rdata(name: &str, rdata: &RData) -> Result<String, DnsError> {
    match rdata {
        RData::TXT(txt) => {
            let mut value = String::new();
            for piece in txt.txt_data().iter() {
                let segment = std::str::from_utf8(piece.as_ref())
                    .map_err(|err| DnsError::txt_data_utf8(name, err))?;
                value.push_str(segment);
            }
            Ok(value)
        }
        other => Ok(other.to_string()),
    }
}

/// An empty answer set is an error outcome, never an empty success.
pub(crate) fn ensure_answers(values: Vec<String>) -> Result<Vec<String>, DnsError> {
    if values.is_empty() {
        Err(DnsError::NoAnswer)
    } else {
        Ok(values)
    }
}

pub(crate) fn map_resolve_error(name: &str, err: ResolveError) -> DnsError {
    match classify_kind(err.kind()) {
        Some(mapped) => mapped,
        None => DnsError::lookup(name, err),
    }
}

fn classify_kind(kind: &ResolveErrorKind) -> Option<DnsError> {
    match kind {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            Some(classify_negative(*response_code))
        }
        ResolveErrorKind::Timeout => Some(DnsError::Timeout),
        ResolveErrorKind::NoConnections => Some(DnsError::NoNameservers),
        // anything else is surfaced with its source attached
        _ => None,
    }
}

/// A negative response with NXDOMAIN means the name does not exist; a clean
/// NOERROR means the name exists without that record type; SERVFAIL and
/// REFUSED mean the nameserver could not or would not answer.
pub(crate) fn classify_negative(code: ResponseCode) -> DnsError {
    match code {
        ResponseCode::NXDomain => DnsError::Nxdomain,
        ResponseCode::ServFail | ResponseCode::Refused => DnsError::NoNameservers,
        _ => DnsError::NoAnswer,
    }
}
