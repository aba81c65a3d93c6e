use super::client::LookupRecords;
use super::{DnsError, RecordType};

/// Joins `label` onto `domain`, trimming stray dots and lowercasing the label.
pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

/// CNAME lookup for `{label}.{domain}`.
pub(crate) fn subdomain_cname<R>(resolver: &R, label: &str, domain: &str) -> Result<Vec<String>, DnsError>
where
    R: LookupRecords,
{
    resolver.lookup_records(&fqdn(label, domain), RecordType::Cname)
}

/// First TXT value containing `needle` (case-sensitive substring match).
///
/// A query failure and a missing match both collapse to `None` here; callers
/// that need to tell "DNS failed" from "record legitimately missing" must go
/// through [`LookupRecords::lookup_records`] directly.
pub(crate) fn first_txt_containing<R>(resolver: &R, domain: &str, needle: &str) -> Option<String>
where
    R: LookupRecords,
{
    match resolver.lookup_records(domain, RecordType::Txt) {
        Ok(values) => values.into_iter().find(|value| value.contains(needle)),
        Err(_) => None,
    }
}
