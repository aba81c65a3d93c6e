use std::collections::HashMap;

use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;

use super::client::{self, LookupRecords};
use super::{DnsError, DnsErrorKind, RecordType, fetch};

struct StubResolver {
    records: HashMap<(String, RecordType), Result<Vec<String>, DnsErrorKind>>,
}

impl StubResolver {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    fn insert<I, S>(&mut self, name: &str, rtype: RecordType, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.records
            .insert((normalize_name(name), rtype), Ok(values));
    }

    fn fail(&mut self, name: &str, rtype: RecordType, kind: DnsErrorKind) {
        self.records.insert((normalize_name(name), rtype), Err(kind));
    }
}

impl LookupRecords for StubResolver {
    fn lookup_records(&self, name: &str, rtype: RecordType) -> Result<Vec<String>, DnsError> {
        match self.records.get(&(normalize_name(name), rtype)) {
            Some(Ok(values)) => Ok(values.clone()),
            Some(Err(kind)) => Err(error_for(*kind)),
            None => Err(DnsError::NoAnswer),
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn error_for(kind: DnsErrorKind) -> DnsError {
    match kind {
        DnsErrorKind::NoAnswer => DnsError::NoAnswer,
        DnsErrorKind::Nxdomain => DnsError::Nxdomain,
        DnsErrorKind::NoNameservers => DnsError::NoNameservers,
        DnsErrorKind::Timeout => DnsError::Timeout,
        DnsErrorKind::Other => DnsError::EmptyDomain,
    }
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = super::normalize_domain("  ").expect_err("blank domain should fail");
    assert!(matches!(err, DnsError::EmptyDomain));
}

#[test]
fn normalize_domain_applies_idna() {
    let ascii = super::normalize_domain("münchen.de").expect("conversion succeeds");
    assert_eq!(ascii, "xn--mnchen-3ya.de");
}

#[test]
fn empty_answer_is_no_answer_never_empty_ok() {
    let err = client::ensure_answers(Vec::new()).expect_err("empty answers must error");
    assert!(matches!(err, DnsError::NoAnswer));

    let values = client::ensure_answers(vec!["192.0.2.1".to_string()]).expect("kept as-is");
    assert_eq!(values, vec!["192.0.2.1".to_string()]);
}

#[test]
fn negative_responses_map_to_distinct_kinds() {
    assert!(matches!(
        client::classify_negative(ResponseCode::NXDomain),
        DnsError::Nxdomain
    ));
    assert!(matches!(
        client::classify_negative(ResponseCode::NoError),
        DnsError::NoAnswer
    ));
    assert!(matches!(
        client::classify_negative(ResponseCode::ServFail),
        DnsError::NoNameservers
    ));
    assert!(matches!(
        client::classify_negative(ResponseCode::Refused),
        DnsError::NoNameservers
    ));
}

#[test]
fn resolve_timeout_maps_to_timeout() {
    let err = ResolveError::from(ResolveErrorKind::Timeout);
    let mapped = client::map_resolve_error("example.com", err);
    assert!(matches!(mapped, DnsError::Timeout));
    assert_eq!(mapped.kind(), DnsErrorKind::Timeout);
}

#[test]
fn unclassified_resolve_errors_are_surfaced() {
    let err = ResolveError::from("connection reset by peer");
    let mapped = client::map_resolve_error("example.com", err);
    match mapped {
        DnsError::Lookup { ref name, .. } => assert_eq!(name, "example.com"),
        other => panic!("expected lookup error, got {other:?}"),
    }
    assert_eq!(mapped.kind(), DnsErrorKind::Other);
}

#[test]
fn fqdn_joins_label_and_domain() {
    assert_eq!(
        fetch::fqdn("autodiscover", "example.com"),
        "autodiscover.example.com"
    );
    assert_eq!(
        fetch::fqdn("Selector1._DOMAINKEY.", "example.com"),
        "selector1._domainkey.example.com"
    );
    assert_eq!(fetch::fqdn("  ", "example.com"), "example.com");
}

#[test]
fn subdomain_cname_queries_prefixed_name() {
    let mut stub = StubResolver::new();
    stub.insert(
        "autodiscover.example.com",
        RecordType::Cname,
        ["autodiscover.outlook.com."],
    );

    let values =
        fetch::subdomain_cname(&stub, "autodiscover", "example.com").expect("lookup succeeds");
    assert_eq!(values, vec!["autodiscover.outlook.com.".to_string()]);
}

#[test]
fn first_txt_containing_picks_first_match() {
    let mut stub = StubResolver::new();
    stub.insert(
        "example.com",
        RecordType::Txt,
        [
            "google-site-verification=abc",
            "v=spf1 include:spf.protection.outlook.com -all",
            "v=spf1 include:spf.protection.outlook.com ~all",
        ],
    );

    let found = fetch::first_txt_containing(&stub, "example.com", "spf.protection.outlook.com");
    assert_eq!(
        found.as_deref(),
        Some("v=spf1 include:spf.protection.outlook.com -all")
    );
}

#[test]
fn first_txt_containing_is_case_sensitive() {
    let mut stub = StubResolver::new();
    stub.insert("example.com", RecordType::Txt, ["V=SPF1 ~all"]);

    assert!(fetch::first_txt_containing(&stub, "example.com", "v=spf1").is_none());
}

#[test]
fn first_txt_containing_collapses_errors_to_none() {
    let mut stub = StubResolver::new();
    stub.fail("example.com", RecordType::Txt, DnsErrorKind::Timeout);

    assert!(fetch::first_txt_containing(&stub, "example.com", "spf").is_none());
}

#[test]
fn record_type_parses_names() {
    assert_eq!(RecordType::from_name("mx"), Some(RecordType::Mx));
    assert_eq!(RecordType::from_name(" AAAA "), Some(RecordType::Aaaa));
    assert_eq!(RecordType::from_name("soa"), None);
}

#[test]
fn default_panel_matches_fixed_servers() {
    let panel = super::ResolverPanel::default();
    assert_eq!(panel.names(), vec!["Google", "Cloudflare", "Quad9"]);
    assert_eq!(
        panel.find("cloudflare").map(|e| e.address.to_string()),
        Some("1.1.1.1".to_string())
    );
    assert!(panel.find("OpenDNS").is_none());
}
