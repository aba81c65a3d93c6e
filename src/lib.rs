#![forbid(unsafe_code)]
//! dnstoolbox_lib — multi-resolver DNS consistency checks and TLS
//! certificate inspection.
//!
//! Queries are always run against explicit public resolvers so answers stay
//! attributable, and the Microsoft 365 bundle cross-checks the panel for
//! propagation discrepancies.

pub mod resolver;
pub use resolver::{
    DEFAULT_QUERY_TIMEOUT, DnsError, DnsErrorKind, QueryOutcome, RecordType, ResolverEndpoint,
    ResolverPanel, query_first_txt_containing, query_record, query_record_with_timeout,
    query_subdomain_cname,
};

pub mod m365;
pub use m365::{
    CheckName, CheckOutput, Discrepancy, DkimState, M365Options, M365Report, ResultMatrix,
    ValueGroup, Verdict, check_m365, check_m365_with_options, outlook_mx_targets,
};

#[cfg(feature = "with-tls")]
pub mod tls;
#[cfg(feature = "with-tls")]
pub use tls::{
    CertificateInfo, DEFAULT_TLS_TIMEOUT, ExpiryStatus, TlsError, TlsInspectOptions,
    inspect_certificate, inspect_certificate_with_options,
};
