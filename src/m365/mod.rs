//! M365 DNS bundle: the fixed check set (MX, SPF, domain verification and
//! four CNAMEs) queried across a resolver panel, classified per check and
//! compared across resolvers.
//!
//! The public entry point is [`check_m365`]; [`check_m365_with_options`]
//! takes an explicit panel and timeout.

mod discrepancy;
mod status;
mod types;

pub use types::{
    CheckName, CheckOutput, Discrepancy, DkimState, M365Options, M365Report, OUTLOOK_MX_SUFFIX,
    ResolverResults, ResultMatrix, SPF_MARKER, VERIFY_DOMAIN_MARKER, ValueGroup, Verdict,
};

use std::thread;
use std::time::Duration;

use crate::resolver::{
    self, DirectResolver, DnsError, DnsErrorKind, LookupRecords, RecordType, ResolverEndpoint,
    ResolverPanel,
};
use types::CheckDefinition;

/// Runs the M365 bundle for `domain` against the default panel.
pub fn check_m365(domain: &str) -> Result<M365Report, DnsError> {
    check_m365_with_options(domain, &M365Options::default())
}

pub fn check_m365_with_options(
    domain: &str,
    options: &M365Options,
) -> Result<M365Report, DnsError> {
    let ascii = resolver::normalize_domain(domain)?;
    let resolvers = LiveResolvers {
        timeout: options.timeout(),
    };
    Ok(check_with_resolvers(&resolvers, &ascii, options.panel()))
}

/// Connects one query client per (resolver, check) worker. Implementations
/// must be shareable across the fan-out threads.
pub(crate) trait ResolverFactory: Sync {
    type Client: LookupRecords;

    fn connect(&self, endpoint: &ResolverEndpoint) -> Result<Self::Client, DnsError>;
}

struct LiveResolvers {
    timeout: Duration,
}

impl ResolverFactory for LiveResolvers {
    type Client = DirectResolver;

    fn connect(&self, endpoint: &ResolverEndpoint) -> Result<DirectResolver, DnsError> {
        DirectResolver::new(endpoint.clone(), self.timeout)
    }
}

pub(crate) fn check_with_resolvers<F>(
    resolvers: &F,
    ascii_domain: &str,
    panel: &ResolverPanel,
) -> M365Report
where
    F: ResolverFactory,
{
    #[cfg(feature = "with-tracing")]
    tracing::debug!(
        domain = ascii_domain,
        resolvers = panel.len(),
        checks = CheckName::ALL.len(),
        "running M365 bundle"
    );

    let matrix = run_checks(resolvers, ascii_domain, panel);

    let verdicts: Vec<(CheckName, Verdict)> = CheckName::ALL
        .iter()
        .map(|&check| {
            let verdict = status::classify(matrix.column(check).map(|(_, output)| output));
            (check, verdict)
        })
        .collect();

    let dkim = status::dkim_state(
        verdict_for(&verdicts, CheckName::Selector1),
        verdict_for(&verdicts, CheckName::Selector2),
    );
    let discrepancies = discrepancy::detect(&matrix, &CheckName::ALL);

    M365Report {
        domain: ascii_domain.to_string(),
        matrix,
        verdicts,
        dkim,
        discrepancies,
    }
}

/// Fans the (resolver × check) pairs out to one worker each and joins them
/// all before the matrix is handed to classification. Every pair writes a
/// distinct cell, so workers share nothing.
fn run_checks<F>(resolvers: &F, domain: &str, panel: &ResolverPanel) -> ResultMatrix
where
    F: ResolverFactory,
{
    let outputs: Vec<CheckOutput> = thread::scope(|scope| {
        let handles: Vec<_> = panel
            .endpoints()
            .iter()
            .flat_map(|endpoint| {
                CheckName::ALL
                    .map(|check| scope.spawn(move || run_check(resolvers, endpoint, domain, check)))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or(CheckOutput::Failed(DnsErrorKind::Other))
            })
            .collect()
    });

    let mut rows = Vec::with_capacity(panel.len());
    let mut outputs = outputs.into_iter();
    for endpoint in panel.endpoints() {
        let mut row = ResolverResults::new(endpoint.clone());
        for check in CheckName::ALL {
            let output = outputs
                .next()
                .unwrap_or(CheckOutput::Failed(DnsErrorKind::Other));
            row.insert(check, output);
        }
        rows.push(row);
    }
    ResultMatrix::new(rows)
}

fn run_check<F>(
    resolvers: &F,
    endpoint: &ResolverEndpoint,
    domain: &str,
    check: CheckName,
) -> CheckOutput
where
    F: ResolverFactory,
{
    let definition = check.definition();
    let client = match resolvers.connect(endpoint) {
        Ok(client) => client,
        // TXT substring checks collapse every failure to absent, like the
        // convenience surface they mirror
        Err(_) if matches!(definition, CheckDefinition::TxtContaining(_)) => {
            return CheckOutput::Absent;
        }
        Err(err) => return CheckOutput::Failed(err.kind()),
    };

    match definition {
        CheckDefinition::RawLookup(rtype) => raw_output(client.lookup_records(domain, rtype)),
        CheckDefinition::TxtContaining(needle) => {
            match resolver::first_txt_containing(&client, domain, needle) {
                Some(value) => CheckOutput::Value(value),
                None => CheckOutput::Absent,
            }
        }
        CheckDefinition::CnameSubdomain(label) => {
            raw_output(resolver::subdomain_cname(&client, label, domain))
        }
    }
}

fn raw_output(outcome: Result<Vec<String>, DnsError>) -> CheckOutput {
    match outcome {
        Ok(values) => CheckOutput::Values(values),
        Err(err) => CheckOutput::Failed(err.kind()),
    }
}

fn verdict_for(verdicts: &[(CheckName, Verdict)], check: CheckName) -> Verdict {
    verdicts
        .iter()
        .find(|(name, _)| *name == check)
        .map(|(_, verdict)| *verdict)
        .unwrap_or(Verdict::Missing)
}

/// MX exchanges hosted by Exchange Online Protection, extracted from raw MX
/// values like `"0 contoso-com.mail.protection.outlook.com."`.
pub fn outlook_mx_targets(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter_map(|record| record.split_whitespace().last())
        .filter(|target| target.ends_with(OUTLOOK_MX_SUFFIX))
        .map(|target| target.to_string())
        .collect()
}
