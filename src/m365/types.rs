use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::resolver::{
    DEFAULT_QUERY_TIMEOUT, DnsErrorKind, RecordType, ResolverEndpoint, ResolverPanel,
};

/// TXT marker proving the domain routes mail through Exchange Online.
pub const SPF_MARKER: &str = "spf.protection.outlook.com";
/// TXT marker left by the Microsoft domain-ownership verification wizard.
pub const VERIFY_DOMAIN_MARKER: &str = "v=verifydomain MS=";
/// Suffix of MX exchanges hosted by Exchange Online Protection.
pub const OUTLOOK_MX_SUFFIX: &str = "mail.protection.outlook.com.";

/// The fixed M365 check catalog. Closed set; declaration order is the
/// display order.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckName {
    Mx,
    Spf,
    VerifyDomain,
    Autodiscover,
    Lyncdiscover,
    Selector1,
    Selector2,
}

impl CheckName {
    pub const ALL: [CheckName; 7] = [
        CheckName::Mx,
        CheckName::Spf,
        CheckName::VerifyDomain,
        CheckName::Autodiscover,
        CheckName::Lyncdiscover,
        CheckName::Selector1,
        CheckName::Selector2,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mx => "MX",
            Self::Spf => "SPF",
            Self::VerifyDomain => "VerifyDomain",
            Self::Autodiscover => "autodiscover",
            Self::Lyncdiscover => "lyncdiscover",
            Self::Selector1 => "selector1._domainkey",
            Self::Selector2 => "selector2._domainkey",
        }
    }

    pub(crate) fn definition(self) -> CheckDefinition {
        match self {
            Self::Mx => CheckDefinition::RawLookup(RecordType::Mx),
            Self::Spf => CheckDefinition::TxtContaining(SPF_MARKER),
            Self::VerifyDomain => CheckDefinition::TxtContaining(VERIFY_DOMAIN_MARKER),
            Self::Autodiscover => CheckDefinition::CnameSubdomain("autodiscover"),
            Self::Lyncdiscover => CheckDefinition::CnameSubdomain("lyncdiscover"),
            Self::Selector1 => CheckDefinition::CnameSubdomain("selector1._domainkey"),
            Self::Selector2 => CheckDefinition::CnameSubdomain("selector2._domainkey"),
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a check derives its value from DNS answers. One tagged variant per
/// rule shape covers the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckDefinition {
    RawLookup(RecordType),
    TxtContaining(&'static str),
    CnameSubdomain(&'static str),
}

/// One result matrix cell. Absence is a first-class value, and a raw-lookup
/// failure keeps its error kind instead of degrading to sentinel text.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutput {
    Absent,
    Value(String),
    Values(Vec<String>),
    Failed(DnsErrorKind),
}

impl CheckOutput {
    pub fn is_present(&self) -> bool {
        match self {
            Self::Value(_) => true,
            Self::Values(values) => !values.is_empty(),
            Self::Absent | Self::Failed(_) => false,
        }
    }
}

static ABSENT: CheckOutput = CheckOutput::Absent;

/// All check outputs observed through one resolver endpoint.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverResults {
    endpoint: ResolverEndpoint,
    outputs: BTreeMap<CheckName, CheckOutput>,
}

impl ResolverResults {
    pub(crate) fn new(endpoint: ResolverEndpoint) -> Self {
        Self {
            endpoint,
            outputs: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, check: CheckName, output: CheckOutput) {
        self.outputs.insert(check, output);
    }

    pub fn endpoint(&self) -> &ResolverEndpoint {
        &self.endpoint
    }

    pub fn output(&self, check: CheckName) -> &CheckOutput {
        self.outputs.get(&check).unwrap_or(&ABSENT)
    }
}

/// Per-resolver, per-check results. Built once per invocation, read-only
/// afterwards; row order follows the panel.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMatrix {
    rows: Vec<ResolverResults>,
}

impl ResultMatrix {
    pub(crate) fn new(rows: Vec<ResolverResults>) -> Self {
        Self { rows }
    }

    pub fn resolvers(&self) -> &[ResolverResults] {
        &self.rows
    }

    /// One check's outputs across the panel, in panel order.
    pub fn column(&self, check: CheckName) -> impl Iterator<Item = (&str, &CheckOutput)> {
        self.rows
            .iter()
            .map(move |row| (row.endpoint.name.as_str(), row.output(check)))
    }
}

/// Tri-state presence classification of one check across the panel.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    Partial,
    Missing,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => f.write_str("verified"),
            Self::Partial => f.write_str("partial"),
            Self::Missing => f.write_str("missing"),
        }
    }
}

/// Composite DKIM status derived from the two selector verdicts.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DkimState {
    Enabled,
    Partial,
    NotEnabled,
}

impl fmt::Display for DkimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Partial => f.write_str("partial"),
            Self::NotEnabled => f.write_str("not enabled"),
        }
    }
}

/// Resolvers sharing one normalized check value. `value: None` is the
/// absent group (no present value on those resolvers).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueGroup {
    pub value: Option<Vec<String>>,
    pub resolvers: Vec<String>,
}

/// A check whose present values diverge across the panel.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub check: CheckName,
    pub groups: Vec<ValueGroup>,
}

/// Full report for one M365 bundle invocation.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M365Report {
    pub domain: String,
    pub matrix: ResultMatrix,
    pub verdicts: Vec<(CheckName, Verdict)>,
    pub dkim: DkimState,
    pub discrepancies: Vec<Discrepancy>,
}

impl M365Report {
    pub fn verdict(&self, check: CheckName) -> Verdict {
        self.verdicts
            .iter()
            .find(|(name, _)| *name == check)
            .map(|(_, verdict)| *verdict)
            .unwrap_or(Verdict::Missing)
    }

    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Options for one bundle run. The panel is an explicit value so tests and
/// callers can substitute their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M365Options {
    panel: ResolverPanel,
    timeout: Duration,
}

impl M365Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_panel(mut self, panel: ResolverPanel) -> Self {
        self.panel = panel;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn panel(&self) -> &ResolverPanel {
        &self.panel
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for M365Options {
    fn default() -> Self {
        Self {
            panel: ResolverPanel::default(),
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}
