#[cfg(feature = "with-serde")]
use anyhow::Context;
use anyhow::{Result, bail};

use crate::args::Cli;
use crate::lookup::LookupSummary;
use crate::m365::M365Summary;
#[cfg(feature = "with-tls")]
use crate::tls::TlsSummary;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[cfg_attr(feature = "with-serde", serde(untagged))]
pub enum Report {
    Lookup(LookupSummary),
    M365(M365Summary),
    #[cfg(feature = "with-tls")]
    Tls(TlsSummary),
}

impl Report {
    pub fn human_lines(&self) -> Vec<String> {
        match self {
            Self::Lookup(summary) => summary.human_lines(),
            Self::M365(summary) => summary.human_lines(),
            #[cfg(feature = "with-tls")]
            Self::Tls(summary) => summary.human_lines(),
        }
    }

    pub fn has_findings(&self) -> bool {
        match self {
            Self::Lookup(summary) => summary.any_failures(),
            Self::M365(summary) => summary.any_findings(),
            #[cfg(feature = "with-tls")]
            Self::Tls(summary) => summary.any_findings(),
        }
    }
}

pub fn write_report(report: &Report, cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(report),
        "json" => write_json(report, cli),
        "ndjson" => write_ndjson(report, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson"),
    }
}

fn write_human(report: &Report) -> Result<()> {
    for line in report.human_lines() {
        println!("{line}");
    }
    Ok(())
}

#[cfg(feature = "with-serde")]
fn write_json(report: &Report, cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(report)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &Report, _: &Cli) -> Result<()> {
    bail!("format=json requires the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(report: &Report, cli: &Cli) -> Result<()> {
    let line = serde_json::to_string(report)?;
    if let Some(path) = &cli.out {
        let mut buf = line.into_bytes();
        buf.push(b'\n');
        write_all_atomically(path, &buf)?;
    } else {
        println!("{line}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &Report, _: &Cli) -> Result<()> {
    bail!("format=ndjson requires the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
