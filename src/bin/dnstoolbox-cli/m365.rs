use std::time::Duration;

use anyhow::{Context, Result};
use dnstoolbox_lib::{
    CheckName, CheckOutput, M365Options, M365Report, Verdict, check_m365_with_options,
    outlook_mx_targets,
};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct M365Summary {
    #[cfg_attr(feature = "with-serde", serde(flatten))]
    pub report: M365Report,
}

impl M365Summary {
    pub fn human_lines(&self) -> Vec<String> {
        let report = &self.report;
        let mut lines = vec![format!("M365 checks for {}", report.domain)];

        for &check in &CheckName::ALL {
            lines.push(format!("  {}: {}", check.label(), report.verdict(check)));
            if check == CheckName::Mx {
                let exchanges = eop_exchanges(report);
                if !exchanges.is_empty() {
                    lines.push(format!("      EOP exchanges: {}", exchanges.join(", ")));
                }
            }
            // show per-resolver detail whenever the panel does not fully agree
            if report.verdict(check) != Verdict::Verified {
                for (resolver, output) in report.matrix.column(check) {
                    lines.push(format!("      {resolver}: {}", format_output(output)));
                }
            }
        }

        lines.push(format!("  DKIM: {}", report.dkim));

        for discrepancy in &report.discrepancies {
            lines.push(format!(
                "  discrepancy on {}:",
                discrepancy.check.label()
            ));
            for group in &discrepancy.groups {
                let value = match &group.value {
                    Some(values) => values.join(", "),
                    None => "absent".to_string(),
                };
                lines.push(format!("      {} -> {value}", group.resolvers.join(", ")));
            }
        }
        if report.is_consistent() {
            lines.push("  resolvers agree on every check".to_string());
        }

        lines
    }

    pub fn any_findings(&self) -> bool {
        let report = &self.report;
        !report.is_consistent()
            || report
                .verdicts
                .iter()
                .any(|(_, verdict)| *verdict != Verdict::Verified)
    }
}

/// Deduplicated Exchange Online Protection MX targets seen across the panel.
fn eop_exchanges(report: &M365Report) -> Vec<String> {
    let mut exchanges: Vec<String> = Vec::new();
    for (_, output) in report.matrix.column(CheckName::Mx) {
        if let CheckOutput::Values(values) = output {
            for target in outlook_mx_targets(values) {
                if !exchanges.contains(&target) {
                    exchanges.push(target);
                }
            }
        }
    }
    exchanges
}

fn format_output(output: &CheckOutput) -> String {
    match output {
        CheckOutput::Absent => "absent".to_string(),
        CheckOutput::Value(value) => value.clone(),
        CheckOutput::Values(values) if values.is_empty() => "absent".to_string(),
        CheckOutput::Values(values) => values.join(", "),
        CheckOutput::Failed(kind) => format!("error: {}", kind.message()),
    }
}

pub fn run(domain: &str, timeout: Duration) -> Result<M365Summary> {
    let options = M365Options::new().with_timeout(timeout);
    let report = check_m365_with_options(domain, &options)
        .with_context(|| format!("M365 checks for '{domain}'"))?;
    Ok(M365Summary { report })
}
