use std::time::Duration;

use anyhow::{Result, bail};
use dnstoolbox_lib::{RecordType, ResolverPanel, query_record_with_timeout};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct LookupRow {
    pub resolver: String,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub values: Option<Vec<String>>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct LookupSummary {
    pub domain: String,
    pub record_type: String,
    pub rows: Vec<LookupRow>,
}

impl LookupSummary {
    pub fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.record_type, self.domain)];
        for row in &self.rows {
            let line = match (&row.values, &row.error) {
                (Some(values), _) => format!("  {}: {}", row.resolver, values.join(", ")),
                (None, Some(error)) => format!("  {}: error: {error}", row.resolver),
                (None, None) => format!("  {}: unknown", row.resolver),
            };
            lines.push(line);
        }
        lines
    }

    pub fn any_failures(&self) -> bool {
        self.rows.iter().any(|row| row.error.is_some())
    }
}

pub fn run(
    domain: &str,
    rtype_name: &str,
    resolver_filter: Option<&str>,
    timeout: Duration,
) -> Result<LookupSummary> {
    let Some(rtype) = RecordType::from_name(rtype_name) else {
        bail!("unknown --type '{rtype_name}', use: A|AAAA|CNAME|MX|NS|TXT");
    };

    let panel = ResolverPanel::default();
    let endpoints = match resolver_filter {
        Some(name) => match panel.find(name) {
            Some(endpoint) => vec![endpoint.clone()],
            None => bail!(
                "unknown --resolver '{name}', use: {}",
                panel.names().join("|")
            ),
        },
        None => panel.endpoints().to_vec(),
    };

    let rows = endpoints
        .iter()
        .map(|endpoint| {
            match query_record_with_timeout(domain, endpoint, rtype, timeout) {
                Ok(values) => LookupRow {
                    resolver: endpoint.name.clone(),
                    values: Some(values),
                    error: None,
                },
                Err(err) => LookupRow {
                    resolver: endpoint.name.clone(),
                    values: None,
                    error: Some(err.to_string()),
                },
            }
        })
        .collect();

    Ok(LookupSummary {
        domain: domain.trim().to_string(),
        record_type: rtype.as_str().to_string(),
        rows,
    })
}
