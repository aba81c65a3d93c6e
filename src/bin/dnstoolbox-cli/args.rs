use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dnstoolbox-cli")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// write report to file (JSON/NDJSON depending on --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson
    #[arg(long, default_value = "human")]
    pub format: String,

    /// per-query timeout (ms)
    #[arg(long = "timeout", default_value_t = 5_000)]
    pub timeout_ms: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// query one record type against every resolver on the panel
    Lookup {
        domain: String,
        /// record type: A|AAAA|CNAME|MX|NS|TXT
        #[arg(long = "type", default_value = "A")]
        rtype: String,
        /// restrict to the named resolver (Google|Cloudflare|Quad9)
        #[arg(long)]
        resolver: Option<String>,
    },
    /// run the Microsoft 365 check bundle
    M365 { domain: String },
    /// inspect the TLS certificate presented by a host (feature `with-tls`)
    #[cfg(feature = "with-tls")]
    Tls {
        host: String,
        #[arg(long, default_value_t = 443)]
        port: u16,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }
}
