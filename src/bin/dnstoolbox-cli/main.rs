mod args;
mod lookup;
mod m365;
mod output;
#[cfg(feature = "with-tls")]
mod tls;

use std::time::Duration;

use anyhow::Result;

use args::{Cli, Commands};
use output::Report;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let timeout = Duration::from_millis(cli.timeout_ms);

    let report = match &cli.cmd {
        Some(Commands::Lookup {
            domain,
            rtype,
            resolver,
        }) => Report::Lookup(lookup::run(domain, rtype, resolver.as_deref(), timeout)?),
        Some(Commands::M365 { domain }) => Report::M365(m365::run(domain, timeout)?),
        #[cfg(feature = "with-tls")]
        Some(Commands::Tls { host, port }) => Report::Tls(tls::run(host, *port, timeout)?),
        None => {
            Cli::clap_command().print_help()?;
            println!();
            return Ok(());
        }
    };

    output::write_report(&report, &cli)?;

    // exit codes: 0 clean, 2 findings, 1 fatal
    if report.has_findings() {
        std::process::exit(2);
    }
    Ok(())
}
