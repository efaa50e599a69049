//! munkireport-parser entry point

use anyhow::Context;
use clap::Parser;
use fleet_health_cli::{init_tracing, run_cli, ReportCli};

fn main() -> anyhow::Result<()> {
    let cli = ReportCli::parse();

    init_tracing(cli.verbose, cli.log_format).context("Failed to initialize logging")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let code = runtime.block_on(run_cli(cli));

    std::process::exit(code.into());
}
