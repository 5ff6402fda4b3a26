use std::io::Write;

use clap::Parser;
use tracing::debug;

use plan_cli::cli::{Cli, run};
use plan_cli::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(command = ?cli.command, "starting");

    let report = run(&cli.command)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
