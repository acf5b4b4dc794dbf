use std::io;

use clap::Parser;
use tracing::debug;

use tax_cli::{Cli, logging::init_logging, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(command = ?cli.command, "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}
