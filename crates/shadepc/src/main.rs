mod cli;
mod report;
mod run;

use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    let cli = cli::parse();
    run::initialise_tracing();
    run::run(cli)
}
