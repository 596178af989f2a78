use std::process::ExitCode;

use anyhow::{Context, Result};
use precompiler::{BuildError, ShaderBuilder};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, OutputFormat};
use crate::report;

pub fn run(cli: Cli) -> Result<ExitCode> {
    tracing::debug!(
        file = %cli.file.display(),
        format = %cli.format,
        stage = ?cli.stage,
        "precompiling shader"
    );

    let shader = match ShaderBuilder::new().build(&cli.file) {
        Ok(shader) => shader,
        Err(BuildError::Stage(err)) => {
            tracing::error!(
                file = %cli.file.display(),
                code = err.code(),
                "{err}"
            );
            return Ok(exit_code(err.code()));
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to precompile {}", cli.file.display()))
        }
    };

    let output = match cli.format {
        OutputFormat::Summary => report::render_summary(&shader, cli.stage)
            .context("failed to format shader summary")?,
        OutputFormat::Json => report::render_json(&shader, &cli.file, cli.stage, cli.pretty)?,
    };
    print!("{output}");

    Ok(ExitCode::SUCCESS)
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(code: u32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
}
