use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use precompiler::ShaderStageType;

#[derive(Parser, Debug)]
#[command(
    name = "shadepc",
    author,
    version,
    about = "Extracts stage interfaces and the vertex buffer layout from a sectioned shader file"
)]
pub struct Cli {
    /// Shader file containing `glsl_common`, `vertex` and `fragment` blocks.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format: `summary` (default) or `json`.
    #[arg(
        long,
        value_name = "FORMAT",
        env = "SHADEPC_FORMAT",
        value_parser = parse_output_format,
        default_value = "summary"
    )]
    pub format: OutputFormat,

    /// Only report the given stage (`vertex` or `fragment`).
    #[arg(long, value_name = "STAGE", value_parser = parse_stage)]
    pub stage: Option<ShaderStageType>,

    /// Indent JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Summary => f.write_str("summary"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_output_format(value: &str) -> Result<OutputFormat, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("output format must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "summary" | "text" => Ok(OutputFormat::Summary),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!(
            "unknown output format '{other}'; expected summary or json"
        )),
    }
}

pub fn parse_stage(value: &str) -> Result<ShaderStageType, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "vertex" | "vert" | "vs" => Ok(ShaderStageType::Vertex),
        "fragment" | "frag" | "fs" => Ok(ShaderStageType::Fragment),
        other => Err(format!("unknown stage '{other}'; expected vertex or fragment")),
    }
}
