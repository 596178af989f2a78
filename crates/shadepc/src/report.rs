//! Renders a built [`Shader`] for the terminal or as JSON.
//!
//! The summary lists every stage's inputs, outputs and uniforms followed by the
//! vertex buffer layout. JSON output serializes the same data so pipelines can
//! consume it without linking the library.
use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use precompiler::{Shader, ShaderStage, ShaderStageType, ShaderVariable, ShaderVertexBufferLayout};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report<'a> {
    file: &'a Path,
    stages: Vec<&'a ShaderStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    common_source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vertex_buffer_layout: Option<&'a ShaderVertexBufferLayout>,
}

fn selected_stages(
    shader: &Shader,
    only: Option<ShaderStageType>,
) -> impl Iterator<Item = &ShaderStage> {
    shader
        .stages()
        .filter(move |stage| only.map_or(true, |wanted| stage.stage_type == wanted))
}

/// The layout is reported whenever the vertex stage is part of the selection.
fn includes_layout(only: Option<ShaderStageType>) -> bool {
    matches!(only, None | Some(ShaderStageType::Vertex))
}

pub fn render_json(
    shader: &Shader,
    file: &Path,
    only: Option<ShaderStageType>,
    pretty: bool,
) -> Result<String> {
    let report = Report {
        file,
        stages: selected_stages(shader, only).collect(),
        common_source: only.is_none().then(|| shader.common_source()).flatten(),
        vertex_buffer_layout: includes_layout(only).then(|| shader.vertex_buffer_layout()),
    };

    let mut json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to serialize shader report to JSON")?;
    json.push('\n');
    Ok(json)
}

pub fn render_summary(shader: &Shader, only: Option<ShaderStageType>) -> Result<String, fmt::Error> {
    let mut out = String::new();

    for stage in selected_stages(shader, only) {
        writeln!(out, "{} stage ({} source bytes)", stage.stage_type, stage.source.len())?;
        write_variables(&mut out, "inputs", &stage.inputs)?;
        write_variables(&mut out, "outputs", &stage.outputs)?;
        write_variables(&mut out, "uniforms", &stage.uniforms)?;
    }

    if includes_layout(only) {
        let layout = shader.vertex_buffer_layout();
        writeln!(out, "vertex buffer layout (stride {} bytes)", layout.stride())?;
        for element in layout {
            writeln!(
                out,
                "  {:<24} {:<10} offset={:<4} size={}",
                element.name, element.ty, element.offset, element.size
            )?;
        }
    }

    Ok(out)
}

fn write_variables(out: &mut String, label: &str, variables: &[ShaderVariable]) -> fmt::Result {
    if variables.is_empty() {
        return Ok(());
    }

    writeln!(out, "  {label}:")?;
    for variable in variables {
        let location = variable
            .layout_location
            .map_or_else(|| "-".to_string(), |location| location.to_string());
        let flat = if variable.flat { "flat " } else { "" };
        writeln!(
            out,
            "    [{location:>2}] {flat}{} {}",
            variable.ty, variable.identifier
        )?;
    }
    Ok(())
}
