use std::collections::BTreeMap;

use crate::builder::CapturedSection;
use crate::declaration::{BuilderDeclaration, ShaderDeclarationQualifier, ShaderSection};
use crate::error::StageError;
use crate::model::{Shader, ShaderStage, ShaderStageType, ShaderVariable};

const STAGE_SECTIONS: [(ShaderStageType, ShaderSection); 2] = [
    (ShaderStageType::Vertex, ShaderSection::Vertex),
    (ShaderStageType::Fragment, ShaderSection::Fragment),
];

/// Builds a `ShaderStage` for every captured stage section and checks that the
/// pipeline has a vertex stage with inputs and a fragment stage with outputs.
pub(crate) fn parse_stages(
    shader: &mut Shader,
    mut sections: BTreeMap<ShaderSection, CapturedSection>,
) -> Result<(), StageError> {
    for (stage_type, section) in STAGE_SECTIONS {
        let Some(captured) = sections.remove(&section) else {
            continue;
        };

        let mut stage = ShaderStage::new(stage_type, captured.source);
        for declaration in &captured.declarations {
            route_variable(&mut stage, declaration);
        }

        tracing::debug!(
            stage = %stage_type,
            inputs = stage.inputs.len(),
            outputs = stage.outputs.len(),
            uniforms = stage.uniforms.len(),
            "stage assembled"
        );
        shader.stages.insert(stage_type, stage);
    }

    shader.common_source = sections
        .remove(&ShaderSection::GlslCommon)
        .map(|common| common.source);

    validate_stages(shader)
}

/// Storage qualifier precedence is `in`, then `out`, then `uniform`.
fn route_variable(stage: &mut ShaderStage, declaration: &BuilderDeclaration) {
    let variable = variable_from_declaration(declaration);

    if declaration.has_qualifier(ShaderDeclarationQualifier::In) {
        stage.inputs.push(variable);
    } else if declaration.has_qualifier(ShaderDeclarationQualifier::Out) {
        stage.outputs.push(variable);
    } else if declaration.has_qualifier(ShaderDeclarationQualifier::Uniform) {
        stage.uniforms.push(variable);
    } else {
        tracing::debug!(
            identifier = %variable.identifier,
            "declaration has no storage qualifier"
        );
    }
}

fn variable_from_declaration(declaration: &BuilderDeclaration) -> ShaderVariable {
    let layout_location = declaration
        .qualifier_parameter(ShaderDeclarationQualifier::Layout, "location")
        .and_then(|raw| match raw.trim().parse::<u32>() {
            Ok(location) => Some(location),
            Err(err) => {
                tracing::warn!(
                    identifier = %declaration.identifier,
                    location = raw,
                    %err,
                    "ignoring unparsable layout location"
                );
                None
            }
        });

    ShaderVariable {
        identifier: declaration.identifier.clone(),
        ty: declaration.data_type,
        flat: declaration.has_qualifier(ShaderDeclarationQualifier::Flat),
        layout_location,
    }
}

fn validate_stages(shader: &Shader) -> Result<(), StageError> {
    let vertex = shader
        .stage(ShaderStageType::Vertex)
        .ok_or(StageError::MissingVertexStage)?;
    if vertex.inputs.is_empty() {
        return Err(StageError::VertexStageWithoutInputs);
    }

    let fragment = shader
        .stage(ShaderStageType::Fragment)
        .ok_or(StageError::MissingFragmentStage)?;
    if fragment.outputs.is_empty() {
        return Err(StageError::FragmentStageWithoutOutputs);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::BuilderLine;
    use crate::model::ShaderDataType;

    fn declaration(words: &[&str], location: Option<&str>) -> BuilderDeclaration {
        let mut line = BuilderLine::default();
        for word in words {
            line.push(*word);
        }
        if let Some(location) = location {
            if let Some(layout) = line
                .keywords
                .iter_mut()
                .find(|keyword| keyword.identifier == "layout")
            {
                layout
                    .parameters
                    .insert("location".to_string(), location.to_string());
            }
        }
        BuilderDeclaration::from_line(line).expect("declaration")
    }

    fn section(declarations: Vec<BuilderDeclaration>) -> CapturedSection {
        CapturedSection {
            source: "body".to_string(),
            declarations,
        }
    }

    fn minimal_sections() -> BTreeMap<ShaderSection, CapturedSection> {
        let mut sections = BTreeMap::new();
        sections.insert(
            ShaderSection::Vertex,
            section(vec![declaration(&["in", "vec3", "position"], None)]),
        );
        sections.insert(
            ShaderSection::Fragment,
            section(vec![declaration(&["out", "vec4", "color"], None)]),
        );
        sections
    }

    #[test]
    fn builds_flat_located_input() {
        let variable = variable_from_declaration(&declaration(
            &["layout", "flat", "in", "int", "id"],
            Some("3"),
        ));
        assert_eq!(
            variable,
            ShaderVariable {
                identifier: "id".to_string(),
                ty: ShaderDataType::Int,
                flat: true,
                layout_location: Some(3),
            }
        );
    }

    #[test]
    fn invalid_location_is_left_unset() {
        let variable =
            variable_from_declaration(&declaration(&["layout", "in", "vec2", "uv"], Some("-1")));
        assert_eq!(variable.layout_location, None);

        let variable =
            variable_from_declaration(&declaration(&["layout", "in", "vec2", "uv"], Some("abc")));
        assert_eq!(variable.layout_location, None);
    }

    #[test]
    fn in_takes_precedence_over_out_and_uniform() {
        let mut stage = ShaderStage::default();
        route_variable(&mut stage, &declaration(&["uniform", "out", "in", "float", "x"], None));
        route_variable(&mut stage, &declaration(&["uniform", "out", "float", "y"], None));
        route_variable(&mut stage, &declaration(&["uniform", "float", "z"], None));
        route_variable(&mut stage, &declaration(&["flat", "float", "w"], None));

        assert_eq!(stage.inputs.len(), 1);
        assert_eq!(stage.inputs[0].identifier, "x");
        assert_eq!(stage.outputs.len(), 1);
        assert_eq!(stage.outputs[0].identifier, "y");
        assert_eq!(stage.uniforms.len(), 1);
        assert_eq!(stage.uniforms[0].identifier, "z");
    }

    #[test]
    fn assembles_stages_and_common_source() {
        let mut sections = minimal_sections();
        sections.insert(
            ShaderSection::GlslCommon,
            CapturedSection {
                source: "#define PI 3.14".to_string(),
                declarations: Vec::new(),
            },
        );

        let mut shader = Shader::default();
        parse_stages(&mut shader, sections).unwrap();

        assert_eq!(shader.stages().count(), 2);
        assert_eq!(shader.common_source(), Some("#define PI 3.14"));
        let vertex = shader.stage(ShaderStageType::Vertex).unwrap();
        assert_eq!(vertex.stage_type, ShaderStageType::Vertex);
        assert_eq!(vertex.source, "body");
    }

    #[test]
    fn validation_reports_each_failure() {
        let mut sections = minimal_sections();
        sections.remove(&ShaderSection::Vertex);
        let err = parse_stages(&mut Shader::default(), sections).unwrap_err();
        assert_eq!(err, StageError::MissingVertexStage);
        assert_eq!(err.code(), 1);

        let mut sections = minimal_sections();
        sections.insert(
            ShaderSection::Vertex,
            section(vec![declaration(&["uniform", "mat4", "mvp"], None)]),
        );
        let err = parse_stages(&mut Shader::default(), sections).unwrap_err();
        assert_eq!(err.code(), 2);

        let mut sections = minimal_sections();
        sections.remove(&ShaderSection::Fragment);
        let err = parse_stages(&mut Shader::default(), sections).unwrap_err();
        assert_eq!(err.code(), 3);

        let mut sections = minimal_sections();
        sections.insert(ShaderSection::Fragment, section(Vec::new()));
        let err = parse_stages(&mut Shader::default(), sections).unwrap_err();
        assert_eq!(err, StageError::FragmentStageWithoutOutputs);
        assert_eq!(err.code(), 4);
    }
}
