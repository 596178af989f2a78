//! Result structures handed back by [`ShaderBuilder`](crate::ShaderBuilder).
//!
//! Types:
//!
//! - `ShaderDataType` enumerates the GLSL types the scanner recognizes in
//!   declarations, together with their vertex buffer byte sizes.
//! - `ShaderStageType` names the pipeline stages, ordered by execution order.
//! - `ShaderVariable` is one typed interface variable of a stage.
//! - `ShaderStage` carries the raw section source plus its inputs, outputs and
//!   uniforms.
//! - `ShaderVertexBufferElement` and `ShaderVertexBufferLayout` describe how one
//!   vertex record is packed.
//! - `Shader` owns all stages and the vertex buffer layout. It is read-only for
//!   consumers; only the builder populates it.
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderDataType {
    #[default]
    None,
    Mat2,
    Mat3,
    Mat4,
    Vec2,
    Vec3,
    Vec4,
    Int,
    Float,
    #[serde(rename = "sampler2D")]
    Sampler2D,
}

impl ShaderDataType {
    /// Maps a GLSL type keyword (`vec3`, `sampler2D`, ...) to its data type.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        crate::declaration::DATA_TYPES
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, ty)| *ty)
    }

    /// Size in bytes this type occupies inside a vertex record.
    ///
    /// Every scalar component counts as four bytes. `Sampler2D` is not vertex
    /// data but is still given a single slot so layouts stay well formed.
    pub fn size(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Mat2 => 4 * 2 * 2,
            Self::Mat3 => 4 * 3 * 3,
            Self::Mat4 => 4 * 4 * 4,
            Self::Vec2 => 4 * 2,
            Self::Vec3 => 4 * 3,
            Self::Vec4 => 4 * 4,
            Self::Int | Self::Float | Self::Sampler2D => 4,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mat2 => "mat2",
            Self::Mat3 => "mat3",
            Self::Mat4 => "mat4",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Int => "int",
            Self::Float => "float",
            Self::Sampler2D => "sampler2D",
        }
    }
}

impl fmt::Display for ShaderDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.keyword())
    }
}

/// Pipeline stage. Variants are ordered the way the render pipeline runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderStageType {
    #[default]
    None,
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStageType::None => f.write_str("none"),
            ShaderStageType::Vertex => f.write_str("vertex"),
            ShaderStageType::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShaderVariable {
    pub identifier: String,
    #[serde(rename = "type")]
    pub ty: ShaderDataType,
    pub flat: bool,
    /// `layout(location = N)`; `None` when the declaration carries no location.
    pub layout_location: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShaderStage {
    pub stage_type: ShaderStageType,
    /// Section text with line breaks and tabs removed and the closing brace trimmed.
    pub source: String,
    pub inputs: Vec<ShaderVariable>,
    pub outputs: Vec<ShaderVariable>,
    pub uniforms: Vec<ShaderVariable>,
}

impl ShaderStage {
    pub(crate) fn new(stage_type: ShaderStageType, source: String) -> Self {
        Self {
            stage_type,
            source,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShaderVertexBufferElement {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ShaderDataType,
    pub size: u32,
    pub offset: u32,
}

/// Tightly packed vertex record: every element starts where the previous one
/// ends and `stride` is the sum of all element sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShaderVertexBufferLayout {
    pub(crate) elements: Vec<ShaderVertexBufferElement>,
    pub(crate) stride: u32,
}

impl ShaderVertexBufferLayout {
    pub fn elements(&self) -> &[ShaderVertexBufferElement] {
        &self.elements
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShaderVertexBufferElement> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a ShaderVertexBufferLayout {
    type Item = &'a ShaderVertexBufferElement;
    type IntoIter = std::slice::Iter<'a, ShaderVertexBufferElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Parsed shader file. `Shader::default()` is the empty shader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Shader {
    pub(crate) stages: BTreeMap<ShaderStageType, ShaderStage>,
    pub(crate) common_source: Option<String>,
    pub(crate) vertex_buffer_layout: ShaderVertexBufferLayout,
}

impl Shader {
    pub fn has_stage(&self, stage_type: ShaderStageType) -> bool {
        self.stages.contains_key(&stage_type)
    }

    pub fn stage(&self, stage_type: ShaderStageType) -> Option<&ShaderStage> {
        self.stages.get(&stage_type)
    }

    /// Stages in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = &ShaderStage> {
        self.stages.values()
    }

    /// Text of the `glsl_common` section, shared by every stage.
    pub fn common_source(&self) -> Option<&str> {
        self.common_source.as_deref()
    }

    pub fn vertex_buffer_layout(&self) -> &ShaderVertexBufferLayout {
        &self.vertex_buffer_layout
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_types_follow_pipeline_order() {
        assert!(ShaderStageType::Vertex < ShaderStageType::Fragment);
        assert!(ShaderStageType::None < ShaderStageType::Vertex);
    }

    #[test]
    fn data_type_sizes_count_four_bytes_per_component() {
        assert_eq!(ShaderDataType::Vec3.size(), 12);
        assert_eq!(ShaderDataType::Mat4.size(), 64);
        assert_eq!(ShaderDataType::Mat3.size(), 36);
        assert_eq!(ShaderDataType::Sampler2D.size(), 4);
        assert_eq!(ShaderDataType::None.size(), 0);
    }

    #[test]
    fn keywords_round_trip_through_lookup() {
        assert_eq!(
            ShaderDataType::from_keyword("sampler2D"),
            Some(ShaderDataType::Sampler2D)
        );
        assert_eq!(ShaderDataType::from_keyword("sampler2d"), None);
        assert_eq!(ShaderDataType::Vec4.to_string(), "vec4");
    }

    #[test]
    fn default_shader_is_empty() {
        let shader = Shader::default();
        assert!(shader.is_empty());
        assert!(!shader.has_stage(ShaderStageType::Vertex));
        assert!(shader.vertex_buffer_layout().is_empty());
        assert_eq!(shader.vertex_buffer_layout().stride(), 0);
    }
}
