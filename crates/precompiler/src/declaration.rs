//! Keyword tables and the transient shapes the scanner assembles per statement.
//!
//! A `BuilderLine` is the list of words seen since the last statement boundary,
//! each optionally carrying the `key = value` pairs from a parenthesized list
//! that followed it. `BuilderDeclaration::from_line` turns such a line into a
//! declaration when it names a data type and at least one qualifier.
use std::collections::BTreeMap;

use crate::model::ShaderDataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum ShaderDeclarationQualifier {
    In,
    Out,
    Uniform,
    Layout,
    Flat,
}

/// Top-level named block of a shader file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum ShaderSection {
    GlslCommon,
    Vertex,
    Fragment,
}

pub(crate) const QUALIFIERS: [(&str, ShaderDeclarationQualifier); 5] = [
    ("in", ShaderDeclarationQualifier::In),
    ("out", ShaderDeclarationQualifier::Out),
    ("uniform", ShaderDeclarationQualifier::Uniform),
    ("layout", ShaderDeclarationQualifier::Layout),
    ("flat", ShaderDeclarationQualifier::Flat),
];

pub(crate) const DATA_TYPES: [(&str, ShaderDataType); 9] = [
    ("mat2", ShaderDataType::Mat2),
    ("mat3", ShaderDataType::Mat3),
    ("mat4", ShaderDataType::Mat4),
    ("vec2", ShaderDataType::Vec2),
    ("vec3", ShaderDataType::Vec3),
    ("vec4", ShaderDataType::Vec4),
    ("int", ShaderDataType::Int),
    ("float", ShaderDataType::Float),
    ("sampler2D", ShaderDataType::Sampler2D),
];

pub(crate) const SECTIONS: [(&str, ShaderSection); 3] = [
    ("glsl_common", ShaderSection::GlslCommon),
    ("vertex", ShaderSection::Vertex),
    ("fragment", ShaderSection::Fragment),
];

impl ShaderDeclarationQualifier {
    pub(crate) fn from_keyword(keyword: &str) -> Option<Self> {
        QUALIFIERS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, qualifier)| *qualifier)
    }
}

impl ShaderSection {
    pub(crate) fn from_keyword(keyword: &str) -> Option<Self> {
        SECTIONS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, section)| *section)
    }
}

pub(crate) type ParameterMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuilderLineKeyword {
    pub(crate) identifier: String,
    pub(crate) parameters: ParameterMap,
}

impl BuilderLineKeyword {
    pub(crate) fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            parameters: ParameterMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BuilderLine {
    pub(crate) keywords: Vec<BuilderLineKeyword>,
}

impl BuilderLine {
    pub(crate) fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub(crate) fn push(&mut self, word: impl Into<String>) {
        self.keywords.push(BuilderLineKeyword::new(word));
    }

    pub(crate) fn last_identifier(&self) -> Option<&str> {
        self.keywords.last().map(|keyword| keyword.identifier.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BuilderDeclaration {
    pub(crate) identifier: String,
    pub(crate) data_type: ShaderDataType,
    pub(crate) qualifiers: Vec<ShaderDeclarationQualifier>,
    pub(crate) parameters: BTreeMap<ShaderDeclarationQualifier, ParameterMap>,
}

impl BuilderDeclaration {
    /// Extracts a declaration from one statement.
    ///
    /// The first data-type keyword marks the line as a candidate. Qualifiers
    /// are collected with their parameter lists and the first remaining word
    /// becomes the identifier. Lines without a data type or without any
    /// qualifier yield `None`.
    pub(crate) fn from_line(mut line: BuilderLine) -> Option<Self> {
        let type_index = line
            .keywords
            .iter()
            .position(|keyword| ShaderDataType::from_keyword(&keyword.identifier).is_some())?;
        let type_keyword = line.keywords.remove(type_index);

        let mut declaration = BuilderDeclaration {
            data_type: ShaderDataType::from_keyword(&type_keyword.identifier)?,
            ..Self::default()
        };
        let mut extra_identifiers = Vec::new();

        for keyword in line.keywords {
            match ShaderDeclarationQualifier::from_keyword(&keyword.identifier) {
                Some(qualifier) => {
                    declaration.qualifiers.push(qualifier);
                    if !keyword.parameters.is_empty() {
                        declaration
                            .parameters
                            .entry(qualifier)
                            .or_insert(keyword.parameters);
                    }
                }
                None if declaration.identifier.is_empty() => {
                    declaration.identifier = keyword.identifier;
                }
                None => extra_identifiers.push(keyword.identifier),
            }
        }

        if declaration.qualifiers.is_empty() {
            return None;
        }

        if !extra_identifiers.is_empty() {
            tracing::warn!(
                identifier = %declaration.identifier,
                ignored = ?extra_identifiers,
                "found duplicate declaration identifier"
            );
        }

        Some(declaration)
    }

    pub(crate) fn has_qualifier(&self, qualifier: ShaderDeclarationQualifier) -> bool {
        self.qualifiers.contains(&qualifier)
    }

    pub(crate) fn qualifier_parameter(
        &self,
        qualifier: ShaderDeclarationQualifier,
        parameter: &str,
    ) -> Option<&str> {
        self.parameters
            .get(&qualifier)
            .and_then(|map| map.get(parameter))
            .map(String::as_str)
    }
}
