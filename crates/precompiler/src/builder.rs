//! Character-level scanner that turns a sectioned shader file into a [`Shader`].
//!
//! The scanner walks every line once, keeping a stack of states (`Normal`
//! while reading statements, `Parameter` inside a parenthesized list), the
//! current brace depth and the section being captured. Words are grouped into
//! statement lines; at the top level of a section each finished line is offered
//! to [`BuilderDeclaration::from_line`]. Raw section text is captured alongside
//! so later stages can compile it verbatim.
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::declaration::{BuilderDeclaration, BuilderLine, ShaderSection};
use crate::error::{BuildError, StageError};
use crate::layout::set_vertex_buffer_layout;
use crate::model::Shader;
use crate::scan::{SectionBuilder, WordBuilder};
use crate::stages::parse_stages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Normal,
    Parameter,
}

/// Which half of a `key = value` pair the next word fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParameterSlot {
    #[default]
    Id,
    Value,
}

#[derive(Debug)]
struct OpenSection {
    section: ShaderSection,
    start_depth: usize,
    source: SectionBuilder,
    declarations: Vec<BuilderDeclaration>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedSection {
    pub(crate) source: String,
    pub(crate) declarations: Vec<BuilderDeclaration>,
}

/// Single-use builder: every `build*` call consumes it.
#[derive(Debug)]
pub struct ShaderBuilder {
    word: WordBuilder,
    states: Vec<BuilderState>,
    is_comment: bool,
    line: BuilderLine,
    parameter_id: String,
    parameter_value: String,
    parameter_slot: ParameterSlot,
    scope_depth: usize,
    open_section: Option<OpenSection>,
    sections: BTreeMap<ShaderSection, CapturedSection>,
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self {
            word: WordBuilder::default(),
            states: vec![BuilderState::Normal],
            is_comment: false,
            line: BuilderLine::default(),
            parameter_id: String::new(),
            parameter_value: String::new(),
            parameter_slot: ParameterSlot::Id,
            scope_depth: 0,
            open_section: None,
            sections: BTreeMap::new(),
        }
    }
}

impl ShaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the shader file at `path` and extracts its stages.
    pub fn build(self, path: impl AsRef<Path>) -> Result<Shader, BuildError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "building shader");
        let file = File::open(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.build_from_reader(BufReader::new(file))
            .map_err(|err| match err {
                BuildError::Io(source) => BuildError::Read {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })
    }

    pub fn build_from_reader<R: BufRead>(mut self, reader: R) -> Result<Shader, BuildError> {
        for line in reader.lines() {
            self.scan_line(&line?);
        }
        Ok(self.finish()?)
    }

    pub fn build_from_str(mut self, source: &str) -> Result<Shader, StageError> {
        for line in source.lines() {
            self.scan_line(line);
        }
        self.finish()
    }

    fn finish(mut self) -> Result<Shader, StageError> {
        self.push_word();
        self.finish_line();
        if let Some(open) = self.open_section.take() {
            tracing::warn!(
                section = ?open.section,
                "section is never closed; its contents are ignored"
            );
        }

        let mut shader = Shader::default();
        parse_stages(&mut shader, self.sections)?;
        set_vertex_buffer_layout(&mut shader);
        Ok(shader)
    }

    fn scan_line(&mut self, line: &str) {
        self.is_comment = false;

        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            if let Some(open) = self.open_section.as_mut() {
                open.source.append(c);
            }

            if self.is_comment {
                continue;
            }

            match c {
                '{' => self.push_scope(),
                '}' => self.pop_scope(),

                '(' => {
                    self.push_word();
                    self.start_parameters();
                }
                ')' => {
                    self.push_word();
                    self.stop_parameters();
                }

                ',' => {
                    self.push_word();
                    self.push_separator();
                }

                ';' => {
                    self.push_word();
                    self.finish_line();
                }

                '=' => {
                    self.push_word();
                    self.push_operator_assign();
                }

                '/' if chars.peek() == Some(&'/') => {
                    self.push_word();
                    self.is_comment = true;
                }

                ' ' | '\t' | '\n' | '\r' => self.push_word(),

                _ => self.word.append(c),
            }
        }

        self.push_word();
    }

    fn state(&self) -> BuilderState {
        self.states.last().copied().unwrap_or(BuilderState::Normal)
    }

    fn push_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let word = self.word.build();

        match self.state() {
            BuilderState::Normal => self.line.push(word),
            BuilderState::Parameter => match self.parameter_slot {
                ParameterSlot::Id => self.parameter_id = word,
                ParameterSlot::Value => self.parameter_value = word,
            },
        }
    }

    fn push_scope(&mut self) {
        self.push_word();

        if self.open_section.is_none() {
            if let Some(section) = self.line.last_identifier().and_then(ShaderSection::from_keyword)
            {
                tracing::debug!(?section, depth = self.scope_depth, "entering section");
                self.open_section = Some(OpenSection {
                    section,
                    start_depth: self.scope_depth,
                    source: SectionBuilder::default(),
                    declarations: Vec::new(),
                });
            }
        }

        self.finish_line();
        self.scope_depth += 1;
    }

    fn pop_scope(&mut self) {
        self.push_word();
        self.finish_line();

        if self.scope_depth == 0 {
            tracing::warn!("unmatched '}}' ignored");
            return;
        }
        self.scope_depth -= 1;

        match self.open_section.take() {
            Some(mut open) if open.start_depth == self.scope_depth => {
                open.source.back(1);
                let source = open.source.build();
                self.close_section(open.section, source, open.declarations);
            }
            other => self.open_section = other,
        }
    }

    fn close_section(
        &mut self,
        section: ShaderSection,
        source: String,
        declarations: Vec<BuilderDeclaration>,
    ) {
        match self.sections.entry(section) {
            Entry::Occupied(_) => {
                tracing::warn!(?section, "repeated section block ignored");
            }
            Entry::Vacant(slot) => {
                tracing::debug!(
                    ?section,
                    declarations = declarations.len(),
                    "section captured"
                );
                slot.insert(CapturedSection {
                    source,
                    declarations,
                });
            }
        }
    }

    fn start_parameters(&mut self) {
        self.parameter_slot = ParameterSlot::Id;
        self.parameter_id.clear();
        self.parameter_value.clear();
        self.states.push(BuilderState::Parameter);
    }

    fn stop_parameters(&mut self) {
        if self.state() != BuilderState::Parameter {
            tracing::warn!("unmatched ')' ignored");
            return;
        }
        self.commit_parameter();
        self.states.pop();
    }

    fn push_separator(&mut self) {
        if self.state() == BuilderState::Parameter {
            self.commit_parameter();
        }
    }

    /// Stores the pending `id = value` pair on the keyword preceding the list.
    fn commit_parameter(&mut self) {
        let id = std::mem::take(&mut self.parameter_id);
        let value = std::mem::take(&mut self.parameter_value);
        self.parameter_slot = ParameterSlot::Id;

        if id.is_empty() {
            return;
        }
        match self.line.keywords.last_mut() {
            Some(keyword) => {
                keyword.parameters.insert(id, value);
            }
            None => tracing::warn!(parameter = %id, "parameter without a preceding keyword"),
        }
    }

    fn push_operator_assign(&mut self) {
        match self.state() {
            BuilderState::Normal => self.line.push("="),
            BuilderState::Parameter => self.parameter_slot = ParameterSlot::Value,
        }
    }

    /// Ends the current statement. Only lines sitting directly inside an open
    /// section can produce declarations.
    fn finish_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        if line.is_empty() {
            return;
        }
        let Some(open) = self.open_section.as_mut() else {
            return;
        };
        if self.scope_depth != open.start_depth + 1 {
            return;
        }

        if let Some(declaration) = BuilderDeclaration::from_line(line) {
            tracing::debug!(
                section = ?open.section,
                identifier = %declaration.identifier,
                "captured declaration"
            );
            open.declarations.push(declaration);
        }
    }
}
