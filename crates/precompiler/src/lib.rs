//! Extracts stage interfaces from sectioned GLSL shader files.
//!
//! A shader file groups GLSL code into top-level `glsl_common { }`,
//! `vertex { }` and `fragment { }` blocks. [`ShaderBuilder`] scans the file,
//! records every qualified declaration (`in`, `out`, `uniform`, optionally with
//! `layout(...)` and `flat`) found at the top level of the vertex and fragment
//! blocks, and derives a packed vertex buffer layout from the vertex inputs.
//!
//! ```
//! use precompiler::{ShaderBuilder, ShaderStageType};
//!
//! let shader = ShaderBuilder::new()
//!     .build_from_str(
//!         "vertex {\n layout(location = 0) in vec3 position;\n}\n\
//!          fragment {\n out vec4 color;\n}\n",
//!     )
//!     .unwrap();
//!
//! assert!(shader.has_stage(ShaderStageType::Fragment));
//! assert_eq!(shader.vertex_buffer_layout().stride(), 12);
//! ```
mod builder;
mod declaration;
mod error;
mod layout;
mod model;
mod scan;
mod stages;

pub use builder::ShaderBuilder;
pub use error::{BuildError, StageError};
pub use model::{
    Shader, ShaderDataType, ShaderStage, ShaderStageType, ShaderVariable,
    ShaderVertexBufferElement, ShaderVertexBufferLayout,
};
