use crate::model::{
    Shader, ShaderStageType, ShaderVariable, ShaderVertexBufferElement, ShaderVertexBufferLayout,
};

/// Orders the vertex stage inputs and derives the packed vertex buffer layout.
///
/// Inputs without a location come first in declaration order, followed by the
/// located inputs by ascending location. The sort is stable, so inputs sharing
/// a location keep their declaration order as well.
pub(crate) fn set_vertex_buffer_layout(shader: &mut Shader) {
    let Some(stage) = shader.stages.get_mut(&ShaderStageType::Vertex) else {
        return;
    };

    stage.inputs.sort_by_key(|input| input.layout_location);
    shader.vertex_buffer_layout = ShaderVertexBufferLayout::packed(&stage.inputs);

    tracing::debug!(
        elements = shader.vertex_buffer_layout.len(),
        stride = shader.vertex_buffer_layout.stride(),
        "vertex buffer layout derived"
    );
}

impl ShaderVertexBufferLayout {
    /// Packs `inputs` back to back in the order given.
    pub fn packed(inputs: &[ShaderVariable]) -> Self {
        let mut offset = 0;
        let elements = inputs
            .iter()
            .map(|input| {
                let element = ShaderVertexBufferElement {
                    name: input.identifier.clone(),
                    ty: input.ty,
                    size: input.ty.size(),
                    offset,
                };
                offset += element.size;
                element
            })
            .collect();

        Self {
            elements,
            stride: offset,
        }
    }
}
