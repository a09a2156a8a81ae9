//! Explicit mesh path
//!
//! A mesh is either built from caller arrays copied into the immediate vertex
//! array, or drawn from a caller-owned vertex binding. Draws inside it are
//! validated and queued like free-form primitives.

use fixfunc_core::{
    BackendError, BufferHandle, CommandRecorder, GraphicsBackend, VertexBindingHandle,
    VertexLayoutHandle,
};

use super::{ImmediateRenderer, OpenMesh};
use crate::error::{ImmediateError, Result};
use crate::graphics::{
    DrawCall, ImmediateTopology, ImmediateVertex, IndexSource, VertexSource, triangulate_indices,
    triangulate_range,
};

/// `count` elements of `element_count` floats, `stride` floats apart
fn strided_elements(
    data: &[f32],
    count: usize,
    stride: usize,
    element_count: usize,
    max_elements: usize,
) -> Result<impl Iterator<Item = &[f32]>> {
    if element_count == 0 || element_count > max_elements {
        return Err(ImmediateError::InvalidValue("unsupported element count"));
    }
    if stride < element_count {
        return Err(ImmediateError::InvalidValue("stride shorter than one element"));
    }
    let required = match count {
        0 => 0,
        n => (n - 1)
            .checked_mul(stride)
            .and_then(|span| span.checked_add(element_count))
            .ok_or(ImmediateError::InvalidValue("stride * count overflows"))?,
    };
    if data.len() < required {
        return Err(ImmediateError::InvalidValue("array shorter than stride * count"));
    }
    Ok((0..count).map(move |i| &data[i * stride..i * stride + element_count]))
}

/// `base + offset` as a signed base vertex
fn offset_base_vertex(base: u32, offset: i32) -> Result<i32> {
    i32::try_from(base)
        .ok()
        .and_then(|base| base.checked_add(offset))
        .ok_or(ImmediateError::InvalidValue("base vertex out of range"))
}

impl<B: GraphicsBackend, R: CommandRecorder> ImmediateRenderer<B, R> {
    fn ensure_no_mesh(&self) -> Result<()> {
        let session = self.session()?;
        if session.mesh.is_some() {
            return Err(ImmediateError::InvalidOperation("a mesh is already open"));
        }
        if session.primitive.is_some() {
            return Err(ImmediateError::InvalidOperation("cannot begin a mesh inside primitives"));
        }
        Ok(())
    }

    fn set_open_mesh(&mut self, mesh: Option<OpenMesh>) -> Result<()> {
        self.session_mut()?.mesh = mesh;
        Ok(())
    }

    /// Open a mesh of `vertex_count` vertices whose positions are read from
    /// `positions`, `element_count` (1 to 3) floats every `stride` floats.
    ///
    /// Missing position components are zero; color, normal and texcoord start as
    /// the current per-vertex values.
    pub fn begin_mesh_with_vertices(
        &mut self,
        vertex_count: usize,
        stride: usize,
        element_count: usize,
        positions: &[f32],
    ) -> Result<()> {
        self.ensure_no_mesh()?;
        let elements = strided_elements(positions, vertex_count, stride, element_count, 3)?;

        let base_vertex = self.geometry.vertex_count();
        for element in elements {
            let mut position = [0.0; 3];
            position[..element.len()].copy_from_slice(element);
            let vertex = self.sticky_vertex(position);
            self.geometry.push_vertex(vertex);
        }

        self.set_open_mesh(Some(OpenMesh {
            base_vertex,
            vertex_count: vertex_count as u32,
            vertex_source: VertexSource::Immediate,
            index_buffer: None,
        }))
    }

    /// Open a mesh drawn from a caller-owned vertex binding
    pub fn begin_mesh_with_vertex_binding(
        &mut self,
        layout: VertexLayoutHandle,
        binding: VertexBindingHandle,
    ) -> Result<()> {
        self.ensure_no_mesh()?;
        self.set_open_mesh(Some(OpenMesh {
            base_vertex: 0,
            vertex_count: 0,
            vertex_source: VertexSource::External { layout, binding },
            index_buffer: None,
        }))
    }

    /// Overwrite attributes of the open mesh's copied vertices.
    ///
    /// `write` receives each vertex and its `element_count` source floats.
    fn update_mesh_vertices(
        &mut self,
        stride: usize,
        element_count: usize,
        max_elements: usize,
        data: &[f32],
        write: impl Fn(&mut ImmediateVertex, &[f32]),
    ) -> Result<()> {
        let mesh = self.open_mesh()?;
        if mesh.vertex_source != VertexSource::Immediate {
            return Err(ImmediateError::InvalidOperation(
                "mesh vertices come from an external binding",
            ));
        }

        let elements = strided_elements(
            data,
            mesh.vertex_count as usize,
            stride,
            element_count,
            max_elements,
        )?;
        let start = mesh.base_vertex as usize;
        let vertices = &mut self.geometry.vertices_mut()[start..start + mesh.vertex_count as usize];
        for (vertex, element) in vertices.iter_mut().zip(elements) {
            write(vertex, element);
        }
        Ok(())
    }

    pub fn set_current_mesh_colors(
        &mut self,
        stride: usize,
        element_count: usize,
        colors: &[f32],
    ) -> Result<()> {
        self.update_mesh_vertices(stride, element_count, 4, colors, |vertex, color| {
            vertex.color[..color.len()].copy_from_slice(color);
        })
    }

    pub fn set_current_mesh_normals(
        &mut self,
        stride: usize,
        element_count: usize,
        normals: &[f32],
    ) -> Result<()> {
        self.update_mesh_vertices(stride, element_count, 3, normals, |vertex, normal| {
            vertex.normal[..normal.len()].copy_from_slice(normal);
        })
    }

    pub fn set_current_mesh_tex_coords(
        &mut self,
        stride: usize,
        element_count: usize,
        texcoords: &[f32],
    ) -> Result<()> {
        self.update_mesh_vertices(stride, element_count, 2, texcoords, |vertex, texcoord| {
            vertex.texcoord[..texcoord.len()].copy_from_slice(texcoord);
        })
    }

    /// Use `buffer` from its start, with the index size it was created with
    pub fn use_index_buffer(&mut self, buffer: BufferHandle) -> Result<()> {
        self.open_mesh()?;
        let description = self
            .cache
            .backend()
            .buffer_description(buffer)
            .ok_or(BackendError::InvalidHandle {
                kind: "buffer",
                raw: buffer.raw(),
            })?;
        self.use_index_buffer_at(buffer, 0, description.stride)
    }

    /// Use `index_size`-byte indices of `buffer` starting at byte `offset` for
    /// `draw_elements` in the open mesh
    pub fn use_index_buffer_at(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        index_size: u32,
    ) -> Result<()> {
        let mut mesh = self.open_mesh()?;
        if index_size != 2 && index_size != 4 {
            return Err(ImmediateError::InvalidValue("index size must be 2 or 4 bytes"));
        }
        mesh.index_buffer = Some(IndexSource::External {
            buffer,
            offset,
            index_size,
        });
        self.set_open_mesh(Some(mesh))
    }

    /// Topology used by subsequent `draw_arrays`/`draw_elements`
    pub fn set_primitive_type(&mut self, topology: ImmediateTopology) {
        self.rendering_state.topology = topology;
    }

    /// Draw `vertex_count` mesh vertices starting at `first_vertex`
    pub fn draw_arrays(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        base_instance: u32,
    ) -> Result<()> {
        let mesh = self.open_mesh()?;
        let first_vertex = mesh
            .base_vertex
            .checked_add(first_vertex)
            .ok_or(ImmediateError::InvalidValue("first vertex out of range"))?;
        let topology = self.rendering_state.topology;
        let base_vertex = if topology.is_synthetic() {
            offset_base_vertex(first_vertex, 0)?
        } else {
            0
        };
        self.record_state_flush(topology)?;
        self.commands.record_vertex_source(mesh.vertex_source);

        if topology.is_synthetic() {
            let first_index = self.geometry.index_count();
            let index_count = triangulate_range(topology, vertex_count, self.geometry.indices_mut());
            if index_count > 0 {
                self.commands.record_index_source(IndexSource::Immediate);
                self.commands.record_draw(DrawCall::Elements {
                    index_count,
                    instance_count,
                    first_index,
                    base_vertex,
                    base_instance,
                });
            }
        } else {
            self.commands.record_draw(DrawCall::Arrays {
                vertex_count,
                instance_count,
                first_vertex,
                base_instance,
            });
        }
        Ok(())
    }

    /// Indexed draw from the buffer bound with `use_index_buffer[_at]`
    pub fn draw_elements(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        base_instance: u32,
    ) -> Result<()> {
        let mesh = self.open_mesh()?;
        let Some(index_buffer) = mesh.index_buffer else {
            return Err(ImmediateError::InvalidOperation("no index buffer bound"));
        };
        let topology = self.rendering_state.topology;
        if topology.is_synthetic() {
            return Err(ImmediateError::InvalidOperation(
                "synthetic topologies need CPU indices",
            ));
        }
        let base_vertex = offset_base_vertex(mesh.base_vertex, base_vertex)?;

        self.record_state_flush(topology)?;
        self.commands.record_vertex_source(mesh.vertex_source);
        self.commands.record_index_source(index_buffer);
        self.commands.record_draw(DrawCall::Elements {
            index_count,
            instance_count,
            first_index,
            base_vertex,
            base_instance,
        });
        Ok(())
    }

    /// Indexed draw of caller indices, copied (or triangulated) into the
    /// immediate index buffer.
    ///
    /// Invalid once an explicit index buffer is bound in the open mesh.
    pub fn draw_elements_with_indices(
        &mut self,
        topology: ImmediateTopology,
        indices: &[u32],
        instance_count: u32,
        base_vertex: i32,
        base_instance: u32,
    ) -> Result<()> {
        let mesh = self.open_mesh()?;
        if mesh.index_buffer.is_some() {
            return Err(ImmediateError::InvalidOperation(
                "an explicit index buffer is bound",
            ));
        }
        let base_vertex = offset_base_vertex(mesh.base_vertex, base_vertex)?;

        self.record_state_flush(topology)?;
        let first_index = self.geometry.index_count();
        let index_count = triangulate_indices(topology, indices, self.geometry.indices_mut());
        if index_count == 0 {
            return Ok(());
        }

        self.commands.record_vertex_source(mesh.vertex_source);
        self.commands.record_index_source(IndexSource::Immediate);
        self.commands.record_draw(DrawCall::Elements {
            index_count,
            instance_count,
            first_index,
            base_vertex,
            base_instance,
        });
        Ok(())
    }

    pub fn end_mesh(&mut self) -> Result<()> {
        self.open_mesh()?;
        self.set_open_mesh(None)
    }
}
