//! Free-form primitives and per-vertex emission

use fixfunc_core::{CommandRecorder, GraphicsBackend};

use super::{ImmediateRenderer, OpenPrimitive};
use crate::error::{ImmediateError, Result};
use crate::graphics::{
    DrawCall, ImmediateTopology, ImmediateVertex, IndexSource, MatrixMode, VertexSource,
    triangulate_range,
};

impl<B: GraphicsBackend, R: CommandRecorder> ImmediateRenderer<B, R> {
    /// Open a primitive range drawn with `topology`.
    ///
    /// State is resolved here: toggles and uniform changes made between
    /// `begin_primitives` and `end_primitives` apply to the next primitive.
    pub fn begin_primitives(&mut self, topology: ImmediateTopology) -> Result<()> {
        let session = self.session()?;
        if session.primitive.is_some() {
            return Err(ImmediateError::InvalidOperation("primitive already open"));
        }
        if session.mesh.is_some() {
            return Err(ImmediateError::InvalidOperation("cannot begin primitives inside a mesh"));
        }

        self.record_state_flush(topology)?;
        self.rendering_state.topology = topology;

        let first_vertex = self.geometry.vertex_count();
        self.session_mut()?.primitive = Some(OpenPrimitive {
            topology,
            first_vertex,
        });
        Ok(())
    }

    /// Close the open range and queue its draw.
    ///
    /// Fans, polygons and quads are triangulated into the immediate index buffer
    /// and drawn indexed; everything else is drawn straight from the vertex range.
    pub fn end_primitives(&mut self) -> Result<()> {
        let primitive = self
            .session_mut()?
            .primitive
            .take()
            .ok_or(ImmediateError::InvalidOperation("no primitive is open"))?;

        let vertex_count = self.geometry.vertex_count() - primitive.first_vertex;
        if vertex_count == 0 {
            return Ok(());
        }

        if primitive.topology.is_synthetic() {
            let first_index = self.geometry.index_count();
            let index_count =
                triangulate_range(primitive.topology, vertex_count, self.geometry.indices_mut());
            if index_count > 0 {
                self.commands.record_vertex_source(VertexSource::Immediate);
                self.commands.record_index_source(IndexSource::Immediate);
                self.commands.record_draw(DrawCall::Elements {
                    index_count,
                    instance_count: 1,
                    first_index,
                    base_vertex: primitive.first_vertex as i32,
                    base_instance: 0,
                });
            }
        } else {
            self.commands.record_vertex_source(VertexSource::Immediate);
            self.commands.record_draw(DrawCall::Arrays {
                vertex_count,
                instance_count: 1,
                first_vertex: primitive.first_vertex,
                base_instance: 0,
            });
        }
        Ok(())
    }

    pub fn color(&mut self, r: f32, g: f32, b: f32, a: f32) -> Result<()> {
        self.session()?;
        self.current_color = [r, g, b, a];
        Ok(())
    }

    pub fn normal(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.session()?;
        self.current_normal = [x, y, z];
        Ok(())
    }

    pub fn texcoord(&mut self, s: f32, t: f32) -> Result<()> {
        self.session()?;
        self.current_texcoord = [s, t];
        Ok(())
    }

    /// Append a vertex carrying the current color, normal and texcoord
    pub fn vertex(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.session()?;
        let vertex = self.sticky_vertex([x, y, z]);
        self.geometry.push_vertex(vertex);
        Ok(())
    }

    pub(super) fn sticky_vertex(&self, position: [f32; 3]) -> ImmediateVertex {
        ImmediateVertex::new(
            position,
            self.current_color,
            self.current_normal,
            self.current_texcoord,
        )
    }

    /// Resolve every uniform state category into a binding on the rendering state
    pub(super) fn validate_rendering_states(&mut self) -> Result<()> {
        self.sync_transformation_state();

        let backend = self.cache.backend();
        let signature = self.signature;
        let state = &mut self.rendering_state;
        state.transformation_binding = Some(self.transformation.validate(backend, signature)?);
        state.skinning_binding = Some(self.skinning.validate(backend, signature)?);
        state.lighting_binding = Some(self.lighting.validate(backend, signature)?);
        state.material_binding = Some(self.material.validate(backend, signature)?);
        state.extra_binding = Some(self.extra.validate(backend, signature)?);
        Ok(())
    }

    /// Copy changed stack tops into the transformation state
    fn sync_transformation_state(&mut self) {
        let projection = self.matrices.take_dirty(MatrixMode::Projection);
        let model_view = self.matrices.take_dirty(MatrixMode::ModelView);
        let texture = self.matrices.take_dirty(MatrixMode::Texture);
        if !(projection || model_view || texture) {
            return;
        }

        let state = self.transformation.current_state_mut();
        if projection {
            state.projection_matrix = self.matrices.top(MatrixMode::Projection);
        }
        if model_view {
            let matrix = self.matrices.top(MatrixMode::ModelView);
            state.model_view_matrix = matrix;
            state.inverse_model_view_matrix = matrix.inverse();
        }
        if texture {
            state.texture_matrix = self.matrices.top(MatrixMode::Texture);
        }
        self.transformation.make_dirty();
    }
}
