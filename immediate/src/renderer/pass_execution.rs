//! Session end: data upload and command drain
//!
//! This module handles:
//! - Uploading geometry and every uniform state version recorded this session
//! - Resolving texture bindings before anything reaches the recorder
//! - Draining the deferred queue with state tracking, so unchanged shaders,
//!   topology, bindings and vertex/index sources are not re-issued

use std::sync::Arc;

use fixfunc_core::{
    BindingHandle, CommandRecorder, GraphicsBackend, PrimitiveTopology, ShaderHandle, ShaderStage,
};

use super::ImmediateRenderer;
use crate::error::Result;
use crate::graphics::{DrawCall, IndexSource, PendingCommand, RenderingState, VertexSource};
use crate::shader_gen::{FRAGMENT_ENTRY_POINT, ShaderCompilationKey, VERTEX_ENTRY_POINT};
use crate::shared::SharedImmediateObjects;

const IMMEDIATE_INDEX_SIZE: u32 = std::mem::size_of::<u32>() as u32;

/// What has actually been sent to the recorder during one drain
#[derive(Default)]
struct SubmittedState {
    signature_set: bool,
    vertex_shader: Option<ShaderHandle>,
    fragment_shader: Option<ShaderHandle>,
    topology: Option<PrimitiveTopology>,
    /// Uniform bindings in bank order
    uniform_bindings: [Option<BindingHandle>; 5],
    sampler_bound: bool,
    texture_binding: Option<BindingHandle>,
    vertex_source: Option<VertexSource>,
    index_source: Option<IndexSource>,
}

impl<B: GraphicsBackend, R: CommandRecorder> ImmediateRenderer<B, R> {
    /// Upload geometry and uniform versions, then claim a binding for every
    /// texture a queued state flush samples.
    pub(super) fn flush_rendering_data(&mut self) -> Result<()> {
        let backend = self.cache.backend();
        self.geometry.flush(backend, self.vertex_binding)?;

        self.transformation.flush(backend)?;
        self.lighting.flush(backend)?;
        self.material.flush(backend)?;
        self.extra.flush(backend)?;
        self.skinning.flush(backend)?;

        for command in self.commands.commands() {
            if let PendingCommand::FlushState(state) = command
                && state.texturing_enabled
                && let Some(texture) = state.active_texture
            {
                self.textures.binding_for(backend, self.signature, texture)?;
            }
        }
        Ok(())
    }

    /// Replay the queue into `recorder` in append order
    pub(super) fn drain_commands(&mut self, recorder: &mut R) -> Result<()> {
        let cache = Arc::clone(&self.cache);
        let shared = cache.ensure_objects()?;
        let commands = self.commands.take();
        let mut submitted = SubmittedState::default();

        for command in &commands {
            match command {
                PendingCommand::FlushState(state) => {
                    self.flush_state(recorder, shared, &mut submitted, state);
                }
                PendingCommand::FixedFunction(state) => recorder.apply_fixed_function(state),
                PendingCommand::BindVertexSource(source) => {
                    if submitted.vertex_source == Some(*source) {
                        continue;
                    }
                    let (layout, binding) = match *source {
                        VertexSource::Immediate => (self.vertex_layout, self.vertex_binding),
                        VertexSource::External { layout, binding } => (layout, binding),
                    };
                    recorder.set_vertex_layout(layout);
                    recorder.use_vertex_binding(binding);
                    submitted.vertex_source = Some(*source);
                }
                PendingCommand::BindIndexSource(source) => {
                    if submitted.index_source == Some(*source) {
                        continue;
                    }
                    match *source {
                        IndexSource::Immediate => {
                            if let Some(buffer) = self.geometry.index_buffer() {
                                recorder.use_index_buffer_at(buffer, 0, IMMEDIATE_INDEX_SIZE);
                            }
                        }
                        IndexSource::External {
                            buffer,
                            offset,
                            index_size,
                        } => recorder.use_index_buffer_at(buffer, offset, index_size),
                    }
                    submitted.index_source = Some(*source);
                }
                PendingCommand::Draw(DrawCall::Arrays {
                    vertex_count,
                    instance_count,
                    first_vertex,
                    base_instance,
                }) => recorder.draw_arrays(*vertex_count, *instance_count, *first_vertex, *base_instance),
                PendingCommand::Draw(DrawCall::Elements {
                    index_count,
                    instance_count,
                    first_index,
                    base_vertex,
                    base_instance,
                }) => recorder.draw_elements(
                    *index_count,
                    *instance_count,
                    *first_index,
                    *base_vertex,
                    *base_instance,
                ),
            }
        }

        tracing::trace!("Drained {} immediate commands", commands.len());
        self.commands.restore_allocation(commands);
        Ok(())
    }

    /// Bring the recorder in line with `state`, skipping anything unchanged
    fn flush_state(
        &self,
        recorder: &mut R,
        shared: &SharedImmediateObjects,
        submitted: &mut SubmittedState,
        state: &RenderingState,
    ) {
        if !submitted.signature_set {
            recorder.set_shader_signature(self.signature);
            submitted.signature_set = true;
        }

        let backend = self.cache.backend();
        let key = ShaderCompilationKey::from_state(state);
        let vertex_shader = shared
            .shader_library
            .get_or_compile(backend, key, ShaderStage::Vertex);
        if submitted.vertex_shader != Some(vertex_shader) {
            recorder.set_vertex_stage(vertex_shader, VERTEX_ENTRY_POINT);
            submitted.vertex_shader = Some(vertex_shader);
        }
        let fragment_shader = shared
            .shader_library
            .get_or_compile(backend, key, ShaderStage::Fragment);
        if submitted.fragment_shader != Some(fragment_shader) {
            recorder.set_fragment_stage(fragment_shader, FRAGMENT_ENTRY_POINT);
            submitted.fragment_shader = Some(fragment_shader);
        }

        let topology = state.topology.native();
        if submitted.topology != Some(topology) {
            recorder.set_primitive_topology(topology);
            submitted.topology = Some(topology);
        }

        for (bound, binding) in submitted
            .uniform_bindings
            .iter_mut()
            .zip(state.uniform_bindings())
        {
            if let Some(binding) = binding
                && *bound != Some(binding)
            {
                recorder.use_shader_resources(binding);
                *bound = Some(binding);
            }
        }

        if state.texturing_enabled {
            match state.active_texture.and_then(|texture| self.textures.lookup(texture)) {
                Some(binding) => {
                    if !submitted.sampler_bound {
                        recorder.use_shader_resources(self.sampler_binding);
                        submitted.sampler_bound = true;
                    }
                    if submitted.texture_binding != Some(binding) {
                        recorder.use_shader_resources(binding);
                        submitted.texture_binding = Some(binding);
                    }
                }
                None => tracing::warn!("Texturing enabled without a bound texture"),
            }
        }
    }
}
