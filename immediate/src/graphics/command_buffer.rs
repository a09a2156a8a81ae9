//! Deferred command queue
//!
//! Captures state flushes, pass-through pipeline state and draws during a
//! session. Nothing reaches the recorder until the queue is drained at session
//! end, strictly in append order.

use fixfunc_core::{BufferHandle, FixedFunctionState, VertexBindingHandle, VertexLayoutHandle};

use super::render_state::RenderingState;

/// Where vertex data for subsequent draws comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSource {
    /// The session's accumulated immediate vertices
    Immediate,
    /// Caller-supplied layout and binding
    External {
        layout: VertexLayoutHandle,
        binding: VertexBindingHandle,
    },
}

/// Where indices for subsequent indexed draws come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexSource {
    /// The session's accumulated `u32` indices
    Immediate,
    /// Caller-supplied index buffer
    External {
        buffer: BufferHandle,
        offset: u64,
        index_size: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    Arrays {
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        base_instance: u32,
    },
    Elements {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        base_instance: u32,
    },
}

/// A captured action, executed once during the drain
#[derive(Debug, Clone, PartialEq)]
pub enum PendingCommand {
    /// Bring shaders, topology and resource bindings in line with this snapshot
    FlushState(RenderingState),
    /// Forwarded verbatim to the recorder
    FixedFunction(FixedFunctionState),
    BindVertexSource(VertexSource),
    BindIndexSource(IndexSource),
    Draw(DrawCall),
}

#[derive(Debug, Default)]
pub struct DeferredCommandQueue {
    commands: Vec<PendingCommand>,
}

impl DeferredCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_state_flush(&mut self, state: RenderingState) {
        self.commands.push(PendingCommand::FlushState(state));
    }

    pub fn record_fixed_function(&mut self, state: FixedFunctionState) {
        self.commands.push(PendingCommand::FixedFunction(state));
    }

    pub fn record_vertex_source(&mut self, source: VertexSource) {
        self.commands.push(PendingCommand::BindVertexSource(source));
    }

    pub fn record_index_source(&mut self, source: IndexSource) {
        self.commands.push(PendingCommand::BindIndexSource(source));
    }

    pub fn record_draw(&mut self, draw: DrawCall) {
        self.commands.push(PendingCommand::Draw(draw));
    }

    pub fn commands(&self) -> &[PendingCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all commands (keeps allocation)
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Take every command in append order, leaving the queue empty
    pub fn take(&mut self) -> Vec<PendingCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Return a previously taken (and drained) command list for reuse
    pub fn restore_allocation(&mut self, mut commands: Vec<PendingCommand>) {
        if self.commands.is_empty() {
            commands.clear();
            self.commands = commands;
        }
    }
}
