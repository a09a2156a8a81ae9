//! Matrix stack operations
//!
//! All of these act on the stack selected with [`ImmediateRenderer::matrix_mode`]
//! and fail with `InvalidOperation` before a stack has been selected.

use fixfunc_core::{CommandRecorder, GraphicsBackend};
use glam::Mat4;

use super::ImmediateRenderer;
use crate::error::Result;
use crate::graphics::MatrixMode;

impl<B: GraphicsBackend, R: CommandRecorder> ImmediateRenderer<B, R> {
    pub fn matrix_mode(&mut self, mode: MatrixMode) {
        self.matrices.set_mode(mode);
    }

    pub fn projection_matrix_mode(&mut self) {
        self.matrix_mode(MatrixMode::Projection);
    }

    pub fn model_view_matrix_mode(&mut self) {
        self.matrix_mode(MatrixMode::ModelView);
    }

    pub fn texture_matrix_mode(&mut self) {
        self.matrix_mode(MatrixMode::Texture);
    }

    pub fn load_identity(&mut self) -> Result<()> {
        self.matrices.load_identity()
    }

    pub fn push_matrix(&mut self) -> Result<()> {
        self.matrices.push()
    }

    pub fn pop_matrix(&mut self) -> Result<()> {
        self.matrices.pop()
    }

    /// Replace the top with 16 column-major elements
    pub fn load_matrix(&mut self, elements: &[f32; 16]) -> Result<()> {
        self.matrices.load(Mat4::from_cols_array(elements))
    }

    /// Replace the top with 16 row-major elements
    pub fn load_transpose_matrix(&mut self, elements: &[f32; 16]) -> Result<()> {
        self.matrices.load(Mat4::from_cols_array(elements).transpose())
    }

    /// `top = top * M` for 16 column-major elements
    pub fn multiply_matrix(&mut self, elements: &[f32; 16]) -> Result<()> {
        self.matrices.multiply(Mat4::from_cols_array(elements))
    }

    /// `top = top * M` for 16 row-major elements
    pub fn multiply_transpose_matrix(&mut self, elements: &[f32; 16]) -> Result<()> {
        self.matrices
            .multiply(Mat4::from_cols_array(elements).transpose())
    }

    pub fn ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<()> {
        self.matrices.ortho(left, right, bottom, top, near, far)
    }

    pub fn frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<()> {
        self.matrices.frustum(left, right, bottom, top, near, far)
    }

    pub fn perspective(&mut self, fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
        self.matrices.perspective(fovy_degrees, aspect, near, far)
    }

    pub fn rotate(&mut self, angle_degrees: f32, x: f32, y: f32, z: f32) -> Result<()> {
        self.matrices.rotate(angle_degrees, x, y, z)
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.matrices.translate(x, y, z)
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.matrices.scale(x, y, z)
    }
}
