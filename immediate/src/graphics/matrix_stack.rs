//! Projection, model-view and texture matrix stacks
//!
//! Matrices are column-major `glam::Mat4`. Every mutation composes onto the top
//! entry (`top = top * m`) and marks that stack dirty; the renderer consumes the
//! dirty flags when it refreshes the transformation uniform state.

use glam::{Mat4, Vec3, Vec4};

use crate::error::{ImmediateError, Result};

/// Which matrix stack matrix operations apply to
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    Projection = 0,
    ModelView = 1,
    Texture = 2,
}

impl MatrixMode {
    pub const ALL: [MatrixMode; 3] = [MatrixMode::Projection, MatrixMode::ModelView, MatrixMode::Texture];
}

#[derive(Debug, Clone)]
pub struct MatrixStack {
    entries: Vec<Mat4>,
    dirty: bool,
}

impl MatrixStack {
    fn new() -> Self {
        Self {
            entries: vec![Mat4::IDENTITY],
            dirty: true,
        }
    }

    #[inline]
    pub fn top(&self) -> Mat4 {
        // The base entry can never be popped
        self.entries[self.entries.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(Mat4::IDENTITY);
        self.dirty = true;
    }
}

/// The three legacy matrix stacks plus the current selection
#[derive(Debug, Clone)]
pub struct MatrixStacks {
    stacks: [MatrixStack; 3],
    active: Option<MatrixMode>,
    flip_projection_y: bool,
}

impl MatrixStacks {
    /// `flip_projection_y` negates the Y terms of `ortho`/`frustum` results
    pub fn new(flip_projection_y: bool) -> Self {
        Self {
            stacks: [MatrixStack::new(), MatrixStack::new(), MatrixStack::new()],
            active: None,
            flip_projection_y,
        }
    }

    /// Every stack back to a single identity entry, nothing selected
    pub fn reset(&mut self) {
        for stack in &mut self.stacks {
            stack.reset();
        }
        self.active = None;
    }

    pub fn set_mode(&mut self, mode: MatrixMode) {
        self.active = Some(mode);
    }

    pub fn active_mode(&self) -> Option<MatrixMode> {
        self.active
    }

    pub fn stack(&self, mode: MatrixMode) -> &MatrixStack {
        &self.stacks[mode as usize]
    }

    #[inline]
    pub fn top(&self, mode: MatrixMode) -> Mat4 {
        self.stack(mode).top()
    }

    /// Return and clear the dirty flag of `mode`
    pub fn take_dirty(&mut self, mode: MatrixMode) -> bool {
        std::mem::replace(&mut self.stacks[mode as usize].dirty, false)
    }

    fn active_stack(&mut self) -> Result<&mut MatrixStack> {
        match self.active {
            Some(mode) => Ok(&mut self.stacks[mode as usize]),
            None => Err(ImmediateError::InvalidOperation("no matrix stack selected")),
        }
    }

    pub fn push(&mut self) -> Result<()> {
        let stack = self.active_stack()?;
        let top = stack.top();
        stack.entries.push(top);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<()> {
        let stack = self.active_stack()?;
        if stack.entries.len() <= 1 {
            return Err(ImmediateError::InvalidOperation("matrix stack underflow"));
        }
        stack.entries.pop();
        stack.dirty = true;
        Ok(())
    }

    pub fn load(&mut self, matrix: Mat4) -> Result<()> {
        let stack = self.active_stack()?;
        *stack.top_mut() = matrix;
        stack.dirty = true;
        Ok(())
    }

    pub fn load_identity(&mut self) -> Result<()> {
        self.load(Mat4::IDENTITY)
    }

    /// Post-compose the top entry: `top = top * matrix`
    pub fn multiply(&mut self, matrix: Mat4) -> Result<()> {
        let stack = self.active_stack()?;
        let top = stack.top_mut();
        *top *= matrix;
        stack.dirty = true;
        Ok(())
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
        let matrix = ortho_matrix(left, right, bottom, top, near, far, self.flip_projection_y);
        self.multiply(matrix)
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
        let matrix = frustum_matrix(left, right, bottom, top, near, far, self.flip_projection_y);
        self.multiply(matrix)
    }

    /// `fovy_degrees` is the full vertical field of view
    pub fn perspective(&mut self, fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
        let top = near * (fovy_degrees.to_radians() * 0.5).tan();
        let right = top * aspect;
        self.frustum(-right, right, -top, top, near, far)
    }

    pub fn rotate(&mut self, angle_degrees: f32, x: f32, y: f32, z: f32) -> Result<()> {
        let axis = Vec3::new(x, y, z).normalize_or_zero();
        if axis == Vec3::ZERO {
            return Err(ImmediateError::InvalidValue("rotation axis has zero length"));
        }
        self.multiply(Mat4::from_axis_angle(axis, angle_degrees.to_radians()))
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.multiply(Mat4::from_translation(Vec3::new(x, y, z)))
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.multiply(Mat4::from_scale(Vec3::new(x, y, z)))
    }
}

/// Orthographic projection mapping depth to [0, 1]
pub fn ortho_matrix(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
    flip_y: bool,
) -> Mat4 {
    let mut matrix = Mat4::from_cols(
        Vec4::new(2.0 / (right - left), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / (top - bottom), 0.0, 0.0),
        Vec4::new(0.0, 0.0, -1.0 / (far - near), 0.0),
        Vec4::new(
            -(right + left) / (right - left),
            -(top + bottom) / (top - bottom),
            -near / (far - near),
            1.0,
        ),
    );
    if flip_y {
        matrix.y_axis.y = -matrix.y_axis.y;
        matrix.w_axis.y = -matrix.w_axis.y;
    }
    matrix
}

/// Perspective frustum mapping depth to [0, 1], `w = -z_eye`
pub fn frustum_matrix(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
    flip_y: bool,
) -> Mat4 {
    let mut matrix = Mat4::from_cols(
        Vec4::new(2.0 * near / (right - left), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / (top - bottom), 0.0, 0.0),
        Vec4::new(
            (right + left) / (right - left),
            (top + bottom) / (top - bottom),
            -far / (far - near),
            -1.0,
        ),
        Vec4::new(0.0, 0.0, -near * far / (far - near), 0.0),
    );
    if flip_y {
        matrix.y_axis.y = -matrix.y_axis.y;
        matrix.z_axis.y = -matrix.z_axis.y;
    }
    matrix
}

#[cfg(test)]
mod tests;
