//! Uniform state categories
//!
//! Each struct is `#[repr(C)]` and matches the std140-style layout of the
//! corresponding uniform block in the uber-shader byte for byte.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use super::UniformState;
use crate::graphics::BindingBank;
use crate::graphics::render_state::FogMode;

pub const MAX_LIGHTS: usize = 8;
pub const MAX_BONES: usize = 128;

/// Projection, model-view (and inverse) and texture matrices
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformationState {
    pub projection_matrix: Mat4,
    pub model_view_matrix: Mat4,
    pub inverse_model_view_matrix: Mat4,
    pub texture_matrix: Mat4,
}

impl Default for TransformationState {
    fn default() -> Self {
        Self {
            projection_matrix: Mat4::IDENTITY,
            model_view_matrix: Mat4::IDENTITY,
            inverse_model_view_matrix: Mat4::IDENTITY,
            texture_matrix: Mat4::IDENTITY,
        }
    }
}

/// One fixed-function light in eye space (96 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightState {
    pub ambient_color: Vec4,
    pub diffuse_color: Vec4,
    pub specular_color: Vec4,
    /// `w == 0` for directional lights
    pub position: Vec4,
    pub spot_direction: Vec3,
    /// Cosine of the spot cutoff angle; -1 disables the cone
    pub spot_cos_cutoff: f32,
    pub spot_exponent: f32,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            ambient_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            specular_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            position: Vec4::new(0.0, 0.0, 1.0, 0.0),
            spot_direction: Vec3::new(0.0, 0.0, -1.0),
            spot_cos_cutoff: -1.0,
            spot_exponent: 0.0,
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightingState {
    pub ambient_lighting: Vec4,
    pub lights: [LightState; MAX_LIGHTS],
    /// Bit `i` set when light `i` contributes
    pub enabled_light_mask: u32,
    pub _padding: [u32; 3],
}

impl LightingState {
    /// Default lights: light 0 white, all others black
    pub fn default_lights() -> [LightState; MAX_LIGHTS] {
        let mut lights = [LightState::default(); MAX_LIGHTS];
        lights[0].diffuse_color = Vec4::ONE;
        lights[0].specular_color = Vec4::ONE;
        lights
    }
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            ambient_lighting: Vec4::new(0.2, 0.2, 0.2, 1.0),
            lights: Self::default_lights(),
            enabled_light_mask: 1,
            _padding: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialState {
    pub emission: Vec4,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
    pub _padding: [f32; 3],
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            emission: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
            _padding: [0.0; 3],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkinningState {
    pub bone_matrices: [Mat4; MAX_BONES],
}

impl Default for SkinningState {
    fn default() -> Self {
        Self {
            bone_matrices: [Mat4::IDENTITY; MAX_BONES],
        }
    }
}

/// User clip plane and fog parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ExtraRenderingState {
    /// Eye-space plane; all zero disables clipping
    pub user_clip_plane: Vec4,
    pub fog_mode: u32,
    pub fog_start: f32,
    pub fog_end: f32,
    pub fog_density: f32,
    pub fog_color: Vec4,
}

impl ExtraRenderingState {
    pub fn fog_mode(&self) -> FogMode {
        FogMode::from_u32(self.fog_mode).unwrap_or_default()
    }
}

impl Default for ExtraRenderingState {
    fn default() -> Self {
        Self {
            user_clip_plane: Vec4::ZERO,
            fog_mode: FogMode::None as u32,
            fog_start: 0.0,
            fog_end: 1.0,
            fog_density: 1.0,
            fog_color: Vec4::ZERO,
        }
    }
}

impl UniformState for TransformationState {
    const LABEL: &'static str = "transformation state";
    const BANK: BindingBank = BindingBank::Transformation;
    const MAX_BINDINGS: u32 = 100_000;
}

impl UniformState for LightingState {
    const LABEL: &'static str = "lighting state";
    const BANK: BindingBank = BindingBank::Lighting;
    const MAX_BINDINGS: u32 = 1000;
}

impl UniformState for MaterialState {
    const LABEL: &'static str = "material state";
    const BANK: BindingBank = BindingBank::Material;
    const MAX_BINDINGS: u32 = 100_000;
}

impl UniformState for SkinningState {
    const LABEL: &'static str = "skinning state";
    const BANK: BindingBank = BindingBank::Skinning;
    const MAX_BINDINGS: u32 = 1000;
}

impl UniformState for ExtraRenderingState {
    const LABEL: &'static str = "extra rendering state";
    const BANK: BindingBank = BindingBank::ExtraRendering;
    const MAX_BINDINGS: u32 = 1000;
}
