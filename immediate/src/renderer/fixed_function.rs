//! Fixed-function state setters
//!
//! Lighting, material, skinning, clip plane and fog land in the uniform state
//! caches; feature toggles land in the rendering state. Pipeline state the
//! renderer does not interpret (blend, depth, stencil, viewport...) is queued and
//! forwarded to the recorder during the drain.

use fixfunc_core::{
    BlendFactor, BlendOperation, ColorMask, CommandRecorder, CompareFunction, CullMode,
    FaceWinding, FixedFunctionState, GraphicsBackend, PolygonMode, StencilOperation, TextureHandle,
};
use glam::{Mat4, Vec3, Vec4};

use super::ImmediateRenderer;
use crate::error::Result;
use crate::graphics::{
    FogMode, LightState, LightingModel, MAX_BONES, MAX_LIGHTS, MaterialState, MatrixMode,
    SkinningState,
};

/// Parameters of one light as the caller specifies them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescription {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    /// Object-space position, `w == 0` for a directional light
    pub position: Vec4,
    pub spot_direction: Vec3,
    pub spot_exponent: f32,
    /// Half-angle of the spot cone in degrees; 180 disables the cone
    pub spot_cutoff: f32,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
}

impl Default for LightDescription {
    fn default() -> Self {
        let light = LightState::default();
        Self {
            ambient: light.ambient_color,
            diffuse: light.diffuse_color,
            specular: light.specular_color,
            position: light.position,
            spot_direction: light.spot_direction,
            spot_exponent: light.spot_exponent,
            spot_cutoff: 180.0,
            constant_attenuation: light.constant_attenuation,
            linear_attenuation: light.linear_attenuation,
            quadratic_attenuation: light.quadratic_attenuation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDescription {
    pub emission: Vec4,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        let material = MaterialState::default();
        Self {
            emission: material.emission,
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            shininess: material.shininess,
        }
    }
}

impl From<&MaterialDescription> for MaterialState {
    fn from(description: &MaterialDescription) -> Self {
        Self {
            emission: description.emission,
            ambient: description.ambient,
            diffuse: description.diffuse,
            specular: description.specular,
            shininess: description.shininess,
            _padding: [0.0; 3],
        }
    }
}

impl<B: GraphicsBackend, R: CommandRecorder> ImmediateRenderer<B, R> {
    // =========================================================================
    // Feature toggles
    // =========================================================================

    pub fn set_flat_shading(&mut self, enabled: bool) {
        self.rendering_state.flat_shading = enabled;
    }

    pub fn set_lighting_enabled(&mut self, enabled: bool) {
        self.rendering_state.lighting_enabled = enabled;
    }

    pub fn set_lighting_model(&mut self, model: LightingModel) {
        self.rendering_state.lighting_model = model;
    }

    pub fn set_texturing_enabled(&mut self, enabled: bool) {
        self.rendering_state.texturing_enabled = enabled;
    }

    pub fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        self.rendering_state.active_texture = texture;
    }

    pub fn set_skinning_enabled(&mut self, enabled: bool) {
        self.rendering_state.skinning_enabled = enabled;
    }

    // =========================================================================
    // Lighting
    // =========================================================================

    /// Every light back to its default, all disabled
    pub fn clear_lights(&mut self) {
        let mut state = *self.lighting.current_state();
        state.lights = [LightState::default(); MAX_LIGHTS];
        state.enabled_light_mask = 0;
        self.lighting.set_state(state);
    }

    pub fn set_ambient_lighting(&mut self, color: Vec4) {
        self.lighting.modify(|state| state.ambient_lighting = color);
    }

    /// Enable or disable light `index`.
    ///
    /// An enabling call with a description stores the light in eye space using the
    /// current model-view matrix.
    pub fn set_light(&mut self, index: usize, enabled: bool, light: Option<&LightDescription>) {
        if index >= MAX_LIGHTS {
            tracing::warn!("Ignoring light {} (at most {} lights)", index, MAX_LIGHTS);
            return;
        }

        let model_view = self.matrices.top(MatrixMode::ModelView);
        let state = self.lighting.current_state_mut();
        let bit = 1u32 << index;
        if enabled {
            state.enabled_light_mask |= bit;
            if let Some(light) = light {
                state.lights[index] = LightState {
                    ambient_color: light.ambient,
                    diffuse_color: light.diffuse,
                    specular_color: light.specular,
                    position: model_view * light.position,
                    spot_direction: model_view.transform_vector3(light.spot_direction),
                    spot_cos_cutoff: light.spot_cutoff.to_radians().cos(),
                    spot_exponent: light.spot_exponent,
                    constant_attenuation: light.constant_attenuation,
                    linear_attenuation: light.linear_attenuation,
                    quadratic_attenuation: light.quadratic_attenuation,
                };
            }
        } else {
            state.enabled_light_mask &= !bit;
        }
        self.lighting.make_dirty();
    }

    // =========================================================================
    // Material & skinning
    // =========================================================================

    pub fn set_material(&mut self, material: &MaterialDescription) {
        self.material.set_state(MaterialState::from(material));
    }

    /// Replace the bone palette; bones past the end of `bones` reset to identity.
    ///
    /// At most [`MAX_BONES`] matrices are used. `transpose` treats each matrix as
    /// row-major.
    pub fn set_skin_bones(&mut self, bones: &[Mat4], transpose: bool) {
        let mut state = SkinningState::default();
        for (dst, bone) in state.bone_matrices.iter_mut().zip(bones.iter().take(MAX_BONES)) {
            *dst = if transpose { bone.transpose() } else { *bone };
        }
        self.skinning.set_state(state);
    }

    // =========================================================================
    // Clip plane & fog
    // =========================================================================

    /// Only plane 0 exists. The plane is given in object space and stored in
    /// eye space.
    pub fn set_clip_plane(&mut self, index: usize, enabled: bool, plane: Vec4) {
        if index > 0 {
            tracing::warn!("Ignoring user clip plane {} (only plane 0 is supported)", index);
            return;
        }

        let eye_plane = if enabled {
            let inverse = self.matrices.top(MatrixMode::ModelView).inverse();
            // Row vector times matrix
            inverse.transpose() * plane
        } else {
            Vec4::ZERO
        };
        self.extra.modify(|state| state.user_clip_plane = eye_plane);
    }

    pub fn set_fog_mode(&mut self, mode: FogMode) {
        self.extra.modify(|state| state.fog_mode = mode as u32);
    }

    pub fn set_fog_color(&mut self, color: Vec4) {
        self.extra.modify(|state| state.fog_color = color);
    }

    pub fn set_fog_distances(&mut self, start: f32, end: f32) {
        self.extra.modify(|state| {
            state.fog_start = start;
            state.fog_end = end;
        });
    }

    pub fn set_fog_density(&mut self, density: f32) {
        self.extra.modify(|state| state.fog_density = density);
    }

    // =========================================================================
    // Pass-through pipeline state
    // =========================================================================

    fn record_fixed_function(&mut self, state: FixedFunctionState) -> Result<()> {
        self.session()?;
        self.commands.record_fixed_function(state);
        Ok(())
    }

    pub fn set_blend_state(&mut self, enabled: bool) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::BlendState { enabled })
    }

    pub fn set_blend_function(
        &mut self,
        source_factor: BlendFactor,
        destination_factor: BlendFactor,
        color_operation: BlendOperation,
        source_alpha_factor: BlendFactor,
        destination_alpha_factor: BlendFactor,
        alpha_operation: BlendOperation,
    ) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::BlendFunction {
            source_factor,
            destination_factor,
            color_operation,
            source_alpha_factor,
            destination_alpha_factor,
            alpha_operation,
        })
    }

    pub fn set_color_mask(&mut self, mask: ColorMask) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::ColorMask(mask))
    }

    pub fn set_front_face(&mut self, winding: FaceWinding) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::FrontFace(winding))
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::CullMode(mode))
    }

    pub fn set_depth_bias(&mut self, constant_factor: f32, clamp: f32, slope_factor: f32) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::DepthBias {
            constant_factor,
            clamp,
            slope_factor,
        })
    }

    pub fn set_depth_state(
        &mut self,
        test_enabled: bool,
        write_enabled: bool,
        function: CompareFunction,
    ) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::DepthState {
            test_enabled,
            write_enabled,
            function,
        })
    }

    pub fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::PolygonMode(mode))
    }

    pub fn set_stencil_state(&mut self, enabled: bool) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::StencilState { enabled })
    }

    pub fn set_stencil_front_face(
        &mut self,
        fail: StencilOperation,
        depth_fail: StencilOperation,
        pass: StencilOperation,
        function: CompareFunction,
    ) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::StencilFrontFace {
            fail,
            depth_fail,
            pass,
            function,
        })
    }

    pub fn set_stencil_back_face(
        &mut self,
        fail: StencilOperation,
        depth_fail: StencilOperation,
        pass: StencilOperation,
        function: CompareFunction,
    ) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::StencilBackFace {
            fail,
            depth_fail,
            pass,
            function,
        })
    }

    pub fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::Viewport {
            x,
            y,
            width,
            height,
        })
    }

    pub fn set_scissor(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::Scissor {
            x,
            y,
            width,
            height,
        })
    }

    pub fn set_stencil_reference(&mut self, reference: u32) -> Result<()> {
        self.record_fixed_function(FixedFunctionState::StencilReference(reference))
    }
}
