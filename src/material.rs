//! Shader materials for the two scene meshes.
//!
//! Both materials are host-defined shader programs: the bubble renders an
//! opaque two-color vertical gradient, the glow renders a white Fresnel rim
//! drawn back-face-only with additive blending. The glow's opacity is not a
//! fixed constant — the render loop rewrites it every tick.

/// Warm gradient bottom color (#FE390C).
pub const BUBBLE_COLOR_1: [f32; 3] = [0.99607843, 0.22352941, 0.047058824];
/// Warm gradient top color (#FACE40).
pub const BUBBLE_COLOR_2: [f32; 3] = [0.98039216, 0.80784315, 0.2509804];

/// Blend modes used by the scene materials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// No blending, fully opaque.
    #[default]
    Opaque,
    /// Additive blending (for glows).
    Additive,
}

impl BlendMode {
    /// Convert to wgpu blend state.
    pub fn to_blend_state(&self) -> wgpu::BlendState {
        match self {
            BlendMode::Opaque => wgpu::BlendState::REPLACE,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

/// Gradient material on the bubble mesh.
///
/// Exposes two RGB uniforms; the fragment stage interpolates between them
/// along the vertical texture coordinate.
#[derive(Clone, Copy, Debug)]
pub struct BubbleMaterial {
    pub color1: [f32; 3],
    pub color2: [f32; 3],
}

impl Default for BubbleMaterial {
    fn default() -> Self {
        Self {
            color1: BUBBLE_COLOR_1,
            color2: BUBBLE_COLOR_2,
        }
    }
}

impl BubbleMaterial {
    pub fn blend_mode(&self) -> BlendMode {
        BlendMode::Opaque
    }

    /// Standard back-face culling.
    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        Some(wgpu::Face::Back)
    }
}

/// Rim-light material on the glow mesh.
///
/// No externally-set uniforms; the opacity is derived by the render loop each
/// frame and always lies in [0.3, 1.2].
#[derive(Clone, Copy, Debug)]
pub struct GlowMaterial {
    pub opacity: f32,
}

impl Default for GlowMaterial {
    fn default() -> Self {
        // Value the opacity oscillation takes at phase 0.
        Self { opacity: 0.7 }
    }
}

impl GlowMaterial {
    pub fn blend_mode(&self) -> BlendMode {
        BlendMode::Additive
    }

    /// Back faces only: cull front faces so the rim reads as a halo behind
    /// the bubble.
    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        Some(wgpu::Face::Front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_blend_accumulates_color() {
        let state = BlendMode::Additive.to_blend_state();
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.color.operation, wgpu::BlendOperation::Add);
    }

    #[test]
    fn test_opaque_replaces() {
        assert_eq!(BlendMode::Opaque.to_blend_state(), wgpu::BlendState::REPLACE);
    }

    #[test]
    fn test_bubble_material_defaults() {
        let material = BubbleMaterial::default();
        assert_eq!(material.color1, BUBBLE_COLOR_1);
        assert_eq!(material.color2, BUBBLE_COLOR_2);
        assert_eq!(material.blend_mode(), BlendMode::Opaque);
    }

    #[test]
    fn test_glow_material_is_back_face_additive() {
        let material = GlowMaterial::default();
        assert_eq!(material.blend_mode(), BlendMode::Additive);
        assert_eq!(material.cull_mode(), Some(wgpu::Face::Front));
        assert!(material.opacity >= 0.3 && material.opacity <= 1.2);
    }
}
