//! Light rig for the bubble scene.
//!
//! Two white directional lights (one high above and slightly in front, one
//! below and behind) plus a cool grey ambient term. The rig is fixed at scene
//! build time and packed into a single uniform block for upload.
//!
//! Both scene materials are raw shader materials that never sample the
//! lights; the rig is still part of the scene contract and its block is
//! bound alongside the per-mesh uniforms.

use bytemuck::{Pod, Zeroable};

/// Ambient light color (#798296).
pub const AMBIENT_COLOR: [f32; 3] = [0.4745098, 0.50980395, 0.5882353];

/// A directional light defined by a world position shining at the origin.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    /// Light position in world space; the emit direction is position -> origin.
    pub position: glam::Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Light color (RGB, 0-1 range).
    pub color: [f32; 3],
}

impl DirectionalLight {
    /// Normalized direction from the origin toward the light.
    pub fn direction(&self) -> glam::Vec3 {
        self.position.normalize_or_zero()
    }
}

/// The fixed three-light rig built by the scene initializer.
#[derive(Clone, Copy, Debug)]
pub struct LightRig {
    /// High-above key light.
    pub top: DirectionalLight,
    /// Below-and-behind fill light.
    pub bottom: DirectionalLight,
    /// Ambient term color.
    pub ambient_color: [f32; 3],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            top: DirectionalLight {
                position: glam::Vec3::new(0.0, 500.0, 200.0),
                intensity: 0.7,
                color: [1.0, 1.0, 1.0],
            },
            bottom: DirectionalLight {
                position: glam::Vec3::new(0.0, -500.0, 400.0),
                intensity: 0.25,
                color: [1.0, 1.0, 1.0],
            },
            ambient_color: AMBIENT_COLOR,
        }
    }
}

impl LightRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack the rig into a GPU-ready uniform block.
    pub fn to_uniforms(&self) -> LightingUniforms {
        let top_dir = self.top.direction();
        let bottom_dir = self.bottom.direction();
        LightingUniforms {
            top_direction: [top_dir.x, top_dir.y, top_dir.z, self.top.intensity],
            bottom_direction: [
                bottom_dir.x,
                bottom_dir.y,
                bottom_dir.z,
                self.bottom.intensity,
            ],
            top_color: [self.top.color[0], self.top.color[1], self.top.color[2], 1.0],
            bottom_color: [
                self.bottom.color[0],
                self.bottom.color[1],
                self.bottom.color[2],
                1.0,
            ],
            ambient_color: [
                self.ambient_color[0],
                self.ambient_color[1],
                self.ambient_color[2],
                1.0,
            ],
        }
    }
}

/// GPU-ready lighting uniforms.
///
/// Directions are normalized (origin toward light) with the intensity packed
/// into w. Total size: 80 bytes, 16-byte aligned.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightingUniforms {
    /// Key light direction (xyz), intensity in w.
    pub top_direction: [f32; 4],
    /// Fill light direction (xyz), intensity in w.
    pub bottom_direction: [f32; 4],
    /// Key light color (rgb), a = 1.
    pub top_color: [f32; 4],
    /// Fill light color (rgb), a = 1.
    pub bottom_color: [f32; 4],
    /// Ambient color (rgb), a = 1.
    pub ambient_color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rig() {
        let rig = LightRig::new();
        assert_eq!(rig.top.intensity, 0.7);
        assert_eq!(rig.bottom.intensity, 0.25);
        assert_eq!(rig.top.position.y, 500.0);
        assert_eq!(rig.bottom.position.z, 400.0);
    }

    #[test]
    fn test_directions_normalized() {
        let uniforms = LightRig::new().to_uniforms();
        for dir in [uniforms.top_direction, uniforms.bottom_direction] {
            let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_intensity_packed_in_w() {
        let uniforms = LightRig::new().to_uniforms();
        assert_eq!(uniforms.top_direction[3], 0.7);
        assert_eq!(uniforms.bottom_direction[3], 0.25);
    }

    #[test]
    fn test_uniforms_size() {
        // Ensure proper alignment for GPU
        assert_eq!(std::mem::size_of::<LightingUniforms>(), 80);
    }
}
