//! Scene assembly for the bubble subsystem.
//!
//! The scene is fixed at mount: one camera, the three-light rig, and the two
//! disc meshes (bubble + glow) with their shader materials. The render loop
//! only ever rewrites the mesh scales and the glow opacity; everything else
//! is set once here.

use std::f32::consts::FRAC_PI_2;

use crate::animation::FramePose;
use crate::camera::Camera;
use crate::lighting::LightRig;
use crate::material::{BubbleMaterial, GlowMaterial};

/// Disc radius of the bubble mesh.
pub const BUBBLE_RADIUS: f32 = 20.0;
/// Disc radius of the glow mesh.
pub const GLOW_RADIUS: f32 = 22.0;
/// Angular segment count of both discs.
pub const DISC_SEGMENTS: u32 = 128;
/// Start angle of the disc sweep, radians.
pub const DISC_THETA_START: f32 = 6.0;
/// Angular length of the disc sweep, radians. Slightly more than a full
/// turn; the last segment overlaps the first.
pub const DISC_THETA_LENGTH: f32 = 6.3;
/// Vertical offset of both meshes from the origin.
pub const MESH_Y_OFFSET: f32 = -2.0;
/// Base scale of the glow mesh relative to the bubble.
pub const GLOW_BASE_SCALE: f32 = 1.3;

/// Transform component for a scene mesh.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub position: glam::Vec3,
    /// Euler angles in radians, applied XYZ.
    pub rotation: glam::Vec3,
    pub scale: glam::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: glam::Vec3::ZERO,
            rotation: glam::Vec3::ZERO,
            scale: glam::Vec3::splat(1.0),
        }
    }
}

impl Transform {
    /// Model matrix: translation * rotation (Euler XYZ) * scale.
    pub fn model_matrix(&self) -> glam::Mat4 {
        let translation = glam::Mat4::from_translation(self.position);
        let rotation = glam::Mat4::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        let scale = glam::Mat4::from_scale(self.scale);
        translation * rotation * scale
    }
}

/// One of the two fixed mesh instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshInstance {
    pub transform: Transform,
}

/// The complete scene: camera, lights, and the two meshes with materials.
///
/// Exists exactly while the subsystem is mounted; dropping the mounted
/// context drops the scene with it.
#[derive(Clone, Copy, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub lights: LightRig,
    pub bubble: MeshInstance,
    pub bubble_material: BubbleMaterial,
    pub glow: MeshInstance,
    pub glow_material: GlowMaterial,
}

impl Scene {
    /// Build the one-time scene for a surface of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        let bubble = MeshInstance {
            transform: Transform {
                position: glam::Vec3::new(0.0, MESH_Y_OFFSET, 0.0),
                // The bubble disc is tipped flat; the glow stays camera-facing.
                rotation: glam::Vec3::new(-FRAC_PI_2, 0.0, 0.0),
                scale: glam::Vec3::splat(1.0),
            },
        };
        let glow = MeshInstance {
            transform: Transform {
                position: glam::Vec3::new(0.0, MESH_Y_OFFSET, 0.0),
                rotation: glam::Vec3::ZERO,
                scale: glam::Vec3::splat(GLOW_BASE_SCALE),
            },
        };

        Self {
            camera: Camera::new(width, height),
            lights: LightRig::new(),
            bubble,
            bubble_material: BubbleMaterial::default(),
            glow,
            glow_material: GlowMaterial::default(),
        }
    }

    /// Write a tick's pose into the transforms and the glow material.
    pub fn apply(&mut self, pose: &FramePose) {
        self.bubble.transform.scale = glam::Vec3::splat(pose.bubble_scale);
        self.glow.transform.scale = glam::Vec3::splat(pose.glow_scale);
        self.glow_material.opacity = pose.glow_opacity;
    }

    /// Forward a viewport resize to the camera (zero sizes are ignored there).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;

    #[test]
    fn test_initial_transforms() {
        let scene = Scene::new(800, 600);
        assert_eq!(scene.bubble.transform.position.y, MESH_Y_OFFSET);
        assert_eq!(scene.glow.transform.position.y, MESH_Y_OFFSET);
        assert_eq!(scene.bubble.transform.rotation.x, -FRAC_PI_2);
        assert_eq!(scene.glow.transform.rotation, glam::Vec3::ZERO);
        assert_eq!(scene.glow.transform.scale, glam::Vec3::splat(GLOW_BASE_SCALE));
    }

    #[test]
    fn test_apply_keeps_glow_ratio() {
        let mut scene = Scene::new(800, 600);
        let mut animation = AnimationState::new();
        animation.params.set_spikes(6.0);
        animation.params.set_processing(3.0);
        for step in 0..100 {
            let pose = animation.tick(step as f64 * 16.7);
            scene.apply(&pose);
            assert_eq!(
                scene.glow.transform.scale.x,
                scene.bubble.transform.scale.x * crate::animation::GLOW_SCALE_RATIO
            );
            assert!(scene.glow_material.opacity >= 0.3 && scene.glow_material.opacity <= 1.2);
        }
    }

    #[test]
    fn test_apply_sets_uniform_scale() {
        let mut scene = Scene::new(800, 600);
        let pose = AnimationState::new().tick(1234.0);
        scene.apply(&pose);
        let s = scene.bubble.transform.scale;
        assert_eq!(s.x, s.y);
        assert_eq!(s.y, s.z);
    }

    #[test]
    fn test_model_matrix_scales_points() {
        let transform = Transform {
            scale: glam::Vec3::splat(2.0),
            ..Transform::default()
        };
        let p = transform.model_matrix().transform_point3(glam::Vec3::X);
        assert!((p.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_scene_resize_updates_camera() {
        let mut scene = Scene::new(800, 600);
        scene.resize(400, 300);
        assert_eq!(scene.camera.aspect(), 4.0 / 3.0);
        scene.resize(0, 0);
        assert_eq!(scene.camera.aspect(), 4.0 / 3.0);
    }
}
