//! Perspective camera for the bubble scene.
//!
//! Fixed rig: the camera sits a short way down the +Z axis looking at the
//! scene origin. Only the aspect ratio ever changes, driven by viewport
//! resize notifications; field of view and clip planes are constants of the
//! scene design.

/// Camera field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
/// Near clip plane distance.
pub const CAMERA_NEAR: f32 = 0.1;
/// Far clip plane distance.
pub const CAMERA_FAR: f32 = 1000.0;
/// Camera offset from the scene origin along the view axis.
pub const CAMERA_Z: f32 = 5.0;

/// Perspective camera with a fixed position and a resize-driven aspect.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Camera position in world space.
    pub position: glam::Vec3,
    /// Field of view in degrees.
    pub fov: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    aspect: f32,
}

impl Camera {
    /// Create the scene camera for a surface of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: glam::Vec3::new(0.0, 0.0, CAMERA_Z),
            fov: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            aspect: 1.0,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Current aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Update the aspect from a resize notification.
    ///
    /// Zero-sized notifications are ignored and the prior aspect is retained
    /// (a minimized window reports 0x0; projecting through it would produce a
    /// degenerate matrix).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Compute the view matrix (look-at from position toward the origin).
    pub fn view_matrix(&self) -> glam::Mat4 {
        glam::Mat4::look_at_rh(self.position, glam::Vec3::ZERO, glam::Vec3::Y)
    }

    /// Compute the projection matrix at the current aspect.
    pub fn projection_matrix(&self) -> glam::Mat4 {
        glam::Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> glam::Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_aspect() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.aspect(), 800.0 / 600.0);
        assert_eq!(camera.fov, 45.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_resize_updates_aspect_exactly() {
        let mut camera = Camera::new(800, 600);
        camera.set_viewport(1024, 512);
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn test_halved_viewport_keeps_ratio() {
        let mut camera = Camera::new(800, 600);
        let before = camera.aspect();
        camera.set_viewport(400, 300);
        assert_eq!(camera.aspect(), before);
    }

    #[test]
    fn test_zero_size_notification_ignored() {
        let mut camera = Camera::new(800, 600);
        let before = camera.aspect();
        camera.set_viewport(0, 0);
        camera.set_viewport(0, 600);
        camera.set_viewport(800, 0);
        assert_eq!(camera.aspect(), before);
    }

    #[test]
    fn test_origin_in_front_of_camera() {
        let camera = Camera::new(640, 480);
        let view = camera.view_matrix();
        let origin_in_view = view.transform_point3(glam::Vec3::ZERO);
        // Negative Z is "in front" in view space.
        assert!(origin_in_view.z < 0.0);
    }

    #[test]
    fn test_projection_uses_aspect() {
        let mut camera = Camera::new(100, 100);
        let square = camera.projection_matrix();
        camera.set_viewport(200, 100);
        let wide = camera.projection_matrix();
        // Widening the viewport shrinks the x scale term.
        assert!(wide.col(0).x < square.col(0).x);
    }
}
