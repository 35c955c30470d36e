//! A free-fly camera for the viewer.

use glam::{Mat4, Vec3};

/// First person camera moving at a fixed speed per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub up: Vec3,
    pub front: Vec3,
    pub speed: f32,
    yaw: f32,
    pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 6.0), Vec3::Y, Vec3::NEG_Z, 0.05)
    }
}

impl Camera {
    pub fn new(position: Vec3, up: Vec3, front: Vec3, speed: f32) -> Self {
        let front = front.normalize();
        Self {
            position,
            up,
            front,
            speed,
            yaw: front.z.atan2(front.x).to_degrees(),
            pitch: front.y.asin().to_degrees(),
        }
    }

    /// View matrix looking along `front`.
    pub fn look_at(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    pub fn move_forward(&mut self) {
        self.position += self.front * self.speed;
    }

    pub fn move_backward(&mut self) {
        self.position -= self.front * self.speed;
    }

    pub fn move_left(&mut self) {
        self.position -= self.right() * self.speed;
    }

    pub fn move_right(&mut self) {
        self.position += self.right() * self.speed;
    }

    pub fn move_up(&mut self) {
        self.position += self.up * self.speed;
    }

    pub fn move_down(&mut self) {
        self.position -= self.up * self.speed;
    }

    /// Turns by `speed` radians about the up axis.
    pub fn rotate_left(&mut self) {
        self.set_yaw_pitch(self.yaw - self.speed.to_degrees(), self.pitch);
    }

    pub fn rotate_right(&mut self) {
        self.set_yaw_pitch(self.yaw + self.speed.to_degrees(), self.pitch);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Points the camera using angles in degrees. Pitch is clamped to avoid flipping over the
    /// up axis.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw.rem_euclid(360.0);
        self.pitch = pitch.clamp(-89.0, 89.0);
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert!((camera.yaw() - 270.0).abs() < 1e-3 || (camera.yaw() + 90.0).abs() < 1e-3);
        assert_eq!(camera.pitch(), 0.0);
        let view = camera.look_at();
        // the origin sits 6 units in front of the camera
        let p = view.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -6.0), 1e-5), "{p}");
    }

    #[test]
    fn test_movement() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::Y, Vec3::NEG_Z, 1.0);
        camera.move_forward();
        assert!(camera.position.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        camera.move_right();
        assert!(camera.position.abs_diff_eq(Vec3::new(1.0, 0.0, -1.0), 1e-6));
        camera.move_up();
        camera.move_left();
        camera.move_backward();
        camera.move_down();
        assert!(camera.position.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.set_yaw_pitch(0.0, 120.0);
        assert_eq!(camera.pitch(), 89.0);
        assert!(camera.front.y < 1.0);
        camera.set_yaw_pitch(-90.0, 0.0);
        assert!(camera.front.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_rotation_keeps_front_normalized() {
        let mut camera = Camera::default();
        for _ in 0..10 {
            camera.rotate_left();
        }
        assert!((camera.front.length() - 1.0).abs() < 1e-5);
        assert!(camera.front.x < 0.0);
    }
}
