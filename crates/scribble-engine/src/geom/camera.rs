use glam::{Mat4, Quat, Vec2, Vec3};

use crate::coords::Viewport;

/// Right-handed perspective camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 60f32.to_radians(),
            near: 0.01,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Unit vector the camera looks along. Falls back to -Z for a degenerate setup.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// World-space point under `cursor` (logical px, top-left origin) at `distance`
    /// along the view axis.
    ///
    /// The drawing plane is perpendicular to [`forward`](Self::forward), so strokes
    /// drawn without moving the camera lie in one plane.
    pub fn unproject(&self, cursor: Vec2, viewport: Viewport, distance: f32) -> Vec3 {
        let width = viewport.width.max(1.0);
        let height = viewport.height.max(1.0);

        let ndc = Vec2::new(
            (cursor.x / width) * 2.0 - 1.0,
            1.0 - (cursor.y / height) * 2.0,
        );

        let inv = self.view_proj(width / height).inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));

        let forward = self.forward();
        let ray = (far - near).try_normalize().unwrap_or(forward);

        // Scale the ray so its projection on the view axis equals `distance`.
        let along = ray.dot(forward);
        if along.abs() <= f32::EPSILON {
            return self.eye + forward * distance;
        }
        self.eye + ray * (distance / along)
    }

    /// Rotates the eye around the target: `yaw` about the up axis, then `pitch`
    /// about the camera's right axis. Pitch stops short of the poles.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        const MAX_PITCH: f32 = 85.0 * (std::f32::consts::PI / 180.0);

        let up = self.up.try_normalize().unwrap_or(Vec3::Y);
        let offset = self.eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let current = (offset.dot(up) / radius).clamp(-1.0, 1.0).asin();
        let pitch = (current + pitch).clamp(-MAX_PITCH, MAX_PITCH) - current;

        let offset = Quat::from_axis_angle(up, yaw) * offset;
        let right = offset.cross(up).try_normalize().unwrap_or(Vec3::X);
        let offset = Quat::from_axis_angle(right, pitch) * offset;

        self.eye = self.target + offset;
    }
}
