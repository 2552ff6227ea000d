use glam::{Mat4, Vec3};

/// Pitch limit in degrees; keeps the look direction away from world-up.
const PITCH_LIMIT: f32 = 89.0;
const FOV_Y_DEGREES: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// First-person camera with yaw and pitch in degrees.
///
/// The look direction is computed from the angles on demand, so it cannot
/// drift away from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    /// Whether the feet currently rest on a solid cell.
    pub grounded: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// World-up; fixed.
    pub const UP: Vec3 = Vec3::Y;

    /// A camera at `position` looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            grounded: false,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit look direction derived from yaw and pitch.
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Unit strafe direction (look × up).
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Self::UP).normalize()
    }

    /// Rotate by a look delta. Positive `dy` tilts the view upwards.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch + dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Self::UP)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR)
    }

    /// Framebuffer aspect ratio; a zero height counts as one pixel.
    pub fn aspect_ratio(width: u32, height: u32) -> f32 {
        width as f32 / height.max(1) as f32
    }
}
