use crate::action::{Control, KeyState};
use glam::{Vec2, Vec3};
use voxelview_common::{CellCoord, ViewerConfig};
use voxelview_kernel::VoxelGrid;
use voxelview_render::Camera;

/// How far below the feet the ground probe samples.
const GROUND_PROBE_DEPTH: f32 = 0.1;
/// Gap left between the feet and a block top after snapping onto it.
const SNAP_CLEARANCE: f32 = 0.01;

/// Movement tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementParams {
    /// World units per second.
    pub move_speed: f32,
    /// Eye height above the feet.
    pub player_height: f32,
    /// Degrees per unit of look delta.
    pub mouse_sensitivity: f32,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for MovementParams {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            player_height: config.player_height,
            mouse_sensitivity: config.mouse_sensitivity,
        }
    }
}

/// What the frame's input asked of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub exit_requested: bool,
}

/// Applies held controls and mouse motion to the camera.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    params: MovementParams,
}

impl InputController {
    pub fn new(params: MovementParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MovementParams {
        &self.params
    }

    /// A camera above the centre column with its feet on the surface.
    pub fn spawn_camera(&self, grid: &VoxelGrid) -> Camera {
        let dims = grid.dims();
        let (x, z) = (dims.size_x / 2, dims.size_z / 2);
        let ground = grid.surface_height(x, z).unwrap_or(0);
        let position = Vec3::new(
            x as f32,
            ground as f32 + 0.5 + self.params.player_height,
            z as f32,
        );
        tracing::debug!("spawning camera at {position} (ground y={ground})");
        Camera::new(position)
    }

    /// Rotate the camera by a look delta from [`crate::MouseLook`].
    pub fn look(&self, camera: &mut Camera, delta: Vec2) {
        camera.apply_mouse_delta(delta.x, delta.y, self.params.mouse_sensitivity);
    }

    /// Advance the camera by one frame of held controls.
    pub fn update(
        &self,
        camera: &mut Camera,
        grid: &VoxelGrid,
        keys: &KeyState,
        dt: f32,
    ) -> FrameInput {
        let step = self.params.move_speed * dt;
        let forward = camera.forward();
        let right = camera.right();

        if keys.is_held(Control::Forward) {
            camera.position += forward * step;
        }
        if keys.is_held(Control::Back) {
            camera.position -= forward * step;
        }
        if keys.is_held(Control::StrafeLeft) {
            camera.position -= right * step;
        }
        if keys.is_held(Control::StrafeRight) {
            camera.position += right * step;
        }

        let feet = camera.position - Vec3::Y * self.params.player_height;
        camera.grounded = grid.is_solid_at(CellCoord::containing(feet - Vec3::Y * GROUND_PROBE_DEPTH));

        if keys.is_held(Control::Ascend) {
            camera.position.y += step;
            camera.grounded = false;
        }

        if keys.is_held(Control::Descend) {
            let below = CellCoord::containing(feet - Vec3::Y * step);
            if grid.is_solid_at(below) {
                camera.position.y = (below.y + 1) as f32 + self.params.player_height + SNAP_CLEARANCE;
                camera.grounded = true;
            } else {
                camera.position.y -= step;
                camera.grounded = false;
            }
        }

        FrameInput {
            exit_requested: keys.is_held(Control::Exit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelview_common::GridDims;

    const EPS: f32 = 1e-4;
    const DT: f32 = 0.1;

    fn setup() -> (InputController, VoxelGrid) {
        (
            InputController::default(),
            VoxelGrid::generate(GridDims::new(16, 8, 16)),
        )
    }

    fn held(controls: &[Control]) -> KeyState {
        let mut keys = KeyState::new();
        for &c in controls {
            keys.press(c);
        }
        keys
    }

    #[test]
    fn spawn_places_feet_above_surface() {
        let (ctl, grid) = setup();
        let cam = ctl.spawn_camera(&grid);
        assert!(cam.position.abs_diff_eq(Vec3::new(8.0, 4.0 + 0.5 + 1.8, 8.0), EPS));
    }

    #[test]
    fn descend_onto_floor_snaps_to_block_top() {
        let (ctl, grid) = setup();
        // Grass at y=4, so its top is y=5. Feet start just above it.
        let mut cam = Camera::new(Vec3::new(8.5, 5.05 + 1.8, 8.5));
        ctl.update(&mut cam, &grid, &held(&[Control::Descend]), DT);
        assert!((cam.position.y - (5.0 + 1.8 + 0.01)).abs() < EPS);
        assert!(cam.grounded);
    }

    #[test]
    fn descend_over_void_drops_by_step() {
        let (ctl, grid) = setup();
        let mut cam = Camera::new(Vec3::new(-5.0, 10.0, -5.0));
        cam.grounded = true;
        ctl.update(&mut cam, &grid, &held(&[Control::Descend]), DT);
        assert!((cam.position.y - (10.0 - 4.0 * DT)).abs() < EPS);
        assert!(!cam.grounded);
    }

    #[test]
    fn descend_through_air_above_ground_drops_by_step() {
        let (ctl, grid) = setup();
        let mut cam = Camera::new(Vec3::new(8.5, 7.0 + 1.8, 8.5));
        ctl.update(&mut cam, &grid, &held(&[Control::Descend]), DT);
        assert!((cam.position.y - (8.8 - 0.4)).abs() < EPS);
        assert!(!cam.grounded);
    }

    #[test]
    fn ascend_always_ungrounds() {
        let (ctl, grid) = setup();
        let start_y = 5.01 + 1.8;
        let mut cam = Camera::new(Vec3::new(8.5, start_y, 8.5));
        ctl.update(&mut cam, &grid, &held(&[Control::Ascend]), DT);
        assert!((cam.position.y - (start_y + 0.4)).abs() < EPS);
        assert!(!cam.grounded);
    }

    #[test]
    fn ascend_and_descend_cancel_over_air() {
        let (ctl, grid) = setup();
        let mut cam = Camera::new(Vec3::new(8.5, 8.8, 8.5));
        ctl.update(
            &mut cam,
            &grid,
            &held(&[Control::Ascend, Control::Descend]),
            DT,
        );
        assert!((cam.position.y - 8.8).abs() < EPS);
        assert!(!cam.grounded);
    }

    #[test]
    fn descend_probes_from_feet_before_ascend() {
        let (ctl, grid) = setup();
        // Feet at 5.2: after ascending they would be at 5.6, whose probe
        // (5.2) misses the grass. The pre-ascend probe (4.8) hits it.
        let mut cam = Camera::new(Vec3::new(8.5, 5.2 + 1.8, 8.5));
        ctl.update(
            &mut cam,
            &grid,
            &held(&[Control::Ascend, Control::Descend]),
            DT,
        );
        assert!((cam.position.y - (5.0 + 1.8 + 0.01)).abs() < EPS);
        assert!(cam.grounded);
    }

    #[test]
    fn ground_probe_runs_without_input() {
        let (ctl, grid) = setup();
        let mut cam = Camera::new(Vec3::new(8.5, 5.01 + 1.8, 8.5));
        ctl.update(&mut cam, &grid, &KeyState::new(), DT);
        assert!(cam.grounded);

        let mut floating = Camera::new(Vec3::new(8.5, 7.0 + 1.8, 8.5));
        floating.grounded = true;
        ctl.update(&mut floating, &grid, &KeyState::new(), DT);
        assert!(!floating.grounded);
    }

    #[test]
    fn forward_follows_look_direction() {
        let (ctl, grid) = setup();
        let mut cam = Camera::new(Vec3::new(8.0, 7.0, 8.0));
        ctl.update(&mut cam, &grid, &held(&[Control::Forward]), DT);
        assert!(cam.position.abs_diff_eq(Vec3::new(8.0, 7.0, 8.0 - 0.4), EPS));
        ctl.update(&mut cam, &grid, &held(&[Control::Back]), DT);
        assert!(cam.position.abs_diff_eq(Vec3::new(8.0, 7.0, 8.0), EPS));
    }

    #[test]
    fn diagonal_movement_is_not_normalized() {
        let (ctl, grid) = setup();
        let start = Vec3::new(8.0, 7.0, 8.0);
        let mut cam = Camera::new(start);
        ctl.update(
            &mut cam,
            &grid,
            &held(&[Control::Forward, Control::StrafeRight]),
            DT,
        );
        let moved = (cam.position - start).length();
        assert!((moved - 0.4 * 2f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn horizontal_movement_ignores_blocks() {
        let (ctl, grid) = setup();
        // Eye inside the stone layer still moves freely.
        let mut cam = Camera::new(Vec3::new(8.0, 1.5, 8.0));
        ctl.update(&mut cam, &grid, &held(&[Control::StrafeLeft]), 0.05);
        assert!(cam.position.abs_diff_eq(Vec3::new(8.0 - 0.2, 1.5, 8.0), EPS));
    }

    #[test]
    fn exit_is_reported() {
        let (ctl, grid) = setup();
        let mut cam = ctl.spawn_camera(&grid);
        assert!(!ctl.update(&mut cam, &grid, &KeyState::new(), DT).exit_requested);
        assert!(ctl.update(&mut cam, &grid, &held(&[Control::Exit]), DT).exit_requested);
    }

    #[test]
    fn look_uses_sensitivity() {
        let ctl = InputController::default();
        let mut cam = Camera::default();
        ctl.look(&mut cam, Vec2::new(10.0, -20.0));
        assert!((cam.yaw() - (-90.0 + 1.0)).abs() < EPS);
        assert!((cam.pitch() - -2.0).abs() < EPS);
    }
}
