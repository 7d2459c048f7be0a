use glam::Vec3;
use crate::camera::pose::CameraPose;

/// Free-camera input handler used while no body is targeted.
pub trait FreeControls {
    /// Produce the next pose from the current one.
    fn update(&mut self, pose: CameraPose) -> CameraPose;
}

/// Keep the pitch a hair short of the poles so yaw stays defined.
const MAX_PITCH: f32 = 1.55;
const MIN_RANGE: f32 = 1.0;

/// Damped orbit around the look-at point. Drag and zoom input accumulate
/// as pending deltas and are consumed a fraction per tick.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// 0.0 = apply input at once, 0.9 = very smooth/slow.
    damping: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    /// Pending zoom as a natural log of the range factor.
    pending_zoom: f32,
}

impl OrbitControls {
    pub fn new(damping: f32) -> Self {
        Self {
            damping: damping.clamp(0.0, 0.99),
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        }
    }

    /// Queue a rotation in radians.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        if yaw.is_finite() && pitch.is_finite() {
            self.pending_yaw += yaw;
            self.pending_pitch += pitch;
        }
    }

    /// Queue a dolly. Factors above 1 move away, below 1 move closer.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.pending_zoom += factor.ln();
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending_yaw == 0.0 && self.pending_pitch == 0.0 && self.pending_zoom == 0.0
    }

    fn take(pending: &mut f32, fraction: f32) -> f32 {
        let step = *pending * fraction;
        *pending -= step;
        if pending.abs() < 1e-6 {
            let rest = *pending;
            *pending = 0.0;
            return step + rest;
        }
        step
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl FreeControls for OrbitControls {
    fn update(&mut self, pose: CameraPose) -> CameraPose {
        let offset = pose.position - pose.look_at;
        let range = offset.length();
        if range < f32::EPSILON || self.is_idle() {
            return pose;
        }

        let fraction = 1.0 - self.damping;
        let yaw = offset.x.atan2(offset.z) + Self::take(&mut self.pending_yaw, fraction);
        let pitch = ((offset.y / range).clamp(-1.0, 1.0).asin()
            + Self::take(&mut self.pending_pitch, fraction))
        .clamp(-MAX_PITCH, MAX_PITCH);
        let range = (range * Self::take(&mut self.pending_zoom, fraction).exp()).max(MIN_RANGE);

        let direction = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
        CameraPose {
            position: pose.look_at + direction * range,
            look_at: pose.look_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_controls_leave_pose_alone() {
        let mut controls = OrbitControls::default();
        let pose = CameraPose::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        assert_eq!(controls.update(pose), pose);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut controls = OrbitControls::new(0.0);
        controls.rotate(std::f32::consts::FRAC_PI_2, 0.0);
        let pose = controls.update(CameraPose::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO));
        assert!((pose.position - Vec3::new(100.0, 0.0, 0.0)).length() < 1e-3, "{:?}", pose.position);
        assert!(controls.is_idle());
    }

    #[test]
    fn damped_rotation_converges() {
        let mut controls = OrbitControls::new(0.5);
        controls.rotate(1.0, 0.0);
        let mut pose = CameraPose::new(Vec3::new(0.0, 0.0, 50.0), Vec3::ZERO);
        pose = controls.update(pose);
        let first = pose.position;
        for _ in 0..60 {
            pose = controls.update(pose);
        }
        assert!((first - pose.position).length() > 1.0);
        assert!((pose.range() - 50.0).abs() < 1e-2);
    }

    #[test]
    fn zoom_scales_range_and_keeps_target() {
        let mut controls = OrbitControls::new(0.0);
        controls.zoom(2.0);
        let pose = controls.update(CameraPose::new(Vec3::new(0.0, 30.0, 40.0), Vec3::ZERO));
        assert!((pose.range() - 100.0).abs() < 1e-2);
        assert_eq!(pose.look_at, Vec3::ZERO);
    }

    #[test]
    fn pitch_is_clamped_short_of_pole() {
        let mut controls = OrbitControls::new(0.0);
        controls.rotate(0.0, 10.0);
        let pose = controls.update(CameraPose::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO));
        assert!(pose.position.y < 10.0);
        assert!(pose.position.y > 9.9);
    }

    #[test]
    fn bad_input_is_ignored() {
        let mut controls = OrbitControls::default();
        controls.zoom(0.0);
        controls.zoom(f32::NAN);
        controls.rotate(f32::INFINITY, 0.0);
        assert!(controls.is_idle());
    }
}
