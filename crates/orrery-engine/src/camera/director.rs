//! Camera intent and the blended glide between poses.
//!
//! Mode 0 is the free overview; mode `n` locks onto the `n`-th selectable
//! body. Every mode switch starts a transition that blends from the pose
//! the camera had when the switch happened toward a target pose recomputed
//! every tick, because the target body keeps moving. The transition ends
//! after a fixed number of ticks, or earlier once the camera is close
//! enough to the target pose.

use glam::Vec3;
use serde::Deserialize;
use crate::api::types::BodyId;
use crate::camera::controls::{FreeControls, OrbitControls};
use crate::camera::pose::CameraPose;
use crate::extensions::easing::{approach, Easing};

/// Where a lockable body is right now, and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub position: Vec3,
    pub radius: f32,
}

/// Read access to body positions for the camera.
pub trait TargetSource {
    fn target_view(&self, id: BodyId) -> Option<TargetView>;
}

/// Camera tuning loaded from configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ticks a transition takes when the camera never gets close early.
    pub transition_ticks: u32,
    /// Blend factor right after a switch. Kept above 0 so the first
    /// interpolated step is never a zero-length move.
    pub alpha_floor: f32,
    /// A transition ends early once the camera is this close to its goal.
    pub arrival_threshold: f32,
    /// Follow distance is `radius * offset_multiplier + offset_constant`.
    pub offset_multiplier: f32,
    pub offset_constant: f32,
    /// Direction from a locked body toward the camera.
    pub follow_direction: [f32; 3],
    /// While approaching a body, the camera stays at least
    /// `radius * height_floor` above its center.
    pub height_floor: f32,
    /// Extra distance pushed toward the goal each transition tick.
    pub nudge_distance: f32,
    /// Overview camera never strays farther than this from the origin.
    pub max_overview_distance: f32,
    /// Per-tick step of the easing damper.
    pub easing_step: f32,
    /// Body time factor when the damper is fully engaged. Above 0 so the
    /// clock never stops mid-glide.
    pub min_time_scale: f32,
    /// Curve applied to the blend factor.
    pub blend: Easing,
    /// Pose the overview transition returns to.
    pub home_position: [f32; 3],
    pub home_look_at: [f32; 3],
    /// Damping of the free orbit controls.
    pub orbit_damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            transition_ticks: 120,
            alpha_floor: 0.01,
            arrival_threshold: 1.0,
            offset_multiplier: 4.75,
            offset_constant: 20.0,
            follow_direction: [0.0, 0.35, 1.0],
            height_floor: 0.5,
            nudge_distance: 2.0,
            max_overview_distance: 3000.0,
            easing_step: 0.01,
            min_time_scale: 0.1,
            blend: Easing::Linear,
            home_position: [500.0, 500.0, 0.0],
            home_look_at: [0.0, 0.0, 0.0],
            orbit_damping: 0.8,
        }
    }
}

impl CameraConfig {
    pub fn home_pose(&self) -> CameraPose {
        CameraPose::new(
            Vec3::from_array(self.home_position),
            Vec3::from_array(self.home_look_at),
        )
    }

    /// Pose that frames a body: offset along `follow_direction`, scaled by
    /// the body's size so small and large bodies fill the view alike.
    pub fn follow_pose(&self, view: TargetView) -> CameraPose {
        let direction = Vec3::from_array(self.follow_direction).normalize_or(Vec3::Z);
        let distance = view.radius * self.offset_multiplier + self.offset_constant;
        CameraPose::new(view.position + direction * distance, view.position)
    }
}

/// What the camera is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// Free orbit around the system.
    Overview,
    /// Gliding toward a body, or back to the overview when `target` is None.
    Transitioning { target: Option<BodyId> },
    /// Rigidly following a body.
    Locked { target: BodyId },
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    /// Pose at the start; captured on the first tick after the switch.
    start: Option<CameraPose>,
    alpha: f32,
    ticks: u32,
}

/// Camera state machine. One instance per view, advanced once per tick
/// after the bodies have moved.
pub struct CameraDirector<C: FreeControls = OrbitControls> {
    config: CameraConfig,
    /// Lockable bodies; mode `n` targets `targets[n - 1]`.
    targets: Vec<BodyId>,
    mode: usize,
    state: CameraState,
    transition: Transition,
    easing: f32,
    paused: bool,
    settled: bool,
    controls: C,
}

impl CameraDirector<OrbitControls> {
    pub fn new(config: CameraConfig, targets: Vec<BodyId>) -> Self {
        let controls = OrbitControls::new(config.orbit_damping);
        Self::with_controls(config, targets, controls)
    }
}

impl<C: FreeControls> CameraDirector<C> {
    pub fn with_controls(config: CameraConfig, targets: Vec<BodyId>, controls: C) -> Self {
        let alpha_floor = config.alpha_floor;
        Self {
            config,
            targets,
            mode: 0,
            state: CameraState::Overview,
            transition: Transition {
                start: None,
                alpha: alpha_floor,
                ticks: 0,
            },
            easing: 0.0,
            paused: false,
            settled: false,
            controls,
        }
    }

    /// Number of modes, overview included.
    pub fn mode_count(&self) -> usize {
        self.targets.len() + 1
    }

    pub fn mode(&self) -> usize {
        self.mode
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// The body the camera is heading to or following.
    pub fn target(&self) -> Option<BodyId> {
        match self.state {
            CameraState::Overview => None,
            CameraState::Transitioning { target } => target,
            CameraState::Locked { target } => Some(target),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, CameraState::Transitioning { .. })
    }

    /// Blend factor of the current (or last) transition.
    pub fn blend_factor(&self) -> f32 {
        self.transition.alpha
    }

    /// Damper in [0, 1]: rises while transitioning, falls otherwise.
    pub fn easing(&self) -> f32 {
        self.easing
    }

    /// Multiplier the animation driver applies to body time: bodies slow
    /// down while the camera travels and recover once it settles.
    pub fn time_scale_factor(&self) -> f64 {
        let min = self.config.min_time_scale as f64;
        1.0 - self.easing as f64 * (1.0 - min)
    }

    /// True for the tick in which a transition resolved.
    pub fn just_settled(&self) -> bool {
        self.settled
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    /// Switch to mode `n`, clamped into the valid range.
    pub fn switch_mode(&mut self, n: usize) {
        let n = n.min(self.targets.len());
        if n != self.mode {
            log::debug!("camera mode {} -> {}", self.mode, n);
        }
        self.mode = n;
        let target = if n == 0 { None } else { Some(self.targets[n - 1]) };
        self.begin_transition(target);
    }

    /// Jump to an explicit index; negatives clamp to the overview.
    pub fn goto(&mut self, index: i64) {
        let clamped = index.clamp(0, self.targets.len() as i64);
        if clamped != index {
            log::warn!("camera mode {} out of range, using {}", index, clamped);
        }
        self.switch_mode(clamped as usize);
    }

    /// Next mode, wrapping past the last body back to the overview.
    pub fn next(&mut self) {
        self.switch_mode((self.mode + 1) % self.mode_count());
    }

    /// Previous mode, wrapping from the overview to the last body.
    pub fn prev(&mut self) {
        let count = self.mode_count();
        self.switch_mode((self.mode + count - 1) % count);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// While paused a locked camera holds still. Unpausing with a body
    /// targeted glides back onto it instead of snapping.
    pub fn set_paused(&mut self, paused: bool) {
        let resumed = self.paused && !paused;
        self.paused = paused;
        if resumed {
            if let CameraState::Locked { target } = self.state {
                self.begin_transition(Some(target));
            }
        }
    }

    fn begin_transition(&mut self, target: Option<BodyId>) {
        self.state = CameraState::Transitioning { target };
        self.transition = Transition {
            start: None,
            alpha: self.config.alpha_floor,
            ticks: 0,
        };
        self.easing = 0.0;
    }

    /// Compute the next camera pose. Call after the bodies were updated for
    /// this tick so positions are current.
    pub fn advance<S: TargetSource>(&mut self, current: CameraPose, bodies: &S) -> CameraPose {
        self.settled = false;
        let easing_goal = if self.is_transitioning() { 1.0 } else { 0.0 };
        self.easing = approach(self.easing, easing_goal, self.config.easing_step);

        match self.state {
            CameraState::Transitioning { target } => self.advance_transition(current, target, bodies),
            CameraState::Locked { target } => {
                if self.paused {
                    return current;
                }
                match bodies.target_view(target) {
                    Some(view) => self.config.follow_pose(view),
                    None => current,
                }
            }
            CameraState::Overview => {
                let pose = self.controls.update(current);
                self.clamp_overview(pose)
            }
        }
    }

    fn advance_transition<S: TargetSource>(
        &mut self,
        current: CameraPose,
        target: Option<BodyId>,
        bodies: &S,
    ) -> CameraPose {
        let view = target.and_then(|id| bodies.target_view(id));
        let goal = match view {
            Some(view) => self.config.follow_pose(view),
            None => self.config.home_pose(),
        };
        let start = *self.transition.start.get_or_insert(current);

        let duration = self.config.transition_ticks.max(1);
        self.transition.ticks += 1;
        let progress = self.transition.ticks as f32 / duration as f32;
        let floor = self.config.alpha_floor;
        self.transition.alpha = (floor + (1.0 - floor) * progress).min(1.0);

        let mut pose = start.lerp(&goal, self.config.blend.apply(self.transition.alpha));

        // A moving goal outruns plain interpolation; push a little further.
        let direction = (goal.position - start.position).normalize_or_zero();
        let remaining = pose.position.distance(goal.position);
        pose.position += direction * self.config.nudge_distance.min(remaining);

        if let Some(view) = view {
            let floor_y = view.position.y + view.radius * self.config.height_floor;
            pose.position.y = pose.position.y.max(floor_y);
        }

        let arrived = pose.position.distance(goal.position) < self.config.arrival_threshold;
        if arrived || self.transition.ticks >= duration {
            self.finish_transition(target);
        }
        pose
    }

    fn finish_transition(&mut self, target: Option<BodyId>) {
        self.state = match target {
            Some(target) => CameraState::Locked { target },
            None => CameraState::Overview,
        };
        self.settled = true;
        log::debug!("camera settled in mode {}", self.mode);
    }

    fn clamp_overview(&self, mut pose: CameraPose) -> CameraPose {
        let max = self.config.max_overview_distance;
        if pose.position.length() > max {
            pose.position = pose.position.normalize_or_zero() * max;
        }
        pose
    }
}
