//! Animation record for one body: spin, revolution and a fixed axis tilt.
//!
//! Parameters live in [`BodyDesc`], validated once when the body joins a
//! [`BodySystem`](crate::core::system::BodySystem) and never partially
//! mutated afterwards. Only the derived state (spin angle, orientation,
//! orbit offset) changes per tick.

use std::f64::consts::TAU;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use crate::api::error::{finite, non_negative, unit_axis, ConfigurationError};
use crate::api::types::{BodyId, BodyKind};

/// How spin orientation is derived from the virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPolicy {
    /// Keep a wrapped angle and add `speed * Δelapsed` each update.
    /// Large clock values never reach the trig functions.
    #[default]
    Incremental,
    /// Recompute the angle as `speed * elapsed` every update.
    Absolute,
}

/// Rotation of a body about its own (tilted) axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Radians per unit of virtual time, signed.
    pub speed: f64,
    /// Unit axis in the body's local (post-tilt) frame.
    pub axis: Vec3,
}

impl Default for Spin {
    fn default() -> Self {
        Self { speed: 0.0, axis: Vec3::Y }
    }
}

/// Circular motion of a body's group around its parent's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Revolution {
    /// Radians per unit of virtual time, signed. 0 = stationary.
    pub speed: f64,
    /// Distance from the parent origin.
    pub radius: f64,
    /// Unit normal of the orbit plane.
    pub axis: Vec3,
}

impl Default for Revolution {
    fn default() -> Self {
        Self { speed: 0.0, radius: 0.0, axis: Vec3::Y }
    }
}

impl Revolution {
    /// Offset at rest, before any motion: `(radius, 0, 0)`.
    pub fn rest_offset(&self) -> Vec3 {
        Vec3::new(self.radius as f32, 0.0, 0.0)
    }

    /// Offset from the parent at virtual time `elapsed`: the rest offset
    /// rotated about `axis` by `speed * time_scale * elapsed`.
    pub fn offset_at(&self, elapsed: f64, time_scale: f64) -> Vec3 {
        let angle = (self.speed * time_scale * elapsed).rem_euclid(TAU);
        Quat::from_axis_angle(self.axis, angle as f32) * self.rest_offset()
    }
}

/// Obliquity, applied once when the body is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTilt {
    pub axis: Vec3,
    /// Radians.
    pub angle: f64,
}

impl Default for AxisTilt {
    fn default() -> Self {
        Self { axis: Vec3::Z, angle: 0.0 }
    }
}

impl AxisTilt {
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(self.axis, self.angle as f32)
    }
}

/// Construction parameters for a body. Everything defaults to motionless.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub name: String,
    pub kind: BodyKind,
    pub spin: Spin,
    pub revolution: Revolution,
    pub tilt: AxisTilt,
}

impl BodyDesc {
    pub fn new(name: impl Into<String>, kind: BodyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            spin: Spin::default(),
            revolution: Revolution::default(),
            tilt: AxisTilt::default(),
        }
    }

    pub fn with_spin(mut self, speed: f64, axis: Vec3) -> Self {
        self.spin = Spin { speed, axis };
        self
    }

    pub fn with_revolution(mut self, speed: f64, radius: f64, axis: Vec3) -> Self {
        self.revolution = Revolution { speed, radius, axis };
        self
    }

    pub fn with_axis_tilt(mut self, axis: Vec3, angle: f64) -> Self {
        self.tilt = AxisTilt { axis, angle };
        self
    }

    /// Check every parameter and normalize the axes.
    pub fn validate(mut self) -> Result<Self, ConfigurationError> {
        self.spin.speed = finite("spin speed", self.spin.speed)?;
        self.spin.axis = unit_axis("spin", self.spin.axis)?;
        self.revolution.speed = finite("revolution speed", self.revolution.speed)?;
        self.revolution.radius = non_negative("orbit radius", self.revolution.radius)?;
        self.revolution.axis = unit_axis("orbit", self.revolution.axis)?;
        self.tilt.angle = finite("axis tilt", self.tilt.angle)?;
        self.tilt.axis = unit_axis("tilt", self.tilt.axis)?;
        Ok(self)
    }
}

/// A body in the hierarchy. Its group offset is written into the transform
/// graph by the owning system; the body itself keeps the spin state.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    id: BodyId,
    desc: BodyDesc,
    tilt: Quat,
    /// Wrapped to [0, TAU).
    spin_angle: f64,
    last_elapsed: f64,
    orientation: Quat,
    offset: Vec3,
}

impl CelestialBody {
    pub(crate) fn new(id: BodyId, desc: BodyDesc) -> Result<Self, ConfigurationError> {
        let desc = desc.validate()?;
        let tilt = desc.tilt.rotation();
        let offset = desc.revolution.rest_offset();
        Ok(Self {
            id,
            desc,
            tilt,
            spin_angle: 0.0,
            last_elapsed: 0.0,
            orientation: tilt,
            offset,
        })
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn kind(&self) -> BodyKind {
        self.desc.kind
    }

    pub fn desc(&self) -> &BodyDesc {
        &self.desc
    }

    /// Replace the spin and revolution parameters wholesale. The axis tilt
    /// stays as it was applied at construction.
    pub fn set_motion(&mut self, spin: Spin, revolution: Revolution) -> Result<(), ConfigurationError> {
        let desc = BodyDesc {
            spin,
            revolution,
            ..self.desc.clone()
        }
        .validate()?;
        self.desc = desc;
        if self.desc.revolution.speed == 0.0 {
            self.offset = self.desc.revolution.rest_offset();
        }
        Ok(())
    }

    /// Local orientation of the body's shape: tilt, then spin about the
    /// tilted axis. Satellites do not inherit it.
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Current offset of the body's group from its parent.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    /// Advance spin and revolution to virtual time `elapsed`.
    pub(crate) fn advance(&mut self, elapsed: f64, time_scale: f64, policy: SpinPolicy) {
        let spin = self.desc.spin;
        if spin.speed != 0.0 {
            let angle = match policy {
                SpinPolicy::Incremental => {
                    self.spin_angle + spin.speed * time_scale * (elapsed - self.last_elapsed)
                }
                SpinPolicy::Absolute => spin.speed * time_scale * elapsed,
            };
            self.spin_angle = angle.rem_euclid(TAU);
            self.orientation = self.tilt * Quat::from_axis_angle(spin.axis, self.spin_angle as f32);
        }
        self.last_elapsed = elapsed;

        let revolution = self.desc.revolution;
        if revolution.speed != 0.0 {
            self.offset = revolution.offset_at(elapsed, time_scale);
        }
    }
}
