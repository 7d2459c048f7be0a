use std::f64::consts::TAU;
use glam::{Quat, Vec3};
use serde::Deserialize;
use crate::api::error::ConfigurationError;

/// Maps physical catalog values into render units and angular speeds.
///
/// Real proportions would put Neptune thousands of Sun radii away and make
/// Mercury invisible, so both radius and distance are compressed. Every map
/// is monotonic: a larger input never yields a smaller output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnitScale {
    /// `r = radius_scale * km^radius_exponent`.
    pub radius_scale: f64,
    pub radius_exponent: f64,
    /// Clearance from the origin before the first planetary orbit.
    pub distance_offset: f64,
    /// `d = distance_offset + distance_scale * sqrt(au)`.
    pub distance_scale: f64,
    /// Render units per AU beyond the parent's surface, for satellites.
    pub satellite_distance_scale: f64,
    /// Days of simulated time per unit of virtual time.
    pub days_per_unit: f64,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self {
            radius_scale: 0.12,
            radius_exponent: 0.5,
            distance_offset: 150.0,
            distance_scale: 250.0,
            satellite_distance_scale: 8000.0,
            days_per_unit: 1.0,
        }
    }
}

impl UnitScale {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let positive = [
            ("units.radius_scale", self.radius_scale),
            ("units.radius_exponent", self.radius_exponent),
            ("units.distance_scale", self.distance_scale),
            ("units.satellite_distance_scale", self.satellite_distance_scale),
            ("units.days_per_unit", self.days_per_unit),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::InvalidConfig(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }
        if !(self.distance_offset.is_finite() && self.distance_offset >= 0.0) {
            return Err(ConfigurationError::InvalidConfig(format!(
                "units.distance_offset must be non-negative, got {}",
                self.distance_offset
            )));
        }
        Ok(())
    }

    /// Render radius for a physical radius in kilometres.
    pub fn radius(&self, km: f64) -> f64 {
        self.radius_scale * km.max(0.0).powf(self.radius_exponent)
    }

    /// Orbit radius around the system origin. Zero stays zero.
    pub fn orbit_distance(&self, au: f64) -> f64 {
        if au <= 0.0 {
            return 0.0;
        }
        self.distance_offset + self.distance_scale * au.sqrt()
    }

    /// Orbit radius of a satellite, measured past both surfaces so the two
    /// spheres never intersect. Zero stays zero (rings sit on their parent).
    pub fn satellite_distance(&self, au: f64, parent_radius: f64, own_radius: f64) -> f64 {
        if au <= 0.0 {
            return 0.0;
        }
        parent_radius + own_radius + self.satellite_distance_scale * au
    }

    /// Radians per unit of virtual time for a period in days.
    /// A zero period means stationary; a negative one runs retrograde.
    pub fn angular_speed(&self, period_days: f64) -> f64 {
        if period_days == 0.0 {
            return 0.0;
        }
        TAU / period_days * self.days_per_unit
    }

    /// Orbit-plane normal for an inclination in degrees: `Y` tipped about
    /// `X`, which keeps the `(r, 0, 0)` reference in the plane.
    pub fn orbit_axis(&self, tilt_deg: f64) -> Vec3 {
        Quat::from_rotation_x(tilt_deg.to_radians() as f32) * Vec3::Y
    }

    /// Obliquity as an `(axis, radians)` pair about `Z`.
    pub fn axis_tilt(&self, tilt_deg: f64) -> (Vec3, f64) {
        (Vec3::Z, tilt_deg.to_radians())
    }
}
