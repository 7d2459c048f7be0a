use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::api::error::{finite, non_negative, ConfigurationError};
use crate::api::types::{BodyId, BodyKind};
use crate::assets::registry::{Emissive, ShapeHandle};
use crate::assets::units::UnitScale;
use crate::core::body::BodyDesc;
use crate::core::system::BodySystem;

const BUILTIN_JSON: &str = include_str!("solar_system.json");

/// A catalog of bodies, loaded from JSON.
/// Top-level records orbit the origin; nested `satellites` orbit their parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyCatalog {
    pub bodies: Vec<BodyRecord>,
}

/// Display name with an optional localized alternative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayName {
    pub en: String,
    #[serde(default)]
    pub ja: Option<String>,
}

/// Physical description of one body, in catalog units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyRecord {
    /// Unique key across the whole catalog.
    pub id: String,
    #[serde(default)]
    pub kind: BodyKind,
    pub name: DisplayName,
    pub radius_km: f64,
    #[serde(default)]
    pub distance_au: f64,
    /// 0 = no revolution.
    #[serde(default)]
    pub orbital_period_days: f64,
    #[serde(default)]
    pub orbital_tilt_deg: f64,
    /// 0 = no spin.
    #[serde(default)]
    pub rotation_period_hours: f64,
    #[serde(default)]
    pub axis_tilt_deg: f64,
    /// 0xRRGGBB.
    #[serde(default)]
    pub color: Option<u32>,
    /// Relative texture path.
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub emissive: Option<EmissiveRecord>,
    #[serde(default)]
    pub satellites: Vec<BodyRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmissiveRecord {
    pub color: u32,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

fn default_intensity() -> f32 {
    1.0
}

impl BodyRecord {
    fn check(&self) -> Result<(), ConfigurationError> {
        non_negative("radius_km", self.radius_km)?;
        non_negative("distance_au", self.distance_au)?;
        finite("orbital_period_days", self.orbital_period_days)?;
        finite("orbital_tilt_deg", self.orbital_tilt_deg)?;
        finite("rotation_period_hours", self.rotation_period_hours)?;
        finite("axis_tilt_deg", self.axis_tilt_deg)?;
        Ok(())
    }

    fn shape(&self, radius: f64) -> ShapeHandle {
        ShapeHandle {
            bounding_radius: radius as f32,
            texture: self.texture.clone(),
            color: self.color,
            emissive: self.emissive.map(|e| Emissive { color: e.color, intensity: e.intensity }),
        }
    }

    /// Animation parameters in render units. `parent_radius` is `None` for
    /// top-level records.
    fn desc(&self, units: &UnitScale, radius: f64, parent_radius: Option<f64>) -> BodyDesc {
        let distance = match parent_radius {
            Some(parent) => units.satellite_distance(self.distance_au, parent, radius),
            None => units.orbit_distance(self.distance_au),
        };
        let (tilt_axis, tilt_angle) = units.axis_tilt(self.axis_tilt_deg);
        BodyDesc::new(self.name.en.clone(), self.kind)
            .with_spin(
                units.angular_speed(self.rotation_period_hours / 24.0),
                glam::Vec3::Y,
            )
            .with_revolution(
                units.angular_speed(self.orbital_period_days),
                distance,
                units.orbit_axis(self.orbital_tilt_deg),
            )
            .with_axis_tilt(tilt_axis, tilt_angle)
    }

    /// Depth-first walk over this record and its satellites.
    fn walk<'a>(&'a self, out: &mut Vec<&'a BodyRecord>) {
        out.push(self);
        for s in &self.satellites {
            s.walk(out);
        }
    }
}

impl BodyCatalog {
    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let catalog: BodyCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The Sun, the eight planets, the Moon and the Saturn and Uranus rings.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::from_json(BUILTIN_JSON)
    }

    /// Every record, depth-first, parents before satellites.
    pub fn records(&self) -> Vec<&BodyRecord> {
        let mut out = Vec::new();
        for record in &self.bodies {
            record.walk(&mut out);
        }
        out
    }

    pub fn find(&self, id: &str) -> Option<&BodyRecord> {
        self.records().into_iter().find(|r| r.id == id)
    }

    /// Ids are unique and every number is usable.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for record in self.records() {
            if !seen.insert(record.id.as_str()) {
                return Err(ConfigurationError::DuplicateRecord(record.id.clone()));
            }
            record.check()?;
        }
        Ok(())
    }

    /// Add every record to `system`, attaching satellites to their parents.
    /// Returns the selectable camera targets in catalog order: every body
    /// except rings, which are decorations of their parent.
    pub fn build(&self, units: &UnitScale, system: &mut BodySystem) -> Result<Vec<BodyId>, ConfigurationError> {
        self.validate()?;
        let mut targets = Vec::new();
        for record in &self.bodies {
            Self::add_record(record, None, units, system, &mut targets)?;
        }
        log::info!(
            "catalog built: {} bodies, {} camera targets",
            system.len(),
            targets.len()
        );
        Ok(targets)
    }

    fn add_record(
        record: &BodyRecord,
        parent: Option<(BodyId, f64)>,
        units: &UnitScale,
        system: &mut BodySystem,
        targets: &mut Vec<BodyId>,
    ) -> Result<(), ConfigurationError> {
        let radius = units.radius(record.radius_km);
        let desc = record.desc(units, radius, parent.map(|(_, r)| r));
        let id = system.add_body(desc, record.shape(radius))?;
        if let Some((parent_id, _)) = parent {
            system.add_satellite(parent_id, id)?;
        }
        if record.kind != BodyKind::Ring {
            targets.push(id);
        }
        for satellite in &record.satellites {
            Self::add_record(satellite, Some((id, radius)), units, system, targets)?;
        }
        Ok(())
    }
}
