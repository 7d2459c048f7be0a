use glam::{Quat, Vec3};
use crate::api::error::ConfigurationError;
use crate::api::types::BodyId;
use crate::assets::registry::{ShapeHandle, ShapeRegistry};
use crate::camera::director::{TargetSource, TargetView};
use crate::core::body::{BodyDesc, CelestialBody, SpinPolicy};
use crate::extensions::transform::{LocalTransform, TransformGraph, WorldTransform};

/// Arena of bodies plus the transform tree that links satellites to their
/// parents. Sized for a fixed cast of a few dozen bodies.
pub struct BodySystem {
    bodies: Vec<CelestialBody>,
    graph: TransformGraph,
    world: Vec<WorldTransform>,
    shapes: ShapeRegistry,
    spin_policy: SpinPolicy,
}

impl BodySystem {
    pub fn new(spin_policy: SpinPolicy) -> Self {
        Self {
            bodies: Vec::with_capacity(32),
            graph: TransformGraph::new(),
            world: Vec::with_capacity(32),
            shapes: ShapeRegistry::new(),
            spin_policy,
        }
    }

    /// Add a top-level body. Its rest offset and tilt are applied now.
    pub fn add_body(&mut self, desc: BodyDesc, shape: ShapeHandle) -> Result<BodyId, ConfigurationError> {
        let id = BodyId(self.bodies.len() as u32);
        let body = CelestialBody::new(id, desc)?;
        let graph_id = self.graph.insert(LocalTransform::new().with_offset(body.offset()));
        debug_assert_eq!(graph_id, id);

        self.bodies.push(body);
        self.shapes.insert(id, shape);
        self.graph.propagate(&mut self.world);
        Ok(id)
    }

    /// Make `child` a satellite of `parent`. Fails for unknown ids, for a
    /// body that already has a parent, and for anything that would close a
    /// loop in the tree.
    pub fn add_satellite(&mut self, parent: BodyId, child: BodyId) -> Result<(), ConfigurationError> {
        self.graph.set_parent(child, parent)?;
        self.graph.propagate(&mut self.world);
        Ok(())
    }

    /// Advance every body to virtual time `elapsed`, parents before their
    /// satellites, then recompose world transforms.
    pub fn update(&mut self, elapsed: f64, time_scale: f64) {
        for i in 0..self.graph.roots().len() {
            let root = self.graph.roots()[i];
            self.update_recursive(root, elapsed, time_scale);
        }
        self.graph.propagate(&mut self.world);
    }

    fn update_recursive(&mut self, id: BodyId, elapsed: f64, time_scale: f64) {
        let body = &mut self.bodies[id.index()];
        body.advance(elapsed, time_scale, self.spin_policy);
        let offset = body.offset();
        if let Some(local) = self.graph.local_mut(id) {
            local.offset = offset;
        }

        for i in 0..self.graph.children(id).len() {
            let child = self.graph.children(id)[i];
            self.update_recursive(child, elapsed, time_scale);
        }
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.index())
    }

    /// Find the first body with the given display name.
    pub fn find_by_name(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn parent(&self, id: BodyId) -> Option<BodyId> {
        self.graph.parent(id)
    }

    pub fn satellites(&self, id: BodyId) -> &[BodyId] {
        self.graph.children(id)
    }

    pub fn roots(&self) -> &[BodyId] {
        self.graph.roots()
    }

    /// Group transform relative to the parent.
    pub fn local(&self, id: BodyId) -> Option<LocalTransform> {
        self.graph.local(id).copied()
    }

    /// Group transform in world space, as of the last update.
    pub fn world(&self, id: BodyId) -> Option<WorldTransform> {
        self.world.get(id.index()).copied()
    }

    pub fn world_position(&self, id: BodyId) -> Option<Vec3> {
        self.world(id).map(|w| w.position)
    }

    /// World orientation of the body's shape (group rotation, then tilt and spin).
    pub fn world_orientation(&self, id: BodyId) -> Option<Quat> {
        let world = self.world(id)?;
        let body = self.get(id)?;
        Some(world.rotation * body.orientation())
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    pub fn spin_policy(&self) -> SpinPolicy {
        self.spin_policy
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Default for BodySystem {
    fn default() -> Self {
        Self::new(SpinPolicy::default())
    }
}

impl TargetSource for BodySystem {
    fn target_view(&self, id: BodyId) -> Option<TargetView> {
        Some(TargetView {
            position: self.world_position(id)?,
            radius: self.shapes.bounding_radius(id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyKind;
    use std::f64::consts::PI;

    fn sun_earth_moon() -> (BodySystem, BodyId, BodyId, BodyId) {
        sun_earth_moon_with(SpinPolicy::default())
    }

    fn sun_earth_moon_with(policy: SpinPolicy) -> (BodySystem, BodyId, BodyId, BodyId) {
        let mut sys = BodySystem::new(policy);
        let sun = sys
            .add_body(BodyDesc::new("Sun", BodyKind::Star).with_spin(0.01, Vec3::Y), ShapeHandle::sphere(50.0))
            .unwrap();
        let earth = sys
            .add_body(
                BodyDesc::new("Earth", BodyKind::Planet)
                    .with_spin(0.2, Vec3::Y)
                    .with_revolution(0.01, 1000.0, Vec3::Y)
                    .with_axis_tilt(Vec3::Z, 0.41),
                ShapeHandle::sphere(10.0),
            )
            .unwrap();
        let moon = sys
            .add_body(
                BodyDesc::new("Moon", BodyKind::Moon).with_revolution(0.13, 30.0, Vec3::Y),
                ShapeHandle::sphere(2.0),
            )
            .unwrap();
        sys.add_satellite(sun, earth).unwrap();
        sys.add_satellite(earth, moon).unwrap();
        (sys, sun, earth, moon)
    }

    #[test]
    fn satellite_rides_on_parent() {
        let (mut sys, _sun, earth, moon) = sun_earth_moon();
        for step in 0..100 {
            sys.update(step as f64 * 3.3, 1.0);
            let earth_pos = sys.world_position(earth).unwrap();
            let moon_pos = sys.world_position(moon).unwrap();
            let own = sys.get(moon).unwrap().offset();
            assert!((moon_pos - (earth_pos + own)).length() < 1e-3);
        }
    }

    #[test]
    fn planet_reaches_far_side_at_half_period() {
        let (mut sys, _sun, earth, _moon) = sun_earth_moon();
        sys.update(0.0, 1.0);
        assert!((sys.world_position(earth).unwrap() - Vec3::new(1000.0, 0.0, 0.0)).length() < 1e-3);
        sys.update(PI / 0.01, 1.0);
        assert!((sys.world_position(earth).unwrap() - Vec3::new(-1000.0, 0.0, 0.0)).length() < 0.05);
    }

    #[test]
    fn time_scale_speeds_up_orbits() {
        let (mut a, _, earth, _) = sun_earth_moon();
        let (mut b, _, _, _) = sun_earth_moon();
        a.update(20.0, 2.0);
        b.update(40.0, 1.0);
        assert!((a.world_position(earth).unwrap() - b.world_position(earth).unwrap()).length() < 1e-3);
    }

    #[test]
    fn forward_then_back_restores_pose() {
        let (mut sys, _sun, earth, moon) = sun_earth_moon();
        sys.update(12.0, 1.0);
        let earth_pos = sys.world_position(earth).unwrap();
        let moon_pos = sys.world_position(moon).unwrap();
        let earth_rot = sys.world_orientation(earth).unwrap();

        sys.update(12.0 + 5.0, 1.0);
        sys.update(12.0, 1.0);
        assert!((sys.world_position(earth).unwrap() - earth_pos).length() < 1e-3);
        assert!((sys.world_position(moon).unwrap() - moon_pos).length() < 1e-3);
        assert!(sys.world_orientation(earth).unwrap().abs_diff_eq(earth_rot, 1e-5));
    }

    #[test]
    fn negative_time_scale_mirrors_negative_clock() {
        for policy in [SpinPolicy::Incremental, SpinPolicy::Absolute] {
            let (mut reversed, _, earth, moon) = sun_earth_moon_with(policy);
            let (mut rewound, _, _, _) = sun_earth_moon_with(policy);
            for step in 1..=20 {
                let t = step as f64 * 2.5;
                reversed.update(t, -1.0);
                rewound.update(-t, 1.0);
            }
            for id in [earth, moon] {
                let a = reversed.world_position(id).unwrap();
                let b = rewound.world_position(id).unwrap();
                assert!((a - b).length() < 1e-3, "{:?} {:?}: {} vs {}", policy, id, a, b);
                let a = reversed.world_orientation(id).unwrap();
                let b = rewound.world_orientation(id).unwrap();
                assert!(a.abs_diff_eq(b, 1e-5), "{:?} {:?}", policy, id);
            }
        }
    }

    #[test]
    fn cycle_rejected() {
        let (mut sys, sun, _earth, moon) = sun_earth_moon();
        assert!(matches!(
            sys.add_satellite(moon, sun),
            Err(ConfigurationError::SatelliteCycle { .. })
        ));
        assert!(matches!(
            sys.add_satellite(sun, sun),
            Err(ConfigurationError::SelfSatellite(_))
        ));
    }

    #[test]
    fn target_view_uses_shape_radius() {
        let (mut sys, _sun, earth, _moon) = sun_earth_moon();
        sys.update(0.0, 1.0);
        let view = sys.target_view(earth).unwrap();
        assert_eq!(view.radius, 10.0);
        assert!((view.position - Vec3::new(1000.0, 0.0, 0.0)).length() < 1e-3);
        assert!(sys.target_view(BodyId(99)).is_none());
    }

    #[test]
    fn find_by_name() {
        let (sys, _sun, _earth, moon) = sun_earth_moon();
        assert_eq!(sys.find_by_name("Moon").map(|b| b.id()), Some(moon));
        assert!(sys.find_by_name("Pluto").is_none());
    }
}
