//! Orbit rings and spin axes, drawn as world-space line segments.
//!
//! Toggled at runtime; hidden helpers cost nothing per tick.

use std::f32::consts::TAU;
use glam::{Quat, Vec3};
use crate::core::system::BodySystem;
use crate::renderer::instance::HelperVertex;

/// Segments per orbit ring.
const RING_SEGMENTS: usize = 64;
/// Spin-axis half length, in multiples of the body's bounding radius.
const AXIS_EXTENT: f32 = 1.6;

/// Helper line geometry, rebuilt from the body hierarchy each tick.
#[derive(Debug, Clone, Default)]
pub struct DebugHelpers {
    visible: bool,
    /// Line list: every two vertices form one segment.
    vertices: Vec<HelperVertex>,
}

impl DebugHelpers {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            vertices: Vec::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.vertices.clear();
        }
    }

    /// Returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        self.set_visible(!self.visible);
        self.visible
    }

    pub fn vertices(&self) -> &[HelperVertex] {
        &self.vertices
    }

    /// Rebuild every ring and axis from current world transforms.
    pub fn rebuild(&mut self, system: &BodySystem) {
        self.vertices.clear();
        if !self.visible {
            return;
        }

        for body in system.iter() {
            let id = body.id();
            let revolution = body.desc().revolution;
            if revolution.radius > 0.0 {
                let (center, frame) = match system.parent(id).and_then(|p| system.world(p)) {
                    Some(parent) => (parent.position, parent.rotation),
                    None => (Vec3::ZERO, Quat::IDENTITY),
                };
                self.push_ring(center, frame, revolution.axis, revolution.rest_offset());
            }

            if let (Some(position), Some(orientation)) = (system.world_position(id), system.world_orientation(id)) {
                let extent = system.shapes().bounding_radius(id) * AXIS_EXTENT;
                let axis = orientation * body.desc().spin.axis * extent;
                self.vertices.push(HelperVertex::new(position - axis, HelperVertex::AXIS));
                self.vertices.push(HelperVertex::new(position + axis, HelperVertex::AXIS));
            }
        }
    }

    fn push_ring(&mut self, center: Vec3, frame: Quat, axis: Vec3, reference: Vec3) {
        let point = |i: usize| {
            let angle = i as f32 / RING_SEGMENTS as f32 * TAU;
            center + frame * (Quat::from_axis_angle(axis, angle) * reference)
        };
        for i in 0..RING_SEGMENTS {
            self.vertices.push(HelperVertex::new(point(i), HelperVertex::ORBIT));
            self.vertices.push(HelperVertex::new(point(i + 1), HelperVertex::ORBIT));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyKind;
    use crate::assets::registry::ShapeHandle;
    use crate::core::body::BodyDesc;

    fn system() -> BodySystem {
        let mut system = BodySystem::default();
        system
            .add_body(BodyDesc::new("Sun", BodyKind::Star), ShapeHandle::sphere(10.0))
            .unwrap();
        let planet = system
            .add_body(
                BodyDesc::new("Planet", BodyKind::Planet)
                    .with_revolution(0.5, 100.0, Vec3::Y)
                    .with_spin(1.0, Vec3::Y),
                ShapeHandle::sphere(5.0),
            )
            .unwrap();
        let moon = system
            .add_body(
                BodyDesc::new("Moon", BodyKind::Moon).with_revolution(2.0, 15.0, Vec3::Y),
                ShapeHandle::sphere(1.0),
            )
            .unwrap();
        system.add_satellite(planet, moon).unwrap();
        system.update(3.0, 1.0);
        system
    }

    #[test]
    fn hidden_helpers_stay_empty() {
        let mut helpers = DebugHelpers::new(false);
        helpers.rebuild(&system());
        assert!(helpers.vertices().is_empty());
    }

    #[test]
    fn rings_and_axes_when_visible() {
        let mut helpers = DebugHelpers::new(true);
        helpers.rebuild(&system());
        let rings = helpers.vertices().iter().filter(|v| v.style == HelperVertex::ORBIT).count();
        let axes = helpers.vertices().iter().filter(|v| v.style == HelperVertex::AXIS).count();
        assert_eq!(rings, 2 * RING_SEGMENTS * 2);
        assert_eq!(axes, 3 * 2);
        assert_eq!(helpers.vertices().len() % 2, 0);
    }

    #[test]
    fn moon_ring_is_centered_on_its_parent() {
        let system = system();
        let mut helpers = DebugHelpers::new(true);
        helpers.rebuild(&system);
        let planet = system.find_by_name("Planet").unwrap().id();
        let center = system.world_position(planet).unwrap();
        // Bodies are visited in id order, so the moon's ring comes last.
        let rings: Vec<_> = helpers
            .vertices()
            .iter()
            .filter(|v| v.style == HelperVertex::ORBIT)
            .collect();
        let moon_ring = &rings[RING_SEGMENTS * 2..];
        assert_eq!(moon_ring.len(), RING_SEGMENTS * 2);
        for v in moon_ring {
            assert!(((v.position() - center).length() - 15.0).abs() < 1e-3);
        }
    }

    #[test]
    fn toggle_clears_lines() {
        let mut helpers = DebugHelpers::new(true);
        helpers.rebuild(&system());
        assert!(!helpers.vertices().is_empty());
        assert!(!helpers.toggle());
        assert!(helpers.vertices().is_empty());
    }
}
