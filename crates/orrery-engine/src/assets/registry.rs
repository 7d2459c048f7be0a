use std::collections::HashMap;
use serde::Serialize;
use crate::api::types::BodyId;

/// Emissive glow for self-lit bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Emissive {
    pub color: u32,
    pub intensity: f32,
}

/// Render-side description of a body's shape. Owned by the renderer's side
/// of the world; the animation core only reads `bounding_radius`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeHandle {
    /// Radius of the shape's bounding sphere in render units.
    pub bounding_radius: f32,
    /// Relative texture path, if textured.
    pub texture: Option<String>,
    /// Base color as 0xRRGGBB.
    pub color: Option<u32>,
    pub emissive: Option<Emissive>,
}

impl ShapeHandle {
    pub fn sphere(bounding_radius: f32) -> Self {
        Self {
            bounding_radius,
            texture: None,
            color: None,
            emissive: None,
        }
    }

    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.texture = Some(path.into());
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_emissive(mut self, color: u32, intensity: f32) -> Self {
        self.emissive = Some(Emissive { color, intensity });
        self
    }
}

/// Side table of shape handles keyed by body id, kept apart from the
/// animation state so render resources never leak into the body records.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<BodyId, ShapeHandle>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: BodyId, shape: ShapeHandle) {
        self.shapes.insert(id, shape);
    }

    /// Look up a shape by body id. Returns None if the body has none.
    pub fn get(&self, id: BodyId) -> Option<&ShapeHandle> {
        self.shapes.get(&id)
    }

    /// Bounding radius of a body's shape, 0 when it has none.
    pub fn bounding_radius(&self, id: BodyId) -> f32 {
        self.shapes.get(&id).map(|s| s.bounding_radius).unwrap_or(0.0)
    }

    /// Material table for the host renderer, as a JSON array of
    /// `{ id, bounding_radius, texture, color, emissive }` in id order.
    /// The per-frame buffer only carries ids, so the host builds its
    /// materials from this once after init.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Entry<'a> {
            id: u32,
            #[serde(flatten)]
            shape: &'a ShapeHandle,
        }

        let mut entries: Vec<Entry<'_>> = self
            .shapes
            .iter()
            .map(|(id, shape)| Entry { id: id.0, shape })
            .collect();
        entries.sort_by_key(|e| e.id);
        serde_json::to_string(&entries)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
