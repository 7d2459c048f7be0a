use glam::Vec3;
use crate::extensions::easing::lerp_vec3;

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(500.0, 500.0, 0.0),
            look_at: Vec3::ZERO,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Blend position and look-at independently.
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: lerp_vec3(self.position, other.position, t),
            look_at: lerp_vec3(self.look_at, other.look_at, t),
        }
    }

    /// Distance from the camera to the point it looks at.
    pub fn range(&self) -> f32 {
        self.position.distance(self.look_at)
    }
}
