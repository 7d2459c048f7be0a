// extensions/mod.rs
//
// Standalone math building blocks for the body tree and the camera.
// Neither module knows about bodies or cameras; both are plain data.

pub mod easing;
pub mod transform;

pub use easing::{Easing, lerp, lerp_vec3, approach};
pub use transform::{TransformGraph, LocalTransform, WorldTransform};
