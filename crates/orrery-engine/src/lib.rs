pub mod api;
pub mod core;
pub mod camera;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::orrery::{Orrery, OVERVIEW_NAME};
pub use api::config::{OrreryConfig, AnimationConfig};
pub use api::error::ConfigurationError;
pub use api::types::{BodyId, BodyKind, OrreryEvent};
pub use core::body::{BodyDesc, CelestialBody, Spin, Revolution, AxisTilt, SpinPolicy};
pub use core::system::BodySystem;
pub use core::time::{FixedTimestep, Playback, PlaybackConfig};
pub use camera::{
    CameraConfig, CameraDirector, CameraPose, CameraState,
    FreeControls, OrbitControls, TargetSource, TargetView,
};
pub use renderer::instance::{BodyInstance, CameraInstance, FrameBuffer, HelperVertex};
pub use input::queue::{Command, CommandQueue};
pub use assets::catalog::{BodyCatalog, BodyRecord, DisplayName};
pub use assets::registry::{ShapeHandle, ShapeRegistry, Emissive};
pub use assets::units::UnitScale;
pub use bridge::protocol::ProtocolLayout;
pub use systems::debug::DebugHelpers;
pub use systems::render::build_frame;

// Extensions: plain math with no body or camera knowledge
pub use extensions::{
    Easing, lerp, lerp_vec3, approach,
    TransformGraph, LocalTransform, WorldTransform,
};
