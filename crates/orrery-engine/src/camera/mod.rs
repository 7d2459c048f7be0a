pub mod controls;
pub mod director;
pub mod pose;

pub use controls::{FreeControls, OrbitControls};
pub use director::{CameraConfig, CameraDirector, CameraState, TargetSource, TargetView};
pub use pose::CameraPose;
