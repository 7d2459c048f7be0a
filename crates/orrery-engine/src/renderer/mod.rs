pub mod instance;

pub use instance::{BodyInstance, CameraInstance, FrameBuffer, HelperVertex};
