use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use crate::camera::pose::CameraPose;

/// Per-body render data copied into the shared output buffer.
/// Must match the host-side protocol: 16 floats = 64 bytes stride.
///
/// The host rebuilds its scene graph from `parent` and the local fields;
/// `world_*` is provided for picking and labels.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// Group offset relative to the parent group.
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_z: f32,
    /// Index of the parent instance, or -1 for a top-level body.
    pub parent: f32,
    /// Shape orientation (tilt, then spin) as a quaternion.
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    pub rot_w: f32,
    pub world_x: f32,
    pub world_y: f32,
    pub world_z: f32,
    /// Bounding radius in render units.
    pub radius: f32,
    pub id: f32,
    /// [`BodyKind::code`](crate::api::types::BodyKind::code).
    pub kind: f32,
    pub _pad: [f32; 2],
}

impl BodyInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn offset(&self) -> Vec3 {
        Vec3::new(self.offset_x, self.offset_y, self.offset_z)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_xyzw(self.rot_x, self.rot_y, self.rot_z, self.rot_w)
    }

    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.world_x, self.world_y, self.world_z)
    }
}

/// Camera pose in the output buffer: position then look-at, padded to 8 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraInstance {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub _pad: [f32; 2],
}

impl CameraInstance {
    pub const FLOATS: usize = 8;
}

impl From<CameraPose> for CameraInstance {
    fn from(pose: CameraPose) -> Self {
        Self {
            position: pose.position.to_array(),
            look_at: pose.look_at.to_array(),
            _pad: [0.0; 2],
        }
    }
}

/// A helper line vertex: world position plus a style code.
/// Consecutive pairs form one segment (line list).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct HelperVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// [`HelperVertex::ORBIT`] or [`HelperVertex::AXIS`].
    pub style: f32,
}

impl HelperVertex {
    pub const FLOATS: usize = 4;
    pub const ORBIT: f32 = 0.0;
    pub const AXIS: f32 = 1.0;

    pub fn new(position: Vec3, style: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            style,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Everything the renderer needs for one frame.
pub struct FrameBuffer {
    pub bodies: Vec<BodyInstance>,
    pub camera: CameraInstance,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(64),
            camera: CameraInstance::default(),
        }
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn push(&mut self, instance: BodyInstance) {
        self.bodies.push(instance);
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.len() as u32
    }

    /// Body instances as a flat float slice.
    pub fn body_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.bodies)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
