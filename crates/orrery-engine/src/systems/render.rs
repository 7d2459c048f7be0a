use crate::camera::pose::CameraPose;
use crate::core::system::BodySystem;
use crate::renderer::instance::{BodyInstance, CameraInstance, FrameBuffer};

/// Build the frame buffer from the body hierarchy and camera.
/// Bodies are written in id order and `parent` holds the parent's id,
/// which is also its slot in the same buffer. A hand-built tree may place
/// a parent after its satellites, so hosts resolve parents by index, not
/// by buffer order. At most `max_bodies` are written.
pub fn build_frame(system: &BodySystem, camera: CameraPose, max_bodies: usize, buffer: &mut FrameBuffer) {
    buffer.clear();
    buffer.camera = CameraInstance::from(camera);

    for body in system.iter().take(max_bodies) {
        let id = body.id();
        let (local, world) = match (system.local(id), system.world(id)) {
            (Some(local), Some(world)) => (local, world),
            _ => continue,
        };
        let rotation = body.orientation();
        let parent = system.parent(id).map_or(-1.0, |p| p.0 as f32);

        buffer.push(BodyInstance {
            offset_x: local.offset.x,
            offset_y: local.offset.y,
            offset_z: local.offset.z,
            parent,
            rot_x: rotation.x,
            rot_y: rotation.y,
            rot_z: rotation.z,
            rot_w: rotation.w,
            world_x: world.position.x,
            world_y: world.position.y,
            world_z: world.position.z,
            radius: system.shapes().bounding_radius(id),
            id: id.0 as f32,
            kind: body.kind().code(),
            _pad: [0.0; 2],
        });
    }
}
