//! Shared output buffer layout.
//! Must stay in sync with the host page's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Bodies: max_bodies × 16 floats]
//! [Camera: 8 floats]
//! [Helpers: max_helper_vertices × 4 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame so the host can
//! compute section offsets without sharing constants.

use crate::api::config::OrreryConfig;
use crate::api::orrery::Orrery;
use crate::api::types::OrreryEvent;
use crate::renderer::instance::{BodyInstance, CameraInstance, HelperVertex};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_BODIES: usize = 2;
pub const HEADER_BODY_COUNT: usize = 3;
pub const HEADER_MAX_HELPER_VERTICES: usize = 4;
pub const HEADER_HELPER_VERTEX_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_ELAPSED: usize = 8;
pub const HEADER_MULTIPLIER: usize = 9;
pub const HEADER_FLAGS: usize = 10;
pub const HEADER_MODE: usize = 11;
pub const HEADER_MODE_COUNT: usize = 12;
pub const HEADER_TRANSITIONING: usize = 13;
pub const HEADER_EASING: usize = 14;
pub const HEADER_BLEND: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_bodies: usize,
    pub max_helper_vertices: usize,
    pub max_events: usize,

    pub body_data_floats: usize,
    pub helper_data_floats: usize,
    pub event_data_floats: usize,

    /// Offsets in floats from the start of the buffer.
    pub body_data_offset: usize,
    pub camera_data_offset: usize,
    pub helper_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_bodies: usize, max_helper_vertices: usize, max_events: usize) -> Self {
        let body_data_floats = max_bodies * BodyInstance::FLOATS;
        let helper_data_floats = max_helper_vertices * HelperVertex::FLOATS;
        let event_data_floats = max_events * OrreryEvent::FLOATS;

        let body_data_offset = HEADER_FLOATS;
        let camera_data_offset = body_data_offset + body_data_floats;
        let helper_data_offset = camera_data_offset + CameraInstance::FLOATS;
        let event_data_offset = helper_data_offset + helper_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_bodies,
            max_helper_vertices,
            max_events,
            body_data_floats,
            helper_data_floats,
            event_data_floats,
            body_data_offset,
            camera_data_offset,
            helper_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &OrreryConfig) -> Self {
        Self::new(config.max_bodies, config.max_helper_vertices, config.max_events)
    }

    /// Write one frame into `out`, which must hold `buffer_total_floats`.
    /// Sections past their count keep stale data; the host reads counts first.
    /// Returns false (and writes nothing) if `out` is too short.
    pub fn pack(&self, orrery: &Orrery, frame_counter: u64, out: &mut [f32]) -> bool {
        if out.len() < self.buffer_total_floats {
            return false;
        }

        let frame = orrery.frame();
        let bodies = &frame.body_floats()[..frame.bodies.len().min(self.max_bodies) * BodyInstance::FLOATS];
        let helpers: &[f32] = bytemuck::cast_slice(orrery.helpers().vertices());
        let helpers = &helpers[..helpers.len().min(self.helper_data_floats)];
        let events: &[f32] = bytemuck::cast_slice(orrery.events());
        let events = &events[..events.len().min(self.event_data_floats)];

        let playback = orrery.playback();
        let director = orrery.director();
        let header = &mut out[..HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = frame_counter as f32;
        header[HEADER_MAX_BODIES] = self.max_bodies as f32;
        header[HEADER_BODY_COUNT] = (bodies.len() / BodyInstance::FLOATS) as f32;
        header[HEADER_MAX_HELPER_VERTICES] = self.max_helper_vertices as f32;
        header[HEADER_HELPER_VERTEX_COUNT] = (helpers.len() / HelperVertex::FLOATS) as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = (events.len() / OrreryEvent::FLOATS) as f32;
        header[HEADER_ELAPSED] = playback.elapsed() as f32;
        header[HEADER_MULTIPLIER] = playback.multiplier() as f32;
        header[HEADER_FLAGS] = playback.flags() as f32;
        header[HEADER_MODE] = director.mode() as f32;
        header[HEADER_MODE_COUNT] = director.mode_count() as f32;
        header[HEADER_TRANSITIONING] = if director.is_transitioning() { 1.0 } else { 0.0 };
        header[HEADER_EASING] = director.easing();
        header[HEADER_BLEND] = director.blend_factor();

        let camera: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&frame.camera));

        copy_into(out, self.body_data_offset, bodies);
        copy_into(out, self.camera_data_offset, camera);
        copy_into(out, self.helper_data_offset, helpers);
        copy_into(out, self.event_data_offset, events);
        true
    }
}

fn copy_into(out: &mut [f32], offset: usize, data: &[f32]) {
    out[offset..offset + data.len()].copy_from_slice(data);
}
