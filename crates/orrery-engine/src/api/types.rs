use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Index of a body in the [`BodySystem`](crate::core::system::BodySystem) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a body is. Informational only; animation treats every kind alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    #[default]
    Planet,
    Moon,
    Ring,
}

impl BodyKind {
    /// Numeric code used in the flat output buffer.
    pub fn code(self) -> f32 {
        match self {
            BodyKind::Star => 0.0,
            BodyKind::Planet => 1.0,
            BodyKind::Moon => 2.0,
            BodyKind::Ring => 3.0,
        }
    }
}

/// An event communicated from Rust to the host page each frame.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrreryEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl OrreryEvent {
    pub const FLOATS: usize = 4;

    /// Camera mode changed; `a` = new mode index.
    pub const TARGET_CHANGED: f32 = 1.0;
    /// A camera transition resolved; `a` = mode index it settled on.
    pub const TRANSITION_FINISHED: f32 = 2.0;
    /// Playback status; `a` = elapsed, `b` = multiplier, `c` = flags (1 paused, 2 reversed).
    pub const PLAYBACK: f32 = 3.0;
}
