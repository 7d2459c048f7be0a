/// Commands the orrery understands.
/// Host-agnostic: keys, buttons and gestures are mapped to these by the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Cycle the camera to the next mode (wraps past the last target to overview).
    NextTarget,
    /// Cycle the camera to the previous mode.
    PrevTarget,
    /// Jump to a mode index. Out-of-range values are clamped.
    GotoTarget(i64),
    TogglePause,
    ToggleReverse,
    /// Double the frame multiplier.
    SpeedUp,
    /// Halve the frame multiplier.
    SlowDown,
    SetMultiplier(f64),
    /// Show or hide orbit rings and spin axes.
    ToggleHelpers,
    /// Free-camera rotation in radians.
    Orbit { yaw: f32, pitch: f32 },
    /// Free-camera dolly. Values below 1 move closer.
    Zoom(f32),
}

impl Command {
    pub const NEXT_TARGET: u32 = 1;
    pub const PREV_TARGET: u32 = 2;
    pub const GOTO_TARGET: u32 = 3;
    pub const TOGGLE_PAUSE: u32 = 4;
    pub const TOGGLE_REVERSE: u32 = 5;
    pub const SPEED_UP: u32 = 6;
    pub const SLOW_DOWN: u32 = 7;
    pub const SET_MULTIPLIER: u32 = 8;
    pub const TOGGLE_HELPERS: u32 = 9;
    pub const ORBIT: u32 = 10;
    pub const ZOOM: u32 = 11;

    /// Decode a numeric command sent by the host page.
    /// `a` and `b` carry the payload where one exists. Unknown kinds yield `None`.
    pub fn from_custom(kind: u32, a: f32, b: f32) -> Option<Self> {
        let command = match kind {
            Self::NEXT_TARGET => Command::NextTarget,
            Self::PREV_TARGET => Command::PrevTarget,
            Self::GOTO_TARGET => Command::GotoTarget(a as i64),
            Self::TOGGLE_PAUSE => Command::TogglePause,
            Self::TOGGLE_REVERSE => Command::ToggleReverse,
            Self::SPEED_UP => Command::SpeedUp,
            Self::SLOW_DOWN => Command::SlowDown,
            Self::SET_MULTIPLIER => Command::SetMultiplier(a as f64),
            Self::TOGGLE_HELPERS => Command::ToggleHelpers,
            Self::ORBIT => Command::Orbit { yaw: a, pitch: b },
            Self::ZOOM => Command::Zoom(a),
            _ => return None,
        };
        Some(command)
    }
}

/// A queue of pending commands.
/// The host writes commands at any time; the runner drains them once per frame
/// before ticking, in the order they arrived.
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Take every pending command, oldest first, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Iterate over pending commands without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
