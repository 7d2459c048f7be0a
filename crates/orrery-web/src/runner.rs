use orrery_engine::{
    BodyCatalog, Command, CommandQueue, ConfigurationError,
    FixedTimestep, Orrery, OrreryConfig, ProtocolLayout,
};

/// Drives an [`Orrery`] from browser frame callbacks.
///
/// The page calls `tick` once per animation frame with the real frame
/// delta; the runner turns that into fixed steps and repacks the shared
/// output buffer. wasm-bindgen cannot export this struct's borrows
/// directly, so `lib.rs` keeps one instance in a `thread_local!`.
pub struct OrreryRunner {
    orrery: Orrery,
    commands: CommandQueue,
    timestep: FixedTimestep,
    layout: ProtocolLayout,
    /// Flat output buffer the page reads through `buffer_ptr`.
    buffer: Vec<f32>,
    frames: u64,
}

impl OrreryRunner {
    pub fn new(orrery: Orrery) -> Self {
        let timestep = FixedTimestep::new(orrery.config().fixed_dt);
        let layout = ProtocolLayout::from_config(orrery.config());
        let buffer = vec![0.0; layout.buffer_total_floats];
        let mut runner = Self {
            orrery,
            commands: CommandQueue::new(),
            timestep,
            layout,
            buffer,
            frames: 0,
        };
        runner.pack();
        runner
    }

    /// Build from optional JSON documents. `None` means the built-in
    /// catalog or the default config.
    pub fn from_json(catalog: Option<&str>, config: Option<&str>) -> Result<Self, ConfigurationError> {
        let catalog = match catalog {
            Some(json) => BodyCatalog::from_json(json)?,
            None => BodyCatalog::builtin()?,
        };
        let config = match config {
            Some(json) => OrreryConfig::from_json(json)?,
            None => OrreryConfig::default(),
        };
        Ok(Self::new(Orrery::from_catalog(&catalog, config)?))
    }

    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Queue a numeric command from the page. Returns false for unknown kinds.
    pub fn push_custom(&mut self, kind: u32, a: f32, b: f32) -> bool {
        match Command::from_custom(kind, a, b) {
            Some(command) => {
                self.push_command(command);
                true
            }
            None => {
                log::warn!("unknown command kind {}", kind);
                false
            }
        }
    }

    /// Run one frame: apply queued commands, run the fixed steps that fit
    /// in `dt` seconds, then repack the output buffer.
    pub fn tick(&mut self, dt: f64) {
        self.orrery.clear_events();

        for command in self.commands.drain() {
            self.orrery.apply(command);
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.orrery.tick(self.timestep.dt());
        }

        self.frames += 1;
        self.pack();
    }

    fn pack(&mut self) {
        if !self.layout.pack(&self.orrery, self.frames, &mut self.buffer) {
            log::warn!("output buffer too small for layout");
        }
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn target_name(&self) -> &str {
        self.orrery.target_name()
    }

    /// Material table for the host; an empty array if it cannot be encoded.
    pub fn materials_json(&self) -> String {
        match self.orrery.bodies().shapes().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("material table not encoded: {}", e);
                "[]".to_string()
            }
        }
    }

    pub fn frame_counter(&self) -> u64 {
        self.frames
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::bridge::protocol::{
        HEADER_BODY_COUNT, HEADER_EVENT_COUNT, HEADER_FLAGS, HEADER_FRAME_COUNTER, HEADER_MODE,
    };
    use orrery_engine::OrreryEvent;

    const FRAME: f64 = 1.0 / 60.0;

    fn runner() -> OrreryRunner {
        OrreryRunner::from_json(None, None).unwrap()
    }

    #[test]
    fn initial_buffer_is_packed() {
        let r = runner();
        assert_eq!(r.buffer().len(), r.buffer_total_floats() as usize);
        assert_eq!(r.buffer()[HEADER_BODY_COUNT], 12.0);
        assert_eq!(r.target_name(), "Overview");
    }

    #[test]
    fn commands_apply_before_ticking() {
        let mut r = runner();
        assert!(r.push_custom(Command::NEXT_TARGET, 0.0, 0.0));
        assert!(r.push_custom(Command::TOGGLE_PAUSE, 0.0, 0.0));
        r.tick(FRAME);
        assert_eq!(r.target_name(), "Sun");
        assert_eq!(r.buffer()[HEADER_MODE], 1.0);
        assert_eq!(r.buffer()[HEADER_FLAGS], 1.0);
        assert_eq!(r.buffer()[HEADER_EVENT_COUNT], 2.0);
        assert_eq!(r.orrery().playback().elapsed(), 0.0);
    }

    #[test]
    fn events_last_one_frame() {
        let mut r = runner();
        r.push_command(Command::SpeedUp);
        r.tick(FRAME);
        let offset = r.layout().event_data_offset;
        assert_eq!(r.buffer()[offset], OrreryEvent::PLAYBACK);
        r.tick(FRAME);
        assert_eq!(r.buffer()[HEADER_EVENT_COUNT], 0.0);
    }

    #[test]
    fn unknown_command_is_dropped() {
        let mut r = runner();
        assert!(!r.push_custom(999, 0.0, 0.0));
        r.tick(FRAME);
        assert_eq!(r.buffer()[HEADER_EVENT_COUNT], 0.0);
    }

    #[test]
    fn fixed_steps_follow_frame_time() {
        let mut r = runner();
        r.tick(FRAME * 3.0 + 1e-6);
        assert_eq!(r.orrery().tick_count(), 3);
        assert_eq!(r.frame_counter(), 1);
        assert_eq!(r.buffer()[HEADER_FRAME_COUNTER], 1.0);
    }

    #[test]
    fn materials_cover_every_body() {
        let r = runner();
        let json = r.materials_json();
        assert!(json.starts_with('['));
        assert_eq!(json.matches("\"bounding_radius\"").count(), 12);
        assert!(json.contains("\"emissive\":{"));
    }

    #[test]
    fn bad_config_is_reported() {
        let err = OrreryRunner::from_json(None, Some(r#"{ "fixed_dt": -1 }"#)).err().unwrap();
        assert!(err.to_string().contains("fixed_dt"));
    }
}
