use crate::api::config::OrreryConfig;
use crate::api::error::ConfigurationError;
use crate::api::types::{BodyId, OrreryEvent};
use crate::assets::catalog::BodyCatalog;
use crate::camera::director::CameraDirector;
use crate::camera::pose::CameraPose;
use crate::core::system::BodySystem;
use crate::core::time::Playback;
use crate::input::queue::Command;
use crate::renderer::instance::FrameBuffer;
use crate::systems::debug::DebugHelpers;
use crate::systems::render::build_frame;

/// Display name of mode 0.
pub const OVERVIEW_NAME: &str = "Overview";

/// The whole animated model: bodies, camera and the clock that drives both.
///
/// One `tick` per fixed step. Within a tick the clock advances first, then
/// every body, then the camera reads the fresh body positions.
pub struct Orrery {
    config: OrreryConfig,
    bodies: BodySystem,
    director: CameraDirector,
    playback: Playback,
    camera: CameraPose,
    helpers: DebugHelpers,
    frame: FrameBuffer,
    /// Accumulated since the last `clear_events`.
    events: Vec<OrreryEvent>,
    ticks: u64,
}

impl Orrery {
    /// The built-in solar system with default settings.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::from_catalog(&BodyCatalog::builtin()?, OrreryConfig::default())
    }

    /// Build the body tree from a catalog. Fails on the first invalid record
    /// or config value.
    pub fn from_catalog(catalog: &BodyCatalog, config: OrreryConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let mut bodies = BodySystem::new(config.spin_policy);
        let targets = catalog.build(&config.units, &mut bodies)?;
        Self::from_system(bodies, targets, config)
    }

    /// Wrap an already-built body system. Mode `n` follows `targets[n - 1]`.
    pub fn from_system(
        mut bodies: BodySystem,
        targets: Vec<BodyId>,
        config: OrreryConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if let Some(&missing) = targets.iter().find(|id| bodies.get(**id).is_none()) {
            return Err(ConfigurationError::UnknownBody(missing));
        }

        let playback = Playback::new(&config.playback);
        bodies.update(playback.elapsed(), config.animation.time_scale);
        let camera = config.camera.home_pose();
        let director = CameraDirector::new(config.camera.clone(), targets);

        log::info!(
            "orrery ready: {} bodies, {} camera modes, spin policy {:?}",
            bodies.len(),
            director.mode_count(),
            config.spin_policy
        );

        let mut orrery = Self {
            frame: FrameBuffer::new(),
            events: Vec::with_capacity(config.max_events),
            config,
            bodies,
            director,
            playback,
            camera,
            helpers: DebugHelpers::default(),
            ticks: 0,
        };
        orrery.rebuild_frame();
        Ok(orrery)
    }

    /// Advance one fixed step of `dt` real seconds.
    pub fn tick(&mut self, dt: f64) {
        self.playback.advance(dt, self.director.time_scale_factor());
        self.bodies.update(self.playback.elapsed(), self.config.animation.time_scale);
        self.camera = self.director.advance(self.camera, &self.bodies);

        if self.director.just_settled() {
            log::info!("camera settled on {}", self.target_name());
            self.push_event(OrreryEvent {
                kind: OrreryEvent::TRANSITION_FINISHED,
                a: self.director.mode() as f32,
                ..Default::default()
            });
        }

        self.helpers.rebuild(&self.bodies);
        self.rebuild_frame();
        self.ticks += 1;
    }

    /// Dispatch one command into the clock, the camera or the helpers.
    pub fn apply(&mut self, command: Command) {
        log::debug!("command {:?}", command);
        match command {
            Command::NextTarget => {
                self.director.next();
                self.target_changed();
            }
            Command::PrevTarget => {
                self.director.prev();
                self.target_changed();
            }
            Command::GotoTarget(index) => {
                self.director.goto(index);
                self.target_changed();
            }
            Command::TogglePause => {
                let paused = self.playback.toggle_pause();
                self.director.set_paused(paused);
                self.playback_changed();
            }
            Command::ToggleReverse => {
                self.playback.toggle_reverse();
                self.playback_changed();
            }
            Command::SpeedUp => {
                self.playback.speed_up();
                self.playback_changed();
            }
            Command::SlowDown => {
                self.playback.slow_down();
                self.playback_changed();
            }
            Command::SetMultiplier(multiplier) => {
                self.playback.set_frame_multiplier(multiplier);
                if self.playback.multiplier() != multiplier {
                    log::warn!(
                        "frame multiplier {} out of range, using {}",
                        multiplier,
                        self.playback.multiplier()
                    );
                }
                self.playback_changed();
            }
            Command::ToggleHelpers => {
                let visible = self.helpers.toggle();
                self.helpers.rebuild(&self.bodies);
                log::debug!("helpers visible: {}", visible);
            }
            Command::Orbit { yaw, pitch } => self.director.controls_mut().rotate(yaw, pitch),
            Command::Zoom(factor) => {
                if !(factor.is_finite() && factor > 0.0) {
                    log::warn!("ignoring zoom factor {}", factor);
                }
                self.director.controls_mut().zoom(factor);
            }
        }
    }

    fn target_changed(&mut self) {
        self.push_event(OrreryEvent {
            kind: OrreryEvent::TARGET_CHANGED,
            a: self.director.mode() as f32,
            ..Default::default()
        });
    }

    fn playback_changed(&mut self) {
        self.push_event(OrreryEvent {
            kind: OrreryEvent::PLAYBACK,
            a: self.playback.elapsed() as f32,
            b: self.playback.multiplier() as f32,
            c: self.playback.flags() as f32,
        });
    }

    fn push_event(&mut self, event: OrreryEvent) {
        if self.events.len() < self.config.max_events {
            self.events.push(event);
        } else {
            log::warn!("event queue full, dropping event kind {}", event.kind);
        }
    }

    fn rebuild_frame(&mut self) {
        build_frame(&self.bodies, self.camera, self.config.max_bodies, &mut self.frame);
    }

    /// Name of the body the camera is heading to or following.
    pub fn target_name(&self) -> &str {
        self.director
            .target()
            .and_then(|id| self.bodies.get(id))
            .map_or(OVERVIEW_NAME, |body| body.name())
    }

    pub fn bodies(&self) -> &BodySystem {
        &self.bodies
    }

    pub fn director(&self) -> &CameraDirector {
        &self.director
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    pub fn helpers(&self) -> &DebugHelpers {
        &self.helpers
    }

    /// Render output as of the last tick.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn events(&self) -> &[OrreryEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use crate::camera::director::CameraState;

    const DT: f64 = 1.0 / 60.0;

    fn orrery() -> Orrery {
        Orrery::new().unwrap()
    }

    fn mode_of(o: &Orrery, name: &str) -> i64 {
        let id = o.bodies().find_by_name(name).unwrap().id();
        let catalog = BodyCatalog::builtin().unwrap();
        let mut scratch = BodySystem::default();
        let targets = catalog.build(&o.config().units, &mut scratch).unwrap();
        targets.iter().position(|t| *t == id).unwrap() as i64 + 1
    }

    fn settle(o: &mut Orrery) {
        for _ in 0..=o.config().camera.transition_ticks {
            o.tick(DT);
            if !o.director().is_transitioning() {
                return;
            }
        }
        panic!("transition never resolved");
    }

    #[test]
    fn starts_in_overview() {
        let o = orrery();
        assert_eq!(o.director().mode_count(), 11);
        assert_eq!(o.target_name(), OVERVIEW_NAME);
        assert_eq!(o.frame().body_count(), 12);
        assert_eq!(o.camera(), o.config().camera.home_pose());
    }

    #[test]
    fn next_target_emits_events_and_names() {
        let mut o = orrery();
        o.apply(Command::NextTarget);
        assert_eq!(o.target_name(), "Sun");
        assert_eq!(o.events()[0].kind, OrreryEvent::TARGET_CHANGED);
        assert_eq!(o.events()[0].a, 1.0);

        settle(&mut o);
        let finished = o.events().iter().filter(|e| e.kind == OrreryEvent::TRANSITION_FINISHED).count();
        assert_eq!(finished, 1);
        o.clear_events();
        assert!(o.events().is_empty());
    }

    #[test]
    fn camera_reads_bodies_of_the_same_tick() {
        let mut o = orrery();
        o.apply(Command::GotoTarget(mode_of(&o, "Earth")));
        settle(&mut o);
        let earth = o.bodies().find_by_name("Earth").unwrap().id();
        for _ in 0..5 {
            o.tick(DT);
            assert_eq!(o.camera().look_at, o.bodies().world_position(earth).unwrap());
        }
    }

    #[test]
    fn overview_after_lock_takes_free_branch() {
        let mut o = orrery();
        o.apply(Command::GotoTarget(3));
        settle(&mut o);
        assert!(matches!(o.director().state(), CameraState::Locked { .. }));

        o.apply(Command::GotoTarget(0));
        assert!(o.director().target().is_none());
        settle(&mut o);
        assert_eq!(o.director().state(), CameraState::Overview);

        o.apply(Command::Zoom(100.0));
        for _ in 0..200 {
            o.tick(DT);
        }
        let max = o.config().camera.max_overview_distance;
        assert!(o.camera().position.length() <= max + 1e-2);
    }

    #[test]
    fn pause_freezes_bodies_and_locked_camera() {
        let mut o = orrery();
        o.apply(Command::GotoTarget(mode_of(&o, "Mars")));
        settle(&mut o);
        o.apply(Command::TogglePause);
        let mars = o.bodies().find_by_name("Mars").unwrap().id();
        let elapsed = o.playback().elapsed();
        let position = o.bodies().world_position(mars).unwrap();
        let camera = o.camera();
        for _ in 0..30 {
            o.tick(DT);
        }
        assert_eq!(o.playback().elapsed(), elapsed);
        assert_eq!(o.bodies().world_position(mars).unwrap(), position);
        assert_eq!(o.camera(), camera);
        assert_eq!(o.events().last().unwrap().c, 1.0);

        o.apply(Command::TogglePause);
        assert!(o.director().is_transitioning());
    }

    #[test]
    fn reverse_returns_to_start() {
        let mut o = orrery();
        let earth = o.bodies().find_by_name("Earth").unwrap().id();
        let start = o.bodies().world_position(earth).unwrap();
        for _ in 0..90 {
            o.tick(DT);
        }
        assert!(o.bodies().world_position(earth).unwrap().distance(start) > 1e-3);
        o.apply(Command::ToggleReverse);
        for _ in 0..90 {
            o.tick(DT);
        }
        assert!(o.playback().elapsed().abs() < 1e-9);
        assert!(o.bodies().world_position(earth).unwrap().distance(start) < 1e-2);
    }

    #[test]
    fn multiplier_is_clamped() {
        let mut o = orrery();
        o.apply(Command::SetMultiplier(0.0));
        assert_eq!(o.playback().multiplier(), 1.0 / 32.0);
        o.apply(Command::SetMultiplier(2048.0));
        assert_eq!(o.playback().multiplier(), 1024.0);
        o.apply(Command::SpeedUp);
        assert_eq!(o.playback().multiplier(), 1024.0);
        o.apply(Command::SetMultiplier(f64::NAN));
        assert_eq!(o.playback().multiplier(), 1.0 / 32.0);
        o.apply(Command::SlowDown);
        assert_eq!(o.playback().multiplier(), 1.0 / 32.0);
    }

    #[test]
    fn transition_slows_the_clock() {
        let mut o = orrery();
        o.tick(DT);
        let full_step = o.playback().elapsed();
        o.apply(Command::NextTarget);
        o.tick(DT);
        o.tick(DT);
        let before = o.playback().elapsed();
        o.tick(DT);
        let damped_step = o.playback().elapsed() - before;
        assert!(damped_step < full_step);
        assert!(damped_step > 0.0);
    }

    #[test]
    fn clock_keeps_moving_through_a_long_glide() {
        let catalog = BodyCatalog::builtin().unwrap();
        let mut config = OrreryConfig::default();
        config.camera.transition_ticks = 300;
        let mut o = Orrery::from_catalog(&catalog, config).unwrap();
        o.apply(Command::GotoTarget(4));
        let mut ticks = 0;
        while o.director().is_transitioning() {
            let before = o.playback().elapsed();
            o.tick(DT);
            assert!(o.playback().elapsed() > before, "clock stalled on tick {}", ticks);
            ticks += 1;
            assert!(ticks <= 300);
        }
    }

    #[test]
    fn helpers_follow_toggle() {
        let mut o = orrery();
        o.tick(DT);
        assert!(o.helpers().vertices().is_empty());
        o.apply(Command::ToggleHelpers);
        assert!(!o.helpers().vertices().is_empty());
        o.tick(DT);
        assert!(o.helpers().is_visible());
        o.apply(Command::ToggleHelpers);
        assert!(o.helpers().vertices().is_empty());
    }

    #[test]
    fn orbit_input_moves_overview_camera() {
        let mut o = orrery();
        let start = o.camera().position;
        o.apply(Command::Orbit { yaw: 0.5, pitch: 0.0 });
        o.tick(DT);
        let moved = o.camera().position;
        assert!(moved.distance(start) > 1e-3);
        assert!((moved.length() - start.length()).abs() < 1e-2);
        assert_eq!(o.camera().look_at, Vec3::ZERO);
    }

    #[test]
    fn unknown_target_rejected() {
        let result = Orrery::from_system(BodySystem::default(), vec![BodyId(4)], OrreryConfig::default());
        assert!(matches!(result, Err(ConfigurationError::UnknownBody(BodyId(4)))));
    }

    #[test]
    fn invalid_config_aborts_construction() {
        let catalog = BodyCatalog::builtin().unwrap();
        let config = OrreryConfig { fixed_dt: 0.0, ..OrreryConfig::default() };
        assert!(Orrery::from_catalog(&catalog, config).is_err());
    }
}
