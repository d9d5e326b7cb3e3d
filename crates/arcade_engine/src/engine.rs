//! Core engine implementation
//!
//! The engine owns the world, the game and the platform, and drives the
//! fixed per-frame sequence:
//!
//! 1. drain the remote inbox onto the event bus, poll input, run input hooks
//! 2. unless paused: update entities, run the collision pass, game update
//! 3. remove entities flagged destroyed
//! 4. render and present
//! 5. wait for the frame budget

use crate::backend::{Platform, PlatformError};
use crate::config::{ConfigError, EngineConfig};
use crate::foundation::time::{FrameLimiter, FrameTimer};
use crate::game::{Game, GameError};
use crate::input::InputEvent;
use crate::net::{RemoteInbox, RemoteSender};
use crate::physics::CollisionDetector;
use crate::render::{Color, DebugOverlay, OverlayStats};
use crate::scene::world::World;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Created, `run` or `step` not called yet
    Idle,
    /// Executing frames
    Running,
    /// Polling input and rendering, simulation frozen
    Paused,
    /// Torn down; no further frames run
    Terminated,
}

/// Main engine struct
pub struct Engine<G: Game, P: Platform> {
    world: World<G::Event>,
    game: G,
    platform: P,
    config: EngineConfig,
    state: EngineState,
    timer: FrameTimer,
    limiter: FrameLimiter,
    detector: CollisionDetector,
    overlay: DebugOverlay,
    inbox: RemoteInbox<G::Event>,
    last_collisions: usize,
}

impl<G: Game, P: Platform> Engine<G, P> {
    /// Create a new engine instance
    ///
    /// The configuration is validated here; the platform is opened when the
    /// loop starts.
    pub fn new(config: EngineConfig, game: G, platform: P) -> Result<Self, EngineError> {
        config.validate()?;

        let mut world = World::new(config.level.width, config.level.height);
        world.set_debug(config.debug);

        Ok(Self {
            world,
            game,
            platform,
            timer: FrameTimer::new(config.max_delta),
            limiter: FrameLimiter::new(config.target_fps),
            detector: CollisionDetector::new(config.collision_policy),
            overlay: DebugOverlay::new(),
            inbox: RemoteInbox::new(),
            state: EngineState::Idle,
            last_collisions: 0,
            config,
        })
    }

    /// Open the platform and initialize the game
    ///
    /// Called by `run`, or implicitly by the first `step`.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Idle => {}
            EngineState::Running | EngineState::Paused => return Ok(()),
            EngineState::Terminated => return Err(EngineError::Terminated),
        }

        log::info!("Initializing engine...");
        if let Err(err) = self.platform.open(&self.config.display) {
            log::error!("Failed to open platform: {err}");
            self.state = EngineState::Terminated;
            return Err(err.into());
        }

        self.world.begin_phase();
        let init = self.game.init(&mut self.world);
        self.world.end_phase();
        if let Err(err) = init {
            log::error!("Game initialization failed: {err}");
            self.shutdown();
            return Err(EngineError::InitializationFailed(format!("Game initialization: {err}")));
        }

        self.state = EngineState::Running;
        self.sync_state();
        self.timer.reset();
        log::info!(
            "Engine started: {} entities, level {}x{}, target {} fps",
            self.world.entity_count(),
            self.config.level.width,
            self.config.level.height,
            self.config.target_fps
        );
        Ok(())
    }

    /// Run the main loop until a quit is requested
    pub fn run(&mut self) -> Result<(), EngineError> {
        self.start()?;

        log::info!("Starting main loop...");
        while self.is_active() {
            self.limiter.begin_frame();
            let delta_time = self.timer.tick();
            self.advance(delta_time)?;
            self.limiter.wait();
        }
        Ok(())
    }

    /// Run exactly one frame with an externally measured elapsed time
    pub fn step(&mut self, elapsed: f32) -> Result<(), EngineError> {
        if self.state == EngineState::Idle {
            self.start()?;
        }
        if self.state == EngineState::Terminated {
            log::debug!("step() after termination ignored");
            return Ok(());
        }
        let delta_time = self.timer.record(elapsed);
        self.advance(delta_time)
    }

    /// Request the loop to stop at the end of the current frame
    pub fn quit(&mut self) {
        self.world.request_quit();
    }

    /// Pause or resume the simulation
    pub fn set_paused(&mut self, paused: bool) {
        self.world.set_paused(paused);
        self.sync_state();
    }

    /// Producer handle for events coming from other threads
    pub fn remote_sender(&self) -> RemoteSender<G::Event> {
        self.inbox.sender()
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Running or paused
    pub fn is_active(&self) -> bool {
        matches!(self.state, EngineState::Running | EngineState::Paused)
    }

    /// The world
    pub fn world(&self) -> &World<G::Event> {
        &self.world
    }

    /// The world, mutably
    pub fn world_mut(&mut self) -> &mut World<G::Event> {
        &mut self.world
    }

    /// The game
    pub fn game(&self) -> &G {
        &self.game
    }

    /// The game, mutably
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// The platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Session configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Overlapping pairs found by the last collision pass
    pub fn last_collision_count(&self) -> usize {
        self.last_collisions
    }

    /// One frame inside the panic boundary, then quit handling
    fn advance(&mut self, delta_time: f32) -> Result<(), EngineError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.frame(delta_time)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                log::error!("Frame {} failed: {err}", self.timer.frame_count());
                self.shutdown();
                return Err(err);
            }
            Err(payload) => {
                log::error!(
                    "Frame {} panicked: {}; shutting down",
                    self.timer.frame_count(),
                    panic_message(payload.as_ref())
                );
                self.world.reset_phases();
                self.world.request_quit();
            }
        }

        self.sync_state();
        if self.world.quit_requested() {
            self.shutdown();
        }
        Ok(())
    }

    fn frame(&mut self, delta_time: f32) -> Result<(), EngineError> {
        self.world.set_delta_time(delta_time);

        self.world.begin_phase();
        for event in self.inbox.drain() {
            self.world.emit(event);
        }
        let events = self.platform.poll_events();
        for event in &events {
            self.handle_engine_input(event);
            report_hook("input", self.game.on_input_event(&mut self.world, event));
        }
        if self.platform.input_state().is_held(self.config.controls.quit) {
            self.world.request_quit();
        }
        if !self.world.is_paused() {
            let input = self.platform.input_state();
            report_hook("continuous input", self.game.on_continuous_input(&mut self.world, input));
        }
        self.world.end_phase();
        self.sync_state();

        if !self.world.is_paused() {
            self.world.update_entities();
            self.last_collisions = self.detector.run(&mut self.world).overlaps.len();
            self.world.begin_phase();
            report_hook("update", self.game.on_update(&mut self.world));
            self.world.end_phase();
        }

        self.world.collect_destroyed();
        self.render()
    }

    fn handle_engine_input(&mut self, event: &InputEvent) {
        let controls = self.config.controls;
        match *event {
            InputEvent::CloseRequested => {
                log::info!("Close requested");
                self.world.request_quit();
            }
            InputEvent::KeyDown(key) if key == controls.pause => {
                self.world.toggle_pause();
            }
            InputEvent::KeyDown(key) if key == controls.debug_overlay => {
                self.world.toggle_debug();
                log::info!("Debug overlay {}", if self.world.debug_enabled() { "on" } else { "off" });
            }
            _ => {}
        }
    }

    fn render(&mut self) -> Result<(), EngineError> {
        let surface = self.platform.surface();
        let stats = OverlayStats {
            fps: self.timer.fps(),
            target_fps: self.config.target_fps,
            delta_time: self.world.delta_time(),
            window: surface.size(),
            collisions: self.last_collisions,
        };

        surface.clear(Color::BLACK);
        report_hook("background render", self.game.render_background(&self.world, surface));
        for entity in self.world.registry().iter() {
            if entity.core.is_visible() {
                entity.behavior.draw(&entity.core, surface);
            }
        }
        if self.world.debug_enabled() {
            self.overlay.draw(&self.world, &stats, surface);
        }
        report_hook("foreground render", self.game.render_foreground(&self.world, surface));

        self.platform.present()?;
        Ok(())
    }

    fn sync_state(&mut self) {
        let next = match self.state {
            EngineState::Running | EngineState::Paused if self.world.is_paused() => EngineState::Paused,
            EngineState::Running | EngineState::Paused => EngineState::Running,
            other => other,
        };
        if next != self.state {
            log::info!("Engine state: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Cleanup hook, clear the world, release the platform
    fn shutdown(&mut self) {
        if self.state == EngineState::Terminated {
            return;
        }
        log::info!("Shutting down after {} frames", self.timer.frame_count());
        self.world.reset_phases();

        let cleanup = panic::catch_unwind(AssertUnwindSafe(|| self.game.cleanup(&mut self.world)));
        match cleanup {
            Ok(result) => report_hook("cleanup", result),
            Err(payload) => log::error!("Cleanup panicked: {}", panic_message(payload.as_ref())),
        }

        self.world.clear();
        self.platform.shutdown();
        self.state = EngineState::Terminated;
        log::info!("Engine shutdown complete");
    }
}

fn report_hook(phase: &str, result: Result<(), GameError>) {
    if let Err(err) = result {
        log::error!("{phase} hook failed: {err}");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Window, surface or presentation failure
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine has already shut down
    #[error("Engine already terminated")]
    Terminated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DrawCommand, HeadlessPlatform};
    use crate::events::EventHandler;
    use crate::foundation::math::Vec2;
    use crate::input::{InputState, KeyCode};
    use crate::render::Surface;
    use crate::scene::behavior::{CollisionResponder, Drawable, EventListener, Updatable};
    use crate::scene::entity::{Entity, EntityCore, EntityId, Hitbox, TypeTag};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const BALL: TypeTag = TypeTag::new("ball");

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Remote(u32),
    }

    struct Ball;

    impl Updatable<Ping> for Ball {}
    impl CollisionResponder<Ping> for Ball {}
    impl EventListener<Ping> for Ball {}
    impl Drawable for Ball {
        fn draw(&self, core: &EntityCore, surface: &mut dyn Surface) {
            surface.draw_sprite("ball", core.position(), core.rotation());
        }
    }

    struct RemoteLog(Rc<RefCell<Vec<u32>>>);

    impl EventHandler<Ping> for RemoteLog {
        fn on_game_event(&mut self, event: &Ping, _world: &mut World<Ping>) -> bool {
            let Ping::Remote(value) = event;
            self.0.borrow_mut().push(*value);
            true
        }
    }

    #[derive(Default)]
    struct TestGame {
        ball: Option<EntityId>,
        updates: u32,
        held_frames: u32,
        cleanups: u32,
        fail_update: bool,
        panic_at_update: Option<u32>,
        remote: Rc<RefCell<Vec<u32>>>,
    }

    impl Game for TestGame {
        type Event = Ping;

        fn init(&mut self, world: &mut World<Ping>) -> Result<(), GameError> {
            let core = EntityCore::new(BALL, Vec2::new(10.0, 10.0))
                .with_velocity(Vec2::new(10.0, 0.0))
                .with_hitbox(Hitbox::new(4.0, 4.0)?);
            self.ball = Some(core.id());
            world.register(Entity::new(core, Ball));
            world.set_event_handler(Box::new(RemoteLog(self.remote.clone())));
            Ok(())
        }

        fn on_continuous_input(&mut self, _world: &mut World<Ping>, input: &InputState) -> Result<(), GameError> {
            if input.is_held(KeyCode::Space) {
                self.held_frames += 1;
            }
            Ok(())
        }

        fn on_update(&mut self, _world: &mut World<Ping>) -> Result<(), GameError> {
            self.updates += 1;
            if self.panic_at_update == Some(self.updates) {
                panic!("update exploded");
            }
            if self.fail_update {
                return Err(GameError::GameLogic("scripted failure".to_string()));
            }
            Ok(())
        }

        fn render_background(&mut self, _world: &World<Ping>, surface: &mut dyn Surface) -> Result<(), GameError> {
            surface.draw_text("background", Vec2::zeros(), Color::WHITE);
            Ok(())
        }

        fn render_foreground(&mut self, _world: &World<Ping>, surface: &mut dyn Surface) -> Result<(), GameError> {
            surface.draw_text("foreground", Vec2::zeros(), Color::WHITE);
            Ok(())
        }

        fn cleanup(&mut self, world: &mut World<Ping>) -> Result<(), GameError> {
            self.cleanups += 1;
            assert_eq!(world.count_by_type(BALL), 1);
            Ok(())
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::default().with_target_fps(0)
    }

    fn engine(game: TestGame, platform: HeadlessPlatform) -> Engine<TestGame, HeadlessPlatform> {
        Engine::new(config(), game, platform).unwrap()
    }

    fn ball_x(engine: &Engine<TestGame, HeadlessPlatform>) -> f32 {
        let id = engine.game().ball.unwrap();
        engine.world().core(id).unwrap().position().x
    }

    #[test]
    fn test_run_until_script_ends() {
        let platform = HeadlessPlatform::new().with_script(vec![vec![], vec![], vec![]]);
        let mut engine = engine(TestGame::default(), platform);
        engine.run().unwrap();

        assert_eq!(engine.state(), EngineState::Terminated);
        assert_eq!(engine.game().cleanups, 1);
        assert_eq!(engine.world().entity_count(), 0);
        assert!(engine.platform().is_shut_down());
        assert_eq!(engine.platform().frames_presented(), 4);
    }

    #[test]
    fn test_step_moves_by_delta_time() {
        let mut engine = engine(TestGame::default(), HeadlessPlatform::new());
        engine.step(0.05).unwrap();
        engine.step(0.05).unwrap();
        assert_relative_eq!(ball_x(&engine), 11.0, epsilon = 1e-5);
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut engine = engine(TestGame::default(), HeadlessPlatform::new());
        engine.step(5.0).unwrap();
        assert_relative_eq!(engine.world().delta_time(), 0.2);
        assert_relative_eq!(ball_x(&engine), 12.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pause_freezes_simulation_but_renders() {
        let mut platform = HeadlessPlatform::new();
        platform.push_frame(vec![InputEvent::KeyDown(KeyCode::P)]);
        let mut engine = engine(TestGame::default(), platform);

        engine.step(0.1).unwrap();
        assert_eq!(engine.state(), EngineState::Paused);
        engine.step(0.1).unwrap();
        assert_relative_eq!(ball_x(&engine), 10.0);
        assert_eq!(engine.game().updates, 0);
        assert_eq!(engine.platform().frames_presented(), 2);

        engine.set_paused(false);
        engine.step(0.1).unwrap();
        assert_eq!(engine.state(), EngineState::Running);
        assert_relative_eq!(ball_x(&engine), 11.0, epsilon = 1e-5);
    }

    #[test]
    fn test_render_order() {
        let mut engine = engine(TestGame::default(), HeadlessPlatform::new());
        engine.step(0.01).unwrap();

        let frame = engine.platform().recording().last_frame();
        assert_eq!(frame[0], DrawCommand::Clear(Color::BLACK));
        assert!(matches!(&frame[1], DrawCommand::Text { text, .. } if text == "background"));
        assert!(matches!(&frame[2], DrawCommand::Sprite { sprite, .. } if sprite == "ball"));
        assert!(matches!(&frame[3], DrawCommand::Text { text, .. } if text == "foreground"));
        assert_eq!(frame.len(), 4);
    }

    #[test]
    fn test_hidden_entities_not_drawn() {
        let mut engine = engine(TestGame::default(), HeadlessPlatform::new());
        engine.start().unwrap();
        let id = engine.game().ball.unwrap();
        engine.world_mut().core_mut(id).unwrap().set_visible(false);
        engine.step(0.01).unwrap();
        assert!(engine.platform().recording().sprites().is_empty());
    }

    #[test]
    fn test_debug_key_toggles_overlay() {
        let mut platform = HeadlessPlatform::new();
        platform.push_frame(vec![InputEvent::KeyDown(KeyCode::F3)]);
        platform.push_frame(vec![InputEvent::KeyDown(KeyCode::F3)]);
        let mut engine = engine(TestGame::default(), platform);

        engine.step(0.016).unwrap();
        let recording = engine.platform().recording();
        assert!(recording.texts().iter().any(|text| text.starts_with("FPS:")));
        assert!(recording.texts().iter().any(|text| *text == "Level: 400x300 => Window: 800x600"));
        assert!(recording
            .last_frame()
            .iter()
            .any(|command| matches!(command, DrawCommand::StrokeRect { color, .. } if *color == Color::YELLOW)));

        engine.step(0.016).unwrap();
        assert!(!engine.platform().recording().texts().iter().any(|text| text.starts_with("FPS:")));
    }

    #[test]
    fn test_hook_error_keeps_running() {
        let game = TestGame {
            fail_update: true,
            ..TestGame::default()
        };
        let mut engine = engine(game, HeadlessPlatform::new());
        engine.step(0.1).unwrap();
        engine.step(0.1).unwrap();
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.game().updates, 2);
        assert_eq!(engine.platform().frames_presented(), 2);
    }

    #[test]
    fn test_panic_terminates_orderly() {
        let game = TestGame {
            panic_at_update: Some(2),
            ..TestGame::default()
        };
        let mut engine = engine(game, HeadlessPlatform::new().with_frame_limit(100));
        engine.run().unwrap();
        assert_eq!(engine.state(), EngineState::Terminated);
        assert_eq!(engine.game().cleanups, 1);
        assert!(engine.platform().is_shut_down());
        assert_eq!(engine.frame_count(), 2);

        engine.step(0.1).unwrap();
        assert_eq!(engine.frame_count(), 2);
    }

    #[test]
    fn test_platform_failure_is_fatal() {
        let platform = HeadlessPlatform::new().with_open_failure("no display");
        let mut engine = engine(TestGame::default(), platform);
        let result = engine.run();
        assert!(matches!(result, Err(EngineError::Platform(PlatformError::SurfaceCreation(_)))));
        assert_eq!(engine.state(), EngineState::Terminated);
        assert_eq!(engine.game().cleanups, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = config().with_level_size(0, 300);
        let result = Engine::new(config, TestGame::default(), HeadlessPlatform::new());
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_held_quit_key_stops_loop() {
        let mut platform = HeadlessPlatform::new();
        platform.push_frame(vec![]);
        platform.push_frame(vec![InputEvent::KeyDown(KeyCode::Escape)]);
        let mut engine = engine(TestGame::default(), platform);
        engine.run().unwrap();
        assert_eq!(engine.frame_count(), 2);
        assert_eq!(engine.state(), EngineState::Terminated);
    }

    #[test]
    fn test_continuous_input_sees_held_keys() {
        let mut platform = HeadlessPlatform::new();
        platform.push_frame(vec![InputEvent::KeyDown(KeyCode::Space)]);
        platform.push_frame(vec![]);
        platform.push_frame(vec![InputEvent::KeyUp(KeyCode::Space)]);
        let mut engine = engine(TestGame::default(), platform);
        for _ in 0..3 {
            engine.step(0.016).unwrap();
        }
        assert_eq!(engine.game().held_frames, 2);
    }

    #[test]
    fn test_remote_events_drained_at_frame_start() {
        let mut engine = engine(TestGame::default(), HeadlessPlatform::new());
        let sender = engine.remote_sender();
        let producer = std::thread::spawn(move || {
            sender.send(Ping::Remote(1)).unwrap();
            sender.send(Ping::Remote(2)).unwrap();
        });
        producer.join().unwrap();

        assert!(engine.game().remote.borrow().is_empty());
        engine.step(0.016).unwrap();
        assert_eq!(*engine.game().remote.borrow(), vec![1, 2]);
    }
}
