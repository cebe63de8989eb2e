//! Fixed timestep simulation loop
//!
//! Driven by an external tick scheduler: the scheduler calls
//! [`Simulation::frame`] once per display refresh and re-arms itself while
//! the returned [`Schedule`] says so.

use super::collision::CollisionEngine;
use super::input::InputState;
use super::level::LevelDescriptor;
use super::movement::MoveEngine;
use super::objects::ObjectManager;
use super::state::{GameEvent, GamePhase, PlayField};
use crate::audio::{AudioSink, SoundCue};
use crate::error::SimError;
use crate::render::Renderer;
use crate::settings::Settings;

/// Whether the scheduler should call back next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Stop,
}

/// Owns the registry and both engines and advances them in fixed ticks
pub struct Simulation {
    settings: Settings,
    objects: ObjectManager,
    movement: MoveEngine,
    collision: CollisionEngine,
    audio: Box<dyn AudioSink>,
    phase: GamePhase,
    scheduled: bool,
    /// Timestamp the carried-over remainder is measured from
    last_time_ms: f64,
    /// Due ticks run since the last start
    ticks: u64,
    /// Events of the most recent due tick
    events: Vec<GameEvent>,
}

impl Simulation {
    /// A simulation with nothing loaded. Reports `GameOver` and stays
    /// unscheduled until [`start`](Self::start).
    pub fn new(settings: Settings, field: PlayField, audio: Box<dyn AudioSink>) -> Self {
        let settings = settings.sanitized();
        Self {
            collision: CollisionEngine::new(&settings),
            movement: MoveEngine::new(),
            objects: ObjectManager::new(field),
            settings,
            audio,
            phase: GamePhase::GameOver,
            scheduled: false,
            last_time_ms: 0.0,
            ticks: 0,
            events: Vec::new(),
        }
    }

    /// Load a level and enter `Running`.
    ///
    /// On an invalid descriptor the error is returned and the previous
    /// level, phase and schedule are left as they were.
    pub fn start(&mut self, level: Option<&LevelDescriptor>, now_ms: f64) -> Result<(), SimError> {
        self.objects.init_all(level)?;

        self.collision = CollisionEngine::new(&self.settings);
        self.phase = GamePhase::Running;
        self.scheduled = true;
        self.last_time_ms = now_ms;
        self.ticks = 0;
        self.events.clear();

        self.audio.stop(SoundCue::Music);
        self.audio.play(SoundCue::GameStart);
        self.audio.play(SoundCue::Music);
        log::info!(
            "Game started ({} active bricks, {} sub-steps per tick)",
            self.objects.active_brick_count(),
            self.settings.substeps
        );
        Ok(())
    }

    /// Scheduler callback. Runs one due tick if a full interval has passed
    /// since the last one; the remainder carries over to the next call.
    ///
    /// A due tick replaces the pending events with its own, so callers that
    /// want every event drain after each call.
    pub fn frame(
        &mut self,
        now_ms: f64,
        input: &InputState,
        renderer: &mut dyn Renderer,
    ) -> Schedule {
        if !self.scheduled {
            return Schedule::Stop;
        }

        let interval = self.settings.tick_interval_ms;
        let elapsed = now_ms - self.last_time_ms;
        if elapsed <= interval {
            return Schedule::Continue;
        }

        self.events.clear();
        renderer.draw_static(&self.objects);

        for _ in 0..self.settings.substeps {
            self.movement.move_all(&mut self.objects, input);

            if self.objects.ball_count() == 0 {
                self.game_over();
                return Schedule::Stop;
            }

            let events = self.collision.collide_all(&mut self.objects);
            self.events.extend(events);
        }

        renderer.draw_dynamic(&self.objects);

        self.ticks += 1;
        self.last_time_ms = now_ms - elapsed % interval;
        Schedule::Continue
    }

    /// Stop scheduling at the current tick boundary; phase is unchanged
    pub fn cancel(&mut self) {
        if self.scheduled {
            log::info!("Scheduling cancelled after {} ticks", self.ticks);
        }
        self.scheduled = false;
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.scheduled = false;
        self.audio.stop(SoundCue::Music);
        self.audio.play(SoundCue::GameOver);
        log::info!(
            "Game over after {} ticks ({} bricks left)",
            self.ticks,
            self.objects.active_brick_count()
        );
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.objects
    }

    /// Events of the last due tick not yet drained, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
