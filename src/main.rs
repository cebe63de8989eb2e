//! Brickfall headless runner
//!
//! Plays one level against a virtual display clock with the demo-mode
//! autopilot steering the paddle. Drawing and audio go to the log.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use brickfall::audio::{AudioCommand, AudioManager, AudioSink, SoundCue};
use brickfall::render::Renderer;
use brickfall::settings::Settings;
use brickfall::sim::{
    GameEvent, GamePhase, InputState, LEVEL_NAMES, LevelDescriptor, ObjectManager, PlayField,
    Schedule, Simulation,
};

#[derive(Parser, Debug)]
#[command(name = "brickfall", version, about = "Run a brick-breaker level headless")]
struct Args {
    /// Level descriptor (JSON); the default layout is used when omitted
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Seed for power-up drops, overrides the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Display frames to run before giving up
    #[arg(long, default_value_t = 36_000)]
    frames: u64,

    /// Display refresh rate of the virtual clock
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Print the shipped level names and exit
    #[arg(long)]
    list_levels: bool,
}

/// Audio manager whose backend is the log
struct LoggedAudio(AudioManager);

impl LoggedAudio {
    fn flush(&mut self) {
        for command in self.0.drain() {
            match command {
                AudioCommand::Play {
                    cue,
                    volume,
                    looping,
                } => log::info!(
                    "audio: play {:?} (volume {:.2}{})",
                    cue,
                    volume,
                    if looping { ", looped" } else { "" }
                ),
                AudioCommand::Stop { cue } => log::debug!("audio: stop {:?}", cue),
            }
        }
    }
}

impl AudioSink for LoggedAudio {
    fn play(&mut self, cue: SoundCue) {
        self.0.play(cue);
        self.flush();
    }

    fn stop(&mut self, cue: SoundCue) {
        self.0.stop(cue);
        self.flush();
    }
}

#[derive(Default)]
struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw_static(&mut self, objects: &ObjectManager) {
        self.frames += 1;
        log::trace!(
            "frame {}: {} walls, {} active bricks",
            self.frames,
            objects.walls().len(),
            objects.active_brick_count()
        );
    }

    fn draw_dynamic(&mut self, objects: &ObjectManager) {
        let paddle = objects.paddle();
        log::trace!(
            "frame {}: paddle x={:.1} w={:.0}, {} balls, {} power-ups",
            self.frames,
            paddle.x,
            paddle.width,
            objects.ball_count(),
            objects.powerups().len()
        );
    }
}

#[derive(Debug, Default)]
struct Tally {
    bricks: u32,
    paddle_hits: u32,
    powerups_caught: u32,
    powerups_missed: u32,
    balls_lost: u32,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BrickBroken { ball, column, row } => {
                self.bricks += 1;
                log::debug!("ball {} broke brick ({}, {})", ball, column, row);
            }
            GameEvent::PaddleBounce { .. } => self.paddle_hits += 1,
            GameEvent::PowerupCaught { kind, .. } => {
                self.powerups_caught += 1;
                log::info!("caught {:?}", kind);
            }
            GameEvent::PowerupMissed { .. } => self.powerups_missed += 1,
            GameEvent::BallLost { ball } => {
                self.balls_lost += 1;
                log::info!("ball {} lost", ball);
            }
            GameEvent::WallBounce { .. } | GameEvent::PowerupSpawned { .. } => {}
        }
    }
}

fn load_level(path: &Path) -> Result<LevelDescriptor> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    let level = LevelDescriptor::from_json(&json)
        .with_context(|| format!("failed to decode level {}", path.display()))?;
    Ok(level)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_levels {
        for (index, name) in LEVEL_NAMES.iter().enumerate() {
            println!("{:2}. {}", index + 1, name);
        }
        return Ok(());
    }

    let mut settings = args
        .settings
        .as_deref()
        .map(Settings::load_from)
        .unwrap_or_default();
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let level = args.level.as_deref().map(load_level).transpose()?;
    let title = level
        .as_ref()
        .and_then(|l| l.name.clone())
        .unwrap_or_else(|| "default layout".to_string());

    let audio = LoggedAudio(AudioManager::from_settings(&settings));
    let mut sim = Simulation::new(settings, PlayField::default(), Box::new(audio));
    sim.start(level.as_ref(), 0.0)
        .with_context(|| format!("failed to load {}", title))?;
    log::info!("Playing {}", title);

    let frame_ms = 1000.0 / args.fps.max(1.0);
    let mut input = InputState::default();
    let mut renderer = LogRenderer::default();
    let mut tally = Tally::default();
    let mut cleared = false;

    for frame in 1..=args.frames {
        input = input.track(sim.objects());
        let schedule = sim.frame(frame as f64 * frame_ms, &input, &mut renderer);

        for event in sim.drain_events() {
            tally.record(&event);
        }

        if schedule == Schedule::Stop {
            break;
        }
        if sim.objects().active_brick_count() == 0 {
            cleared = true;
            sim.cancel();
            break;
        }
    }

    let outcome = match (cleared, sim.phase()) {
        (true, _) => "cleared",
        (false, GamePhase::GameOver) => "game over",
        (false, GamePhase::Running) => "out of frames",
    };
    log::info!(
        "{} after {} ticks: {} bricks broken ({} left), {} paddle hits, {} power-ups caught, {} missed, {} balls lost",
        outcome,
        sim.ticks(),
        tally.bricks,
        sim.objects().active_brick_count(),
        tally.paddle_hits,
        tally.powerups_caught,
        tally.powerups_missed,
        tally.balls_lost
    );
    println!("{}: {} ({} ticks)", title, outcome, sim.ticks());

    Ok(())
}
