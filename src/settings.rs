//! Game settings and tuning
//!
//! Loaded from a JSON file; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PowerupKind;

/// Simulation tuning plus audio preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Loop ===
    /// Fixed tick interval in milliseconds
    pub tick_interval_ms: f64,
    /// Movement + collision passes per due tick
    pub substeps: u32,
    /// Seed for power-up spawning
    pub seed: u64,

    // === Physics ===
    /// Maximum paddle deflection from straight up (radians)
    pub max_bounce_angle: f32,

    // === Power-ups ===
    /// Chance a breaking brick drops a power-up (0.0 - 1.0)
    pub powerup_spawn_chance: f64,
    /// Kinds a dropped power-up is drawn from (uniformly)
    pub powerup_kinds: Vec<PowerupKind>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            substeps: SUBSTEPS,
            seed: 0,

            max_bounce_angle: MAX_BOUNCE_ANGLE,

            powerup_spawn_chance: POWERUP_SPAWN_CHANCE,
            powerup_kinds: PowerupKind::ALL.to_vec(),

            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let settings = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| serde_json::from_str::<Settings>(&json).map_err(|e| e.to_string()));

        match settings {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values into usable ranges
    pub fn sanitized(mut self) -> Self {
        if !(self.tick_interval_ms.is_finite() && self.tick_interval_ms > 0.0) {
            log::warn!(
                "Invalid tick interval {}, using {}",
                self.tick_interval_ms,
                TICK_INTERVAL_MS
            );
            self.tick_interval_ms = TICK_INTERVAL_MS;
        }
        self.substeps = self.substeps.max(1);
        self.max_bounce_angle = self
            .max_bounce_angle
            .clamp(0.0, std::f32::consts::FRAC_PI_2 - 0.01);
        self.powerup_spawn_chance = self.powerup_spawn_chance.clamp(0.0, 1.0);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Sub-steps a widened paddle keeps its width at this tick rate
    pub fn widen_substeps(&self) -> u32 {
        let ticks = (WIDEN_DURATION_MS / self.tick_interval_ms).round().max(1.0) as u32;
        ticks.saturating_mul(self.substeps.max(1))
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
