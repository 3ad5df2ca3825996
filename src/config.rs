//! Round configuration
//!
//! Everything a round needs is enumerated here and checked once at round
//! start. Loadable from JSON so variants can be tried without a rebuild.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::{Cell, Direction, PowerUpKind};

/// Initial placement of one snake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeSpawn {
    pub head: Cell,
    pub direction: Direction,
    pub length: usize,
    pub color: u32,
}

impl SnakeSpawn {
    /// Cells of the initial body, head first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let back = self.direction.opposite().delta();
        (0..self.length as i32).map(move |i| self.head + back * i)
    }
}

/// Per-type power-up parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpSpec {
    /// Display colour (presentation only)
    pub color: u32,
    /// Effect duration; ignored for instant types
    pub duration_ms: u64,
    /// Applied once on pickup instead of being tracked as an active effect
    pub instant: bool,
}

/// Power-up type table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpTable {
    pub ghost: PowerUpSpec,
    pub shield: PowerUpSpec,
    pub freeze: PowerUpSpec,
    pub speed: PowerUpSpec,
    pub shrink: PowerUpSpec,
}

impl PowerUpTable {
    pub fn get(&self, kind: PowerUpKind) -> &PowerUpSpec {
        match kind {
            PowerUpKind::Ghost => &self.ghost,
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::Freeze => &self.freeze,
            PowerUpKind::Speed => &self.speed,
            PowerUpKind::Shrink => &self.shrink,
        }
    }
}

impl Default for PowerUpTable {
    fn default() -> Self {
        let timed = |color, duration_ms| PowerUpSpec {
            color,
            duration_ms,
            instant: false,
        };
        Self {
            ghost: timed(0xbdc3c7, 5000),
            shield: timed(0xf39c12, 5000),
            freeze: timed(0x00bcd4, 3000),
            speed: timed(0xffeb3b, 5000),
            shrink: PowerUpSpec {
                color: 0xff4081,
                duration_ms: 0,
                instant: true,
            },
        }
    }
}

/// Full round setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    pub cols: i32,
    pub rows: i32,

    // === Territory ===
    pub boundary_min: i32,
    pub boundary_max: i32,
    pub boundary_shift: i32,

    // === Snakes ===
    pub snakes: [SnakeSpawn; 2],
    /// Base tick interval (ms)
    pub tick_delay_ms: u64,
    /// One-shot delay before the results phase, for the presentation layer
    pub results_delay_ms: u64,

    // === Power-ups ===
    pub power_up_spawn_interval_ms: u64,
    pub power_up_lifetime_ms: u64,
    pub max_world_power_ups: usize,
    /// Own SPEED effect: tick interval scaled by this percent (< 100)
    pub speed_percent: u32,
    /// Opponent FREEZE effect: tick interval scaled by this percent (> 100)
    pub freeze_percent: u32,
    pub power_ups: PowerUpTable,

    // === Food ===
    pub food_palette: Vec<u32>,

    /// Round RNG seed
    pub seed: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,

            boundary_min: BOUNDARY_INSET,
            boundary_max: GRID_COLS - BOUNDARY_INSET,
            boundary_shift: BOUNDARY_SHIFT,

            snakes: [
                SnakeSpawn {
                    head: IVec2::new(5, 5),
                    direction: Direction::Right,
                    length: START_LENGTH,
                    color: PLAYER_ONE_COLOR,
                },
                SnakeSpawn {
                    head: IVec2::new(30, 15),
                    direction: Direction::Right,
                    length: START_LENGTH,
                    color: PLAYER_TWO_COLOR,
                },
            ],
            tick_delay_ms: TICK_DELAY_MS,
            results_delay_ms: RESULTS_DELAY_MS,

            power_up_spawn_interval_ms: POWER_UP_SPAWN_INTERVAL_MS,
            power_up_lifetime_ms: POWER_UP_LIFETIME_MS,
            max_world_power_ups: MAX_WORLD_POWER_UPS,
            speed_percent: SPEED_PERCENT,
            freeze_percent: FREEZE_PERCENT,
            power_ups: PowerUpTable::default(),

            food_palette: FOOD_PALETTE.to_vec(),

            seed: 0,
        }
    }
}

impl RoundConfig {
    /// Default setup with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse from JSON. Missing fields are an error; the result is validated.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded round config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Boundary column at round start
    pub fn boundary_start(&self) -> i32 {
        (self.cols / 2).clamp(self.boundary_min, self.boundary_max)
    }

    /// Food colours left after excluding both snake colours
    pub fn food_colors(&self) -> Vec<u32> {
        self.food_palette
            .iter()
            .copied()
            .filter(|c| self.snakes.iter().all(|s| s.color != *c))
            .collect()
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(SimError::invalid(format!(
                "grid must be positive, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.boundary_min < 1 || self.boundary_max > self.cols - 2 {
            return Err(SimError::invalid(format!(
                "boundary range [{}, {}] leaves no playable width in {} columns",
                self.boundary_min, self.boundary_max, self.cols
            )));
        }
        if self.boundary_min > self.boundary_max {
            return Err(SimError::invalid(format!(
                "boundary_min {} exceeds boundary_max {}",
                self.boundary_min, self.boundary_max
            )));
        }
        if self.boundary_shift < 1 {
            return Err(SimError::invalid("boundary_shift must be at least 1"));
        }
        if self.tick_delay_ms == 0 {
            return Err(SimError::invalid("tick_delay_ms must be positive"));
        }
        if self.power_up_lifetime_ms == 0 || self.power_up_spawn_interval_ms == 0 {
            return Err(SimError::invalid("power-up lifetime and spawn interval must be positive"));
        }
        if self.speed_percent == 0 || self.speed_percent >= 100 {
            return Err(SimError::invalid("speed_percent must be in 1..100"));
        }
        if self.freeze_percent <= 100 {
            return Err(SimError::invalid("freeze_percent must exceed 100"));
        }
        if self.food_colors().is_empty() {
            return Err(SimError::invalid("food palette has no colour distinct from the snakes"));
        }

        for kind in PowerUpKind::ALL {
            let spec = self.power_ups.get(kind);
            if spec.instant != (kind == PowerUpKind::Shrink) {
                return Err(SimError::invalid(format!(
                    "{kind:?} cannot have instant = {}",
                    spec.instant
                )));
            }
            if !spec.instant && spec.duration_ms == 0 {
                return Err(SimError::invalid(format!("{kind:?} needs a non-zero duration")));
            }
        }

        let boundary = self.boundary_start();
        for (i, spawn) in self.snakes.iter().enumerate() {
            if spawn.length == 0 {
                return Err(SimError::invalid(format!("snake {} has zero length", i + 1)));
            }
            // A straight starting body can't be longer than the grid's long side
            let longest = self.cols.max(self.rows) as usize;
            if spawn.length > longest {
                return Err(SimError::invalid(format!(
                    "snake {} length {} exceeds the grid ({longest} cells)",
                    i + 1,
                    spawn.length
                )));
            }
            for cell in spawn.cells() {
                if cell.x < 0 || cell.x >= self.cols || cell.y < 0 || cell.y >= self.rows {
                    return Err(SimError::invalid(format!(
                        "snake {} starts outside the grid at {cell}",
                        i + 1
                    )));
                }
                if cell.x == boundary {
                    return Err(SimError::invalid(format!(
                        "snake {} starts on the boundary column {boundary}",
                        i + 1
                    )));
                }
            }
        }
        let mut seen: Vec<Cell> = Vec::new();
        for cell in self.snakes.iter().flat_map(|s| s.cells()) {
            if seen.contains(&cell) {
                return Err(SimError::invalid(format!("snake bodies overlap at {cell}")));
            }
            seen.push(cell);
        }

        Ok(())
    }
}
