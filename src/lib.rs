//! Duel Snake - two-player territory snake on a shared grid
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (movement, collisions, territory, power-ups)
//! - `config`: Data-driven round setup and validation
//! - `error`: Error taxonomy for setup and spawning

pub mod config;
pub mod error;
pub mod sim;

pub use config::{PowerUpSpec, RoundConfig, SnakeSpawn};
pub use error::SimError;

/// Reference game constants
pub mod consts {
    /// Grid dimensions (800x600 canvas at 20px cells)
    pub const GRID_COLS: i32 = 40;
    pub const GRID_ROWS: i32 = 30;

    /// Boundary keeps at least this many columns for each player
    pub const BOUNDARY_INSET: i32 = 5;
    /// Columns the boundary moves per food eaten
    pub const BOUNDARY_SHIFT: i32 = 1;

    /// Starting snake length
    pub const START_LENGTH: usize = 3;
    pub const PLAYER_ONE_COLOR: u32 = 0x27ae60;
    pub const PLAYER_TWO_COLOR: u32 = 0xe74c3c;

    /// Base tick interval in milliseconds
    pub const TICK_DELAY_MS: u64 = 150;
    /// Delay between the final tick and the results screen
    pub const RESULTS_DELAY_MS: u64 = 1000;

    /// World power-up cadence and lifetime
    pub const POWER_UP_SPAWN_INTERVAL_MS: u64 = 7000;
    pub const POWER_UP_LIFETIME_MS: u64 = 10_000;
    pub const MAX_WORLD_POWER_UPS: usize = 3;

    /// Tick interval multipliers, in percent of the base interval
    pub const SPEED_PERCENT: u32 = 60;
    pub const FREEZE_PERCENT: u32 = 200;

    /// Random draws before falling back to enumerating free cells
    pub const MAX_SPAWN_ATTEMPTS: u32 = 256;

    /// Food colours; snake colours are filtered out when picking
    pub const FOOD_PALETTE: [u32; 12] = [
        0xf1c40f, // Yellow
        0x9b59b6, // Purple
        0x3498db, // Blue
        0xe67e22, // Orange
        0x1abc9c, // Turquoise
        0xe91e63, // Pink
        0x8bc34a, // Light green
        0xff5722, // Deep orange
        0x607d8b, // Blue gray
        0xffc107, // Amber
        0x795548, // Brown
        0x009688, // Teal
    ];
}
