//! Deterministic round simulation
//!
//! All gameplay rules live here. This module must stay pure and deterministic:
//! - Time comes in as `now` from the caller
//! - Seeded RNG only
//! - Fixed player evaluation order (one, then two)
//! - No rendering, input, or timer dependencies

pub mod boundary;
pub mod collision;
pub mod food;
pub mod grid;
pub mod powerup;
pub mod snake;
pub mod state;
pub mod tick;

pub use boundary::Boundary;
pub use collision::{MoveRules, Resolved, check_move, resolve_moves};
pub use food::Food;
pub use grid::{Cell, Grid};
pub use powerup::{ActiveEffect, ActiveEffects, PowerUpKind, PowerUpManager, WorldPowerUp};
pub use snake::{Direction, Snake};
pub use state::{DeathCause, Player, RoundEvent, RoundPhase, RoundState, Winner, init_round};
pub use tick::{TickResult, decide_winner, spawn_world_power_up, tick};
