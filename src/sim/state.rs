//! Round state and core simulation types
//!
//! Everything a round owns lives in [`RoundState`]. A fresh state is built
//! per round and dropped when the round is over.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::food::{self, Food};
use super::grid::{Cell, Grid};
use super::powerup::{PowerUpKind, PowerUpManager, current_speed};
use super::snake::{Direction, Snake};
use super::tick::TickResult;
use crate::config::RoundConfig;
use crate::error::SimError;

/// Player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Left side
    One,
    /// Right side
    Two,
}

impl Player {
    /// Fixed evaluation order
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Running,
    /// Terminal; no further ticks are processed
    Ended,
}

/// Round outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(Player),
    Tie,
}

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    Boundary,
    SelfCollision,
    Opponent,
    /// Both heads moved into the same cell
    HeadOn,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    FoodEaten { player: Player, cell: Cell, score: u32 },
    BoundaryMoved { from: i32, to: i32 },
    FoodRespawned { player: Player, cell: Cell },
    /// Food could not be placed and will be retried next tick
    FoodDeferred { player: Player },
    PowerUpSpawned { id: u32, kind: PowerUpKind, cell: Cell },
    PowerUpCollected { player: Player, id: u32, kind: PowerUpKind },
    PowerUpExpired { id: u32, kind: PowerUpKind },
    EffectExpired { player: Player, kind: PowerUpKind },
    SnakeDied { player: Player, cause: DeathCause },
    RoundEnded { winner: Winner },
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub config: RoundConfig,
    pub grid: Grid,
    pub boundary: Boundary,
    /// Indexed by [`Player::index`]
    pub snakes: [Snake; 2],
    /// Empty while a respawn is deferred
    pub foods: [Option<Food>; 2],
    pub power_ups: PowerUpManager,
    /// Food colour pool with snake colours removed
    pub food_colors: Vec<u32>,
    pub phase: RoundPhase,
    pub winner: Option<Winner>,
    /// Simulation tick counter
    pub tick_count: u64,
    /// Result returned by every tick after the round ended
    pub last_result: Option<TickResult>,
    /// Events raised between ticks, reported by the next tick
    pub pending_events: Vec<RoundEvent>,
    pub rng: Pcg32,
}

impl RoundState {
    /// Validate `config` and build a fresh round with both foods placed
    pub fn new(config: RoundConfig) -> Result<Self, SimError> {
        config.validate()?;

        let grid = Grid::new(config.cols, config.rows);
        let boundary = Boundary::new(
            config.boundary_start(),
            config.boundary_min,
            config.boundary_max,
            config.boundary_shift,
        );
        let snakes = config.snakes.clone().map(|spawn| {
            Snake::new(
                spawn.head,
                spawn.direction,
                spawn.length,
                spawn.color,
                config.tick_delay_ms,
            )
        });
        let power_ups = PowerUpManager::new(
            config.power_ups,
            config.power_up_lifetime_ms,
            config.max_world_power_ups,
        );

        let mut state = Self {
            grid,
            boundary,
            snakes,
            foods: [None, None],
            power_ups,
            food_colors: config.food_colors(),
            phase: RoundPhase::Running,
            winner: None,
            tick_count: 0,
            last_result: None,
            pending_events: Vec::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            config,
        };

        let mut events = Vec::new();
        for player in Player::BOTH {
            food::respawn_food(&mut state, player, &mut events);
        }
        log::info!(
            "Round started: {}x{} grid, boundary at {}, seed {}",
            state.grid.cols,
            state.grid.rows,
            state.boundary.x,
            state.config.seed
        );
        Ok(state)
    }

    pub fn snake(&self, player: Player) -> &Snake {
        &self.snakes[player.index()]
    }

    pub fn snake_mut(&mut self, player: Player) -> &mut Snake {
        &mut self.snakes[player.index()]
    }

    pub fn food(&self, player: Player) -> Option<&Food> {
        self.foods[player.index()].as_ref()
    }

    pub fn has_effect(&self, player: Player, kind: PowerUpKind) -> bool {
        self.power_ups.has_effect(player, kind)
    }

    pub fn is_ended(&self) -> bool {
        self.phase == RoundPhase::Ended
    }

    /// Latch a directional intent. Ignored once the round is over.
    pub fn set_intent(&mut self, player: Player, direction: Direction) -> bool {
        if self.is_ended() {
            return false;
        }
        self.snake_mut(player).set_intent(direction)
    }

    /// Recompute both snakes' tick intervals from active effects
    pub fn recompute_speeds(&mut self) {
        for player in Player::BOTH {
            let own = &self.power_ups.effects[player.index()];
            let opponent = &self.power_ups.effects[player.opponent().index()];
            let snake = &mut self.snakes[player.index()];
            snake.current_speed_ms = current_speed(
                snake.base_speed_ms,
                own,
                opponent,
                self.config.speed_percent,
                self.config.freeze_percent,
            );
        }
    }

    /// Delay the external driver should wait before the next tick
    pub fn next_delay_ms(&self) -> u64 {
        self.snakes
            .iter()
            .map(|s| s.current_speed_ms)
            .min()
            .unwrap_or(self.config.tick_delay_ms)
    }
}

/// Start a round from `config`
pub fn init_round(config: RoundConfig) -> Result<RoundState, SimError> {
    RoundState::new(config)
}
