//! Round tick
//!
//! One call advances both snakes exactly one cell. The external scheduler
//! waits `next_delay_ms` from the returned result before calling again, and
//! drives [`spawn_world_power_up`] on its own fixed cadence.

use serde::{Deserialize, Serialize};

use super::collision::{self, Resolved};
use super::food::{self, Food};
use super::grid::Cell;
use super::powerup::{ActiveEffect, Applied, WorldPowerUp};
use super::state::{Player, RoundEvent, RoundPhase, RoundState, Winner};

/// Snapshot handed to the presentation layer after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub tick: u64,
    pub now: u64,
    pub alive: [bool; 2],
    pub scores: [u32; 2],
    pub lengths: [usize; 2],
    pub boundary_x: i32,
    pub foods: [Option<Food>; 2],
    pub power_ups: Vec<WorldPowerUp>,
    pub effects: [Vec<ActiveEffect>; 2],
    pub phase: RoundPhase,
    pub winner: Option<Winner>,
    /// Delay before the next tick should fire
    pub next_delay_ms: u64,
    /// Set once the round ends: delay before the results phase
    pub results_delay_ms: Option<u64>,
    pub events: Vec<RoundEvent>,
}

impl TickResult {
    fn capture(state: &RoundState, now: u64, alive: [bool; 2], events: Vec<RoundEvent>) -> Self {
        Self {
            tick: state.tick_count,
            now,
            alive,
            scores: state.snakes.each_ref().map(|s| s.score),
            lengths: state.snakes.each_ref().map(|s| s.len()),
            boundary_x: state.boundary.x,
            foods: state.foods,
            power_ups: state.power_ups.world.clone(),
            effects: state
                .power_ups
                .effects
                .each_ref()
                .map(|e| e.iter().copied().collect()),
            phase: state.phase,
            winner: state.winner,
            next_delay_ms: state.next_delay_ms(),
            results_delay_ms: state.is_ended().then_some(state.config.results_delay_ms),
            events,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == RoundPhase::Ended
    }
}

/// Winner from the alive flags; None while both live
pub fn decide_winner(alive: [bool; 2], scores: [u32; 2]) -> Option<Winner> {
    match alive {
        [true, true] => None,
        [true, false] => Some(Winner::Player(Player::One)),
        [false, true] => Some(Winner::Player(Player::Two)),
        [false, false] => Some(match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Winner::Player(Player::One),
            std::cmp::Ordering::Less => Winner::Player(Player::Two),
            std::cmp::Ordering::Equal => Winner::Tie,
        }),
    }
}

/// Advance the round by one step at time `now` (ms, monotonic)
pub fn tick(state: &mut RoundState, now: u64) -> TickResult {
    if state.is_ended() {
        if let Some(result) = &state.last_result {
            return result.clone();
        }
        return TickResult::capture(state, now, [false, false], Vec::new());
    }

    state.tick_count += 1;
    let mut events = std::mem::take(&mut state.pending_events);

    // Power-up lifecycle and deferred spawns
    state.power_ups.expire(now, &mut events);
    if state.power_ups.pending_spawn {
        spawn_power_up_inner(state, now, &mut events);
    }
    food::retry_deferred(state, &mut events);
    state.recompute_speeds();

    // Survival against the pre-tick snapshot
    let resolved = collision::resolve_moves(state);
    for r in &resolved {
        if let Some(cause) = r.death {
            log::debug!("{:?} died at {} ({cause:?})", r.player, r.head);
            events.push(RoundEvent::SnakeDied {
                player: r.player,
                cause,
            });
        }
    }

    for r in resolved.iter().filter(|r| r.alive()) {
        state.snake_mut(r.player).push_head(r.head);
    }
    for r in resolved.iter().filter(|r| r.alive()) {
        consume(state, r, now, &mut events);
    }
    state.recompute_speeds();

    let alive = resolved.map(|r| r.alive());
    let scores = state.snakes.each_ref().map(|s| s.score);
    if let Some(winner) = decide_winner(alive, scores) {
        state.phase = RoundPhase::Ended;
        state.winner = Some(winner);
        events.push(RoundEvent::RoundEnded { winner });
        log::info!(
            "Round over after {} ticks: {winner:?} (scores {} - {})",
            state.tick_count,
            scores[0],
            scores[1]
        );
    }

    let result = TickResult::capture(state, now, alive, events);
    if state.is_ended() {
        state.last_result = Some(result.clone());
    }
    result
}

/// Power-up pickup, own-food scoring, and tail handling for a surviving snake
fn consume(state: &mut RoundState, r: &Resolved, now: u64, events: &mut Vec<RoundEvent>) {
    let player = r.player;

    if let Some(power_up) = state.power_ups.take_at(r.head) {
        let snake = &mut state.snakes[player.index()];
        let applied = state
            .power_ups
            .apply_effect(player, power_up.kind, snake, now);
        match applied {
            Applied::Instant { changed } => {
                log::debug!("{player:?} used {:?} (changed: {changed})", power_up.kind)
            }
            Applied::Timed { until } => {
                log::debug!("{player:?} has {:?} until {until}", power_up.kind)
            }
        }
        events.push(RoundEvent::PowerUpCollected {
            player,
            id: power_up.id,
            kind: power_up.kind,
        });
    }

    let ate = state.foods[player.index()].is_some_and(|f| f.cell == r.head);
    if !ate {
        state.snake_mut(player).pop_tail();
        return;
    }

    let snake = state.snake_mut(player);
    snake.score += 1;
    let score = snake.score;
    events.push(RoundEvent::FoodEaten {
        player,
        cell: r.head,
        score,
    });
    log::debug!("{player:?} ate at {} (score {score})", r.head);

    let from = state.boundary.x;
    if state.boundary.shift_toward_opponent_of(player) {
        events.push(RoundEvent::BoundaryMoved {
            from,
            to: state.boundary.x,
        });
        log::debug!("Boundary moved {from} -> {}", state.boundary.x);
        food::revalidate_foods(state, events);
    }
    food::respawn_food(state, player, events);
}

/// Place one random world power-up. Returns it, or None if the world is
/// full, the round is over, or no cell was free (retried next tick).
///
/// The `PowerUpSpawned` event is queued and reported by the next tick.
pub fn spawn_world_power_up(state: &mut RoundState, now: u64) -> Option<WorldPowerUp> {
    if state.is_ended() {
        return None;
    }
    let mut events = std::mem::take(&mut state.pending_events);
    let spawned = spawn_power_up_inner(state, now, &mut events);
    state.pending_events = events;
    spawned
}

fn spawn_power_up_inner(
    state: &mut RoundState,
    now: u64,
    events: &mut Vec<RoundEvent>,
) -> Option<WorldPowerUp> {
    let RoundState {
        power_ups,
        rng,
        grid,
        boundary,
        snakes,
        foods,
        ..
    } = state;
    let occupied = |cell: Cell| {
        snakes.iter().any(|s| s.occupies(cell)) || foods.iter().flatten().any(|f| f.cell == cell)
    };

    match power_ups.spawn(rng, grid, boundary, occupied, now) {
        Ok(Some(p)) => {
            log::debug!("Spawned {:?} power-up {} at {}", p.kind, p.id, p.cell);
            events.push(RoundEvent::PowerUpSpawned {
                id: p.id,
                kind: p.kind,
                cell: p.cell,
            });
            Some(p)
        }
        Ok(None) => None,
        Err(err) => {
            log::warn!("Deferring power-up spawn: {err}");
            power_ups.pending_spawn = true;
            None
        }
    }
}
