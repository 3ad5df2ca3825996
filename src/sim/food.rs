//! Per-player food placement

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::state::{Player, RoundEvent, RoundState};

/// One player's food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub cell: Cell,
    /// Cosmetic colour tag
    pub color: u32,
}

/// Place `player`'s food at a random free cell inside their zone.
///
/// The cell avoids both snakes, the other food, and world power-ups. If the
/// zone has no free cell the slot is left empty and retried next tick.
pub fn respawn_food(state: &mut RoundState, player: Player, events: &mut Vec<RoundEvent>) {
    let zone = state.boundary.zone_for(player, state.grid.cols);
    let other = state.foods[player.opponent().index()];
    let sampled = state.grid.sample_free_cell(&mut state.rng, zone, "food", |cell| {
        state.snakes.iter().any(|s| s.occupies(cell))
            || other.is_some_and(|f| f.cell == cell)
            || state.power_ups.world_at(cell)
    });

    match sampled {
        Ok(cell) => {
            let color = state.food_colors[state.rng.random_range(0..state.food_colors.len())];
            state.foods[player.index()] = Some(Food { cell, color });
            events.push(RoundEvent::FoodRespawned { player, cell });
        }
        Err(err) => {
            log::warn!("Deferring {player:?} food: {err}");
            state.foods[player.index()] = None;
            events.push(RoundEvent::FoodDeferred { player });
        }
    }
}

/// Respawn any food the boundary has left outside its owner's zone
pub fn revalidate_foods(state: &mut RoundState, events: &mut Vec<RoundEvent>) {
    for player in Player::BOTH {
        if let Some(food) = state.foods[player.index()] {
            if !state.boundary.in_zone(player, food.cell, state.grid.cols) {
                respawn_food(state, player, events);
            }
        }
    }
}

/// Retry food spawns deferred by an earlier exhaustion
pub fn retry_deferred(state: &mut RoundState, events: &mut Vec<RoundEvent>) {
    for player in Player::BOTH {
        if state.foods[player.index()].is_none() {
            respawn_food(state, player, events);
        }
    }
}
