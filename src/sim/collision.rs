//! Movement and collision resolution
//!
//! Both snakes are judged against the bodies as they were before either one
//! moved this tick, so the outcome does not depend on evaluation order.

use super::boundary::Boundary;
use super::grid::{Cell, Grid};
use super::powerup::PowerUpKind;
use super::snake::Snake;
use super::state::{DeathCause, Player, RoundState};

/// Movement exceptions granted by active effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveRules {
    /// Wrap at grid edges and pass through the boundary column
    pub ghost: bool,
    /// Ignore self and opponent bodies
    pub shield: bool,
}

/// Outcome of one snake's step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub player: Player,
    /// Head cell after wrapping; only entered if `death` is None
    pub head: Cell,
    pub death: Option<DeathCause>,
}

impl Resolved {
    pub fn alive(&self) -> bool {
        self.death.is_none()
    }
}

/// Judge a single step from `snake` to `next` against a snapshot
pub fn check_move(
    grid: &Grid,
    boundary: &Boundary,
    snake: &Snake,
    opponent: &Snake,
    next: Cell,
    rules: MoveRules,
) -> (Cell, Option<DeathCause>) {
    let head = if rules.ghost {
        grid.wrap(next)
    } else if !grid.in_bounds(next) {
        return (next, Some(DeathCause::Wall));
    } else if boundary.is_boundary(next) {
        return (next, Some(DeathCause::Boundary));
    } else {
        next
    };

    if !rules.shield {
        if snake.occupies(head) {
            return (head, Some(DeathCause::SelfCollision));
        }
        if opponent.occupies(head) {
            return (head, Some(DeathCause::Opponent));
        }
    }

    (head, None)
}

/// Commit both snakes' latched headings and decide who survives the step.
///
/// Only headings change here; bodies are untouched until the caller applies
/// the moves.
pub fn resolve_moves(state: &mut RoundState) -> [Resolved; 2] {
    let nexts = Player::BOTH.map(|player| state.snake_mut(player).advance());
    let rules = Player::BOTH.map(|player| MoveRules {
        ghost: state.has_effect(player, PowerUpKind::Ghost),
        shield: state.has_effect(player, PowerUpKind::Shield),
    });

    let mut resolved = Player::BOTH.map(|player| {
        let (head, death) = check_move(
            &state.grid,
            &state.boundary,
            state.snake(player),
            state.snake(player.opponent()),
            nexts[player.index()],
            rules[player.index()],
        );
        Resolved {
            player,
            head,
            death,
        }
    });

    let [a, b] = resolved;
    if a.alive() && b.alive() && a.head == b.head {
        for r in resolved.iter_mut() {
            if !rules[r.player.index()].shield {
                r.death = Some(DeathCause::HeadOn);
            }
        }
    }

    resolved
}
