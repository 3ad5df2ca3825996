//! Territory boundary
//!
//! A single impassable column splits the grid. Player one owns everything to
//! its left, player two everything to its right. Each food eaten pushes the
//! column one step into the opponent's side.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::state::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// Current boundary column
    pub x: i32,
    pub min: i32,
    pub max: i32,
    /// Columns moved per scoring event
    pub shift: i32,
}

impl Boundary {
    pub fn new(start: i32, min: i32, max: i32, shift: i32) -> Self {
        Self {
            x: start.clamp(min, max),
            min,
            max,
            shift,
        }
    }

    /// Widen the scorer's zone. Returns true if the column actually moved.
    pub fn shift_toward_opponent_of(&mut self, scorer: Player) -> bool {
        let old = self.x;
        self.x = match scorer {
            Player::One => (self.x + self.shift).min(self.max),
            Player::Two => (self.x - self.shift).max(self.min),
        };
        self.x != old
    }

    /// Columns owned by `player`; the boundary column belongs to neither
    pub fn zone_for(&self, player: Player, cols: i32) -> Range<i32> {
        match player {
            Player::One => 0..self.x,
            Player::Two => self.x + 1..cols,
        }
    }

    #[inline]
    pub fn in_zone(&self, player: Player, cell: Cell, cols: i32) -> bool {
        self.zone_for(player, cols).contains(&cell.x)
    }

    #[inline]
    pub fn is_boundary(&self, cell: Cell) -> bool {
        cell.x == self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_shift_saturates() {
        let mut boundary = Boundary::new(20, 5, 35, 1);
        for _ in 0..15 {
            assert!(boundary.shift_toward_opponent_of(Player::One));
        }
        assert_eq!(boundary.x, 35);
        assert!(!boundary.shift_toward_opponent_of(Player::One));
        assert_eq!(boundary.x, 35);

        for _ in 0..40 {
            boundary.shift_toward_opponent_of(Player::Two);
        }
        assert_eq!(boundary.x, 5);
    }

    #[test]
    fn test_wide_shift_clamps_without_overshoot() {
        let mut boundary = Boundary::new(20, 5, 35, 4);
        for _ in 0..4 {
            boundary.shift_toward_opponent_of(Player::One);
        }
        assert_eq!(boundary.x, 35);
    }

    #[test]
    fn test_zones_exclude_boundary_column() {
        let boundary = Boundary::new(20, 5, 35, 1);
        assert_eq!(boundary.zone_for(Player::One, 40), 0..20);
        assert_eq!(boundary.zone_for(Player::Two, 40), 21..40);
        assert!(!boundary.in_zone(Player::One, IVec2::new(20, 0), 40));
        assert!(!boundary.in_zone(Player::Two, IVec2::new(20, 0), 40));
        assert!(boundary.is_boundary(IVec2::new(20, 17)));
    }

    #[test]
    fn test_start_is_clamped() {
        let boundary = Boundary::new(2, 5, 35, 1);
        assert_eq!(boundary.x, 5);
    }
}
