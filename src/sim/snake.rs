//! Snake body, heading, and speed

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Cardinal heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step on the grid (screen coordinates, y down)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A player's snake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    /// Head first, tail last
    pub body: VecDeque<Cell>,
    /// Heading used by the last tick
    pub direction: Direction,
    /// Latched intent, applied at the start of the next tick
    pub pending_direction: Direction,
    pub color: u32,
    pub score: u32,
    /// Base tick interval (ms)
    pub base_speed_ms: u64,
    /// Tick interval after power-up modifiers; recomputed every tick
    pub current_speed_ms: u64,
}

impl Snake {
    /// Build a snake of `length` cells trailing behind `head`
    pub fn new(
        head: Cell,
        direction: Direction,
        length: usize,
        color: u32,
        base_speed_ms: u64,
    ) -> Self {
        let back = direction.opposite().delta();
        let body = (0..length as i32).map(|i| head + back * i).collect();
        Self {
            body,
            direction,
            pending_direction: direction,
            color,
            score: 0,
            base_speed_ms,
            current_speed_ms: base_speed_ms,
        }
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Latch a turn. Exact reversals of the current heading are refused.
    /// The last accepted intent before a tick wins.
    pub fn set_intent(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Commit the latched intent and return the unresolved next head.
    /// Survival is the resolver's call.
    pub fn advance(&mut self) -> Cell {
        self.direction = self.pending_direction;
        self.head() + self.direction.delta()
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// Drop the last two segments if the body is longer than three
    pub fn shrink(&mut self) -> bool {
        if self.body.len() <= 3 {
            return false;
        }
        let keep = self.body.len() - 2;
        self.body.truncate(keep);
        true
    }
}
