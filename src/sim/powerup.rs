//! Power-ups: world instances and per-player active effects
//!
//! A world power-up sits on the grid until collected or until it outlives
//! its lifetime. Collecting one either applies an instant effect (SHRINK) or
//! pushes a timed entry into the collector's effect multiset.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::grid::{Cell, Grid};
use super::snake::Snake;
use super::state::{Player, RoundEvent};
use crate::config::PowerUpTable;
use crate::error::SimError;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Wrap at grid edges, pass through the boundary column
    Ghost,
    /// Ignore self and opponent collisions
    Shield,
    /// Slow the opponent's tick interval
    Freeze,
    /// Shorten own tick interval
    Speed,
    /// Instantly drop two tail segments
    Shrink,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Ghost,
        PowerUpKind::Shield,
        PowerUpKind::Freeze,
        PowerUpKind::Speed,
        PowerUpKind::Shrink,
    ];

    const fn slot(self) -> usize {
        match self {
            PowerUpKind::Ghost => 0,
            PowerUpKind::Shield => 1,
            PowerUpKind::Freeze => 2,
            PowerUpKind::Speed => 3,
            PowerUpKind::Shrink => 4,
        }
    }
}

/// An uncollected power-up on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldPowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub cell: Cell,
    pub spawned_at: u64,
}

/// A collected timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub started_at: u64,
    pub duration_ms: u64,
}

impl ActiveEffect {
    pub fn expired(&self, now: u64) -> bool {
        now.saturating_sub(self.started_at) >= self.duration_ms
    }
}

/// Per-player multiset of active effects, keyed by type.
/// Same-type pickups stack as separate entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    slots: [Vec<ActiveEffect>; 5],
}

impl ActiveEffects {
    pub fn has(&self, kind: PowerUpKind) -> bool {
        !self.slots[kind.slot()].is_empty()
    }

    pub fn count(&self, kind: PowerUpKind) -> usize {
        self.slots[kind.slot()].len()
    }

    pub fn push(&mut self, effect: ActiveEffect) {
        self.slots[effect.kind.slot()].push(effect);
    }

    /// Drop expired entries, returning how many of each kind went
    pub fn expire(&mut self, now: u64) -> Vec<(PowerUpKind, usize)> {
        let mut removed = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = &mut self.slots[kind.slot()];
            let before = slot.len();
            slot.retain(|e| !e.expired(now));
            if slot.len() < before {
                removed.push((kind, before - slot.len()));
            }
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.slots.iter().flatten()
    }
}

/// Tick interval for a snake from its own and its opponent's effects.
///
/// Recomputed from the base every tick. Stacked entries of one type do not
/// compound: presence of the type decides the multiplier.
pub fn current_speed(
    base_ms: u64,
    own: &ActiveEffects,
    opponent: &ActiveEffects,
    speed_percent: u32,
    freeze_percent: u32,
) -> u64 {
    let mut speed = base_ms;
    if own.has(PowerUpKind::Speed) {
        speed = speed * speed_percent as u64 / 100;
    }
    if opponent.has(PowerUpKind::Freeze) {
        speed = speed * freeze_percent as u64 / 100;
    }
    speed.max(1)
}

/// What collecting a power-up did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Instant effect; `changed` is false when it was a no-op
    Instant { changed: bool },
    Timed { until: u64 },
}

/// World power-up lifecycle plus both players' active effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpManager {
    pub table: PowerUpTable,
    pub lifetime_ms: u64,
    pub max_world: usize,
    /// Live world instances, in spawn order
    pub world: Vec<WorldPowerUp>,
    pub effects: [ActiveEffects; 2],
    /// A spawn was deferred for lack of space and is retried next tick
    pub pending_spawn: bool,
    next_id: u32,
}

impl PowerUpManager {
    pub fn new(table: PowerUpTable, lifetime_ms: u64, max_world: usize) -> Self {
        Self {
            table,
            lifetime_ms,
            max_world,
            world: Vec::new(),
            effects: [ActiveEffects::default(), ActiveEffects::default()],
            pending_spawn: false,
            next_id: 1,
        }
    }

    pub fn has_effect(&self, player: Player, kind: PowerUpKind) -> bool {
        self.effects[player.index()].has(kind)
    }

    pub fn world_at(&self, cell: Cell) -> bool {
        self.world.iter().any(|p| p.cell == cell)
    }

    /// Remove aged-out world instances and expired effects
    pub fn expire(&mut self, now: u64, events: &mut Vec<RoundEvent>) {
        let lifetime = self.lifetime_ms;
        self.world.retain(|p| {
            let alive = now.saturating_sub(p.spawned_at) < lifetime;
            if !alive {
                log::debug!("Power-up {} ({:?}) expired at {:?}", p.id, p.kind, p.cell);
                events.push(RoundEvent::PowerUpExpired {
                    id: p.id,
                    kind: p.kind,
                });
            }
            alive
        });

        for player in Player::BOTH {
            for (kind, count) in self.effects[player.index()].expire(now) {
                log::debug!("{player:?} lost {count}x {kind:?}");
                for _ in 0..count {
                    events.push(RoundEvent::EffectExpired { player, kind });
                }
            }
        }
    }

    /// Take the first live power-up on `cell`, if any
    pub fn take_at(&mut self, cell: Cell) -> Option<WorldPowerUp> {
        let idx = self.world.iter().position(|p| p.cell == cell)?;
        Some(self.world.remove(idx))
    }

    /// Apply a collected power-up to `player`
    pub fn apply_effect(
        &mut self,
        player: Player,
        kind: PowerUpKind,
        snake: &mut Snake,
        now: u64,
    ) -> Applied {
        let spec = *self.table.get(kind);
        if spec.instant {
            let changed = match kind {
                PowerUpKind::Shrink => snake.shrink(),
                _ => false,
            };
            return Applied::Instant { changed };
        }

        self.effects[player.index()].push(ActiveEffect {
            kind,
            started_at: now,
            duration_ms: spec.duration_ms,
        });
        Applied::Timed {
            until: now.saturating_add(spec.duration_ms),
        }
    }

    /// Place a random power-up off the boundary column and off every cell
    /// `occupied` reports. Returns None when the world is already full.
    pub fn spawn<R, F>(
        &mut self,
        rng: &mut R,
        grid: &Grid,
        boundary: &Boundary,
        occupied: F,
        now: u64,
    ) -> Result<Option<WorldPowerUp>, SimError>
    where
        R: Rng,
        F: Fn(Cell) -> bool,
    {
        if self.world.len() >= self.max_world {
            self.pending_spawn = false;
            return Ok(None);
        }

        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let cell = grid.sample_free_cell(rng, 0..grid.cols, "power-up", |cell| {
            boundary.is_boundary(cell) || occupied(cell) || self.world_at(cell)
        })?;

        let power_up = WorldPowerUp {
            id: self.next_id,
            kind,
            cell,
            spawned_at: now,
        };
        self.next_id += 1;
        self.world.push(power_up);
        self.pending_spawn = false;
        Ok(Some(power_up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;
    use glam::IVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn manager() -> PowerUpManager {
        PowerUpManager::new(PowerUpTable::default(), 10_000, 3)
    }

    #[test]
    fn test_timed_effect_stacks_and_expires() {
        let mut pm = manager();
        let mut snake = Snake::new(IVec2::new(5, 5), Direction::Right, 3, 0, 150);
        pm.apply_effect(Player::One, PowerUpKind::Shield, &mut snake, 0);
        pm.apply_effect(Player::One, PowerUpKind::Shield, &mut snake, 2000);
        assert_eq!(pm.effects[0].count(PowerUpKind::Shield), 2);
        assert!(!pm.has_effect(Player::Two, PowerUpKind::Shield));

        let mut events = Vec::new();
        pm.expire(5000, &mut events);
        assert_eq!(pm.effects[0].count(PowerUpKind::Shield), 1);
        assert_eq!(
            events,
            vec![RoundEvent::EffectExpired {
                player: Player::One,
                kind: PowerUpKind::Shield
            }]
        );

        pm.expire(7000, &mut events);
        assert!(!pm.has_effect(Player::One, PowerUpKind::Shield));
    }

    #[test]
    fn test_shrink_is_instant() {
        let mut pm = manager();
        let mut snake = Snake::new(IVec2::new(5, 5), Direction::Right, 5, 0, 150);
        let applied = pm.apply_effect(Player::Two, PowerUpKind::Shrink, &mut snake, 0);
        assert_eq!(applied, Applied::Instant { changed: true });
        assert_eq!(snake.len(), 3);
        assert!(!pm.has_effect(Player::Two, PowerUpKind::Shrink));

        let applied = pm.apply_effect(Player::Two, PowerUpKind::Shrink, &mut snake, 0);
        assert_eq!(applied, Applied::Instant { changed: false });
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_speed_multipliers() {
        let mut own = ActiveEffects::default();
        let mut opp = ActiveEffects::default();
        assert_eq!(current_speed(150, &own, &opp, 60, 200), 150);

        own.push(ActiveEffect {
            kind: PowerUpKind::Speed,
            started_at: 0,
            duration_ms: 100,
        });
        own.push(ActiveEffect {
            kind: PowerUpKind::Speed,
            started_at: 10,
            duration_ms: 100,
        });
        // Stacked SPEED does not compound
        assert_eq!(current_speed(150, &own, &opp, 60, 200), 90);

        opp.push(ActiveEffect {
            kind: PowerUpKind::Freeze,
            started_at: 0,
            duration_ms: 100,
        });
        assert_eq!(current_speed(150, &own, &opp, 60, 200), 180);
        // FREEZE only acts on the opponent
        assert_eq!(current_speed(150, &opp, &own, 60, 200), 150);
    }

    #[test]
    fn test_world_lifetime() {
        let mut pm = manager();
        let mut rng = Pcg32::seed_from_u64(3);
        let grid = Grid::new(40, 30);
        let boundary = Boundary::new(20, 5, 35, 1);
        let p = pm
            .spawn(&mut rng, &grid, &boundary, |_| false, 1000)
            .unwrap()
            .unwrap();
        assert_ne!(p.cell.x, 20);

        let mut events = Vec::new();
        pm.expire(10_999, &mut events);
        assert_eq!(pm.world.len(), 1);
        pm.expire(11_000, &mut events);
        assert!(pm.world.is_empty());
        assert!(matches!(events[0], RoundEvent::PowerUpExpired { id, .. } if id == p.id));
    }

    #[test]
    fn test_spawn_respects_cap_and_exclusions() {
        let mut pm = manager();
        let mut rng = Pcg32::seed_from_u64(11);
        let grid = Grid::new(6, 2);
        let boundary = Boundary::new(3, 1, 4, 1);
        // Only (0, 0) and (5, 1) are free
        let free = [IVec2::new(0, 0), IVec2::new(5, 1)];
        let occupied = |c: Cell| !free.contains(&c);

        let a = pm.spawn(&mut rng, &grid, &boundary, occupied, 0).unwrap().unwrap();
        let b = pm.spawn(&mut rng, &grid, &boundary, occupied, 0).unwrap().unwrap();
        assert_ne!(a.cell, b.cell);
        assert!(free.contains(&a.cell) && free.contains(&b.cell));

        let full = pm.spawn(&mut rng, &grid, &boundary, occupied, 0);
        assert!(matches!(full, Err(SimError::SpawnExhausted { .. })));

        pm.max_world = 2;
        assert_eq!(pm.spawn(&mut rng, &grid, &boundary, occupied, 0).unwrap(), None);
    }

    #[test]
    fn test_unbounded_duration_saturates() {
        let mut table = PowerUpTable::default();
        table.shield.duration_ms = u64::MAX;
        let mut pm = PowerUpManager::new(table, 10_000, 3);
        let mut snake = Snake::new(IVec2::new(5, 5), Direction::Right, 3, 0, 150);

        let applied = pm.apply_effect(Player::One, PowerUpKind::Shield, &mut snake, 5000);
        assert!(matches!(applied, Applied::Timed { until: u64::MAX }));

        let mut events = Vec::new();
        pm.expire(u64::MAX - 1, &mut events);
        assert!(pm.has_effect(Player::One, PowerUpKind::Shield));
        assert!(events.is_empty());
    }

    #[test]
    fn test_take_first_found() {
        let mut pm = manager();
        let cell = IVec2::new(2, 2);
        for id in [7, 8] {
            pm.world.push(WorldPowerUp {
                id,
                kind: PowerUpKind::Ghost,
                cell,
                spawned_at: 0,
            });
        }
        assert_eq!(pm.take_at(cell).map(|p| p.id), Some(7));
        assert_eq!(pm.world.len(), 1);
        assert_eq!(pm.take_at(IVec2::new(0, 0)), None);
    }
}
