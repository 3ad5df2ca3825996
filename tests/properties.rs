use duel_snake::RoundConfig;
use duel_snake::sim::{
    Boundary, Direction, Grid, MoveRules, Player, RoundEvent, RoundState, Snake, check_move, food,
    spawn_world_power_up, tick,
};
use glam::IVec2;
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn player() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::One), Just(Player::Two)]
}

fn assert_food_valid(state: &RoundState) {
    for player in Player::BOTH {
        if let Some(f) = state.food(player) {
            assert!(state.boundary.in_zone(player, f.cell, state.grid.cols));
            assert!(state.snakes.iter().all(|s| !s.occupies(f.cell)));
            if let Some(other) = state.food(player.opponent()) {
                assert_ne!(f.cell, other.cell);
            }
        }
    }
}

/// Zone check for standing food; overlap check only for food placed this tick,
/// since a ghost may later crawl over the other player's food.
fn assert_tick_food_valid(state: &RoundState, events: &[RoundEvent]) {
    for player in Player::BOTH {
        if let Some(f) = state.food(player) {
            assert!(state.boundary.in_zone(player, f.cell, state.grid.cols));
            if let Some(other) = state.food(player.opponent()) {
                assert_ne!(f.cell, other.cell);
            }
        }
    }
    for event in events {
        if let RoundEvent::FoodRespawned { player, cell } = *event {
            if state.food(player).is_some_and(|f| f.cell == cell) {
                assert!(state.snakes.iter().all(|s| !s.occupies(cell)));
                assert!(!state.power_ups.world_at(cell));
            }
        }
    }
}

proptest! {
    #[test]
    fn boundary_stays_clamped(scorers in prop::collection::vec(player(), 0..200)) {
        let mut boundary = Boundary::new(20, 5, 35, 1);
        for scorer in scorers {
            let before = boundary.x;
            let moved = boundary.shift_toward_opponent_of(scorer);
            prop_assert!((5..=35).contains(&boundary.x));
            prop_assert!((boundary.x - before).abs() <= 1);
            prop_assert_eq!(moved, boundary.x != before);
        }
    }

    #[test]
    fn food_respawn_respects_zone(
        seed in any::<u64>(),
        boundary_x in 5i32..=35,
        player in player(),
    ) {
        let mut state = RoundState::new(RoundConfig::with_seed(seed)).unwrap();
        state.boundary.x = boundary_x;
        let mut events = Vec::new();
        food::revalidate_foods(&mut state, &mut events);
        for _ in 0..20 {
            food::respawn_food(&mut state, player, &mut events);
            assert_food_valid(&state);
        }
    }

    #[test]
    fn random_rounds_end_exactly_on_death(
        seed in any::<u64>(),
        intents in prop::collection::vec((direction(), direction()), 1..300),
    ) {
        let mut state = RoundState::new(RoundConfig::with_seed(seed)).unwrap();
        let mut now = 0;
        for (i, (d1, d2)) in intents.into_iter().enumerate() {
            if i % 20 == 0 {
                spawn_world_power_up(&mut state, now);
            }
            state.set_intent(Player::One, d1);
            state.set_intent(Player::Two, d2);
            now += state.next_delay_ms();
            let result = tick(&mut state, now);

            let any_dead = result.alive.contains(&false);
            prop_assert_eq!(result.is_ended(), any_dead);
            prop_assert!((5..=35).contains(&result.boundary_x));
            assert_tick_food_valid(&state, &result.events);
            if result.is_ended() {
                prop_assert!(result.winner.is_some());
                let again = tick(&mut state, now + 1000);
                prop_assert_eq!(again, result);
                break;
            }
        }
    }

    #[test]
    fn world_power_ups_avoid_boundary_snakes_and_food(
        seed in any::<u64>(),
        boundary_x in 5i32..=35,
        spawns in 1usize..50,
    ) {
        let mut config = RoundConfig::with_seed(seed);
        config.max_world_power_ups = 100;
        let mut state = RoundState::new(config).unwrap();
        state.boundary.x = boundary_x;
        let mut events = Vec::new();
        food::revalidate_foods(&mut state, &mut events);

        for i in 0..spawns {
            let Some(p) = spawn_world_power_up(&mut state, i as u64) else {
                continue;
            };
            prop_assert!(state.grid.in_bounds(p.cell));
            prop_assert!(!state.boundary.is_boundary(p.cell));
            prop_assert!(state.snakes.iter().all(|s| !s.occupies(p.cell)));
            prop_assert!(state.foods.iter().flatten().all(|f| f.cell != p.cell));
        }
        let cells: Vec<_> = state.power_ups.world.iter().map(|p| p.cell).collect();
        for (i, cell) in cells.iter().enumerate() {
            prop_assert!(!cells[i + 1..].contains(cell));
        }
    }

    #[test]
    fn ghost_never_dies_at_grid_edges(
        x in 0i32..40,
        y in 0i32..30,
        dir in direction(),
    ) {
        let grid = Grid::new(40, 30);
        let boundary = Boundary::new(20, 5, 35, 1);
        let snake = Snake::new(IVec2::new(x, y), dir, 1, 0, 150);
        let other = Snake::new(IVec2::new(-10, -10), Direction::Up, 1, 0, 150);
        let next = snake.head() + dir.delta();
        let rules = MoveRules { ghost: true, shield: false };
        let (head, death) = check_move(&grid, &boundary, &snake, &other, next, rules);
        prop_assert_eq!(death, None);
        prop_assert!(grid.in_bounds(head));
    }

    #[test]
    fn shield_never_dies_from_bodies(seed in any::<u64>(), steps in 1usize..60) {
        let mut state = RoundState::new(RoundConfig::with_seed(seed)).unwrap();
        // Coil player one so it keeps crossing itself
        let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
        state.snakes[0] = Snake::new(IVec2::new(10, 10), Direction::Right, 8, 0x27ae60, 150);
        state.power_ups.effects[0].push(duel_snake::sim::ActiveEffect {
            kind: duel_snake::sim::PowerUpKind::Shield,
            started_at: 0,
            duration_ms: u64::MAX,
        });
        let mut now = 0;
        for i in 0..steps {
            state.set_intent(Player::One, turns[i % 4]);
            now += 150;
            let result = tick(&mut state, now);
            prop_assert!(result.alive[0]);
            if result.is_ended() {
                break;
            }
        }
    }
}
