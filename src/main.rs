//! Duel Snake headless driver
//!
//! Plays one round on a virtual clock with random turn inputs and logs the
//! outcome. Usage: `duel-snake [config.json]`

use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use duel_snake::RoundConfig;
use duel_snake::sim::{Direction, Player, RoundEvent, init_round, spawn_world_power_up, tick};

/// Safety cap so a pair of lucky snakes can't run forever
const MAX_TICKS: u64 = 20_000;
/// Chance per tick that a player presses a key
const TURN_CHANCE: f64 = 0.2;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => RoundConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => RoundConfig::default(),
    };
    let spawn_interval = config.power_up_spawn_interval_ms;
    let mut input_rng = Pcg32::seed_from_u64(config.seed ^ 0x5eed_1e55);
    let mut state = init_round(config).context("starting round")?;

    let mut now: u64 = 0;
    let mut next_spawn = spawn_interval;
    let mut delay = state.next_delay_ms();

    let result = loop {
        now += delay;
        // World spawns run on their own cadence, independent of tick speed
        while next_spawn <= now {
            if let Some(p) = spawn_world_power_up(&mut state, next_spawn) {
                log::debug!("t={next_spawn} spawned {:?} at {}", p.kind, p.cell);
            }
            next_spawn += spawn_interval;
        }

        for player in Player::BOTH {
            if input_rng.random_bool(TURN_CHANCE) {
                let dir = Direction::ALL[input_rng.random_range(0..Direction::ALL.len())];
                state.set_intent(player, dir);
            }
        }

        let result = tick(&mut state, now);
        for event in &result.events {
            match event {
                RoundEvent::FoodEaten { player, score, .. } => {
                    log::info!("t={now} {player:?} scored ({score})")
                }
                RoundEvent::PowerUpCollected { player, kind, .. } => {
                    log::info!("t={now} {player:?} picked up {kind:?}")
                }
                RoundEvent::SnakeDied { player, cause } => {
                    log::info!("t={now} {player:?} died: {cause:?}")
                }
                _ => {}
            }
        }

        if result.is_ended() || result.tick >= MAX_TICKS {
            break result;
        }
        delay = result.next_delay_ms;
    };

    match result.winner {
        Some(winner) => log::info!(
            "{winner:?} after {} ticks; scores {} - {}; results in {} ms",
            result.tick,
            result.scores[0],
            result.scores[1],
            result.results_delay_ms.unwrap_or_default()
        ),
        None => log::info!(
            "Stopped after {} ticks without a winner; scores {} - {}",
            result.tick,
            result.scores[0],
            result.scores[1]
        ),
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
