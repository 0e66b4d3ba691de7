//! Per-frame simulation step
//!
//! Order matters: player movement, enemy stun recovery / behaviors, contact
//! damage, pickup collection and milestone spawns.

use serde::Serialize;

use super::behavior::{Behavior, Crowd, Surroundings};
use super::collision::overlaps;
use super::state::{GameEvent, GameState};
use crate::error::{PlacementError, SimError};
use crate::input::Direction;

/// Input sampled at the start of a tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Latest direction from the input provider; `None` keeps the current one
    pub direction: Option<Direction>,
}

/// What a tick did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// Health was already zero: nothing moved
    pub frozen: bool,
}

/// Advance the session by one frame at wall-clock time `now_ms`.
///
/// The only error is spawn placement exhaustion in the pickup step. The point
/// is already counted when that happens. A pickup that could not be moved
/// stays disarmed under the player; an enemy that could not be placed stays
/// owed and is retried on later ticks.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> Result<TickReport, SimError> {
    let mut report = TickReport::default();

    // Terminal state is stable: keep reporting, never move
    if state.is_game_over() {
        report.frozen = true;
        return Ok(report);
    }

    state.time_ticks += 1;

    if let Some(direction) = input.direction {
        state.player.direction = direction;
    }
    move_player(state);
    update_enemies(state, now_ms, &mut report.events);
    resolve_enemy_contacts(state, now_ms, &mut report.events);
    collect_pickup(state, now_ms, &mut report.events)?;

    Ok(report)
}

/// Per-axis move; an axis that would leave the canvas does not update
fn move_player(state: &mut GameState) {
    let box_size = state.config.box_size;
    let vel = state.player.direction.velocity(state.config.player_speed);
    let next = state.player.pos + vel;

    if vel.x == 0.0 || state.bounds.fits_x(next.x, box_size) {
        state.player.pos.x = next.x;
    }
    if vel.y == 0.0 || state.bounds.fits_y(next.y, box_size) {
        state.player.pos.y = next.y;
    }
}

fn update_enemies(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    let stun_ms = state.config.collision_stun_ms;
    let player = state.player.pos;
    let bounds = state.bounds;
    let box_size = state.config.box_size;

    for i in 0..state.enemies.len() {
        let (before, rest) = state.enemies.split_at_mut(i);
        let Some((enemy, after)) = rest.split_first_mut() else {
            break;
        };

        if enemy.is_stunned {
            if enemy.recover_if_elapsed(now_ms, stun_ms) {
                events.push(GameEvent::EnemyRecovered { enemy_id: enemy.id });
            }
            continue;
        }

        let env = Surroundings {
            player,
            bounds,
            box_size,
            now_ms,
            crowd: Crowd::new(before, after),
        };
        enemy.behavior.advance(&mut enemy.body, &enemy.spec, &env);
    }
}

/// Edge-triggered contact damage
fn resolve_enemy_contacts(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    let box_size = state.config.box_size;
    let immunity_ms = state.config.player_immunity_ms;

    for enemy in state.enemies.iter_mut() {
        if enemy.is_stunned || !enemy.can_attack {
            continue;
        }
        if !overlaps(state.player.pos, enemy.pos(), box_size) {
            continue;
        }
        if state.player.is_immune(now_ms, immunity_ms) {
            continue;
        }

        state.health = state.health.saturating_sub(1);
        state.player.last_hit_ms = Some(now_ms);
        enemy.stun(now_ms);
        events.push(GameEvent::PlayerHit {
            enemy_id: enemy.id,
            health: state.health,
        });

        if state.health == 0 {
            log::info!("Game over with score {}", state.score);
            events.push(GameEvent::GameOver { score: state.score });
            break;
        }
    }
}

fn collect_pickup(
    state: &mut GameState,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    let mut relocated = Ok(());

    if !overlaps(state.player.pos, state.pickup.pos, state.config.box_size) {
        state.pickup.armed = true;
    } else if state.pickup.armed {
        state.score += 1;
        events.push(GameEvent::PointScored { score: state.score });
        if state.score % state.config.spawn_milestone == 0 {
            state.pending_spawns += 1;
        }

        relocated = state.relocate_pickup();
        if let Err(e) = &relocated {
            log::warn!("Pickup stays put: {}", e);
            state.pickup.armed = false;
        }
    }

    let spawned = spawn_pending(state, now_ms, events);
    relocated?;
    spawned?;
    Ok(())
}

/// Place owed milestone enemies; stops at the first placement failure
fn spawn_pending(
    state: &mut GameState,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) -> Result<(), PlacementError> {
    while state.pending_spawns > 0 {
        let Some(enemy_id) = state.spawn_milestone_enemy(now_ms)? else {
            state.pending_spawns = 0;
            break;
        };
        state.pending_spawns -= 1;

        let kind = state
            .enemies
            .last()
            .map(|e| e.spec.behavior.name())
            .unwrap_or("unknown");
        log::info!("Score {}: {} joins", state.score, kind);
        events.push(GameEvent::EnemySpawned { enemy_id, kind });
    }
    Ok(())
}
