//! Fixed timestep simulation tick
//!
//! One call per rendered frame. Outside the Playing phase the tick only
//! handles menu transitions; while playing it runs the frame in a fixed
//! order: validate the player's move, advance the player, pick up at most
//! one gem, advance each enemy and check it against the player, then decide
//! win or loss.

use super::collision::first_overlap;
use super::grid::Tile;
use super::motion::Direction;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::GEM_SCORE;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement key pressed this frame; dropped while the player is mid-move
    pub movement: Option<Direction>,
    /// Start button on the title screen
    pub start: bool,
    /// Escape: back to the title screen
    pub escape: bool,
    /// Click to dismiss the game over / win screen
    pub confirm: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.enter_phase(GamePhase::Playing);
                state.events.push(GameEvent::Select);
            }
            return;
        }
        GamePhase::GameOver | GamePhase::Win => {
            if input.confirm {
                state.reset();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    if input.escape {
        state.enter_phase(GamePhase::Menu);
        state.events.push(GameEvent::Select);
        return;
    }

    state.time_ticks += 1;

    if let Some(direction) = input.movement {
        state.player.request_move(direction, &state.map);
    }

    step_playing(state);
}

fn step_playing(state: &mut GameState) {
    let cell_size = state.cell_size();

    // A pickup elsewhere may have changed the map since this move was accepted
    if state.player.is_moving() && !state.map.is_valid_target(state.player.target()) {
        log::debug!("player target {:?} became invalid", state.player.target());
        state.player.cancel_movement();
    }

    state.player.update();

    collect_gem(state, cell_size);

    let player_box = state.player.hitbox(cell_size);
    for enemy in &mut state.enemies {
        if enemy.has_invalid_target(&state.map) {
            enemy.redirect(&state.map);
        }
        enemy.update(&state.map, &mut state.rng);

        if enemy.collides_with(&player_box, cell_size) && state.player.take_damage() {
            log::debug!(
                "{} hit the player, health {}",
                enemy.kind().as_str(),
                state.player.health()
            );
            state.events.push(GameEvent::PlayerHurt {
                health: state.player.health(),
            });
        }
    }

    if state.player.is_dead() {
        state.enter_phase(GamePhase::GameOver);
    } else if state.total_collectibles > 0 && state.collected >= state.total_collectibles {
        state.enter_phase(GamePhase::Win);
    }
}

/// At most one gem per frame: the first in map order the player touches
fn collect_gem(state: &mut GameState, cell_size: f32) {
    let player_box = state.player.hitbox(cell_size);
    let hitboxes: Vec<_> = state
        .collectibles
        .iter()
        .map(|gem| gem.hitbox(cell_size))
        .collect();
    let Some(index) = first_overlap(&player_box, &hitboxes) else {
        return;
    };

    let gem = state.collectibles.remove(index);
    state.map.set(gem.cell, Tile::Empty);
    state.score += GEM_SCORE;
    state.collected += 1;
    log::debug!(
        "gem at {:?} collected ({}/{})",
        gem.cell,
        state.collected,
        state.total_collectibles
    );
    state.events.push(GameEvent::GemCollected { cell: gem.cell });
}
