/// The step function: advances the session by one tick of `dt` seconds.
///
/// Processing order (load-bearing):
///   1. Player movement (buffered turn, then committed direction)
///   2. Pickup resolution around the player's cell
///   3. Power-mode timer decay
///   4. Ghost movement (periodic + stuck re-decision)
///   5. Capture resolution (ghost eaten / life lost)
///   6. Win check
///
/// Pickups resolve before ghost movement and capture checks, so a
/// power pellet consumed this tick already protects the player from a
/// ghost met this tick: the capture in step 5 sees power mode on.

use crate::domain::ai;
use crate::domain::entity::Direction;
use crate::domain::physics;
use crate::domain::tile::Pickup;
use super::event::GameEvent;
use super::session::{Phase, Session};

/// Score for eating a scared ghost.
const GHOST_POINTS: u32 = 200;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(session: &mut Session, dt: f32) -> Vec<GameEvent> {
    if session.phase != Phase::Playing {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();

    resolve_player_movement(session, dt);
    resolve_pickups(session, &mut events);
    resolve_power_timer(session, dt, &mut events);
    resolve_ghost_movement(session, dt);
    if resolve_captures(session, &mut events) {
        return events;
    }
    resolve_win(session, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Player movement
// ══════════════════════════════════════════════════════════════

fn resolve_player_movement(session: &mut Session, dt: f32) {
    let player = &mut session.player;

    // Commit the buffered turn as soon as it becomes legal. This lets
    // the player corner before coming to a full stop at a junction.
    if player.next_direction != Direction::None {
        let (dx, dy) = player.next_direction.delta();
        let nx = player.x + dx * player.speed * dt;
        let ny = player.y + dy * player.speed * dt;
        if physics::can_occupy(&session.grid, nx, ny, player.radius) {
            player.direction = player.next_direction;
        }
    }

    // Move along the committed direction; an illegal move means the
    // player simply stays put this tick. No sliding, no partial move.
    if player.direction != Direction::None {
        let (dx, dy) = player.direction.delta();
        let nx = player.x + dx * player.speed * dt;
        let ny = player.y + dy * player.speed * dt;
        if physics::can_occupy(&session.grid, nx, ny, player.radius) {
            player.x = nx;
            player.y = ny;
        }
    }

    player.x = physics::wrap_x(player.x, session.grid.cols());
    player.animate_mouth(dt);
}

// ══════════════════════════════════════════════════════════════
// Pickups
// ══════════════════════════════════════════════════════════════

/// Consume pickups in the neighborhood of the player's containing
/// cell. The probe reach is scale/2 cells per axis: a single cell on
/// the classic maze, a 3×3 block on a scale-3 maze — wide enough to
/// catch the one pickup-bearing sub-cell of each expanded block as the
/// player passes through it.
fn resolve_pickups(session: &mut Session, events: &mut Vec<GameEvent>) {
    let reach = (session.grid.scale() / 2) as i32;
    let row = session.player.y.floor() as i32;
    let col = session.player.x.floor() as i32;
    let rows = session.grid.rows() as i32;
    let cols = session.grid.cols() as i32;

    for r in (row - reach)..=(row + reach) {
        for c in (col - reach)..=(col + reach) {
            if r < 0 || r >= rows || c < 0 || c >= cols {
                continue;
            }
            match session.grid.consume(r as usize, c as usize) {
                Some(Pickup::Dot) => {
                    session.score += Pickup::Dot.points();
                    session.dots_eaten += 1;
                    events.push(GameEvent::DotEaten { row: r as usize, col: c as usize });
                }
                Some(Pickup::PowerPellet) => {
                    session.score += Pickup::PowerPellet.points();
                    session.dots_eaten += 1;
                    session.player.power_mode = true;
                    session.player.power_timer = session.rules.power_duration;
                    // Global broadcast: scared is keyed by player power
                    // mode, not per-ghost state.
                    for ghost in &mut session.ghosts {
                        ghost.scared = true;
                    }
                    events.push(GameEvent::PowerPelletEaten { row: r as usize, col: c as usize });
                }
                None => {}
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Power-mode timer
// ══════════════════════════════════════════════════════════════

fn resolve_power_timer(session: &mut Session, dt: f32, events: &mut Vec<GameEvent>) {
    if !session.player.power_mode {
        return;
    }
    session.player.power_timer -= dt;
    if session.player.power_timer <= 0.0 {
        session.player.power_mode = false;
        session.player.power_timer = 0.0;
        for ghost in &mut session.ghosts {
            ghost.scared = false;
        }
        events.push(GameEvent::PowerModeEnded);
    }
}

// ══════════════════════════════════════════════════════════════
// Ghost movement
// ══════════════════════════════════════════════════════════════

fn resolve_ghost_movement(session: &mut Session, dt: f32) {
    let px = session.player.x;
    let py = session.player.y;
    let cols = session.grid.cols();

    for ghost in &mut session.ghosts {
        // Periodic re-decision. The timer resets even when no
        // direction is legal; the stall retries next period.
        ghost.decision_timer += dt;
        if ghost.decision_timer >= ghost.decision_interval {
            if let Some(dir) = ai::choose_direction(&session.grid, ghost, px, py) {
                ghost.direction = dir;
            }
            ghost.decision_timer = 0.0;
        }

        let (dx, dy) = ghost.direction.delta();
        let nx = ghost.x + dx * ghost.speed * dt;
        let ny = ghost.y + dy * ghost.speed * dt;

        if physics::can_occupy(&session.grid, nx, ny, ghost.radius) {
            ghost.x = nx;
            ghost.y = ny;
        } else if let Some(dir) = ai::choose_direction(&session.grid, ghost, px, py) {
            // Stuck: re-decide immediately without waiting for the
            // timer. The new direction takes effect next tick, so this
            // path runs at most once per tick.
            ghost.direction = dir;
        }

        ghost.x = physics::wrap_x(ghost.x, cols);
    }
}

// ══════════════════════════════════════════════════════════════
// Captures
// ══════════════════════════════════════════════════════════════

/// Returns true when the tick ended the round (life lost or game
/// over): remaining resolution is skipped.
fn resolve_captures(session: &mut Session, events: &mut Vec<GameEvent>) -> bool {
    for i in 0..session.ghosts.len() {
        let ghost = &session.ghosts[i];
        let threshold = physics::capture_threshold(session.player.radius, ghost.radius);
        if !physics::agents_collide(
            session.player.x,
            session.player.y,
            ghost.x,
            ghost.y,
            threshold,
        ) {
            continue;
        }

        if session.player.power_mode && ghost.scared {
            // Eaten: only this ghost resets, the player keeps going.
            session.score += GHOST_POINTS;
            session.ghosts[i].reset_to_spawn();
            events.push(GameEvent::GhostEaten { index: i });
        } else if !ghost.scared {
            session.lives = session.lives.saturating_sub(1);
            if session.lives == 0 {
                session.phase = Phase::GameOver;
                events.push(GameEvent::LifeLost { remaining: 0 });
                events.push(GameEvent::GameOver);
            } else {
                events.push(GameEvent::LifeLost { remaining: session.lives });
                session.reset_agents();
            }
            return true;
        }
    }
    false
}

// ══════════════════════════════════════════════════════════════
// Win check
// ══════════════════════════════════════════════════════════════

fn resolve_win(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.dots_eaten >= session.grid.total_dots() {
        session.phase = Phase::Won;
        events.push(GameEvent::Won);
    }
}

// ══════════════════════════════════════════════════════════════
// Scenario tests
// ══════════════════════════════════════════════════════════════
