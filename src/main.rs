/// Entry point and game loop.
///
/// The shell owns the clock: it measures a monotonic frame delta and
/// feeds it to `Session::update(dt)`. The core never reads time or the
/// terminal itself.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use sim::event::GameEvent;
use sim::level;
use sim::session::{Phase, Session};
use ui::input::InputState;
use ui::renderer::Renderer;

/// Largest delta fed into one simulation step. Keeps agents from
/// teleporting after a terminal suspend or a long frame stall.
const MAX_DT: f32 = 0.1;

fn main() {
    let config = GameConfig::load();

    let template = match level::classic_maze() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Maze error: {e}");
            return;
        }
    };

    let mut session = match Session::new(&template, config.maze.scale, config.rules.clone()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Maze error: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new(config.display.emoji_pickups);
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing KlotsMan!");
    println!("Final Score: {}", session.score);
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let frame = Duration::from_millis(config.display.frame_ms);
    let mut last_frame = Instant::now();

    loop {
        input.drain_events();

        if input.quit_requested() {
            break;
        }

        if input.was_pressed(KeyCode::Char(' ')) {
            if matches!(session.phase, Phase::Ready | Phase::GameOver | Phase::Won) {
                session.start();
            }
        }

        if session.phase == Phase::Playing {
            if let Some(dir) = input.direction_intent() {
                session.set_next_direction(dir);
            }
        }

        let dt = last_frame.elapsed().as_secs_f32().min(MAX_DT);
        last_frame = Instant::now();

        let events = session.update(dt);
        process_events(renderer, &events);

        renderer.render(session)?;
        std::thread::sleep(frame);
    }

    Ok(())
}

fn process_events(renderer: &mut Renderer, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PowerPelletEaten { .. } => renderer.set_message("Power up! +50"),
            GameEvent::PowerModeEnded => renderer.set_message("Power mode over"),
            GameEvent::GhostEaten { .. } => renderer.set_message("Ghost eaten! +200"),
            GameEvent::LifeLost { remaining } if *remaining > 0 => {
                renderer.set_message("Caught! Positions reset");
            }
            GameEvent::LifeLost { .. } => {}
            GameEvent::GameOver => renderer.set_message("Game over"),
            GameEvent::Won => renderer.set_message("Maze cleared!"),
            GameEvent::DotEaten { .. } => {}
        }
    }
}
