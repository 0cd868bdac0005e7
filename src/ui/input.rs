/// Input state tracker.
///
/// Collects all pending key events once per frame. Direction keys
/// become buffered turn intents; the session keeps the last intent
/// until it can commit it, so edge detection is enough here and no
/// held-key model is needed. Session control keys (start, quit) are
/// plain fresh presses.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Direction;

pub struct InputState {
    /// Key events collected during the most recent drain.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { raw_events: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.raw_events.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.raw_events.push(key);
                }
            }
        }
    }

    /// The latest direction key pressed this frame, if any.
    /// Arrows and WASD both steer.
    pub fn direction_intent(&self) -> Option<Direction> {
        self.raw_events.iter().rev().find_map(|key| match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        })
    }

    /// Was this key pressed during the most recent drain?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.raw_events.iter().any(|key| key.code == code)
    }

    /// Q, Esc or Ctrl+C.
    pub fn quit_requested(&self) -> bool {
        self.raw_events.iter().any(|key| {
            matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
                || (key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')))
        })
    }
}
