/// Session: the complete state of one game and its lifecycle.
///
/// Owns every piece of mutable simulation state (grid, agents, score,
/// lives) and mutates it synchronously, one `update(dt)` at a time.
/// The presentation layer only ever reads from here; the core holds no
/// reference to any terminal or rendering handle.
///
/// Phase transitions:
///   Ready ──start()──▶ Playing ──last life──▶ GameOver ─┐
///                         │ └──all dots──▶ Won ─────────┤
///                         ◀────────────── start() ◀─────┘
///
/// Paused is declared and handled (update is a no-op, the renderer has
/// an overlay) but nothing transitions into it yet; pause wiring is an
/// open product question, so no semantics are invented here.

use crate::config::RulesConfig;
use crate::domain::entity::{Direction, Ghost, Player, BASE_RADIUS};
use crate::domain::grid::{MazeError, MazeGrid, MazeTemplate};
use crate::sim::event::GameEvent;
use crate::sim::step;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Ready,
    Playing,
    #[allow(dead_code)]
    Paused,
    GameOver,
    Won,
}

pub struct Session {
    pub phase: Phase,
    pub grid: MazeGrid,
    pub player: Player,
    pub ghosts: Vec<Ghost>,
    pub score: u32,
    pub lives: u32,
    pub dots_eaten: usize,
    pub rules: RulesConfig,

    /// Pristine expanded grid, cloned back in by `start()`.
    fresh_grid: MazeGrid,
    /// Ghost spawn cells, kept for rebuilding agents.
    ghost_spawns: Vec<(usize, usize)>,
    player_spawn: (usize, usize),
}

impl Session {
    /// Build a session from a template. Fails fast on a structurally
    /// invalid maze; a constructed session is always safe to run.
    pub fn new(template: &MazeTemplate, scale: u32, rules: RulesConfig) -> Result<Self, MazeError> {
        let grid = MazeGrid::build(template, scale)?;

        let mut session = Session {
            phase: Phase::Ready,
            fresh_grid: grid.clone(),
            grid,
            player: Player::new(0.0, 0.0, 0.0, 0.0),
            ghosts: Vec::new(),
            score: 0,
            lives: rules.starting_lives,
            dots_eaten: 0,
            rules,
            ghost_spawns: template.ghost_spawns.clone(),
            player_spawn: template.player_spawn,
        };
        session.spawn_agents();
        Ok(session)
    }

    /// Re-seed everything and enter Playing: fresh grid, agents at
    /// spawn, score 0, configured lives, zero dots eaten.
    pub fn start(&mut self) {
        self.grid = self.fresh_grid.clone();
        self.spawn_agents();
        self.score = 0;
        self.lives = self.rules.starting_lives;
        self.dots_eaten = 0;
        self.phase = Phase::Playing;
    }

    /// Buffer a turn intent for the player. Silently ignored unless
    /// the session is Playing.
    pub fn set_next_direction(&mut self, dir: Direction) {
        if self.phase == Phase::Playing {
            self.player.next_direction = dir;
        }
    }

    /// Advance the simulation by `dt` seconds. One tick, run to
    /// completion; no-op unless Playing. The caller supplies the
    /// monotonic delta — the core never queries a clock.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        step::step(self, dt)
    }

    /// Put all agents back on their spawn points without touching the
    /// grid. Used on life loss; consumed pickups stay consumed.
    pub(crate) fn reset_agents(&mut self) {
        self.player.reset_to_spawn();
        for ghost in &mut self.ghosts {
            ghost.reset_to_spawn();
        }
    }

    fn spawn_agents(&mut self) {
        let scale = self.grid.scale() as f32;
        let radius = BASE_RADIUS * scale;
        let player_speed = self.rules.player_speed * scale;
        let ghost_speed = player_speed * self.rules.ghost_speed_ratio;

        let (px, py) = self.grid.spawn_point(self.player_spawn.0, self.player_spawn.1);
        self.player = Player::new(px, py, player_speed, radius);

        self.ghosts = self
            .ghost_spawns
            .iter()
            .map(|&(x, y)| {
                let (gx, gy) = self.grid.spawn_point(x, y);
                Ghost::new(gx, gy, ghost_speed, radius, self.rules.decision_interval)
            })
            .collect();
    }
}
