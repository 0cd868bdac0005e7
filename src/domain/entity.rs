/// Entities: Player and Ghost, plus the five-way Direction.
///
/// Positions are continuous (tile-fractional f32): `x` runs along
/// columns, `y` along rows, and the containing cell of a point is
/// `(floor(y), floor(x))`. Each agent occupies a square bounding box of
/// half-width `radius` centered on its position.

/// Movement direction with value equality. `None` means stationary /
/// no intent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// The four cardinals in decision-enumeration order.
    /// Tie-breaks in the ghost heuristic depend on this order.
    pub const CARDINALS: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit displacement vector (dx, dy).
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::None => (0.0, 0.0),
        }
    }
}

/// Collision half-width of every agent, in template-tile units.
/// Scaled by the maze expansion factor at spawn time.
pub const BASE_RADIUS: f32 = 0.4;

/// Mouth sweep rate in phase units per second (cosmetic).
const MOUTH_RATE: f32 = 8.0;

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Committed direction, used for motion.
    pub direction: Direction,
    /// Buffered desired turn from input; committed once legal.
    pub next_direction: Direction,
    /// Tiles per second.
    pub speed: f32,
    pub radius: f32,
    pub power_mode: bool,
    /// Remaining power-mode duration in seconds.
    pub power_timer: f32,
    /// Mouth opening phase 0.0..=0.5, cosmetic only.
    pub mouth_phase: f32,
    mouth_sweep: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, speed: f32, radius: f32) -> Self {
        Player {
            x,
            y,
            spawn_x: x,
            spawn_y: y,
            direction: Direction::None,
            next_direction: Direction::None,
            speed,
            radius,
            power_mode: false,
            power_timer: 0.0,
            mouth_phase: 0.0,
            mouth_sweep: 1.0,
        }
    }

    /// Back to spawn: clears direction intent and power mode.
    pub fn reset_to_spawn(&mut self) {
        self.x = self.spawn_x;
        self.y = self.spawn_y;
        self.direction = Direction::None;
        self.next_direction = Direction::None;
        self.power_mode = false;
        self.power_timer = 0.0;
    }

    /// Advance the mouth animation (triangle sweep 0 → 0.5 → 0).
    /// Never read by any rule.
    pub fn animate_mouth(&mut self, dt: f32) {
        self.mouth_phase += self.mouth_sweep * dt * MOUTH_RATE;
        if self.mouth_phase > 0.5 {
            self.mouth_phase = 0.5;
            self.mouth_sweep = -1.0;
        } else if self.mouth_phase < 0.0 {
            self.mouth_phase = 0.0;
            self.mouth_sweep = 1.0;
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub x: f32,
    pub y: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub direction: Direction,
    /// Tiles per second; fixed ratio of the player's speed.
    pub speed: f32,
    pub radius: f32,
    /// Fleeing state, broadcast from player power mode.
    pub scared: bool,
    /// Seconds since the last periodic re-decision.
    pub decision_timer: f32,
    /// Periodic re-decision interval in seconds.
    pub decision_interval: f32,
}

impl Ghost {
    pub fn new(x: f32, y: f32, speed: f32, radius: f32, decision_interval: f32) -> Self {
        Ghost {
            x,
            y,
            spawn_x: x,
            spawn_y: y,
            direction: Direction::None,
            speed,
            radius,
            scared: false,
            decision_timer: 0.0,
            decision_interval,
        }
    }

    /// Back to spawn, un-scared. Used both on life loss and when eaten.
    pub fn reset_to_spawn(&mut self) {
        self.x = self.spawn_x;
        self.y = self.spawn_y;
        self.direction = Direction::None;
        self.scared = false;
        self.decision_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas_are_unit_vectors() {
        assert_eq!(Direction::Up.delta(), (0.0, -1.0));
        assert_eq!(Direction::Down.delta(), (0.0, 1.0));
        assert_eq!(Direction::Left.delta(), (-1.0, 0.0));
        assert_eq!(Direction::Right.delta(), (1.0, 0.0));
        assert_eq!(Direction::None.delta(), (0.0, 0.0));
    }

    #[test]
    fn direction_equality_is_by_value() {
        // The heuristic and the input layer compare directions freely;
        // two Up values must always be equal.
        let a = Direction::Up;
        let b = Direction::Up;
        assert_eq!(a, b);
        assert_ne!(Direction::Up, Direction::None);
    }

    #[test]
    fn player_reset_clears_intent_and_power() {
        let mut p = Player::new(14.0, 23.0, 4.0, 0.4);
        p.x = 3.0;
        p.direction = Direction::Left;
        p.next_direction = Direction::Up;
        p.power_mode = true;
        p.power_timer = 5.0;
        p.reset_to_spawn();
        assert_eq!(p.x, 14.0);
        assert_eq!(p.y, 23.0);
        assert_eq!(p.direction, Direction::None);
        assert_eq!(p.next_direction, Direction::None);
        assert!(!p.power_mode);
        assert_eq!(p.power_timer, 0.0);
    }

    #[test]
    fn ghost_reset_clears_scared() {
        let mut g = Ghost::new(12.0, 14.0, 3.0, 0.4, 1.0);
        g.x = 20.0;
        g.scared = true;
        g.decision_timer = 0.7;
        g.reset_to_spawn();
        assert_eq!(g.x, 12.0);
        assert!(!g.scared);
        assert_eq!(g.decision_timer, 0.0);
    }

    #[test]
    fn mouth_sweep_stays_in_range_and_reverses() {
        let mut p = Player::new(0.0, 0.0, 4.0, 0.4);
        for _ in 0..600 {
            p.animate_mouth(1.0 / 60.0);
            assert!(p.mouth_phase >= 0.0 && p.mouth_phase <= 0.5);
        }
    }
}
