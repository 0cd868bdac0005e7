/// Ghost AI — one-step greedy lookahead, no search.
///
/// Two modes:
///   1. **Chase** — pick the legal direction that closes Euclidean
///      distance to the player the most (default).
///   2. **Flee** — active exactly while the ghost is `scared`; pick the
///      legal direction that opens the distance the most.
///
/// Greedy and local on purpose: ghosts can oscillate or sit behind a
/// wall the player is right on the other side of. That is accepted
/// behavior, not a defect.

use super::entity::{Direction, Ghost};
use super::grid::MazeGrid;
use super::physics;

/// Legality probe offset per candidate direction, in template tiles.
const PROBE_DISTANCE: f32 = 0.5;

/// Re-choose the ghost's direction against the player's current
/// position. Returns `None` when no cardinal is legal at the probe
/// offset — the caller keeps the previous direction and the agent
/// stalls until a later tick (at most one re-decision per tick, so
/// this can never spin).
///
/// Ties are broken by enumeration order Up, Down, Left, Right: the
/// first direction with the best distance wins.
pub fn choose_direction(grid: &MazeGrid, ghost: &Ghost, px: f32, py: f32) -> Option<Direction> {
    let s = grid.scale() as f32;
    let probe = PROBE_DISTANCE * s;
    let eval = s; // distances compared at unit template distance

    let mut best: Option<(Direction, f32)> = None;

    for dir in Direction::CARDINALS {
        let (dx, dy) = dir.delta();
        if !physics::can_occupy(grid, ghost.x + dx * probe, ghost.y + dy * probe, ghost.radius) {
            continue;
        }

        let nx = ghost.x + dx * eval;
        let ny = ghost.y + dy * eval;
        let dist = ((nx - px).powi(2) + (ny - py).powi(2)).sqrt();

        let better = match best {
            None => true,
            Some((_, b)) => {
                if ghost.scared {
                    dist > b
                } else {
                    dist < b
                }
            }
        };
        if better {
            best = Some((dir, dist));
        }
    }

    best.map(|(dir, _)| dir)
}
