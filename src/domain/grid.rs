/// The maze grid: static tile classification plus mutable pickup state.
///
/// Built once per session from a [`MazeTemplate`] and an integer scale
/// factor. All tile mutation goes through `consume`; Wall/Empty
/// classification never changes after construction.
///
/// ## Scaling expansion
///
/// A scale factor S turns every template cell into an S×S block. Pickup
/// cells keep their pickup in exactly one sub-cell of the block (at
/// relative offset (S/2, S/2)); the rest of the block becomes Empty.
/// Corridors widen visually without multiplying the pickup count, so
/// `total_dots` of the expanded grid always equals the template's.
///
/// ## Tunnel band
///
/// Template rows whose edge columns are passable are side tunnels. The
/// band is those rows widened by one row on each side (an agent's
/// bounding-box corners reach into the neighboring rows), expanded by S.
/// The movement resolver allows out-of-range corners only inside this
/// band; the base maze yields rows {13, 14, 15}.

use std::ops::Range;

use thiserror::Error;

use super::tile::{Pickup, Tile};

/// Construction failure. The simulation never runs against a
/// structurally invalid grid, so all of these fail fast.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze template is empty")]
    EmptyTemplate,
    #[error("maze row {row} has {got} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },
    #[error("unknown maze character {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },
    #[error("maze template has no player spawn marker")]
    MissingPlayerSpawn,
    #[error("maze template has more than one player spawn marker")]
    DuplicatePlayerSpawn,
    #[error("maze scale factor must be at least 1")]
    ZeroScale,
}

/// Parsed maze layout before expansion. Spawn points are (x, y) cell
/// coordinates into the template. Produced by `sim::level`.
#[derive(Clone, Debug)]
pub struct MazeTemplate {
    pub tiles: Vec<Vec<Tile>>,
    pub player_spawn: (usize, usize),
    pub ghost_spawns: Vec<(usize, usize)>,
}

/// Number of distinct decorative pickup tokens.
const DECOR_KINDS: u8 = 6;

#[derive(Clone, Debug)]
pub struct MazeGrid {
    tiles: Vec<Vec<Tile>>,
    rows: usize,
    cols: usize,
    scale: u32,
    total_dots: usize,
    /// Grid rows where out-of-range bounding-box corners are legal.
    tunnel_band: Range<i32>,
}

impl MazeGrid {
    /// Expand a template by `scale` into the grid all later logic
    /// consumes as ground truth. Pure: same inputs, same grid.
    pub fn build(template: &MazeTemplate, scale: u32) -> Result<Self, MazeError> {
        if scale == 0 {
            return Err(MazeError::ZeroScale);
        }
        if template.tiles.is_empty() || template.tiles[0].is_empty() {
            return Err(MazeError::EmptyTemplate);
        }

        let s = scale as usize;
        let t_rows = template.tiles.len();
        let t_cols = template.tiles[0].len();
        let keep = s / 2; // pickup-bearing sub-cell offset

        let mut tiles = vec![vec![Tile::Empty; t_cols * s]; t_rows * s];
        let mut total_dots = 0;

        for (r, row) in template.tiles.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                for i in 0..s {
                    for j in 0..s {
                        tiles[r * s + i][c * s + j] = match tile {
                            Tile::Dot | Tile::PowerPellet => {
                                if i == keep && j == keep {
                                    tile
                                } else {
                                    Tile::Empty
                                }
                            }
                            other => other,
                        };
                    }
                }
                if tile.is_pickup() {
                    total_dots += 1;
                }
            }
        }

        Ok(MazeGrid {
            tiles,
            rows: t_rows * s,
            cols: t_cols * s,
            scale,
            total_dots,
            tunnel_band: detect_tunnel_band(&template.tiles, s),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Count of Dot + PowerPellet tiles at construction; the win
    /// threshold. Not decremented by `consume`.
    pub fn total_dots(&self) -> usize {
        self.total_dots
    }

    /// Tile classification at an in-range cell. Boundary handling is the
    /// movement resolver's job; callers never index out of range.
    pub fn tile_at(&self, row: usize, col: usize) -> Tile {
        self.tiles[row][col]
    }

    /// Is an out-of-range bounding-box corner on this row inside a side
    /// tunnel?
    pub fn is_tunnel_row(&self, row: i32) -> bool {
        self.tunnel_band.contains(&row)
    }

    /// Remove the pickup at (row, col), if any. Dot/PowerPellet become
    /// Empty; anything else leaves the grid unchanged. Idempotent on
    /// already-emptied cells.
    pub fn consume(&mut self, row: usize, col: usize) -> Option<Pickup> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        match self.tiles[row][col] {
            Tile::Dot => {
                self.tiles[row][col] = Tile::Empty;
                Some(Pickup::Dot)
            }
            Tile::PowerPellet => {
                self.tiles[row][col] = Tile::Empty;
                Some(Pickup::PowerPellet)
            }
            _ => None,
        }
    }

    /// Continuous spawn coordinate for a template cell: the geometric
    /// center of its expanded block. An agent box centered here never
    /// straddles the neighboring template cells.
    pub fn spawn_point(&self, x: usize, y: usize) -> (f32, f32) {
        let s = self.scale as f32;
        ((x as f32 + 0.5) * s, (y as f32 + 0.5) * s)
    }

    /// Decorative pickup-kind token for a cell, stable across the
    /// session. Cosmetic only: no simulation rule reads it.
    pub fn decor_token(&self, row: usize, col: usize) -> u8 {
        ((row.wrapping_mul(31).wrapping_add(col.wrapping_mul(17))) % DECOR_KINDS as usize) as u8
    }
}

/// Tunnel rows (edge column passable) widened by one row each side,
/// then expanded by the scale factor.
fn detect_tunnel_band(template: &[Vec<Tile>], s: usize) -> Range<i32> {
    let cols = template[0].len();
    let mut lo: Option<usize> = None;
    let mut hi: Option<usize> = None;
    for (r, row) in template.iter().enumerate() {
        if row[0].is_passable() || row[cols - 1].is_passable() {
            lo = Some(lo.map_or(r, |v: usize| v.min(r)));
            hi = Some(hi.map_or(r, |v: usize| v.max(r)));
        }
    }
    match (lo, hi) {
        (Some(lo), Some(hi)) => {
            let s = s as i32;
            (lo as i32 - 1) * s..(hi as i32 + 2) * s // +1 widen, +1 exclusive end
        }
        _ => 0..0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a template from a string diagram.
    /// Legend: '#'=Wall  '.'=Dot  'o'=PowerPellet  ' '=Empty
    fn template_from(rows: &[&str]) -> MazeTemplate {
        let tiles = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        '#' => Tile::Wall,
                        '.' => Tile::Dot,
                        'o' => Tile::PowerPellet,
                        _ => Tile::Empty,
                    })
                    .collect()
            })
            .collect();
        MazeTemplate { tiles, player_spawn: (1, 1), ghost_spawns: vec![] }
    }

    #[test]
    fn base_scale_preserves_layout() {
        let t = template_from(&[
            "#####",
            "#.o.#",
            "#####",
        ]);
        let g = MazeGrid::build(&t, 1).unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 5);
        assert_eq!(g.tile_at(0, 0), Tile::Wall);
        assert_eq!(g.tile_at(1, 1), Tile::Dot);
        assert_eq!(g.tile_at(1, 2), Tile::PowerPellet);
        assert_eq!(g.total_dots(), 3);
    }

    #[test]
    fn expansion_triples_dimensions() {
        let t = template_from(&[
            "###",
            "#.#",
            "###",
        ]);
        let g = MazeGrid::build(&t, 3).unwrap();
        assert_eq!(g.rows(), 9);
        assert_eq!(g.cols(), 9);
    }

    #[test]
    fn expansion_keeps_one_pickup_per_block() {
        let t = template_from(&[
            "####",
            "#..#",
            "####",
        ]);
        let g = MazeGrid::build(&t, 3).unwrap();
        // Dot blocks start at rows 3..6, cols 3..6 and 3..6/6..9; the
        // pickup survives only at the (1,1) sub-cell of each block.
        let mut found = vec![];
        for r in 0..g.rows() {
            for c in 0..g.cols() {
                if g.tile_at(r, c).is_pickup() {
                    found.push((r, c));
                }
            }
        }
        assert_eq!(found, vec![(4, 4), (4, 7)]);
        assert_eq!(g.total_dots(), 2);
    }

    #[test]
    fn expansion_fills_wall_blocks_solid() {
        let t = template_from(&[
            "# ",
            "  ",
        ]);
        let g = MazeGrid::build(&t, 2).unwrap();
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(g.tile_at(r, c), Tile::Wall);
            }
        }
        assert_eq!(g.tile_at(0, 2), Tile::Empty);
    }

    #[test]
    fn consume_dot_then_empty() {
        let t = template_from(&[
            "###",
            "#.#",
            "###",
        ]);
        let mut g = MazeGrid::build(&t, 1).unwrap();
        assert_eq!(g.consume(1, 1), Some(Pickup::Dot));
        assert_eq!(g.tile_at(1, 1), Tile::Empty);
        // Idempotent: second consume is a no-op.
        assert_eq!(g.consume(1, 1), None);
        assert_eq!(g.tile_at(1, 1), Tile::Empty);
    }

    #[test]
    fn consume_power_pellet() {
        let t = template_from(&[
            "###",
            "#o#",
            "###",
        ]);
        let mut g = MazeGrid::build(&t, 1).unwrap();
        assert_eq!(g.consume(1, 1), Some(Pickup::PowerPellet));
        assert_eq!(g.tile_at(1, 1), Tile::Empty);
    }

    #[test]
    fn consume_never_touches_walls() {
        let t = template_from(&[
            "###",
            "#.#",
            "###",
        ]);
        let mut g = MazeGrid::build(&t, 1).unwrap();
        assert_eq!(g.consume(0, 0), None);
        assert_eq!(g.tile_at(0, 0), Tile::Wall);
    }

    #[test]
    fn total_dots_fixed_at_construction() {
        let t = template_from(&[
            "#####",
            "#.o.#",
            "#####",
        ]);
        let mut g = MazeGrid::build(&t, 1).unwrap();
        g.consume(1, 1);
        g.consume(1, 2);
        assert_eq!(g.total_dots(), 3);
    }

    #[test]
    fn tunnel_band_detected_and_widened() {
        let t = template_from(&[
            "#####",
            "#...#",
            "    .",
            "#####",
        ]);
        let g = MazeGrid::build(&t, 1).unwrap();
        // Row 2 has passable edges; band widens to rows 1..=3.
        assert!(!g.is_tunnel_row(0));
        assert!(g.is_tunnel_row(1));
        assert!(g.is_tunnel_row(2));
        assert!(g.is_tunnel_row(3));
        assert!(!g.is_tunnel_row(4));
        assert!(!g.is_tunnel_row(-1));
    }

    #[test]
    fn tunnel_band_scales_with_expansion() {
        let t = template_from(&[
            "#####",
            "#...#",
            "    .",
            "#####",
        ]);
        let g = MazeGrid::build(&t, 3).unwrap();
        // Template band 1..4 expands to rows 3..12.
        assert!(!g.is_tunnel_row(2));
        assert!(g.is_tunnel_row(3));
        assert!(g.is_tunnel_row(11));
        assert!(!g.is_tunnel_row(12));
    }

    #[test]
    fn no_tunnels_means_empty_band() {
        let t = template_from(&[
            "###",
            "#.#",
            "###",
        ]);
        let g = MazeGrid::build(&t, 1).unwrap();
        for row in -2..5 {
            assert!(!g.is_tunnel_row(row));
        }
    }

    #[test]
    fn zero_scale_is_an_error() {
        let t = template_from(&["#"]);
        assert_eq!(MazeGrid::build(&t, 0).unwrap_err(), MazeError::ZeroScale);
    }

    #[test]
    fn empty_template_is_an_error() {
        let t = MazeTemplate { tiles: vec![], player_spawn: (0, 0), ghost_spawns: vec![] };
        assert_eq!(MazeGrid::build(&t, 1).unwrap_err(), MazeError::EmptyTemplate);
    }

    #[test]
    fn spawn_point_lands_on_block_center() {
        let t = template_from(&[
            "###",
            "# #",
            "###",
        ]);
        let g1 = MazeGrid::build(&t, 1).unwrap();
        assert_eq!(g1.spawn_point(1, 1), (1.5, 1.5));
        let g3 = MazeGrid::build(&t, 3).unwrap();
        assert_eq!(g3.spawn_point(1, 1), (4.5, 4.5));
    }

    #[test]
    fn decor_tokens_are_stable_and_bounded() {
        let t = template_from(&[
            "#####",
            "#...#",
            "#####",
        ]);
        let g = MazeGrid::build(&t, 1).unwrap();
        for r in 0..g.rows() {
            for c in 0..g.cols() {
                let tok = g.decor_token(r, c);
                assert!(tok < DECOR_KINDS);
                assert_eq!(tok, g.decor_token(r, c));
            }
        }
    }
}
