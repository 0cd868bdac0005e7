/// Maze templates.
///
/// A maze is authored as a text diagram and parsed into a
/// [`MazeTemplate`] before the grid expansion runs.
///
/// ## Tile legend:
///   '#' = Wall                   '.' = Dot
///   'o' = Power pellet           ' ' = Empty
///   'P' = Player spawn           'G' = Ghost spawn
///
/// Spawn markers sit on Empty cells. Parsing fails fast on ragged
/// rows, unknown characters, or a missing/duplicate player marker;
/// the simulation never runs against a malformed maze.

use crate::domain::grid::{MazeError, MazeTemplate};
use crate::domain::tile::Tile;

/// Parse a text diagram into a template. Ghost spawns are collected in
/// row-major scan order, which fixes ghost indexing for the session.
pub fn parse_template(rows: &[&str]) -> Result<MazeTemplate, MazeError> {
    if rows.is_empty() || rows[0].is_empty() {
        return Err(MazeError::EmptyTemplate);
    }

    let expected = rows[0].chars().count();
    let mut tiles = Vec::with_capacity(rows.len());
    let mut player_spawn: Option<(usize, usize)> = None;
    let mut ghost_spawns = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        let got = row.chars().count();
        if got != expected {
            return Err(MazeError::RaggedRow { row: r, expected, got });
        }

        let mut line = Vec::with_capacity(expected);
        for (c, ch) in row.chars().enumerate() {
            let tile = match ch {
                '#' => Tile::Wall,
                '.' => Tile::Dot,
                'o' => Tile::PowerPellet,
                ' ' => Tile::Empty,
                'P' => {
                    if player_spawn.replace((c, r)).is_some() {
                        return Err(MazeError::DuplicatePlayerSpawn);
                    }
                    Tile::Empty
                }
                'G' => {
                    ghost_spawns.push((c, r));
                    Tile::Empty
                }
                other => {
                    return Err(MazeError::UnknownTile { ch: other, row: r, col: c });
                }
            };
            line.push(tile);
        }
        tiles.push(line);
    }

    let player_spawn = player_spawn.ok_or(MazeError::MissingPlayerSpawn)?;
    Ok(MazeTemplate { tiles, player_spawn, ghost_spawns })
}

/// The classic 31×28 maze: side tunnel on row 14, four power pellets in
/// the corners, ghost house in the center, 244 pickups.
pub fn classic_maze() -> Result<MazeTemplate, MazeError> {
    parse_template(CLASSIC_ROWS)
}

const CLASSIC_ROWS: &[&str] = &[
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###  ### ##.######",
    "######.## #      # ##.######",
    "      .   # G G  #   .      ",
    "######.## #  G G # ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##....... P.......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::MazeGrid;

    #[test]
    fn classic_maze_parses() {
        let t = classic_maze().unwrap();
        assert_eq!(t.tiles.len(), 31);
        assert!(t.tiles.iter().all(|row| row.len() == 28));
    }

    #[test]
    fn classic_maze_spawns() {
        let t = classic_maze().unwrap();
        assert_eq!(t.player_spawn, (14, 23));
        assert_eq!(t.ghost_spawns, vec![(12, 14), (14, 14), (13, 15), (15, 15)]);
    }

    #[test]
    fn classic_maze_pickup_census() {
        let t = classic_maze().unwrap();
        let dots = t.tiles.iter().flatten().filter(|&&x| x == Tile::Dot).count();
        let pellets = t.tiles.iter().flatten().filter(|&&x| x == Tile::PowerPellet).count();
        assert_eq!(dots, 240);
        assert_eq!(pellets, 4);

        let g = MazeGrid::build(&t, 1).unwrap();
        assert_eq!(g.total_dots(), 244);
    }

    #[test]
    fn classic_maze_tunnel_band() {
        let t = classic_maze().unwrap();
        let g = MazeGrid::build(&t, 1).unwrap();
        assert!(!g.is_tunnel_row(12));
        assert!(g.is_tunnel_row(13));
        assert!(g.is_tunnel_row(14));
        assert!(g.is_tunnel_row(15));
        assert!(!g.is_tunnel_row(16));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = parse_template(&["###", "##"]).unwrap_err();
        assert_eq!(err, MazeError::RaggedRow { row: 1, expected: 3, got: 2 });
    }

    #[test]
    fn unknown_character_rejected() {
        let err = parse_template(&["#P#", "#X#"]).unwrap_err();
        assert_eq!(err, MazeError::UnknownTile { ch: 'X', row: 1, col: 1 });
    }

    #[test]
    fn missing_player_spawn_rejected() {
        let err = parse_template(&["###", "#.#", "###"]).unwrap_err();
        assert_eq!(err, MazeError::MissingPlayerSpawn);
    }

    #[test]
    fn duplicate_player_spawn_rejected() {
        let err = parse_template(&["#PP#"]).unwrap_err();
        assert_eq!(err, MazeError::DuplicatePlayerSpawn);
    }

    #[test]
    fn empty_template_rejected() {
        assert_eq!(parse_template(&[]).unwrap_err(), MazeError::EmptyTemplate);
        assert_eq!(parse_template(&[""]).unwrap_err(), MazeError::EmptyTemplate);
    }

    #[test]
    fn spawn_markers_leave_empty_cells() {
        let t = parse_template(&["# P G #"]).unwrap();
        assert_eq!(t.tiles[0][2], Tile::Empty);
        assert_eq!(t.tiles[0][4], Tile::Empty);
    }
}
