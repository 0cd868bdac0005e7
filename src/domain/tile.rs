/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Empty,
    Dot,         // regular pickup, 10 points
    PowerPellet, // energizer, 50 points + power mode
}

impl Tile {
    /// Does this tile block movement?
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Can an entity's bounding box overlap this tile?
    pub fn is_passable(self) -> bool {
        !self.is_wall()
    }

    /// Is this a consumable pickup?
    pub fn is_pickup(self) -> bool {
        matches!(self, Tile::Dot | Tile::PowerPellet)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}

/// What `consume` removed from a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pickup {
    Dot,
    PowerPellet,
}

impl Pickup {
    /// Score awarded for eating this pickup.
    pub fn points(self) -> u32 {
        match self {
            Pickup::Dot => 10,
            Pickup::PowerPellet => 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_blocks_everything_else_passes() {
        assert!(Tile::Wall.is_wall());
        assert!(!Tile::Wall.is_passable());
        for t in [Tile::Empty, Tile::Dot, Tile::PowerPellet] {
            assert!(t.is_passable());
            assert!(!t.is_wall());
        }
    }

    #[test]
    fn pickup_classification() {
        assert!(Tile::Dot.is_pickup());
        assert!(Tile::PowerPellet.is_pickup());
        assert!(!Tile::Wall.is_pickup());
        assert!(!Tile::Empty.is_pickup());
    }

    #[test]
    fn pickup_points() {
        assert_eq!(Pickup::Dot.points(), 10);
        assert_eq!(Pickup::PowerPellet.points(), 50);
    }
}
