/// A cell position in the arena.
///
/// `x` grows to the right (east) and `y` grows upward (north), so the
/// bottom-left cell is `(0, 0)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// One of the four directions the snake can head in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit displacement `(dx, dy)` of one move in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Arena dimensions in cells.
///
/// Playable cells are `0..width` horizontally and `0..height` vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Arena {
    pub const DEFAULT: Self = Self {
        width: 50,
        height: 20,
    };

    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        0 <= coord.x && coord.x < self.width && 0 <= coord.y && coord.y < self.height
    }

    /// Iterates over every cell, row by row from the bottom.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_follows_delta() {
        let origin = Coord::new(3, 3);
        assert_eq!(origin.step(Direction::Up), Coord::new(3, 4));
        assert_eq!(origin.step(Direction::Down), Coord::new(3, 2));
        assert_eq!(origin.step(Direction::Left), Coord::new(2, 3));
        assert_eq!(origin.step(Direction::Right), Coord::new(4, 3));
    }

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
    }

    #[test]
    fn test_arena_bounds() {
        let arena = Arena {
            width: 4,
            height: 3,
        };
        assert!(arena.contains(Coord::new(0, 0)));
        assert!(arena.contains(Coord::new(3, 2)));
        assert!(!arena.contains(Coord::new(4, 0)));
        assert!(!arena.contains(Coord::new(0, 3)));
        assert!(!arena.contains(Coord::new(-1, 1)));
        assert_eq!(arena.cells().count(), 12);
    }
}
