//! Core type definitions for the world grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// 2D grid coordinate. Also used as a displacement when two coordinates are subtracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i16,
    pub y: i16,
}

impl Coord {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a displacement vector
    pub fn length(&self) -> f32 {
        let x = self.x as f32;
        let y = self.y as f32;
        (x * x + y * y).sqrt()
    }

    /// Euclidean distance to another coordinate
    pub fn distance(&self, other: &Coord) -> f32 {
        (*self - *other).length()
    }

    pub fn is_in_bounds(&self, width: i32, height: i32) -> bool {
        let (x, y) = (self.x as i32, self.y as i32);
        x >= 0 && x < width && y >= 0 && y < height
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Barrier,
    /// Occupied by the agent with this index
    Occupied(u16),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self, Cell::Barrier)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Cell::Occupied(_))
    }

    /// Single-character glyph used by text renderings of the grid
    pub fn glyph(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Barrier => '#',
            Cell::Occupied(_) => 'o',
        }
    }
}
