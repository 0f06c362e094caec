//! 2D grid for the world.

use biosim_core::{Cell, Coord, Error, Result, WorldConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A bounded 2D cell store. Also owns the barrier bookkeeping produced by the
/// barrier generator, which the rest of the simulation reads but never writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
    barrier_locations: Vec<Coord>,
    barrier_centers: Vec<Coord>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::Empty; size],
            barrier_locations: Vec::new(),
            barrier_centers: Vec::new(),
        }
    }

    /// Create an empty grid from world configuration
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.width, config.height)
    }

    /// Reset every cell to empty and forget the previous barrier layout
    pub fn zero_fill(&mut self) {
        self.cells.fill(Cell::Empty);
        self.barrier_locations.clear();
        self.barrier_centers.clear();
    }

    pub fn is_in_bounds(&self, loc: Coord) -> bool {
        loc.is_in_bounds(self.width, self.height)
    }

    /// Get cell at position
    pub fn get(&self, loc: Coord) -> Result<Cell> {
        let index = self.index_of(loc.x as i32, loc.y as i32)?;
        Ok(self.cells[index])
    }

    /// Set cell at position
    pub fn set(&mut self, loc: Coord, cell: Cell) -> Result<()> {
        self.set_xy(loc.x as i32, loc.y as i32, cell)
    }

    pub fn set_xy(&mut self, x: i32, y: i32, cell: Cell) -> Result<()> {
        let index = self.index_of(x, y)?;
        self.cells[index] = cell;
        Ok(())
    }

    pub fn is_empty_at(&self, loc: Coord) -> bool {
        matches!(self.get(loc), Ok(Cell::Empty))
    }

    pub fn is_barrier_at(&self, loc: Coord) -> bool {
        matches!(self.get(loc), Ok(Cell::Barrier))
    }

    pub fn is_occupied_at(&self, loc: Coord) -> bool {
        matches!(self.get(loc), Ok(Cell::Occupied(_)))
    }

    /// True for in-bounds cells on the outermost ring
    pub fn is_border(&self, loc: Coord) -> bool {
        let (x, y) = (loc.x as i32, loc.y as i32);
        self.is_in_bounds(loc) && (x == 0 || x == self.width - 1 || y == 0 || y == self.height - 1)
    }

    /// Pick a uniformly random empty cell, giving up after `max_attempts` draws
    pub fn find_empty_location<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        max_attempts: u32,
    ) -> Result<Coord> {
        if self.cells.is_empty() {
            return Err(Error::ResourceExhausted("grid has no cells".to_string()));
        }

        for _ in 0..max_attempts {
            let loc = Coord::new(
                rng.gen_range(0..self.width) as i16,
                rng.gen_range(0..self.height) as i16,
            );
            if self.is_empty_at(loc) {
                return Ok(loc);
            }
        }

        Err(Error::ResourceExhausted(format!(
            "no empty cell found in {max_attempts} attempts"
        )))
    }

    /// Every cell stamped as barrier by the last generation, in stamp order
    pub fn barrier_locations(&self) -> &[Coord] {
        &self.barrier_locations
    }

    /// Anchor points of radius-based barrier layouts
    pub fn barrier_centers(&self) -> &[Coord] {
        &self.barrier_centers
    }

    pub(crate) fn clear_barriers(&mut self) {
        self.barrier_locations.clear();
        self.barrier_centers.clear();
    }

    pub(crate) fn stamp_barrier(&mut self, loc: Coord) -> Result<()> {
        self.set(loc, Cell::Barrier)?;
        self.barrier_locations.push(loc);
        Ok(())
    }

    pub(crate) fn push_barrier_center(&mut self, center: Coord) {
        self.barrier_centers.push(center);
    }

    /// Row-per-line text view, y = 0 first
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height.max(0) as usize);
        for row in self.cells.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(Cell::glyph));
            out.push('\n');
        }
        out
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), *cell))
    }

    fn index_of(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) as usize)
    }

    fn index_to_pos(&self, index: usize) -> Coord {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Coord::new(x as i16, y as i16)
    }
}
