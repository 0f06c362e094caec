//! Procedural barrier layouts.
//!
//! Generation runs in two phases. [`BarrierGenerator::plan`] turns a layout into a list
//! of shapes (drawing from the rng where the layout is randomized), and [`stamp_plan`]
//! writes those shapes into the grid, recording every stamped cell. All rectangles are
//! bounds-checked before the first cell is written.

use crate::grid::Grid;
use crate::neighborhood::neighborhood;
use biosim_core::{BarrierConfig, Coord, Error, Result, WorldConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

/// The closed set of barrier layouts, keyed by selector code 0..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarrierLayout {
    /// No barriers
    None,
    /// Vertical bar in a constant location
    VerticalBarConstant,
    /// Vertical bar in a random location
    VerticalBarRandom,
    /// Five blocks in a staggered cross
    FiveBlocksStaggered,
    /// Horizontal bar in a constant location
    HorizontalBarConstant,
    /// Floating islands, relocated every generation
    FloatingIslands,
    /// Evenly spaced spots down the vertical center line
    Spots,
}

impl BarrierLayout {
    pub const ALL: [BarrierLayout; 7] = [
        BarrierLayout::None,
        BarrierLayout::VerticalBarConstant,
        BarrierLayout::VerticalBarRandom,
        BarrierLayout::FiveBlocksStaggered,
        BarrierLayout::HorizontalBarConstant,
        BarrierLayout::FloatingIslands,
        BarrierLayout::Spots,
    ];

    pub fn code(&self) -> u32 {
        match self {
            BarrierLayout::None => 0,
            BarrierLayout::VerticalBarConstant => 1,
            BarrierLayout::VerticalBarRandom => 2,
            BarrierLayout::FiveBlocksStaggered => 3,
            BarrierLayout::HorizontalBarConstant => 4,
            BarrierLayout::FloatingIslands => 5,
            BarrierLayout::Spots => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BarrierLayout::None => "none",
            BarrierLayout::VerticalBarConstant => "vertical-bar-constant",
            BarrierLayout::VerticalBarRandom => "vertical-bar-random",
            BarrierLayout::FiveBlocksStaggered => "five-blocks-staggered",
            BarrierLayout::HorizontalBarConstant => "horizontal-bar-constant",
            BarrierLayout::FloatingIslands => "floating-islands",
            BarrierLayout::Spots => "spots",
        }
    }
}

impl TryFrom<u32> for BarrierLayout {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        BarrierLayout::ALL
            .into_iter()
            .find(|layout| layout.code() == code)
            .ok_or(Error::UnknownBarrierType(code))
    }
}

/// Inclusive axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Rect {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Number of cells covered
    pub fn area(&self) -> usize {
        let w = (self.max_x - self.min_x + 1).max(0) as usize;
        let h = (self.max_y - self.min_y + 1).max(0) as usize;
        w * h
    }

    fn check_bounds(&self, width: i32, height: i32) -> Result<()> {
        for (x, y) in [(self.min_x, self.min_y), (self.max_x, self.max_y)] {
            if x < 0 || x >= width || y < 0 || y >= height {
                return Err(Error::OutOfBounds {
                    x,
                    y,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }
}

/// One barrier primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Disk { center: Coord, radius: f32 },
}

/// Shapes to stamp plus the anchor centers to record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarrierPlan {
    pub shapes: Vec<Shape>,
    pub centers: Vec<Coord>,
}

impl BarrierPlan {
    /// Total cells stamped, counting overlaps once per shape
    pub fn stamped_cells(&self, width: i32, height: i32) -> usize {
        self.shapes
            .iter()
            .map(|shape| match shape {
                Shape::Rect(rect) => rect.area(),
                Shape::Disk { center, radius } => {
                    neighborhood(*center, *radius, width, height).len()
                }
            })
            .sum()
    }
}

/// Generates barrier layouts for a world of fixed dimensions
#[derive(Debug, Clone)]
pub struct BarrierGenerator {
    width: i32,
    height: i32,
    config: BarrierConfig,
}

impl BarrierGenerator {
    pub fn new(world: &WorldConfig, config: BarrierConfig) -> Self {
        Self {
            width: world.width,
            height: world.height,
            config,
        }
    }

    /// Generate from a raw selector code. Unknown codes are rejected before the grid is touched.
    pub fn create_barrier<R: Rng + ?Sized>(
        &self,
        selector: u32,
        grid: &mut Grid,
        rng: &mut R,
    ) -> Result<()> {
        let layout = BarrierLayout::try_from(selector)?;
        self.generate(layout, grid, rng)
    }

    /// Replace the grid's barrier lists with a freshly generated layout. Assumes the grid
    /// holds no barrier cells on entry.
    #[instrument(skip(self, layout, grid, rng), fields(layout = layout.name()))]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        layout: BarrierLayout,
        grid: &mut Grid,
        rng: &mut R,
    ) -> Result<()> {
        grid.clear_barriers();

        let plan = self.plan(layout, rng)?;
        stamp_plan(&plan, grid)?;

        info!(
            event = "barrier_generated",
            layout = layout.name(),
            shapes = plan.shapes.len(),
            centers = grid.barrier_centers().len(),
            cells = grid.barrier_locations().len(),
            "Barrier layout generated"
        );
        Ok(())
    }

    /// Compute the shapes for a layout without touching any grid
    pub fn plan<R: Rng + ?Sized>(&self, layout: BarrierLayout, rng: &mut R) -> Result<BarrierPlan> {
        let (w, h) = (self.width, self.height);

        let plan = match layout {
            BarrierLayout::None => BarrierPlan::default(),

            BarrierLayout::VerticalBarConstant => {
                let min_x = w / 2;
                let min_y = h / 4;
                BarrierPlan {
                    shapes: vec![Shape::Rect(Rect::new(min_x, min_y, min_x + 1, min_y + h / 2))],
                    centers: Vec::new(),
                }
            }

            BarrierLayout::VerticalBarRandom => {
                // Both edges of the 3-wide bar must land inside the grid
                let margin_x = w / 10;
                let margin_y = h / 4;
                let mid_x = draw(rng, margin_x.max(1), (w - margin_x - 1).min(w - 2))?;
                let mid_y = draw(rng, margin_y, h - margin_y - 1)?;

                BarrierPlan {
                    shapes: vec![Shape::Rect(Rect::new(
                        mid_x - 1,
                        mid_y - h / 4,
                        mid_x + 1,
                        mid_y + h / 4,
                    ))],
                    centers: vec![Coord::new(mid_x as i16, mid_y as i16)],
                }
            }

            BarrierLayout::FiveBlocksStaggered => BarrierPlan {
                shapes: staggered_blocks(w, h).into_iter().map(Shape::Rect).collect(),
                centers: Vec::new(),
            },

            BarrierLayout::HorizontalBarConstant => {
                let min_x = w / 4;
                let min_y = h / 2 + h / 4;
                BarrierPlan {
                    shapes: vec![Shape::Rect(Rect::new(min_x, min_y, min_x + w / 2, min_y + 2))],
                    centers: Vec::new(),
                }
            }

            BarrierLayout::FloatingIslands => {
                let centers = self.place_islands(rng)?;
                let radius = self.config.island_radius;
                BarrierPlan {
                    shapes: centers
                        .iter()
                        .map(|&center| Shape::Disk { center, radius })
                        .collect(),
                    centers,
                }
            }

            BarrierLayout::Spots => {
                let count = self.config.spot_count;
                let slice = h / (count as i32 + 1);
                let centers: Vec<Coord> = (1..=count as i32)
                    .map(|n| Coord::new((w / 2) as i16, (n * slice) as i16))
                    .collect();
                let radius = self.config.spot_radius;
                BarrierPlan {
                    shapes: centers
                        .iter()
                        .map(|&center| Shape::Disk { center, radius })
                        .collect(),
                    centers,
                }
            }
        };

        debug!(
            layout = layout.name(),
            shapes = plan.shapes.len(),
            cells = plan.stamped_cells(w, h),
            "Barrier plan ready"
        );
        Ok(plan)
    }

    /// Rejection-sample island centers until every pair is at least one margin apart
    fn place_islands<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Coord>> {
        let count = self.config.island_count;
        let margin = self.config.island_margin();
        let (hi_x, hi_y) = (self.width - margin - 1, self.height - margin - 1);

        if hi_x < margin || hi_y < margin {
            return Err(Error::PlacementInfeasible { attempts: 0 });
        }

        let mut centers = Vec::with_capacity(count);
        for attempt in 1..=self.config.max_placement_attempts {
            centers.clear();
            centers.extend((0..count).map(|_| {
                Coord::new(
                    rng.gen_range(margin..=hi_x) as i16,
                    rng.gen_range(margin..=hi_y) as i16,
                )
            }));

            if well_separated(&centers, margin as f32) {
                debug!(attempts = attempt, islands = count, "Island placement accepted");
                return Ok(centers);
            }
            trace!(attempt, "Island placement rejected");
        }

        Err(Error::PlacementInfeasible {
            attempts: self.config.max_placement_attempts,
        })
    }
}

/// Stamp every shape of a plan into the grid and record the plan's centers
pub fn stamp_plan(plan: &BarrierPlan, grid: &mut Grid) -> Result<()> {
    for shape in &plan.shapes {
        match shape {
            Shape::Rect(rect) => rect.check_bounds(grid.width, grid.height)?,
            Shape::Disk { center, .. } => {
                if !grid.is_in_bounds(*center) {
                    return Err(Error::OutOfBounds {
                        x: center.x as i32,
                        y: center.y as i32,
                        width: grid.width,
                        height: grid.height,
                    });
                }
            }
        }
    }

    for shape in &plan.shapes {
        match shape {
            Shape::Rect(rect) => stamp_rect(grid, rect)?,
            Shape::Disk { center, radius } => stamp_disk(grid, *center, *radius)?,
        }
    }

    for &center in &plan.centers {
        grid.push_barrier_center(center);
    }
    Ok(())
}

/// Stamp an inclusive box, outer loop over x
fn stamp_rect(grid: &mut Grid, rect: &Rect) -> Result<()> {
    for x in rect.min_x..=rect.max_x {
        for y in rect.min_y..=rect.max_y {
            grid.stamp_barrier(Coord::new(x as i16, y as i16))?;
        }
    }
    Ok(())
}

fn stamp_disk(grid: &mut Grid, center: Coord, radius: f32) -> Result<()> {
    for loc in neighborhood(center, radius, grid.width, grid.height) {
        grid.stamp_barrier(loc)?;
    }
    Ok(())
}

/// Five blocks: four at the quarter points and one in the middle
fn staggered_blocks(w: i32, h: i32) -> Vec<Rect> {
    let block_w = 2;
    let block_h = w / 3;

    let mut x0 = w / 4 - block_w / 2;
    let mut y0 = h / 4 - block_h / 2;
    let mut blocks = Vec::with_capacity(5);

    blocks.push(Rect::new(x0, y0, x0 + block_w, y0 + block_h));
    x0 += w / 2;
    blocks.push(Rect::new(x0, y0, x0 + block_w, y0 + block_h));
    y0 += h / 2;
    blocks.push(Rect::new(x0, y0, x0 + block_w, y0 + block_h));
    x0 -= w / 2;
    blocks.push(Rect::new(x0, y0, x0 + block_w, y0 + block_h));

    let x0 = w / 2 - block_w / 2;
    let y0 = h / 2 - block_h / 2;
    blocks.push(Rect::new(x0, y0, x0 + block_w, y0 + block_h));

    blocks
}

fn well_separated(centers: &[Coord], min_distance: f32) -> bool {
    centers.iter().enumerate().all(|(i, a)| {
        centers[i + 1..]
            .iter()
            .all(|b| a.distance(b) >= min_distance)
    })
}

fn draw<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> Result<i32> {
    if lo > hi {
        return Err(Error::InvalidConfig(format!(
            "grid too small for barrier placement range {lo}..={hi}"
        )));
    }
    Ok(rng.gen_range(lo..=hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generator(width: i32, height: i32) -> BarrierGenerator {
        BarrierGenerator::new(&WorldConfig { width, height }, BarrierConfig::default())
    }

    #[test]
    fn test_selector_codes_round_trip() {
        for layout in BarrierLayout::ALL {
            assert_eq!(BarrierLayout::try_from(layout.code()).unwrap(), layout);
        }
        assert!(matches!(
            BarrierLayout::try_from(7),
            Err(Error::UnknownBarrierType(7))
        ));
    }

    #[test]
    fn test_rect_area() {
        assert_eq!(Rect::new(2, 3, 4, 7).area(), 15);
        assert_eq!(Rect::new(5, 5, 5, 5).area(), 1);
    }

    #[test]
    fn test_stamp_rect_order_is_x_major() {
        let mut grid = Grid::new(8, 8);
        stamp_rect(&mut grid, &Rect::new(1, 1, 2, 2)).unwrap();
        assert_eq!(
            grid.barrier_locations(),
            &[
                Coord::new(1, 1),
                Coord::new(1, 2),
                Coord::new(2, 1),
                Coord::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_constant_bar_geometry() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let plan = generator(128, 128)
            .plan(BarrierLayout::VerticalBarConstant, &mut rng)
            .unwrap();
        assert_eq!(plan.shapes, vec![Shape::Rect(Rect::new(64, 32, 65, 96))]);

        let plan = generator(128, 128)
            .plan(BarrierLayout::HorizontalBarConstant, &mut rng)
            .unwrap();
        assert_eq!(plan.shapes, vec![Shape::Rect(Rect::new(32, 96, 96, 98))]);
    }

    #[test]
    fn test_staggered_blocks_geometry() {
        let blocks = staggered_blocks(128, 128);
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0], Rect::new(31, 11, 33, 53));
        assert_eq!(blocks[1], Rect::new(95, 11, 97, 53));
        assert_eq!(blocks[2], Rect::new(95, 75, 97, 117));
        assert_eq!(blocks[3], Rect::new(31, 75, 33, 117));
        assert_eq!(blocks[4], Rect::new(63, 43, 65, 85));
        assert!(blocks.iter().all(|b| b.area() == 3 * 43));
    }

    #[test]
    fn test_random_bar_stays_in_bounds_for_many_seeds() {
        let barriers = generator(128, 128);
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let plan = barriers.plan(BarrierLayout::VerticalBarRandom, &mut rng).unwrap();
            let Shape::Rect(rect) = plan.shapes[0] else {
                panic!("expected a rectangle");
            };
            assert!(rect.check_bounds(128, 128).is_ok(), "seed {seed}: {rect:?}");
            assert_eq!(plan.centers.len(), 1);
            assert_eq!(rect.min_x + 1, plan.centers[0].x as i32);
        }
    }

    #[test]
    fn test_spots_geometry() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let plan = generator(128, 128).plan(BarrierLayout::Spots, &mut rng).unwrap();
        let ys: Vec<i16> = plan.centers.iter().map(|c| c.y).collect();
        assert_eq!(ys, vec![21, 42, 63, 84, 105]);
        assert!(plan.centers.iter().all(|c| c.x == 64));
        assert_eq!(plan.stamped_cells(128, 128), 5 * 81);
    }

    #[test]
    fn test_islands_infeasible_margin_fails_fast() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = generator(20, 20).plan(BarrierLayout::FloatingIslands, &mut rng);
        assert!(matches!(
            result,
            Err(Error::PlacementInfeasible { attempts: 0 })
        ));
    }

    #[test]
    fn test_islands_attempt_cap() {
        // Room for centers, but twelve of them can never be 12 apart in a 4x4 box
        let config = BarrierConfig {
            max_placement_attempts: 25,
            ..BarrierConfig::default()
        };
        let barriers = BarrierGenerator::new(&WorldConfig { width: 28, height: 28 }, config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            barriers.plan(BarrierLayout::FloatingIslands, &mut rng),
            Err(Error::PlacementInfeasible { attempts: 25 })
        ));
    }

    #[test]
    fn test_random_bar_on_narrow_grid_never_leaves_bounds() {
        let barriers = generator(8, 40);
        for seed in 0..100 {
            let mut grid = Grid::new(8, 40);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            barriers
                .generate(BarrierLayout::VerticalBarRandom, &mut grid, &mut rng)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            let center = grid.barrier_centers()[0];
            assert!(center.x >= 1 && center.x <= 6, "seed {seed}: {center}");
        }
    }

    #[test]
    fn test_random_bar_too_narrow_fails_for_every_seed() {
        let barriers = generator(2, 40);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert!(matches!(
                barriers.plan(BarrierLayout::VerticalBarRandom, &mut rng),
                Err(Error::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_zero_radius_islands_stay_in_bounds() {
        let config = BarrierConfig {
            island_radius: 0.0,
            ..BarrierConfig::default()
        };
        let barriers = BarrierGenerator::new(&WorldConfig { width: 128, height: 128 }, config);
        for seed in 0..200 {
            let mut grid = Grid::new(128, 128);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            barriers
                .generate(BarrierLayout::FloatingIslands, &mut grid, &mut rng)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert_eq!(grid.barrier_centers().len(), 12);
            assert_eq!(grid.barrier_locations(), grid.barrier_centers());
        }
    }

    #[test]
    fn test_unknown_selector_leaves_grid_untouched() {
        let mut grid = Grid::new(64, 64);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let result = generator(64, 64).create_barrier(99, &mut grid, &mut rng);
        assert!(matches!(result, Err(Error::UnknownBarrierType(99))));
        assert!(grid.iter().all(|(_, cell)| cell.is_empty()));
    }

    #[test]
    fn test_out_of_bounds_plan_stamps_nothing() {
        let mut grid = Grid::new(10, 10);
        let plan = BarrierPlan {
            shapes: vec![
                Shape::Rect(Rect::new(0, 0, 1, 1)),
                Shape::Rect(Rect::new(8, 8, 10, 9)),
            ],
            centers: Vec::new(),
        };
        assert!(matches!(
            stamp_plan(&plan, &mut grid),
            Err(Error::OutOfBounds { x: 10, y: 9, .. })
        ));
        assert!(grid.barrier_locations().is_empty());
        assert!(grid.is_empty_at(Coord::new(0, 0)));
    }

    #[test]
    fn test_small_grid_random_bar_is_an_error() {
        let mut grid = Grid::new(2, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result = generator(2, 4).generate(BarrierLayout::VerticalBarRandom, &mut grid, &mut rng);
        assert!(result.is_err());
        assert!(grid.iter().all(|(_, cell)| cell.is_empty()));
    }

    #[test]
    fn test_well_separated() {
        let centers = [Coord::new(0, 0), Coord::new(12, 0), Coord::new(0, 12)];
        assert!(well_separated(&centers, 12.0));
        assert!(!well_separated(&centers, 12.5));
        assert!(well_separated(&[], 12.0));
    }
}
