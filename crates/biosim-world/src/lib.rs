//! World grid and procedural barrier layouts.
//!
//! This module implements the 2D cell store agents live in, plus the generator that
//! stamps obstacle layouts into it at the start of each epoch.

pub mod grid;
pub mod neighborhood;
pub mod barrier;

pub use grid::Grid;
pub use neighborhood::{neighborhood, visit_neighborhood};
pub use barrier::{stamp_plan, BarrierGenerator, BarrierLayout, BarrierPlan, Rect, Shape};
