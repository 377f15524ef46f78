//! Grid layout of the carrier image.
//!
//! This module handles:
//! - Capacity checks and grid geometry planning
//! - Cropping the carrier into blocks and stitching them back together

mod blocks;
pub mod capacity;

pub use blocks::{merge, split, Block};
pub use capacity::{
    available_capacity, block_pixel_budget, grid_dimensions, recovery_rows, Geometry, GridPlan,
};
