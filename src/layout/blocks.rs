//! Cropping the carrier into a grid of blocks and stitching it back.
//!
//! Blocks are ordered column-major: every row of column 0, then every row
//! of column 1, and so on.

use crate::error::{Error, Result};
use crate::layout::capacity::{block_pixel_budget, Geometry};
use image::{imageops, RgbImage};

/// A rectangular crop of the carrier at a grid position.
#[derive(Debug, Clone)]
pub struct Block {
    /// Grid column.
    pub column: u32,
    /// Grid row.
    pub row: u32,
    /// Block pixels.
    pub pixels: RgbImage,
}

impl Block {
    /// Number of pixels in the block.
    pub fn pixel_count(&self) -> usize {
        self.pixels.width() as usize * self.pixels.height() as usize
    }
}

/// Cut `image` into `columns × rows` equally sized blocks.
pub fn split(image: &RgbImage, geometry: Geometry) -> Result<Vec<Block>> {
    let (block_w, block_h) =
        block_pixel_budget(image.dimensions(), geometry.columns, geometry.rows)?;

    let mut blocks = Vec::with_capacity(geometry.block_count());
    for column in 0..geometry.columns {
        for row in 0..geometry.rows {
            let pixels =
                imageops::crop_imm(image, column * block_w, row * block_h, block_w, block_h)
                    .to_image();
            blocks.push(Block {
                column,
                row,
                pixels,
            });
        }
    }

    Ok(blocks)
}

/// Reassemble blocks produced by [`split`] into one image of
/// `block_w * columns × block_h * rows` pixels.
pub fn merge(blocks: &[Block], geometry: Geometry) -> Result<RgbImage> {
    if geometry.columns == 0 || geometry.rows == 0 || blocks.is_empty() {
        return Err(Error::InvalidGrid(format!(
            "grid {}x{} with {} blocks is empty",
            geometry.columns,
            geometry.rows,
            blocks.len()
        )));
    }
    if blocks.len() != geometry.block_count() {
        return Err(Error::InvalidGrid(format!(
            "{} blocks do not fill a {}x{} grid",
            blocks.len(),
            geometry.columns,
            geometry.rows
        )));
    }

    let (block_w, block_h) = blocks[0].pixels.dimensions();
    let mut image = RgbImage::new(block_w * geometry.columns, block_h * geometry.rows);

    for (i, block) in blocks.iter().enumerate() {
        if block.pixels.dimensions() != (block_w, block_h) {
            return Err(Error::InvalidGrid(format!(
                "block {} is {}x{}, expected {}x{}",
                i,
                block.pixels.width(),
                block.pixels.height(),
                block_w,
                block_h
            )));
        }

        let column = (i / geometry.rows as usize) as u32;
        let row = (i % geometry.rows as usize) as u32;
        imageops::replace(
            &mut image,
            &block.pixels,
            (column * block_w) as i64,
            (row * block_h) as i64,
        );
    }

    Ok(image)
}
