//! Capacity planning: how many blocks, how large, and whether shares fit.

use crate::config::{HEADER_PIXELS, MAX_CHANNEL_VALUE};
use crate::error::{Error, Result};
use crate::sharing::Share;

/// Column and row counts of the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub columns: u32,
    pub rows: u32,
}

impl Geometry {
    /// Total number of blocks in the grid.
    pub fn block_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Full embedding plan for one carrier and one share set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    /// Grid dimensions.
    pub geometry: Geometry,
    /// Width and height of every block in pixels.
    pub block_size: (u32, u32),
    /// Carrier pixels per share byte (must be at least 1).
    pub capacity: u64,
    /// Pixels the largest share needs inside its block.
    pub required_pixels: usize,
}

impl GridPlan {
    /// Pixels available in every block.
    pub fn block_pixels(&self) -> usize {
        self.block_size.0 as usize * self.block_size.1 as usize
    }
}

/// Carrier pixels available per byte of share payload.
pub fn available_capacity(image_size: (u32, u32), total_share_bytes: usize) -> u64 {
    if total_share_bytes == 0 {
        return 0;
    }
    (image_size.0 as u64 * image_size.1 as u64) / total_share_bytes as u64
}

/// Grid geometry for `num_shares` shares.
///
/// Uses `columns = num_shares²` and `rows = ceil(num_shares / columns)`,
/// which always yields a single row of blocks.
pub fn grid_dimensions(num_shares: usize) -> Result<Geometry> {
    if num_shares == 0 {
        return Err(Error::InvalidParameters("no shares to place".to_string()));
    }

    let columns = num_shares
        .checked_mul(num_shares)
        .and_then(|c| u32::try_from(c).ok())
        .ok_or_else(|| Error::InvalidParameters(format!("{} shares is too many", num_shares)))?;
    let rows = num_shares.div_ceil(columns as usize) as u32;

    Ok(Geometry { columns, rows })
}

/// Rows recovery derives from the column count and the secret length.
pub fn recovery_rows(secret_len: usize, columns: u32) -> Result<u32> {
    if columns == 0 {
        return Err(Error::InvalidGrid("column count is zero".to_string()));
    }
    let rows = secret_len.div_ceil(columns as usize).max(1);
    u32::try_from(rows).map_err(|_| Error::InvalidGrid(format!("{} rows is too many", rows)))
}

/// Size of one block when the image is cut into `columns × rows`.
///
/// Remainder pixels on the right and bottom edges are dropped.
pub fn block_pixel_budget(image_size: (u32, u32), columns: u32, rows: u32) -> Result<(u32, u32)> {
    if columns == 0 || rows == 0 {
        return Err(Error::InvalidGrid(format!(
            "grid {}x{} has no blocks",
            columns, rows
        )));
    }

    let size = (image_size.0 / columns, image_size.1 / rows);
    if size.0 == 0 || size.1 == 0 {
        return Err(Error::Capacity(format!(
            "{}x{} image cannot hold a {}x{} grid",
            image_size.0, image_size.1, columns, rows
        )));
    }
    Ok(size)
}

/// Pixels a block needs to hold `digit_count` payload digits.
pub fn pixels_for_digits(digit_count: usize) -> usize {
    HEADER_PIXELS + digit_count
}

/// Plan the grid for `shares` inside an image of `image_size`.
///
/// `digit_count` gives the number of decimal digits each share encodes to.
/// Range failures are reported before block-size failures.
pub fn plan(
    image_size: (u32, u32),
    shares: &[Share],
    digit_count: impl Fn(&Share) -> usize,
) -> Result<GridPlan> {
    let total_bytes: usize = shares.iter().map(|s| s.payload.len()).sum();
    let capacity = available_capacity(image_size, total_bytes);
    if capacity < 1 {
        return Err(Error::Capacity(format!(
            "{}x{} image is too small for {} bytes of shares",
            image_size.0, image_size.1, total_bytes
        )));
    }

    let geometry = grid_dimensions(shares.len())?;
    let block_size = block_pixel_budget(image_size, geometry.columns, geometry.rows)?;

    let max_digits = shares.iter().map(digit_count).max().unwrap_or(0);
    if max_digits > MAX_CHANNEL_VALUE as usize {
        return Err(Error::EncodingRange {
            what: "payload digit count",
            value: max_digits,
            max: MAX_CHANNEL_VALUE as usize,
        });
    }
    let required_pixels = pixels_for_digits(max_digits);

    let plan = GridPlan {
        geometry,
        block_size,
        capacity,
        required_pixels,
    };

    if plan.block_pixels() < required_pixels {
        return Err(Error::Capacity(format!(
            "blocks of {}x{} pixels cannot hold {} encoded values",
            block_size.0, block_size.1, required_pixels
        )));
    }

    Ok(plan)
}
