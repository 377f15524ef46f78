//! Embedding and extraction of one share per block.

use crate::config::{HEADER_PIXELS, MAX_CHANNEL_VALUE};
use crate::encoding::value::{set_value, value};
use crate::error::{Error, Result};
use crate::layout::capacity::pixels_for_digits;
use crate::layout::Block;
use crate::sharing::Share;
use num_bigint::BigUint;
use std::collections::BTreeMap;

/// Decimal digits of the payload read as a big-endian unsigned integer.
pub fn payload_digits(payload: &[u8]) -> String {
    BigUint::from_bytes_be(payload).to_str_radix(10)
}

/// Check that `share` can be written into a block of `block_pixels` pixels.
///
/// Range problems are reported before capacity problems, and both before
/// anything is written.
pub fn check_share(share: &Share, block_pixels: usize) -> Result<()> {
    if share.index == 0 {
        return Err(Error::InvalidParameters(
            "share index 0 cannot be embedded".to_string(),
        ));
    }

    let digit_count = payload_digits(&share.payload).len();
    if digit_count > MAX_CHANNEL_VALUE as usize {
        return Err(Error::EncodingRange {
            what: "payload digit count",
            value: digit_count,
            max: MAX_CHANNEL_VALUE as usize,
        });
    }

    let needed = pixels_for_digits(digit_count);
    if block_pixels < needed {
        return Err(Error::Capacity(format!(
            "share {} needs {} pixels, block has {}",
            share.index, needed, block_pixels
        )));
    }

    Ok(())
}

/// Write `share` into the value channel of the block's leading pixels.
pub fn embed_share(block: &mut Block, share: &Share) -> Result<()> {
    check_share(share, block.pixel_count())?;

    let digits = payload_digits(&share.payload);
    let values = [digits.len() as u8, share.index]
        .into_iter()
        .chain(digits.bytes().map(|d| d - b'0'));

    for (pixel, v) in block.pixels.pixels_mut().zip(values) {
        set_value(pixel, v);
    }

    Ok(())
}

/// Read the share stored in `block`.
///
/// The returned payload is the minimal big-endian encoding of the stored
/// integer; leading zero bytes of the original payload are not recoverable
/// from the block alone (see [`Share::with_payload_len`]).
pub fn extract_share(block: &Block) -> Result<Share> {
    let values: Vec<u8> = block.pixels.pixels().map(value).collect();
    if values.len() < HEADER_PIXELS {
        return Err(Error::MalformedBlock(format!(
            "block at ({}, {}) has no room for a header",
            block.column, block.row
        )));
    }

    let digit_count = values[0] as usize;
    let index = values[1];

    if digit_count == 0 {
        return Err(Error::MalformedBlock("digit count is zero".to_string()));
    }
    if index == 0 {
        return Err(Error::MalformedBlock("share index is zero".to_string()));
    }

    let digits = values
        .get(HEADER_PIXELS..HEADER_PIXELS + digit_count)
        .ok_or_else(|| {
            Error::MalformedBlock(format!(
                "{} digits announced, block holds {}",
                digit_count,
                values.len() - HEADER_PIXELS
            ))
        })?;

    let mut text = String::with_capacity(digit_count);
    for &d in digits {
        if d > 9 {
            return Err(Error::MalformedBlock(format!("{} is not a decimal digit", d)));
        }
        text.push(char::from(b'0' + d));
    }

    let number = BigUint::parse_bytes(text.as_bytes(), 10)
        .ok_or_else(|| Error::MalformedBlock("unparsable digit string".to_string()))?;

    Ok(Share::new(index, number.to_bytes_be()))
}

/// Write shares into every block, cycling through `shares` when there are
/// more blocks than shares.
///
/// All blocks are validated first; on error no block has been touched.
pub fn embed_all(blocks: &mut [Block], shares: &[Share]) -> Result<()> {
    if shares.is_empty() {
        return Err(Error::InvalidParameters("no shares to embed".to_string()));
    }

    for (i, block) in blocks.iter().enumerate() {
        check_share(&shares[i % shares.len()], block.pixel_count())?;
    }

    for (i, block) in blocks.iter_mut().enumerate() {
        embed_share(block, &shares[i % shares.len()])?;
    }

    Ok(())
}

/// Read every block, skipping the ones that do not hold a readable share.
pub fn extract_all(blocks: &[Block]) -> Vec<Share> {
    blocks
        .iter()
        .filter_map(|block| match extract_share(block) {
            Ok(share) => Some(share),
            Err(e) => {
                tracing::warn!(
                    column = block.column,
                    row = block.row,
                    error = %e,
                    "skipping unreadable block"
                );
                None
            }
        })
        .collect()
}

/// Reduce extracted shares to one payload per index.
///
/// Identical `(index, payload)` pairs collapse into one. When an index
/// carries conflicting payloads the one seen in strictly the most blocks
/// wins; a tie drops the index.
pub fn collect_shares(extracted: Vec<Share>) -> Vec<Share> {
    let mut votes: BTreeMap<u8, BTreeMap<Vec<u8>, usize>> = BTreeMap::new();
    for share in extracted {
        *votes
            .entry(share.index)
            .or_default()
            .entry(share.payload)
            .or_default() += 1;
    }

    let mut shares = Vec::with_capacity(votes.len());
    for (index, candidates) in votes {
        let best = candidates.values().copied().max().unwrap_or(0);
        let mut winners = candidates.into_iter().filter(|(_, n)| *n == best);

        match (winners.next(), winners.next()) {
            (Some((payload, _)), None) => shares.push(Share::new(index, payload)),
            _ => tracing::warn!(index, "dropping share with tied conflicting payloads"),
        }
    }

    shares
}
