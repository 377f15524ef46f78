//! PKCS#7 padding to a fixed block multiple.

use crate::error::{Error, Result};

/// Pad `data` to a multiple of `block_size`.
///
/// Always appends between 1 and `block_size` bytes, each equal to the
/// number of bytes appended.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!((1..=255).contains(&block_size));

    let fill = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + fill);
    padded.extend_from_slice(data);
    padded.resize(data.len() + fill, fill as u8);
    padded
}

/// Remove PKCS#7 padding added by [`pad`].
pub fn unpad(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(Error::Reconstruction(format!(
            "padded length {} is not a multiple of {}",
            data.len(),
            block_size
        )));
    }

    let fill = data[data.len() - 1] as usize;
    if fill == 0 || fill > block_size {
        return Err(Error::Reconstruction("invalid padding byte".to_string()));
    }

    let (body, tail) = data.split_at(data.len() - fill);
    if tail.iter().any(|&b| b as usize != fill) {
        return Err(Error::Reconstruction("inconsistent padding".to_string()));
    }

    Ok(body.to_vec())
}

/// Length of `len` bytes after padding to `block_size`.
pub fn padded_len(len: usize, block_size: usize) -> usize {
    (len / block_size + 1) * block_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_short_input() {
        let padded = pad(b"secret", 16);
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[..6], b"secret");
        assert!(padded[6..].iter().all(|&b| b == 10));
    }

    #[test]
    fn test_aligned_input_gets_full_block() {
        let padded = pad(&[7u8; 16], 16);
        assert_eq!(padded.len(), 32);
        assert!(padded[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn test_unpad_reverses_pad() {
        for len in 0..40 {
            let data: Vec<u8> = (0..len as u8).collect();
            let padded = pad(&data, 16);
            assert_eq!(padded.len(), padded_len(len, 16));
            assert_eq!(unpad(&padded, 16).unwrap(), data);
        }
    }

    #[test]
    fn test_unpad_rejects_garbage() {
        assert!(unpad(&[], 16).is_err());
        assert!(unpad(&[1, 2, 3], 16).is_err());

        let mut padded = pad(b"abc", 16);
        padded[14] = 0xAA;
        assert!(unpad(&padded, 16).is_err());

        let mut zero_fill = pad(b"abc", 16);
        zero_fill[15] = 0;
        assert!(unpad(&zero_fill, 16).is_err());
    }
}
