//! Byte-wise Shamir secret sharing over GF(256).
//!
//! Every byte of the secret gets its own random polynomial of degree
//! `threshold - 1` whose constant term is that byte. Share `i` holds the
//! evaluations of all those polynomials at `x = i`.

use crate::error::{Error, Result};
use crate::sharing::field::Gf256;
use rand::RngCore;

/// One fragment of a split secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Share {
    /// Share identifier (the x-coordinate). Never zero.
    pub index: u8,
    /// Polynomial evaluations, one per secret byte.
    pub payload: Vec<u8>,
}

impl Share {
    /// Create a share from its parts.
    pub fn new(index: u8, payload: Vec<u8>) -> Self {
        Self { index, payload }
    }

    /// Left-pad the payload with zero bytes up to `len`.
    ///
    /// Payloads read back from an image lose their leading zero bytes, so
    /// they have to be restored to the length the split produced.
    pub fn with_payload_len(mut self, len: usize) -> Result<Self> {
        if self.payload.len() > len {
            return Err(Error::Reconstruction(format!(
                "share {} carries {} bytes, expected at most {}",
                self.index,
                self.payload.len(),
                len
            )));
        }

        let missing = len - self.payload.len();
        if missing > 0 {
            let mut padded = vec![0u8; missing];
            padded.extend_from_slice(&self.payload);
            self.payload = padded;
        }
        Ok(self)
    }
}

/// Split `secret` into `share_count` shares, any `threshold` of which
/// reconstruct it.
pub fn split_bytes(secret: &[u8], threshold: u8, share_count: u8) -> Result<Vec<Share>> {
    if secret.is_empty() {
        return Err(Error::InvalidParameters("secret is empty".to_string()));
    }
    if threshold == 0 || threshold > share_count {
        return Err(Error::InvalidParameters(format!(
            "threshold {} must be between 1 and share count {}",
            threshold, share_count
        )));
    }

    let mut shares: Vec<Share> = (1..=share_count)
        .map(|index| Share::new(index, vec![0u8; secret.len()]))
        .collect();

    let mut rng = rand::thread_rng();
    let mut coeffs = vec![Gf256::ZERO; threshold as usize];
    let mut random = vec![0u8; threshold as usize - 1];

    for (pos, &byte) in secret.iter().enumerate() {
        rng.fill_bytes(&mut random);
        coeffs[0] = Gf256(byte);
        for (c, &r) in coeffs[1..].iter_mut().zip(&random) {
            *c = Gf256(r);
        }

        for share in &mut shares {
            share.payload[pos] = Gf256::eval_polynomial(&coeffs, Gf256(share.index)).0;
        }
    }

    Ok(shares)
}

/// Reconstruct the secret bytes from at least `threshold` shares.
///
/// The first `threshold` shares determine the polynomials. Every further
/// share must lie on them, otherwise the set is rejected as inconsistent.
pub fn combine_bytes(shares: &[Share], threshold: u8) -> Result<Vec<u8>> {
    if threshold == 0 {
        return Err(Error::InvalidParameters(
            "threshold must be at least 1".to_string(),
        ));
    }
    if shares.len() < threshold as usize {
        return Err(Error::Reconstruction(format!(
            "need {} shares, have {}",
            threshold,
            shares.len()
        )));
    }

    let payload_len = shares[0].payload.len();
    let mut seen = [false; 256];
    for share in shares {
        if share.index == 0 {
            return Err(Error::Reconstruction("share index 0 is invalid".to_string()));
        }
        if seen[share.index as usize] {
            return Err(Error::Reconstruction(format!(
                "duplicate share index {}",
                share.index
            )));
        }
        seen[share.index as usize] = true;

        if share.payload.len() != payload_len {
            return Err(Error::Reconstruction(
                "shares have different payload lengths".to_string(),
            ));
        }
    }

    let (basis, extra) = shares.split_at(threshold as usize);
    let mut secret = Vec::with_capacity(payload_len);
    let mut points = Vec::with_capacity(basis.len());

    for pos in 0..payload_len {
        points.clear();
        points.extend(
            basis
                .iter()
                .map(|s| (Gf256(s.index), Gf256(s.payload[pos]))),
        );

        let byte = Gf256::interpolate(&points, Gf256::ZERO)
            .ok_or_else(|| Error::Reconstruction("degenerate share set".to_string()))?;

        for share in extra {
            let expected = Gf256::interpolate(&points, Gf256(share.index))
                .ok_or_else(|| Error::Reconstruction("degenerate share set".to_string()))?;
            if expected.0 != share.payload[pos] {
                return Err(Error::Reconstruction(format!(
                    "share {} is inconsistent with the others",
                    share.index
                )));
            }
        }

        secret.push(byte.0);
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_produces_indexed_shares() {
        let shares = split_bytes(b"0123456789abcdef", 3, 5).unwrap();

        assert_eq!(shares.len(), 5);
        for (i, share) in shares.iter().enumerate() {
            assert_eq!(share.index as usize, i + 1);
            assert_eq!(share.payload.len(), 16);
        }
    }

    #[test]
    fn test_any_threshold_subset_recombines() {
        let secret = b"threshold subset";
        let shares = split_bytes(secret, 3, 5).unwrap();

        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = [shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    assert_eq!(combine_bytes(&subset, 3).unwrap(), secret);
                }
            }
        }
    }

    #[test]
    fn test_all_shares_recombine() {
        let secret = b"all shares at once";
        let shares = split_bytes(secret, 2, 6).unwrap();
        assert_eq!(combine_bytes(&shares, 2).unwrap(), secret);
    }

    #[test]
    fn test_threshold_one_copies_secret() {
        let shares = split_bytes(b"plain", 1, 3).unwrap();
        for share in &shares {
            assert_eq!(share.payload, b"plain");
        }
    }

    #[test]
    fn test_too_few_shares_fail() {
        let shares = split_bytes(b"not enough", 3, 5).unwrap();
        let result = combine_bytes(&shares[..2], 3);
        assert!(matches!(result, Err(Error::Reconstruction(_))));
    }

    #[test]
    fn test_duplicate_index_fails() {
        let mut shares = split_bytes(b"duplicate", 2, 3).unwrap();
        shares[1].index = shares[0].index;
        assert!(matches!(
            combine_bytes(&shares[..2], 2),
            Err(Error::Reconstruction(_))
        ));
    }

    #[test]
    fn test_tampered_extra_share_detected() {
        let mut shares = split_bytes(b"tamper evident", 2, 4).unwrap();
        shares[3].payload[0] ^= 0x01;
        assert!(matches!(
            combine_bytes(&shares, 2),
            Err(Error::Reconstruction(_))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(split_bytes(b"", 1, 1).is_err());
        assert!(split_bytes(b"x", 0, 3).is_err());
        assert!(split_bytes(b"x", 4, 3).is_err());
    }

    #[test]
    fn test_with_payload_len_restores_leading_zeros() {
        let share = Share::new(2, vec![0xAB]).with_payload_len(3).unwrap();
        assert_eq!(share.payload, vec![0, 0, 0xAB]);

        assert!(Share::new(2, vec![1, 2, 3]).with_payload_len(2).is_err());
    }
}
