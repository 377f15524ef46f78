//! Arithmetic over GF(2^8) with the AES reduction polynomial.
//!
//! Addition is XOR. Multiplication is carry-less multiplication reduced
//! modulo x^8 + x^4 + x^3 + x + 1 (0x11B).

use std::ops::{Add, Mul};

/// Low byte of the reduction polynomial 0x11B.
const REDUCTION: u8 = 0x1B;

/// An element of GF(256).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Gf256(pub(crate) u8);

impl Gf256 {
    pub(crate) const ZERO: Self = Gf256(0);
    pub(crate) const ONE: Self = Gf256(1);

    /// Multiplicative inverse, computed as a^254.
    ///
    /// Returns `None` for zero.
    pub(crate) fn inverse(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }

        let mut result = Gf256::ONE;
        let mut base = self;
        let mut exp = 254u8;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exp >>= 1;
        }
        Some(result)
    }

    /// Evaluate `coeffs[0] + coeffs[1]·x + ...` with Horner's method.
    pub(crate) fn eval_polynomial(coeffs: &[Gf256], x: Gf256) -> Gf256 {
        coeffs
            .iter()
            .rev()
            .fold(Gf256::ZERO, |acc, &c| acc * x + c)
    }

    /// Evaluate at `x` the unique polynomial of degree `< points.len()`
    /// passing through `points`.
    ///
    /// All point abscissae must be distinct. Returns `None` otherwise.
    pub(crate) fn interpolate(points: &[(Gf256, Gf256)], x: Gf256) -> Option<Gf256> {
        let mut acc = Gf256::ZERO;

        for (i, &(xi, yi)) in points.iter().enumerate() {
            let mut num = Gf256::ONE;
            let mut den = Gf256::ONE;

            for (j, &(xj, _)) in points.iter().enumerate() {
                if i != j {
                    // Subtraction is addition in characteristic 2.
                    num = num * (x + xj);
                    den = den * (xi + xj);
                }
            }

            acc = acc + yi * num * den.inverse()?;
        }

        Some(acc)
    }
}

impl Add for Gf256 {
    type Output = Gf256;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Gf256) -> Gf256 {
        Gf256(self.0 ^ rhs.0)
    }
}

impl Mul for Gf256 {
    type Output = Gf256;

    fn mul(self, rhs: Gf256) -> Gf256 {
        let mut a = self.0;
        let mut b = rhs.0;
        let mut product = 0u8;

        while b != 0 {
            if b & 1 == 1 {
                product ^= a;
            }
            let carry = a & 0x80 != 0;
            a <<= 1;
            if carry {
                a ^= REDUCTION;
            }
            b >>= 1;
        }

        Gf256(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_product() {
        // FIPS-197 worked example: {57} • {83} = {c1}
        assert_eq!(Gf256(0x57) * Gf256(0x83), Gf256(0xC1));
    }

    #[test]
    fn test_every_nonzero_element_has_inverse() {
        for a in 1..=255u8 {
            let inv = Gf256(a).inverse().unwrap();
            assert_eq!(Gf256(a) * inv, Gf256::ONE, "inverse of {a:#04x}");
        }
        assert!(Gf256::ZERO.inverse().is_none());
    }

    #[test]
    fn test_interpolation_recovers_polynomial() {
        let coeffs = [Gf256(42), Gf256(7), Gf256(199)];
        let points: Vec<_> = (1..=3u8)
            .map(|x| (Gf256(x), Gf256::eval_polynomial(&coeffs, Gf256(x))))
            .collect();

        assert_eq!(Gf256::interpolate(&points, Gf256::ZERO), Some(Gf256(42)));
        assert_eq!(
            Gf256::interpolate(&points, Gf256(9)),
            Some(Gf256::eval_polynomial(&coeffs, Gf256(9)))
        );
    }

    #[test]
    fn test_interpolation_rejects_duplicate_abscissae() {
        let points = [(Gf256(1), Gf256(5)), (Gf256(1), Gf256(6))];
        assert!(Gf256::interpolate(&points, Gf256::ZERO).is_none());
    }
}
