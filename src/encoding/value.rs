//! Integer access to the HSV value channel of an RGB pixel.
//!
//! The value channel is `max(r, g, b)`. Writing a value rescales all three
//! channels by the same ratio, so hue and saturation survive up to integer
//! rounding while the maximal channel lands exactly on the new value. No
//! floating point is involved, so a write followed by a read is exact.

use image::Rgb;

/// Read the value channel.
pub fn value(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    r.max(g).max(b)
}

/// Overwrite the value channel with `v`.
///
/// A black pixel has no hue to keep and becomes grey `(v, v, v)`.
pub fn set_value(pixel: &mut Rgb<u8>, v: u8) {
    let max = value(pixel) as u32;
    if max == 0 {
        pixel.0 = [v; 3];
        return;
    }

    let v = v as u32;
    for channel in pixel.0.iter_mut() {
        // Rounded c * v / max; never exceeds v because c <= max.
        *channel = ((*channel as u32 * v + max / 2) / max) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_channel_max() {
        assert_eq!(value(&Rgb([10, 200, 30])), 200);
        assert_eq!(value(&Rgb([0, 0, 0])), 0);
    }

    #[test]
    fn test_write_read_exact_for_all_values() {
        let samples = [
            Rgb([0, 0, 0]),
            Rgb([255, 255, 255]),
            Rgb([1, 0, 0]),
            Rgb([255, 1, 128]),
            Rgb([17, 250, 3]),
            Rgb([90, 90, 91]),
        ];

        for sample in samples {
            for v in 0..=255u8 {
                let mut pixel = sample;
                set_value(&mut pixel, v);
                assert_eq!(value(&pixel), v, "pixel {:?} value {}", sample, v);
            }
        }
    }

    #[test]
    fn test_hue_ordering_kept() {
        let mut pixel = Rgb([200, 100, 50]);
        set_value(&mut pixel, 100);
        assert_eq!(pixel, Rgb([100, 50, 25]));
    }

    #[test]
    fn test_black_becomes_grey() {
        let mut pixel = Rgb([0, 0, 0]);
        set_value(&mut pixel, 7);
        assert_eq!(pixel, Rgb([7, 7, 7]));
    }
}
