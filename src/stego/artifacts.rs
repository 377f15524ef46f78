//! Persisted outputs of an embedding: the stego PNG and the side-file
//! holding the encrypted column count.
//!
//! Both files derive from one base path, e.g. `out/stego_image` becomes
//! `out/stego_image.png` and `out/stego_image_cols.bin`. Losing the
//! side-file makes recovery impossible without guessing the grid.

use crate::config::artifact_names::{GEOMETRY_SUFFIX, IMAGE_EXTENSION};
use crate::error::{Error, Result};
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};

/// Locations of the two files making up a stego artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegoArtifacts {
    /// Lossless stego image.
    pub image_path: PathBuf,
    /// Encrypted column count.
    pub geometry_path: PathBuf,
}

impl StegoArtifacts {
    /// Derive both paths from a base path. Any extension on `base` is
    /// replaced.
    pub fn from_base(base: &Path) -> Self {
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            image_path: base.with_extension(IMAGE_EXTENSION),
            geometry_path: base.with_file_name(format!("{}{}", stem, GEOMETRY_SUFFIX)),
        }
    }

    /// Write the stego image and the encrypted column count.
    pub fn save(&self, image: &RgbImage, encrypted_columns: &[u8]) -> Result<()> {
        image.save_with_format(&self.image_path, ImageFormat::Png)?;
        std::fs::write(&self.geometry_path, encrypted_columns)?;
        Ok(())
    }

    /// Read the stego image and the encrypted column count back.
    pub fn load(&self) -> Result<(RgbImage, Vec<u8>)> {
        if !self.geometry_path.exists() {
            return Err(Error::GeometryNotFound(self.geometry_path.clone()));
        }

        let image = load_carrier(&self.image_path)?;
        let encrypted_columns = std::fs::read(&self.geometry_path)?;
        Ok((image, encrypted_columns))
    }
}

/// Load any supported image and convert it to 8-bit RGB.
pub fn load_carrier(path: &Path) -> Result<RgbImage> {
    let image = image::open(path)?;
    Ok(image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_paths_from_base() {
        let artifacts = StegoArtifacts::from_base(Path::new("out/stego_image"));

        assert_eq!(artifacts.image_path, PathBuf::from("out/stego_image.png"));
        assert_eq!(
            artifacts.geometry_path,
            PathBuf::from("out/stego_image_cols.bin")
        );
    }

    #[test]
    fn test_extension_replaced() {
        let artifacts = StegoArtifacts::from_base(Path::new("stego.jpg"));
        assert_eq!(artifacts.image_path, PathBuf::from("stego.png"));
        assert_eq!(artifacts.geometry_path, PathBuf::from("stego_cols.bin"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let artifacts = StegoArtifacts::from_base(&dir.path().join("stego_image"));
        let image = RgbImage::from_fn(16, 8, |x, y| Rgb([x as u8, y as u8, 3]));

        artifacts.save(&image, &[1, 2, 3]).unwrap();
        let (loaded, ciphertext) = artifacts.load().unwrap();

        assert_eq!(loaded, image);
        assert_eq!(ciphertext, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_geometry_file() {
        let dir = TempDir::new().unwrap();
        let artifacts = StegoArtifacts::from_base(&dir.path().join("stego_image"));
        let image = RgbImage::new(4, 4);
        image.save(&artifacts.image_path).unwrap();

        match artifacts.load() {
            Err(Error::GeometryNotFound(path)) => assert_eq!(path, artifacts.geometry_path),
            other => panic!("expected GeometryNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
