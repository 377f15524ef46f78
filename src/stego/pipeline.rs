//! The embed/recover orchestrator.

use crate::config::StegoConfig;
use crate::crypto::{decrypt_columns, encrypt_columns, GeometryKey};
use crate::encoding::{collect_shares, embed_all, extract_all, payload_digits};
use crate::error::{Error, Result};
use crate::layout::{self, capacity, recovery_rows, Geometry, GridPlan};
use crate::sharing::{self, share_payload_len, Share};
use image::RgbImage;

/// Result of embedding a secret.
#[derive(Debug, Clone)]
pub struct EmbedOutput {
    /// The carrier with the shares written into it, cropped to the grid.
    pub image: RgbImage,
    /// RSA-OAEP ciphertext of the column count.
    pub encrypted_columns: Vec<u8>,
    /// The plan the image was embedded with.
    pub plan: GridPlan,
}

/// Splits secrets into carrier images and recovers them again.
pub struct StegoPipeline<K> {
    config: StegoConfig,
    keys: K,
}

impl<K: GeometryKey> StegoPipeline<K> {
    /// Create a pipeline after validating `config`.
    pub fn new(config: StegoConfig, keys: K) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, keys })
    }

    /// The configuration in use.
    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// Plan the grid for `secret` in a carrier of `image_size` without
    /// touching any pixels.
    pub fn plan(&self, secret: &str, image_size: (u32, u32)) -> Result<GridPlan> {
        plan(&self.config, secret, image_size)
    }

    /// Hide `secret` in `carrier`.
    ///
    /// Every capacity and range check runs before the first block is
    /// written.
    pub fn embed(&self, secret: &str, carrier: &RgbImage) -> Result<EmbedOutput> {
        let shares = sharing::split(secret, self.config.threshold, self.config.share_count)?;
        let plan = plan_shares(secret, &shares, carrier.dimensions())?;

        let mut blocks = layout::split(carrier, plan.geometry)?;
        embed_all(&mut blocks, &shares)?;
        let image = layout::merge(&blocks, plan.geometry)?;

        let encrypted_columns = encrypt_columns(plan.geometry.columns, &self.keys)?;

        tracing::info!(
            shares = shares.len(),
            threshold = self.config.threshold,
            blocks = blocks.len(),
            "embedded secret"
        );

        Ok(EmbedOutput {
            image,
            encrypted_columns,
            plan,
        })
    }

    /// Recover a secret of `secret_len` UTF-8 bytes from a stego image.
    pub fn recover(
        &self,
        stego: &RgbImage,
        encrypted_columns: &[u8],
        secret_len: usize,
    ) -> Result<String> {
        let columns = decrypt_columns(encrypted_columns, &self.keys)?;
        let rows = recovery_rows(secret_len, columns)?;
        let geometry = Geometry { columns, rows };

        let blocks = layout::split(stego, geometry)?;
        let payload_len = share_payload_len(secret_len);

        let extracted = extract_all(&blocks)
            .into_iter()
            .filter_map(|share| {
                let index = share.index;
                share
                    .with_payload_len(payload_len)
                    .map_err(|e| tracing::warn!(index, error = %e, "discarding oversized share"))
                    .ok()
            })
            .collect();
        let shares = collect_shares(extracted);

        tracing::info!(
            blocks = blocks.len(),
            distinct_shares = shares.len(),
            "extracted shares"
        );

        let secret = sharing::combine(&shares, self.config.threshold)?;
        if secret.len() != secret_len {
            return Err(Error::Reconstruction(format!(
                "recovered {} bytes, expected {}",
                secret.len(),
                secret_len
            )));
        }
        Ok(secret)
    }
}

/// Plan the grid `config` would use for `secret` in a carrier of
/// `image_size`.
pub fn plan(config: &StegoConfig, secret: &str, image_size: (u32, u32)) -> Result<GridPlan> {
    config.validate()?;
    let shares = sharing::split(secret, config.threshold, config.share_count)?;
    plan_shares(secret, &shares, image_size)
}

fn plan_shares(secret: &str, shares: &[Share], image_size: (u32, u32)) -> Result<GridPlan> {
    let plan = capacity::plan(image_size, shares, |s| payload_digits(&s.payload).len())?;

    // Recovery only knows the column count and the secret length.
    let derived_rows = recovery_rows(secret.len(), plan.geometry.columns)?;
    if derived_rows != plan.geometry.rows {
        return Err(Error::UnrecoverableGeometry {
            planned_rows: plan.geometry.rows,
            derived_rows,
        });
    }

    tracing::debug!(
        columns = plan.geometry.columns,
        rows = plan.geometry.rows,
        block_width = plan.block_size.0,
        block_height = plan.block_size.1,
        capacity = plan.capacity,
        "planned block grid"
    );
    Ok(plan)
}
