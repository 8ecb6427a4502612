//! Decoder for SSD-style detection output.

use super::{rows, suppress, AdapterConfig, DecodedBox, PostProcess};
use crate::error::{AccuracyError, Result};
use crate::stats::PostProcessStats;
use crate::types::BoundingBox;

/// Values per SSD detection row.
pub const SSD_ROW_WIDTH: usize = 7;

/// Decodes rows of `[image_id, class_id, confidence, left, top, right, bottom]`
/// with coordinates normalized to [0, 1].
#[derive(Debug, Clone)]
pub struct SsdAdapter {
    config: AdapterConfig,
}

impl SsdAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

impl PostProcess for SsdAdapter {
    fn post_process_with_stats(
        &self,
        output: &[f32],
        image_width: u32,
        image_height: u32,
        stats: &mut PostProcessStats,
    ) -> Result<Vec<DecodedBox>> {
        let width = f64::from(image_width);
        let height = f64::from(image_height);
        let mut candidates = Vec::new();

        for row in rows(output, SSD_ROW_WIDTH)? {
            let confidence = f64::from(row[2]);
            let class_id = class_id(row[1])?;

            let Some(class_name) = self.config.admit(class_id, confidence, stats)? else {
                continue;
            };

            // Truncate to whole pixels, never past the far image edge
            let scale = |value: f32, extent: f64| (f64::from(value) * extent).trunc().min(extent);
            let bbox = BoundingBox::new(
                scale(row[3], width),
                scale(row[4], height),
                scale(row[5], width),
                scale(row[6], height),
            );
            candidates.push(DecodedBox::new(class_name, bbox, confidence));
        }

        suppress(&self.config, candidates, stats)
    }
}

fn class_id(value: f32) -> Result<usize> {
    if !value.is_finite() || value < 0.0 {
        return Err(AccuracyError::InvalidOutput(format!(
            "Invalid class id {} in SSD output",
            value
        )));
    }
    Ok(value as usize)
}
