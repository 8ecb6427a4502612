//! Decoder for YOLO (v3/v4 style) detection output.

use super::{argmax, rows, suppress, AdapterConfig, DecodedBox, PostProcess};
use crate::error::Result;
use crate::stats::PostProcessStats;
use crate::types::BoundingBox;

/// Decodes rows of `[cx, cy, w, h, objectness, class scores...]` with the box
/// normalized to [0, 1]. The confidence of a row is its best class score.
#[derive(Debug, Clone)]
pub struct YoloAdapter {
    config: AdapterConfig,
}

impl YoloAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

impl PostProcess for YoloAdapter {
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

        for row in rows(output, self.config.scored_row_width()?)? {
            let Some((class_id, confidence)) = argmax(row[5..].iter().map(|&s| f64::from(s))) else {
                continue;
            };

            let Some(class_name) = self.config.admit(class_id, confidence, stats)? else {
                continue;
            };

            let to_pixels = |value: f32, extent: f64| (f64::from(value) * extent).trunc() as i64;
            let cx = to_pixels(row[0], width);
            let cy = to_pixels(row[1], height);
            let half_w = to_pixels(row[2], width).div_euclid(2);
            let half_h = to_pixels(row[3], height).div_euclid(2);

            let bbox = BoundingBox::new(
                (cx - half_w) as f64,
                (cy - half_h) as f64,
                (cx + half_w) as f64,
                (cy + half_h) as f64,
            );
            candidates.push(DecodedBox::new(class_name, bbox, confidence));
        }

        suppress(&self.config, candidates, stats)
    }
}
