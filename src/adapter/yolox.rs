//! Decoder for YOLOX (tiny) grid-anchored output.

use super::{argmax, rows, suppress, AdapterConfig, DecodedBox, PostProcess};
use crate::error::{AccuracyError, Result};
use crate::stats::PostProcessStats;
use crate::types::BoundingBox;

/// Square network input size the model is exported with.
pub const DEFAULT_INPUT_SIZE: u32 = 416;

/// Feature map strides, one grid per stride.
pub const STRIDES: [u32; 3] = [8, 16, 32];

/// Decodes rows of `[x, y, log w, log h, objectness, class scores...]`
/// laid out cell by cell over one grid per stride.
///
/// A row at cell `(gx, gy)` of the grid with stride `s` decodes to centre
/// `((x + gx) * s, (y + gy) * s)` and size `(exp(log w) * s, exp(log h) * s)`
/// in network input pixels, which are then rescaled to the image. Scores are
/// objectness times class score.
#[derive(Debug, Clone)]
pub struct YoloxAdapter {
    config: AdapterConfig,
    input_size: u32,
}

impl YoloxAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            config,
            input_size: DEFAULT_INPUT_SIZE,
        }
    }

    /// Use a network input size other than 416.
    pub fn with_input_size(mut self, input_size: u32) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Cell offsets and stride for every output row, in output order.
    fn grid(&self) -> Vec<(f64, f64, f64)> {
        let mut cells = Vec::new();
        for stride in STRIDES {
            let size = self.input_size / stride;
            for gy in 0..size {
                for gx in 0..size {
                    cells.push((f64::from(gx), f64::from(gy), f64::from(stride)));
                }
            }
        }
        cells
    }
}

impl PostProcess for YoloxAdapter {
    fn post_process_with_stats(
        &self,
        output: &[f32],
        image_width: u32,
        image_height: u32,
        stats: &mut PostProcessStats,
    ) -> Result<Vec<DecodedBox>> {
        let grid = self.grid();
        let width = self.config.scored_row_width()?;

        if output.len() != grid.len() * width {
            return Err(AccuracyError::InvalidOutput(format!(
                "Expected {} rows of {} values for a {}x{} input, got {} values",
                grid.len(),
                width,
                self.input_size,
                self.input_size,
                output.len()
            )));
        }

        let input = f64::from(self.input_size);
        let ratio_w = input / f64::from(image_width);
        let ratio_h = input / f64::from(image_height);
        let mut candidates = Vec::new();

        for (row, &(gx, gy, stride)) in rows(output, width)?.zip(&grid) {
            let objectness = f64::from(row[4]);
            let Some((class_id, confidence)) =
                argmax(row[5..].iter().map(|&s| objectness * f64::from(s)))
            else {
                continue;
            };

            let Some(class_name) = self.config.admit(class_id, confidence, stats)? else {
                continue;
            };

            let cx = (f64::from(row[0]) + gx) * stride / ratio_w;
            let cy = (f64::from(row[1]) + gy) * stride / ratio_h;
            let half_w = f64::from(row[2]).exp() * stride / 2.0 / ratio_w;
            let half_h = f64::from(row[3]).exp() * stride / 2.0 / ratio_h;

            let bbox = BoundingBox::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h);
            candidates.push(DecodedBox::new(class_name, bbox, confidence));
        }

        suppress(&self.config, candidates, stats)
    }
}
