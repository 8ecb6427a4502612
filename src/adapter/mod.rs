//! Decoders that turn raw detector network output into detections.
//!
//! Every decoder follows the same pipeline: decode candidate rows into pixel
//! boxes, drop candidates at or below the confidence threshold, drop classes
//! that are not of interest, then run class-agnostic Non-Maximum Suppression.
//! The surviving boxes come back highest score first with coordinates
//! truncated to whole pixels, ready to be written as detection rows.

pub mod ssd;
pub mod yolo;
pub mod yolox;

pub use ssd::SsdAdapter;
pub use yolo::YoloAdapter;
pub use yolox::YoloxAdapter;

use crate::error::{AccuracyError, Result};
use crate::nms::non_maximum_suppression;
use crate::stats::PostProcessStats;
use crate::threshold::validate_threshold;
use crate::types::{BoundingBox, Detection};
use log::debug;
use serde::{Deserialize, Serialize};

/// Classes kept when no interest list is given.
pub const DEFAULT_INTEREST_CLASSES: [&str; 3] = ["car", "bus", "truck"];

/// One box produced by a decoder, not yet tied to a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedBox {
    pub class_name: String,
    pub bbox: BoundingBox,
    pub confidence: f64,
}

impl DecodedBox {
    pub fn new(class_name: impl Into<String>, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            class_name: class_name.into(),
            bbox,
            confidence,
        }
    }

    /// Attach the box to a frame, producing an evaluable detection.
    pub fn into_detection(self, frame_id: impl Into<String>) -> Detection {
        Detection {
            frame_id: frame_id.into(),
            class_name: self.class_name,
            bbox: self.bbox,
            confidence: self.confidence,
        }
    }
}

/// Settings shared by all decoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Candidates scoring at or below this are dropped
    pub confidence_threshold: f64,
    /// `IoU` above which NMS suppresses the lower-scoring box
    pub nms_threshold: f64,
    /// Class names indexed by the network's class id
    pub class_names: Vec<String>,
    /// Only these classes are kept
    pub interest_classes: Vec<String>,
}

impl AdapterConfig {
    /// Create a config keeping the default interest classes (car, bus, truck).
    ///
    /// # Errors
    ///
    /// Returns an error if either threshold is outside [0.0, 1.0].
    pub fn new<I, S>(confidence_threshold: f64, nms_threshold: f64, class_names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = Self {
            confidence_threshold,
            nms_threshold,
            class_names: class_names.into_iter().map(Into::into).collect(),
            interest_classes: DEFAULT_INTEREST_CLASSES.iter().map(|c| c.to_string()).collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the interest classes.
    pub fn with_interest_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interest_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.confidence_threshold)?;
        validate_threshold(self.nms_threshold)
    }

    pub fn is_interesting(&self, class_name: &str) -> bool {
        self.interest_classes.iter().any(|c| c == class_name)
    }

    /// Look up the class name for a network class id.
    pub fn class_name(&self, class_id: usize) -> Result<&str> {
        self.class_names
            .get(class_id)
            .map(String::as_str)
            .ok_or_else(|| {
                AccuracyError::InvalidOutput(format!(
                    "Class id {} is out of range for {} class names",
                    class_id,
                    self.class_names.len()
                ))
            })
    }

    /// Decide whether a candidate goes on to NMS, counting it either way.
    ///
    /// Returns the class name of an admitted candidate.
    fn admit(
        &self,
        class_id: usize,
        confidence: f64,
        stats: &mut PostProcessStats,
    ) -> Result<Option<&str>> {
        stats.add_candidate();

        if confidence <= self.confidence_threshold {
            stats.skip_below_threshold();
            return Ok(None);
        }

        let class_name = self.class_name(class_id)?;
        if !self.is_interesting(class_name) {
            stats.skip_uninteresting();
            return Ok(None);
        }

        Ok(Some(class_name))
    }

    /// Width of a `[box(4), objectness, class scores...]` row.
    fn scored_row_width(&self) -> Result<usize> {
        if self.class_names.is_empty() {
            return Err(AccuracyError::InvalidOutput(
                "At least one class name is required to decode class scores".to_string(),
            ));
        }
        Ok(5 + self.class_names.len())
    }
}

/// Post-processing of one network output for one image.
pub trait PostProcess {
    /// Decode `output`, recording what happened to each candidate in `stats`.
    fn post_process_with_stats(
        &self,
        output: &[f32],
        image_width: u32,
        image_height: u32,
        stats: &mut PostProcessStats,
    ) -> Result<Vec<DecodedBox>>;

    /// Decode `output` into boxes in image pixel coordinates.
    fn post_process(
        &self,
        output: &[f32],
        image_width: u32,
        image_height: u32,
    ) -> Result<Vec<DecodedBox>> {
        let mut stats = PostProcessStats::new();
        let boxes = self.post_process_with_stats(output, image_width, image_height, &mut stats)?;
        debug!("{}", stats.summary_string());
        Ok(boxes)
    }
}

/// Split a flat output into rows, rejecting a trailing partial row.
fn rows(output: &[f32], width: usize) -> Result<std::slice::ChunksExact<'_, f32>> {
    if output.len() % width != 0 {
        return Err(AccuracyError::InvalidOutput(format!(
            "Output length {} is not a multiple of the row width {}",
            output.len(),
            width
        )));
    }
    Ok(output.chunks_exact(width))
}

/// Index and value of the largest score, the first one on ties.
fn argmax<I: IntoIterator<Item = f64>>(scores: I) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

/// Run NMS over admitted candidates and truncate the survivors to pixels.
fn suppress(
    config: &AdapterConfig,
    candidates: Vec<DecodedBox>,
    stats: &mut PostProcessStats,
) -> Result<Vec<DecodedBox>> {
    let kept = non_maximum_suppression(&candidates, config.confidence_threshold, config.nms_threshold)?;
    stats.add_suppressed(candidates.len() - kept.len());

    Ok(kept
        .into_iter()
        .map(|idx| {
            let candidate = &candidates[idx];
            let bbox = candidate.bbox;
            DecodedBox {
                class_name: candidate.class_name.clone(),
                bbox: BoundingBox::new(bbox.x1.trunc(), bbox.y1.trunc(), bbox.x2.trunc(), bbox.y2.trunc()),
                confidence: candidate.confidence,
            }
        })
        .collect())
}
