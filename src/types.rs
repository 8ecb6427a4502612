//! Core data types for ground truth, detections and evaluation results.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::metrics::precision_recall::{calculate_fdr, calculate_tpr};

/// Represents an axis-aligned bounding box given by two corners (x1, y1, x2, y2).
///
/// Coordinates are pixel-inclusive: both corners belong to the box, so a box
/// with `x1 == x2` is one pixel wide. Corner ordering is not enforced here;
/// the loader rejects inverted boxes before they reach the metric engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Inclusive width (`x2 - x1 + 1`).
    pub fn width(&self) -> f64 {
        self.x2 - self.x1 + 1.0
    }

    /// Inclusive height (`y2 - y1 + 1`).
    pub fn height(&self) -> f64 {
        self.y2 - self.y1 + 1.0
    }

    /// Get the inclusive area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check that all coordinates are finite and the corners are ordered.
    pub fn is_valid(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2].iter().all(|v| v.is_finite())
            && self.x1 <= self.x2
            && self.y1 <= self.y2
    }
}

/// A single annotated object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub frame_id: String,
    pub class_name: String,
    pub bbox: BoundingBox,
}

impl GroundTruth {
    pub fn new(frame_id: impl Into<String>, class_name: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            frame_id: frame_id.into(),
            class_name: class_name.into(),
            bbox,
        }
    }
}

/// A single detector prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub frame_id: String,
    pub class_name: String,
    pub bbox: BoundingBox,
    /// Confidence score, only used to order detections before matching.
    pub confidence: f64,
}

impl Detection {
    pub fn new(
        frame_id: impl Into<String>,
        class_name: impl Into<String>,
        bbox: BoundingBox,
        confidence: f64,
    ) -> Self {
        Self {
            frame_id: frame_id.into(),
            class_name: class_name.into(),
            bbox,
            confidence,
        }
    }
}

/// Records that carry a frame and a class, so both kinds can share indexing code.
pub trait Record {
    fn frame_id(&self) -> &str;
    fn class_name(&self) -> &str;
    fn bbox(&self) -> &BoundingBox;
}

impl Record for GroundTruth {
    fn frame_id(&self) -> &str {
        &self.frame_id
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

impl Record for Detection {
    fn frame_id(&self) -> &str {
        &self.frame_id
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// True positive, false positive and false negative counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl MatchCounts {
    pub fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// True Positive Rate: TP / (TP + FN), 0 when there is nothing to find.
    pub fn tpr(&self) -> f64 {
        calculate_tpr(self.true_positives, self.false_negatives)
    }

    /// False Detection Rate: FP / (TP + FP), 0 when nothing was detected.
    pub fn fdr(&self) -> f64 {
        calculate_fdr(self.true_positives, self.false_positives)
    }
}

impl AddAssign for MatchCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.true_positives += rhs.true_positives;
        self.false_positives += rhs.false_positives;
        self.false_negatives += rhs.false_negatives;
    }
}

/// Average Precision for one ground truth class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAp {
    pub class_name: String,
    pub ap: f64,
}

/// Full set of metrics produced by one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// IoU threshold the detections were matched with
    pub iou_threshold: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// True Positive Rate
    pub tpr: f64,
    /// False Detection Rate
    pub fdr: f64,
    /// Per-class Average Precision, sorted by class name
    pub ap_per_class: Vec<ClassAp>,
    /// Mean Average Precision over ground truth classes
    pub map: f64,
}

impl AccuracyReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
