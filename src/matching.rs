//! Detection matching utilities for evaluating predictions against ground truth.
//!
//! Matching is greedy: each detection, in the order supplied by the caller, is
//! compared against every ground truth box of its frame and takes the one with
//! the highest IoU. It scores a true positive only if that box clears the IoU
//! threshold and has not been taken yet; otherwise, including duplicate hits
//! on an already matched box, it is a false positive. There is no global
//! optimal assignment, so the result depends on the detection order and
//! callers must sort detections by confidence first.

use crate::metrics::iou::calculate_iou;
use crate::types::{BoundingBox, Detection, MatchCounts, Record};
use std::collections::{HashMap, HashSet};

/// Outcome of matching one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Index of the best overlapping ground truth box in its frame
    pub ground_truth_index: Option<usize>,
    /// IoU with that box, 0.0 when nothing overlaps
    pub iou: f64,
    pub is_true_positive: bool,
}

/// Find the ground truth box with the highest IoU.
///
/// Ties keep the earliest box. Boxes with zero overlap are never candidates,
/// so `None` means the detection touches nothing in the frame.
pub fn best_match<R: Record>(bbox: &BoundingBox, ground_truths: &[R]) -> Option<(usize, f64)> {
    let mut best_iou = 0.0;
    let mut best_gt_idx: Option<usize> = None;

    for (gt_idx, gt) in ground_truths.iter().enumerate() {
        let iou = calculate_iou(bbox, gt.bbox());
        if iou > best_iou {
            best_iou = iou;
            best_gt_idx = Some(gt_idx);
        }
    }

    best_gt_idx.map(|idx| (idx, best_iou))
}

/// Match one detection against the ground truth of its frame.
///
/// `matched` holds the ground truth indices already taken in this frame and is
/// updated on a true positive.
fn assign<R: Record>(
    matched: &mut HashSet<usize>,
    bbox: &BoundingBox,
    ground_truths: &[R],
    iou_threshold: f64,
) -> Match {
    match best_match(bbox, ground_truths) {
        Some((gt_idx, iou)) if iou >= iou_threshold && matched.insert(gt_idx) => Match {
            ground_truth_index: Some(gt_idx),
            iou,
            is_true_positive: true,
        },
        // Below threshold, or a repeat detection of an already matched box
        best => Match {
            ground_truth_index: best.map(|(idx, _)| idx),
            iou: best.map_or(0.0, |(_, iou)| iou),
            is_true_positive: false,
        },
    }
}

/// Match all detections of one frame against the ground truth of that frame.
///
/// Detections must already be in confidence-descending order.
///
/// # Returns
///
/// TP and FP counts over the detections, and FN as the number of ground truth
/// boxes left unmatched. `tp + fp` equals the number of detections and
/// `tp + fn` the number of ground truth boxes.
pub fn match_frame<'a, I, R>(detections: I, ground_truths: &[R], iou_threshold: f64) -> MatchCounts
where
    I: IntoIterator<Item = &'a Detection>,
    R: Record,
{
    let mut matched = HashSet::new();
    let mut counts = MatchCounts::default();

    for detection in detections {
        if assign(&mut matched, &detection.bbox, ground_truths, iou_threshold).is_true_positive {
            counts.true_positives += 1;
        } else {
            counts.false_positives += 1;
        }
    }

    counts.false_negatives = ground_truths.len() - matched.len();
    counts
}

/// Ground truth boxes already matched in each frame during one traversal.
///
/// A fresh state must be created for every traversal; it is never shared
/// between classes.
#[derive(Debug, Default)]
pub struct MatchState<'a> {
    matched: HashMap<&'a str, HashSet<usize>>,
}

impl<'a> MatchState<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a single detection against the ground truth of its frame,
    /// remembering the box it takes for later detections of the same frame.
    pub fn assign<R: Record>(
        &mut self,
        detection: &'a Detection,
        ground_truths: &[R],
        iou_threshold: f64,
    ) -> Match {
        let matched = self.matched.entry(detection.frame_id.as_str()).or_default();
        assign(matched, &detection.bbox, ground_truths, iou_threshold)
    }

    /// Number of ground truth boxes taken in a frame so far.
    #[cfg(test)]
    fn matched_in_frame(&self, frame_id: &str) -> usize {
        self.matched.get(frame_id).map_or(0, HashSet::len)
    }
}

/// Sort detections by confidence, highest first.
///
/// The sort is stable, so detections with equal confidence keep their order.
pub fn sort_by_confidence<'a, I>(detections: I) -> Vec<&'a Detection>
where
    I: IntoIterator<Item = &'a Detection>,
{
    let mut sorted: Vec<&Detection> = detections.into_iter().collect();
    sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    sorted
}
