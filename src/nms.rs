//! Non-Maximum Suppression (`NMS`) over decoded network boxes
//!
//! Suppression is class-agnostic: every candidate competes with every other
//! candidate regardless of its class, the same way a single `NMSBoxes` call
//! over all boxes of an image behaves.

use crate::adapter::DecodedBox;
use crate::error::Result;
use crate::metrics::iou::calculate_iou;
use crate::threshold::validate_threshold;

/// Apply Non-Maximum Suppression to a set of candidates
///
/// # Arguments
///
/// * `candidates` - Decoded boxes with their confidence scores
/// * `score_threshold` - Candidates scoring at or below this are dropped
/// * `iou_threshold` - `IoU` above which the lower-scoring box is suppressed
///
/// # Returns
///
/// Indices into `candidates` of the kept boxes, highest score first
///
/// # Errors
///
/// Returns error if either threshold is not in range [0.0, 1.0]
///
/// # Examples
///
/// ```
/// # use accuracy_checker::adapter::DecodedBox;
/// # use accuracy_checker::nms::non_maximum_suppression;
/// # use accuracy_checker::types::BoundingBox;
/// let candidates = vec![
///     DecodedBox::new("car", BoundingBox::new(10.0, 10.0, 50.0, 50.0), 0.9),
///     DecodedBox::new("car", BoundingBox::new(15.0, 15.0, 55.0, 55.0), 0.8),
///     DecodedBox::new("bus", BoundingBox::new(100.0, 100.0, 150.0, 150.0), 0.95),
/// ];
///
/// let kept = non_maximum_suppression(&candidates, 0.5, 0.5).unwrap();
/// assert_eq!(kept, vec![2, 0]);
/// ```
pub fn non_maximum_suppression(
    candidates: &[DecodedBox],
    score_threshold: f64,
    iou_threshold: f64,
) -> Result<Vec<usize>> {
    validate_threshold(score_threshold)?;
    validate_threshold(iou_threshold)?;

    // Sort surviving indices by score (descending), ties keep input order
    let mut order: Vec<usize> = (0..candidates.len())
        .filter(|&idx| candidates[idx].confidence > score_threshold)
        .collect();
    order.sort_by(|&a, &b| candidates[b].confidence.total_cmp(&candidates[a].confidence));

    let mut kept: Vec<usize> = Vec::with_capacity(order.len());

    for idx in order {
        let bbox = &candidates[idx].bbox;
        let suppressed = kept
            .iter()
            .any(|&keep_idx| calculate_iou(&candidates[keep_idx].bbox, bbox) > iou_threshold);

        if !suppressed {
            kept.push(idx);
        }
    }

    Ok(kept)
}
