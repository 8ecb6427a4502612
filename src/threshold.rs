//! Confidence score thresholding utilities.

use crate::error::{AccuracyError, Result};
use crate::types::Detection;

/// Filter detections by confidence score threshold.
///
/// # Arguments
///
/// * `detections` - Detections to filter
/// * `threshold` - Minimum confidence score (0.0 to 1.0)
///
/// # Returns
///
/// Returns a new vector containing only detections with confidence >= threshold,
/// in load order.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use accuracy_checker::threshold::filter_by_confidence;
/// use accuracy_checker::types::{BoundingBox, Detection};
///
/// let detections = vec![
///     Detection::new("0", "car", BoundingBox::new(10.0, 20.0, 30.0, 40.0), 0.9),
///     Detection::new("0", "car", BoundingBox::new(50.0, 60.0, 70.0, 80.0), 0.3),
/// ];
///
/// let filtered = filter_by_confidence(&detections, 0.5).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(detections: &[Detection], threshold: f64) -> Result<Vec<Detection>> {
    validate_threshold(threshold)?;

    Ok(detections
        .iter()
        .filter(|det| det.confidence >= threshold)
        .cloned()
        .collect())
}

/// Drop detections below `threshold` in place. The threshold must already
/// be validated.
pub(crate) fn retain_confident(detections: &mut Vec<Detection>, threshold: f64) {
    detections.retain(|det| det.confidence >= threshold);
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AccuracyError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    Ok(())
}
