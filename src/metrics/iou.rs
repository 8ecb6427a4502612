//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// Coordinates are inclusive pixel indices, so one unit is added to every
/// span: the intersection of `(0, 0, 9, 9)` with itself covers 100 pixels.
///
/// # Arguments
///
/// * `bbox1` - First bounding box
/// * `bbox2` - Second bounding box
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (perfect overlap). A
/// non-positive union yields 0.0.
///
/// # Example
///
/// ```
/// use accuracy_checker::metrics::iou::calculate_iou;
/// use accuracy_checker::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 9.0, 9.0);
/// let bbox2 = BoundingBox::new(5.0, 5.0, 14.0, 14.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!((iou - 25.0 / 175.0).abs() < 1e-10);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    let x_left = bbox1.x1.max(bbox2.x1);
    let y_top = bbox1.y1.max(bbox2.y1);
    let x_right = bbox1.x2.min(bbox2.x2);
    let y_bottom = bbox1.y2.min(bbox2.y2);

    let intersection_area =
        (x_right - x_left + 1.0).max(0.0) * (y_bottom - y_top + 1.0).max(0.0);

    let union_area = bbox1.area() + bbox2.area() - intersection_area;

    // Degenerate boxes
    if union_area <= 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}
