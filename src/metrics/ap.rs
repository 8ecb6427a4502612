//! Average Precision (AP) and mean Average Precision (mAP) calculation.

/// Calculate Average Precision (AP) from a precision-recall curve.
///
/// Integrates the area under the precision envelope: the curve is walked from
/// the lowest-confidence point back to the highest, keeping the running
/// maximum precision. Each time a point raises that maximum, the recall span
/// covered by the previous maximum is added to the area. The final span runs
/// down to recall 0.
///
/// This is neither the 11-point VOC interpolation nor the 101-point COCO one.
///
/// # Arguments
///
/// * `precisions` - Precision values in confidence-descending order
/// * `recalls` - Recall values matching `precisions` point for point
///
/// # Returns
///
/// Returns the Average Precision value, 0.0 for an empty curve.
///
/// # Example
///
/// ```
/// use accuracy_checker::metrics::ap::calculate_ap;
///
/// // TP, FP, TP against two ground truth boxes
/// let precisions = vec![1.0, 0.5, 2.0 / 3.0];
/// let recalls = vec![0.5, 0.5, 1.0];
/// let ap = calculate_ap(&precisions, &recalls);
/// assert!((ap - (0.5 * 2.0 / 3.0 + 0.5)).abs() < 1e-10);
/// ```
pub fn calculate_ap(precisions: &[f64], recalls: &[f64]) -> f64 {
    let (Some(&last_precision), Some(&last_recall)) = (precisions.last(), recalls.last()) else {
        return 0.0;
    };

    let mut cur_max_prec = last_precision;
    let mut rec_end = last_recall;
    let mut ap = 0.0;

    for (&precision, &recall) in precisions.iter().zip(recalls).rev() {
        if precision > cur_max_prec {
            ap += (rec_end - recall) * cur_max_prec;
            cur_max_prec = precision;
            rec_end = recall;
        }
    }

    // Segment from recall 0 up to the highest-confidence envelope step
    ap += rec_end * cur_max_prec;

    ap
}

/// Calculate mean Average Precision (mAP) across multiple classes.
///
/// # Arguments
///
/// * `class_aps` - Vector of AP values for each class
///
/// # Returns
///
/// Returns the mean Average Precision, 0.0 when there are no classes.
///
/// # Example
///
/// ```
/// use accuracy_checker::metrics::ap::calculate_map;
///
/// let class_aps = vec![0.8, 0.9, 0.75, 0.85];
/// let map = calculate_map(&class_aps);
/// assert!((map - 0.825).abs() < 1e-10);
/// ```
pub fn calculate_map(class_aps: &[f64]) -> f64 {
    if class_aps.is_empty() {
        return 0.0;
    }

    class_aps.iter().sum::<f64>() / class_aps.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_ap_empty() {
        let ap = calculate_ap(&[], &[]);
        assert_eq!(ap, 0.0);
    }

    #[test]
    fn test_calculate_ap_perfect() {
        let precisions = vec![1.0; 4];
        let recalls = vec![0.25, 0.5, 0.75, 1.0];
        let ap = calculate_ap(&precisions, &recalls);
        assert!((ap - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_calculate_ap_single_point() {
        assert!((calculate_ap(&[0.5], &[0.4]) - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_calculate_ap_all_misses() {
        let precisions = vec![0.0, 0.0, 0.0];
        let recalls = vec![0.0, 0.0, 0.0];
        assert_eq!(calculate_ap(&precisions, &recalls), 0.0);
    }

    #[test]
    fn test_calculate_ap_envelope() {
        // TP, FP, TP, FP, TP against four ground truth boxes
        let precisions = vec![1.0, 0.5, 2.0 / 3.0, 0.5, 0.6];
        let recalls = vec![0.25, 0.25, 0.5, 0.5, 0.75];
        let ap = calculate_ap(&precisions, &recalls);

        // Envelope: 1.0 on [0, 0.25], 2/3 on [0.25, 0.5], 0.6 on [0.5, 0.75]
        let expected = 0.25 * 1.0 + 0.25 * (2.0 / 3.0) + 0.25 * 0.6;
        assert!((ap - expected).abs() < 1e-10);
    }

    #[test]
    fn test_calculate_ap_leading_false_positive() {
        // FP, TP, TP against two ground truth boxes
        let precisions = vec![0.0, 0.5, 2.0 / 3.0];
        let recalls = vec![0.0, 0.5, 1.0];
        let ap = calculate_ap(&precisions, &recalls);
        assert!((ap - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_calculate_map() {
        let class_aps = vec![0.8, 0.9, 0.75, 0.85];
        let map = calculate_map(&class_aps);
        assert!((map - 0.825).abs() < 1e-10);
    }

    #[test]
    fn test_calculate_map_empty() {
        let map = calculate_map(&[]);
        assert_eq!(map, 0.0);
    }
}
