//! Precision, recall and rate calculations with zero-denominator fallbacks.

/// Calculate precision from confusion matrix values
///
/// Precision = TP / (TP + FP), 0.0 when there are no detections.
///
/// # Examples
///
/// ```
/// # use accuracy_checker::metrics::precision_recall::calculate_precision;
/// assert_eq!(calculate_precision(80, 20), 0.8);
/// assert_eq!(calculate_precision(0, 0), 0.0);
/// ```
#[must_use]
pub fn calculate_precision(tp: usize, fp: usize) -> f64 {
    ratio(tp, tp + fp)
}

/// Calculate recall from confusion matrix values
///
/// Recall = TP / (TP + FN), 0.0 when there is no ground truth.
#[must_use]
pub fn calculate_recall(tp: usize, fn_: usize) -> f64 {
    ratio(tp, tp + fn_)
}

/// True Positive Rate, the fraction of ground truth that was found.
#[must_use]
pub fn calculate_tpr(tp: usize, fn_: usize) -> f64 {
    calculate_recall(tp, fn_)
}

/// False Detection Rate, the fraction of detections that are spurious.
///
/// FDR = FP / (TP + FP), 0.0 when there are no detections.
///
/// # Examples
///
/// ```
/// # use accuracy_checker::metrics::precision_recall::calculate_fdr;
/// assert_eq!(calculate_fdr(0, 1), 1.0);
/// assert_eq!(calculate_fdr(3, 1), 0.25);
/// ```
#[must_use]
pub fn calculate_fdr(tp: usize, fp: usize) -> f64 {
    ratio(fp, tp + fp)
}

/// Precision/recall pair for one point of a class curve.
///
/// Picks the value according to whether the class has ground truth and
/// whether any detection has been counted so far:
///
/// | ground truth | detections | precision          | recall             |
/// |--------------|------------|--------------------|--------------------|
/// | yes          | yes        | TP / (TP + FP)     | TP / (TP + FN)     |
/// | no           | yes        | 0                  | 1                  |
/// | yes          | no         | 1                  | 0                  |
/// | no           | no         | 1                  | 1                  |
///
/// # Arguments
///
/// * `has_ground_truth` - Whether the class has any ground truth box
/// * `tp` - True positives so far
/// * `fp` - False positives so far
/// * `fn_` - Ground truth boxes still unmatched
#[must_use]
pub fn curve_point(has_ground_truth: bool, tp: usize, fp: usize, fn_: usize) -> (f64, f64) {
    let has_detections = tp + fp > 0;

    match (has_ground_truth, has_detections) {
        (true, true) => (calculate_precision(tp, fp), calculate_recall(tp, fn_)),
        (false, true) => (0.0, 1.0),
        (true, false) => (1.0, 0.0),
        (false, false) => (1.0, 1.0),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
