//! Accuracy calculator: TP/FP/FN totals, TPR, FDR, AP and mAP.

use crate::config::EvaluatorConfig;
use crate::error::Result;
use crate::loader::{read_detections, read_groundtruths};
use crate::matching::{match_frame, sort_by_confidence, MatchState};
use crate::metrics::ap::{calculate_ap, calculate_map};
use crate::metrics::precision_recall::{calculate_fdr, calculate_tpr, curve_point};
use crate::store::RecordIndex;
use crate::threshold::{retain_confident, validate_threshold};
use crate::types::{AccuracyReport, ClassAp, Detection, GroundTruth, MatchCounts};
use log::{debug, info, warn};
use std::path::Path;

/// Default IoU threshold for a detection to count as a hit.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Computes detection quality metrics from ground truth and detection records.
///
/// Ground truth and detections are loaded independently, in any order, and
/// each load replaces what was loaded before. Every `calc_*` query makes its
/// own pass over the loaded records; match bookkeeping lives only for the
/// duration of that pass.
///
/// With a minimum confidence set, detections scoring below it are dropped
/// when they are loaded and never reach the matcher.
///
/// # Example
///
/// ```
/// use accuracy_checker::{AccuracyCalculator, BoundingBox, Detection, GroundTruth};
///
/// let mut calculator = AccuracyCalculator::default();
/// calculator.set_groundtruths(vec![GroundTruth::new(
///     "0",
///     "car",
///     BoundingBox::new(0.0, 0.0, 10.0, 10.0),
/// )]);
/// calculator.set_detections(vec![Detection::new(
///     "0",
///     "car",
///     BoundingBox::new(0.0, 0.0, 10.0, 10.0),
///     0.9,
/// )]);
///
/// assert_eq!(calculator.calc_total_tp(), 1);
/// assert_eq!(calculator.calc_tpr(), 1.0);
/// assert_eq!(calculator.calc_ap("car"), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AccuracyCalculator {
    iou_threshold: f64,
    min_confidence: Option<f64>,
    groundtruths: RecordIndex<GroundTruth>,
    detections: RecordIndex<Detection>,
}

impl Default for AccuracyCalculator {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            min_confidence: None,
            groundtruths: RecordIndex::default(),
            detections: RecordIndex::default(),
        }
    }
}

impl AccuracyCalculator {
    /// Create a calculator with the given IoU threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not in the range [0.0, 1.0].
    pub fn new(iou_threshold: f64) -> Result<Self> {
        validate_threshold(iou_threshold)?;
        Ok(Self {
            iou_threshold,
            ..Self::default()
        })
    }

    /// Create a calculator from a validated configuration, including its
    /// minimum detection confidence.
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self> {
        config.validate()?;
        let mut calculator = Self::new(config.iou_threshold)?;
        calculator.min_confidence = config.min_confidence;
        Ok(calculator)
    }

    pub fn iou_threshold(&self) -> f64 {
        self.iou_threshold
    }

    pub fn min_confidence(&self) -> Option<f64> {
        self.min_confidence
    }

    /// Set the minimum confidence applied to detections loaded from now on.
    ///
    /// Detections already loaded are not refiltered.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not in the range [0.0, 1.0].
    pub fn set_min_confidence(&mut self, min_confidence: Option<f64>) -> Result<()> {
        if let Some(threshold) = min_confidence {
            validate_threshold(threshold)?;
        }
        self.min_confidence = min_confidence;
        Ok(())
    }

    /// Load ground truth rows from a CSV file, replacing any previous ground truth.
    pub fn load_groundtruths<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let records = read_groundtruths(path)?;
        info!("Loaded {} ground truth boxes from {}", records.len(), path.display());
        self.set_groundtruths(records);
        Ok(())
    }

    /// Load detection rows from a CSV file, replacing any previous detections.
    pub fn load_detections<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let records = read_detections(path)?;
        info!("Loaded {} detections from {}", records.len(), path.display());
        self.set_detections(records);
        Ok(())
    }

    /// Replace the ground truth with in-memory records.
    pub fn set_groundtruths(&mut self, records: Vec<GroundTruth>) {
        self.groundtruths = RecordIndex::build(&records);
        debug!(
            "Indexed {} ground truth boxes over {} classes",
            self.groundtruths.len(),
            self.groundtruths.classes().count()
        );
    }

    /// Replace the detections with in-memory records, dropping those below
    /// the minimum confidence.
    pub fn set_detections(&mut self, mut records: Vec<Detection>) {
        if let Some(threshold) = self.min_confidence {
            let before = records.len();
            retain_confident(&mut records, threshold);
            info!(
                "Kept {} of {} detections with confidence >= {}",
                records.len(),
                before,
                threshold
            );
        }
        self.detections = RecordIndex::build(&records);
        debug!(
            "Indexed {} detections over {} classes",
            self.detections.len(),
            self.detections.classes().count()
        );
    }

    /// Classes present in the ground truth, sorted by name.
    pub fn groundtruth_classes(&self) -> Vec<&str> {
        self.groundtruths.classes().collect()
    }

    /// Classes present in the detections, sorted by name.
    pub fn detection_classes(&self) -> Vec<&str> {
        self.detections.classes().collect()
    }

    /// Total number of true positive detections over all classes.
    pub fn calc_total_tp(&self) -> usize {
        self.groundtruths
            .classes()
            .map(|class_name| self.matched_detections(class_name).true_positives)
            .sum()
    }

    /// Total number of ground truth boxes that no detection matched.
    pub fn calc_total_fn(&self) -> usize {
        self.groundtruths
            .classes()
            .map(|class_name| self.missed_groundtruths(class_name))
            .sum()
    }

    /// Total number of false positive detections, including every detection
    /// of a class that has no ground truth at all.
    pub fn calc_total_fp(&self) -> usize {
        let matched: usize = self
            .groundtruths
            .classes()
            .map(|class_name| self.matched_detections(class_name).false_positives)
            .sum();

        matched + self.spurious_detections()
    }

    /// All three totals, computed in one pass.
    pub fn calc_counts(&self) -> MatchCounts {
        let mut counts = MatchCounts::default();

        for class_name in self.groundtruths.classes() {
            let matched = self.matched_detections(class_name);
            counts.true_positives += matched.true_positives;
            counts.false_positives += matched.false_positives;
            counts.false_negatives += self.missed_groundtruths(class_name);
        }
        counts.false_positives += self.spurious_detections();

        counts
    }

    /// True Positive Rate: TP / (TP + FN), 0.0 when there is no ground truth.
    pub fn calc_tpr(&self) -> f64 {
        calculate_tpr(self.calc_total_tp(), self.calc_total_fn())
    }

    /// False Detection Rate: FP / (TP + FP), 0.0 when there are no detections.
    pub fn calc_fdr(&self) -> f64 {
        calculate_fdr(self.calc_total_tp(), self.calc_total_fp())
    }

    /// Build the precision-recall sequence of one class.
    ///
    /// Detections of the class are processed in confidence-descending order,
    /// one point per detection. Returns two empty vectors when the class is
    /// missing from either the ground truth or the detections.
    pub fn calc_precision_recall(&self, class_name: &str) -> (Vec<f64>, Vec<f64>) {
        if !self.detections.contains_class(class_name)
            || !self.groundtruths.contains_class(class_name)
        {
            return (Vec::new(), Vec::new());
        }

        let gt_count = self.groundtruths.class_records(class_name).len();
        let has_ground_truth = gt_count > 0;

        let mut state = MatchState::new();
        let mut tp_total = 0;
        let mut fp_total = 0;
        let mut fn_total = gt_count;

        let detections = sort_by_confidence(self.detections.class_records(class_name));
        let mut precisions = Vec::with_capacity(detections.len());
        let mut recalls = Vec::with_capacity(detections.len());

        for detection in detections {
            let ground_truths = self.groundtruths.frame_records(class_name, &detection.frame_id);
            if state.assign(detection, ground_truths, self.iou_threshold).is_true_positive {
                tp_total += 1;
                fn_total -= 1;
            } else {
                fp_total += 1;
            }

            let (precision, recall) = curve_point(has_ground_truth, tp_total, fp_total, fn_total);
            precisions.push(precision);
            recalls.push(recall);
        }

        (precisions, recalls)
    }

    /// Average Precision of one class, 0.0 when the class has no curve.
    pub fn calc_ap(&self, class_name: &str) -> f64 {
        let (precisions, recalls) = self.calc_precision_recall(class_name);
        let ap = calculate_ap(&precisions, &recalls);
        debug!("AP for class {class_name}: {ap:.4}");
        ap
    }

    /// Mean Average Precision over all ground truth classes.
    pub fn calc_map(&self) -> f64 {
        let aps: Vec<f64> = self
            .groundtruths
            .classes()
            .map(|class_name| self.calc_ap(class_name))
            .collect();

        calculate_map(&aps)
    }

    /// Compute every metric into one report.
    pub fn report(&self) -> AccuracyReport {
        if self.groundtruths.is_empty() {
            warn!("No ground truth loaded, every detection is a false positive");
        }
        for class_name in self.detections.classes() {
            if !self.groundtruths.contains_class(class_name) {
                warn!("Class {class_name} has no ground truth, all its detections are false positives");
            }
        }

        let counts = self.calc_counts();

        let ap_per_class: Vec<ClassAp> = self
            .groundtruths
            .classes()
            .map(|class_name| ClassAp {
                class_name: class_name.to_string(),
                ap: self.calc_ap(class_name),
            })
            .collect();
        let aps: Vec<f64> = ap_per_class.iter().map(|class_ap| class_ap.ap).collect();

        AccuracyReport {
            iou_threshold: self.iou_threshold,
            true_positives: counts.true_positives,
            false_positives: counts.false_positives,
            false_negatives: counts.false_negatives,
            tpr: counts.tpr(),
            fdr: counts.fdr(),
            map: calculate_map(&aps),
            ap_per_class,
        }
    }

    /// TP and FP of one ground truth class, matching each detection frame.
    ///
    /// A class without detections contributes nothing here.
    fn matched_detections(&self, class_name: &str) -> MatchCounts {
        let Some(frames) = self.detections.class_frames(class_name) else {
            return MatchCounts::default();
        };

        let mut counts = MatchCounts::default();
        for (frame_id, detections) in frames {
            let ground_truths = self.groundtruths.frame_records(class_name, frame_id);
            let frame = match_frame(sort_by_confidence(detections), ground_truths, self.iou_threshold);
            counts.true_positives += frame.true_positives;
            counts.false_positives += frame.false_positives;
        }
        counts
    }

    /// Ground truth boxes of one class that no detection matched.
    fn missed_groundtruths(&self, class_name: &str) -> usize {
        let Some(frames) = self.groundtruths.class_frames(class_name) else {
            return 0;
        };

        if !self.detections.contains_class(class_name) {
            return self.groundtruths.class_records(class_name).len();
        }

        frames
            .iter()
            .map(|(frame_id, ground_truths)| {
                let detections = self.detections.frame_records(class_name, frame_id);
                match_frame(sort_by_confidence(detections), ground_truths.as_slice(), self.iou_threshold)
                    .false_negatives
            })
            .sum()
    }

    /// Detections of classes that never appear in the ground truth.
    fn spurious_detections(&self) -> usize {
        self.detections
            .classes()
            .filter(|class_name| !self.groundtruths.contains_class(class_name))
            .map(|class_name| {
                let count = self.detections.class_records(class_name).len();
                debug!("Class {class_name} has {count} detections but no ground truth");
                count
            })
            .sum()
    }
}
