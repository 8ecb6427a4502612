//! Integration tests for the complete CSV-to-report pipeline.

use accuracy_checker::evaluator::AccuracyCalculator;
use accuracy_checker::types::AccuracyReport;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(rows: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(rows.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn calculator_from(groundtruths: &str, detections: &str) -> AccuracyCalculator {
    let gt_file = write_csv(groundtruths);
    let det_file = write_csv(detections);

    let mut calculator = AccuracyCalculator::new(0.5).unwrap();
    calculator.load_groundtruths(gt_file.path()).unwrap();
    calculator.load_detections(det_file.path()).unwrap();
    calculator
}

#[test]
fn test_perfect_detection() {
    let calculator = calculator_from("0,car,0,0,10,10\n", "0,car,0,0,10,10,0.9\n");

    assert_eq!(calculator.calc_total_tp(), 1);
    assert_eq!(calculator.calc_total_fp(), 0);
    assert_eq!(calculator.calc_total_fn(), 0);
    assert_eq!(calculator.calc_tpr(), 1.0);
    assert_eq!(calculator.calc_fdr(), 0.0);
    assert_eq!(calculator.calc_ap("car"), 1.0);
    assert_eq!(calculator.calc_map(), 1.0);
}

#[test]
fn test_missed_detection() {
    let calculator = calculator_from("0,car,0,0,10,10\n", "0,car,20,20,30,30,0.9\n");

    assert_eq!(calculator.calc_total_tp(), 0);
    assert_eq!(calculator.calc_total_fp(), 1);
    assert_eq!(calculator.calc_total_fn(), 1);
    assert_eq!(calculator.calc_tpr(), 0.0);
    assert_eq!(calculator.calc_fdr(), 1.0);
    assert_eq!(calculator.calc_ap("car"), 0.0);
}

#[test]
fn test_duplicate_detection_penalty() {
    // Listed low confidence first: matching must still follow confidence order
    let calculator = calculator_from(
        "0,car,0,0,10,10\n",
        "0,car,1,1,10,10,0.6\n0,car,0,0,10,10,0.9\n",
    );

    assert_eq!(calculator.calc_total_tp(), 1);
    assert_eq!(calculator.calc_total_fp(), 1);
    assert_eq!(calculator.calc_total_fn(), 0);

    let (precisions, recalls) = calculator.calc_precision_recall("car");
    assert_eq!(precisions, vec![1.0, 0.5]);
    assert_eq!(recalls, vec![1.0, 1.0]);
    assert_eq!(calculator.calc_ap("car"), 1.0);
}

#[test]
fn test_class_without_ground_truth() {
    let calculator = calculator_from(
        "0,car,0,0,10,10\n",
        "0,car,0,0,10,10,0.9\n0,person,0,0,10,10,0.8\n1,person,5,5,15,15,0.7\n",
    );

    assert_eq!(calculator.calc_total_tp(), 1);
    assert_eq!(calculator.calc_total_fp(), 2);
    assert_eq!(calculator.calc_total_fn(), 0);
    // person is not part of the mean
    assert_eq!(calculator.groundtruth_classes(), vec!["car"]);
    assert_eq!(calculator.calc_map(), 1.0);
    assert_eq!(calculator.calc_ap("person"), 0.0);
}

#[test]
fn test_multi_class_multi_frame_report() {
    let groundtruths = "\
0,car,0,0,9,9
0,car,20,20,29,29
1,car,0,0,9,9
1,bus,50,50,69,69
";
    let detections = "\
0,car,0,0,9,9,0.9
0,car,21,21,29,29,0.6
1,car,40,40,49,49,0.8
1,bus,50,50,69,69,0.7
1,person,0,0,5,5,0.5
";
    let calculator = calculator_from(groundtruths, detections);
    let report = calculator.report();

    assert_eq!(report.true_positives, 3);
    assert_eq!(report.false_positives, 2);
    assert_eq!(report.false_negatives, 1);
    assert!((report.tpr - 0.75).abs() < 1e-10);
    assert!((report.fdr - 0.4).abs() < 1e-10);

    assert_eq!(report.ap_per_class.len(), 2);
    assert_eq!(report.ap_per_class[0].class_name, "bus");
    assert!((report.ap_per_class[0].ap - 1.0).abs() < 1e-10);
    assert_eq!(report.ap_per_class[1].class_name, "car");
    assert!((report.ap_per_class[1].ap - 5.0 / 9.0).abs() < 1e-10);
    assert!((report.map - 7.0 / 9.0).abs() < 1e-10);

    // The report agrees with the individual queries
    assert_eq!(report.true_positives, calculator.calc_total_tp());
    assert_eq!(report.false_positives, calculator.calc_total_fp());
    assert_eq!(report.false_negatives, calculator.calc_total_fn());
    assert!((report.map - calculator.calc_map()).abs() < 1e-12);
}

#[test]
fn test_report_json_roundtrip_through_file() {
    let calculator = calculator_from("0,car,0,0,10,10\n", "0,car,0,0,10,10,0.9\n");
    let report = calculator.report();

    let mut out = NamedTempFile::new().unwrap();
    out.write_all(report.to_json().unwrap().as_bytes()).unwrap();

    let text = std::fs::read_to_string(out.path()).unwrap();
    let parsed: AccuracyReport = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_reload_replaces_previous_records() {
    let mut calculator = calculator_from("0,car,0,0,10,10\n", "0,car,0,0,10,10,0.9\n");
    assert_eq!(calculator.calc_total_tp(), 1);

    let empty = write_csv("");
    calculator.load_detections(empty.path()).unwrap();
    assert_eq!(calculator.calc_total_tp(), 0);
    assert_eq!(calculator.calc_total_fn(), 1);
    assert!(calculator.detection_classes().is_empty());
}

#[test]
fn test_iou_threshold_changes_outcome() {
    let gt_file = write_csv("0,car,0,0,9,9\n");
    // IoU 50/100 = 0.5 against the ground truth box
    let det_file = write_csv("0,car,0,0,4,9,0.9\n");

    let mut strict = AccuracyCalculator::new(0.6).unwrap();
    strict.load_groundtruths(gt_file.path()).unwrap();
    strict.load_detections(det_file.path()).unwrap();
    assert_eq!(strict.calc_total_tp(), 0);

    let mut lenient = AccuracyCalculator::new(0.5).unwrap();
    lenient.load_groundtruths(gt_file.path()).unwrap();
    lenient.load_detections(det_file.path()).unwrap();
    assert_eq!(lenient.calc_total_tp(), 1);
}
