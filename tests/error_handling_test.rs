//! Error handling and validation tests.

use accuracy_checker::adapter::{AdapterConfig, PostProcess, SsdAdapter, YoloAdapter};
use accuracy_checker::config::EvaluatorConfig;
use accuracy_checker::error::AccuracyError;
use accuracy_checker::evaluator::AccuracyCalculator;
use accuracy_checker::loader::{read_detections, read_groundtruths, read_groundtruths_from_reader, LoaderOptions};
use accuracy_checker::threshold::filter_by_confidence;
use accuracy_checker::types::{BoundingBox, Detection};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

// ============================================================================
// LOADER ERROR TESTS
// ============================================================================

#[test]
fn test_missing_file() {
    let result = read_groundtruths("/nonexistent/path/groundtruths.csv");
    assert!(result.is_err(), "Should fail on a missing file");
}

#[test]
fn test_calculator_load_missing_file_keeps_state() {
    let mut calculator = AccuracyCalculator::default();
    calculator.set_groundtruths(vec![accuracy_checker::GroundTruth::new(
        "0",
        "car",
        BoundingBox::new(0.0, 0.0, 9.0, 9.0),
    )]);

    assert!(calculator.load_groundtruths("/nonexistent/gt.csv").is_err());
    assert_eq!(calculator.groundtruth_classes(), vec!["car"]);
}

#[test]
fn test_detection_row_without_confidence() {
    let file = write_file("0,car,0,0,9,9\n");
    let result = read_detections(file.path());
    assert!(matches!(result, Err(AccuracyError::Csv(_))));
}

#[test]
fn test_ragged_rows() {
    let file = write_file("0,car,0,0,9,9\n1,car,0,0,9\n");
    assert!(read_groundtruths(file.path()).is_err());
}

#[test]
fn test_inverted_box_names_row() {
    let file = write_file("0,car,0,0,9,9\n0,car,0,0,9,9\n0,car,9,0,0,9\n");
    match read_groundtruths(file.path()) {
        Err(AccuracyError::InvalidRecord(msg)) => {
            assert!(msg.contains("Row 3"), "message should name the row: {msg}");
        }
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn test_row_number_counts_header() {
    let options = LoaderOptions {
        has_headers: true,
        ..LoaderOptions::default()
    };
    let csv = "frame,class,x1,y1,x2,y2\n0,car,5,5,0,0\n";
    match read_groundtruths_from_reader(csv.as_bytes(), &options) {
        Err(AccuracyError::InvalidRecord(msg)) => assert!(msg.contains("Row 2")),
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn test_infinite_coordinate() {
    let file = write_file("0,car,0,0,inf,9\n");
    assert!(matches!(
        read_groundtruths(file.path()),
        Err(AccuracyError::InvalidRecord(_))
    ));
}

#[test]
fn test_header_without_flag_fails() {
    let file = write_file("frame_id,class_name,x1,y1,x2,y2\n0,car,0,0,9,9\n");
    assert!(read_groundtruths(file.path()).is_err());
}

// ============================================================================
// THRESHOLD AND CONFIG ERROR TESTS
// ============================================================================

#[test]
fn test_invalid_confidence_filter() {
    let detections = vec![Detection::new("0", "car", BoundingBox::new(0.0, 0.0, 9.0, 9.0), 0.9)];
    assert!(matches!(
        filter_by_confidence(&detections, 2.0),
        Err(AccuracyError::InvalidThreshold(_))
    ));
}

#[test]
fn test_invalid_iou_threshold_message() {
    match AccuracyCalculator::new(1.5) {
        Err(AccuracyError::InvalidThreshold(msg)) => assert!(msg.contains("1.5")),
        other => panic!("expected InvalidThreshold, got {other:?}"),
    }
}

#[test]
fn test_config_malformed_json() {
    let file = write_file("{ iou_threshold: ");
    assert!(matches!(
        EvaluatorConfig::load(file.path()),
        Err(AccuracyError::Json(_))
    ));
}

#[test]
fn test_config_invalid_min_confidence() {
    let file = write_file(r#"{ "min_confidence": -0.5 }"#);
    assert!(matches!(
        EvaluatorConfig::load(file.path()),
        Err(AccuracyError::InvalidThreshold(_))
    ));
}

#[test]
fn test_from_config_rejects_unvalidated_values() {
    let config = EvaluatorConfig {
        iou_threshold: 3.0,
        min_confidence: None,
    };
    assert!(AccuracyCalculator::from_config(&config).is_err());
}

#[test]
fn test_empty_config_uses_defaults() {
    let file = write_file("{}");
    let config = EvaluatorConfig::load(file.path()).unwrap();
    assert_eq!(config, EvaluatorConfig::default());
}

// ============================================================================
// ADAPTER ERROR TESTS
// ============================================================================

#[test]
fn test_adapter_partial_row() {
    let config = AdapterConfig::new(0.5, 0.4, ["background", "car"]).unwrap();
    let result = SsdAdapter::new(config).post_process(&[0.0; 10], 640, 480);
    assert!(matches!(result, Err(AccuracyError::InvalidOutput(_))));
}

#[test]
fn test_adapter_invalid_thresholds() {
    assert!(matches!(
        AdapterConfig::new(0.5, 1.2, ["car"]),
        Err(AccuracyError::InvalidThreshold(_))
    ));
}

#[test]
fn test_yolo_wrong_row_width() {
    // Three classes make rows of eight values; seven values is one short
    let config = AdapterConfig::new(0.5, 0.4, ["car", "bus", "truck"]).unwrap();
    let result = YoloAdapter::new(config).post_process(&[0.5; 7], 640, 480);
    assert!(matches!(result, Err(AccuracyError::InvalidOutput(_))));
}

#[test]
fn test_error_display() {
    let err = AccuracyError::InvalidOutput("bad rows".to_string());
    assert!(err.to_string().contains("bad rows"));
}
