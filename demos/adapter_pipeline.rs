//! Decode raw SSD output for two frames and score it against ground truth.

use accuracy_checker::adapter::{AdapterConfig, PostProcess, SsdAdapter};
use accuracy_checker::{init_logging, AccuracyCalculator, BoundingBox, GroundTruth, PostProcessStats};
use log::LevelFilter;

const IMAGE_WIDTH: u32 = 640;
const IMAGE_HEIGHT: u32 = 480;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LevelFilter::Debug);

    let class_names = ["background", "person", "car", "bus", "truck"];
    let config = AdapterConfig::new(0.5, 0.45, class_names)?;
    let adapter = SsdAdapter::new(config);

    // Rows of [image_id, class_id, confidence, left, top, right, bottom]
    let frames: Vec<(&str, Vec<f32>)> = vec![
        (
            "frame_0001",
            vec![
                0.0, 2.0, 0.92, 0.25, 0.25, 0.5, 0.5, //
                0.0, 2.0, 0.81, 0.26, 0.25, 0.5, 0.51, //
                0.0, 1.0, 0.88, 0.6, 0.1, 0.7, 0.6, //
                0.0, 3.0, 0.35, 0.0, 0.0, 0.2, 0.2,
            ],
        ),
        (
            "frame_0002",
            vec![
                0.0, 4.0, 0.77, 0.5, 0.5, 0.9, 0.95, //
                0.0, 2.0, 0.66, 0.05, 0.6, 0.2, 0.8,
            ],
        ),
    ];

    let mut detections = Vec::new();
    let mut stats = PostProcessStats::new();
    for (frame_id, output) in &frames {
        let boxes = adapter.post_process_with_stats(output, IMAGE_WIDTH, IMAGE_HEIGHT, &mut stats)?;
        println!("{}: {} boxes", frame_id, boxes.len());
        detections.extend(boxes.into_iter().map(|decoded| decoded.into_detection(*frame_id)));
    }
    println!("{}", stats.summary_string());

    let groundtruths = vec![
        GroundTruth::new("frame_0001", "car", BoundingBox::new(160.0, 120.0, 320.0, 240.0)),
        GroundTruth::new("frame_0002", "truck", BoundingBox::new(320.0, 240.0, 576.0, 456.0)),
        GroundTruth::new("frame_0002", "car", BoundingBox::new(500.0, 10.0, 600.0, 90.0)),
    ];

    let mut calculator = AccuracyCalculator::default();
    calculator.set_groundtruths(groundtruths);
    calculator.set_detections(detections);

    let report = calculator.report();
    println!(
        "TP={} FP={} FN={} TPR={:.4} FDR={:.4} mAP={:.4}",
        report.true_positives, report.false_positives, report.false_negatives, report.tpr, report.fdr, report.map
    );

    Ok(())
}
