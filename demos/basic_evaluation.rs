//! Basic evaluation example demonstrating core functionality.

use accuracy_checker::loader::{read_detections_from_reader, read_groundtruths_from_reader};
use accuracy_checker::{
    filter_by_confidence, metrics::iou::calculate_iou, AccuracyCalculator, BoundingBox, LoaderOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Detection Accuracy Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::new(10.0, 10.0, 49.0, 49.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 69.0, 69.0);
    let iou = calculate_iou(&bbox1, &bbox2);
    println!("   IoU between overlapping boxes: {:.4}", iou);
    println!();

    // Example 2: Load records
    println!("2. Loading CSV Records");
    let groundtruth_csv = "\
frame_0001,car,100,100,299,249
frame_0001,bus,350,200,449,319
frame_0002,car,40,60,139,159
frame_0002,truck,400,120,599,299
";
    let detection_csv = "\
frame_0001,car,102,98,301,250,0.94
frame_0001,car,104,101,297,247,0.61
frame_0001,bus,360,210,452,330,0.88
frame_0002,car,300,300,380,370,0.72
frame_0002,truck,405,118,597,301,0.83
frame_0002,person,10,10,50,90,0.55
";

    let options = LoaderOptions::default();
    let groundtruths = read_groundtruths_from_reader(groundtruth_csv.as_bytes(), &options)?;
    let detections = read_detections_from_reader(detection_csv.as_bytes(), &options)?;
    println!("   Loaded {} ground truth boxes", groundtruths.len());
    println!("   Loaded {} detections", detections.len());
    println!();

    // Example 3: Evaluate
    println!("3. Evaluating at IoU >= 0.5");
    let mut calculator = AccuracyCalculator::new(0.5)?;
    calculator.set_groundtruths(groundtruths);
    calculator.set_detections(detections.clone());

    println!("   TP: {}", calculator.calc_total_tp());
    println!("   FP: {}", calculator.calc_total_fp());
    println!("   FN: {}", calculator.calc_total_fn());
    println!("   TPR: {:.4}", calculator.calc_tpr());
    println!("   FDR: {:.4}", calculator.calc_fdr());
    println!();

    // Example 4: Per-class curves and AP
    println!("4. Precision/Recall and AP per Class");
    for class_name in calculator.groundtruth_classes() {
        let (precisions, recalls) = calculator.calc_precision_recall(class_name);
        println!("   {}:", class_name);
        for (precision, recall) in precisions.iter().zip(&recalls) {
            println!("      P={:.3} R={:.3}", precision, recall);
        }
        println!("      AP={:.4}", calculator.calc_ap(class_name));
    }
    println!("   mAP: {:.4}", calculator.calc_map());
    println!();

    // Example 5: Confidence filtering
    println!("5. Dropping Detections Below 0.7 Confidence");
    let confident = filter_by_confidence(&detections, 0.7)?;
    println!("   Kept {} of {} detections", confident.len(), detections.len());
    calculator.set_detections(confident);
    println!("   TPR: {:.4}  FDR: {:.4}", calculator.calc_tpr(), calculator.calc_fdr());
    println!();

    // Example 6: JSON report
    println!("6. JSON Report");
    println!("{}", calculator.report().to_json()?);

    Ok(())
}
