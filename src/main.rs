use std::path::PathBuf;

use accuracy_checker::loader::{read_detections_with_options, read_groundtruths_with_options};
use accuracy_checker::{init_logging, AccuracyCalculator, AccuracyReport, EvaluatorConfig, LoaderOptions};
use clap::Parser;
use log::{info, LevelFilter};

#[derive(Parser)]
#[command(name = "accuracy-checker")]
#[command(about = "Detection accuracy tool: compute TP/FP/FN, TPR, FDR, AP and mAP from CSV files")]
struct Cli {
    /// Path to the ground truth CSV file (frame_id,class_name,x1,y1,x2,y2)
    #[arg(long)]
    groundtruths: PathBuf,

    /// Path to the detections CSV file (frame_id,class_name,x1,y1,x2,y2,confidence)
    #[arg(long)]
    detections: PathBuf,

    /// IoU threshold for a detection to match a ground truth box
    #[arg(long)]
    iou_threshold: Option<f64>,

    /// JSON config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop detections below this confidence before evaluating
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Both CSV files start with a header row
    #[arg(long)]
    has_headers: bool,

    /// Also write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LevelFilter::Info);
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EvaluatorConfig::load(path)?,
        None => EvaluatorConfig::default(),
    };
    if let Some(iou_threshold) = cli.iou_threshold {
        config.iou_threshold = iou_threshold;
    }
    if let Some(min_confidence) = cli.min_confidence {
        config.min_confidence = Some(min_confidence);
    }

    let mut calculator = AccuracyCalculator::from_config(&config)?;
    let options = LoaderOptions {
        has_headers: cli.has_headers,
        ..LoaderOptions::default()
    };

    info!("Loading ground truth from {}", cli.groundtruths.display());
    calculator.set_groundtruths(read_groundtruths_with_options(&cli.groundtruths, &options)?);

    info!("Loading detections from {}", cli.detections.display());
    calculator.set_detections(read_detections_with_options(&cli.detections, &options)?);

    let report = calculator.report();
    print_summary(&report);

    if let Some(path) = &cli.json {
        std::fs::write(path, report.to_json()?)?;
        info!("Wrote JSON report to {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &AccuracyReport) {
    println!("\n=== Accuracy (IoU >= {:.2}) ===", report.iou_threshold);
    println!("True positives:  {}", report.true_positives);
    println!("False positives: {}", report.false_positives);
    println!("False negatives: {}", report.false_negatives);
    println!("TPR: {:.4}", report.tpr);
    println!("FDR: {:.4}", report.fdr);
    println!("\n{:<20} {:>8}", "Class", "AP");
    for class_ap in &report.ap_per_class {
        println!("{:<20} {:>8.4}", class_ap.class_name, class_ap.ap);
    }
    println!("{:<20} {:>8.4}", "mAP", report.map);
}
