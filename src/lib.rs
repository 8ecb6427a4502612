//! # accuracy-checker
//!
//! A Rust library for measuring how well an object detector agrees with
//! ground truth annotations.
//!
//! This library provides implementations of the usual detection metrics:
//! - **TP / FP / FN** totals from greedy per-frame matching
//! - **TPR** (True Positive Rate) and **FDR** (False Detection Rate)
//! - **Precision/recall curves** per class, in confidence order
//! - **AP** (Average Precision, precision envelope) and **mAP**
//!
//! ## Features
//!
//! - Load ground truth and detections from CSV files
//! - Calculate pixel-inclusive IoU (Intersection over Union) between boxes
//! - Filter detections by confidence score thresholds
//! - Decode raw SSD, YOLO and YOLOX network output into detections
//! - Write the full metric set as a JSON report
//!
//! ## Quick Start
//!
//! ```rust
//! use accuracy_checker::{AccuracyCalculator, BoundingBox, Detection, GroundTruth};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut calculator = AccuracyCalculator::new(0.5)?;
//! // In actual use: calculator.load_groundtruths("groundtruths.csv")?;
//! calculator.set_groundtruths(vec![
//!     GroundTruth::new("0", "car", BoundingBox::new(0.0, 0.0, 9.0, 9.0)),
//! ]);
//! calculator.set_detections(vec![
//!     Detection::new("0", "car", BoundingBox::new(0.0, 0.0, 9.0, 9.0), 0.9),
//! ]);
//!
//! println!("TPR: {:.4}", calculator.calc_tpr());
//! println!("mAP: {:.4}", calculator.calc_map());
//! assert_eq!(calculator.calc_map(), 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## CSV Format
//!
//! Rows carry no header by default. Ground truth rows:
//!
//! ```text
//! frame_id,class_name,x1,y1,x2,y2
//! ```
//!
//! Detection rows add the confidence score:
//!
//! ```text
//! frame_id,class_name,x1,y1,x2,y2,confidence
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod matching;
pub mod metrics;
pub mod nms;
pub mod stats;
pub mod store;
pub mod threshold;
pub mod types;

use log::LevelFilter;

// Re-export commonly used types and functions
pub use adapter::{AdapterConfig, DecodedBox, PostProcess, SsdAdapter, YoloAdapter, YoloxAdapter};
pub use config::EvaluatorConfig;
pub use error::{AccuracyError, Result};
pub use evaluator::AccuracyCalculator;
pub use loader::{read_detections, read_groundtruths, write_detections, LoaderOptions};
pub use stats::PostProcessStats;
pub use threshold::filter_by_confidence;
pub use types::{AccuracyReport, BoundingBox, ClassAp, Detection, GroundTruth, MatchCounts};

/// Initialise `env_logger`, honouring `RUST_LOG` when it is set.
///
/// Calling this more than once is harmless.
pub fn init_logging(default_filter: LevelFilter) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );

    let _ = builder.try_init();
}
