//! Evaluation settings, loadable from JSON.

use crate::error::Result;
use crate::evaluator::DEFAULT_IOU_THRESHOLD;
use crate::threshold::validate_threshold;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Settings for one evaluation run.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
///
/// ```
/// use accuracy_checker::config::EvaluatorConfig;
///
/// let config: EvaluatorConfig = serde_json::from_str(r#"{ "iou_threshold": 0.7 }"#).unwrap();
/// assert_eq!(config.iou_threshold, 0.7);
/// assert_eq!(config.min_confidence, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Minimum IoU for a detection to match a ground truth box
    pub iou_threshold: f64,
    /// Detections below this confidence are dropped before evaluation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            min_confidence: None,
        }
    }
}

impl EvaluatorConfig {
    /// Load settings from a JSON file and validate them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold lies within [0.0, 1.0].
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold)?;
        if let Some(min_confidence) = self.min_confidence {
            validate_threshold(min_confidence)?;
        }
        Ok(())
    }
}
