//! Metrics calculation modules for detection accuracy.

pub mod iou;
pub mod ap;
pub mod precision_recall;

pub use iou::calculate_iou;
pub use ap::{calculate_ap, calculate_map};
pub use precision_recall::{
    calculate_fdr, calculate_precision, calculate_recall, calculate_tpr, curve_point,
};
