//! Statistics tracking for network output post-processing
//!
//! Decoders count what happened to every candidate row so callers can see
//! why a frame ended up with few or no detections.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Statistics collected while decoding one or more network outputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessStats {
    /// Total number of candidate rows decoded
    pub candidates: usize,

    /// Number of candidates at or below the confidence threshold
    pub below_threshold: usize,

    /// Number of candidates whose class is not of interest
    pub uninteresting: usize,

    /// Number of candidates removed by Non-Maximum Suppression
    pub suppressed: usize,
}

impl PostProcessStats {
    /// Create a new `PostProcessStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_candidate(&mut self) {
        self.candidates += 1;
    }

    pub fn skip_below_threshold(&mut self) {
        self.below_threshold += 1;
    }

    pub fn skip_uninteresting(&mut self) {
        self.uninteresting += 1;
    }

    pub fn add_suppressed(&mut self, count: usize) {
        self.suppressed += count;
    }

    /// Number of candidates that survived every filter
    pub fn kept(&self) -> usize {
        self.candidates.saturating_sub(self.total_skipped())
    }

    /// Total number of candidates dropped for any reason
    pub fn total_skipped(&self) -> usize {
        self.below_threshold + self.uninteresting + self.suppressed
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "PostProcessStats {{ candidates: {}, kept: {}, below_threshold: {}, uninteresting: {}, suppressed: {} }}",
            self.candidates,
            self.kept(),
            self.below_threshold,
            self.uninteresting,
            self.suppressed
        )
    }
}

impl AddAssign for PostProcessStats {
    fn add_assign(&mut self, rhs: Self) {
        self.candidates += rhs.candidates;
        self.below_threshold += rhs.below_threshold;
        self.uninteresting += rhs.uninteresting;
        self.suppressed += rhs.suppressed;
    }
}
