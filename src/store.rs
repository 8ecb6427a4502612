//! Record indexing by class and by class then frame.

use crate::types::Record;
use std::collections::BTreeMap;

/// Records of each class, in load order.
pub type ClassIndex<R> = BTreeMap<String, Vec<R>>;

/// Records of each class, grouped by the frame they belong to.
pub type FrameIndex<R> = BTreeMap<String, BTreeMap<String, Vec<R>>>;

/// Group records by class, preserving their order within each class.
pub fn group_by_class<R: Record + Clone>(records: &[R]) -> ClassIndex<R> {
    let mut groups: ClassIndex<R> = BTreeMap::new();

    for record in records {
        groups
            .entry(record.class_name().to_string())
            .or_default()
            .push(record.clone());
    }

    groups
}

/// Group records by class and then by frame id.
pub fn group_by_class_and_frame<R: Record + Clone>(records: &[R]) -> FrameIndex<R> {
    let mut groups: FrameIndex<R> = BTreeMap::new();

    for record in records {
        groups
            .entry(record.class_name().to_string())
            .or_default()
            .entry(record.frame_id().to_string())
            .or_default()
            .push(record.clone());
    }

    groups
}

/// Both indices over one set of records.
///
/// Built once per load; replacing the records means building a new index.
#[derive(Debug, Clone)]
pub struct RecordIndex<R> {
    by_class: ClassIndex<R>,
    by_frame: FrameIndex<R>,
}

impl<R> Default for RecordIndex<R> {
    fn default() -> Self {
        Self {
            by_class: BTreeMap::new(),
            by_frame: BTreeMap::new(),
        }
    }
}

impl<R: Record + Clone> RecordIndex<R> {
    /// Build both indices with two independent passes over `records`.
    pub fn build(records: &[R]) -> Self {
        Self {
            by_class: group_by_class(records),
            by_frame: group_by_class_and_frame(records),
        }
    }
}

impl<R> RecordIndex<R> {
    /// Class names present in the index, in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.by_class.keys().map(String::as_str)
    }

    pub fn contains_class(&self, class_name: &str) -> bool {
        self.by_class.contains_key(class_name)
    }

    /// All records of a class in load order.
    pub fn class_records(&self, class_name: &str) -> &[R] {
        self.by_class
            .get(class_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Records of a class grouped per frame, if the class is present.
    pub fn class_frames(&self, class_name: &str) -> Option<&BTreeMap<String, Vec<R>>> {
        self.by_frame.get(class_name)
    }

    /// Records of a class in one frame; empty when there are none.
    pub fn frame_records(&self, class_name: &str, frame_id: &str) -> &[R] {
        self.by_frame
            .get(class_name)
            .and_then(|frames| frames.get(frame_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of records across all classes.
    pub fn len(&self) -> usize {
        self.by_class.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}
