//! CSV loading utilities for ground truth and detection records.
//!
//! Ground truth rows have the shape `frame_id,class_name,x1,y1,x2,y2` and
//! detection rows append a confidence: `frame_id,class_name,x1,y1,x2,y2,confidence`.

use crate::error::{AccuracyError, Result};
use crate::types::{BoundingBox, Detection, GroundTruth};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::debug;
use std::io;
use std::path::Path;

type GroundTruthRow = (String, String, f64, f64, f64, f64);
type DetectionRow = (String, String, f64, f64, f64, f64, f64);

const DETECTION_HEADER: [&str; 7] = ["frame_id", "class_name", "x1", "y1", "x2", "y2", "confidence"];

/// CSV dialect options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Skip the first row as a header
    pub has_headers: bool,
    /// Field delimiter
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            has_headers: false,
            delimiter: b',',
        }
    }
}

impl LoaderOptions {
    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(self.has_headers)
            .delimiter(self.delimiter)
            .trim(Trim::All);
        builder
    }

    /// 1-based line number of the n-th data row.
    fn line_of(&self, index: usize) -> usize {
        index + 1 + usize::from(self.has_headers)
    }
}

/// Load ground truth records from a headerless, comma-separated file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a row does not have six
/// fields of the right types, or a box fails validation.
///
/// # Example
///
/// ```no_run
/// use accuracy_checker::loader::read_groundtruths;
///
/// let groundtruths = read_groundtruths("groundtruths.csv").unwrap();
/// println!("Loaded {} boxes", groundtruths.len());
/// ```
pub fn read_groundtruths<P: AsRef<Path>>(path: P) -> Result<Vec<GroundTruth>> {
    read_groundtruths_with_options(path, &LoaderOptions::default())
}

/// Load ground truth records from a file with the given CSV options.
pub fn read_groundtruths_with_options<P: AsRef<Path>>(
    path: P,
    options: &LoaderOptions,
) -> Result<Vec<GroundTruth>> {
    let path = path.as_ref();
    let reader = options.reader_builder().from_path(path)?;
    let records = collect_groundtruths(reader, options)?;
    debug!("Read {} ground truth rows from {}", records.len(), path.display());
    Ok(records)
}

/// Load ground truth records from any reader, e.g. an in-memory string.
///
/// # Example
///
/// ```
/// use accuracy_checker::loader::{read_groundtruths_from_reader, LoaderOptions};
///
/// let csv = "0,car,10,20,30,40\n1,bus,0,0,5,5\n";
/// let groundtruths = read_groundtruths_from_reader(csv.as_bytes(), &LoaderOptions::default()).unwrap();
/// assert_eq!(groundtruths.len(), 2);
/// assert_eq!(groundtruths[1].class_name, "bus");
/// ```
pub fn read_groundtruths_from_reader<R: io::Read>(
    reader: R,
    options: &LoaderOptions,
) -> Result<Vec<GroundTruth>> {
    collect_groundtruths(options.reader_builder().from_reader(reader), options)
}

/// Load detection records from a headerless, comma-separated file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a row does not have seven
/// fields of the right types, a box fails validation or the confidence is not
/// finite.
pub fn read_detections<P: AsRef<Path>>(path: P) -> Result<Vec<Detection>> {
    read_detections_with_options(path, &LoaderOptions::default())
}

/// Load detection records from a file with the given CSV options.
pub fn read_detections_with_options<P: AsRef<Path>>(
    path: P,
    options: &LoaderOptions,
) -> Result<Vec<Detection>> {
    let path = path.as_ref();
    let reader = options.reader_builder().from_path(path)?;
    let records = collect_detections(reader, options)?;
    debug!("Read {} detection rows from {}", records.len(), path.display());
    Ok(records)
}

/// Load detection records from any reader.
pub fn read_detections_from_reader<R: io::Read>(
    reader: R,
    options: &LoaderOptions,
) -> Result<Vec<Detection>> {
    collect_detections(options.reader_builder().from_reader(reader), options)
}

/// Write detections as CSV rows that [`read_detections`] can load back.
pub fn write_detections<P: AsRef<Path>>(
    path: P,
    detections: &[Detection],
    options: &LoaderOptions,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_detections_to_writer(file, detections, options)
}

/// Write detections as CSV rows to any writer.
pub fn write_detections_to_writer<W: io::Write>(
    writer: W,
    detections: &[Detection],
    options: &LoaderOptions,
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter)
        .from_writer(writer);

    if options.has_headers {
        writer.write_record(DETECTION_HEADER)?;
    }

    for det in detections {
        writer.serialize((
            &det.frame_id,
            &det.class_name,
            det.bbox.x1,
            det.bbox.y1,
            det.bbox.x2,
            det.bbox.y2,
            det.confidence,
        ))?;
    }

    writer.flush()?;
    Ok(())
}

fn collect_groundtruths<R: io::Read>(
    mut reader: csv::Reader<R>,
    options: &LoaderOptions,
) -> Result<Vec<GroundTruth>> {
    let mut records = Vec::new();

    for (idx, row) in reader.deserialize::<GroundTruthRow>().enumerate() {
        let (frame_id, class_name, x1, y1, x2, y2) = row?;
        let line = options.line_of(idx);
        let bbox = validate_record(line, &class_name, BoundingBox::new(x1, y1, x2, y2))?;
        records.push(GroundTruth {
            frame_id,
            class_name,
            bbox,
        });
    }

    Ok(records)
}

fn collect_detections<R: io::Read>(
    mut reader: csv::Reader<R>,
    options: &LoaderOptions,
) -> Result<Vec<Detection>> {
    let mut records = Vec::new();

    for (idx, row) in reader.deserialize::<DetectionRow>().enumerate() {
        let (frame_id, class_name, x1, y1, x2, y2, confidence) = row?;
        let line = options.line_of(idx);
        let bbox = validate_record(line, &class_name, BoundingBox::new(x1, y1, x2, y2))?;
        if !confidence.is_finite() {
            return Err(AccuracyError::InvalidRecord(format!(
                "Row {} has a non-finite confidence: {}",
                line, confidence
            )));
        }
        records.push(Detection {
            frame_id,
            class_name,
            bbox,
            confidence,
        });
    }

    Ok(records)
}

/// Validate the class name and box of one row.
fn validate_record(line: usize, class_name: &str, bbox: BoundingBox) -> Result<BoundingBox> {
    if class_name.is_empty() {
        return Err(AccuracyError::InvalidRecord(format!(
            "Row {} has an empty class name",
            line
        )));
    }

    if !bbox.is_valid() {
        return Err(AccuracyError::InvalidRecord(format!(
            "Row {} has an invalid box ({}, {}, {}, {}): coordinates must be finite with x1 <= x2 and y1 <= y2",
            line, bbox.x1, bbox.y1, bbox.x2, bbox.y2
        )));
    }

    Ok(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_groundtruths_from_reader() {
        let csv = "0,car,10,20,30,40\n0, person ,1.5,2.5,3.5,4.5\n";
        let records = read_groundtruths_from_reader(csv.as_bytes(), &LoaderOptions::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frame_id, "0");
        assert_eq!(records[0].bbox, BoundingBox::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(records[1].class_name, "person");
    }

    #[test]
    fn test_read_detections_with_header() {
        let csv = "frame,class,x1,y1,x2,y2,conf\nimg_001.jpg,car,0,0,10,10,0.75\n";
        let options = LoaderOptions {
            has_headers: true,
            ..LoaderOptions::default()
        };
        let records = read_detections_from_reader(csv.as_bytes(), &options).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frame_id, "img_001.jpg");
        assert_eq!(records[0].confidence, 0.75);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "3;truck;1;2;3;4\n";
        let options = LoaderOptions {
            delimiter: b';',
            ..LoaderOptions::default()
        };
        let records = read_groundtruths_from_reader(csv.as_bytes(), &options).unwrap();
        assert_eq!(records[0].class_name, "truck");
    }

    #[test]
    fn test_missing_column() {
        let csv = "0,car,10,20,30\n";
        let result = read_groundtruths_from_reader(csv.as_bytes(), &LoaderOptions::default());
        assert!(matches!(result, Err(AccuracyError::Csv(_))));
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let csv = "0,car,10,abc,30,40,0.5\n";
        let result = read_detections_from_reader(csv.as_bytes(), &LoaderOptions::default());
        assert!(matches!(result, Err(AccuracyError::Csv(_))));
    }

    #[test]
    fn test_inverted_box() {
        let csv = "0,car,10,20,30,40\n1,car,30,20,10,40\n";
        let result = read_groundtruths_from_reader(csv.as_bytes(), &LoaderOptions::default());

        match result {
            Err(AccuracyError::InvalidRecord(msg)) => assert!(msg.contains("Row 2")),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_confidence() {
        let csv = "0,car,0,0,10,10,NaN\n";
        let result = read_detections_from_reader(csv.as_bytes(), &LoaderOptions::default());
        assert!(matches!(result, Err(AccuracyError::InvalidRecord(_))));
    }

    #[test]
    fn test_empty_class_name() {
        let csv = "0,,0,0,10,10\n";
        let result = read_groundtruths_from_reader(csv.as_bytes(), &LoaderOptions::default());
        assert!(matches!(result, Err(AccuracyError::InvalidRecord(_))));
    }

    #[test]
    fn test_empty_input() {
        let records = read_detections_from_reader("".as_bytes(), &LoaderOptions::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_write_then_read_detections() {
        let detections = vec![
            Detection::new("0", "car", BoundingBox::new(1.0, 2.0, 3.0, 4.0), 0.9),
            Detection::new("5", "bus", BoundingBox::new(10.0, 20.0, 30.0, 40.0), 0.25),
        ];
        let options = LoaderOptions {
            has_headers: true,
            ..LoaderOptions::default()
        };

        let mut buffer = Vec::new();
        write_detections_to_writer(&mut buffer, &detections, &options).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("frame_id,class_name"));

        let loaded = read_detections_from_reader(buffer.as_slice(), &options).unwrap();
        assert_eq!(loaded, detections);
    }
}
