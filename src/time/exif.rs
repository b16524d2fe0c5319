//! EXIF capture date extraction for images

use crate::error::{EmbeddedDateFailure, Error, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// Format with an explicit UTC offset, e.g. "2024-01-15 14:30:00+0100"
const OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// Standard EXIF format, interpreted in local time: "2024:01:15 14:30:00"
const EXIF_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Read the capture date (`DateTimeOriginal`) embedded in an image
pub fn extract_capture_date(path: &Path) -> Result<DateTime<Local>> {
    let fail = |reason| Error::EmbeddedDate {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| match e {
            exif::Error::NotFound(_) => fail(EmbeddedDateFailure::NoExifProperties),
            _ => fail(EmbeddedDateFailure::NotAnImage),
        })?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or_else(|| fail(EmbeddedDateFailure::NoCaptureDate))?;

    let raw = match &field.value {
        Value::Ascii(values) => values
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };
    if raw.is_empty() {
        return Err(fail(EmbeddedDateFailure::NoCaptureDate));
    }

    let captured = parse_capture_date(&raw)
        .ok_or_else(|| fail(EmbeddedDateFailure::UnparsableCaptureDate(raw.clone())))?;
    trace!(?path, %captured, "Found EXIF capture date");
    Ok(captured)
}

/// Parse a capture date string, trying the offset format before the plain EXIF format
pub fn parse_capture_date(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim().trim_matches('"');

    if let Ok(dt) = DateTime::parse_from_str(s, OFFSET_FORMAT) {
        return Some(dt.with_timezone(&Local));
    }

    NaiveDateTime::parse_from_str(s, EXIF_FORMAT)
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}
