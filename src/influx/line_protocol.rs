//! InfluxDB line protocol encoding.
//!
//! `measurement,tag=value field=1.5 1746655200` with second precision.

use crate::domain::PriceRecord;
use crate::frame::{AREA_COLUMN, PriceFrame, VALUE_COLUMN};

/// Escape a measurement name (commas and spaces).
pub fn escape_measurement(raw: &str) -> String {
    escape(raw, &[',', ' '])
}

/// Escape a tag key, tag value, or field key (commas, equals signs, spaces).
pub fn escape_key(raw: &str) -> String {
    escape(raw, &[',', '=', ' '])
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Encode one record, or `None` if it has no writable field.
pub fn encode_record(record: &PriceRecord, measurement: &str) -> Option<String> {
    let value = record.value.filter(|v| v.is_finite())?;

    let mut line = escape_measurement(measurement);
    if !record.area.is_empty() {
        line.push(',');
        line.push_str(AREA_COLUMN);
        line.push('=');
        line.push_str(&escape_key(&record.area));
    }
    line.push(' ');
    line.push_str(VALUE_COLUMN);
    line.push('=');
    line.push_str(&value.to_string());
    line.push(' ');
    line.push_str(&record.time.timestamp().to_string());
    Some(line)
}

pub fn encode_frame(frame: &PriceFrame, measurement: &str) -> Vec<String> {
    frame
        .records
        .iter()
        .filter_map(|r| encode_record(r, measurement))
        .collect()
}
