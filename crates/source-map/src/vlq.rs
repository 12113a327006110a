//! Base64 VLQ decoding of the `mappings` stream.

use crate::error::MappingsError;
use crate::map::{Mapping, OriginalLocation};

/// Maximum number of fields a segment may carry.
const MAX_FIELDS: usize = 5;

/// Decodes a version 3 `mappings` string into mappings, in stream order.
///
/// Generated and original lines are converted to 1-based numbers. Columns
/// stay 0-based. `source_count` is the length of the `sources` array; segments
/// pointing past it are rejected.
pub fn decode_mappings(mappings: &str, source_count: usize) -> Result<Vec<Mapping>, MappingsError> {
    let mut decoded = Vec::new();

    // Everything except the generated column carries over between lines.
    let mut source = 0i64;
    let mut original_line = 0i64;
    let mut original_column = 0i64;
    let mut name = 0i64;

    for (index, line_text) in mappings.split(';').enumerate() {
        let line = index as u32 + 1;
        let mut generated_column = 0i64;

        for segment in line_text.split(',') {
            if segment.is_empty() {
                continue;
            }

            let (fields, count) = decode_segment(segment, line)?;
            if !matches!(count, 1 | 4 | 5) {
                return Err(MappingsError::InvalidSegment {
                    fields: count,
                    line,
                });
            }

            generated_column += fields[0];
            let generated_column = non_negative(generated_column, "generated column", line)?;

            let original = if count >= 4 {
                source += fields[1];
                original_line += fields[2];
                original_column += fields[3];

                let source_index = non_negative(source, "source index", line)?;
                if source_index as usize >= source_count {
                    return Err(MappingsError::SourceOutOfRange {
                        index: source_index,
                        line,
                    });
                }

                let name_index = if count == 5 {
                    name += fields[4];
                    Some(non_negative(name, "name index", line)?)
                } else {
                    None
                };

                Some(OriginalLocation {
                    source: source_index,
                    line: non_negative(original_line, "original line", line)? + 1,
                    column: non_negative(original_column, "original column", line)?,
                    name: name_index,
                })
            } else {
                None
            };

            decoded.push(Mapping {
                generated_line: line,
                generated_column,
                original,
            });
        }
    }

    Ok(decoded)
}

/// Decodes one comma-separated segment into relative field values.
///
/// Returns the first [`MAX_FIELDS`] values and the total field count.
fn decode_segment(segment: &str, line: u32) -> Result<([i64; MAX_FIELDS], usize), MappingsError> {
    let mut fields = [0i64; MAX_FIELDS];
    let mut count = 0;
    let mut chars = segment.chars();

    loop {
        let mut value = 0i64;
        let mut shift = 0u32;
        let mut started = false;

        loop {
            let Some(ch) = chars.next() else {
                if started {
                    return Err(MappingsError::Truncated { line });
                }
                return Ok((fields, count));
            };
            started = true;

            let digit = base64_digit(ch).ok_or(MappingsError::InvalidDigit { digit: ch, line })?;
            if shift > 30 {
                return Err(MappingsError::Overflow { line });
            }
            value |= i64::from(digit & 0b1_1111) << shift;

            if digit & 0b10_0000 == 0 {
                break;
            }
            shift += 5;
        }

        let negative = value & 1 == 1;
        let magnitude = value >> 1;
        if magnitude > i64::from(i32::MAX) {
            return Err(MappingsError::Overflow { line });
        }

        if count < MAX_FIELDS {
            fields[count] = if negative { -magnitude } else { magnitude };
        }
        count += 1;
    }
}

fn base64_digit(ch: char) -> Option<u8> {
    let digit = match ch {
        'A'..='Z' => ch as u8 - b'A',
        'a'..='z' => ch as u8 - b'a' + 26,
        '0'..='9' => ch as u8 - b'0' + 52,
        '+' => 62,
        '/' => 63,
        _ => return None,
    };
    Some(digit)
}

fn non_negative(value: i64, field: &'static str, line: u32) -> Result<u32, MappingsError> {
    u32::try_from(value).map_err(|_| MappingsError::Negative { field, line })
}
