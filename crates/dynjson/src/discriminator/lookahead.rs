// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lookahead scan of a tagged object.
//!
//! Runs on a fork of the decoder's cursor, which is dropped when the scan
//! returns. The caller's cursor still points at the opening brace afterwards.

use super::DiscriminatorConfig;
use crate::cursor::JsonCursor;
use crate::error::{Error, Result};

/// Type tag and value position found in a tagged object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Discriminant {
    pub type_name: String,
    /// Absolute offset where the value field's content begins.
    pub value_offset: Option<usize>,
}

/// Scan the object starting at `cursor`, nested at `depth`, for the
/// discriminator fields.
pub(crate) fn scan(
    mut cursor: JsonCursor<'_>,
    config: &DiscriminatorConfig,
    depth: usize,
) -> Result<Discriminant> {
    let origin = cursor.offset();
    if !cursor.consume_if(b'{') {
        return Err(malformed(&cursor, "expected '{'"));
    }

    let mut type_name = String::new();
    let mut value_offset = None;

    if !cursor.consume_if(b'}') {
        loop {
            if cursor.peek() != Some(b'"') {
                return Err(malformed(&cursor, "expected object key"));
            }
            let key = cursor.read_string()?;
            if !cursor.consume_if(b':') {
                return Err(malformed(&cursor, "expected ':' after object key"));
            }

            cursor.skip_whitespace();
            let value_start = cursor.offset();
            if key == config.type_field_name {
                if cursor.peek() != Some(b'"') {
                    return Err(Error::InvalidDiscriminatorTypeFieldValue(value_start));
                }
                type_name = cursor.read_string()?;
            } else {
                if key == config.value_field_name {
                    value_offset = Some(value_start);
                }
                cursor.skip_value(depth + 1)?;
            }

            if cursor.consume_if(b',') {
                continue;
            }
            if cursor.consume_if(b'}') {
                break;
            }
            return Err(malformed(&cursor, "expected ',' or '}' after object value"));
        }
    }

    log::trace!(
        "[discriminator] lookahead at {}: type={:?} value_offset={:?}",
        origin,
        type_name,
        value_offset
    );

    if type_name.is_empty() {
        return Err(Error::MissingDiscriminator);
    }
    Ok(Discriminant {
        type_name,
        value_offset,
    })
}

fn malformed(cursor: &JsonCursor<'_>, reason: &'static str) -> Error {
    Error::MalformedDiscriminatorObject {
        offset: cursor.offset(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DiscriminatorConfig {
        DiscriminatorConfig::new("_t", "_v", None)
    }

    fn scan_str(input: &str) -> Result<Discriminant> {
        scan(JsonCursor::new(input.as_bytes()), &config(), 0)
    }

    #[test]
    fn test_scan_wrapper() {
        let found = scan_str(r#"{"_t":"[3]int","_v":[220,20,60]}"#).expect("scan");
        assert_eq!(found.type_name, "[3]int");
        assert_eq!(found.value_offset, Some(20));
    }

    #[test]
    fn test_scan_value_before_type() {
        let found = scan_str(r#"{ "_v" : "Red", "_t" : "string" }"#).expect("scan");
        assert_eq!(found.type_name, "string");
        assert_eq!(found.value_offset, Some(9));
    }

    #[test]
    fn test_scan_colocated_struct() {
        let found =
            scan_str(r#"{"Cyan":0,"_t":"CMYK","Magenta":{"deep":[1,2]},"Key":12}"#).expect("scan");
        assert_eq!(found.type_name, "CMYK");
        assert_eq!(found.value_offset, None);
    }

    #[test]
    fn test_scan_uses_absolute_offsets() {
        let input = br#"[1, {"_t": 5}]"#;
        let err = scan(JsonCursor::at(input, 4), &config(), 0).expect_err("not string");
        assert!(matches!(err, Error::InvalidDiscriminatorTypeFieldValue(11)));
        assert_eq!(err.to_string(), "discriminator type at offset 11 is not string");
    }

    #[test]
    fn test_scan_missing() {
        assert!(matches!(scan_str("{}"), Err(Error::MissingDiscriminator)));
        assert!(matches!(
            scan_str(r#"{"_v":1}"#),
            Err(Error::MissingDiscriminator)
        ));
        assert!(matches!(
            scan_str(r#"{"_t":""}"#),
            Err(Error::MissingDiscriminator)
        ));
    }

    #[test]
    fn test_scan_malformed() {
        for input in [r#"{"_t" "int"}"#, r#"{"_t":"int" "_v":1}"#, r#"{1:2}"#, "[]"] {
            assert!(
                matches!(scan_str(input), Err(Error::MalformedDiscriminatorObject { .. })),
                "{} should be malformed",
                input
            );
        }
        assert!(matches!(
            scan_str(r#"{"_t":"int","_v":tru}"#),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn test_scan_leaves_primary_cursor() {
        let input = br#"{"_t":"int","_v":1}"#;
        let primary = JsonCursor::new(input);
        scan(primary.fork(), &config(), 0).expect("scan");
        assert_eq!(primary.offset(), 0);
    }
}
