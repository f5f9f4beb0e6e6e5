// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON encoding of runtime-typed values.
//!
//! Output is compact. Struct fields are written in declared order, map entries
//! in sorted key order. Type tags for interface slots are placed by the
//! discriminator layer.

use crate::config::MAX_NESTING_DEPTH;
use crate::cursor::JsonCursor;
use crate::discriminator::{inject, DiscriminatorConfig, EncodeMode};
use crate::dynamic::{
    scalar_matches, zero_value, DynamicData, DynamicValue, ScalarKind, TypeDescriptor, TypeKind,
};
use crate::error::{Error, Result};
use std::fmt;
use std::io::Write;

/// Encoder settings.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub discriminator: DiscriminatorConfig,
    pub mode: EncodeMode,
}

/// State of one encode call.
pub(crate) struct EncodeState<'o> {
    pub buf: Vec<u8>,
    pub options: &'o EncodeOptions,
    /// Set when the next struct or map must carry a type tag.
    pub need_tag: bool,
}

impl<'o> EncodeState<'o> {
    fn new(options: &'o EncodeOptions) -> Self {
        Self {
            buf: Vec::with_capacity(128),
            options,
            need_tag: false,
        }
    }

    /// Write `s` as a JSON string.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        serde_json::to_writer(&mut self.buf, s)?;
        Ok(())
    }
}

/// Writes values to an output stream, one per line.
pub struct Encoder<W: Write> {
    writer: W,
    options: EncodeOptions,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            options: EncodeOptions::default(),
        }
    }

    /// Enable type discriminators. Empty field names disable them.
    pub fn set_discriminator(
        &mut self,
        type_field_name: impl Into<String>,
        value_field_name: impl Into<String>,
        mode: EncodeMode,
    ) {
        self.options.discriminator.type_field_name = type_field_name.into();
        self.options.discriminator.value_field_name = value_field_name.into();
        self.options.mode = mode;
    }

    pub fn set_options(&mut self, options: EncodeOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encode `data` followed by a newline.
    ///
    /// Nothing is written if encoding fails.
    pub fn encode(&mut self, data: &DynamicData) -> Result<()> {
        let mut buf = to_vec_with(data, &self.options)?;
        buf.push(b'\n');
        self.writer.write_all(&buf)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Encode with explicit options.
pub fn to_vec_with(data: &DynamicData, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut state = EncodeState::new(options);
    inject::mark_root(&mut state, data.descriptor(), data.value());
    encode_value(&mut state, data.descriptor(), data.value(), 0)?;
    Ok(state.buf)
}

/// Encode with default options (no discriminator).
pub fn to_vec(data: &DynamicData) -> Result<Vec<u8>> {
    to_vec_with(data, &EncodeOptions::default())
}

pub fn to_string_with(data: &DynamicData, options: &EncodeOptions) -> Result<String> {
    let buf = to_vec_with(data, options)?;
    String::from_utf8(buf).map_err(|e| Error::UnsupportedValue(e.to_string()))
}

pub fn to_string(data: &DynamicData) -> Result<String> {
    to_string_with(data, &EncodeOptions::default())
}

pub(crate) fn encode_value(
    state: &mut EncodeState<'_>,
    desc: &TypeDescriptor,
    value: &DynamicValue,
    depth: usize,
) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::UnsupportedValue("exceeded max depth".to_string()));
    }

    match (&desc.kind, value) {
        (TypeKind::Interface(_), _) => inject::encode_interface(state, value, depth),
        (TypeKind::Scalar(kind), _) if kind.is_complex() => {
            Err(Error::UnsupportedType(desc.type_name().into_owned()))
        }
        (TypeKind::Chan(_) | TypeKind::Func, _) => {
            Err(Error::UnsupportedType(desc.type_name().into_owned()))
        }
        (TypeKind::Scalar(kind), v) if scalar_matches(*kind, v) => encode_scalar(state, v),
        (TypeKind::Slice(_) | TypeKind::Pointer(_), DynamicValue::Null) => {
            state.buf.extend_from_slice(b"null");
            Ok(())
        }
        (TypeKind::Map(_), DynamicValue::Null) => {
            // A nil map consumes a pending tag.
            state.need_tag = false;
            state.buf.extend_from_slice(b"null");
            Ok(())
        }
        (TypeKind::Pointer(elem), DynamicValue::Pointer(inner)) => {
            encode_value(state, elem, inner, depth + 1)
        }
        (TypeKind::Array(arr), DynamicValue::Array(items)) if items.len() == arr.length => {
            encode_sequence(state, &arr.element_type, items, depth)
        }
        (TypeKind::Slice(slice), DynamicValue::Slice(items)) => {
            encode_sequence(state, &slice.element_type, items, depth)
        }
        (TypeKind::Map(map), DynamicValue::Map(entries)) => {
            match map.key_type.kind {
                TypeKind::Scalar(k) if k == ScalarKind::String || k.is_integer() => {}
                _ => return Err(Error::UnsupportedType(desc.type_name().into_owned())),
            }
            state.buf.push(b'{');
            inject::map_tag(state, desc, entries.len())?;
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    state.buf.push(b',');
                }
                state.write_str(key)?;
                state.buf.push(b':');
                encode_value(state, &map.element_type, item, depth + 1)?;
            }
            state.buf.push(b'}');
            Ok(())
        }
        (TypeKind::Struct(fields), DynamicValue::Struct(values)) => {
            let mut next = inject::struct_open(state, desc)?;
            for field in fields {
                state.buf.push(next);
                next = b',';
                state.write_str(&field.name)?;
                state.buf.push(b':');
                match values.get(&field.name) {
                    Some(item) => encode_value(state, &field.type_desc, item, depth + 1)?,
                    None => {
                        let zero = zero_value(&field.type_desc);
                        encode_value(state, &field.type_desc, &zero, depth + 1)?
                    }
                }
            }
            if next == b'{' {
                state.buf.extend_from_slice(b"{}");
            } else {
                state.buf.push(b'}');
            }
            Ok(())
        }
        (_, v) => Err(Error::ValueMismatch {
            expected: desc.type_name().into_owned(),
            found: v.variant_name().to_string(),
        }),
    }
}

fn encode_sequence(
    state: &mut EncodeState<'_>,
    elem: &TypeDescriptor,
    items: &[DynamicValue],
    depth: usize,
) -> Result<()> {
    state.buf.push(b'[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            state.buf.push(b',');
        }
        encode_value(state, elem, item, depth + 1)?;
    }
    state.buf.push(b']');
    Ok(())
}

fn encode_scalar(state: &mut EncodeState<'_>, value: &DynamicValue) -> Result<()> {
    let buf = &mut state.buf;
    match value {
        DynamicValue::Bool(v) => buf.extend_from_slice(if *v { b"true" } else { b"false" }),
        DynamicValue::U8(v) => write!(buf, "{}", v)?,
        DynamicValue::U16(v) => write!(buf, "{}", v)?,
        DynamicValue::U32(v) => write!(buf, "{}", v)?,
        DynamicValue::U64(v) => write!(buf, "{}", v)?,
        DynamicValue::I8(v) => write!(buf, "{}", v)?,
        DynamicValue::I16(v) => write!(buf, "{}", v)?,
        DynamicValue::I32(v) => write!(buf, "{}", v)?,
        DynamicValue::I64(v) => write!(buf, "{}", v)?,
        DynamicValue::F32(v) => {
            let abs = v.abs();
            write_float(buf, v, v.is_finite(), abs != 0.0 && (abs < 1e-6 || abs >= 1e21))?
        }
        DynamicValue::F64(v) => {
            let abs = v.abs();
            write_float(buf, v, v.is_finite(), abs != 0.0 && (abs < 1e-6 || abs >= 1e21))?
        }
        DynamicValue::String(s) => serde_json::to_writer(&mut *buf, s)?,
        DynamicValue::Number(literal) => write_number(buf, literal)?,
        other => {
            return Err(Error::ValueMismatch {
                expected: "scalar".to_string(),
                found: other.variant_name().to_string(),
            })
        }
    }
    Ok(())
}

/// Shortest round-trip form, exponent form for very small or very large
/// magnitudes with a signed exponent (`1e+21`, `1.5e-7`).
fn write_float<T>(buf: &mut Vec<u8>, v: T, finite: bool, exponent: bool) -> Result<()>
where
    T: fmt::Display + fmt::LowerExp,
{
    if !finite {
        return Err(Error::UnsupportedValue(v.to_string()));
    }
    if !exponent {
        write!(buf, "{}", v)?;
        return Ok(());
    }
    let formatted = format!("{:e}", v);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(buf, "{}e+{}", mantissa, exp)?,
        _ => buf.extend_from_slice(formatted.as_bytes()),
    }
    Ok(())
}

/// Raw number literal. The empty literal is written as `0`.
fn write_number(buf: &mut Vec<u8>, literal: &str) -> Result<()> {
    if literal.is_empty() {
        buf.push(b'0');
        return Ok(());
    }
    let mut cursor = JsonCursor::new(literal.as_bytes());
    let valid = cursor.read_number().is_ok() && cursor.remaining() == 0;
    if !valid {
        return Err(Error::UnsupportedValue(format!(
            "invalid number literal {:?}",
            literal
        )));
    }
    buf.extend_from_slice(literal.as_bytes());
    Ok(())
}
