// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON decoding into runtime-typed values.
//!
//! The decoder walks the input and the target [`TypeDescriptor`] together.
//! Interface slots are where types stop being known statically: with a
//! discriminator configured, an object reaching an interface slot is handed
//! to the discriminator dispatcher, otherwise the empty interface receives
//! generic values (`map[string]interface {}`, `[]interface {}`, `string`,
//! `float64`, `bool`).

use crate::cache::TypeCache;
use crate::config::MAX_NESTING_DEPTH;
use crate::cursor::JsonCursor;
use crate::discriminator::{dispatch, DiscriminatorConfig};
use crate::dynamic::{
    DynamicData, DynamicValue, InterfaceDescriptor, MapDescriptor, ScalarKind, TypeDescriptor,
    TypeKind,
};
use crate::error::{Error, Result};
use crate::registry::TypeResolver;
use crate::typename::empty_interface;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::sync::Arc;

/// Decoder settings.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Fail on object keys that match no struct field.
    pub disallow_unknown_fields: bool,
    /// Decode numbers in interface slots as raw `Number` literals.
    pub use_number: bool,
    pub discriminator: DiscriminatorConfig,
}

/// Streaming decoder over an in-memory document.
///
/// Decodes consecutive whitespace-separated top-level values.
pub struct Decoder<'a> {
    cursor: JsonCursor<'a>,
    options: DecodeOptions,
    cache: Arc<TypeCache>,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, DecodeOptions::default())
    }

    pub fn with_options(input: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            cursor: JsonCursor::new(input),
            options,
            cache: TypeCache::global(),
        }
    }

    /// Use `cache` instead of the process-wide type cache.
    pub fn with_type_cache(mut self, cache: Arc<TypeCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Enable type discriminators. Empty field names disable them.
    pub fn set_discriminator(
        &mut self,
        type_field_name: impl Into<String>,
        value_field_name: impl Into<String>,
        resolver: Option<Arc<dyn TypeResolver>>,
    ) {
        self.options.discriminator =
            DiscriminatorConfig::new(type_field_name, value_field_name, resolver);
    }

    pub fn disallow_unknown_fields(&mut self) {
        self.options.disallow_unknown_fields = true;
    }

    pub fn use_number(&mut self) {
        self.options.use_number = true;
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn type_cache(&self) -> &Arc<TypeCache> {
        &self.cache
    }

    /// Byte offset of the next unread input.
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Check if another value follows.
    pub fn more(&mut self) -> bool {
        !self.cursor.is_eof()
    }

    /// Decode the next value as type `descriptor`.
    pub fn decode(&mut self, descriptor: &Arc<TypeDescriptor>) -> Result<DynamicData> {
        let value = self.decode_value(descriptor, 0)?;
        Ok(DynamicData::from_parts(Arc::clone(descriptor), value))
    }

    /// Scratch decoder over the same input, positioned at `offset`.
    pub(crate) fn fork_at(&self, offset: usize) -> Decoder<'a> {
        Decoder {
            cursor: JsonCursor::at(self.cursor.buffer(), offset),
            options: self.options.clone(),
            cache: Arc::clone(&self.cache),
        }
    }

    pub(crate) fn cursor(&self) -> &JsonCursor<'a> {
        &self.cursor
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut JsonCursor<'a> {
        &mut self.cursor
    }

    pub(crate) fn decode_value(
        &mut self,
        desc: &Arc<TypeDescriptor>,
        depth: usize,
    ) -> Result<DynamicValue> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.cursor.syntax("exceeded max depth".to_string()));
        }

        match &desc.kind {
            TypeKind::Interface(iface) => return self.decode_interface(desc, iface, depth),
            TypeKind::Chan(_) | TypeKind::Func => {
                return Err(Error::UnsupportedScalarKind(desc.kind_name().to_string()))
            }
            TypeKind::Scalar(kind) if kind.is_complex() => {
                return Err(Error::UnsupportedType(desc.type_name().into_owned()))
            }
            _ => {}
        }

        if self.cursor.peek() == Some(b'n') {
            self.cursor.read_literal("null")?;
            return Ok(match &desc.kind {
                TypeKind::Slice(_) | TypeKind::Map(_) | TypeKind::Pointer(_) => DynamicValue::Null,
                _ => crate::dynamic::zero_value(desc),
            });
        }

        match &desc.kind {
            TypeKind::Scalar(kind) => self.decode_scalar(desc, *kind),
            TypeKind::Pointer(elem) => {
                let inner = self.decode_value(elem, depth + 1)?;
                Ok(DynamicValue::Pointer(Box::new(inner)))
            }
            TypeKind::Array(arr) => {
                self.expect_open(desc, b'[')?;
                let mut items = Vec::with_capacity(arr.length.min(self.cursor.remaining()));
                if !self.cursor.consume_if(b']') {
                    loop {
                        if items.len() < arr.length {
                            items.push(self.decode_value(&arr.element_type, depth + 1)?);
                        } else {
                            self.cursor.skip_value(depth + 1)?;
                        }
                        if !self.cursor.consume_if(b',') {
                            self.cursor.expect(b']')?;
                            break;
                        }
                    }
                }
                while items.len() < arr.length {
                    items.push(crate::dynamic::zero_value(&arr.element_type));
                }
                Ok(DynamicValue::Array(items))
            }
            TypeKind::Slice(slice) => {
                self.expect_open(desc, b'[')?;
                let mut items = Vec::new();
                if !self.cursor.consume_if(b']') {
                    loop {
                        items.push(self.decode_value(&slice.element_type, depth + 1)?);
                        if !self.cursor.consume_if(b',') {
                            self.cursor.expect(b']')?;
                            break;
                        }
                    }
                }
                Ok(DynamicValue::Slice(items))
            }
            TypeKind::Map(map) => self.decode_map(desc, map, depth),
            TypeKind::Struct(fields) => {
                self.expect_open(desc, b'{')?;
                let mut values: HashMap<String, DynamicValue> = fields
                    .iter()
                    .map(|f| (f.name.clone(), crate::dynamic::zero_value(&f.type_desc)))
                    .collect();
                if !self.cursor.consume_if(b'}') {
                    loop {
                        let key = self.cursor.read_string()?;
                        self.cursor.expect(b':')?;
                        if self.options.discriminator.is_discriminator_key(&key) {
                            self.cursor.skip_value(depth + 1)?;
                        } else if let Some(field) = desc.match_field(&key) {
                            let value = self.decode_value(&field.type_desc, depth + 1)?;
                            values.insert(field.name.clone(), value);
                        } else if self.options.disallow_unknown_fields {
                            return Err(Error::UnknownField(key));
                        } else {
                            self.cursor.skip_value(depth + 1)?;
                        }
                        if !self.cursor.consume_if(b',') {
                            self.cursor.expect(b'}')?;
                            break;
                        }
                    }
                }
                Ok(DynamicValue::Struct(values))
            }
            // Handled above.
            TypeKind::Interface(_) | TypeKind::Chan(_) | TypeKind::Func => {
                Err(Error::UnsupportedType(desc.type_name().into_owned()))
            }
        }
    }

    fn decode_scalar(&mut self, desc: &TypeDescriptor, kind: ScalarKind) -> Result<DynamicValue> {
        let next = self.cursor.peek();
        let offset = self.cursor.offset();
        match (kind, next) {
            (ScalarKind::Bool, Some(b't')) => {
                self.cursor.read_literal("true")?;
                Ok(DynamicValue::Bool(true))
            }
            (ScalarKind::Bool, Some(b'f')) => {
                self.cursor.read_literal("false")?;
                Ok(DynamicValue::Bool(false))
            }
            (ScalarKind::String, Some(b'"')) => Ok(DynamicValue::String(self.cursor.read_string()?)),
            (_, Some(b'-' | b'0'..=b'9')) if kind.is_integer() || kind.is_float() => {
                let literal = self.cursor.read_number()?;
                parse_number(kind, literal).ok_or_else(|| Error::TypeMismatch {
                    expected: desc.type_name().into_owned(),
                    found: format!("number {}", literal),
                    offset,
                })
            }
            (ScalarKind::Number, Some(b'-' | b'0'..=b'9')) => {
                Ok(DynamicValue::Number(self.cursor.read_number()?.to_string()))
            }
            (_, next) => Err(self.mismatch(desc, next)),
        }
    }

    fn decode_map(
        &mut self,
        desc: &TypeDescriptor,
        map: &MapDescriptor,
        depth: usize,
    ) -> Result<DynamicValue> {
        let key_kind = match map.key_type.kind {
            TypeKind::Scalar(k) if k == ScalarKind::String || k.is_integer() => k,
            _ => return Err(Error::UnsupportedType(desc.type_name().into_owned())),
        };

        self.expect_open(desc, b'{')?;
        let mut entries = BTreeMap::new();
        if !self.cursor.consume_if(b'}') {
            loop {
                let key_offset = self.cursor.offset();
                let key = self.cursor.read_string()?;
                self.cursor.expect(b':')?;
                if self.options.discriminator.is_discriminator_key(&key) {
                    self.cursor.skip_value(depth + 1)?;
                } else {
                    let key = normalize_key(key_kind, &key).ok_or_else(|| Error::TypeMismatch {
                        expected: map.key_type.type_name().into_owned(),
                        found: format!("key {:?}", key),
                        offset: key_offset,
                    })?;
                    let value = self.decode_value(&map.element_type, depth + 1)?;
                    entries.insert(key, value);
                }
                if !self.cursor.consume_if(b',') {
                    self.cursor.expect(b'}')?;
                    break;
                }
            }
        }
        Ok(DynamicValue::Map(entries))
    }

    fn decode_interface(
        &mut self,
        desc: &TypeDescriptor,
        iface: &InterfaceDescriptor,
        depth: usize,
    ) -> Result<DynamicValue> {
        match self.cursor.peek() {
            Some(b'n') => {
                self.cursor.read_literal("null")?;
                Ok(DynamicValue::Null)
            }
            Some(b'{') if self.options.discriminator.is_active() => {
                dispatch::decode_tagged(self, iface, depth)
            }
            _ if iface.is_any() => self.decode_any(depth),
            next => Err(self.mismatch(desc, next)),
        }
    }

    /// Generic value for an empty interface slot.
    fn decode_any(&mut self, depth: usize) -> Result<DynamicValue> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.cursor.syntax("exceeded max depth".to_string()));
        }
        let offset = self.cursor.offset();
        let (desc, value) = match self.cursor.peek() {
            Some(b'{') => {
                self.cursor.consume_if(b'{');
                let mut entries = BTreeMap::new();
                if !self.cursor.consume_if(b'}') {
                    loop {
                        let key = self.cursor.read_string()?;
                        self.cursor.expect(b':')?;
                        entries.insert(key, self.decode_any(depth + 1)?);
                        if !self.cursor.consume_if(b',') {
                            self.cursor.expect(b'}')?;
                            break;
                        }
                    }
                }
                let desc = self
                    .cache
                    .map_of(&ScalarKind::String.descriptor(), &empty_interface());
                (desc, DynamicValue::Map(entries))
            }
            Some(b'[') => {
                self.cursor.consume_if(b'[');
                let mut items = Vec::new();
                if !self.cursor.consume_if(b']') {
                    loop {
                        items.push(self.decode_any(depth + 1)?);
                        if !self.cursor.consume_if(b',') {
                            self.cursor.expect(b']')?;
                            break;
                        }
                    }
                }
                (
                    self.cache.slice_of(&empty_interface()),
                    DynamicValue::Slice(items),
                )
            }
            Some(b'"') => (
                ScalarKind::String.descriptor(),
                DynamicValue::String(self.cursor.read_string()?),
            ),
            Some(b't' | b'f') => {
                let value = self.cursor.peek() == Some(b't');
                self.cursor
                    .read_literal(if value { "true" } else { "false" })?;
                (ScalarKind::Bool.descriptor(), DynamicValue::Bool(value))
            }
            Some(b'n') => {
                self.cursor.read_literal("null")?;
                return Ok(DynamicValue::Null);
            }
            Some(b'-' | b'0'..=b'9') => {
                let literal = self.cursor.read_number()?;
                if self.options.use_number {
                    (
                        ScalarKind::Number.descriptor(),
                        DynamicValue::Number(literal.to_string()),
                    )
                } else {
                    let value = parse_number(ScalarKind::Float64, literal).ok_or_else(|| {
                        Error::TypeMismatch {
                            expected: "float64".to_string(),
                            found: format!("number {}", literal),
                            offset,
                        }
                    })?;
                    (ScalarKind::Float64.descriptor(), value)
                }
            }
            Some(b) => return Err(self.cursor.invalid_value_start(b)),
            None => return Err(self.cursor.unexpected_eof()),
        };
        Ok(DynamicValue::Interface(Box::new(DynamicData::from_parts(
            desc, value,
        ))))
    }

    fn expect_open(&mut self, desc: &TypeDescriptor, open: u8) -> Result<()> {
        match self.cursor.peek() {
            Some(b) if b == open => {
                self.cursor.consume_if(open);
                Ok(())
            }
            next => Err(self.mismatch(desc, next)),
        }
    }

    fn mismatch(&self, desc: &TypeDescriptor, next: Option<u8>) -> Error {
        let found = match next {
            Some(b'{') => "object",
            Some(b'[') => "array",
            Some(b'"') => "string",
            Some(b't' | b'f') => "bool",
            Some(b'n') => "null",
            Some(b'-' | b'0'..=b'9') => "number",
            Some(b) => return self.cursor.invalid_value_start(b),
            None => return self.cursor.unexpected_eof(),
        };
        Error::TypeMismatch {
            expected: desc.type_name().into_owned(),
            found: found.to_string(),
            offset: self.cursor.offset(),
        }
    }
}

/// Parse a number literal into the storage of `kind`. `None` when the literal
/// has the wrong shape or is out of range.
fn parse_number(kind: ScalarKind, literal: &str) -> Option<DynamicValue> {
    Some(match kind {
        ScalarKind::Int | ScalarKind::Int64 => DynamicValue::I64(literal.parse().ok()?),
        ScalarKind::Int8 => DynamicValue::I8(literal.parse().ok()?),
        ScalarKind::Int16 => DynamicValue::I16(literal.parse().ok()?),
        ScalarKind::Int32 => DynamicValue::I32(literal.parse().ok()?),
        ScalarKind::Uint | ScalarKind::Uint64 | ScalarKind::Uintptr => {
            DynamicValue::U64(literal.parse().ok()?)
        }
        ScalarKind::Uint8 => DynamicValue::U8(literal.parse().ok()?),
        ScalarKind::Uint16 => DynamicValue::U16(literal.parse().ok()?),
        ScalarKind::Uint32 => DynamicValue::U32(literal.parse().ok()?),
        ScalarKind::Float32 => {
            let v: f32 = literal.parse().ok()?;
            if !v.is_finite() {
                return None;
            }
            DynamicValue::F32(v)
        }
        ScalarKind::Float64 => {
            let v: f64 = literal.parse().ok()?;
            if !v.is_finite() {
                return None;
            }
            DynamicValue::F64(v)
        }
        _ => return None,
    })
}

/// Validate a map key against its key kind and return its canonical form.
fn normalize_key(kind: ScalarKind, key: &str) -> Option<String> {
    if kind == ScalarKind::String {
        return Some(key.to_string());
    }
    match parse_number(kind, key)? {
        DynamicValue::I8(v) => Some(v.to_string()),
        DynamicValue::I16(v) => Some(v.to_string()),
        DynamicValue::I32(v) => Some(v.to_string()),
        DynamicValue::I64(v) => Some(v.to_string()),
        DynamicValue::U8(v) => Some(v.to_string()),
        DynamicValue::U16(v) => Some(v.to_string()),
        DynamicValue::U32(v) => Some(v.to_string()),
        DynamicValue::U64(v) => Some(v.to_string()),
        _ => None,
    }
}

/// Decode a complete document. Trailing non-whitespace is an error.
pub fn from_slice_with(
    input: &[u8],
    descriptor: &Arc<TypeDescriptor>,
    options: DecodeOptions,
) -> Result<DynamicData> {
    let mut decoder = Decoder::with_options(input, options);
    let data = decoder.decode(descriptor)?;
    if decoder.more() {
        return Err(decoder
            .cursor()
            .syntax("invalid character after top-level value".to_string()));
    }
    Ok(data)
}

/// Decode a complete document with default options.
pub fn from_slice(input: &[u8], descriptor: &Arc<TypeDescriptor>) -> Result<DynamicData> {
    from_slice_with(input, descriptor, DecodeOptions::default())
}

pub fn from_str(input: &str, descriptor: &Arc<TypeDescriptor>) -> Result<DynamicData> {
    from_slice(input.as_bytes(), descriptor)
}

/// Read `reader` to the end and decode it as one document.
pub fn from_reader<R: Read>(
    mut reader: R,
    descriptor: &Arc<TypeDescriptor>,
    options: DecodeOptions,
) -> Result<DynamicData> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    from_slice_with(&buf, descriptor, options)
}
