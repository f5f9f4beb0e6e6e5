// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

use crate::dynamic::DynamicData;
use std::collections::{BTreeMap, HashMap};

/// A dynamic value, interpreted against a [`TypeDescriptor`](crate::TypeDescriptor).
///
/// Native-width `int` is stored as `I64`, `uint`/`uintptr` as `U64`.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    // Scalars
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    /// Raw number literal.
    Number(String),

    // Composites
    Struct(HashMap<String, DynamicValue>),
    Array(Vec<DynamicValue>),
    Slice(Vec<DynamicValue>),
    Map(BTreeMap<String, DynamicValue>),
    Pointer(Box<DynamicValue>),
    /// Concrete value stored behind an interface slot.
    Interface(Box<DynamicData>),

    /// Nil pointer, slice, map or interface.
    Null,
}

impl DynamicValue {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Variant name used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
            Self::Slice(_) => "slice",
            Self::Map(_) => "map",
            Self::Pointer(_) => "pointer",
            Self::Interface(_) => "interface",
            Self::Null => "null",
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64 (any signed width).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64 (any unsigned width).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U8(v) => Some(u64::from(*v)),
            Self::U16(v) => Some(u64::from(*v)),
            Self::U32(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as slice or array elements.
    pub fn as_sequence(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Slice(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get map entries.
    pub fn as_map(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get the value stored behind an interface slot.
    pub fn as_interface(&self) -> Option<&DynamicData> {
        match self {
            Self::Interface(data) => Some(data),
            _ => None,
        }
    }

    /// Follow pointer indirections.
    pub fn pointee(&self) -> &DynamicValue {
        let mut value = self;
        while let Self::Pointer(inner) = value {
            value = inner;
        }
        value
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&DynamicValue> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Try to get mutable struct field.
    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut DynamicValue> {
        match self {
            Self::Struct(fields) => fields.get_mut(name),
            _ => None,
        }
    }

    /// Set struct field.
    pub fn set_field(&mut self, name: impl Into<String>, value: DynamicValue) -> bool {
        match self {
            Self::Struct(fields) => {
                fields.insert(name.into(), value);
                true
            }
            _ => false,
        }
    }
}

// Conversion traits
impl From<bool> for DynamicValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for DynamicValue {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for DynamicValue {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for DynamicValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for DynamicValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<i8> for DynamicValue {
    fn from(v: i8) -> Self {
        Self::I8(v)
    }
}

impl From<i16> for DynamicValue {
    fn from(v: i16) -> Self {
        Self::I16(v)
    }
}

impl From<i32> for DynamicValue {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for DynamicValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f32> for DynamicValue {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for DynamicValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for DynamicValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DynamicData> for DynamicValue {
    fn from(v: DynamicData) -> Self {
        Self::Interface(Box::new(v))
    }
}

impl<T: Into<DynamicValue>> From<Vec<T>> for DynamicValue {
    fn from(v: Vec<T>) -> Self {
        Self::Slice(v.into_iter().map(Into::into).collect())
    }
}
