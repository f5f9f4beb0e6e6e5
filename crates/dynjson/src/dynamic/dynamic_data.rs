// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicData container: a value together with its concrete type.

use crate::dynamic::{DynamicValue, ScalarKind, TypeDescriptor, TypeKind};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors for DynamicData operations.
#[derive(Debug, Error)]
pub enum DynamicDataError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    #[error("Invalid operation for type: {0}")]
    InvalidOperation(String),
    #[error("Index out of bounds: {index} >= {length}")]
    IndexOutOfBounds { index: usize, length: usize },
}

impl From<DynamicDataError> for crate::Error {
    fn from(e: DynamicDataError) -> Self {
        match e {
            DynamicDataError::TypeMismatch { expected, got } => crate::Error::ValueMismatch {
                expected,
                found: got,
            },
            other => crate::Error::UnsupportedValue(other.to_string()),
        }
    }
}

/// Dynamic data container with runtime type checking.
#[derive(Debug, Clone)]
pub struct DynamicData {
    /// Type descriptor.
    descriptor: Arc<TypeDescriptor>,
    /// Actual value.
    value: DynamicValue,
}

impl DynamicData {
    /// Create new DynamicData holding the zero value of the type.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            value: zero_value(descriptor),
        }
    }

    /// Create from existing value (with validation).
    pub fn from_value(
        descriptor: &Arc<TypeDescriptor>,
        value: DynamicValue,
    ) -> Result<Self, DynamicDataError> {
        check_value(&value, descriptor)?;
        Ok(Self::from_parts(descriptor.clone(), value))
    }

    /// Create a scalar with the canonical descriptor of `kind`.
    pub fn of(kind: ScalarKind, value: impl Into<DynamicValue>) -> Result<Self, DynamicDataError> {
        Self::from_value(&kind.descriptor(), value.into())
    }

    /// Create without validation. The codec only builds values that conform.
    pub(crate) fn from_parts(descriptor: Arc<TypeDescriptor>, value: DynamicValue) -> Self {
        Self { descriptor, value }
    }

    /// Get the type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Get the rendered type name.
    pub fn type_name(&self) -> Cow<'_, str> {
        self.descriptor.type_name()
    }

    /// Get the underlying value.
    pub fn value(&self) -> &DynamicValue {
        &self.value
    }

    /// Get mutable reference to value.
    pub fn value_mut(&mut self) -> &mut DynamicValue {
        &mut self.value
    }

    /// Into inner value.
    pub fn into_value(self) -> DynamicValue {
        self.value
    }

    /// Into descriptor and value.
    pub fn into_parts(self) -> (Arc<TypeDescriptor>, DynamicValue) {
        (self.descriptor, self.value)
    }

    /// Get a field value by name.
    pub fn get<T: FromDynamicValue>(&self, name: &str) -> Result<T, DynamicDataError> {
        let field_value = self.get_field(name)?;
        T::from_dynamic(field_value)
    }

    /// Set a field value by name.
    pub fn set<T: IntoDynamicValue>(
        &mut self,
        name: &str,
        value: T,
    ) -> Result<(), DynamicDataError> {
        let field = self
            .descriptor
            .field(name)
            .ok_or_else(|| DynamicDataError::FieldNotFound(name.to_string()))?;

        let dyn_value = value.into_dynamic();
        check_value(&dyn_value, &field.type_desc)?;

        match &mut self.value {
            DynamicValue::Struct(fields) => {
                fields.insert(name.to_string(), dyn_value);
                Ok(())
            }
            _ => Err(DynamicDataError::InvalidOperation(
                "set requires struct type".into(),
            )),
        }
    }

    /// Get field by name.
    pub fn get_field(&self, name: &str) -> Result<&DynamicValue, DynamicDataError> {
        if self.descriptor.field(name).is_none() {
            return Err(DynamicDataError::FieldNotFound(name.to_string()));
        }

        match &self.value {
            DynamicValue::Struct(fields) => fields
                .get(name)
                .ok_or_else(|| DynamicDataError::FieldNotFound(name.to_string())),
            _ => Err(DynamicDataError::InvalidOperation(
                "get_field requires struct type".into(),
            )),
        }
    }

    /// Get mutable field by name.
    pub fn get_field_mut(&mut self, name: &str) -> Result<&mut DynamicValue, DynamicDataError> {
        if self.descriptor.field(name).is_none() {
            return Err(DynamicDataError::FieldNotFound(name.to_string()));
        }

        match &mut self.value {
            DynamicValue::Struct(fields) => fields
                .get_mut(name)
                .ok_or_else(|| DynamicDataError::FieldNotFound(name.to_string())),
            _ => Err(DynamicDataError::InvalidOperation(
                "get_field_mut requires struct type".into(),
            )),
        }
    }

    /// Get slice/array element by index.
    pub fn get_element(&self, index: usize) -> Result<&DynamicValue, DynamicDataError> {
        match &self.value {
            DynamicValue::Slice(seq) | DynamicValue::Array(seq) => {
                seq.get(index).ok_or(DynamicDataError::IndexOutOfBounds {
                    index,
                    length: seq.len(),
                })
            }
            _ => Err(DynamicDataError::InvalidOperation(
                "get_element requires slice/array type".into(),
            )),
        }
    }

    /// Append an element to a slice. A nil slice becomes non-nil.
    pub fn push_element(&mut self, value: DynamicValue) -> Result<(), DynamicDataError> {
        let TypeKind::Slice(slice) = &self.descriptor.kind else {
            return Err(DynamicDataError::InvalidOperation(
                "push_element requires slice type".into(),
            ));
        };
        check_value(&value, &slice.element_type)?;

        match &mut self.value {
            DynamicValue::Slice(seq) => seq.push(value),
            other => *other = DynamicValue::Slice(vec![value]),
        }
        Ok(())
    }

    /// Get slice/array length (nil counts as empty).
    pub fn len(&self) -> Result<usize, DynamicDataError> {
        match &self.value {
            DynamicValue::Slice(seq) | DynamicValue::Array(seq) => Ok(seq.len()),
            DynamicValue::Null if matches!(self.descriptor.kind, TypeKind::Slice(_)) => Ok(0),
            _ => Err(DynamicDataError::InvalidOperation(
                "len requires slice/array type".into(),
            )),
        }
    }

    /// Check if slice/array is empty.
    pub fn is_empty(&self) -> Result<bool, DynamicDataError> {
        self.len().map(|l| l == 0)
    }

    /// Iterate over elements (for slices/arrays).
    pub fn elements(&self) -> impl Iterator<Item = &DynamicValue> {
        self.value.as_sequence().unwrap_or(&[]).iter()
    }
}

impl PartialEq for DynamicData {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.descriptor, &other.descriptor) || self.descriptor == other.descriptor)
            && self.value == other.value
    }
}

/// Zero value of a type: zero scalars, zero-filled structs and arrays, nil
/// for everything else.
pub fn zero_value(descriptor: &TypeDescriptor) -> DynamicValue {
    match &descriptor.kind {
        TypeKind::Scalar(kind) => zero_scalar(*kind),
        TypeKind::Struct(fields) => {
            let mut map = HashMap::with_capacity(fields.len());
            for field in fields {
                map.insert(field.name.clone(), zero_value(&field.type_desc));
            }
            DynamicValue::Struct(map)
        }
        TypeKind::Array(arr) => {
            let elem_zero = zero_value(&arr.element_type);
            DynamicValue::Array(vec![elem_zero; arr.length])
        }
        TypeKind::Slice(_)
        | TypeKind::Map(_)
        | TypeKind::Pointer(_)
        | TypeKind::Interface(_)
        | TypeKind::Chan(_)
        | TypeKind::Func => DynamicValue::Null,
    }
}

fn zero_scalar(kind: ScalarKind) -> DynamicValue {
    match kind {
        ScalarKind::Bool => DynamicValue::Bool(false),
        ScalarKind::Int | ScalarKind::Int64 => DynamicValue::I64(0),
        ScalarKind::Int8 => DynamicValue::I8(0),
        ScalarKind::Int16 => DynamicValue::I16(0),
        ScalarKind::Int32 => DynamicValue::I32(0),
        ScalarKind::Uint | ScalarKind::Uint64 | ScalarKind::Uintptr => DynamicValue::U64(0),
        ScalarKind::Uint8 => DynamicValue::U8(0),
        ScalarKind::Uint16 => DynamicValue::U16(0),
        ScalarKind::Uint32 => DynamicValue::U32(0),
        ScalarKind::Float32 => DynamicValue::F32(0.0),
        ScalarKind::Float64 => DynamicValue::F64(0.0),
        ScalarKind::String => DynamicValue::String(String::new()),
        ScalarKind::Number => DynamicValue::Number("0".to_string()),
        ScalarKind::Complex64 | ScalarKind::Complex128 => DynamicValue::Null,
    }
}

/// Check if a scalar value variant is the storage for `kind`.
pub(crate) fn scalar_matches(kind: ScalarKind, value: &DynamicValue) -> bool {
    matches!(
        (kind, value),
        (ScalarKind::Bool, DynamicValue::Bool(_))
            | (ScalarKind::Int | ScalarKind::Int64, DynamicValue::I64(_))
            | (ScalarKind::Int8, DynamicValue::I8(_))
            | (ScalarKind::Int16, DynamicValue::I16(_))
            | (ScalarKind::Int32, DynamicValue::I32(_))
            | (
                ScalarKind::Uint | ScalarKind::Uint64 | ScalarKind::Uintptr,
                DynamicValue::U64(_)
            )
            | (ScalarKind::Uint8, DynamicValue::U8(_))
            | (ScalarKind::Uint16, DynamicValue::U16(_))
            | (ScalarKind::Uint32, DynamicValue::U32(_))
            | (ScalarKind::Float32, DynamicValue::F32(_))
            | (ScalarKind::Float64, DynamicValue::F64(_))
            | (ScalarKind::String, DynamicValue::String(_))
            | (ScalarKind::Number, DynamicValue::Number(_))
    )
}

/// Verify that `value` is a valid value of type `descriptor`.
pub fn check_value(value: &DynamicValue, descriptor: &TypeDescriptor) -> Result<(), DynamicDataError> {
    let ok = match (&descriptor.kind, value) {
        (
            TypeKind::Slice(_)
            | TypeKind::Map(_)
            | TypeKind::Pointer(_)
            | TypeKind::Interface(_)
            | TypeKind::Chan(_)
            | TypeKind::Func,
            DynamicValue::Null,
        ) => true,
        (TypeKind::Scalar(kind), v) => scalar_matches(*kind, v),
        (TypeKind::Array(arr), DynamicValue::Array(items)) => {
            if items.len() != arr.length {
                return Err(DynamicDataError::TypeMismatch {
                    expected: descriptor.type_name().into_owned(),
                    got: format!("array of length {}", items.len()),
                });
            }
            for item in items {
                check_value(item, &arr.element_type)?;
            }
            true
        }
        (TypeKind::Slice(slice), DynamicValue::Slice(items)) => {
            for item in items {
                check_value(item, &slice.element_type)?;
            }
            true
        }
        (TypeKind::Map(map), DynamicValue::Map(entries)) => {
            for item in entries.values() {
                check_value(item, &map.element_type)?;
            }
            true
        }
        (TypeKind::Pointer(elem), DynamicValue::Pointer(inner)) => {
            check_value(inner, elem)?;
            true
        }
        (TypeKind::Struct(fields), DynamicValue::Struct(map)) => {
            for (name, item) in map {
                let field = fields
                    .iter()
                    .find(|f| f.name == *name)
                    .ok_or_else(|| DynamicDataError::FieldNotFound(name.clone()))?;
                check_value(item, &field.type_desc)?;
            }
            true
        }
        (TypeKind::Interface(iface), DynamicValue::Interface(data)) => {
            iface.accepts(data.descriptor())
        }
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(DynamicDataError::TypeMismatch {
            expected: descriptor.type_name().into_owned(),
            got: value.variant_name().to_string(),
        })
    }
}

/// Trait for converting from DynamicValue.
pub trait FromDynamicValue: Sized {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError>;
}

/// Trait for converting to DynamicValue.
pub trait IntoDynamicValue {
    fn into_dynamic(self) -> DynamicValue;
}

// Implement FromDynamicValue for scalars
macro_rules! impl_from_dynamic {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromDynamicValue for $ty {
            fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError> {
                match value {
                    DynamicValue::$variant(v) => Ok(*v),
                    other => Err(DynamicDataError::TypeMismatch {
                        expected: $name.to_string(),
                        got: other.variant_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_dynamic!(bool, Bool, "bool");
impl_from_dynamic!(u8, U8, "u8");
impl_from_dynamic!(u16, U16, "u16");
impl_from_dynamic!(u32, U32, "u32");
impl_from_dynamic!(u64, U64, "u64");
impl_from_dynamic!(i8, I8, "i8");
impl_from_dynamic!(i16, I16, "i16");
impl_from_dynamic!(i32, I32, "i32");
impl_from_dynamic!(i64, I64, "i64");
impl_from_dynamic!(f32, F32, "f32");
impl_from_dynamic!(f64, F64, "f64");

impl FromDynamicValue for String {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError> {
        match value {
            DynamicValue::String(s) | DynamicValue::Number(s) => Ok(s.clone()),
            other => Err(DynamicDataError::TypeMismatch {
                expected: "string".to_string(),
                got: other.variant_name().to_string(),
            }),
        }
    }
}

impl<T: Into<DynamicValue>> IntoDynamicValue for T {
    fn into_dynamic(self) -> DynamicValue {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::TypeDescriptorBuilder;

    #[test]
    fn test_dynamic_data_struct() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("TestStruct")
                .field("X", ScalarKind::Int32)
                .field("Y", ScalarKind::Float64)
                .string_field("Name")
                .build(),
        );

        let mut data = DynamicData::new(&desc);

        data.set("X", 42i32).expect("set X");
        data.set("Y", std::f64::consts::PI).expect("set Y");
        data.set("Name", "test").expect("set Name");

        assert_eq!(data.get::<i32>("X").expect("get X"), 42);
        assert_eq!(data.get::<f64>("Y").expect("get Y"), std::f64::consts::PI);
        assert_eq!(data.get::<String>("Name").expect("get Name"), "test");

        assert!(data.get::<i32>("Z").is_err());
        assert!(matches!(
            data.set("X", "not a number"),
            Err(DynamicDataError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_values() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("Zero")
                .field("Flag", ScalarKind::Bool)
                .array_field("Triple", ScalarKind::Uint8, 3)
                .slice_field("Items", ScalarKind::String)
                .interface_field("Any")
                .build(),
        );
        let data = DynamicData::new(&desc);

        assert!(!data.get::<bool>("Flag").expect("Flag"));
        assert_eq!(
            data.get_field("Triple").expect("Triple"),
            &DynamicValue::Array(vec![DynamicValue::U8(0); 3])
        );
        assert!(data.get_field("Items").expect("Items").is_null());
        assert!(data.get_field("Any").expect("Any").is_null());
    }

    #[test]
    fn test_from_value_validation() {
        let int = ScalarKind::Int.descriptor();
        assert!(DynamicData::from_value(&int, DynamicValue::I64(3)).is_ok());
        assert!(DynamicData::from_value(&int, DynamicValue::I32(3)).is_err());

        let triple = Arc::new(TypeDescriptor::array_of(3, int.clone()));
        let short = DynamicValue::Array(vec![DynamicValue::I64(1)]);
        assert!(DynamicData::from_value(&triple, short).is_err());

        let ptr = Arc::new(TypeDescriptor::pointer_to(int));
        assert!(DynamicData::from_value(&ptr, DynamicValue::Null).is_ok());
        assert!(DynamicData::from_value(
            &ptr,
            DynamicValue::Pointer(Box::new(DynamicValue::I64(9)))
        )
        .is_ok());
    }

    #[test]
    fn test_push_element_on_nil_slice() {
        let desc = Arc::new(TypeDescriptor::slice_of(ScalarKind::String.descriptor()));
        let mut data = DynamicData::new(&desc);
        assert_eq!(data.len().expect("len"), 0);

        data.push_element("a".into()).expect("push");
        data.push_element("b".into()).expect("push");
        assert_eq!(data.len().expect("len"), 2);
        assert_eq!(data.get_element(1).expect("elem").as_str(), Some("b"));
        assert!(data.push_element(DynamicValue::Bool(true)).is_err());
        assert_eq!(data.elements().count(), 2);
    }
}
