// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Scalar type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    /// Raw JSON number literal (number mode).
    Number,
}

impl ScalarKind {
    /// Every scalar kind, in table order.
    pub const ALL: [ScalarKind; 18] = [
        Self::Bool,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uintptr,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
        Self::String,
        Self::Number,
    ];

    /// Canonical type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::Number => "Number",
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::Uint | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64 | Self::Uintptr
        )
    }

    pub const fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    /// Width in bits (native-width integers are 64-bit).
    pub const fn bits(self) -> Option<u32> {
        match self {
            Self::Int8 | Self::Uint8 => Some(8),
            Self::Int16 | Self::Uint16 => Some(16),
            Self::Int32 | Self::Uint32 | Self::Float32 => Some(32),
            Self::Int | Self::Int64 | Self::Uint | Self::Uint64 | Self::Uintptr | Self::Float64 => {
                Some(64)
            }
            Self::Complex64 => Some(64),
            Self::Complex128 => Some(128),
            Self::Bool | Self::String | Self::Number => None,
        }
    }

    /// Shared descriptor for this kind.
    ///
    /// Always returns the same instance, so derived types built from it are
    /// cached under a stable identity.
    pub fn descriptor(self) -> Arc<TypeDescriptor> {
        crate::typename::scalar_descriptor(self)
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Scalar type.
    Scalar(ScalarKind),
    /// Array (fixed length).
    Array(ArrayDescriptor),
    /// Slice (dynamic length).
    Slice(SliceDescriptor),
    /// Map with string or integer keys.
    Map(MapDescriptor),
    /// Pointer to another type.
    Pointer(Arc<TypeDescriptor>),
    /// Struct with named fields, in declared order.
    Struct(Vec<FieldDescriptor>),
    /// Open slot holding a value of any accepted concrete type.
    Interface(InterfaceDescriptor),
    /// Channel. Never encodable.
    Chan(Arc<TypeDescriptor>),
    /// Function. Never encodable.
    Func,
}

impl TypeKind {
    /// Kind name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(s) => s.name(),
            Self::Array(_) => "array",
            Self::Slice(_) => "slice",
            Self::Map(_) => "map",
            Self::Pointer(_) => "ptr",
            Self::Struct(_) => "struct",
            Self::Interface(_) => "interface",
            Self::Chan(_) => "chan",
            Self::Func => "func",
        }
    }
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Declared name (empty for anonymous types).
    pub name: String,
    /// Namespace used when rendering qualified names.
    pub path: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new named type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
            kind,
        }
    }

    /// Create an anonymous type descriptor.
    pub fn anonymous(kind: TypeKind) -> Self {
        Self::new("", kind)
    }

    /// Set the namespace.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Create a named scalar type (e.g. `type Celsius float64`).
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, TypeKind::Scalar(kind))
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(fields))
    }

    /// Anonymous `[length]element`.
    pub fn array_of(length: usize, element: Arc<TypeDescriptor>) -> Self {
        Self::anonymous(TypeKind::Array(ArrayDescriptor::new(element, length)))
    }

    /// Anonymous `[]element`.
    pub fn slice_of(element: Arc<TypeDescriptor>) -> Self {
        Self::anonymous(TypeKind::Slice(SliceDescriptor::new(element)))
    }

    /// Anonymous `map[key]element`.
    pub fn map_of(key: Arc<TypeDescriptor>, element: Arc<TypeDescriptor>) -> Self {
        Self::anonymous(TypeKind::Map(MapDescriptor::new(key, element)))
    }

    /// Anonymous `*element`.
    ///
    /// Prefer [`TypeCache::pointer_to`](crate::TypeCache::pointer_to) when the
    /// descriptor identity matters.
    pub fn pointer_to(element: Arc<TypeDescriptor>) -> Self {
        Self::anonymous(TypeKind::Pointer(element))
    }

    /// Named interface type.
    pub fn interface(name: impl Into<String>, iface: InterfaceDescriptor) -> Self {
        Self::new(name, TypeKind::Interface(iface))
    }

    /// Anonymous `chan element`.
    pub fn chan_of(element: Arc<TypeDescriptor>) -> Self {
        Self::anonymous(TypeKind::Chan(element))
    }

    /// Anonymous `func()`.
    pub fn func() -> Self {
        Self::anonymous(TypeKind::Func)
    }

    /// Check if the type has a declared name.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Check if this is an interface type.
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }

    /// Match an object key to a field: exact name first, then ASCII
    /// case-insensitive.
    pub fn match_field(&self, key: &str) -> Option<&FieldDescriptor> {
        let fields = self.fields()?;
        fields
            .iter()
            .find(|f| f.name == key)
            .or_else(|| fields.iter().find(|f| f.name.eq_ignore_ascii_case(key)))
    }

    /// Kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Declared name, or the structural form for anonymous types.
    pub fn type_name(&self) -> Cow<'_, str> {
        if self.is_named() {
            Cow::Borrowed(&self.name)
        } else {
            Cow::Owned(self.display_name(false).to_string())
        }
    }

    /// Like [`type_name`](Self::type_name), with named types qualified by
    /// their path.
    pub fn qualified_name(&self) -> String {
        self.display_name(true).to_string()
    }

    /// Renderer for the type name.
    pub fn display_name(&self, with_path: bool) -> impl fmt::Display + '_ {
        TypeName {
            desc: self,
            with_path,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_name(false), f)
    }
}

struct TypeName<'a> {
    desc: &'a TypeDescriptor,
    with_path: bool,
}

impl TypeName<'_> {
    fn of<'b>(&self, desc: &'b TypeDescriptor) -> TypeName<'b> {
        TypeName {
            desc,
            with_path: self.with_path,
        }
    }
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = self.desc;
        if desc.is_named() {
            if self.with_path && !desc.path.is_empty() {
                write!(f, "{}.", desc.path)?;
            }
            return f.write_str(&desc.name);
        }
        match &desc.kind {
            TypeKind::Scalar(s) => f.write_str(s.name()),
            TypeKind::Array(arr) => write!(f, "[{}]{}", arr.length, self.of(&arr.element_type)),
            TypeKind::Slice(slice) => write!(f, "[]{}", self.of(&slice.element_type)),
            TypeKind::Map(map) => write!(
                f,
                "map[{}]{}",
                self.of(&map.key_type),
                self.of(&map.element_type)
            ),
            TypeKind::Pointer(elem) => write!(f, "*{}", self.of(elem)),
            TypeKind::Struct(fields) if fields.is_empty() => f.write_str("struct {}"),
            TypeKind::Struct(fields) => {
                f.write_str("struct { ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} {}", field.name, self.of(&field.type_desc))?;
                }
                f.write_str(" }")
            }
            TypeKind::Interface(_) => f.write_str("interface {}"),
            TypeKind::Chan(elem) => write!(f, "chan {}", self.of(elem)),
            TypeKind::Func => f.write_str("func()"),
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name (also the JSON key).
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Slice type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
}

impl SliceDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>) -> Self {
        Self { element_type }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    /// Create array descriptor.
    pub fn new(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}

/// Map type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    /// Key type (string or integer kinded).
    pub key_type: Arc<TypeDescriptor>,
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
}

impl MapDescriptor {
    pub fn new(key_type: Arc<TypeDescriptor>, element_type: Arc<TypeDescriptor>) -> Self {
        Self {
            key_type,
            element_type,
        }
    }
}

/// Interface (open slot) descriptor.
///
/// The empty interface accepts every type. Otherwise only the listed
/// implementors are accepted, compared by rendered type name, so `Device` and
/// `*Device` are distinct implementors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterfaceDescriptor {
    implementors: Option<Vec<String>>,
}

impl InterfaceDescriptor {
    /// The empty interface.
    pub fn any() -> Self {
        Self { implementors: None }
    }

    /// Interface implemented by the named types only.
    pub fn implemented_by<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            implementors: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Check if this is the empty interface.
    pub fn is_any(&self) -> bool {
        self.implementors.is_none()
    }

    /// Check if a value of type `desc` can be stored in this slot.
    pub fn accepts(&self, desc: &TypeDescriptor) -> bool {
        match &self.implementors {
            None => true,
            Some(names) => {
                let name = desc.type_name();
                names.iter().any(|n| *n == name)
            }
        }
    }
}
