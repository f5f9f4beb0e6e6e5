// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for struct TypeDescriptors.

use crate::dynamic::{FieldDescriptor, InterfaceDescriptor, ScalarKind, TypeDescriptor};
use std::sync::Arc;

/// Builder for creating struct TypeDescriptor instances.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    path: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
            fields: Vec::new(),
        }
    }

    /// Set the namespace used by qualified names.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Add a scalar field.
    pub fn field(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.field_with_type(name, kind.descriptor())
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, ScalarKind::String)
    }

    /// Add a slice field.
    pub fn slice_field(self, name: impl Into<String>, element_kind: ScalarKind) -> Self {
        let type_desc = Arc::new(TypeDescriptor::slice_of(element_kind.descriptor()));
        self.field_with_type(name, type_desc)
    }

    /// Add an array field.
    pub fn array_field(
        self,
        name: impl Into<String>,
        element_kind: ScalarKind,
        length: usize,
    ) -> Self {
        let type_desc = Arc::new(TypeDescriptor::array_of(length, element_kind.descriptor()));
        self.field_with_type(name, type_desc)
    }

    /// Add a map field.
    pub fn map_field(
        self,
        name: impl Into<String>,
        key_kind: ScalarKind,
        element: Arc<TypeDescriptor>,
    ) -> Self {
        let type_desc = Arc::new(TypeDescriptor::map_of(key_kind.descriptor(), element));
        self.field_with_type(name, type_desc)
    }

    /// Add an empty-interface field.
    pub fn interface_field(self, name: impl Into<String>) -> Self {
        let type_desc = Arc::new(TypeDescriptor::interface("", InterfaceDescriptor::any()));
        self.field_with_type(name, type_desc)
    }

    /// Add a pointer field.
    pub fn pointer_field(self, name: impl Into<String>, pointee: Arc<TypeDescriptor>) -> Self {
        let type_desc = Arc::new(TypeDescriptor::pointer_to(pointee));
        self.field_with_type(name, type_desc)
    }

    /// Add a nested struct field.
    pub fn nested_field(self, name: impl Into<String>, nested: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, nested)
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::struct_type(self.name, self.fields).with_path(self.path)
    }
}
