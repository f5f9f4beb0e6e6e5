// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! User type resolution.
//!
//! Built-in names (`int`, `string`, `any`, ...) are resolved by the codec
//! itself. Every other simple name found in a type field is handed to a
//! [`TypeResolver`]; a resolver that returns `None` makes the decode fail with
//! [`Error::InvalidDiscriminatorType`](crate::Error::InvalidDiscriminatorType).

use crate::dynamic::TypeDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps a simple type name to a concrete type.
///
/// A resolver may build a fresh `Arc` on every call. Results are interned by
/// name in the decoder's [`TypeCache`](crate::TypeCache), so derived types
/// such as `*CMYK` keep one identity as long as the returned type is
/// structurally the same. Returning a different type for a name replaces
/// the interned one.
///
/// Any `Fn(&str) -> Option<Arc<TypeDescriptor>>` closure is a resolver:
///
/// ```rust
/// use dynjson::{TypeDescriptorBuilder, TypeResolver};
/// use std::sync::Arc;
///
/// let cmyk = Arc::new(TypeDescriptorBuilder::new("CMYK").build());
/// let resolver = move |name: &str| (name == "CMYK").then(|| cmyk.clone());
/// assert!(resolver.resolve("CMYK").is_some());
/// assert!(resolver.resolve("RGB").is_none());
/// ```
pub trait TypeResolver: Send + Sync {
    /// Look up a type by name. Returns `None` if the name is unknown.
    fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>>;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> Option<Arc<TypeDescriptor>> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self(name)
    }
}

/// Simple [`HashMap`]-backed [`TypeResolver`].
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type under its name, and under its qualified name
    /// when it has a path.
    pub fn register(&mut self, desc: Arc<TypeDescriptor>) -> &mut Self {
        let qualified = desc.qualified_name();
        if qualified != desc.name {
            self.types.insert(qualified, Arc::clone(&desc));
        }
        self.types.insert(desc.name.clone(), desc);
        self
    }

    /// Register a type under an explicit name.
    pub fn register_as(&mut self, name: impl Into<String>, desc: Arc<TypeDescriptor>) -> &mut Self {
        self.types.insert(name.into(), desc);
        self
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }
}
