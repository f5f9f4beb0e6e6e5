// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type model
//!
//! Types are described at runtime rather than by Rust structs, so the codec
//! can resolve a type name found in a document to a concrete type and build a
//! value of that type.
//!
//! # Features
//!
//! - **TypeDescriptor**: Runtime type description (scalars, structs, arrays, slices, maps, pointers, interfaces)
//! - **DynamicData**: Type-erased data container with field access
//! - **Builder API**: Fluent interface for building struct descriptors
//!
//! # Example
//!
//! ```rust
//! use dynjson::dynamic::{TypeDescriptorBuilder, DynamicData, ScalarKind};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(TypeDescriptorBuilder::new("CMYK")
//!     .field("Cyan", ScalarKind::Uint8)
//!     .field("Magenta", ScalarKind::Uint8)
//!     .field("Yellow", ScalarKind::Uint8)
//!     .field("Key", ScalarKind::Uint8)
//!     .build());
//!
//! let mut data = DynamicData::new(&descriptor);
//! data.set("Magenta", 92u8).unwrap();
//!
//! let magenta: u8 = data.get("Magenta").unwrap();
//! assert_eq!(magenta, 92);
//! ```

mod builder;
mod dynamic_data;
mod type_descriptor;
mod value;

pub use builder::TypeDescriptorBuilder;
pub use dynamic_data::{
    check_value, zero_value, DynamicData, DynamicDataError, FromDynamicValue, IntoDynamicValue,
};
pub(crate) use dynamic_data::scalar_matches;
pub use type_descriptor::{
    ArrayDescriptor, FieldDescriptor, InterfaceDescriptor, MapDescriptor, ScalarKind,
    SliceDescriptor, TypeDescriptor, TypeKind,
};
pub use value::DynamicValue;
