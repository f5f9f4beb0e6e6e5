// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dynjson - JSON with type discriminators
//!
//! A JSON codec for runtime-typed values. Values stored in interface slots
//! (fields that can hold any of several concrete types) carry a type tag, so
//! a document can be decoded back into the same concrete types it was
//! encoded from.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynjson::{
//!     from_slice_with, to_string_with, DecodeOptions, DiscriminatorConfig, DynamicData,
//!     EncodeMode, EncodeOptions, ScalarKind, TypeDescriptorBuilder, TypeRegistry,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> dynjson::Result<()> {
//! let cmyk = Arc::new(
//!     TypeDescriptorBuilder::new("CMYK")
//!         .field("Cyan", ScalarKind::Uint8)
//!         .field("Key", ScalarKind::Uint8)
//!         .build(),
//! );
//! let palette = Arc::new(
//!     TypeDescriptorBuilder::new("Palette")
//!         .interface_field("Color")
//!         .build(),
//! );
//!
//! let mut color = DynamicData::new(&cmyk);
//! color.set("Key", 12u8)?;
//! let mut data = DynamicData::new(&palette);
//! data.set("Color", color)?;
//!
//! let encode = EncodeOptions {
//!     discriminator: DiscriminatorConfig::new("_t", "_v", None),
//!     mode: EncodeMode::IF_REQUIRED,
//! };
//! let json = to_string_with(&data, &encode)?;
//! assert_eq!(json, r#"{"Color":{"_t":"CMYK","Cyan":0,"Key":12}}"#);
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(cmyk);
//! let decode = DecodeOptions {
//!     discriminator: DiscriminatorConfig::new("_t", "_v", Some(Arc::new(registry))),
//!     ..DecodeOptions::default()
//! };
//! let decoded = from_slice_with(json.as_bytes(), &palette, decode)?;
//! assert_eq!(decoded, data);
//! # Ok(())
//! # }
//! ```
//!
//! ## Wire format
//!
//! Structs and maps in an interface slot get the type field as their first
//! member. Other values are wrapped:
//!
//! ```text
//! {"_t":"CMYK","Cyan":0,"Key":12}
//! {"_t":"[3]int","_v":[220,20,60]}
//! {"_t":"string","_v":"Red"}
//! ```
//!
//! Type names follow a small grammar: built-in scalars (`int`, `uint8`,
//! `float64`, `string`, `any`, ...), names known to a [`TypeResolver`], and
//! `[N]T`, `[]T`, `map[K]T` over those, each optionally prefixed with `*`.
//!
//! ## Modules Overview
//!
//! - [`dynamic`] - Runtime type and value model
//! - [`discriminator`] - Discriminator settings and encode modes
//! - [`typename`] - Type name grammar
//! - [`config`] - Constants and file-based settings

pub mod config;
pub mod discriminator;
pub mod dynamic;
pub mod typename;

mod cache;
mod cursor;
mod decode;
mod encode;
mod error;
mod registry;

pub use cache::{LookupStats, TypeCache};
#[cfg(feature = "settings")]
pub use config::CodecSettings;
pub use decode::{from_reader, from_slice, from_slice_with, from_str, DecodeOptions, Decoder};
pub use discriminator::{DiscriminatorConfig, EncodeMode};
pub use dynamic::{
    DynamicData, DynamicValue, InterfaceDescriptor, ScalarKind, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use encode::{to_string, to_string_with, to_vec, to_vec_with, EncodeOptions, Encoder};
pub use error::{Error, Result};
pub use registry::{TypeRegistry, TypeResolver};
pub use typename::parse_type_name;
