// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type discriminators for interface slots.
//!
//! A value stored behind an interface slot loses its concrete type in plain
//! JSON. With a discriminator configured, the encoder tags such values with
//! their type name and the decoder uses the tag to rebuild the original type.
//!
//! Two wire shapes exist, chosen by the kind of the tagged value:
//!
//! ```text
//! {"_t":"CMYK","Cyan":0,"Magenta":92,"Yellow":58,"Key":12}   struct / map
//! {"_t":"[3]int","_v":[220,20,60]}                            everything else
//! ```
//!
//! - `lookahead`: reads the tag of an object without moving the decoder
//! - `dispatch`: resolves the tag and materializes the value
//! - `inject`: decides where tags are written on encode

pub(crate) mod dispatch;
pub(crate) mod inject;
pub(crate) mod lookahead;

use crate::registry::TypeResolver;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Per-codec discriminator settings.
///
/// The feature is active only when both field names are non-empty.
#[derive(Clone, Default)]
pub struct DiscriminatorConfig {
    pub type_field_name: String,
    pub value_field_name: String,
    /// Consulted for names missing from the built-in table.
    pub resolver: Option<Arc<dyn TypeResolver>>,
}

impl fmt::Debug for DiscriminatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscriminatorConfig")
            .field("type_field_name", &self.type_field_name)
            .field("value_field_name", &self.value_field_name)
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .finish()
    }
}

impl DiscriminatorConfig {
    pub fn new(
        type_field_name: impl Into<String>,
        value_field_name: impl Into<String>,
        resolver: Option<Arc<dyn TypeResolver>>,
    ) -> Self {
        Self {
            type_field_name: type_field_name.into(),
            value_field_name: value_field_name.into(),
            resolver,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.type_field_name.is_empty() && !self.value_field_name.is_empty()
    }

    /// Check if `key` is one of the two discriminator keys.
    pub fn is_discriminator_key(&self, key: &str) -> bool {
        self.is_active() && (key == self.type_field_name || key == self.value_field_name)
    }

    pub fn resolver(&self) -> Option<&dyn TypeResolver> {
        self.resolver.as_deref()
    }
}

/// When type tags are written on encode.
///
/// Flags compose with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeMode(u8);

impl EncodeMode {
    /// Tag only values reached through an interface slot
    pub const IF_REQUIRED: EncodeMode = EncodeMode(0);

    /// Also tag the outermost struct or map
    pub const ROOT_VALUE: EncodeMode = EncodeMode(1 << 1);

    /// Tag every struct and map
    pub const ALL_OBJECTS: EncodeMode = EncodeMode(1 << 2);

    /// Qualify type names with their path
    pub const WITH_PATH: EncodeMode = EncodeMode(1 << 3);

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        EncodeMode(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if contains mode
    pub const fn contains(&self, other: EncodeMode) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn root_value(&self) -> bool {
        self.contains(Self::ROOT_VALUE)
    }

    pub const fn all_objects(&self) -> bool {
        self.contains(Self::ALL_OBJECTS)
    }

    pub const fn with_path(&self) -> bool {
        self.contains(Self::WITH_PATH)
    }
}

impl std::ops::BitOr for EncodeMode {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        EncodeMode(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EncodeMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for EncodeMode {
    type Err = crate::Error;

    /// Parse `"root_value|with_path"`. Names are case-insensitive, an empty
    /// string is `if_required`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mode = EncodeMode::IF_REQUIRED;
        for part in s.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            mode |= match part.to_ascii_lowercase().as_str() {
                "if_required" => EncodeMode::IF_REQUIRED,
                "root_value" => EncodeMode::ROOT_VALUE,
                "all_objects" => EncodeMode::ALL_OBJECTS,
                "with_path" => EncodeMode::WITH_PATH,
                other => {
                    return Err(crate::Error::Settings(format!(
                        "unknown encode mode: {}",
                        other
                    )))
                }
            };
        }
        Ok(mode)
    }
}
