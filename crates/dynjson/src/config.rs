// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec constants and settings.
//!
//! Settings can be built in code or loaded from a TOML file:
//!
//! ```toml
//! type_field = "_t"
//! value_field = "_v"
//! encode_mode = ["root_value", "with_path"]
//! disallow_unknown_fields = true
//! ```

/// Maximum nesting of arrays and objects, on decode and encode.
///
/// The walk is recursive; this depth fits a default 2 MiB thread stack in
/// debug builds.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Largest array length accepted in a type name (`[N]T`).
pub const MAX_ARRAY_LENGTH: usize = 1 << 16;

/// Conventional type field name.
pub const DEFAULT_TYPE_FIELD: &str = "_t";

/// Conventional value field name.
pub const DEFAULT_VALUE_FIELD: &str = "_v";

#[cfg(feature = "settings")]
pub use settings::CodecSettings;

#[cfg(feature = "settings")]
mod settings {
    use super::{DEFAULT_TYPE_FIELD, DEFAULT_VALUE_FIELD};
    use crate::decode::DecodeOptions;
    use crate::discriminator::{DiscriminatorConfig, EncodeMode};
    use crate::encode::EncodeOptions;
    use crate::error::{Error, Result};
    use crate::registry::TypeResolver;
    use serde::{Deserialize, Serialize};
    use std::path::Path;
    use std::sync::Arc;

    /// File-loadable codec settings.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CodecSettings {
        /// Name of the type field. Empty disables discriminators.
        #[serde(default = "default_type_field")]
        pub type_field: String,

        /// Name of the value field. Empty disables discriminators.
        #[serde(default = "default_value_field")]
        pub value_field: String,

        /// Encode mode flags (`if_required`, `root_value`, `all_objects`,
        /// `with_path`).
        #[serde(default)]
        pub encode_mode: Vec<String>,

        #[serde(default)]
        pub disallow_unknown_fields: bool,

        /// Decode numbers in empty interfaces as raw literals.
        #[serde(default)]
        pub use_number: bool,
    }

    fn default_type_field() -> String {
        DEFAULT_TYPE_FIELD.to_string()
    }

    fn default_value_field() -> String {
        DEFAULT_VALUE_FIELD.to_string()
    }

    impl Default for CodecSettings {
        fn default() -> Self {
            Self {
                type_field: default_type_field(),
                value_field: default_value_field(),
                encode_mode: Vec::new(),
                disallow_unknown_fields: false,
                use_number: false,
            }
        }
    }

    impl CodecSettings {
        /// Load settings from a TOML file.
        pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        }

        pub fn from_toml_str(content: &str) -> Result<Self> {
            let settings: Self =
                toml::from_str(content).map_err(|e| Error::Settings(e.to_string()))?;
            settings.validate()?;
            Ok(settings)
        }

        /// Validate the settings.
        pub fn validate(&self) -> Result<()> {
            if self.type_field.is_empty() != self.value_field.is_empty() {
                return Err(Error::Settings(
                    "type_field and value_field must both be set or both be empty".into(),
                ));
            }
            if !self.type_field.is_empty() && self.type_field == self.value_field {
                return Err(Error::Settings(format!(
                    "type_field and value_field are both {:?}",
                    self.type_field
                )));
            }
            self.mode()?;
            Ok(())
        }

        /// Combined encode mode.
        pub fn mode(&self) -> Result<EncodeMode> {
            self.encode_mode
                .iter()
                .try_fold(EncodeMode::IF_REQUIRED, |mode, name| -> Result<EncodeMode> {
                    Ok(mode | name.parse::<EncodeMode>()?)
                })
        }

        pub fn decode_options(&self, resolver: Option<Arc<dyn TypeResolver>>) -> DecodeOptions {
            DecodeOptions {
                disallow_unknown_fields: self.disallow_unknown_fields,
                use_number: self.use_number,
                discriminator: DiscriminatorConfig::new(
                    self.type_field.clone(),
                    self.value_field.clone(),
                    resolver,
                ),
            }
        }

        pub fn encode_options(&self) -> Result<EncodeOptions> {
            Ok(EncodeOptions {
                discriminator: DiscriminatorConfig::new(
                    self.type_field.clone(),
                    self.value_field.clone(),
                    None,
                ),
                mode: self.mode()?,
            })
        }
    }

}
