// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the decoder, the encoder and the discriminator layer.

use thiserror::Error;

/// Codec errors.
///
/// Every error is terminal for the current encode/decode call. The target
/// value is left in an unspecified state.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed JSON detected by the base scanner.
    #[error("syntax error at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: String },

    /// A JSON value cannot be stored in a value of the expected type.
    #[error("cannot decode {found} into value of type {expected} (offset {offset})")]
    TypeMismatch {
        expected: String,
        found: String,
        offset: usize,
    },

    /// Object key with no matching struct field (disallow-unknown-fields mode).
    #[error("unknown field \"{0}\"")]
    UnknownField(String),

    /// Type that the base codec cannot encode or decode.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Value that the base codec cannot encode (NaN, infinities, bad numbers).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Value does not conform to the descriptor it is encoded with.
    #[error("value does not match type {expected}: found {found}")]
    ValueMismatch { expected: String, found: String },

    /// Token-level violation while scanning a tagged object.
    #[error("malformed discriminator object at offset {offset}: {reason}")]
    MalformedDiscriminatorObject { offset: usize, reason: &'static str },

    /// Tagged object scanned fully without a type field.
    #[error("missing discriminator")]
    MissingDiscriminator,

    /// Non-object discriminator type without a value field.
    #[error("missing discriminator value for type {0}")]
    MissingDiscriminatorValue(String),

    /// The type field holds something other than a string.
    #[error("discriminator type at offset {0} is not string")]
    InvalidDiscriminatorTypeFieldValue(usize),

    /// Type name that does not resolve (or has a malformed array length).
    #[error("invalid discriminator type: {0}")]
    InvalidDiscriminatorType(String),

    /// Resolved value that cannot be stored in the destination slot.
    ///
    /// Also returned for `complex64`/`complex128` type tags on decode.
    #[error("unsupported discriminator kind: {0}")]
    UnsupportedDiscriminatorKind(String),

    /// Channel, function or invalid kind reached through an interface slot.
    ///
    /// Complex type tags are reported as
    /// [`UnsupportedDiscriminatorKind`](Error::UnsupportedDiscriminatorKind).
    #[error("unsupported scalar kind: {0}")]
    UnsupportedScalarKind(String),

    /// Output sink or input source failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Literal encoding failure reported by serde_json.
    #[error("JSON literal error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid codec settings.
    #[error("invalid settings: {0}")]
    Settings(String),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
