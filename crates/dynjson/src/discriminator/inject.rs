// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type tag placement on encode.
//!
//! A value in an interface slot is tagged once: structs and maps carry the
//! type field as their first member, everything else is wrapped in a
//! two-member object holding the type and value fields. Pointers are
//! transparent, the tag names the pointed-to type.
//!
//! `EncodeState::need_tag` carries a pending tag from the interface slot to
//! the struct or map that consumes it.

use crate::dynamic::{DynamicValue, TypeDescriptor, TypeKind};
use crate::encode::{encode_value, EncodeState};
use crate::error::{Error, Result};

/// Request a tag for the outermost value under `ROOT_VALUE`.
pub(crate) fn mark_root(state: &mut EncodeState<'_>, desc: &TypeDescriptor, value: &DynamicValue) {
    if !state.options.discriminator.is_active() || !state.options.mode.root_value() {
        return;
    }
    let (desc, _) = deref(desc, value);
    if matches!(desc.kind, TypeKind::Struct(_) | TypeKind::Map(_)) {
        state.need_tag = true;
    }
}

/// Encode the content of an interface slot.
pub(crate) fn encode_interface(
    state: &mut EncodeState<'_>,
    value: &DynamicValue,
    depth: usize,
) -> Result<()> {
    let data = match value {
        DynamicValue::Null => {
            state.buf.extend_from_slice(b"null");
            return Ok(());
        }
        DynamicValue::Interface(data) => data,
        other => {
            return Err(Error::ValueMismatch {
                expected: "interface".to_string(),
                found: other.variant_name().to_string(),
            })
        }
    };

    if !state.options.discriminator.is_active() {
        return encode_value(state, data.descriptor(), data.value(), depth + 1);
    }

    let (desc, inner) = deref(data.descriptor(), data.value());
    match (&desc.kind, inner) {
        (TypeKind::Pointer(_), DynamicValue::Null) => {
            Err(Error::UnsupportedScalarKind("invalid".to_string()))
        }
        (TypeKind::Chan(_) | TypeKind::Func, _) => {
            Err(Error::UnsupportedScalarKind(desc.kind_name().to_string()))
        }
        (TypeKind::Interface(_), _) => encode_interface(state, inner, depth + 1),
        (TypeKind::Struct(_) | TypeKind::Map(_), _) => {
            state.need_tag = true;
            encode_value(state, desc, inner, depth + 1)
        }
        _ => {
            let options = state.options;
            log::trace!("[discriminator] wrapping {}", desc);
            state.buf.push(b'{');
            state.write_str(&options.discriminator.type_field_name)?;
            state.buf.push(b':');
            write_type_name(state, desc)?;
            state.buf.push(b',');
            state.write_str(&options.discriminator.value_field_name)?;
            state.buf.push(b':');
            encode_value(state, desc, inner, depth + 1)?;
            state.buf.push(b'}');
            Ok(())
        }
    }
}

/// Struct hook. Writes `{` plus the tag member when a tag is due, and returns
/// the byte to write before the first field.
pub(crate) fn struct_open(state: &mut EncodeState<'_>, desc: &TypeDescriptor) -> Result<u8> {
    if !take_tag(state) {
        return Ok(b'{');
    }
    state.buf.push(b'{');
    write_tag_member(state, desc)?;
    Ok(b',')
}

/// Map hook, called after the opening brace.
pub(crate) fn map_tag(state: &mut EncodeState<'_>, desc: &TypeDescriptor, len: usize) -> Result<()> {
    if !take_tag(state) {
        return Ok(());
    }
    write_tag_member(state, desc)?;
    if len > 0 {
        state.buf.push(b',');
    }
    Ok(())
}

/// Consume the pending tag. `ALL_OBJECTS` tags every struct and map.
fn take_tag(state: &mut EncodeState<'_>) -> bool {
    if !state.options.discriminator.is_active() {
        return false;
    }
    let tag = state.need_tag || state.options.mode.all_objects();
    state.need_tag = false;
    tag
}

fn write_tag_member(state: &mut EncodeState<'_>, desc: &TypeDescriptor) -> Result<()> {
    let options = state.options;
    log::trace!("[discriminator] tagging {}", desc);
    state.write_str(&options.discriminator.type_field_name)?;
    state.buf.push(b':');
    write_type_name(state, desc)
}

fn write_type_name(state: &mut EncodeState<'_>, desc: &TypeDescriptor) -> Result<()> {
    let name = desc.display_name(state.options.mode.with_path()).to_string();
    state.write_str(&name)
}

/// Follow pointers in step with their values. Stops at a nil pointer.
fn deref<'d>(
    mut desc: &'d TypeDescriptor,
    mut value: &'d DynamicValue,
) -> (&'d TypeDescriptor, &'d DynamicValue) {
    while let (TypeKind::Pointer(elem), DynamicValue::Pointer(inner)) = (&desc.kind, value) {
        desc = elem;
        value = inner;
    }
    (desc, value)
}
