// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode dispatcher for tagged objects in interface slots.
//!
//! Struct and map types are decoded from the tagged object itself, whose
//! discriminator keys the decoder skips. Every other type is decoded from the
//! value field only. The value is decoded by a scratch decoder; the primary
//! decoder then skips the whole object.

use super::lookahead::{self, Discriminant};
use crate::cache::TypeCache;
use crate::decode::Decoder;
use crate::dynamic::{DynamicData, DynamicValue, InterfaceDescriptor, TypeDescriptor, TypeKind};
use crate::error::{Error, Result};
use crate::typename::parse_type_name;
use std::sync::Arc;

/// Decode the tagged object at the decoder's cursor into an interface slot.
pub(crate) fn decode_tagged(
    decoder: &mut Decoder<'_>,
    slot: &InterfaceDescriptor,
    depth: usize,
) -> Result<DynamicValue> {
    decoder.cursor_mut().skip_whitespace();
    let origin = decoder.cursor().offset();

    let config = &decoder.options().discriminator;
    let found = lookahead::scan(decoder.cursor().fork(), config, depth)?;
    let resolved = parse_type_name(&found.type_name, config.resolver(), decoder.type_cache())?;

    let value = materialize(decoder, &resolved, &found, origin, depth)?;
    let assigned = assign(decoder.type_cache(), slot, resolved, value)?;

    decoder.cursor_mut().skip_value(depth)?;
    Ok(assigned)
}

fn materialize(
    decoder: &Decoder<'_>,
    desc: &Arc<TypeDescriptor>,
    found: &Discriminant,
    origin: usize,
    depth: usize,
) -> Result<DynamicValue> {
    // The tagged object sits at `depth`, its value field one level below.
    let (start, depth) = match &desc.kind {
        TypeKind::Scalar(kind) if kind.is_complex() => {
            return Err(Error::UnsupportedDiscriminatorKind(
                desc.type_name().into_owned(),
            ))
        }
        TypeKind::Chan(_) | TypeKind::Func => {
            return Err(Error::UnsupportedScalarKind(desc.kind_name().to_string()))
        }
        TypeKind::Map(_) | TypeKind::Struct(_) => (origin, depth),
        _ => (
            found
                .value_offset
                .ok_or_else(|| Error::MissingDiscriminatorValue(found.type_name.clone()))?,
            depth + 1,
        ),
    };

    let mut scratch = decoder.fork_at(start);
    scratch.decode_value(desc, depth)
}

/// Store a materialized value in `slot`, as itself or behind a pointer.
fn assign(
    cache: &TypeCache,
    slot: &InterfaceDescriptor,
    desc: Arc<TypeDescriptor>,
    value: DynamicValue,
) -> Result<DynamicValue> {
    if desc.is_interface() {
        // Already an interface value.
        return if slot.is_any() {
            Ok(value)
        } else {
            Err(Error::UnsupportedDiscriminatorKind(
                desc.type_name().into_owned(),
            ))
        };
    }

    if slot.accepts(&desc) {
        log::trace!("[discriminator] assigned {}", desc);
        return Ok(DynamicValue::Interface(Box::new(DynamicData::from_parts(
            desc, value,
        ))));
    }

    let pointer = cache.pointer_to(&desc);
    if slot.accepts(&pointer) {
        log::trace!("[discriminator] assigned {}", pointer);
        return Ok(DynamicValue::Interface(Box::new(DynamicData::from_parts(
            pointer,
            DynamicValue::Pointer(Box::new(value)),
        ))));
    }

    Err(Error::UnsupportedDiscriminatorKind(
        desc.type_name().into_owned(),
    ))
}
