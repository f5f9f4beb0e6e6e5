// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type name grammar.
//!
//! A type name found in a type field is one of:
//!
//! - `[N]Elem`: fixed array
//! - `[]Elem`: slice
//! - `map[Key]Elem`: map
//! - a simple name, looked up in the built-in table and then in the resolver
//!
//! A leading `*` on the whole name, or on an element or key name, wraps that
//! type in a pointer. Element and key names must be simple names (optionally
//! `*`-prefixed): `[][]int` or `map[string][]int` do not resolve.

use crate::cache::TypeCache;
use crate::config::MAX_ARRAY_LENGTH;
use crate::dynamic::{InterfaceDescriptor, ScalarKind, TypeDescriptor};
use crate::error::{Error, Result};
use crate::registry::TypeResolver;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

struct Builtins {
    /// Indexed by `ScalarKind as usize`.
    scalars: Vec<Arc<TypeDescriptor>>,
    any: Arc<TypeDescriptor>,
    by_name: HashMap<&'static str, Arc<TypeDescriptor>>,
}

fn builtins() -> &'static Builtins {
    static BUILTINS: OnceLock<Builtins> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        let scalars: Vec<_> = ScalarKind::ALL
            .iter()
            .map(|kind| Arc::new(TypeDescriptor::scalar("", *kind)))
            .collect();
        let any = Arc::new(TypeDescriptor::interface("", InterfaceDescriptor::any()));

        let mut by_name = HashMap::new();
        for kind in ScalarKind::ALL {
            // Number is the raw-literal type of number mode, not a builtin name.
            if kind != ScalarKind::Number {
                by_name.insert(kind.name(), Arc::clone(&scalars[kind as usize]));
            }
        }
        for alias in ["any", "interface{}", "interface {}"] {
            by_name.insert(alias, Arc::clone(&any));
        }

        Builtins {
            scalars,
            any,
            by_name,
        }
    })
}

/// Shared descriptor of a scalar kind.
pub(crate) fn scalar_descriptor(kind: ScalarKind) -> Arc<TypeDescriptor> {
    Arc::clone(&builtins().scalars[kind as usize])
}

/// Shared descriptor of the empty interface.
pub fn empty_interface() -> Arc<TypeDescriptor> {
    Arc::clone(&builtins().any)
}

/// Look up a built-in simple name (`int`, `string`, `any`, ...).
pub fn builtin(name: &str) -> Option<Arc<TypeDescriptor>> {
    builtins().by_name.get(name).cloned()
}

struct Patterns {
    array: Regex,
    slice: Regex,
    map: Regex,
}

#[allow(clippy::expect_used)] // constant patterns, exercised by the tests below
fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        array: Regex::new(r"^\*?\[(\d+)\](.+)$").expect("valid array pattern"),
        slice: Regex::new(r"^\*?\[\](.+)$").expect("valid slice pattern"),
        map: Regex::new(r"^\*?map\[([^\]]+)\](.+)$").expect("valid map pattern"),
    })
}

/// Resolve a type name to a descriptor.
///
/// Derived descriptors (pointers, arrays, slices, maps) come from `cache`, so
/// resolving the same name twice returns the same `Arc`. Array lengths above
/// [`MAX_ARRAY_LENGTH`] are rejected.
pub fn parse_type_name(
    name: &str,
    resolver: Option<&dyn TypeResolver>,
    cache: &TypeCache,
) -> Result<Arc<TypeDescriptor>> {
    let patterns = patterns();

    let compound = if let Some(caps) = patterns.array.captures(name) {
        let length = caps[1]
            .parse::<usize>()
            .ok()
            .filter(|len| *len <= MAX_ARRAY_LENGTH)
            .ok_or_else(|| Error::InvalidDiscriminatorType(name.to_string()))?;
        let elem = lookup(&caps[2], resolver, cache)?;
        Some(cache.array_of(length, &elem))
    } else if let Some(caps) = patterns.slice.captures(name) {
        let elem = lookup(&caps[1], resolver, cache)?;
        Some(cache.slice_of(&elem))
    } else if let Some(caps) = patterns.map.captures(name) {
        let key = lookup(&caps[1], resolver, cache)?;
        let elem = lookup(&caps[2], resolver, cache)?;
        Some(cache.map_of(&key, &elem))
    } else {
        None
    };

    match compound {
        Some(desc) if name.starts_with('*') => Ok(cache.pointer_to(&desc)),
        Some(desc) => Ok(desc),
        None => lookup(name, resolver, cache),
    }
}

/// Resolve a simple name, or a `*`-prefixed simple name.
fn lookup(
    name: &str,
    resolver: Option<&dyn TypeResolver>,
    cache: &TypeCache,
) -> Result<Arc<TypeDescriptor>> {
    let (base, pointer) = match name.strip_prefix('*') {
        Some(rest) if !rest.is_empty() => (rest, true),
        _ => (name, false),
    };

    let desc = match builtin(base) {
        Some(desc) => desc,
        None => {
            let found = resolver.and_then(|r| r.resolve(base));
            log::debug!(
                "[discriminator] resolver fallback for {}: {}",
                base,
                if found.is_some() { "found" } else { "not found" }
            );
            let found = found.ok_or_else(|| Error::InvalidDiscriminatorType(name.to_string()))?;
            cache.intern(base, found)
        }
    };

    Ok(if pointer {
        cache.pointer_to(&desc)
    } else {
        desc
    })
}
