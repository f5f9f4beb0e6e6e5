// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent cache for derived type descriptors.
//!
//! Deriving `*T`, `[]T`, `[N]T` or `map[K]V` from the same base descriptors
//! always yields the same `Arc`, so resolving `*CMYK` twice gives two handles
//! that compare with [`Arc::ptr_eq`]. Entries are keyed by the address of the
//! base descriptors; every entry holds a strong reference to its bases so an
//! address is never reused while its key is live.
//!
//! Named types returned by a resolver are interned by name first, so a
//! resolver that builds a fresh `Arc` per call still maps to one base
//! address. A structurally different type under the same name replaces the
//! interned one.
//!
//! Lookups are lock-free reads on a dashmap. Concurrent misses on the same key
//! race through `entry().or_insert_with`, which keeps exactly one winner.

use crate::dynamic::TypeDescriptor;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum DerivedKey {
    Pointer(usize),
    Slice(usize),
    Array(usize, usize),
    Map(usize, usize),
}

struct Entry {
    _bases: Vec<Arc<TypeDescriptor>>,
    derived: Arc<TypeDescriptor>,
}

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
}

/// Load-or-store cache of derived descriptors.
pub struct TypeCache {
    derived: DashMap<DerivedKey, Entry>,
    named: DashMap<String, Arc<TypeDescriptor>>,
    stats: RwLock<LookupStats>,
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCache")
            .field("entries", &self.derived.len())
            .field("interned", &self.named.len())
            .field("stats", &*self.stats.read())
            .finish()
    }
}

fn addr(desc: &Arc<TypeDescriptor>) -> usize {
    Arc::as_ptr(desc) as usize
}

impl TypeCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            derived: DashMap::new(),
            named: DashMap::new(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// Process-wide cache used by decoders that were not given one.
    pub fn global() -> Arc<TypeCache> {
        static GLOBAL: OnceLock<Arc<TypeCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(TypeCache::new())))
    }

    /// `*elem`
    pub fn pointer_to(&self, elem: &Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        self.get_or_build(DerivedKey::Pointer(addr(elem)), &[elem], || {
            TypeDescriptor::pointer_to(Arc::clone(elem))
        })
    }

    /// `[]elem`
    pub fn slice_of(&self, elem: &Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        self.get_or_build(DerivedKey::Slice(addr(elem)), &[elem], || {
            TypeDescriptor::slice_of(Arc::clone(elem))
        })
    }

    /// `[length]elem`
    pub fn array_of(&self, length: usize, elem: &Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        self.get_or_build(DerivedKey::Array(length, addr(elem)), &[elem], || {
            TypeDescriptor::array_of(length, Arc::clone(elem))
        })
    }

    /// `map[key]elem`
    pub fn map_of(
        &self,
        key: &Arc<TypeDescriptor>,
        elem: &Arc<TypeDescriptor>,
    ) -> Arc<TypeDescriptor> {
        self.get_or_build(DerivedKey::Map(addr(key), addr(elem)), &[key, elem], || {
            TypeDescriptor::map_of(Arc::clone(key), Arc::clone(elem))
        })
    }

    /// Canonical instance of the type a resolver returned for `name`.
    ///
    /// Returns the interned descriptor when it equals `desc`, otherwise
    /// interns `desc`.
    pub fn intern(&self, name: &str, desc: Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        if let Some(hit) = self.named.get(name) {
            let current = hit.value();
            if Arc::ptr_eq(current, &desc) || **current == *desc {
                self.record_hit();
                return Arc::clone(current);
            }
        }

        let mut entry = self
            .named
            .entry(name.to_string())
            .or_insert_with(|| Arc::clone(&desc));
        let current = entry.value_mut();
        let interned = if Arc::ptr_eq(current, &desc) || **current == *desc {
            Arc::clone(current)
        } else {
            log::debug!("[type_cache] {} redefined by resolver", name);
            *current = Arc::clone(&desc);
            desc
        };
        drop(entry);

        self.record_miss();
        interned
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    /// Number of derived descriptors held.
    pub fn len(&self) -> usize {
        self.derived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.derived.is_empty()
    }

    /// Number of resolver names interned.
    pub fn interned(&self) -> usize {
        self.named.len()
    }

    fn get_or_build<F>(
        &self,
        key: DerivedKey,
        bases: &[&Arc<TypeDescriptor>],
        build: F,
    ) -> Arc<TypeDescriptor>
    where
        F: FnOnce() -> TypeDescriptor,
    {
        if let Some(hit) = self.derived.get(&key) {
            self.record_hit();
            return Arc::clone(&hit.derived);
        }

        let mut inserted = false;
        let entry = self.derived.entry(key).or_insert_with(|| {
            inserted = true;
            let derived = Arc::new(build());
            log::debug!("[type_cache] derived {}", derived);
            Entry {
                _bases: bases.iter().map(|b| Arc::clone(b)).collect(),
                derived,
            }
        });
        let derived = Arc::clone(&entry.derived);
        drop(entry);

        if inserted {
            self.record_miss();
        } else {
            self.record_hit();
        }
        derived
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
    }
}
