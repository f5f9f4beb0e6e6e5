// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic

//! Concurrent resolution of derived type names.

use dynjson::dynamic::{ScalarKind, TypeDescriptor};
use dynjson::{
    parse_type_name, DecodeOptions, Decoder, DiscriminatorConfig, TypeCache,
    TypeDescriptorBuilder, TypeRegistry, TypeResolver,
};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const ROUNDS: usize = 200;
const NAMES: [&str; 4] = ["*CMYK", "[]int", "map[string]CMYK", "[4]*CMYK"];
/// Cache lookups per round: five derived types plus three `CMYK` interns.
const LOOKUPS_PER_ROUND: usize = 8;

fn registry() -> Arc<dyn TypeResolver> {
    let cmyk = Arc::new(
        TypeDescriptorBuilder::new("CMYK")
            .field("Key", ScalarKind::Uint8)
            .build(),
    );
    let mut registry = TypeRegistry::new();
    registry.register(cmyk);
    Arc::new(registry)
}

#[test]
fn test_identity_converges_across_threads() {
    let cache = Arc::new(TypeCache::new());
    let resolver = registry();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let resolver = Arc::clone(&resolver);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut seen: Vec<Arc<TypeDescriptor>> = Vec::new();
                for round in 0..ROUNDS {
                    for name in NAMES {
                        let desc = parse_type_name(name, Some(resolver.as_ref()), &cache)
                            .expect("resolve");
                        if round == 0 {
                            seen.push(desc);
                        }
                    }
                }
                seen
            })
        })
        .collect();

    let results: Vec<Vec<Arc<TypeDescriptor>>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();

    for result in &results[1..] {
        for (a, b) in results[0].iter().zip(result) {
            assert!(Arc::ptr_eq(a, b), "{} resolved to two descriptors", a);
        }
    }

    // *CMYK, []int, map[string]CMYK, [4]*CMYK
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.interned(), 1);
    let stats = cache.stats();
    assert!(stats.misses >= 4);
    assert_eq!(
        stats.hits + stats.misses,
        (THREADS * ROUNDS * LOOKUPS_PER_ROUND) as u64
    );
}

#[test]
fn test_fresh_arc_resolver_keeps_identity() {
    let resolver: Arc<dyn TypeResolver> = Arc::new(|name: &str| {
        (name == "CMYK").then(|| {
            Arc::new(
                TypeDescriptorBuilder::new("CMYK")
                    .field("Key", ScalarKind::Uint8)
                    .build(),
            )
        })
    });
    let cache = TypeCache::new();

    let first = parse_type_name("*CMYK", Some(resolver.as_ref()), &cache).expect("resolve");
    for _ in 0..1000 {
        let again = parse_type_name("*CMYK", Some(resolver.as_ref()), &cache).expect("resolve");
        assert!(Arc::ptr_eq(&first, &again));
    }
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.interned(), 1);
}

#[test]
fn test_decoders_share_injected_cache() {
    let cache = Arc::new(TypeCache::new());
    let resolver = registry();
    let slot = dynjson::typename::empty_interface();
    let input = br#"{"_t":"*CMYK","_v":{"Key":1}}"#;

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let resolver = Arc::clone(&resolver);
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                let options = DecodeOptions {
                    discriminator: DiscriminatorConfig::new("_t", "_v", Some(resolver)),
                    ..DecodeOptions::default()
                };
                let mut decoder = Decoder::with_options(input, options).with_type_cache(cache);
                let data = decoder.decode(&slot).expect("decode");
                let inner = data.value().as_interface().expect("interface");
                Arc::clone(inner.descriptor())
            })
        })
        .collect();

    let descriptors: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();
    assert!(descriptors.iter().all(|d| Arc::ptr_eq(d, &descriptors[0])));
    assert_eq!(descriptors[0].type_name(), "*CMYK");
    assert_eq!(cache.len(), 1);
}
