// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use dynjson::{parse_type_name, TypeCache};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let cache = TypeCache::new();
        if let Ok(desc) = parse_type_name(name, None, &cache) {
            // Rendered names resolve to the same type.
            let rendered = desc.type_name().into_owned();
            let again = parse_type_name(&rendered, None, &cache).expect("rendered name");
            assert_eq!(again, desc);
        }
    }
});
