// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use dynjson::typename::empty_interface;
use dynjson::{from_slice_with, to_vec_with, DecodeOptions, DiscriminatorConfig, EncodeOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decode = DecodeOptions {
        discriminator: DiscriminatorConfig::new("_t", "_v", None),
        ..DecodeOptions::default()
    };
    let slot = empty_interface();

    // Anything that decodes must encode and decode to the same value again.
    if let Ok(value) = from_slice_with(data, &slot, decode.clone()) {
        let encode = EncodeOptions {
            discriminator: DiscriminatorConfig::new("_t", "_v", None),
            ..EncodeOptions::default()
        };
        if let Ok(json) = to_vec_with(&value, &encode) {
            let again = from_slice_with(&json, &slot, decode).expect("re-decode");
            assert_eq!(again, value);
        }
    }
});
