// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::too_many_lines)] // Test code

//! End-to-end encode/decode of values held in interface slots.

use dynjson::dynamic::{DynamicData, DynamicValue, ScalarKind, TypeDescriptor};
use dynjson::typename::empty_interface;
use dynjson::{
    from_slice_with, to_string_with, DecodeOptions, Decoder, DiscriminatorConfig, EncodeMode,
    EncodeOptions, Encoder, Error, TypeDescriptorBuilder, TypeRegistry, TypeResolver,
};
use std::collections::BTreeMap;
use std::sync::Arc;

const COLOR_GROUP_JSON: &str = r#"{"ID":1,"Name":"Reds","Colors":[{"_t":"[3]int","_v":[220,20,60]},{"_t":"string","_v":"Red"},{"_t":"CMYK","Cyan":0,"Magenta":92,"Yellow":58,"Key":12},{"_t":"int","_v":8388608}]}"#;

fn cmyk_type() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptorBuilder::new("CMYK")
            .field("Cyan", ScalarKind::Uint8)
            .field("Magenta", ScalarKind::Uint8)
            .field("Yellow", ScalarKind::Uint8)
            .field("Key", ScalarKind::Uint8)
            .build(),
    )
}

fn color_group_type() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptorBuilder::new("ColorGroup")
            .field("ID", ScalarKind::Int)
            .string_field("Name")
            .field_with_type("Colors", Arc::new(TypeDescriptor::slice_of(empty_interface())))
            .build(),
    )
}

fn boxed(desc: &Arc<TypeDescriptor>, value: DynamicValue) -> DynamicValue {
    DynamicData::from_value(desc, value)
        .expect("valid value")
        .into()
}

fn encode_options() -> EncodeOptions {
    EncodeOptions {
        discriminator: DiscriminatorConfig::new("_t", "_v", None),
        mode: EncodeMode::IF_REQUIRED,
    }
}

fn decode_options(resolver: Option<Arc<dyn TypeResolver>>) -> DecodeOptions {
    DecodeOptions {
        discriminator: DiscriminatorConfig::new("_t", "_v", resolver),
        ..DecodeOptions::default()
    }
}

fn registry_with(types: &[&Arc<TypeDescriptor>]) -> Arc<dyn TypeResolver> {
    let mut registry = TypeRegistry::new();
    for desc in types {
        registry.register(Arc::clone(desc));
    }
    Arc::new(registry)
}

fn color_group(cmyk: &Arc<TypeDescriptor>) -> DynamicData {
    let int = ScalarKind::Int.descriptor();
    let triple = Arc::new(TypeDescriptor::array_of(3, int.clone()));

    let mut color = DynamicData::new(cmyk);
    color.set("Magenta", 92u8).expect("set Magenta");
    color.set("Yellow", 58u8).expect("set Yellow");
    color.set("Key", 12u8).expect("set Key");

    let colors = vec![
        boxed(
            &triple,
            DynamicValue::Array(vec![220i64.into(), 20i64.into(), 60i64.into()]),
        ),
        boxed(&ScalarKind::String.descriptor(), "Red".into()),
        color.into(),
        boxed(&int, 8388608i64.into()),
    ];

    let mut group = DynamicData::new(&color_group_type());
    group.set("ID", 1i64).expect("set ID");
    group.set("Name", "Reds").expect("set Name");
    group
        .set("Colors", DynamicValue::Slice(colors))
        .expect("set Colors");
    group
}

#[test]
fn test_color_group_encode() {
    let group = color_group(&cmyk_type());
    let json = to_string_with(&group, &encode_options()).expect("encode");
    assert_eq!(json, COLOR_GROUP_JSON);
}

#[test]
fn test_color_group_decode() {
    let cmyk = cmyk_type();
    let decoded = from_slice_with(
        COLOR_GROUP_JSON.as_bytes(),
        &color_group_type(),
        decode_options(Some(registry_with(&[&cmyk]))),
    )
    .expect("decode");

    assert_eq!(decoded, color_group(&cmyk));

    let colors = decoded.get_field("Colors").expect("Colors");
    let items = colors.as_sequence().expect("slice");
    let names: Vec<String> = items
        .iter()
        .map(|item| item.as_interface().expect("interface").type_name().into_owned())
        .collect();
    assert_eq!(names, ["[3]int", "string", "CMYK", "int"]);

    // The resolver's descriptor is stored as is.
    let stored = items[2].as_interface().expect("interface");
    assert!(Arc::ptr_eq(stored.descriptor(), &cmyk));
}

#[test]
fn test_roundtrip_every_kind() {
    let cmyk = cmyk_type();
    let string = ScalarKind::String.descriptor();
    let int = ScalarKind::Int.descriptor();

    let mut labels = BTreeMap::new();
    labels.insert("a".to_string(), DynamicValue::I64(1));
    labels.insert("b".to_string(), DynamicValue::I64(-2));
    let mut by_id = BTreeMap::new();
    by_id.insert("7".to_string(), DynamicValue::String("seven".into()));

    let nested_any = Arc::new(TypeDescriptor::slice_of(empty_interface()));
    let items = vec![
        boxed(&ScalarKind::Bool.descriptor(), true.into()),
        boxed(&ScalarKind::Int8.descriptor(), (-5i8).into()),
        boxed(&ScalarKind::Int16.descriptor(), 300i16.into()),
        boxed(&ScalarKind::Int32.descriptor(), (-70000i32).into()),
        boxed(&ScalarKind::Int64.descriptor(), i64::MIN.into()),
        boxed(&ScalarKind::Uint.descriptor(), 9u64.into()),
        boxed(&ScalarKind::Uint8.descriptor(), 200u8.into()),
        boxed(&ScalarKind::Uint16.descriptor(), 65535u16.into()),
        boxed(&ScalarKind::Uint32.descriptor(), 4000000000u32.into()),
        boxed(&ScalarKind::Uint64.descriptor(), u64::MAX.into()),
        boxed(&ScalarKind::Uintptr.descriptor(), 4096u64.into()),
        boxed(&ScalarKind::Float32.descriptor(), 1.5f32.into()),
        boxed(&ScalarKind::Float64.descriptor(), 0.1f64.into()),
        boxed(&string, "quote \" and \\ slash".into()),
        boxed(
            &Arc::new(TypeDescriptor::slice_of(string.clone())),
            DynamicValue::Slice(vec!["x".into(), "y".into()]),
        ),
        boxed(
            &Arc::new(TypeDescriptor::map_of(string.clone(), int.clone())),
            DynamicValue::Map(labels),
        ),
        boxed(
            &Arc::new(TypeDescriptor::map_of(int.clone(), string.clone())),
            DynamicValue::Map(by_id),
        ),
        boxed(
            &nested_any,
            DynamicValue::Slice(vec![
                boxed(&int, 1i64.into()),
                DynamicValue::Null,
                DynamicData::new(&cmyk).into(),
            ]),
        ),
        DynamicValue::Null,
        DynamicData::new(&cmyk).into(),
    ];

    let holder = Arc::new(
        TypeDescriptorBuilder::new("Holder")
            .field_with_type("Items", nested_any.clone())
            .build(),
    );
    let mut data = DynamicData::new(&holder);
    data.set("Items", DynamicValue::Slice(items)).expect("set Items");

    let json = to_string_with(&data, &encode_options()).expect("encode");
    let decoded = from_slice_with(
        json.as_bytes(),
        &holder,
        decode_options(Some(registry_with(&[&cmyk]))),
    )
    .expect("decode");
    assert_eq!(decoded, data, "round trip of {}", json);
}

#[test]
fn test_pointer_values_come_back_as_pointees() {
    let cmyk = cmyk_type();
    let ptr = Arc::new(TypeDescriptor::pointer_to(cmyk.clone()));
    let mut color = DynamicData::new(&cmyk);
    color.set("Cyan", 10u8).expect("set Cyan");

    let slot = empty_interface();
    let data = DynamicData::from_value(
        &slot,
        boxed(&ptr, DynamicValue::Pointer(Box::new(color.value().clone()))),
    )
    .expect("interface");

    let json = to_string_with(&data, &encode_options()).expect("encode");
    assert_eq!(json, r#"{"_t":"CMYK","Cyan":10,"Magenta":0,"Yellow":0,"Key":0}"#);

    let decoded = from_slice_with(
        json.as_bytes(),
        &slot,
        decode_options(Some(registry_with(&[&cmyk]))),
    )
    .expect("decode");
    let inner = decoded.value().as_interface().expect("interface");
    assert_eq!(inner, &color);

    // A "*CMYK" tag is honored on decode.
    let decoded = from_slice_with(
        br#"{"_t":"*CMYK","_v":{"Key":3}}"#,
        &slot,
        decode_options(Some(registry_with(&[&cmyk]))),
    )
    .expect("decode pointer");
    let inner = decoded.value().as_interface().expect("interface");
    assert_eq!(inner.type_name(), "*CMYK");
    assert_eq!(
        inner.value().pointee().get_field("Key").and_then(|v| v.as_u64()),
        Some(3)
    );
}

#[test]
fn test_closure_resolver() {
    let cmyk = cmyk_type();
    let found = Arc::clone(&cmyk);
    let resolver: Arc<dyn TypeResolver> =
        Arc::new(move |name: &str| (name == "CMYK").then(|| Arc::clone(&found)));

    let decoded = from_slice_with(
        br#"{"_t":"map[string]CMYK","red":{"Magenta":255}}"#,
        &empty_interface(),
        decode_options(Some(resolver)),
    )
    .expect("decode");
    let inner = decoded.value().as_interface().expect("interface");
    assert_eq!(inner.type_name(), "map[string]CMYK");
    let red = inner.value().as_map().and_then(|m| m.get("red")).expect("red");
    assert_eq!(red.get_field("Magenta").and_then(|v| v.as_u64()), Some(255));
    assert_eq!(red.get_field("Key").and_then(|v| v.as_u64()), Some(0));
}

#[test]
fn test_decode_errors() {
    let group = color_group_type();
    let decode = |input: &str| from_slice_with(input.as_bytes(), &group, decode_options(None));

    let err = decode(r#"{"ID":1,"Name":"Reds","Colors":[{"_t":5,"_v":1}]}"#).expect_err("number tag");
    assert!(matches!(err, Error::InvalidDiscriminatorTypeFieldValue(38)));
    assert_eq!(err.to_string(), "discriminator type at offset 38 is not string");

    assert!(matches!(
        decode(r#"{"Colors":[{"Cyan":1}]}"#),
        Err(Error::MissingDiscriminator)
    ));
    assert!(matches!(
        decode(r#"{"Colors":[{"_t":"CMYK","Cyan":1}]}"#),
        Err(Error::InvalidDiscriminatorType(name)) if name == "CMYK"
    ));
    assert!(matches!(
        decode(r#"{"Colors":[{"_t":"[99999999999999999999999]int","_v":[]}]}"#),
        Err(Error::InvalidDiscriminatorType(_))
    ));
    assert!(matches!(
        decode(r#"{"Colors":[{"_t":"[][]int","_v":[]}]}"#),
        Err(Error::InvalidDiscriminatorType(_))
    ));
    assert!(matches!(
        decode(r#"{"Colors":[{"_t":"complex128","_v":1}]}"#),
        Err(Error::UnsupportedDiscriminatorKind(_))
    ));
    assert!(matches!(
        decode(r#"{"Colors":[{"_t":"string"}]}"#),
        Err(Error::MissingDiscriminatorValue(name)) if name == "string"
    ));
    assert!(matches!(
        decode(r#"{"Colors":[{"_t":"int","_v":"1"}]}"#),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        decode(r#"{"Colors":[{"_t" "int"}]}"#),
        Err(Error::MalformedDiscriminatorObject { .. })
    ));

    let pipe: Arc<dyn TypeResolver> = Arc::new(|name: &str| {
        (name == "Pipe")
            .then(|| Arc::new(TypeDescriptor::chan_of(ScalarKind::Int.descriptor())))
    });
    assert!(matches!(
        from_slice_with(
            br#"{"Colors":[{"_t":"Pipe","_v":null}]}"#,
            &group,
            decode_options(Some(pipe)),
        ),
        Err(Error::UnsupportedScalarKind(kind)) if kind == "chan"
    ));
}

#[test]
fn test_discriminator_keys_ignored_outside_slots() {
    let cmyk = cmyk_type();
    let mut options = decode_options(None);
    options.disallow_unknown_fields = true;

    let decoded = from_slice_with(br#"{"_t":"Other","Key":4,"_v":1}"#, &cmyk, options.clone())
        .expect("decode");
    assert_eq!(decoded.get::<u8>("Key").expect("Key"), 4);

    assert!(matches!(
        from_slice_with(br#"{"Key":4,"Black":1}"#, &cmyk, options),
        Err(Error::UnknownField(field)) if field == "Black"
    ));
}

#[test]
fn test_stream_encoder_and_decoder() {
    let cmyk = cmyk_type();
    let group = color_group(&cmyk);

    let mut encoder = Encoder::new(Vec::new());
    encoder.set_discriminator("_t", "_v", EncodeMode::IF_REQUIRED);
    encoder.encode(&group).expect("first");
    encoder.encode(&group).expect("second");
    let out = encoder.into_inner();

    let mut decoder = Decoder::new(&out);
    decoder.set_discriminator("_t", "_v", Some(registry_with(&[&cmyk])));
    let desc = color_group_type();
    let mut count = 0;
    while decoder.more() {
        let value = decoder.decode(&desc).expect("decode");
        assert_eq!(value, group);
        count += 1;
    }
    assert_eq!(count, 2);
    assert_eq!(decoder.offset(), out.len());
}

#[test]
fn test_untagged_values_without_discriminator() {
    let decoded = from_slice_with(
        br#"{"Colors":[{"_t":"int","_v":1},"plain",2.5,null]}"#,
        &color_group_type(),
        DecodeOptions::default(),
    )
    .expect("decode");
    let colors = decoded.get_field("Colors").expect("Colors");
    let items = colors.as_sequence().expect("slice");

    let first = items[0].as_interface().expect("interface");
    assert_eq!(first.type_name(), "map[string]interface {}");
    assert_eq!(
        items[2].as_interface().map(|d| d.value().clone()),
        Some(DynamicValue::F64(2.5))
    );
    assert!(items[3].is_null());
}
