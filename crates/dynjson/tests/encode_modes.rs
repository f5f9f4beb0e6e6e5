// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic

//! Tag placement under each encode mode.

use dynjson::dynamic::{DynamicData, DynamicValue, ScalarKind, TypeDescriptor};
use dynjson::typename::empty_interface;
use dynjson::{
    from_slice_with, to_string_with, DecodeOptions, DiscriminatorConfig, EncodeMode,
    EncodeOptions, TypeDescriptorBuilder, TypeRegistry,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn options(mode: EncodeMode) -> EncodeOptions {
    EncodeOptions {
        discriminator: DiscriminatorConfig::new("_t", "_v", None),
        mode,
    }
}

fn encode(data: &DynamicData, mode: EncodeMode) -> String {
    to_string_with(data, &options(mode)).expect("encode")
}

fn vector3_type() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptorBuilder::new("Vector3")
            .path("geometry")
            .field("x", ScalarKind::Float64)
            .build(),
    )
}

fn pose(vector3: &Arc<TypeDescriptor>) -> DynamicData {
    let pose_type = Arc::new(
        TypeDescriptorBuilder::new("Pose")
            .path("geometry")
            .nested_field("position", vector3.clone())
            .interface_field("extra")
            .build(),
    );
    let mut position = DynamicData::new(vector3);
    position.set("x", 1.0f64).expect("set x");

    let mut data = DynamicData::new(&pose_type);
    data.set("position", position.into_value())
        .expect("set position");
    data
}

#[test]
fn test_if_required_leaves_plain_objects_untagged() {
    let data = pose(&vector3_type());
    assert_eq!(
        encode(&data, EncodeMode::IF_REQUIRED),
        r#"{"position":{"x":1},"extra":null}"#
    );
}

#[test]
fn test_root_value() {
    let vector3 = vector3_type();
    let data = pose(&vector3);
    assert_eq!(
        encode(&data, EncodeMode::ROOT_VALUE),
        r#"{"_t":"Pose","position":{"x":1},"extra":null}"#
    );

    // Only structs and maps take a root tag.
    let scalar = DynamicData::of(ScalarKind::Int, 5i64).expect("int");
    assert_eq!(encode(&scalar, EncodeMode::ROOT_VALUE), "5");

    // Pointers are followed to the struct.
    let ptr = Arc::new(TypeDescriptor::pointer_to(vector3.clone()));
    let boxed = DynamicData::from_value(
        &ptr,
        DynamicValue::Pointer(Box::new(DynamicData::new(&vector3).into_value())),
    )
    .expect("ptr");
    assert_eq!(
        encode(&boxed, EncodeMode::ROOT_VALUE),
        r#"{"_t":"Vector3","x":0}"#
    );
}

#[test]
fn test_all_objects() {
    let vector3 = vector3_type();
    let mut data = pose(&vector3);
    data.set("extra", DynamicData::new(&vector3)).expect("set extra");
    assert_eq!(
        encode(&data, EncodeMode::ALL_OBJECTS),
        r#"{"_t":"Pose","position":{"_t":"Vector3","x":1},"extra":{"_t":"Vector3","x":0}}"#
    );

    let counts = Arc::new(TypeDescriptor::map_of(
        ScalarKind::String.descriptor(),
        ScalarKind::Int.descriptor(),
    ));
    let mut entries = BTreeMap::new();
    entries.insert("a".to_string(), DynamicValue::I64(1));
    let map = DynamicData::from_value(&counts, DynamicValue::Map(entries)).expect("map");
    assert_eq!(
        encode(&map, EncodeMode::ALL_OBJECTS),
        r#"{"_t":"map[string]int","a":1}"#
    );
}

#[test]
fn test_with_path() {
    let vector3 = vector3_type();
    let mut data = pose(&vector3);
    let list = Arc::new(TypeDescriptor::slice_of(vector3.clone()));
    let items = DynamicData::from_value(
        &list,
        DynamicValue::Slice(vec![DynamicData::new(&vector3).into_value()]),
    )
    .expect("slice");
    data.set("extra", items).expect("set extra");

    let json = encode(&data, EncodeMode::ROOT_VALUE | EncodeMode::WITH_PATH);
    assert_eq!(
        json,
        r#"{"_t":"geometry.Pose","position":{"x":1},"extra":{"_t":"[]geometry.Vector3","_v":[{"x":0}]}}"#
    );

    // Qualified names resolve through the registry.
    let mut registry = TypeRegistry::new();
    registry.register(vector3.clone());
    let decode = DecodeOptions {
        discriminator: DiscriminatorConfig::new("_t", "_v", Some(Arc::new(registry))),
        ..DecodeOptions::default()
    };
    let decoded = from_slice_with(json.as_bytes(), data.descriptor(), decode).expect("decode");
    assert_eq!(decoded, data);
}

#[test]
fn test_nil_map_clears_pending_tag() {
    let counts = Arc::new(TypeDescriptor::map_of(
        ScalarKind::String.descriptor(),
        ScalarKind::Int.descriptor(),
    ));
    let holder = Arc::new(
        TypeDescriptorBuilder::new("Holder")
            .field_with_type("counts", counts.clone())
            .interface_field("value")
            .build(),
    );
    let mut data = DynamicData::new(&holder);
    data.set("value", DynamicData::new(&counts)).expect("set nil map");

    assert_eq!(
        encode(&data, EncodeMode::IF_REQUIRED),
        r#"{"counts":null,"value":null}"#
    );
    assert_eq!(
        encode(&data, EncodeMode::ROOT_VALUE),
        r#"{"_t":"Holder","counts":null,"value":null}"#
    );
}

#[test]
fn test_custom_field_names() {
    let any = empty_interface();
    let data = DynamicData::from_value(
        &any,
        DynamicData::of(ScalarKind::Bool, true).expect("bool").into(),
    )
    .expect("interface");

    let custom = EncodeOptions {
        discriminator: DiscriminatorConfig::new("kind", "data", None),
        mode: EncodeMode::IF_REQUIRED,
    };
    assert_eq!(
        to_string_with(&data, &custom).expect("encode"),
        r#"{"kind":"bool","data":true}"#
    );

    let settings_mode: EncodeMode = "root_value | all_objects".parse().expect("mode");
    assert_eq!(settings_mode, EncodeMode::ROOT_VALUE | EncodeMode::ALL_OBJECTS);
}
