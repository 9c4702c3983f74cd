#![allow(dead_code)]

use prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor, ReflectMessage, Value};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto,
};

pub const ID_FILE: &str = "strata/test/id.proto";
pub const ENTITY_KIND_FILE: &str = "strata/test/entity_kind.proto";
pub const TIMESTAMP_FILE: &str = "google/protobuf/timestamp.proto";
pub const ANY_FILE: &str = "google/protobuf/any.proto";

fn field(name: &str, number: i32, kind: Type, type_name: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(kind as i32),
        type_name: type_name.map(str::to_owned),
        ..Default::default()
    }
}

/// `strata/test/id.proto`: `message ID { string ns = 1; string value = 2; }`
pub fn id_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(ID_FILE.to_owned()),
        package: Some("strata.test".to_owned()),
        message_type: vec![DescriptorProto {
            name: Some("ID".to_owned()),
            field: vec![
                field("ns", 1, Type::String, None),
                field("value", 2, Type::String, None),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".to_owned()),
        ..Default::default()
    }
}

/// `strata/test/entity_kind.proto`, importing the ID, Timestamp and Any files,
/// with a nested `Status` enum.
pub fn entity_kind_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(ENTITY_KIND_FILE.to_owned()),
        package: Some("strata.test".to_owned()),
        dependency: vec![
            ID_FILE.to_owned(),
            TIMESTAMP_FILE.to_owned(),
            ANY_FILE.to_owned(),
        ],
        message_type: vec![DescriptorProto {
            name: Some("EntityKind".to_owned()),
            field: vec![
                field("id", 1, Type::Message, Some(".strata.test.ID")),
                field("label", 2, Type::String, None),
                field("created", 3, Type::Message, Some(".google.protobuf.Timestamp")),
                field("payload", 4, Type::Message, Some(".google.protobuf.Any")),
                field("status", 5, Type::Enum, Some(".strata.test.EntityKind.Status")),
            ],
            enum_type: vec![EnumDescriptorProto {
                name: Some("Status".to_owned()),
                value: vec![
                    enum_value("STATUS_UNSPECIFIED", 0),
                    enum_value("STATUS_ACTIVE", 1),
                ],
                ..Default::default()
            }],
            ..Default::default()
        }],
        syntax: Some("proto3".to_owned()),
        ..Default::default()
    }
}

fn enum_value(name: &str, number: i32) -> EnumValueDescriptorProto {
    EnumValueDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        ..Default::default()
    }
}

pub fn timestamp_file() -> FileDescriptorProto {
    prost_types::Timestamp::default()
        .descriptor()
        .parent_file()
        .file_descriptor_proto()
        .clone()
}

pub fn any_file() -> FileDescriptorProto {
    prost_types::Any::default()
        .descriptor()
        .parent_file()
        .file_descriptor_proto()
        .clone()
}

/// A pool holding the test files and the well-known files they import.
pub fn fixture_pool() -> DescriptorPool {
    let mut pool = DescriptorPool::new();
    pool.add_file_descriptor_protos([timestamp_file(), any_file(), id_file(), entity_kind_file()])
        .expect("fixture descriptors are valid");
    pool
}

pub fn message(pool: &DescriptorPool, name: &str) -> MessageDescriptor {
    pool.get_message_by_name(name)
        .unwrap_or_else(|| panic!("{name} is in the fixture pool"))
}

pub fn id(pool: &DescriptorPool, value: &str) -> DynamicMessage {
    let mut id = DynamicMessage::new(message(pool, "strata.test.ID"));
    id.set_field_by_name("ns", Value::String("test".to_owned()));
    id.set_field_by_name("value", Value::String(value.to_owned()));
    id
}

/// An `Any` holding `payload`, under the standard type URL prefix.
pub fn pack(payload: &DynamicMessage) -> prost_types::Any {
    prost_types::Any {
        type_url: format!(
            "type.googleapis.com/{}",
            payload.descriptor().full_name()
        ),
        value: payload.encode_to_vec(),
    }
}

/// An `EntityKind` whose `payload` packs an `ID`.
pub fn entity_kind(pool: &DescriptorPool) -> DynamicMessage {
    let mut kind = DynamicMessage::new(message(pool, "strata.test.EntityKind"));
    kind.set_field_by_name("id", Value::Message(id(pool, "kind")));
    kind.set_field_by_name("label", Value::String("Demo kind".to_owned()));
    kind.set_field_by_name("status", Value::EnumNumber(1));
    kind.set_field_by_name("payload", Value::Message(any_message(pool, &pack(&id(pool, "inner")))));
    kind
}

/// `any` as a dynamic `google.protobuf.Any` of `pool`.
pub fn any_message(pool: &DescriptorPool, any: &prost_types::Any) -> DynamicMessage {
    let mut message = DynamicMessage::new(message(pool, "google.protobuf.Any"));
    message
        .transcode_from(any)
        .expect("Any transcodes into the fixture pool");
    message
}
