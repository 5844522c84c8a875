//! Codec Tests
//!
//! Tests for write/read streams, envelopes and the stream helpers.

use std::io::Cursor;
use zonewire::protocol::{
    read_message, write_message, Basis, Dictionary, Message, ReadStream, Transform, Variant,
    VariantType, Vector3, WriteStream,
};
use zonewire::{BufferPolicy, CodecConfig, WireError};

/// Bytes after the 16-byte envelope header
fn args(bytes: &[u8]) -> &[u8] {
    &bytes[16..]
}

/// Reader positioned at the first argument
fn open(bytes: &[u8]) -> ReadStream<'_> {
    let mut stream = ReadStream::new(bytes).unwrap();
    stream.read_event_code().unwrap();
    stream
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_int() {
    let mut writer = WriteStream::new(2, 0).unwrap();
    writer.write_int(42, true).unwrap();
    let bytes = writer.into_bytes();

    // Expected: [02 00 00 00][2A 00 00 00]
    //           INT tag      42
    assert_eq!(args(&bytes), &[0x02, 0x00, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00]);
    assert_eq!(open(&bytes).read_int(true).unwrap(), 42);
}

#[test]
fn test_wire_format_string() {
    let mut writer = WriteStream::new(2, 0).unwrap();
    writer.write_string("hi", true).unwrap();
    let bytes = writer.into_bytes();

    // Expected: [04 00 00 00][02 00 00 00][68 69 00 00]
    //           STRING tag   len = 2      "hi" + pad
    assert_eq!(
        args(&bytes),
        &[0x04, 0, 0, 0, 0x02, 0, 0, 0, 0x68, 0x69, 0x00, 0x00]
    );
    assert_eq!(open(&bytes).read_string(true).unwrap(), "hi");
}

#[test]
fn test_wire_format_vector3() {
    let mut writer = WriteStream::new(2, 0).unwrap();
    writer
        .write_vector3(Vector3::new(1.0, 2.0, 3.0), true)
        .unwrap();
    let bytes = writer.into_bytes();
    assert_eq!(args(&bytes).len(), 16);

    let v = open(&bytes).read_vector3(true).unwrap();
    assert_eq!(v.x.to_bits(), 1.0f32.to_bits());
    assert_eq!(v.y.to_bits(), 2.0f32.to_bits());
    assert_eq!(v.z.to_bits(), 3.0f32.to_bits());
}

#[test]
fn test_wire_format_envelope() {
    let mut writer = WriteStream::new(2, 7).unwrap();
    writer.write_int(99, true).unwrap();
    let bytes = writer.into_bytes();

    // Expected: [ARRAY][count=2][INT][7][INT][99]
    assert_eq!(&bytes[0..4], &[19, 0, 0, 0]);
    assert_eq!(&bytes[4..8], &[2, 0, 0, 0]);

    let mut reader = ReadStream::new(&bytes).unwrap();
    assert_eq!(reader.element_count(), 2);
    assert_eq!(reader.read_event_code().unwrap(), 7);
    assert_eq!(reader.read_int(true).unwrap(), 99);
    assert!(reader.is_empty());
}

#[test]
fn test_wire_format_basis_row_major() {
    let basis = Basis::from_rows(
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(4.0, 5.0, 6.0),
        Vector3::new(7.0, 8.0, 9.0),
    );
    let mut writer = WriteStream::new(2, 0).unwrap();
    writer.write_basis(&basis, true).unwrap();
    let bytes = writer.into_bytes();

    let payload = &args(&bytes)[4..];
    for (i, chunk) in payload.chunks(4).enumerate() {
        let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        assert_eq!(value, (i + 1) as f32);
    }
    assert_eq!(open(&bytes).read_basis(true).unwrap(), basis);
}

// =============================================================================
// Typed Read Tests
// =============================================================================

#[test]
fn test_typed_reads_in_order() {
    let transform = Transform::new(Basis::IDENTITY, Vector3::new(10.0, -4.5, 0.25));
    let mut writer = WriteStream::new(7, 12).unwrap();
    writer.write_bool(true, true).unwrap();
    writer.write_float(-0.5, true).unwrap();
    writer.write_string("player_1", true).unwrap();
    writer.write_transform(&transform, true).unwrap();
    writer.write_byte_array(&[1, 2, 3, 4], true).unwrap();
    writer.write_int(i32::MIN, true).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = ReadStream::new(&bytes).unwrap();
    assert_eq!(reader.element_count(), 7);
    assert_eq!(reader.read_event_code().unwrap(), 12);
    assert!(reader.read_bool(true).unwrap());
    assert_eq!(reader.read_float(true).unwrap(), -0.5);
    assert_eq!(reader.read_string(true).unwrap(), "player_1");
    assert_eq!(reader.read_transform(true).unwrap(), transform);
    assert_eq!(reader.read_byte_array(true).unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(reader.read_int(true).unwrap(), i32::MIN);
    assert!(reader.is_empty());
}

#[test]
fn test_dictionary_of_transforms() {
    let spawns = vec![
        ("north", Transform::from_origin(Vector3::new(0.0, 0.0, 50.0))),
        ("south", Transform::from_origin(Vector3::new(0.0, 0.0, -50.0))),
    ];

    let mut writer = WriteStream::new(2, 4).unwrap();
    writer
        .write_dictionary(
            spawns.iter().map(|(k, v)| (*k, v)),
            |w, key| w.write_string(key, true),
            |w, value| w.write_transform(value, true),
            true,
        )
        .unwrap();
    let bytes = writer.into_bytes();

    let mut reader = open(&bytes);
    let decoded = reader
        .read_dictionary(|r| r.read_string(true), |r| r.read_transform(true), true)
        .unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].0, "north");
    assert_eq!(decoded[0].1, spawns[0].1);
    assert_eq!(decoded[1].0, "south");
    assert_eq!(decoded[1].1, spawns[1].1);
}

#[test]
fn test_untagged_reads_follow_untagged_writes() {
    let mut writer = WriteStream::new(2, 0).unwrap();
    writer.write_string("raw", false).unwrap();
    writer.write_vector3(Vector3::ZERO, false).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = open(&bytes);
    assert_eq!(reader.read_string(false).unwrap(), "raw");
    assert_eq!(reader.read_vector3(false).unwrap(), Vector3::ZERO);
    assert!(reader.is_empty());
}

#[test]
fn test_skip_past_known_fields() {
    let mut writer = WriteStream::new(3, 1).unwrap();
    writer.write_vector3(Vector3::new(9.0, 9.0, 9.0), true).unwrap();
    writer.write_int(5, true).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = open(&bytes);
    assert_eq!(reader.peek_tag().unwrap(), VariantType::Vector3.tag());
    reader.skip(16).unwrap();
    assert_eq!(reader.read_int(true).unwrap(), 5);
}

// =============================================================================
// Generic Read Tests
// =============================================================================

#[test]
fn test_read_next_every_kind() {
    let mut dict = Dictionary::new();
    dict.insert("hp", 100);
    dict.insert("pos", Vector3::new(1.0, 2.0, 3.0));

    let values = vec![
        Variant::Bool(false),
        Variant::Int(-7),
        Variant::Float(3.25),
        Variant::from("abc"),
        Variant::from(Vector3::new(0.5, 0.5, 0.5)),
        Variant::from(Basis::IDENTITY),
        Variant::from(Transform::default()),
        Variant::from(dict),
        Variant::Array(vec![Variant::Int(1), Variant::from("two")]),
        Variant::ByteArray(vec![9, 8, 7, 6]),
    ];

    let mut writer = WriteStream::new(values.len() + 1, 0).unwrap();
    for value in &values {
        writer.write_variant(value).unwrap();
    }
    let bytes = writer.into_bytes();

    let mut reader = open(&bytes);
    for expected in &values {
        assert_eq!(&reader.read_next().unwrap(), expected);
    }
    assert!(reader.is_empty());
}

#[test]
fn test_read_all_includes_event_code() {
    let bytes = Message::new(9)
        .with_arg(1)
        .with_arg("x")
        .encode(&CodecConfig::default())
        .unwrap();

    let mut reader = ReadStream::new(&bytes).unwrap();
    assert_eq!(
        reader.read_all(),
        vec![Variant::Int(9), Variant::Int(1), Variant::from("x")]
    );
}

#[test]
fn test_read_all_stops_at_truncation() {
    let bytes = Message::new(9)
        .with_arg(1)
        .with_arg("truncated")
        .encode(&CodecConfig::default())
        .unwrap();

    let mut reader = ReadStream::new(&bytes[..bytes.len() - 4]).unwrap();
    assert_eq!(reader.read_all(), vec![Variant::Int(9), Variant::Int(1)]);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_type_mismatch_float_for_int() {
    let mut writer = WriteStream::new(2, 0).unwrap();
    writer.write_float(1.0, true).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = open(&bytes);
    let err = reader.read_int(true).unwrap_err();
    assert!(matches!(
        err,
        WireError::TypeMismatch {
            expected: VariantType::Int,
            found: 3
        }
    ));
    assert!(err.to_string().contains("Type mismatch"));
}

#[test]
fn test_truncated_string() {
    // String declares 10 bytes but only 4 follow
    let mut bytes = vec![19, 0, 0, 0, 2, 0, 0, 0];
    bytes.extend_from_slice(&[4, 0, 0, 0, 10, 0, 0, 0, b'a', b'b', b'c', b'd']);

    let mut reader = ReadStream::new(&bytes).unwrap();
    let err = reader.read_string(true).unwrap_err();
    assert!(matches!(
        err,
        WireError::OutOfRange {
            requested: 10,
            available: 4,
            ..
        }
    ));
    assert!(err.to_string().contains("Could not read value"));
}

#[test]
fn test_read_past_end() {
    let bytes = WriteStream::new(1, 0).unwrap().into_bytes();
    let mut reader = open(&bytes);
    assert!(matches!(reader.read_int(false), Err(WireError::OutOfRange { .. })));
    assert!(matches!(reader.read_float(false), Err(WireError::OutOfRange { .. })));
    assert!(matches!(reader.read_next(), Err(WireError::OutOfRange { .. })));
}

#[test]
fn test_capacity_exceeded_by_default() {
    let long = "x".repeat(2000);
    let mut writer = WriteStream::new(2, 0).unwrap();
    assert!(matches!(
        writer.write_string(&long, true),
        Err(WireError::CapacityExceeded { capacity: 1000, .. })
    ));
}

#[test]
fn test_growable_message() {
    let config = CodecConfig::builder()
        .buffer_policy(BufferPolicy::Growable)
        .build();
    let long = "x".repeat(2000);
    let message = Message::new(1).with_arg(long.as_str());
    let bytes = message.encode(&config).unwrap();
    assert_eq!(bytes.len(), 16 + 8 + 2000);
    assert_eq!(Message::decode(&bytes, &config).unwrap(), message);
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_message() {
    let config = CodecConfig::default();
    let message = Message::new(2)
        .with_arg("zone-a")
        .with_arg(Transform::from_origin(Vector3::new(1.0, 2.0, 3.0)));

    let mut buffer = Vec::new();
    write_message(&mut buffer, &message, &config).unwrap();
    assert_eq!(&buffer[0..4], &((buffer.len() - 4) as u32).to_le_bytes());

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_message(&mut cursor, &config).unwrap(), message);
}

#[test]
fn test_stream_multiple_messages() {
    let config = CodecConfig::default();
    let messages = vec![
        Message::new(1),
        Message::new(2).with_arg(true),
        Message::new(3).with_arg(vec![0xFFu8, 0x00, 0x7F]).with_arg(5),
    ];

    let mut buffer = Vec::new();
    for message in &messages {
        write_message(&mut buffer, message, &config).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &messages {
        assert_eq!(&read_message(&mut cursor, &config).unwrap(), expected);
    }
    assert!(matches!(
        read_message(&mut cursor, &config),
        Err(WireError::Io(_))
    ));
}
