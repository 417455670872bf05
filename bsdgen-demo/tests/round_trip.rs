//! Round trips through the generated demo types.

use bsdgen_demo::*;
use bsdgen_types::{ByteString, DateTime, Guid, NodeId, Variant};

fn round_trip<T: BinaryEncoder + PartialEq + std::fmt::Debug>(value: &T) -> Vec<u8> {
    let bytes = value.encode_to_vec().expect("Failed to encode");
    assert_eq!(bytes.len(), value.byte_len());

    let mut stream = bytes.as_slice();
    let decoded = T::decode(&mut stream).expect("Failed to decode");
    assert_eq!(&decoded, value);
    assert!(stream.is_empty(), "decode left {} bytes unread", stream.len());
    bytes
}

fn create_header() -> RequestHeader {
    RequestHeader {
        authentication_token: NodeId::string(1, "session-token"),
        timestamp: DateTime::from_ticks(133_000_000_000_000_000),
        request_handle: 42,
        server_uri: "opc.tcp://localhost:4840".to_string(),
        session_id: Guid::new_random(),
        additional_header: Variant::Int32(7),
    }
}

#[test]
fn test_length_determinant_encoding() {
    let foo = Foo {
        items: vec![10, 20, 30],
    };
    let bytes = round_trip(&foo);

    assert_eq!(
        bytes,
        [3, 0, 0, 0, 10, 0, 0, 0, 20, 0, 0, 0, 30, 0, 0, 0]
    );
}

#[test]
fn test_negative_count_decodes_empty() {
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF];
    let foo = Foo::decode(&mut bytes.as_slice()).expect("Failed to decode");
    assert!(foo.items.is_empty());
}

#[test]
fn test_truncated_array_fails() {
    let bytes = [2, 0, 0, 0, 1, 0, 0, 0];
    assert!(matches!(
        Foo::decode(&mut bytes.as_slice()),
        Err(EncodingError::Io(_))
    ));
}

#[test]
fn test_closed_enum() {
    assert_eq!(round_trip(&Color::Green), [2, 0, 0, 0]);
    assert_eq!(Color::Red.value(), 1);

    let bytes = [3, 0, 0, 0];
    match Color::decode(&mut bytes.as_slice()) {
        Err(EncodingError::UnknownVariant { type_name, value }) => {
            assert_eq!(type_name, "Color");
            assert_eq!(value, 3);
        }
        other => panic!("expected unknown variant, got {other:?}"),
    }
}

#[test]
fn test_enum_default_variant() {
    assert_eq!(Priority::default(), Priority::Normal);
    assert_eq!(round_trip(&Priority::Low), [0xFF]);
    assert_eq!(Priority::from_value(1).expect("known value"), Priority::High);

    let bytes = [0x7F];
    let decoded = Priority::decode(&mut bytes.as_slice()).expect("Failed to decode");
    assert_eq!(decoded, Priority::Normal);
}

#[test]
fn test_switch_mask_encoding() {
    let bar = Bar {
        x: Some(5),
        y: None,
    };
    assert_eq!(round_trip(&bar), [0b01, 5, 0, 0, 0]);

    let both = Bar {
        x: Some(-1),
        y: Some(2),
    };
    assert_eq!(
        round_trip(&both),
        [0b11, 0xFF, 0xFF, 0xFF, 0xFF, 2, 0, 0, 0]
    );

    let neither = Bar { x: None, y: None };
    assert_eq!(round_trip(&neither), [0]);
}

#[test]
fn test_switch_mask_decoding_ignores_cleared_bits() {
    let bytes = [0b10, 9, 0, 0, 0];
    let bar = Bar::decode(&mut bytes.as_slice()).expect("Failed to decode");
    assert_eq!(bar, Bar { x: None, y: Some(9) });
}

#[test]
fn test_nested_forward_references() {
    let envelope = Envelope {
        header: create_header(),
        points: vec![
            Point {
                x: 1.5,
                y: -2.25,
                type_: 3,
            },
            Point {
                x: 0.0,
                y: 0.0,
                type_: -1,
            },
        ],
        priority: Priority::High,
        timeout: 2500.0,
    };
    round_trip(&envelope);
}

#[test]
fn test_auto_assigned_switch_bits() {
    let attachment = Attachment {
        name: Some("diagram".to_string()),
        picture: None,
        origin: Some(Point {
            x: 10.0,
            y: 20.0,
            type_: 0,
        }),
        shade: Some(Color::Red),
        tags: vec!["a".to_string(), "bc".to_string()],
        flag: true,
        sequence: u64::MAX,
        offset: i64::MIN,
        delta: -300,
        raw: ByteString(vec![0xDE, 0xAD]),
    };
    let bytes = round_trip(&attachment);

    // Name takes bit 0, Shade bit 2, Origin its explicit bit 8.
    assert_eq!(&bytes[..2], &[0b0000_0101, 0b0000_0001]);
}

#[test]
fn test_optional_alias_of_opaque() {
    let attachment = Attachment {
        name: None,
        picture: Some(ByteString(vec![1, 2, 3])),
        origin: None,
        shade: None,
        tags: Vec::new(),
        flag: false,
        sequence: 0,
        offset: 0,
        delta: 0,
        raw: ByteString::default(),
    };
    let bytes = round_trip(&attachment);
    assert_eq!(&bytes[..2], &[0b0000_0010, 0]);
}

#[test]
fn test_empty_struct() {
    assert!(round_trip(&Empty {}).is_empty());
}

#[test]
fn test_aliases() {
    let timeout: Duration = 1.0;
    let handle: Counter = 7;
    let image: Image = ByteString(vec![9]);
    assert_eq!(round_trip(&timeout).len(), 8);
    assert_eq!(round_trip(&handle), [7, 0, 0, 0]);
    assert_eq!(round_trip(&image), [1, 0, 0, 0, 9]);
}
