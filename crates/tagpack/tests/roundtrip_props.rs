use proptest::prelude::*;
use tagpack::{pack, packed_size, unpack, Format, Map, Value};

/// Values over the kinds the binary codec both packs and unpacks.
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::NONE),
        any::<bool>().prop_map(Value::bool),
        any::<u64>().prop_map(Value::uint),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::str),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::array),
            proptest::collection::btree_map("[a-z]{1,8}", inner, 0..6).prop_map(|m| {
                Value::map(m.into_iter().collect::<Map>())
            }),
        ]
    })
}

proptest! {
    /// decode(encode(v)) == v for every value the binary codec supports.
    #[test]
    fn binary_roundtrip(value in value_strategy()) {
        let buf = pack(&value, Format::Binary).unwrap();
        let bytes = buf.to_vec().unwrap();
        let decoded = unpack(&bytes, Format::Binary).unwrap();
        prop_assert_eq!(decoded, value);
    }

    /// The sink dry-run always agrees with the real encoded length, for
    /// both formats.
    #[test]
    fn packed_size_agrees(value in value_strategy()) {
        for format in [Format::Binary, Format::Text] {
            let buf = pack(&value, format).unwrap();
            prop_assert_eq!(packed_size(&value, format).unwrap(), buf.used());
        }
    }

    /// Integer encodings are byte-minimal: no wider form is ever chosen
    /// when a narrower one holds the value exactly.
    #[test]
    fn canonical_minimal_width(n in any::<u64>()) {
        let expected = if n <= 23 {
            1
        } else if n <= 0xff {
            2
        } else if n <= 0xffff {
            3
        } else if n <= 0xffff_ffff {
            5
        } else {
            9
        };
        prop_assert_eq!(packed_size(&Value::uint(n), Format::Binary).unwrap(), expected);
    }

    /// Text output is always parseable JSON that matches the value's JSON
    /// image.
    #[test]
    fn text_output_is_json(value in value_strategy()) {
        let buf = pack(&value, Format::Text).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(buf.as_slice().unwrap()).unwrap();
        prop_assert_eq!(parsed, serde_json::Value::from(&value));
    }
}
