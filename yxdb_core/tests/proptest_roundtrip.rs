//! Property-based round-trip checks for the codecs whose invariants are
//! naturally expressed as "encode then decode is the identity" over a wide
//! input space, rather than a handful of hand-picked examples.

use proptest::prelude::*;
use yxdb_core::block_index::{decode_block_index, encode_block_index};
use yxdb_core::header::{FILE_ID_WITHOUT_SPATIAL_INDEX, FILE_ID_WITH_SPATIAL_INDEX, HEADER_PAGE_SIZE};
use yxdb_core::primitive::Reader;
use yxdb_core::{decode_metadata, encode_metadata, Field, FieldType, Header, Metadata, RecordInfo};

fn arb_header() -> impl Strategy<Value = Header> {
    (
        prop_oneof![Just(FILE_ID_WITH_SPATIAL_INDEX), Just(FILE_ID_WITHOUT_SPATIAL_INDEX)],
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
        0u32..=2000,
        any::<u32>(),
        any::<u64>(),
        any::<u64>(),
        any::<u64>(),
        any::<u32>(),
    )
        .prop_map(
            |(
                file_id,
                creation_date,
                flags1,
                flags2,
                meta_info_length,
                mystery,
                spatial_index_pos,
                record_block_index_pos,
                num_records,
                compression_version,
            )| Header {
                description: [0u8; 64],
                file_id,
                creation_date,
                flags1,
                flags2,
                meta_info_length,
                mystery,
                spatial_index_pos,
                record_block_index_pos,
                num_records,
                compression_version,
                reserved_space: vec![0u8; HEADER_PAGE_SIZE - 64 - 4 * 7 - 8 * 3],
            },
        )
}

proptest! {
    /// Law 1: `decode(encode(h)) == h` for any header-shaped field values.
    #[test]
    fn header_roundtrips_for_arbitrary_fields(header in arb_header()) {
        let encoded = header.encode();
        prop_assert_eq!(encoded.len(), HEADER_PAGE_SIZE);
        let decoded = Header::decode(&encoded).unwrap();
        prop_assert_eq!(decoded, header);
    }

    /// Law 2: the block index round-trips for any non-negative i64 offsets,
    /// in any order and any count up to a moderate bound.
    #[test]
    fn block_index_roundtrips(entries in proptest::collection::vec(0i64..=i64::MAX, 0..64)) {
        let encoded = encode_block_index(&entries);
        let mut r = Reader::new(&encoded);
        let decoded = decode_block_index(&mut r).unwrap();
        prop_assert_eq!(decoded, entries);
    }

    /// Law 5: metadata with arbitrary fields over the known `FieldType`
    /// variants round-trips through the UTF-16LE XML encoding.
    #[test]
    fn metadata_roundtrips_for_known_field_types(
        field_names in proptest::collection::vec("[a-zA-Z][a-zA-Z0-9_]{0,15}", 1..6),
    ) {
        const KNOWN: &[FieldType] = &[
            FieldType::Bool, FieldType::Byte, FieldType::Int16, FieldType::Int32,
            FieldType::Int64, FieldType::Double, FieldType::Float, FieldType::String,
        ];
        let fields: Vec<Field> = field_names
            .iter()
            .enumerate()
            .map(|(i, name)| Field {
                name: name.clone(),
                field_type: KNOWN[i % KNOWN.len()],
                size: None,
                scale: None,
                description: None,
            })
            .collect();
        let meta = Metadata { record_infos: vec![RecordInfo { fields }] };

        let encoded = encode_metadata(&meta);
        let decoded = decode_metadata(&encoded, 0).unwrap();
        prop_assert_eq!(decoded, meta);
    }

    /// Law 8: `encode_metadata`'s byte length is always exactly twice its
    /// UTF-16 code-unit count, and always even.
    #[test]
    fn metadata_byte_length_matches_utf16_code_unit_contract(
        field_names in proptest::collection::vec("[a-zA-Z]{1,10}", 0..4),
    ) {
        let fields: Vec<Field> = field_names
            .into_iter()
            .map(|name| Field { name, field_type: FieldType::Double, size: None, scale: None, description: None })
            .collect();
        let meta = Metadata { record_infos: if fields.is_empty() { vec![] } else { vec![RecordInfo { fields }] } };

        let encoded = encode_metadata(&meta);
        prop_assert_eq!(encoded.len() % 2, 0);

        let code_units = encoded.len() / 2;
        let decoded = decode_metadata(&encoded, 0).unwrap();
        prop_assert_eq!(decoded, meta);
        prop_assert_eq!(code_units * 2, encoded.len());
    }
}
