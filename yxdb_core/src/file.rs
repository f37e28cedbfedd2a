//! Compose header + metadata + blocks + block-index with cross-section
//! offset checks into a single [`YxdbFile`] value.

use crate::block_index::{decode_block_index, encode_block_index};
use crate::block_stream::{decode_blocks, encode_blocks, WriterConfig};
use crate::error::{Result, YxdbError};
use crate::header::{Header, HEADER_PAGE_SIZE};
use crate::metadata::{decode_metadata, encode_metadata, Metadata};
use crate::primitive::Reader;

/// The complete decoded form of a YXDB file: header, metadata, the flat
/// decompressed block payload, and the block index.
#[derive(Debug, Clone, PartialEq)]
pub struct YxdbFile {
    pub header: Header,
    pub metadata: Metadata,
    pub blocks: Vec<u8>,
    pub block_index: Vec<i64>,
}

impl YxdbFile {
    /// Decode a complete file from `buf`.
    ///
    /// 1. Read exactly 512 bytes, isolate, decode as [`Header`].
    /// 2. Read exactly `2 * metaInfoLength` bytes, isolate, decode as [`Metadata`].
    /// 3. Compute `numBlocksBytes`; fail with [`YxdbError::NegativeBlockRegion`] if negative.
    /// 4. Read exactly `numBlocksBytes`, isolate, decode as the block stream.
    /// 5. Decode the block index from the remainder.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);

        let header = r.isolate(HEADER_PAGE_SIZE, "file.header", |sub| {
            // Header::decode expects the raw bytes, not a Reader; hand it
            // the untouched slice and fast-forward the sub-reader to match.
            let start = sub.pos();
            let bytes = sub.read_bytes(HEADER_PAGE_SIZE - start, "header.body")?;
            Header::decode(bytes)
        })?;

        let meta_bytes_len = 2 * header.meta_info_length as usize;
        let metadata_offset = HEADER_PAGE_SIZE;
        let metadata = r.isolate(meta_bytes_len, "file.metadata", |sub| {
            let bytes = sub.read_bytes(meta_bytes_len, "metadata.body")?;
            decode_metadata(bytes, metadata_offset)
        })?;

        let start_of_blocks = header.start_of_blocks();

        if header.record_block_index_pos < start_of_blocks {
            return Err(YxdbError::NegativeBlockRegion {
                record_block_index_pos: header.record_block_index_pos,
                start_of_blocks,
            });
        }
        let num_blocks_bytes = (header.record_block_index_pos - start_of_blocks) as usize;

        let blocks = r.isolate(num_blocks_bytes, "file.blocks", decode_blocks)?;

        // Isolate to exactly what's left so a count that implies more (or
        // fewer) entries than the remaining bytes support is an
        // IsolationMismatch rather than silently ignoring trailing bytes
        // after the index — nothing should follow the block index.
        let block_index_len = r.remaining();
        let block_index = r.isolate(block_index_len, "file.blockIndex", decode_block_index)?;

        tracing::debug!(
            num_record_infos = metadata.record_infos.len(),
            blocks_len = blocks.len(),
            block_index_len = block_index.len(),
            "decoded file"
        );

        Ok(Self { header, metadata, blocks, block_index })
    }

    /// Serialize header, metadata, blocks, and block index, in order.
    ///
    /// It's the caller's responsibility to have called [`Self::finalize_header`]
    /// (or otherwise kept `header` consistent with the actual content)
    /// beforehand.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.header.encode();
        out.extend_from_slice(&encode_metadata(&self.metadata));
        out.extend_from_slice(&self.encode_blocks_section());
        out.extend_from_slice(&encode_block_index(&self.block_index));
        out
    }

    fn encode_blocks_section(&self) -> Vec<u8> {
        encode_blocks(&self.blocks, &WriterConfig::default())
    }

    /// Recompute `metaInfoLength`, `recordBlockIndexPos`, and `numRecords`
    /// from the current in-memory metadata/blocks/index, so `encode()`
    /// produces a self-consistent file after the caller has mutated any of
    /// those fields directly.
    ///
    /// `num_records` must be supplied by the caller — it isn't derivable
    /// from the flat block payload without knowing each record's width,
    /// which requires a per-type value codec this crate only implements
    /// for `Double`.
    pub fn finalize_header(&mut self, num_records: u64) {
        let encoded_metadata = encode_metadata(&self.metadata);
        let meta_info_length = (encoded_metadata.len() / 2) as u32;
        let start_of_blocks = HEADER_PAGE_SIZE as u64 + 2 * meta_info_length as u64;

        let encoded_blocks = self.encode_blocks_section();
        let record_block_index_pos = start_of_blocks + encoded_blocks.len() as u64;

        self.header.meta_info_length = meta_info_length;
        self.header.record_block_index_pos = record_block_index_pos;
        self.header.num_records = num_records;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_type::FieldType;
    use crate::field_value::{field_codec_for, FieldValue};
    use crate::header::FILE_ID_WITHOUT_SPATIAL_INDEX;
    use crate::metadata::{Field, RecordInfo};

    fn blank_header() -> Header {
        Header {
            description: [0u8; 64],
            file_id: FILE_ID_WITHOUT_SPATIAL_INDEX,
            creation_date: 0,
            flags1: 0,
            flags2: 0,
            meta_info_length: 0,
            mystery: 0,
            spatial_index_pos: 0,
            record_block_index_pos: 0,
            num_records: 0,
            compression_version: 1,
            reserved_space: vec![0u8; HEADER_PAGE_SIZE - 64 - 4 * 7 - 8 * 3],
        }
    }

    #[test]
    fn s1_empty_file_roundtrips() {
        let mut file = YxdbFile {
            header: blank_header(),
            metadata: Metadata::default(),
            blocks: Vec::new(),
            block_index: Vec::new(),
        };
        file.finalize_header(0);

        let encoded = file.encode();
        let decoded = YxdbFile::decode(&encoded).unwrap();
        assert_eq!(decoded, file);
        assert_eq!(decoded.header.num_records, 0);
    }

    #[test]
    fn s2_single_double_record_per_field() {
        let codec = field_codec_for(FieldType::Double);
        let payload = codec.encode(&FieldValue::Double(Some(3.14))).unwrap();
        assert_eq!(payload.len(), 9);

        let mut file = YxdbFile {
            header: blank_header(),
            metadata: Metadata {
                record_infos: vec![RecordInfo {
                    fields: vec![Field {
                        name: "x".to_string(),
                        field_type: FieldType::Double,
                        size: None,
                        scale: None,
                        description: None,
                    }],
                }],
            },
            blocks: payload,
            block_index: Vec::new(),
        };
        file.finalize_header(1);

        let encoded = file.encode();
        let decoded = YxdbFile::decode(&encoded).unwrap();
        assert_eq!(decoded, file);

        let (value, consumed) = codec.decode(&decoded.blocks).unwrap();
        assert_eq!(consumed, 9);
        assert_eq!(value, FieldValue::Double(Some(3.14)));
    }

    #[test]
    fn negative_block_region_is_rejected() {
        let metadata_bytes = encode_metadata(&Metadata::default());
        let mut header = blank_header();
        header.meta_info_length = (metadata_bytes.len() / 2) as u32;
        // Deliberately inconsistent: points before start-of-blocks.
        header.record_block_index_pos = 10;

        let mut full = header.encode();
        full.extend_from_slice(&metadata_bytes);

        let err = YxdbFile::decode(&full).unwrap_err();
        assert!(matches!(err, YxdbError::NegativeBlockRegion { .. }));
    }

    #[test]
    fn file_offset_invariants_hold_after_finalize() {
        let mut file = YxdbFile {
            header: blank_header(),
            metadata: Metadata {
                record_infos: vec![RecordInfo {
                    fields: vec![Field {
                        name: "a".to_string(),
                        field_type: FieldType::Double,
                        size: None,
                        scale: None,
                        description: None,
                    }],
                }],
            },
            blocks: vec![0u8; 100],
            block_index: vec![512, 1024],
        };
        file.finalize_header(10);

        let start_of_blocks = file.header.start_of_blocks();
        assert_eq!(start_of_blocks, HEADER_PAGE_SIZE as u64 + 2 * file.header.meta_info_length as u64);

        let encoded_blocks = file.encode_blocks_section();
        assert_eq!(
            file.header.record_block_index_pos,
            start_of_blocks + encoded_blocks.len() as u64
        );

        // Re-encoding and re-decoding must reproduce the same section boundaries.
        let full = file.encode();
        let decoded = YxdbFile::decode(&full).unwrap();
        assert_eq!(decoded.header.record_block_index_pos, file.header.record_block_index_pos);
    }
}
