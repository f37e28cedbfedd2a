//! The fixed 512-byte YXDB header page.

use crate::error::Result;
use crate::primitive::{write_u32, write_u64, Reader};

/// Size of the fixed header page, in bytes.
pub const HEADER_PAGE_SIZE: usize = 512;

/// Magic value for files that carry a spatial index.
pub const FILE_ID_WITH_SPATIAL_INDEX: u32 = 0x0044_0205;
/// Magic value for files without a spatial index.
pub const FILE_ID_WITHOUT_SPATIAL_INDEX: u32 = 0x0044_0204;

const DESCRIPTION_LEN: usize = 64;

/// Decoded representation of the 512-byte header page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Free-form 64-byte label, not interpreted.
    pub description: [u8; DESCRIPTION_LEN],
    /// Magic: [`FILE_ID_WITH_SPATIAL_INDEX`] or [`FILE_ID_WITHOUT_SPATIAL_INDEX`].
    pub file_id: u32,
    /// Opaque creation timestamp.
    pub creation_date: u32,
    pub flags1: u32,
    pub flags2: u32,
    /// Count of UTF-16 code units in the metadata section.
    pub meta_info_length: u32,
    /// Opaque, preserved verbatim.
    pub mystery: u32,
    /// Absolute byte offset of the spatial index, or 0 if absent.
    pub spatial_index_pos: u64,
    /// Absolute byte offset of the block-index section.
    pub record_block_index_pos: u64,
    /// Total record count across all blocks.
    pub num_records: u64,
    /// Opaque, preserved verbatim.
    pub compression_version: u32,
    /// Remainder of the page, preserved verbatim.
    pub reserved_space: Vec<u8>,
}

impl Header {
    /// `headerPageSize + 2 * metaInfoLength` — the byte offset at which the
    /// block section begins.
    pub fn start_of_blocks(&self) -> u64 {
        HEADER_PAGE_SIZE as u64 + 2 * self.meta_info_length as u64
    }

    /// Serialize to exactly [`HEADER_PAGE_SIZE`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_PAGE_SIZE);
        out.extend_from_slice(&self.description);
        write_u32(&mut out, self.file_id);
        write_u32(&mut out, self.creation_date);
        write_u32(&mut out, self.flags1);
        write_u32(&mut out, self.flags2);
        write_u32(&mut out, self.meta_info_length);
        write_u32(&mut out, self.mystery);
        write_u64(&mut out, self.spatial_index_pos);
        write_u64(&mut out, self.record_block_index_pos);
        write_u64(&mut out, self.num_records);
        write_u32(&mut out, self.compression_version);
        out.extend_from_slice(&self.reserved_space);
        debug_assert_eq!(out.len(), HEADER_PAGE_SIZE);
        out
    }

    /// Decode from a byte slice. The caller is expected to have isolated
    /// exactly [`HEADER_PAGE_SIZE`] bytes (see [`crate::file::decode_file`]).
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        let description_slice = r.read_bytes(DESCRIPTION_LEN, "header.description")?;
        let mut description = [0u8; DESCRIPTION_LEN];
        description.copy_from_slice(description_slice);

        let file_id = r.read_u32("header.fileId")?;
        let creation_date = r.read_u32("header.creationDate")?;
        let flags1 = r.read_u32("header.flags1")?;
        let flags2 = r.read_u32("header.flags2")?;
        let meta_info_length = r.read_u32("header.metaInfoLength")?;
        let mystery = r.read_u32("header.mystery")?;
        let spatial_index_pos = r.read_u64("header.spatialIndexPos")?;
        let record_block_index_pos = r.read_u64("header.recordBlockIndexPos")?;
        let num_records = r.read_u64("header.numRecords")?;
        let compression_version = r.read_u32("header.compressionVersion")?;
        let reserved_space = r.read_bytes(r.remaining(), "header.reservedSpace")?.to_vec();

        tracing::debug!(file_id, meta_info_length, record_block_index_pos, "decoded header");

        Ok(Self {
            description,
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
            reserved_space,
        })
    }
}
