//! Binary codec for the YXDB columnar file format: a fixed 512-byte header,
//! UTF-16LE XML metadata, an LZF-compressed block stream, and a block
//! index.
//!
//! The primary entry point is [`YxdbFile`]: [`YxdbFile::decode`] parses a
//! complete file from bytes, [`YxdbFile::encode`] serializes one back.

pub mod block;
pub mod block_index;
pub mod block_stream;
pub mod error;
pub mod field_type;
pub mod field_value;
pub mod file;
pub mod header;
pub mod metadata;
pub mod primitive;

pub use block_index::{decode_block_index, encode_block_index};
pub use block_stream::{decode_blocks, encode_blocks, WriterConfig};
pub use error::{Result, YxdbError};
pub use field_type::FieldType;
pub use field_value::{field_codec_for, FieldCodec, FieldValue};
pub use file::YxdbFile;
pub use header::{Header, FILE_ID_WITHOUT_SPATIAL_INDEX, FILE_ID_WITH_SPATIAL_INDEX, HEADER_PAGE_SIZE};
pub use metadata::{decode_metadata, encode_metadata, Field, Metadata, RecordInfo};
