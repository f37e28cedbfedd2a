//! Error taxonomy for the YXDB binary codec.
//!
//! Every variant carries the labelled byte offset or field name at which the
//! problem was detected, so callers can report exactly where a malformed
//! file diverges from the format.

use thiserror::Error;

/// The error type returned by every decode/encode operation in this crate.
#[derive(Debug, Error)]
pub enum YxdbError {
    /// Fewer bytes than required were available at a labelled read.
    #[error("truncated at offset {offset}: expected {expected} more byte(s) for {label}")]
    Truncated {
        /// Byte offset where the short read was attempted.
        offset: usize,
        /// Number of bytes that were needed but not available.
        expected: usize,
        /// Human label for what was being read.
        label: &'static str,
    },

    /// A sub-parser consumed fewer or more bytes than its isolated budget.
    #[error("isolation mismatch at offset {offset}: budget {budget} byte(s) for {label}, consumed {consumed}")]
    IsolationMismatch {
        /// Byte offset where the isolated region started.
        offset: usize,
        /// Number of bytes the sub-parser was allotted.
        budget: usize,
        /// Number of bytes the sub-parser actually consumed.
        consumed: usize,
        /// Human label for the isolated region.
        label: &'static str,
    },

    /// `recordBlockIndexPos` precedes the end of the metadata section.
    #[error("negative block region: recordBlockIndexPos {record_block_index_pos} precedes start-of-blocks {start_of_blocks}")]
    NegativeBlockRegion {
        /// Header's `recordBlockIndexPos` field.
        record_block_index_pos: u64,
        /// Computed `headerPageSize + 2 * metaInfoLength`.
        start_of_blocks: u64,
    },

    /// LZF decompression would exceed the fixed output buffer.
    #[error("lzf decompression at offset {offset} would exceed the {limit}-byte buffer")]
    BufferTooSmall {
        /// Byte offset of the block whose payload overflowed.
        offset: usize,
        /// The configured output buffer bound.
        limit: usize,
    },

    /// The metadata byte window was too short, or lacked the trailing
    /// newline + NUL sentinels.
    #[error("metadata truncated at offset {offset}: {reason}")]
    MetadataTruncated {
        /// Byte offset of the metadata section.
        offset: usize,
        /// What, specifically, was missing.
        reason: &'static str,
    },

    /// The metadata XML text failed to parse.
    #[error("metadata XML malformed at offset {offset}: {message}")]
    XmlMalformed {
        /// Byte offset of the metadata section.
        offset: usize,
        /// Parser error message.
        message: String,
    },

    /// A `size` or `scale` attribute was not a base-10 integer.
    #[error("field {field_name:?} has a malformed {attribute} attribute: {value:?}")]
    BadFieldAttribute {
        /// Name of the field whose attribute failed to parse.
        field_name: String,
        /// Which attribute (`"size"` or `"scale"`) was malformed.
        attribute: &'static str,
        /// The raw attribute text that failed to parse.
        value: String,
    },

    /// A field value of a not-yet-implemented `FieldType` was encoded or decoded.
    #[error("field type {kind:?} has no value codec implemented yet")]
    Unimplemented {
        /// Canonical name of the unsupported field type.
        kind: &'static str,
    },

    /// A block-index offset exceeds what an `i64` can represent.
    #[error("block index entry {index} at offset {offset} has value {value} which overflows i64")]
    OffsetOverflow {
        /// Position of the offending entry within the block index.
        index: usize,
        /// Byte offset of the entry within the block-index section.
        offset: usize,
        /// The raw `u64` value that overflowed.
        value: u64,
    },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, YxdbError>;

impl YxdbError {
    pub(crate) fn truncated(offset: usize, expected: usize, label: &'static str) -> Self {
        Self::Truncated { offset, expected, label }
    }

    pub(crate) fn isolation_mismatch(
        offset: usize,
        budget: usize,
        consumed: usize,
        label: &'static str,
    ) -> Self {
        Self::IsolationMismatch { offset, budget, consumed, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_mention_offsets() {
        let err = YxdbError::truncated(42, 4, "header.fileId");
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("header.fileId"));
    }
}
