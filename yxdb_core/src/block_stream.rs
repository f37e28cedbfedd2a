//! The block stream: a sequence of blocks decoded until the assigned
//! sub-stream is exhausted, or encoded by chunking a flat payload buffer.

use crate::block::{decode_block, encode_block};
use crate::error::Result;
use crate::primitive::Reader;

/// Nominal records per block (writer hint only — see [`WriterConfig`]).
pub const DEFAULT_RECORDS_PER_BLOCK: usize = 65536;

/// Controls how [`encode_blocks`] chunks an outgoing payload buffer. The
/// on-disk format doesn't constrain chunk sizes beyond 2^31-1 bytes per
/// block; this only affects how many blocks a given payload ends up as.
#[derive(Debug, Clone, Copy)]
pub struct WriterConfig {
    pub records_per_block: usize,
    pub avg_record_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { records_per_block: DEFAULT_RECORDS_PER_BLOCK, avg_record_size: 1 }
    }
}

impl WriterConfig {
    fn chunk_bytes(&self) -> usize {
        self.records_per_block.saturating_mul(self.avg_record_size).max(1)
    }
}

/// Decode a full block stream: repeatedly decode one block and append its
/// payload bytes, until `r` is exhausted. Concatenation is unconditional;
/// there are no separators between block payloads.
pub fn decode_blocks(r: &mut Reader<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    while r.remaining() > 0 {
        let payload = decode_block(r)?;
        out.extend_from_slice(&payload);
    }
    Ok(out)
}

/// Encode `payload` as a block stream, chunking at `config.chunk_bytes()`
/// per block. An empty payload MUST still produce one block (a
/// zero-length compressed block), never zero blocks.
pub fn encode_blocks(payload: &[u8], config: &WriterConfig) -> Vec<u8> {
    let mut out = Vec::new();
    if payload.is_empty() {
        encode_block(&mut out, &[]);
        return out;
    }
    let chunk_bytes = config.chunk_bytes();
    for chunk in payload.chunks(chunk_bytes) {
        encode_block(&mut out, chunk);
    }
    out
}
