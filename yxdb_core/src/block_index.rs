//! The block index: `u32 LE count` followed by `count` `u64 LE` offsets,
//! reinterpreted as signed `i64`.

use crate::error::{Result, YxdbError};
use crate::primitive::{write_i64, write_u32, Reader};

/// Decode a block index from the remainder of `r`.
///
/// Callers that want "nothing follows the block index" enforced (rather
/// than just trusting whatever comes after) should isolate `r` to exactly
/// the tail before calling this — see [`crate::file::YxdbFile::decode`],
/// which does.
pub fn decode_block_index(r: &mut Reader<'_>) -> Result<Vec<i64>> {
    let count = r.read_u32("blockIndex.count")? as usize;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let entry_offset = r.pos();
        let raw = r.read_u64("blockIndex.entry")?;
        if raw > i64::MAX as u64 {
            return Err(YxdbError::OffsetOverflow { index: i, offset: entry_offset, value: raw });
        }
        out.push(raw as i64);
    }
    Ok(out)
}

/// Encode a block index: `count` followed by each element as `u64 LE`.
pub fn encode_block_index(entries: &[i64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + entries.len() * 8);
    write_u32(&mut out, entries.len() as u32);
    for &e in entries {
        write_i64(&mut out, e);
    }
    out
}
