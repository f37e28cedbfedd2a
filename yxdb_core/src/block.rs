//! One length-prefixed, optionally-LZF-compressed chunk of the block
//! payload.
//!
//! On disk: `writtenSize: u32 LE` where bit 31 set means "uncompressed",
//! clear means "LZF-compressed", followed by `writtenSize & 0x7FFF_FFFF`
//! payload bytes.

use crate::error::{Result, YxdbError};
use crate::primitive::{write_u32, Reader};

/// Bit 31 of the length prefix: set ⇒ stored uncompressed.
const UNCOMPRESSED_FLAG: u32 = 0x8000_0000;
const SIZE_MASK: u32 = 0x7FFF_FFFF;

/// Reader contract: LZF decompression must fail rather than allocate past
/// this bound.
pub const DECOMPRESSION_BUFFER_SIZE: usize = 0x40000;

/// Decode one block from the front of `r`, returning its raw (decompressed)
/// payload bytes.
pub fn decode_block(r: &mut Reader<'_>) -> Result<Vec<u8>> {
    let start = r.pos();
    let written_size = r.read_u32("block.writtenSize")?;
    let uncompressed = written_size & UNCOMPRESSED_FLAG != 0;
    let size = (written_size & SIZE_MASK) as usize;
    let payload = r.read_bytes(size, "block.payload")?;

    if uncompressed {
        tracing::trace!(offset = start, size, "decoded uncompressed block");
        Ok(payload.to_vec())
    } else {
        let raw = yxdb_lzf::decompress(payload, DECOMPRESSION_BUFFER_SIZE).map_err(|e| match e {
            yxdb_lzf::LzfError::BufferTooSmall { .. } => {
                YxdbError::BufferTooSmall { offset: start, limit: DECOMPRESSION_BUFFER_SIZE }
            }
            yxdb_lzf::LzfError::Malformed(_) => {
                YxdbError::isolation_mismatch(start, size, 0, "block.payload (lzf stream)")
            }
        })?;
        tracing::trace!(offset = start, compressed = size, raw = raw.len(), "decoded compressed block");
        Ok(raw)
    }
}

/// Encode `raw` as one block, choosing LZF compression only when the
/// compressed form is strictly smaller than `raw`.
pub fn encode_block(out: &mut Vec<u8>, raw: &[u8]) {
    let max_out = raw.len().saturating_sub(1);
    match yxdb_lzf::compress(raw, max_out) {
        Some(compressed) => {
            let size = compressed.len() as u32;
            write_u32(out, size & SIZE_MASK);
            out.extend_from_slice(&compressed);
            tracing::trace!(raw = raw.len(), compressed = compressed.len(), "wrote compressed block");
        }
        None => {
            let size = raw.len() as u32;
            write_u32(out, size | UNCOMPRESSED_FLAG);
            out.extend_from_slice(raw);
            tracing::trace!(raw = raw.len(), "wrote uncompressed block");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressible_payload_round_trips_compressed() {
        let raw = vec![b'A'; 1000];
        let mut encoded = Vec::new();
        encode_block(&mut encoded, &raw);

        let written_size = u32::from_le_bytes(encoded[0..4].try_into().unwrap());
        assert_eq!(written_size & UNCOMPRESSED_FLAG, 0, "should be compressed");
        assert!((written_size & SIZE_MASK) < raw.len() as u32);

        let mut r = Reader::new(&encoded);
        let decoded = decode_block(&mut r).unwrap();
        assert_eq!(decoded, raw);
    }

    #[test]
    fn incompressible_payload_round_trips_uncompressed() {
        // Pseudo-random bytes via a simple LCG; should not compress below len-1.
        let mut rng = 0x1234_5678_u64;
        let raw: Vec<u8> = (0..1000)
            .map(|_| {
                rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (rng >> 56) as u8
            })
            .collect();

        let mut encoded = Vec::new();
        encode_block(&mut encoded, &raw);
        let written_size = u32::from_le_bytes(encoded[0..4].try_into().unwrap());

        let mut r = Reader::new(&encoded);
        let decoded = decode_block(&mut r).unwrap();
        assert_eq!(decoded, raw);

        if written_size & UNCOMPRESSED_FLAG != 0 {
            assert_eq!(written_size & SIZE_MASK, raw.len() as u32);
        }
    }

    #[test]
    fn empty_payload_is_a_single_zero_length_block() {
        let mut encoded = Vec::new();
        encode_block(&mut encoded, &[]);
        assert_eq!(encoded.len(), 4, "just the length prefix, no payload bytes");
        let written_size = u32::from_le_bytes(encoded[0..4].try_into().unwrap());
        assert_eq!(written_size & UNCOMPRESSED_FLAG, UNCOMPRESSED_FLAG);
        assert_eq!(written_size & SIZE_MASK, 0);

        let mut r = Reader::new(&encoded);
        let decoded = decode_block(&mut r).unwrap();
        assert!(decoded.is_empty());
    }
}
