//! Thin wrapper around the `lzf` crate giving the bounded-buffer contract
//! the yxdb block codec needs: a caller-chosen maximum output size on
//! compress, and a caller-chosen maximum output size on decompress.
//!
//! The `lzf` crate itself is a pure byte-in/byte-out library; this crate
//! adds nothing algorithmic, only the length policing the block codec
//! requires.

use thiserror::Error;

/// Errors surfaced by the LZF frame codec.
#[derive(Debug, Error)]
pub enum LzfError {
    /// Decompression would produce more than `out_buf_size` bytes.
    #[error("lzf decompression would exceed the {limit}-byte output buffer")]
    BufferTooSmall {
        /// The caller-supplied output buffer bound.
        limit: usize,
    },
    /// The underlying `lzf` crate rejected the input as malformed.
    #[error("lzf stream malformed: {0}")]
    Malformed(String),
}

/// Compress `input`, returning `Some(bytes)` only if the compressed form is
/// no larger than `max_out`. Returns `None` if compression failed or the
/// result would exceed `max_out` — the caller (the block writer) treats
/// `None` as "store uncompressed".
pub fn compress(input: &[u8], max_out: usize) -> Option<Vec<u8>> {
    if input.is_empty() {
        return None;
    }
    match lzf::compress(input) {
        Ok(out) if out.len() <= max_out => {
            tracing::trace!(in_len = input.len(), out_len = out.len(), "lzf compress succeeded");
            Some(out)
        }
        Ok(out) => {
            tracing::trace!(
                in_len = input.len(),
                out_len = out.len(),
                max_out,
                "lzf compress exceeded bound, storing uncompressed"
            );
            None
        }
        Err(_) => {
            tracing::trace!(in_len = input.len(), "lzf compress rejected input, storing uncompressed");
            None
        }
    }
}

/// Decompress `input` into at most `out_buf_size` bytes.
pub fn decompress(input: &[u8], out_buf_size: usize) -> Result<Vec<u8>, LzfError> {
    lzf::decompress(input, out_buf_size).map_err(|e| {
        let msg = e.to_string();
        if msg.to_lowercase().contains("buffer") || msg.to_lowercase().contains("overflow") {
            LzfError::BufferTooSmall { limit: out_buf_size }
        } else {
            LzfError::Malformed(msg)
        }
    })
}
