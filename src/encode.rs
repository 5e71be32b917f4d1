use alloc::vec;
use alloc::vec::Vec;

use crate::chunk::{
    Chunk, HEADER_LEN_COMPRESSED, HEADER_LEN_UNCOMPRESSED, MAX_CHUNK_LENGTH, MAX_LITERAL, MAX_OFF,
    MAX_REF,
};
use crate::error::LzfError;

type Result<T> = core::result::Result<T, LzfError>;

/// Inputs shorter than this are stored without a compression attempt.
const MIN_BLOCK_TO_COMPRESS: usize = 16;

/// The final bytes of a chunk are always emitted as literals; the match
/// loop stops this many bytes early so its lookahead stays in bounds.
const TAIL_LENGTH: usize = 4;

/// Bounds for the hash table (entries, always a power of two).
const MIN_HASH_SIZE: usize = 256;
const MAX_HASH_SIZE: usize = 16384;

/// Multiplier scattering the 24-bit byte window across hash slots.
const HASH_MULTIPLIER: u32 = 57321;

/// Mask keeping `seen` at exactly the three-byte window.
const WINDOW_MASK: u32 = 0x00FF_FFFF;

/// Maps a three-byte window to its hash slot.
#[inline]
fn hash_slot(seen: u32, modulo: u32) -> usize {
    ((seen.wrapping_mul(HASH_MULTIPLIER) >> 9) & modulo) as usize
}

/// Smallest power of two >= twice the chunk length, clamped to
/// [`MIN_HASH_SIZE`, `MAX_HASH_SIZE`].
fn calc_hash_size(chunk_len: usize) -> usize {
    let target = chunk_len.saturating_mul(2);
    if target >= MAX_HASH_SIZE {
        return MAX_HASH_SIZE;
    }
    let mut size = MIN_HASH_SIZE;
    while size < target {
        size <<= 1;
    }
    size
}

/// Worst-case compressed payload size: one control byte per 32 literals
/// plus header slack for the transiently reserved slot.
fn scratch_len(chunk_len: usize) -> usize {
    chunk_len + chunk_len.div_ceil(MAX_LITERAL) + HEADER_LEN_COMPRESSED
}

/// Upper bound on `encode(data).len()` for an input of `input_len` bytes.
///
/// The encoder never expands a chunk's payload (it falls back to verbatim
/// storage), so the bound is the input plus one header per chunk.
#[must_use]
pub fn max_encoded_len(input_len: usize) -> usize {
    let chunks = input_len.div_ceil(MAX_CHUNK_LENGTH).max(1);
    input_len + chunks * HEADER_LEN_UNCOMPRESSED
}

/// Reusable compression kernel for chunks up to a given length.
///
/// Owns the hash table and the scratch output buffer, so a single
/// encoder instance amortizes its allocations across every chunk of a
/// stream. Hash entries are absolute positions into the input of the
/// current call only; the match validity check filters out entries left
/// over from earlier calls, so the table is never cleared.
///
/// An encoder is not safe to share across threads; independent encoders
/// may run in parallel.
pub struct ChunkEncoder {
    hash_table: Vec<usize>,
    hash_modulo: u32,
    scratch: Vec<u8>,
}

impl ChunkEncoder {
    /// Creates an encoder sized for chunks of `expected_chunk_len` bytes.
    #[must_use]
    pub fn new(expected_chunk_len: usize) -> Self {
        let hash_size = calc_hash_size(expected_chunk_len.min(MAX_CHUNK_LENGTH));
        Self {
            hash_table: vec![0; hash_size],
            hash_modulo: (hash_size - 1) as u32,
            scratch: vec![0; scratch_len(expected_chunk_len.min(MAX_CHUNK_LENGTH))],
        }
    }

    /// Encodes `len` bytes of `input` starting at `offset` into one
    /// framed chunk: compressed when that saves at least two bytes,
    /// stored verbatim otherwise.
    ///
    /// # Errors
    /// Returns [`LzfError::InvalidArgument`] if `len` exceeds
    /// [`MAX_CHUNK_LENGTH`] or the range falls outside `input`.
    pub fn encode(&mut self, input: &[u8], offset: usize, len: usize) -> Result<Chunk> {
        if len > MAX_CHUNK_LENGTH {
            return Err(LzfError::invalid("chunk length exceeds 65535 bytes"));
        }
        let end = offset
            .checked_add(len)
            .ok_or(LzfError::invalid("encode range overflows"))?;
        if end > input.len() {
            return Err(LzfError::invalid("encode range out of input bounds"));
        }
        Ok(self.encode_valid(input, offset, len))
    }

    /// Encodes a range already known to satisfy the public preconditions.
    pub(crate) fn encode_valid(&mut self, input: &[u8], offset: usize, len: usize) -> Chunk {
        if len >= MIN_BLOCK_TO_COMPRESS {
            let needed = scratch_len(len);
            if self.scratch.len() < needed {
                self.scratch.resize(needed, 0);
            }
            let compressed_len = self.try_compress(input, offset, offset + len);
            // Compression has to save at least two bytes to beat the
            // larger header of a compressed chunk.
            if compressed_len < len - 2 {
                return Chunk::new_compressed(&self.scratch[..compressed_len], len);
            }
        }
        Chunk::new_uncompressed(&input[offset..offset + len])
    }

    /// Runs the LZF match loop over `input[in_pos..in_end]`, writing the
    /// compressed payload into the scratch buffer. Returns its length,
    /// which the caller compares against the plain-storage cost.
    fn try_compress(&mut self, input: &[u8], mut in_pos: usize, in_end: usize) -> usize {
        let first_pos = in_pos;
        let modulo = self.hash_modulo;
        let core_end = in_end - TAIL_LENGTH;

        // Slot 0 is reserved for the first literal-run control byte.
        let mut out_pos = 1;
        let mut literals = 0;
        let mut seen = (u32::from(input[in_pos]) << 8) | u32::from(input[in_pos + 1]);

        while in_pos < core_end {
            let next = input[in_pos + 2];
            seen = ((seen << 8) | u32::from(next)) & WINDOW_MASK;
            let slot = hash_slot(seen, modulo);
            let candidate = self.hash_table[slot];
            self.hash_table[slot] = in_pos;

            let matched = candidate < in_pos
                && candidate >= first_pos
                && in_pos - candidate <= MAX_OFF
                && input[candidate] == (seen >> 16) as u8
                && input[candidate + 1] == (seen >> 8) as u8
                && input[candidate + 2] == next;

            if !matched {
                self.scratch[out_pos] = input[in_pos];
                out_pos += 1;
                in_pos += 1;
                literals += 1;
                if literals == MAX_LITERAL {
                    self.scratch[out_pos - literals - 1] = (literals - 1) as u8;
                    literals = 0;
                    out_pos += 1;
                }
                continue;
            }

            // A match may run two bytes into the literal tail.
            let max_len = (core_end - in_pos + 2).min(MAX_REF);

            // Commit the pending literal run, or retract its unused slot.
            if literals == 0 {
                out_pos -= 1;
            } else {
                self.scratch[out_pos - literals - 1] = (literals - 1) as u8;
                literals = 0;
            }

            let mut len = 3;
            while len < max_len && input[candidate + len] == input[in_pos + len] {
                len += 1;
            }
            let len_code = len - 2;
            let off = in_pos - candidate - 1;
            if len_code < 7 {
                self.scratch[out_pos] = ((off >> 8) as u8) | ((len_code as u8) << 5);
                out_pos += 1;
            } else {
                self.scratch[out_pos] = ((off >> 8) as u8) | (7 << 5);
                self.scratch[out_pos + 1] = (len_code - 7) as u8;
                out_pos += 2;
            }
            self.scratch[out_pos] = off as u8;
            out_pos += 2; // low distance byte, then a fresh reserved slot

            // Resume after the match, re-priming the window and recording
            // the two positions that precede the resume point.
            in_pos += len_code;
            seen = (u32::from(input[in_pos]) << 8) | u32::from(input[in_pos + 1]);
            seen = ((seen << 8) | u32::from(input[in_pos + 2])) & WINDOW_MASK;
            self.hash_table[hash_slot(seen, modulo)] = in_pos;
            in_pos += 1;
            seen = ((seen << 8) | u32::from(input[in_pos + 2])) & WINDOW_MASK;
            self.hash_table[hash_slot(seen, modulo)] = in_pos;
            in_pos += 1;
        }

        // The tail is always literal.
        while in_pos < in_end {
            self.scratch[out_pos] = input[in_pos];
            out_pos += 1;
            in_pos += 1;
            literals += 1;
            if literals == MAX_LITERAL {
                self.scratch[out_pos - literals - 1] = (literals - 1) as u8;
                literals = 0;
                out_pos += 1;
            }
        }
        if literals > 0 {
            self.scratch[out_pos - literals - 1] = (literals - 1) as u8;
        } else {
            out_pos -= 1;
        }
        out_pos
    }
}

/// Encodes `data` into a stream of framed LZF chunks.
///
/// Inputs longer than [`MAX_CHUNK_LENGTH`] are split into consecutive
/// maximum-size windows, each encoded independently; no back-reference
/// crosses a chunk boundary. Encoding cannot fail: chunks that do not
/// compress are stored verbatim.
#[must_use]
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut encoder = ChunkEncoder::new(data.len().min(MAX_CHUNK_LENGTH));
    if data.len() <= MAX_CHUNK_LENGTH {
        return encoder.encode_valid(data, 0, data.len()).into_vec();
    }

    let mut framed = Vec::with_capacity(max_encoded_len(data.len()));
    let mut pos = 0;
    while pos < data.len() {
        let len = (data.len() - pos).min(MAX_CHUNK_LENGTH);
        framed.extend_from_slice(encoder.encode_valid(data, pos, len).as_bytes());
        pos += len;
    }
    framed
}
