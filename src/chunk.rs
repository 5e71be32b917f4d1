use alloc::vec::Vec;

use crate::error::LzfError;

type Result<T> = core::result::Result<T, LzfError>;

/// First magic byte (`Z`) opening every framed chunk.
pub const MAGIC_Z: u8 = 0x5A;

/// Second magic byte (`V`).
pub const MAGIC_V: u8 = 0x56;

/// Block type for a chunk whose payload is stored verbatim.
pub const BLOCK_TYPE_UNCOMPRESSED: u8 = 0;

/// Block type for a chunk whose payload is LZF-compressed.
pub const BLOCK_TYPE_COMPRESSED: u8 = 1;

/// Header length for an uncompressed chunk: magic + type + payload length.
pub const HEADER_LEN_UNCOMPRESSED: usize = 5;

/// Header length for a compressed chunk: adds the uncompressed length field.
pub const HEADER_LEN_COMPRESSED: usize = 7;

/// Maximum payload length per chunk (both on the wire and uncompressed).
pub const MAX_CHUNK_LENGTH: usize = 0xFFFF;

/// Maximum number of bytes in a single literal run.
pub const MAX_LITERAL: usize = 32;

/// Maximum back-reference distance (13 bits).
pub const MAX_OFF: usize = 1 << 13;

/// Maximum back-reference match length.
pub const MAX_REF: usize = (1 << 8) + (1 << 3);

/// One framed block of the LZF "ZV" stream format.
///
/// A chunk owns its complete wire representation: a 5-byte header
/// (uncompressed) or 7-byte header (compressed) followed by the payload.
/// All 16-bit header fields are big-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    data: Vec<u8>,
}

impl Chunk {
    /// Frames `payload` as an uncompressed chunk.
    ///
    /// # Errors
    /// Returns [`LzfError::InvalidArgument`] if the payload exceeds
    /// [`MAX_CHUNK_LENGTH`].
    pub fn uncompressed(payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_CHUNK_LENGTH {
            return Err(LzfError::invalid("chunk payload exceeds 65535 bytes"));
        }
        Ok(Self::new_uncompressed(payload))
    }

    /// Frames an LZF-compressed `payload` that expands to
    /// `uncompressed_len` bytes.
    ///
    /// # Errors
    /// Returns [`LzfError::InvalidArgument`] if either length exceeds
    /// [`MAX_CHUNK_LENGTH`].
    pub fn compressed(payload: &[u8], uncompressed_len: usize) -> Result<Self> {
        if payload.len() > MAX_CHUNK_LENGTH {
            return Err(LzfError::invalid("chunk payload exceeds 65535 bytes"));
        }
        if uncompressed_len > MAX_CHUNK_LENGTH {
            return Err(LzfError::invalid("uncompressed length exceeds 65535 bytes"));
        }
        Ok(Self::new_compressed(payload, uncompressed_len))
    }

    /// Infallible constructor for payloads already known to be in range.
    pub(crate) fn new_uncompressed(payload: &[u8]) -> Self {
        let mut data = Vec::with_capacity(HEADER_LEN_UNCOMPRESSED + payload.len());
        data.push(MAGIC_Z);
        data.push(MAGIC_V);
        data.push(BLOCK_TYPE_UNCOMPRESSED);
        data.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        data.extend_from_slice(payload);
        Self { data }
    }

    /// Infallible constructor for payloads already known to be in range.
    pub(crate) fn new_compressed(payload: &[u8], uncompressed_len: usize) -> Self {
        let mut data = Vec::with_capacity(HEADER_LEN_COMPRESSED + payload.len());
        data.push(MAGIC_Z);
        data.push(MAGIC_V);
        data.push(BLOCK_TYPE_COMPRESSED);
        data.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        data.extend_from_slice(&(uncompressed_len as u16).to_be_bytes());
        data.extend_from_slice(payload);
        Self { data }
    }

    /// Returns true iff `bytes` begins with a plausible chunk header:
    /// the `ZV` magic and a known block type. Interior consistency
    /// (length fields, payload) is not verified.
    #[must_use]
    pub fn is_valid_chunk(bytes: &[u8]) -> bool {
        bytes.len() >= HEADER_LEN_UNCOMPRESSED
            && bytes[0] == MAGIC_Z
            && bytes[1] == MAGIC_V
            && (bytes[2] == BLOCK_TYPE_UNCOMPRESSED || bytes[2] == BLOCK_TYPE_COMPRESSED)
    }

    /// Copies the framed bytes into `dst` starting at `offset` and
    /// returns the offset one past the written range.
    ///
    /// # Errors
    /// Returns [`LzfError::InvalidArgument`] if `dst` cannot hold the
    /// chunk at that offset.
    pub fn copy_to(&self, dst: &mut [u8], offset: usize) -> Result<usize> {
        let end = offset
            .checked_add(self.data.len())
            .ok_or(LzfError::invalid("destination offset overflows"))?;
        if end > dst.len() {
            return Err(LzfError::invalid("destination buffer too small for chunk"));
        }
        dst[offset..end].copy_from_slice(&self.data);
        Ok(end)
    }

    /// The complete framed representation, header included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total framed length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the payload is stored compressed.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.data[2] == BLOCK_TYPE_COMPRESSED
    }

    /// Consumes the chunk, returning the framed bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Parsed view of one chunk header within a framed stream.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkHeader {
    pub compressed: bool,
    /// Payload length as stored on the wire.
    pub payload_len: usize,
    /// Bytes the chunk expands to (equals `payload_len` when uncompressed).
    pub uncompressed_len: usize,
    pub header_len: usize,
}

impl ChunkHeader {
    /// Validates and reads the chunk header at `pos`. `block` is the
    /// chunk's index, used only for error reporting.
    pub(crate) fn read(framed: &[u8], pos: usize, block: usize) -> Result<Self> {
        if pos + HEADER_LEN_UNCOMPRESSED > framed.len() {
            return Err(LzfError::corrupt(block, pos, "truncated chunk header"));
        }
        if framed[pos] != MAGIC_Z || framed[pos + 1] != MAGIC_V {
            return Err(LzfError::corrupt(
                block,
                pos,
                "did not start with 'ZV' signature bytes",
            ));
        }
        let payload_len = u16::from_be_bytes([framed[pos + 3], framed[pos + 4]]) as usize;
        let header = match framed[pos + 2] {
            BLOCK_TYPE_UNCOMPRESSED => Self {
                compressed: false,
                payload_len,
                uncompressed_len: payload_len,
                header_len: HEADER_LEN_UNCOMPRESSED,
            },
            BLOCK_TYPE_COMPRESSED => {
                if pos + HEADER_LEN_COMPRESSED > framed.len() {
                    return Err(LzfError::corrupt(block, pos, "truncated chunk header"));
                }
                Self {
                    compressed: true,
                    payload_len,
                    uncompressed_len: u16::from_be_bytes([framed[pos + 5], framed[pos + 6]])
                        as usize,
                    header_len: HEADER_LEN_COMPRESSED,
                }
            }
            _ => return Err(LzfError::corrupt(block, pos, "unrecognized block type")),
        };
        if pos + header.header_len + header.payload_len > framed.len() {
            return Err(LzfError::corrupt(block, pos, "truncated chunk payload"));
        }
        Ok(header)
    }

    /// Offset one past this chunk's payload.
    pub(crate) fn end(&self, pos: usize) -> usize {
        pos + self.header_len + self.payload_len
    }
}
