//! # Chunked LZF compression
//!
//! `lzf` is a safe, pure-Rust implementation of the LZF compression
//! format: a byte-oriented LZ77-family codec that trades ratio for
//! speed. Data is framed into self-describing "ZV" chunks, each stored
//! either compressed or verbatim, and the stream is byte-compatible
//! with liblzf and compress-lzf.
//!
//! ## Example
//!
//! ```rust
//! use lzf::{decode, encode};
//!
//! let data = b"hello hello hello hello";
//!
//! let framed = encode(data);
//! // Every chunk opens with the `Z` `V` magic bytes; this one is
//! // compressed (block type 1).
//! assert_eq!(&framed[..3], &[0x5A, 0x56, 0x01]);
//!
//! let restored = decode(&framed).expect("decoding failed");
//! assert_eq!(restored, data);
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod chunk;
pub mod decode;
pub mod encode;
pub mod error;

pub use chunk::{Chunk, MAX_CHUNK_LENGTH, MAX_LITERAL, MAX_OFF, MAX_REF};
pub use decode::{ChunkDecoder, decode};
pub use encode::{ChunkEncoder, encode, max_encoded_len};
pub use error::LzfError;
