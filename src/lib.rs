//! # Shannon-Fano encoder and decoder
//!
//! This crate provides an `Encoder` and a `Decoder` for byte buffers compressed with a
//! Shannon-Fano code. The code is derived from the byte frequencies of the input: the
//! symbols are sorted by descending count and the list is split recursively into halves
//! of nearly equal weight, the left half extending the code by a `0` bit and the right
//! half by a `1` bit.
//!
//! The compressed form is a single header byte holding the number of padding bits (0 to
//! 7) in the last byte, followed by the code bits packed least significant bit first.
//! The code table itself is *not* part of the compressed data. Both sides must build the
//! same [`CodeTable`] or pass it along by other means.
//!
//! Examplary use of the encoder and decoder:
//!
//! ```
//! use fano::{CodeTable, decode::Decoder, encode::Encoder};
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let table = CodeTable::from_data(data).unwrap();
//! let compressed = Encoder::new(&table).encode(data).unwrap();
//! let decompressed = Decoder::new(&table).decode(&compressed).unwrap();
//! assert_eq!(&decompressed[..], &data[..]);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// Alias for the byte values being coded.
pub type Symbol = u8;

/// The largest number of padding bits a packed buffer can declare.
pub(crate) const MAX_PADDING: u8 = 7;

/// The number of distinct symbols, one for each byte value.
pub(crate) const SYMBOLS: usize = 1 << 8;

mod error;

#[cfg(feature = "alloc")]
pub mod bits;
#[cfg(feature = "alloc")]
pub mod decode;
#[cfg(feature = "alloc")]
pub mod encode;
#[cfg(feature = "alloc")]
pub mod freq;
#[cfg(feature = "alloc")]
pub mod table;

pub use error::FanoError;

#[cfg(feature = "alloc")]
pub use freq::{FrequencyEntry, FrequencyList};
#[cfg(feature = "alloc")]
pub use table::{Code, CodeTable};

#[cfg(feature = "alloc")]
pub(crate) use alloc::vec::Vec;

/// Analyse `data`, build its code table and encode it.
///
/// This is a shorthand for [`CodeTable::from_data`] followed by [`encode::Encoder::encode`].
/// The table is returned alongside the packed bytes since it is needed for decoding.
#[cfg(feature = "alloc")]
pub fn compress(data: &[u8]) -> Result<(CodeTable, Vec<u8>), FanoError> {
    let table = CodeTable::from_data(data)?;
    let packed = encode::Encoder::new(&table).encode(data)?;
    Ok((table, packed))
}

/// Decode a buffer produced by [`compress`] with the same table.
#[cfg(feature = "alloc")]
pub fn decompress(packed: &[u8], table: &CodeTable) -> Result<Vec<u8>, FanoError> {
    decode::Decoder::new(table).decode(packed)
}
