//! Packing of bit sequences into bytes and back.
//!
//! Bits are packed least significant bit first: bit `i` of a sequence is stored with the value
//! `1 << (i % 8)` in byte `i / 8`. The final byte is filled up with zero bits and the number of
//! those padding bits is reported alongside the bytes.
use crate::alloc::vec::Vec;
use crate::table::Code;
use crate::{FanoError, MAX_PADDING};

/// Pack `bits` into bytes.
///
/// Returns the bytes and the number of padding bits in the last byte.
pub fn pack(bits: impl IntoIterator<Item = bool>) -> (Vec<u8>, u8) {
    let mut out = Vec::new();
    let mut buffer = LsbBuffer::new();
    for bit in bits {
        buffer.buffer_bit(bit, &mut out);
    }
    let padding = buffer.finish(&mut out);
    (out, padding)
}

/// Accumulates bits and moves them into an output vector byte by byte.
pub(crate) struct LsbBuffer {
    /// The buffer bits.
    buffer: u64,
    /// The number of valid buffer bits.
    bits_in_buffer: u8,
}

impl LsbBuffer {
    pub(crate) fn new() -> Self {
        LsbBuffer {
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Insert a single bit into the buffer.
    pub(crate) fn buffer_bit(&mut self, bit: bool, out: &mut Vec<u8>) {
        self.buffer |= u64::from(bit) << self.bits_in_buffer;
        self.bits_in_buffer += 1;
        self.push_out(out);
    }

    /// Insert all bits of a code into the buffer.
    pub(crate) fn buffer_code(&mut self, code: &Code, out: &mut Vec<u8>) {
        for bit in code.iter() {
            self.buffer_bit(bit, out);
        }
    }

    /// Push bytes if the buffer space is getting small.
    fn push_out(&mut self, out: &mut Vec<u8>) {
        if self.bits_in_buffer < 56 {
            return;
        }

        self.flush_out(out)
    }

    /// Flush all full bytes.
    fn flush_out(&mut self, out: &mut Vec<u8>) {
        while self.bits_in_buffer >= 8 {
            out.push((self.buffer & 0x0000_0000_0000_00ff) as u8);
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }
    }

    /// Pad the buffer to a full byte, returning the number of bits added.
    fn buffer_pad(&mut self) -> u8 {
        let to_byte = self.bits_in_buffer.wrapping_neg() & 0x7;
        self.bits_in_buffer += to_byte;
        to_byte
    }

    /// Pad and flush everything, returning the number of padding bits.
    pub(crate) fn finish(mut self, out: &mut Vec<u8>) -> u8 {
        let padding = self.buffer_pad();
        self.flush_out(out);
        padding
    }
}

/// A read-only view of the logical bits in packed bytes.
#[derive(Clone, Copy, Debug)]
pub struct Bits<'a> {
    bytes: &'a [u8],
    len: usize,
}

impl<'a> Bits<'a> {
    /// View `bytes` as a bit sequence without its last `padding` bits.
    pub fn unpack(bytes: &'a [u8], padding: u8) -> Result<Self, FanoError> {
        let available = bytes.len() * 8;
        if padding > MAX_PADDING || usize::from(padding) > available {
            return Err(FanoError::InvalidPadding { padding, available });
        }

        Ok(Bits {
            bytes,
            len: available - usize::from(padding),
        })
    }

    /// The number of logical bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, idx: usize) -> Option<bool> {
        if idx < self.len {
            Some(self.bit(idx))
        } else {
            None
        }
    }

    fn bit(&self, idx: usize) -> bool {
        self.bytes[idx / 8] & (1 << (idx % 8)) != 0
    }

    /// Whether the bits starting at `pos` begin with `code`.
    pub fn matches_at(&self, pos: usize, code: &Code) -> bool {
        pos + code.len() <= self.len
            && code
                .iter()
                .enumerate()
                .all(|(offset, bit)| self.bit(pos + offset) == bit)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + 'a {
        let bits = *self;
        (0..bits.len).map(move |idx| bits.bit(idx))
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.iter().collect()
    }
}
