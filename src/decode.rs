//! A module for all decoding needs.
use crate::alloc::{boxed::Box, vec::Vec};
use crate::bits::Bits;
use crate::table::{Code, CodeTable};
use crate::{FanoError, Symbol};

#[cfg(feature = "std")]
use std::io::{self, Read, Write};

/// Decodes packed buffers with a fixed code table.
pub struct Decoder<'t> {
    state: Box<dyn Matcher + Send + Sync + 't>,
}

/// A decoding stream sink.
///
/// See [`Decoder::into_stream`] on how to create this type and more information.
///
/// [`Decoder::into_stream`]: struct.Decoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, 't, W> {
    decoder: &'d Decoder<'t>,
    writer: W,
}

/// The result of coding a whole reader into a writer.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    /// The possible error that occurred.
    ///
    /// Coding errors are reported as `io::ErrorKind::InvalidData`.
    pub status: io::Result<()>,
}

trait Matcher {
    /// Find the code at the start of `bits[pos..]`, returning its symbol and length.
    fn match_at(&self, bits: &Bits<'_>, pos: usize) -> Option<(Symbol, usize)>;
}

/// Tries every code of the table in turn.
struct LinearScan<'t> {
    codes: Vec<(Symbol, &'t Code)>,
}

/// Follows the bits through a binary tree of all codes.
struct TreeWalk {
    nodes: Vec<Node>,
}

#[derive(Clone, Copy)]
enum Node {
    Inner { next: [Option<u16>; 2] },
    Leaf(Symbol),
}

impl<'t> Decoder<'t> {
    /// Create a decoder that compares each code of `table` against the stream.
    ///
    /// This is slow for large tables, see [`with_tree_walk`] for a faster equivalent.
    ///
    /// [`with_tree_walk`]: #method.with_tree_walk
    pub fn new(table: &'t CodeTable) -> Self {
        Decoder {
            state: Box::new(LinearScan::new(table)),
        }
    }

    /// Create a decoder that walks a code tree built from `table`.
    ///
    /// Produces the same output as [`new`] but each symbol costs only one step per bit.
    ///
    /// [`new`]: #method.new
    pub fn with_tree_walk(table: &'t CodeTable) -> Self {
        Decoder {
            state: Box::new(TreeWalk::new(table)),
        }
    }

    /// Decode a packed buffer produced by an encoder with the same table.
    ///
    /// Fails if the buffer has no header, if the header declares an impossible amount of
    /// padding or if the bits do not form a sequence of codes of the table.
    pub fn decode(&self, packed: &[u8]) -> Result<Vec<u8>, FanoError> {
        let (&padding, payload) = packed.split_first().ok_or(FanoError::MissingHeader)?;
        let bits = Bits::unpack(payload, padding)?;

        let mut out = Vec::with_capacity(bits.len());
        let mut pos = 0;
        while pos < bits.len() {
            let (symbol, len) = self
                .state
                .match_at(&bits, pos)
                .ok_or(FanoError::NoMatchingCode { position: pos })?;
            out.push(symbol);
            pos += len;
        }

        log::debug!("decoded {} bits into {} bytes", bits.len(), out.len());

        Ok(out)
    }

    /// Construct a decoder into a writer.
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&self, writer: W) -> IntoStream<'_, 't, W> {
        IntoStream {
            decoder: self,
            writer,
        }
    }
}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, '_, W> {
    /// Decode all data from a reader.
    ///
    /// The packed buffer is read completely, nothing is written unless it decodes.
    pub fn decode_all(self, mut read: impl Read) -> AllResult {
        let IntoStream { decoder, mut writer } = self;

        let mut packed = Vec::new();
        let mut bytes_written = 0;

        let status = (|| -> io::Result<()> {
            read.read_to_end(&mut packed)?;
            let data = decoder
                .decode(&packed)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            writer.write_all(&data)?;
            bytes_written = data.len();
            Ok(())
        })();

        AllResult {
            bytes_read: packed.len(),
            bytes_written,
            status,
        }
    }
}

impl<'t> LinearScan<'t> {
    fn new(table: &'t CodeTable) -> Self {
        LinearScan {
            codes: table.iter().collect(),
        }
    }
}

impl Matcher for LinearScan<'_> {
    fn match_at(&self, bits: &Bits<'_>, pos: usize) -> Option<(Symbol, usize)> {
        self.codes
            .iter()
            .find(|(_, code)| bits.matches_at(pos, code))
            .map(|&(symbol, code)| (symbol, code.len()))
    }
}

impl TreeWalk {
    fn new(table: &CodeTable) -> Self {
        let mut nodes = Vec::with_capacity(2 * table.len());
        nodes.push(Node::Inner { next: [None; 2] });

        for (symbol, code) in table {
            let mut idx = 0;
            for bit in code.iter() {
                let next = match nodes[idx] {
                    Node::Inner { next } => next[usize::from(bit)],
                    // Not reachable for prefix-free tables.
                    Node::Leaf(_) => break,
                };
                idx = match next {
                    Some(child) => usize::from(child),
                    None => {
                        let child = nodes.len();
                        nodes.push(Node::Inner { next: [None; 2] });
                        if let Node::Inner { next } = &mut nodes[idx] {
                            next[usize::from(bit)] = Some(child as u16);
                        }
                        child
                    }
                };
            }
            nodes[idx] = Node::Leaf(symbol);
        }

        TreeWalk { nodes }
    }
}

impl Matcher for TreeWalk {
    fn match_at(&self, bits: &Bits<'_>, pos: usize) -> Option<(Symbol, usize)> {
        let mut idx = 0;
        let mut end = pos;
        loop {
            match self.nodes[idx] {
                Node::Leaf(symbol) => return Some((symbol, end - pos)),
                Node::Inner { next } => {
                    let bit = bits.get(end)?;
                    idx = usize::from(next[usize::from(bit)]?);
                    end += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeTable, Decoder};
    use crate::encode::Encoder;
    use crate::FanoError;

    fn both(table: &CodeTable) -> [Decoder<'_>; 2] {
        [Decoder::new(table), Decoder::with_tree_walk(table)]
    }

    #[test]
    fn aabbc_roundtrip() {
        let table = CodeTable::from_data(b"aabbc").unwrap();
        for decoder in &both(&table) {
            assert_eq!(decoder.decode(&[0, 0b1101_0100]).unwrap(), b"aabbc");
            assert_eq!(decoder.decode(&[2, 0b0001_0100]).unwrap(), b"aabb");
        }
    }

    #[test]
    fn single_symbol_roundtrip() {
        let table = CodeTable::from_data(b"aaaa").unwrap();
        for decoder in &both(&table) {
            assert_eq!(decoder.decode(&[4, 0]).unwrap(), b"aaaa");
        }
    }

    #[test]
    fn header_only_is_empty() {
        let table = CodeTable::from_data(b"abc").unwrap();
        for decoder in &both(&table) {
            assert_eq!(decoder.decode(&[0]).unwrap(), b"");
        }
    }

    #[test]
    fn missing_header() {
        let table = CodeTable::from_data(b"abc").unwrap();
        for decoder in &both(&table) {
            assert_eq!(decoder.decode(&[]), Err(FanoError::MissingHeader));
        }
    }

    #[test]
    fn invalid_padding() {
        let table = CodeTable::from_data(b"abc").unwrap();
        for decoder in &both(&table) {
            assert_eq!(
                decoder.decode(&[9, 0]),
                Err(FanoError::InvalidPadding {
                    padding: 9,
                    available: 8
                })
            );
        }
    }

    #[test]
    fn truncated_code_has_no_match() {
        // a=0 b=10 c=11, a lone `1` bit is not a code.
        let table = CodeTable::from_data(b"aabbc").unwrap();
        for decoder in &both(&table) {
            assert_eq!(
                decoder.decode(&[6, 0b0000_0010]),
                Err(FanoError::NoMatchingCode { position: 1 })
            );
        }
    }

    #[test]
    fn foreign_table_has_no_match() {
        let table = CodeTable::from_data(b"aaaa").unwrap();
        for decoder in &both(&table) {
            assert_eq!(
                decoder.decode(&[0, 0b0000_0010]),
                Err(FanoError::NoMatchingCode { position: 1 })
            );
        }
    }

    #[test]
    fn strategies_agree() {
        let data = b"how much wood would a woodchuck chuck if a woodchuck could chuck wood";
        let table = CodeTable::from_data(data).unwrap();
        let packed = Encoder::new(&table).encode(data).unwrap();
        let [scan, walk] = both(&table);
        assert_eq!(scan.decode(&packed).unwrap(), &data[..]);
        assert_eq!(walk.decode(&packed).unwrap(), &data[..]);
    }
}
