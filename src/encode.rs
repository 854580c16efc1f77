//! A module for all encoding needs.
use crate::alloc::vec::Vec;
use crate::bits::LsbBuffer;
use crate::table::CodeTable;
use crate::FanoError;

#[cfg(feature = "std")]
use crate::decode::AllResult;
#[cfg(feature = "std")]
use std::io::{self, Read, Write};

/// Encodes byte buffers with a fixed code table.
pub struct Encoder<'t> {
    table: &'t CodeTable,
}

/// An encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, 't, W> {
    encoder: &'d Encoder<'t>,
    writer: W,
}

impl<'t> Encoder<'t> {
    /// Create an encoder for data described by `table`.
    ///
    /// Every byte passed to [`encode`] must have a code in the table, which is always the case
    /// when the table was built from the same data.
    ///
    /// [`encode`]: #method.encode
    pub fn new(table: &'t CodeTable) -> Self {
        Encoder { table }
    }

    /// The table this encoder uses.
    pub fn table(&self) -> &'t CodeTable {
        self.table
    }

    /// Encode `data` into a packed buffer.
    ///
    /// The first byte of the result holds the number of padding bits in its last byte, the
    /// remaining bytes hold the codes of all input bytes in order.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, FanoError> {
        // Reserve the header, it is only known once all codes are packed.
        let mut out = Vec::with_capacity(1 + data.len());
        out.push(0);

        let mut buffer = LsbBuffer::new();
        for (position, &symbol) in data.iter().enumerate() {
            let code = self
                .table
                .get(symbol)
                .ok_or(FanoError::MissingSymbol { symbol, position })?;
            buffer.buffer_code(code, &mut out);
        }

        let padding = buffer.finish(&mut out);
        out[0] = padding;

        log::debug!(
            "encoded {} bytes into {} bytes, {} padding bits",
            data.len(),
            out.len(),
            padding
        );

        Ok(out)
    }

    /// Construct an encoder into a writer.
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&self, writer: W) -> IntoStream<'_, 't, W> {
        IntoStream {
            encoder: self,
            writer,
        }
    }
}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, '_, W> {
    /// Encode all data from a reader.
    ///
    /// The reader is drained completely before anything is written, the packed buffer is then
    /// written as a whole.
    pub fn encode_all(self, mut read: impl Read) -> AllResult {
        let IntoStream { encoder, mut writer } = self;

        let mut data = Vec::new();
        let mut bytes_written = 0;

        let status = (|| -> io::Result<()> {
            read.read_to_end(&mut data)?;
            let packed = encoder
                .encode(&data)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            writer.write_all(&packed)?;
            bytes_written = packed.len();
            Ok(())
        })();

        AllResult {
            bytes_read: data.len(),
            bytes_written,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeTable, Encoder};
    use crate::FanoError;

    #[test]
    fn header_counts_padding() {
        let data = b"aabbc";
        let table = CodeTable::from_data(data).unwrap();
        // a=0 a=0 b=10 b=10 c=11 gives 8 bits.
        let packed = Encoder::new(&table).encode(data).unwrap();
        assert_eq!(packed, [0, 0b1101_0100]);

        let packed = Encoder::new(&table).encode(b"aabb").unwrap();
        assert_eq!(packed, [2, 0b0001_0100]);
    }

    #[test]
    fn single_symbol() {
        let table = CodeTable::from_data(b"aaaa").unwrap();
        let packed = Encoder::new(&table).encode(b"aaaa").unwrap();
        assert_eq!(packed, [4, 0]);
    }

    #[test]
    fn empty_data_is_only_header() {
        let table = CodeTable::from_data(b"abc").unwrap();
        assert_eq!(Encoder::new(&table).encode(b"").unwrap(), [0]);
    }

    #[test]
    fn unknown_symbol_rejected() {
        let table = CodeTable::from_data(b"abc").unwrap();
        let result = Encoder::new(&table).encode(b"abcd");
        assert_eq!(
            result,
            Err(FanoError::MissingSymbol {
                symbol: b'd',
                position: 3
            })
        );
    }
}
