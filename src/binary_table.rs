use crate::{AttrIdError, ResourceIdTable, Result};
use std::io::{ErrorKind, Read, Write};
use tracing::{debug, info};

/// Little-endian writer for the resource-id table format
pub struct FastDataOutput<W: Write> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write> FastDataOutput<W> {
    /// Create a new FastDataOutput writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    /// Write a 32-bit unsigned integer (little-endian)
    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reader for the resource-id table format that tolerates a clean end of stream
pub struct FastDataInput<R: Read> {
    reader: R,
    position: u64,
}

impl<R: Read> FastDataInput<R> {
    /// Create a new FastDataInput reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            position: 0,
        }
    }

    /// Fill as much of `buf` as the stream allows, returning the count read
    ///
    /// A short count means the stream ended.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Read up to `length` bytes; the result is shorter if the stream ended
    pub fn read_bytes(&mut self, length: u32) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        (&mut self.reader)
            .take(u64::from(length))
            .read_to_end(&mut data)?;
        self.position += data.len() as u64;
        Ok(data)
    }

    /// Get current position in the stream
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// Encode text as UTF-16 little-endian without a byte-order mark
pub fn encode_utf16_le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Writes `(name length, UTF-16LE name, id)` records
pub struct ResourceIdEncoder<W: Write> {
    output: FastDataOutput<W>,
    records_written: usize,
}

impl<W: Write> ResourceIdEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            output: FastDataOutput::new(writer),
            records_written: 0,
        }
    }

    /// Write one record
    pub fn write_record(&mut self, name: &str, id: u32) -> Result<()> {
        let name_bytes = encode_utf16_le(name);
        let length = u32::try_from(name_bytes.len()).map_err(|_| AttrIdError::NameTooLong {
            name: name.to_string(),
            length: name_bytes.len(),
        })?;

        self.output.write_u32_le(length)?;
        self.output.write_bytes(&name_bytes)?;
        self.output.write_u32_le(id)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write every entry of the table in insertion order
    pub fn encode(&mut self, table: &ResourceIdTable) -> Result<()> {
        for (name, id) in table {
            self.write_record(name, *id)?;
        }
        Ok(())
    }

    /// Flush the output and return the underlying writer
    pub fn finish(self) -> Result<W> {
        info!(
            records = self.records_written,
            bytes = self.output.bytes_written(),
            "wrote resource id table"
        );
        self.output.into_inner()
    }
}

/// Reads records written by [`ResourceIdEncoder`] until the end of the stream
pub struct ResourceIdDecoder<R: Read> {
    input: FastDataInput<R>,
    records_read: usize,
}

impl<R: Read> ResourceIdDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            input: FastDataInput::new(reader),
            records_read: 0,
        }
    }

    /// Read the next record, or `None` at a clean end of stream
    pub fn read_record(&mut self) -> Result<Option<(String, u32)>> {
        let index = self.records_read;

        let mut length_buf = [0u8; 4];
        match self.input.read_into(&mut length_buf)? {
            0 => return Ok(None),
            4 => {}
            _ => {
                return Err(AttrIdError::TruncatedRecord {
                    index,
                    field: "name length",
                });
            }
        }
        let length = u32::from_le_bytes(length_buf);
        if length % 2 != 0 {
            return Err(AttrIdError::OddNameLength { index, length });
        }

        let name_bytes = self.input.read_bytes(length)?;
        if name_bytes.len() != length as usize {
            return Err(AttrIdError::TruncatedRecord {
                index,
                field: "name",
            });
        }
        let units: Vec<u16> = name_bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let name = String::from_utf16(&units).map_err(|_| AttrIdError::InvalidName { index })?;

        let mut id_buf = [0u8; 4];
        if self.input.read_into(&mut id_buf)? != 4 {
            return Err(AttrIdError::TruncatedRecord { index, field: "id" });
        }

        self.records_read += 1;
        Ok(Some((name, u32::from_le_bytes(id_buf))))
    }

    /// Read every remaining record into a table
    pub fn decode(mut self) -> Result<ResourceIdTable> {
        let mut table = ResourceIdTable::new();
        while let Some((name, id)) = self.read_record()? {
            table.insert(name, id);
        }
        debug!(
            records = self.records_read,
            bytes = self.input.position(),
            "decoded resource id table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(table: &ResourceIdTable) -> Vec<u8> {
        let mut encoder = ResourceIdEncoder::new(Vec::new());
        encoder.encode(table).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_record_layout() {
        let mut encoder = ResourceIdEncoder::new(Vec::new());
        encoder.write_record("id", 0x0101_0098).unwrap();
        let bytes = encoder.finish().unwrap();

        assert_eq!(
            bytes,
            vec![
                0x04, 0x00, 0x00, 0x00, // name length
                b'i', 0x00, b'd', 0x00, // name
                0x98, 0x00, 0x01, 0x01, // id
            ]
        );
    }

    #[test]
    fn test_table_round_trip_preserves_order() {
        let table: ResourceIdTable = vec![
            ("textSize".to_string(), 16842901),
            ("textColor".to_string(), 16842904),
            ("".to_string(), 0),
            ("max".to_string(), u32::MAX),
        ]
        .into_iter()
        .collect();

        let bytes = encode(&table);
        let decoded = ResourceIdDecoder::new(bytes.as_slice()).decode().unwrap();
        assert_eq!(decoded.into_entries(), table.into_entries());
    }

    #[test]
    fn test_surrogate_pair_name() {
        let name = "a\u{1F600}";
        assert_eq!(encode_utf16_le(name).len(), 6);

        let table: ResourceIdTable = vec![(name.to_string(), 1)].into_iter().collect();
        let bytes = encode(&table);
        assert_eq!(&bytes[..4], &6u32.to_le_bytes());

        let decoded = ResourceIdDecoder::new(bytes.as_slice()).decode().unwrap();
        assert_eq!(decoded.get(name), Some(1));
    }

    #[test]
    fn test_empty_input_decodes_to_empty_table() {
        let decoded = ResourceIdDecoder::new(std::io::empty()).decode().unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_truncated_record() {
        let table: ResourceIdTable = vec![("a".to_string(), 1), ("b".to_string(), 2)]
            .into_iter()
            .collect();
        let bytes = encode(&table);

        let result = ResourceIdDecoder::new(&bytes[..bytes.len() - 1]).decode();
        assert!(matches!(
            result,
            Err(AttrIdError::TruncatedRecord { index: 1, field: "id" })
        ));

        let result = ResourceIdDecoder::new(&bytes[..12]).decode();
        assert!(matches!(
            result,
            Err(AttrIdError::TruncatedRecord { index: 1, field: "name length" })
        ));

        let result = ResourceIdDecoder::new(&bytes[..5]).decode();
        assert!(matches!(
            result,
            Err(AttrIdError::TruncatedRecord { index: 0, field: "name" })
        ));
    }

    #[test]
    fn test_odd_name_length() {
        let bytes = [0x03, 0x00, 0x00, 0x00, b'a', 0x00, b'b', 0x01, 0x00, 0x00, 0x00];
        let result = ResourceIdDecoder::new(&bytes[..]).decode();
        assert!(matches!(
            result,
            Err(AttrIdError::OddNameLength { index: 0, length: 3 })
        ));
    }

    #[test]
    fn test_lone_surrogate_is_invalid_name() {
        let bytes = [0x02, 0x00, 0x00, 0x00, 0x00, 0xD8, 0x01, 0x00, 0x00, 0x00];
        let result = ResourceIdDecoder::new(&bytes[..]).decode();
        assert!(matches!(result, Err(AttrIdError::InvalidName { index: 0 })));
    }
}
