use crate::{AttributeExtractor, ExtractOptions, ResourceIdDecoder, ResourceIdEncoder};
use crate::{ResourceIdTable, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use tracing::debug;

/// High-level converter from an API listing to the binary resource-id table
pub struct ResourceIdConverter;

impl ResourceIdConverter {
    /// Convert a listing from a reader to a writer
    ///
    /// Extraction finishes before the first byte is written. The table is
    /// returned so callers can report on it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use android_attr_ids::{ExtractOptions, ResourceIdConverter};
    /// use std::fs::File;
    /// use std::io::BufReader;
    ///
    /// let input = BufReader::new(File::open("current.txt").unwrap());
    /// let output = File::create("resourceIds.bin").unwrap();
    /// ResourceIdConverter::convert(input, output, &ExtractOptions::default()).unwrap();
    /// ```
    pub fn convert<R: BufRead, W: Write>(
        reader: R,
        writer: W,
        options: &ExtractOptions,
    ) -> Result<ResourceIdTable> {
        let table = AttributeExtractor::new(reader, options).extract()?;

        let mut encoder = ResourceIdEncoder::new(writer);
        encoder.encode(&table)?;
        encoder.finish()?;

        Ok(table)
    }

    /// Convert a listing file to a table file
    ///
    /// The output directory must already exist.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use android_attr_ids::{ExtractOptions, ResourceIdConverter};
    ///
    /// ResourceIdConverter::convert_file(
    ///     "current.txt",
    ///     "./Resources/resourceIds.bin",
    ///     &ExtractOptions::default(),
    /// )
    /// .unwrap();
    /// ```
    pub fn convert_file(
        input_path: &str,
        output_path: &str,
        options: &ExtractOptions,
    ) -> Result<ResourceIdTable> {
        debug!(input = input_path, output = output_path, "converting file");

        // Extract first so the output is never touched when the input is unreadable
        let input_file = File::open(input_path)?;
        let table = AttributeExtractor::new(BufReader::new(input_file), options).extract()?;

        let output_file = File::create(output_path)?;
        let mut encoder = ResourceIdEncoder::new(BufWriter::new(output_file));
        encoder.encode(&table)?;
        encoder.finish()?;

        Ok(table)
    }

    /// Convert a listing from stdin to stdout
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use android_attr_ids::{ExtractOptions, ResourceIdConverter};
    ///
    /// // cat current.txt | android-attr-ids - - > resourceIds.bin
    /// ResourceIdConverter::convert_stdin_stdout(&ExtractOptions::default()).unwrap();
    /// ```
    pub fn convert_stdin_stdout(options: &ExtractOptions) -> Result<ResourceIdTable> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let writer = BufWriter::new(stdout.lock());

        Self::convert(stdin.lock(), writer, options)
    }

    /// Convert a listing from stdin to a table file
    pub fn convert_stdin_to_file(
        output_path: &str,
        options: &ExtractOptions,
    ) -> Result<ResourceIdTable> {
        let stdin = io::stdin();
        let table = AttributeExtractor::new(stdin.lock(), options).extract()?;

        let output_file = File::create(output_path)?;
        let mut encoder = ResourceIdEncoder::new(BufWriter::new(output_file));
        encoder.encode(&table)?;
        encoder.finish()?;

        Ok(table)
    }

    /// Convert a listing file to stdout
    pub fn convert_file_to_stdout(
        input_path: &str,
        options: &ExtractOptions,
    ) -> Result<ResourceIdTable> {
        let input_file = File::open(input_path)?;
        let reader = BufReader::new(input_file);
        let stdout = io::stdout();
        let writer = BufWriter::new(stdout.lock());

        Self::convert(reader, writer, options)
    }

    /// Convert a listing already in memory to the encoded table bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use android_attr_ids::{ExtractOptions, ResourceIdConverter};
    ///
    /// let listing = b"R.attr {\n  int id = 16842960;\n}\n";
    /// let bytes = ResourceIdConverter::convert_bytes(listing, &ExtractOptions::default()).unwrap();
    /// assert_eq!(bytes.len(), 4 + 4 + 4);
    /// ```
    pub fn convert_bytes(listing: &[u8], options: &ExtractOptions) -> Result<Vec<u8>> {
        let mut output_data = Vec::new();
        Self::convert(listing, &mut output_data, options)?;
        Ok(output_data)
    }

    /// Decode an encoded table and write one `name = id` line per record
    ///
    /// Records are written as they are read, so a blob holding the same name
    /// twice prints both lines. Returns the number of records.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use android_attr_ids::ResourceIdConverter;
    /// use std::fs::File;
    ///
    /// let input = File::open("resourceIds.bin").unwrap();
    /// ResourceIdConverter::dump(input, std::io::stdout()).unwrap();
    /// ```
    pub fn dump<R: Read, W: Write>(reader: R, mut writer: W) -> Result<usize> {
        let mut decoder = ResourceIdDecoder::new(reader);
        let mut records = 0;
        while let Some((name, id)) = decoder.read_record()? {
            writeln!(writer, "{} = {}", name, id)?;
            records += 1;
        }
        writer.flush()?;
        Ok(records)
    }

    /// Dump an encoded table file to a text file, or stdout when `output_path` is `-`
    pub fn dump_file(input_path: &str, output_path: &str) -> Result<usize> {
        let reader = BufReader::new(File::open(input_path)?);
        if output_path == "-" {
            let stdout = io::stdout();
            return Self::dump(reader, BufWriter::new(stdout.lock()));
        }
        Self::dump(reader, BufWriter::new(File::create(output_path)?))
    }

    /// Dump an encoded table from stdin
    pub fn dump_stdin(output_path: &str) -> Result<usize> {
        let stdin = io::stdin();
        if output_path == "-" {
            let stdout = io::stdout();
            return Self::dump(stdin.lock(), BufWriter::new(stdout.lock()));
        }
        Self::dump(stdin.lock(), BufWriter::new(File::create(output_path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttrIdError;
    use tempfile::TempDir;

    const LISTING: &str = "R.attr {\n\
        public static final int textColor = 16842904;\n\
        public static final int NOTANATTR 5\n\
        public static final int textSize = 16842901;\n\
        }\n";

    #[test]
    fn test_convert_bytes_matches_record_layout() {
        let bytes = ResourceIdConverter::convert_bytes(LISTING.as_bytes(), &ExtractOptions::default())
            .unwrap();

        let mut expected = Vec::new();
        for (name, id) in [("textColor", 16842904u32), ("textSize", 16842901)] {
            let units: Vec<u8> = name.encode_utf16().flat_map(u16::to_le_bytes).collect();
            expected.extend_from_slice(&(units.len() as u32).to_le_bytes());
            expected.extend_from_slice(&units);
            expected.extend_from_slice(&id.to_le_bytes());
        }
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_convert_file_and_dump() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("current.txt");
        let output = dir.path().join("resourceIds.bin");
        let text = dir.path().join("dump.txt");
        std::fs::write(&input, LISTING).unwrap();

        let table = ResourceIdConverter::convert_file(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(table.len(), 2);

        let records =
            ResourceIdConverter::dump_file(output.to_str().unwrap(), text.to_str().unwrap())
                .unwrap();
        assert_eq!(records, table.len());
        assert_eq!(
            std::fs::read_to_string(&text).unwrap(),
            "textColor = 16842904\ntextSize = 16842901\n"
        );
    }

    #[test]
    fn test_dump_writes_every_record_including_duplicates() {
        let mut encoder = ResourceIdEncoder::new(Vec::new());
        encoder.write_record("a", 1).unwrap();
        encoder.write_record("b", 2).unwrap();
        encoder.write_record("a", 3).unwrap();
        let blob = encoder.finish().unwrap();

        let mut text = Vec::new();
        let records = ResourceIdConverter::dump(blob.as_slice(), &mut text).unwrap();
        assert_eq!(records, 3);
        assert_eq!(String::from_utf8(text).unwrap(), "a = 1\nb = 2\na = 3\n");
    }

    #[test]
    fn test_missing_output_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("current.txt");
        let output = dir.path().join("Resources").join("resourceIds.bin");
        std::fs::write(&input, LISTING).unwrap();

        let result = ResourceIdConverter::convert_file(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            &ExtractOptions::default(),
        );
        assert!(matches!(result, Err(AttrIdError::Io(_))));
    }

    #[test]
    fn test_missing_input_leaves_output_untouched() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("missing.txt");
        let output = dir.path().join("resourceIds.bin");

        let result = ResourceIdConverter::convert_file(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            &ExtractOptions::default(),
        );
        assert!(matches!(result, Err(AttrIdError::Io(_))));
        assert!(!output.exists());
    }
}
