//! A library for building the Android attribute resource-id lookup table.
//!
//! Reads the platform API listing (`current.txt`), pulls the integer constants
//! declared in the `R.attr` section and writes them as a flat binary table of
//! length-prefixed UTF-16LE names followed by their 32-bit ids.
//!
//! # Examples
//!
//! ```no_run
//! use android_attr_ids::{ExtractOptions, ResourceIdConverter};
//!
//! // Convert a file
//! ResourceIdConverter::convert_file("current.txt", "resourceIds.bin", &ExtractOptions::default()).unwrap();
//!
//! // Convert in memory
//! let listing = b"R.attr {\n  int textSize = 16842901;\n}\n";
//! let encoded = ResourceIdConverter::convert_bytes(listing, &ExtractOptions::default()).unwrap();
//! assert_eq!(encoded.len(), 4 + 16 + 4);
//! ```

use std::io;
use thiserror::Error;

mod binary_table;
pub mod cli;
mod converter;
mod extractor;
mod table;

pub use binary_table::{FastDataInput, FastDataOutput, ResourceIdDecoder, ResourceIdEncoder};
pub use converter::ResourceIdConverter;
pub use extractor::{AttributeExtractor, ExtractOptions};
pub use table::ResourceIdTable;

/// Error types for extraction, encoding and decoding
#[derive(Error, Debug)]
pub enum AttrIdError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Name {name:?} is too long to encode ({length} bytes)")]
    NameTooLong { name: String, length: usize },
    #[error("Record {index} is truncated while reading its {field}")]
    TruncatedRecord { index: usize, field: &'static str },
    #[error("Record {index} has an odd name length of {length} bytes")]
    OddNameLength { index: usize, length: u32 },
    #[error("Record {index} has a name that is not valid UTF-16")]
    InvalidName { index: usize },
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, AttrIdError>;

// Listing markers
pub const ATTR_SECTION_MARKER: &str = "R.attr";
pub const SECTION_END_MARKER: char = '}';
pub const DECLARATION_MARKER: &str = "int ";
pub const ASSIGNMENT_MARKER: &str = " = ";
pub const STATEMENT_TERMINATOR: char = ';';

// Default locations, relative to the working directory
pub const DEFAULT_INPUT_PATH: &str = "current.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "./Resources/resourceIds.bin";
