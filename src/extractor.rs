use crate::{ASSIGNMENT_MARKER, ATTR_SECTION_MARKER, AttrIdError, DECLARATION_MARKER};
use crate::{ResourceIdTable, Result, SECTION_END_MARKER, STATEMENT_TERMINATOR};
use std::io::BufRead;
use tracing::{debug, info};

/// Options controlling which section of the listing is scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Substring identifying the section header line; must not be empty
    pub section_marker: String,
}

impl ExtractOptions {
    /// Reject options that would make every line a header line
    pub fn validate(&self) -> Result<()> {
        if self.section_marker.is_empty() {
            return Err(AttrIdError::ParseError(
                "Section marker cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            section_marker: ATTR_SECTION_MARKER.to_string(),
        }
    }
}

/// Line-oriented scanner that collects `int NAME = VALUE;` declarations
/// from one section of an API listing
pub struct AttributeExtractor<R: BufRead> {
    input: R,
    options: ExtractOptions,
    inside_attribute_block: bool,
    table: ResourceIdTable,
}

impl<R: BufRead> AttributeExtractor<R> {
    /// Create a new extractor over the given reader
    pub fn new(input: R, options: &ExtractOptions) -> Self {
        Self {
            input,
            options: options.clone(),
            inside_attribute_block: false,
            table: ResourceIdTable::new(),
        }
    }

    /// Scan the input and return the collected table
    ///
    /// Scanning stops at the first closing brace after the section header, so
    /// anything past the end of the section is never read.
    pub fn extract(mut self) -> Result<ResourceIdTable> {
        self.options.validate()?;

        let mut line = String::new();
        let mut line_number = 0usize;

        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;

            if !self.process_line(&line, line_number) {
                break;
            }
        }

        info!(count = self.table.len(), "extracted resource ids");
        Ok(self.table)
    }

    /// Process a single line, returning false once the section has ended
    fn process_line(&mut self, line: &str, line_number: usize) -> bool {
        if line.contains(self.options.section_marker.as_str()) {
            if !self.inside_attribute_block {
                debug!(line = line_number, marker = %self.options.section_marker, "section start");
            }
            self.inside_attribute_block = true;
            return true;
        }

        if !self.inside_attribute_block {
            return true;
        }

        if line.contains(SECTION_END_MARKER) {
            debug!(line = line_number, "section end");
            return false;
        }

        if let Some((name, id)) = parse_declaration(line) {
            self.table.insert(name, id);
        }
        true
    }
}

/// Split a declaration line into its name and decimal id
///
/// Returns `None` when a marker is missing or the value is not a `u32`.
pub(crate) fn parse_declaration(line: &str) -> Option<(&str, u32)> {
    let name_start = line.find(DECLARATION_MARKER)? + DECLARATION_MARKER.len();
    let rest = &line[name_start..];

    let name_end = rest.find(ASSIGNMENT_MARKER)?;
    let name = &rest[..name_end];

    let value = &rest[name_end + ASSIGNMENT_MARKER.len()..];
    let value_end = value.find(STATEMENT_TERMINATOR)?;
    let id = value[..value_end].trim().parse::<u32>().ok()?;

    Some((name, id))
}
