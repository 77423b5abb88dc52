use crate::{AttrIdError, ExtractOptions, ResourceIdConverter, Result};
use crate::{ATTR_SECTION_MARKER, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
use clap::parser::ValueSource;
use clap::{Arg, Command};
use tracing::info;

pub struct Cli;

impl Cli {
    pub fn build_command() -> Command {
        Command::new("android-attr-ids")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Builds the binary Android attribute resource-id table")
            .long_about("Builds the binary Android attribute resource-id table from the platform API listing (current.txt).\n\nEach `int NAME = ID;` declaration in the R.attr section is written as a little-endian u32 name byte length, the UTF-16LE name and a little-endian u32 id. Input can be '-' to use stdin, and output can be '-' to use stdout.")
            .arg(
                Arg::new("dump")
                    .short('d')
                    .long("dump")
                    .help("Read an encoded table and print it as text")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("section")
                    .short('s')
                    .long("section")
                    .help("Marker identifying the section header line")
                    .default_value(ATTR_SECTION_MARKER),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase log verbosity (-v, -vv, -vvv)")
                    .action(clap::ArgAction::Count),
            )
            .arg(
                Arg::new("input")
                    .help("Input file path (use '-' for stdin)")
                    .default_value(DEFAULT_INPUT_PATH)
                    .index(1),
            )
            .arg(
                Arg::new("output")
                    .help("Output file path (use '-' for stdout)")
                    .index(2),
            )
    }

    pub fn run_with_matches(matches: clap::ArgMatches) -> Result<()> {
        let input_path = matches
            .get_one::<String>("input")
            .map(String::as_str)
            .unwrap_or(DEFAULT_INPUT_PATH);
        let output_path = matches.get_one::<String>("output").map(String::as_str);
        let dump = matches.get_flag("dump");

        if dump {
            if matches.value_source("section") == Some(ValueSource::CommandLine) {
                return Err(AttrIdError::ParseError(
                    "Cannot use --section with --dump".to_string(),
                ));
            }
            let output_path = output_path.unwrap_or("-");
            let records = match input_path {
                "-" => ResourceIdConverter::dump_stdin(output_path)?,
                input => ResourceIdConverter::dump_file(input, output_path)?,
            };
            info!(records, "dumped resource id table");
            return Ok(());
        }

        let section_marker = matches
            .get_one::<String>("section")
            .cloned()
            .unwrap_or_else(|| ATTR_SECTION_MARKER.to_string());
        let options = ExtractOptions { section_marker };
        options.validate()?;

        let output_path = output_path.unwrap_or(DEFAULT_OUTPUT_PATH);
        let table = match (input_path, output_path) {
            ("-", "-") => ResourceIdConverter::convert_stdin_stdout(&options)?,
            ("-", output) => ResourceIdConverter::convert_stdin_to_file(output, &options)?,
            (input, "-") => ResourceIdConverter::convert_file_to_stdout(input, &options)?,
            (input, output) => ResourceIdConverter::convert_file(input, output, &options)?,
        };

        info!(count = table.len(), output = output_path, "conversion complete");
        Ok(())
    }

    /// Default log level for the number of `-v` flags given
    pub fn log_level(verbose: u8) -> &'static str {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
