use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a map from a JSON field list and write it serialized.
    Encode(EncodeArgs),
    /// Decode a serialized map and print its fields.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON file holding an array of `{"id", "type", "value"}` fields.
    pub input: PathBuf,
    /// Where to write the serialized map.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
    /// Write only the payload, without the 4-byte length header.
    #[arg(long)]
    pub content: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Serialized map file.
    pub path: PathBuf,
    /// The file holds only the payload, without the 4-byte length header.
    #[arg(long)]
    pub content: bool,
    /// JSON object mapping field ids to display names.
    #[arg(long, value_name = "FILE")]
    pub names: Option<PathBuf>,
    /// Maximum list elements to show. Default: all.
    #[arg(long)]
    pub max_elems: Option<usize>,
    /// Maximum bytes to show per string. Default: all.
    #[arg(long)]
    pub max_str_len: Option<usize>,
    /// Capacity of the rendered debug text in bytes.
    #[arg(long, default_value_t = fieldmap_codec::DEFAULT_MAX_TEXT_SIZE)]
    pub max_size: usize,
    /// Refuse input files larger than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_INPUT)]
    pub max_input: u64,
}

/// Default input size limit: 16 MiB.
pub const DEFAULT_MAX_INPUT: u64 = 16 * 1024 * 1024;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
