use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use innamark::registry::SupportedFileType;

#[derive(Debug, Clone, Parser)]
#[command(name = "innamark", version, about = "Hide and recover watermarks in text and ZIP covers")]
pub struct Args {
	/// Log verbosity.
	///
	/// Repeat for more detail: warnings, info, debug, trace.
	#[arg(long, short = 'v', global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// Write logs to a file.
	///
	/// If the path is a directory, a file with a timestamped name is
	/// created in it. Logs written to a file are in JSON format.
	#[arg(long, global = true, value_hint = ValueHint::AnyPath, value_name = "PATH")]
	pub log_file: Option<PathBuf>,

	/// Override the cover's file type instead of trusting its extension.
	#[arg(long, short = 't', global = true, value_enum, value_name = "TYPE")]
	pub file_type: Option<FileType>,

	/// What to do.
	#[command(subcommand)]
	pub action: Action,
}

/// Cover file type, for the '-t' override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileType {
	/// UTF-8 text cover.
	Text,

	/// ZIP archive cover.
	Zip,
}

impl From<FileType> for SupportedFileType {
	fn from(file_type: FileType) -> Self {
		match file_type {
			FileType::Text => Self::Text,
			FileType::Zip => Self::Zip,
		}
	}
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
	/// Hide a watermark in a cover file.
	Add(AddArgs),

	/// List the watermarks hidden in a cover file.
	List(ListArgs),

	/// Strip all watermarks from a cover file.
	Remove(RemoveArgs),

	/// Operate on text covers given inline or on standard input.
	#[command(subcommand)]
	Text(TextAction),
}

#[derive(Debug, Clone, Parser)]
pub struct AddArgs {
	/// Cover file.
	#[arg(value_hint = ValueHint::FilePath, value_name = "PATH")]
	pub input: PathBuf,

	/// Watermark text.
	#[arg(value_name = "WATERMARK")]
	pub watermark: String,

	/// Output file.
	///
	/// Defaults to rewriting the input in place.
	#[arg(long, short = 'o', value_hint = ValueHint::AnyPath, value_name = "PATH")]
	pub output: Option<PathBuf>,

	/// Prefix the watermark with its length.
	#[arg(long)]
	pub sized: bool,

	/// Deflate the watermark.
	#[arg(long)]
	pub compressed: bool,

	/// Guard the watermark with a CRC-32 checksum.
	#[arg(long, conflicts_with = "sha3_256")]
	pub crc32: bool,

	/// Guard the watermark with a SHA3-256 hash.
	#[arg(long)]
	pub sha3_256: bool,
}

impl AddArgs {
	/// Whether any tag-variant flag was given.
	pub fn wants_tag(&self) -> bool {
		self.sized || self.compressed || self.crc32 || self.sha3_256
	}
}

#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
	/// Cover file.
	#[arg(value_hint = ValueHint::FilePath, value_name = "PATH")]
	pub input: PathBuf,

	/// Keep every recovered copy.
	///
	/// By default duplicates are squashed and only the most frequent
	/// watermark is kept.
	#[arg(long)]
	pub all: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct RemoveArgs {
	/// Cover file.
	#[arg(value_hint = ValueHint::FilePath, value_name = "PATH")]
	pub input: PathBuf,

	/// Output file.
	///
	/// Defaults to rewriting the input in place.
	#[arg(long, short = 'o', value_hint = ValueHint::AnyPath, value_name = "PATH")]
	pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TextAction {
	/// Watermark a text cover and print the result.
	Add {
		/// Watermark text.
		#[arg(value_name = "WATERMARK")]
		watermark: String,

		/// Cover text; read from standard input when absent.
		#[arg(value_name = "COVER")]
		cover: Option<String>,

		/// Embed the watermark bytes as-is, without tag framing.
		#[arg(long)]
		no_wrap: bool,
	},

	/// List the watermarks hidden in a text cover.
	List {
		/// Cover text; read from standard input when absent.
		#[arg(value_name = "COVER")]
		cover: Option<String>,

		/// Keep every recovered copy.
		#[arg(long)]
		all: bool,
	},

	/// Strip all watermarks from a text cover and print the result.
	Remove {
		/// Cover text; read from standard input when absent.
		#[arg(value_name = "COVER")]
		cover: Option<String>,
	},
}
