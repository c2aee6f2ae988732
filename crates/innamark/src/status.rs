//! Event reporting for codec operations.
//!
//! Codec operations never panic on malformed input and never abort halfway
//! with an exception: they collect [`Event`]s into a [`Status`] that travels
//! alongside the (optional) value as an [`Outcome`]. Callers decide how fatal
//! an error event is; the library itself only ever reports.

use std::borrow::Cow;
use std::fmt;

/// Severity of an [`Event`].
///
/// Ordered by precedence: a [`Status`] classifies as the highest severity of
/// any event it carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
	/// Informational; the operation did what was asked.
	Success,

	/// The operation produced a value, but not quite the one asked for.
	Warning,

	/// The operation could not produce a (complete) value.
	Error,
}

/// Everything noteworthy a codec operation can report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
	/// Watermark copies were placed into a text cover.
	Inserted {
		/// Number of complete copies placed.
		copies: usize,
		/// Whether a final partial copy was left out for lack of positions.
		incomplete: bool,
	},

	/// The watermark does not fit into the cover even once.
	OversizedWatermark {
		/// Insert positions needed for one recoverable copy.
		required: usize,
		/// Insert positions actually present.
		actual: usize,
	},

	/// Watermark characters exist in the cover but no complete framing was
	/// found; the whole cover was decoded as a single best-effort segment.
	IncompleteWatermark,

	/// Several distinct watermarks were tied for most frequent.
	MultipleMostFrequent {
		/// Number of tied values.
		count: usize,
	},

	/// Frequency analysis failed.
	FrequencyAnalysis {
		/// What went wrong.
		reason: String,
	},

	/// A decoded digit group reconstructs to a value outside 0..=255.
	///
	/// The offending byte is skipped; decoding continues.
	DecodingInvalidByte {
		/// The out-of-range value.
		value: u32,
	},

	/// A character handed to the transcoder is not part of the alphabet.
	DecodingInvalidChar {
		/// The foreign character.
		ch: char,
	},

	/// The cover already contains characters of the codec's full alphabet.
	///
	/// Embedding over them would make earlier watermarks unrecoverable, so
	/// nothing is written.
	ContainsAlphabetChars {
		/// The offending characters, in order of first appearance.
		chars: Vec<char>,
	},

	/// A recovered string contains U+FFFD replacement characters.
	StringDecode {
		/// The lossily decoded text.
		decoded: String,
	},

	/// The first byte of a watermark does not name a known tag variant.
	UnknownTag {
		/// The unrecognised tag byte.
		byte: u8,
	},

	/// A tag body is too short or otherwise unreadable for its variant.
	MalformedTag {
		/// Parser diagnostic.
		reason: String,
	},

	/// A sized tag's declared length disagrees with its content.
	SizeMismatch {
		/// Length declared in the tag.
		declared: u32,
		/// Length of the actual content.
		actual: u32,
	},

	/// A tag's stored digest disagrees with one recomputed over its content.
	ChecksumMismatch {
		/// Name of the tag variant that failed.
		variant: &'static str,
	},

	/// A compressed tag body could not be inflated.
	Inflation {
		/// Decompressor diagnostic.
		reason: String,
	},

	/// A byte where a ZIP record should start matches no known magic.
	InvalidMagicBytes {
		/// Byte offset of the unrecognised record.
		offset: usize,
		/// The four bytes found there, little-endian.
		magic: u32,
	},

	/// A ZIP record or data blob runs past the end of the input.
	TruncatedArchive {
		/// Byte offset at which data ran out.
		offset: usize,
	},

	/// Adding the watermark would push a header's extra fields past 2^16 − 1
	/// bytes.
	OversizedHeader {
		/// The extra-field total the addition would have produced.
		total: usize,
	},

	/// The archive has no Local File Header to carry a watermark.
	EmptyArchive,

	/// A text cover is not valid UTF-8.
	InvalidUtf8 {
		/// Decoder diagnostic.
		reason: String,
	},

	/// The source has no file extension and no explicit type was supplied.
	NoFileType {
		/// The extensionless source name.
		path: String,
	},

	/// The file extension is not registered to any codec.
	UnsupportedType {
		/// The unregistered extension.
		extension: String,
	},

	/// The explicitly requested type disagrees with the registered one.
	WrongType {
		/// The type the caller asked for.
		declared: &'static str,
		/// The extension that contradicts it.
		extension: String,
	},
}

impl Event {
	/// Severity of this event.
	pub fn kind(&self) -> EventKind {
		match self {
			Self::Inserted { .. } => EventKind::Success,
			Self::OversizedWatermark { .. }
			| Self::IncompleteWatermark
			| Self::MultipleMostFrequent { .. }
			| Self::DecodingInvalidByte { .. }
			| Self::StringDecode { .. } => EventKind::Warning,
			_ => EventKind::Error,
		}
	}

	/// Which operation family reports this event.
	pub fn source(&self) -> &'static str {
		match self {
			Self::Inserted { .. }
			| Self::OversizedWatermark { .. }
			| Self::ContainsAlphabetChars { .. } => "text.add",
			Self::IncompleteWatermark | Self::StringDecode { .. } => "text.watermarks",
			Self::MultipleMostFrequent { .. } | Self::FrequencyAnalysis { .. } => "frequency",
			Self::DecodingInvalidByte { .. } | Self::DecodingInvalidChar { .. } => {
				"transcode.decode"
			}
			Self::UnknownTag { .. } | Self::MalformedTag { .. } => "tag.parse",
			Self::SizeMismatch { .. } | Self::ChecksumMismatch { .. } | Self::Inflation { .. } => {
				"tag.validate"
			}
			Self::InvalidMagicBytes { .. } | Self::TruncatedArchive { .. } => "zip.parse",
			Self::OversizedHeader { .. } | Self::EmptyArchive => "zip.add",
			Self::InvalidUtf8 { .. }
			| Self::NoFileType { .. }
			| Self::UnsupportedType { .. }
			| Self::WrongType { .. } => "facade",
		}
	}

	/// Human-readable description of the event.
	pub fn message(&self) -> Cow<'static, str> {
		match self {
			Self::Inserted { copies, incomplete: false } => {
				Cow::Owned(format!("inserted {copies} watermark copies"))
			}
			Self::Inserted { copies, incomplete: true } => Cow::Owned(format!(
				"inserted {copies} watermark copies; leftover positions could not hold another"
			)),
			Self::OversizedWatermark { required, actual } => Cow::Owned(format!(
				"watermark needs {required} insert positions, cover has {actual}"
			)),
			Self::IncompleteWatermark => {
				Cow::Borrowed("watermark characters present but no complete copy was framed")
			}
			Self::MultipleMostFrequent { count } => {
				Cow::Owned(format!("{count} watermarks are tied for most frequent"))
			}
			Self::FrequencyAnalysis { reason } => {
				Cow::Owned(format!("frequency analysis failed: {reason}"))
			}
			Self::DecodingInvalidByte { value } => {
				Cow::Owned(format!("digit group decodes to {value}, not a byte; skipped"))
			}
			Self::DecodingInvalidChar { ch } => {
				Cow::Owned(format!("character {ch:?} (U+{:04X}) is not in the alphabet", *ch as u32))
			}
			Self::ContainsAlphabetChars { chars } => {
				Cow::Owned(format!("cover already contains alphabet characters: {chars:?}"))
			}
			Self::StringDecode { .. } => {
				Cow::Borrowed("recovered text contains U+FFFD replacement characters")
			}
			Self::UnknownTag { byte } => Cow::Owned(format!("unknown tag byte 0x{byte:02X}")),
			Self::MalformedTag { reason } => Cow::Owned(format!("malformed tag: {reason}")),
			Self::SizeMismatch { declared, actual } => Cow::Owned(format!(
				"tag declares {declared} content bytes but carries {actual}"
			)),
			Self::ChecksumMismatch { variant } => {
				Cow::Owned(format!("{variant} digest does not match the content"))
			}
			Self::Inflation { reason } => Cow::Owned(format!("inflation failed: {reason}")),
			Self::InvalidMagicBytes { offset, magic } => Cow::Owned(format!(
				"invalid magic bytes 0x{magic:08X} at offset {offset}"
			)),
			Self::TruncatedArchive { offset } => {
				Cow::Owned(format!("archive data ran out at offset {offset}"))
			}
			Self::OversizedHeader { total } => Cow::Owned(format!(
				"extra fields would total {total} bytes, above the 65535 byte cap"
			)),
			Self::EmptyArchive => {
				Cow::Borrowed("archive has no local file header to carry a watermark")
			}
			Self::InvalidUtf8 { reason } => Cow::Owned(format!("cover is not UTF-8: {reason}")),
			Self::NoFileType { path } => Cow::Owned(format!(
				"cannot derive a file type for {path:?}; supply one explicitly"
			)),
			Self::UnsupportedType { extension } => {
				Cow::Owned(format!("no codec registered for extension {extension:?}"))
			}
			Self::WrongType { declared, extension } => Cow::Owned(format!(
				"requested type {declared} but extension {extension:?} is registered to another codec"
			)),
		}
	}
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match self.kind() {
			EventKind::Success => "success",
			EventKind::Warning => "warning",
			EventKind::Error => "error",
		};
		write!(f, "{kind} ({}): {}", self.source(), self.message())
	}
}

/// Ordered collection of the events an operation reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
	events: Vec<Event>,
}

impl Status {
	/// An empty, successful status.
	pub fn success() -> Self {
		Self::default()
	}

	/// A status carrying a single event.
	pub fn from_event(event: Event) -> Self {
		Self { events: vec![event] }
	}

	/// Record another event.
	pub fn add_event(&mut self, event: Event) {
		self.events.push(event);
	}

	/// Concatenate another status's events onto this one.
	pub fn append(&mut self, other: Status) {
		self.events.extend(other.events);
	}

	/// The events recorded so far, in order.
	pub fn events(&self) -> &[Event] {
		&self.events
	}

	/// Overall severity: the maximum of all event kinds, success if empty.
	pub fn kind(&self) -> EventKind {
		self.events
			.iter()
			.map(Event::kind)
			.max()
			.unwrap_or(EventKind::Success)
	}

	/// Whether no warning or error was recorded.
	pub fn is_success(&self) -> bool {
		self.kind() == EventKind::Success
	}

	/// Whether warnings but no errors were recorded.
	pub fn is_warning(&self) -> bool {
		self.kind() == EventKind::Warning
	}

	/// Whether any error was recorded.
	pub fn is_error(&self) -> bool {
		self.kind() == EventKind::Error
	}

	/// Attach a value, turning this status into an [`Outcome`].
	pub fn into_outcome<T>(self, value: T) -> Outcome<T> {
		Outcome::new(self, Some(value))
	}

	/// Turn this status into a value-less [`Outcome`].
	pub fn into_empty<T>(self) -> Outcome<T> {
		Outcome::new(self, None)
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.events.is_empty() {
			return write!(f, "success");
		}

		for (n, event) in self.events.iter().enumerate() {
			if n > 0 {
				writeln!(f)?;
			}
			write!(f, "{event}")?;
		}

		Ok(())
	}
}

/// A [`Status`] paired with the operation's optional value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
	status: Status,
	value: Option<T>,
}

impl<T> Outcome<T> {
	/// An outcome from explicit parts.
	pub fn new(status: Status, value: Option<T>) -> Self {
		Self { status, value }
	}

	/// A quiet success carrying a value.
	pub fn success(value: T) -> Self {
		Self::new(Status::success(), Some(value))
	}

	/// The status of the operation.
	pub fn status(&self) -> &Status {
		&self.status
	}

	/// The value, if one was produced.
	pub fn value(&self) -> Option<&T> {
		self.value.as_ref()
	}

	/// Whether a value was produced.
	pub fn has_value(&self) -> bool {
		self.value.is_some()
	}

	/// Whether no warning or error was recorded.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Whether warnings but no errors were recorded.
	pub fn is_warning(&self) -> bool {
		self.status.is_warning()
	}

	/// Whether any error was recorded.
	pub fn is_error(&self) -> bool {
		self.status.is_error()
	}

	/// Record another event.
	pub fn add_event(&mut self, event: Event) {
		self.status.add_event(event);
	}

	/// Split into status and value.
	pub fn into_parts(self) -> (Status, Option<T>) {
		(self.status, self.value)
	}

	/// Discard the value.
	pub fn into_status(self) -> Status {
		self.status
	}

	/// Take the value, discarding the status.
	pub fn into_value(self) -> Option<T> {
		self.value
	}

	/// Transform the value, keeping the status.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
		Outcome { status: self.status, value: self.value.map(f) }
	}
}
