//! File-type dispatching facade.
//!
//! Maps a source name plus optional explicit type to the text or ZIP codec
//! through the extension [registry](crate::registry), then forwards to it.
//! File I/O stays with the caller; the facade works on byte buffers.

use tracing::debug;

use crate::registry::SupportedFileType;
use crate::status::{Event, Outcome, Status};
use crate::text::TextWatermarker;
use crate::watermark::{Recovered, Watermark};
use crate::zip::ZipWatermarker;

/// Dispatches watermarking operations by file type.
///
/// Every operation takes the source's name (for extension-based dispatch)
/// and its contents as bytes, plus an optional explicit type that takes
/// precedence over the extension. A contradiction between the two is a
/// [`WrongType`](Event::WrongType) error.
#[derive(Debug, Default)]
pub struct Watermarker {
	text: TextWatermarker,
	zip: ZipWatermarker,
}

impl Watermarker {
	/// A facade over explicitly configured codecs.
	pub fn new(text: TextWatermarker, zip: ZipWatermarker) -> Self {
		Self { text, zip }
	}

	/// The text codec in use.
	pub fn text(&self) -> &TextWatermarker {
		&self.text
	}

	/// The ZIP codec in use.
	pub fn zip(&self) -> &ZipWatermarker {
		&self.zip
	}

	fn resolve(
		&self,
		name: &str,
		explicit: Option<SupportedFileType>,
	) -> Result<SupportedFileType, Event> {
		let extension = name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty());
		let registered = extension.and_then(SupportedFileType::from_extension);

		let resolved = match (explicit, registered) {
			(Some(declared), Some(registered)) if declared != registered => {
				return Err(Event::WrongType {
					declared: declared.name(),
					extension: extension.unwrap_or_default().to_string(),
				});
			}
			(Some(declared), _) => declared,
			(None, Some(registered)) => registered,
			(None, None) => {
				return Err(match extension {
					Some(extension) => Event::UnsupportedType { extension: extension.to_string() },
					None => Event::NoFileType { path: name.to_string() },
				});
			}
		};

		debug!(name, file_type = resolved.name(), "dispatching");
		Ok(resolved)
	}

	fn cover_text(data: &[u8]) -> Result<&str, Event> {
		std::str::from_utf8(data).map_err(|err| Event::InvalidUtf8 { reason: err.to_string() })
	}

	/// Hide a payload in a cover, dispatching by file type.
	///
	/// Text covers wrap the payload in a bare tag, as
	/// [`TextWatermarker::add`] does.
	pub fn add(
		&self,
		name: &str,
		data: &[u8],
		payload: impl Into<Watermark>,
		explicit: Option<SupportedFileType>,
	) -> Outcome<Vec<u8>> {
		self.add_with(name, data, payload, true, explicit)
	}

	/// Hide a payload in a cover, controlling tag wrapping.
	///
	/// `wrap` only affects text covers; ZIP extra fields carry the payload
	/// bytes as given.
	pub fn add_with(
		&self,
		name: &str,
		data: &[u8],
		payload: impl Into<Watermark>,
		wrap: bool,
		explicit: Option<SupportedFileType>,
	) -> Outcome<Vec<u8>> {
		match self.resolve(name, explicit) {
			Err(event) => Status::from_event(event).into_empty(),
			Ok(SupportedFileType::Text) => match Self::cover_text(data) {
				Err(event) => Status::from_event(event).into_empty(),
				Ok(cover) => self.text.add_with(cover, payload, wrap).map(String::into_bytes),
			},
			Ok(SupportedFileType::Zip) => self.zip.add(data, payload),
		}
	}

	/// Whether a cover carries any watermark.
	pub fn contains(
		&self,
		name: &str,
		data: &[u8],
		explicit: Option<SupportedFileType>,
	) -> Outcome<bool> {
		match self.resolve(name, explicit) {
			Err(event) => Status::from_event(event).into_empty(),
			Ok(SupportedFileType::Text) => match Self::cover_text(data) {
				Err(event) => Status::from_event(event).into_empty(),
				Ok(cover) => Outcome::success(self.text.contains(cover)),
			},
			Ok(SupportedFileType::Zip) => Outcome::success(self.zip.contains(data)),
		}
	}

	/// Recover the watermarks hidden in a cover.
	pub fn watermarks(
		&self,
		name: &str,
		data: &[u8],
		squash: bool,
		single: bool,
		explicit: Option<SupportedFileType>,
	) -> Outcome<Vec<Recovered>> {
		match self.resolve(name, explicit) {
			Err(event) => Status::from_event(event).into_empty(),
			Ok(SupportedFileType::Text) => match Self::cover_text(data) {
				Err(event) => Status::from_event(event).into_empty(),
				Ok(cover) => self.text.watermarks(cover, squash, single),
			},
			Ok(SupportedFileType::Zip) => self.zip.watermarks(data, squash, single),
		}
	}

	/// Strip every watermark from a cover, returning the cleaned bytes.
	pub fn remove(
		&self,
		name: &str,
		data: &[u8],
		explicit: Option<SupportedFileType>,
	) -> Outcome<Vec<u8>> {
		match self.resolve(name, explicit) {
			Err(event) => Status::from_event(event).into_empty(),
			Ok(SupportedFileType::Text) => match Self::cover_text(data) {
				Err(event) => Status::from_event(event).into_empty(),
				Ok(cover) => self.text.remove(cover).map(String::into_bytes),
			},
			Ok(SupportedFileType::Zip) => {
				self.zip.remove(data).map(|(cleaned, _removed)| cleaned)
			}
		}
	}
}
