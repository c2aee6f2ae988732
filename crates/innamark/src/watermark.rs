//! Watermark payload types.

use std::ops::Deref;

use crate::status::Outcome;
use crate::tag::InnamarkTag;

/// An opaque watermark payload.
///
/// Equality and hashing are byte-exact. The text constructors store the
/// UTF-8 encoding of the string.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Watermark(Vec<u8>);

impl Watermark {
	/// A watermark over raw bytes.
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	/// A watermark over the UTF-8 encoding of a string.
	pub fn from_text(text: impl AsRef<str>) -> Self {
		Self(text.as_ref().as_bytes().to_vec())
	}

	/// The payload bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Consume into the payload bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}

impl Deref for Watermark {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<u8>> for Watermark {
	fn from(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}
}

impl From<&[u8]> for Watermark {
	fn from(bytes: &[u8]) -> Self {
		Self(bytes.to_vec())
	}
}

impl From<&str> for Watermark {
	fn from(text: &str) -> Self {
		Self::from_text(text)
	}
}

impl From<String> for Watermark {
	fn from(text: String) -> Self {
		Self(text.into_bytes())
	}
}

impl From<InnamarkTag> for Watermark {
	fn from(tag: InnamarkTag) -> Self {
		Self(tag.to_bytes())
	}
}

/// A watermark recovered from a cover.
///
/// When every watermark found in a cover parses and validates as an
/// [`InnamarkTag`], extraction returns the parsed tags; otherwise it
/// returns the raw payloads untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recovered {
	/// A payload that is not (entirely) in tag form.
	Raw(Watermark),

	/// A parsed, validated tag.
	Tag(InnamarkTag),
}

impl Recovered {
	/// The useful content: a tag's (decompressed) content, or the raw bytes.
	pub fn content(&self) -> Outcome<Vec<u8>> {
		match self {
			Self::Raw(watermark) => Outcome::success(watermark.as_bytes().to_vec()),
			Self::Tag(tag) => tag.content(),
		}
	}

	/// The on-wire bytes: a tag's serialised form, or the raw bytes.
	pub fn to_bytes(&self) -> Vec<u8> {
		match self {
			Self::Raw(watermark) => watermark.as_bytes().to_vec(),
			Self::Tag(tag) => tag.to_bytes(),
		}
	}
}
