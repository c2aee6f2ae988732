//! Wire structure of the tag format.
//!
//! Every tag is one tag byte followed by the variant's body. All multi-byte
//! fields are little-endian; digests are computed over the *uncompressed*
//! content; compression is raw deflate at level 9.

use std::io::{Read, Write};

use deku::prelude::*;
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use sha3::{Digest, Sha3_256};
use subtle::ConstantTimeEq;
use tracing::trace;

use crate::status::{Event, Outcome, Status};
use crate::watermark::Watermark;

/// A tag-byte-prefixed watermark.
///
/// The discriminant is the on-wire tag byte. Sized variants carry the
/// content length, digest variants carry a CRC-32 or SHA3-256 over the
/// uncompressed content, and compressed variants hold their body deflated.
#[derive(Clone, Debug, Eq, PartialEq, Hash, DekuRead, DekuWrite)]
#[deku(endian = "little", id_type = "u8")]
pub enum InnamarkTag {
	/// Bare content.
	#[deku(id = "0x00")]
	Raw {
		/// The payload.
		#[deku(read_all)]
		content: Vec<u8>,
	},

	/// Deflated content.
	#[deku(id = "0x01")]
	CompressedRaw {
		/// The payload, deflated.
		#[deku(read_all)]
		compressed: Vec<u8>,
	},

	/// Content length, then content.
	#[deku(id = "0x02")]
	Sized {
		/// Declared content length in bytes.
		size: u32,
		/// The payload.
		#[deku(read_all)]
		content: Vec<u8>,
	},

	/// Content length, then deflated content.
	#[deku(id = "0x03")]
	CompressedSized {
		/// Declared content length in bytes, before compression.
		size: u32,
		/// The payload, deflated.
		#[deku(read_all)]
		compressed: Vec<u8>,
	},

	/// CRC-32 of the content, then content.
	#[deku(id = "0x04")]
	Crc32 {
		/// CRC-32 over the content.
		checksum: u32,
		/// The payload.
		#[deku(read_all)]
		content: Vec<u8>,
	},

	/// CRC-32 of the content, then deflated content.
	#[deku(id = "0x05")]
	CompressedCrc32 {
		/// CRC-32 over the uncompressed content.
		checksum: u32,
		/// The payload, deflated.
		#[deku(read_all)]
		compressed: Vec<u8>,
	},

	/// Content length, CRC-32, then content.
	#[deku(id = "0x06")]
	SizedCrc32 {
		/// Declared content length in bytes.
		size: u32,
		/// CRC-32 over the content.
		checksum: u32,
		/// The payload.
		#[deku(read_all)]
		content: Vec<u8>,
	},

	/// Content length, CRC-32, then deflated content.
	#[deku(id = "0x07")]
	CompressedSizedCrc32 {
		/// Declared content length in bytes, before compression.
		size: u32,
		/// CRC-32 over the uncompressed content.
		checksum: u32,
		/// The payload, deflated.
		#[deku(read_all)]
		compressed: Vec<u8>,
	},

	/// SHA3-256 of the content, then content.
	#[deku(id = "0x08")]
	Sha3256 {
		/// SHA3-256 over the content.
		hash: [u8; 32],
		/// The payload.
		#[deku(read_all)]
		content: Vec<u8>,
	},

	/// SHA3-256 of the content, then deflated content.
	#[deku(id = "0x09")]
	CompressedSha3256 {
		/// SHA3-256 over the uncompressed content.
		hash: [u8; 32],
		/// The payload, deflated.
		#[deku(read_all)]
		compressed: Vec<u8>,
	},

	/// Content length, SHA3-256, then content.
	#[deku(id = "0x0A")]
	SizedSha3256 {
		/// Declared content length in bytes.
		size: u32,
		/// SHA3-256 over the content.
		hash: [u8; 32],
		/// The payload.
		#[deku(read_all)]
		content: Vec<u8>,
	},

	/// Content length, SHA3-256, then deflated content.
	#[deku(id = "0x0B")]
	CompressedSizedSha3256 {
		/// Declared content length in bytes, before compression.
		size: u32,
		/// SHA3-256 over the uncompressed content.
		hash: [u8; 32],
		/// The payload, deflated.
		#[deku(read_all)]
		compressed: Vec<u8>,
	},
}

/// Highest tag byte currently assigned.
const LAST_TAG_BYTE: u8 = 0x0B;

impl InnamarkTag {
	/// A bare tag.
	pub fn raw(content: impl Into<Vec<u8>>) -> Self {
		Self::Raw { content: content.into() }
	}

	/// A compressed bare tag.
	pub fn compressed_raw(content: &[u8]) -> Self {
		Self::CompressedRaw { compressed: deflate(content) }
	}

	/// A length-prefixed tag.
	pub fn sized(content: impl Into<Vec<u8>>) -> Self {
		let content = content.into();
		Self::Sized { size: content.len() as u32, content }
	}

	/// A compressed, length-prefixed tag.
	pub fn compressed_sized(content: &[u8]) -> Self {
		Self::CompressedSized { size: content.len() as u32, compressed: deflate(content) }
	}

	/// A CRC-32 tag.
	pub fn crc32(content: impl Into<Vec<u8>>) -> Self {
		let content = content.into();
		Self::Crc32 { checksum: crc32_of(&content), content }
	}

	/// A compressed CRC-32 tag.
	pub fn compressed_crc32(content: &[u8]) -> Self {
		Self::CompressedCrc32 { checksum: crc32_of(content), compressed: deflate(content) }
	}

	/// A length-prefixed CRC-32 tag.
	pub fn sized_crc32(content: impl Into<Vec<u8>>) -> Self {
		let content = content.into();
		Self::SizedCrc32 {
			size: content.len() as u32,
			checksum: crc32_of(&content),
			content,
		}
	}

	/// A compressed, length-prefixed CRC-32 tag.
	pub fn compressed_sized_crc32(content: &[u8]) -> Self {
		Self::CompressedSizedCrc32 {
			size: content.len() as u32,
			checksum: crc32_of(content),
			compressed: deflate(content),
		}
	}

	/// A SHA3-256 tag.
	pub fn sha3_256(content: impl Into<Vec<u8>>) -> Self {
		let content = content.into();
		Self::Sha3256 { hash: sha3_256_of(&content), content }
	}

	/// A compressed SHA3-256 tag.
	pub fn compressed_sha3_256(content: &[u8]) -> Self {
		Self::CompressedSha3256 { hash: sha3_256_of(content), compressed: deflate(content) }
	}

	/// A length-prefixed SHA3-256 tag.
	pub fn sized_sha3_256(content: impl Into<Vec<u8>>) -> Self {
		let content = content.into();
		Self::SizedSha3256 {
			size: content.len() as u32,
			hash: sha3_256_of(&content),
			content,
		}
	}

	/// A compressed, length-prefixed SHA3-256 tag.
	pub fn compressed_sized_sha3_256(content: &[u8]) -> Self {
		Self::CompressedSizedSha3256 {
			size: content.len() as u32,
			hash: sha3_256_of(content),
			compressed: deflate(content),
		}
	}

	/// Parse a tag from its on-wire bytes.
	///
	/// This is structural only; run [`validate`](Self::validate) to check
	/// lengths and digests.
	pub fn parse(bytes: &[u8]) -> Outcome<Self> {
		let Some(first) = bytes.first() else {
			return Status::from_event(Event::MalformedTag {
				reason: "empty watermark".into(),
			})
			.into_empty();
		};

		if *first > LAST_TAG_BYTE {
			return Status::from_event(Event::UnknownTag { byte: *first }).into_empty();
		}

		match Self::from_bytes((bytes, 0)) {
			Ok((_rest, tag)) => {
				trace!(byte = tag.tag_byte(), "parsed tag");
				Outcome::success(tag)
			}
			Err(err) => {
				Status::from_event(Event::MalformedTag { reason: err.to_string() }).into_empty()
			}
		}
	}

	/// Parse and validate a watermark as a tag.
	///
	/// The returned status combines structural and validation events.
	pub fn from_watermark(watermark: &Watermark) -> Outcome<Self> {
		let (mut status, value) = Self::parse(watermark.as_bytes()).into_parts();
		let Some(tag) = value else {
			return status.into_empty();
		};

		status.append(tag.validate());
		Outcome::new(status, Some(tag))
	}

	/// The on-wire discriminant.
	pub fn tag_byte(&self) -> u8 {
		match self {
			Self::Raw { .. } => 0x00,
			Self::CompressedRaw { .. } => 0x01,
			Self::Sized { .. } => 0x02,
			Self::CompressedSized { .. } => 0x03,
			Self::Crc32 { .. } => 0x04,
			Self::CompressedCrc32 { .. } => 0x05,
			Self::SizedCrc32 { .. } => 0x06,
			Self::CompressedSizedCrc32 { .. } => 0x07,
			Self::Sha3256 { .. } => 0x08,
			Self::CompressedSha3256 { .. } => 0x09,
			Self::SizedSha3256 { .. } => 0x0A,
			Self::CompressedSizedSha3256 { .. } => 0x0B,
		}
	}

	/// Variant name, for diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Raw { .. } => "Raw",
			Self::CompressedRaw { .. } => "CompressedRaw",
			Self::Sized { .. } => "Sized",
			Self::CompressedSized { .. } => "CompressedSized",
			Self::Crc32 { .. } => "CRC32",
			Self::CompressedCrc32 { .. } => "CompressedCRC32",
			Self::SizedCrc32 { .. } => "SizedCRC32",
			Self::CompressedSizedCrc32 { .. } => "CompressedSizedCRC32",
			Self::Sha3256 { .. } => "SHA3256",
			Self::CompressedSha3256 { .. } => "CompressedSHA3256",
			Self::SizedSha3256 { .. } => "SizedSHA3256",
			Self::CompressedSizedSha3256 { .. } => "CompressedSizedSHA3256",
		}
	}

	/// The declared content length, for sized variants.
	pub fn declared_size(&self) -> Option<u32> {
		match self {
			Self::Sized { size, .. }
			| Self::CompressedSized { size, .. }
			| Self::SizedCrc32 { size, .. }
			| Self::CompressedSizedCrc32 { size, .. }
			| Self::SizedSha3256 { size, .. }
			| Self::CompressedSizedSha3256 { size, .. } => Some(*size),
			_ => None,
		}
	}

	/// Whether the body is stored deflated.
	pub fn is_compressed(&self) -> bool {
		matches!(
			self,
			Self::CompressedRaw { .. }
				| Self::CompressedSized { .. }
				| Self::CompressedCrc32 { .. }
				| Self::CompressedSizedCrc32 { .. }
				| Self::CompressedSha3256 { .. }
				| Self::CompressedSizedSha3256 { .. }
		)
	}

	fn body(&self) -> &[u8] {
		match self {
			Self::Raw { content }
			| Self::Sized { content, .. }
			| Self::Crc32 { content, .. }
			| Self::SizedCrc32 { content, .. }
			| Self::Sha3256 { content, .. }
			| Self::SizedSha3256 { content, .. } => content,
			Self::CompressedRaw { compressed }
			| Self::CompressedSized { compressed, .. }
			| Self::CompressedCrc32 { compressed, .. }
			| Self::CompressedSizedCrc32 { compressed, .. }
			| Self::CompressedSha3256 { compressed, .. }
			| Self::CompressedSizedSha3256 { compressed, .. } => compressed,
		}
	}

	fn content_inner(&self) -> Result<Vec<u8>, Event> {
		if self.is_compressed() {
			inflate(self.body()).map_err(|err| Event::Inflation { reason: err.to_string() })
		} else {
			Ok(self.body().to_vec())
		}
	}

	/// The content, decompressed if necessary.
	pub fn content(&self) -> Outcome<Vec<u8>> {
		match self.content_inner() {
			Ok(content) => Outcome::success(content),
			Err(event) => Status::from_event(event).into_empty(),
		}
	}

	/// Check declared length and stored digest against the content.
	pub fn validate(&self) -> Status {
		let mut status = Status::success();

		let content = match self.content_inner() {
			Ok(content) => content,
			Err(event) => {
				status.add_event(event);
				return status;
			}
		};

		if let Some(declared) = self.declared_size() {
			let actual = content.len() as u32;
			if declared != actual {
				status.add_event(Event::SizeMismatch { declared, actual });
			}
		}

		match self {
			Self::Crc32 { checksum, .. }
			| Self::CompressedCrc32 { checksum, .. }
			| Self::SizedCrc32 { checksum, .. }
			| Self::CompressedSizedCrc32 { checksum, .. } => {
				if crc32_of(&content) != *checksum {
					status.add_event(Event::ChecksumMismatch { variant: self.name() });
				}
			}
			Self::Sha3256 { hash, .. }
			| Self::CompressedSha3256 { hash, .. }
			| Self::SizedSha3256 { hash, .. }
			| Self::CompressedSizedSha3256 { hash, .. } => {
				let computed = sha3_256_of(&content);
				if !bool::from(hash[..].ct_eq(&computed[..])) {
					status.add_event(Event::ChecksumMismatch { variant: self.name() });
				}
			}
			_ => {}
		}

		status
	}

	/// Serialise to on-wire bytes.
	pub fn to_bytes(&self) -> Vec<u8> {
		// UNWRAP: there's no way to construct a tag that doesn't serialise
		#[allow(clippy::unwrap_used)]
		let bytes = DekuContainerWrite::to_bytes(self).unwrap();
		bytes
	}
}

pub(crate) fn deflate(bytes: &[u8]) -> Vec<u8> {
	let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(9));
	// UNWRAP: writing into a Vec cannot fail
	#[allow(clippy::unwrap_used)]
	let compressed = {
		encoder.write_all(bytes).unwrap();
		encoder.finish().unwrap()
	};
	compressed
}

pub(crate) fn inflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
	let mut out = Vec::new();
	DeflateDecoder::new(bytes).read_to_end(&mut out)?;
	Ok(out)
}

pub(crate) fn crc32_of(bytes: &[u8]) -> u32 {
	let mut hasher = crc32fast::Hasher::new();
	hasher.update(bytes);
	hasher.finalize()
}

pub(crate) fn sha3_256_of(bytes: &[u8]) -> [u8; 32] {
	Sha3_256::digest(bytes).into()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn raw_layout_is_tag_byte_then_content() {
		let tag = InnamarkTag::raw(b"hi".to_vec());
		assert_eq!(tag.to_bytes(), vec![0x00, b'h', b'i']);
	}

	#[test]
	fn sized_layout_is_little_endian() {
		let tag = InnamarkTag::sized(b"hi".to_vec());
		assert_eq!(tag.to_bytes(), vec![0x02, 0x02, 0x00, 0x00, 0x00, b'h', b'i']);
	}

	#[test]
	fn crc32_uses_the_reflected_polynomial() {
		// CRC-32 of "123456789" is the classic check value
		assert_eq!(crc32_of(b"123456789"), 0xCBF4_3926);
	}

	#[test]
	fn deflate_round_trips() {
		let content = b"the same words, the same words, the same words";
		let inflated = inflate(&deflate(content)).expect("valid deflate stream");
		assert_eq!(inflated, content);
	}

	#[test]
	fn parse_rejects_unknown_tag_byte() {
		let outcome = InnamarkTag::parse(&[0x7F, 1, 2, 3]);
		assert!(outcome.is_error());
		assert_eq!(outcome.status().events(), &[Event::UnknownTag { byte: 0x7F }]);
	}

	#[test]
	fn parse_rejects_empty_input() {
		let outcome = InnamarkTag::parse(&[]);
		assert!(outcome.is_error());
		assert!(!outcome.has_value());
	}

	#[test]
	fn truncated_body_is_malformed() {
		// Sized needs four length bytes, only two present
		let outcome = InnamarkTag::parse(&[0x02, 0x01, 0x00]);
		assert!(outcome.is_error());
		assert!(matches!(
			outcome.status().events(),
			[Event::MalformedTag { .. }],
		));
	}

	#[test]
	fn size_mismatch_is_flagged() {
		let tag = InnamarkTag::Sized { size: 5, content: b"hi".to_vec() };
		let status = tag.validate();
		assert!(status.is_error());
		assert_eq!(status.events(), &[Event::SizeMismatch { declared: 5, actual: 2 }]);
	}

	#[test]
	fn checksum_mismatch_is_flagged() {
		let tag = InnamarkTag::Crc32 { checksum: 0xDEAD_BEEF, content: b"hi".to_vec() };
		let status = tag.validate();
		assert!(status.is_error());
		assert_eq!(status.events(), &[Event::ChecksumMismatch { variant: "CRC32" }]);
	}

	#[test]
	fn garbage_compressed_body_fails_inflation() {
		let tag = InnamarkTag::CompressedRaw { compressed: vec![0xFF, 0xFF, 0xFF, 0xFF] };
		let status = tag.validate();
		assert!(status.is_error());
		assert!(matches!(status.events(), [Event::Inflation { .. }]));
	}
}
