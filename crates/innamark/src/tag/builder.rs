//! Flag-driven tag construction.

use crate::error::{Error, Result};

use super::format::{deflate, InnamarkTag};

/// Builds an [`InnamarkTag`] from a payload and feature flags.
///
/// The flag combination picks the variant: compression, a length prefix,
/// and at most one digest can be stacked freely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InnamarkTagBuilder {
	content: Vec<u8>,
	sized: bool,
	compressed: bool,
	crc32: bool,
	sha3_256: bool,
}

impl InnamarkTagBuilder {
	/// Start from a raw payload.
	pub fn new(content: impl Into<Vec<u8>>) -> Self {
		Self { content: content.into(), ..Self::default() }
	}

	/// Start from the UTF-8 encoding of a string.
	pub fn from_text(text: impl AsRef<str>) -> Self {
		Self::new(text.as_ref().as_bytes().to_vec())
	}

	/// Include a length prefix.
	pub fn sized(mut self, sized: bool) -> Self {
		self.sized = sized;
		self
	}

	/// Deflate the payload.
	pub fn compressed(mut self, compressed: bool) -> Self {
		self.compressed = compressed;
		self
	}

	/// Include a CRC-32 digest.
	pub fn crc32(mut self, crc32: bool) -> Self {
		self.crc32 = crc32;
		self
	}

	/// Include a SHA3-256 digest.
	pub fn sha3_256(mut self, sha3_256: bool) -> Self {
		self.sha3_256 = sha3_256;
		self
	}

	/// Pick the variant named by the flags and build the tag.
	pub fn finish(self) -> Result<InnamarkTag> {
		if self.crc32 && self.sha3_256 {
			return Err(Error::ConflictingDigests);
		}

		let content = self.content;
		Ok(match (self.compressed, self.sized, self.crc32, self.sha3_256) {
			(false, false, false, false) => InnamarkTag::raw(content),
			(false, true, false, false) => InnamarkTag::sized(content),
			(false, false, true, false) => InnamarkTag::crc32(content),
			(false, true, true, false) => InnamarkTag::sized_crc32(content),
			(false, false, false, true) => InnamarkTag::sha3_256(content),
			(false, true, false, true) => InnamarkTag::sized_sha3_256(content),
			(true, false, false, false) => InnamarkTag::compressed_raw(&content),
			(true, true, false, false) => InnamarkTag::compressed_sized(&content),
			(true, false, true, false) => InnamarkTag::compressed_crc32(&content),
			(true, true, true, false) => InnamarkTag::compressed_sized_crc32(&content),
			(true, false, false, true) => InnamarkTag::compressed_sha3_256(&content),
			(true, true, false, true) => InnamarkTag::compressed_sized_sha3_256(&content),
			(_, _, true, true) => unreachable!("checked above"),
		})
	}

	/// The smallest bare representation of a text payload.
	///
	/// Picks [`CompressedRaw`](InnamarkTag::CompressedRaw) only when deflate
	/// actually shrinks the payload.
	pub fn small(text: impl AsRef<str>) -> InnamarkTag {
		let bytes = text.as_ref().as_bytes();
		let compressed = deflate(bytes);
		if compressed.len() < bytes.len() {
			InnamarkTag::CompressedRaw { compressed }
		} else {
			InnamarkTag::raw(bytes.to_vec())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flags_select_the_variant() {
		let tag = InnamarkTagBuilder::from_text("flags")
			.sized(true)
			.compressed(true)
			.crc32(true)
			.finish()
			.expect("digests don't conflict");
		assert!(matches!(tag, InnamarkTag::CompressedSizedCrc32 { .. }));

		let tag = InnamarkTagBuilder::from_text("flags")
			.sha3_256(true)
			.finish()
			.expect("digests don't conflict");
		assert!(matches!(tag, InnamarkTag::Sha3256 { .. }));
	}

	#[test]
	fn both_digests_conflict() {
		let err = InnamarkTagBuilder::from_text("flags")
			.crc32(true)
			.sha3_256(true)
			.finish();
		assert_eq!(err, Err(Error::ConflictingDigests));
	}

	#[test]
	fn small_compresses_only_when_it_helps() {
		let repetitive = "again and again and again and again and again";
		assert!(matches!(
			InnamarkTagBuilder::small(repetitive),
			InnamarkTag::CompressedRaw { .. },
		));

		assert!(matches!(InnamarkTagBuilder::small("Hi"), InnamarkTag::Raw { .. }));
	}
}
