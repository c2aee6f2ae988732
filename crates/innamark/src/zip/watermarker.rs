//! Extra-field watermarking over parsed archives.

use tracing::trace;

use crate::constants::WATERMARK_EXTRA_FIELD_ID;
use crate::status::{Event, Outcome};
use crate::text::refine;
use crate::watermark::{Recovered, Watermark};

use super::format::{ExtraField, ZipArchive};

/// Hides and recovers watermarks in ZIP archives.
///
/// Payloads live in extra fields with id
/// [`WATERMARK_EXTRA_FIELD_ID`](crate::WATERMARK_EXTRA_FIELD_ID) in the
/// Local File Header area; everything else in the archive is preserved
/// byte-for-byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZipWatermarker;

impl ZipWatermarker {
	/// Embed a payload into the archive's first Local File Header.
	///
	/// Fails with [`OversizedHeader`](Event::OversizedHeader), leaving the
	/// input untouched, when the header's extra fields would grow past
	/// 65535 bytes.
	pub fn add(&self, zip: &[u8], payload: impl Into<Watermark>) -> Outcome<Vec<u8>> {
		let (mut status, archive) = ZipArchive::parse(zip).into_parts();
		let Some(mut archive) = archive else {
			return status.into_empty();
		};

		let Some(entry) = archive.entries.first_mut() else {
			status.add_event(Event::EmptyArchive);
			return status.into_empty();
		};

		let watermark = payload.into();
		let total = entry.header.extra_fields_byte_len() + 4 + watermark.len();
		if total > u16::MAX as usize {
			status.add_event(Event::OversizedHeader { total });
			return status.into_empty();
		}

		entry
			.header
			.extra_fields
			.push(ExtraField::new(WATERMARK_EXTRA_FIELD_ID, watermark.into_bytes()));
		entry.header.sync_lengths();
		trace!(total, "embedded watermark extra field");

		status.into_outcome(archive.to_bytes())
	}

	/// Whether any Local File Header carries a watermark extra field.
	pub fn contains(&self, zip: &[u8]) -> bool {
		ZipArchive::parse(zip).into_value().is_some_and(|archive| {
			archive.entries.iter().any(|entry| {
				entry
					.header
					.extra_fields
					.iter()
					.any(|field| field.id == WATERMARK_EXTRA_FIELD_ID)
			})
		})
	}

	/// Recover the watermarks carried by the archive, in stream order.
	///
	/// `single` and `squash` behave as in the text codec, as does the
	/// promotion of a fully tag-formed result list.
	pub fn watermarks(&self, zip: &[u8], squash: bool, single: bool) -> Outcome<Vec<Recovered>> {
		let (mut status, archive) = ZipArchive::parse(zip).into_parts();
		let Some(archive) = archive else {
			return status.into_empty();
		};

		let found: Vec<Watermark> = archive
			.entries
			.iter()
			.flat_map(|entry| entry.header.extra_fields.iter())
			.filter(|field| field.id == WATERMARK_EXTRA_FIELD_ID)
			.map(|field| Watermark::new(field.data.clone()))
			.collect();
		trace!(count = found.len(), "collected watermark extra fields");

		let refined = refine(found, squash, single, &mut status);
		status.into_outcome(refined)
	}

	/// Recover watermarks with the default filters (squash, most frequent).
	pub fn get(&self, zip: &[u8]) -> Outcome<Vec<Recovered>> {
		self.watermarks(zip, true, true)
	}

	/// The most frequent watermark's content bytes.
	pub fn bytes(&self, zip: &[u8]) -> Outcome<Vec<u8>> {
		let (mut status, value) = self.get(zip).into_parts();
		let Some(first) = value.and_then(|list| list.into_iter().next()) else {
			return status.into_empty();
		};

		let (content_status, content) = first.content().into_parts();
		status.append(content_status);
		Outcome::new(status, content)
	}

	/// The most frequent watermark's content, decoded as UTF-8.
	pub fn string(&self, zip: &[u8]) -> Outcome<String> {
		let (mut status, bytes) = self.bytes(zip).into_parts();
		let Some(bytes) = bytes else {
			return status.into_empty();
		};

		let decoded = String::from_utf8_lossy(&bytes).into_owned();
		if decoded.contains('\u{FFFD}') {
			status.add_event(Event::StringDecode { decoded: decoded.clone() });
		}
		Outcome::new(status, Some(decoded))
	}

	/// Strip every watermark extra field.
	///
	/// Returns the cleaned archive and the removed payloads in stream
	/// order. The cleaned archive is byte-identical to one that never
	/// carried the fields.
	pub fn remove(&self, zip: &[u8]) -> Outcome<(Vec<u8>, Vec<Watermark>)> {
		let (status, archive) = ZipArchive::parse(zip).into_parts();
		let Some(mut archive) = archive else {
			return status.into_empty();
		};

		let mut removed = Vec::new();
		for entry in &mut archive.entries {
			let mut kept = Vec::with_capacity(entry.header.extra_fields.len());
			for field in entry.header.extra_fields.drain(..) {
				if field.id == WATERMARK_EXTRA_FIELD_ID {
					removed.push(Watermark::new(field.data));
				} else {
					kept.push(field);
				}
			}
			entry.header.extra_fields = kept;
			entry.header.sync_lengths();
		}
		trace!(count = removed.len(), "stripped watermark extra fields");

		status.into_outcome((archive.to_bytes(), removed))
	}
}
