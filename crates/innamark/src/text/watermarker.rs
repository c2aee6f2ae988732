//! The text codec itself.

use std::fmt;
use std::ops::Range;

use tracing::trace;

use crate::error::{Error, Result};
use crate::status::{Event, Outcome, Status};
use crate::tag::InnamarkTag;
use crate::transcode::Alphabet;
use crate::watermark::{Recovered, Watermark};

use super::frequency::refine;
use super::separator::SeparatorStrategy;

/// Derives the insertable positions of a cover, as char indices.
pub type Placement = Box<dyn Fn(&str) -> Vec<usize> + Send + Sync>;

/// The default placement: every ASCII space.
fn space_placement(cover: &str) -> Vec<usize> {
	cover
		.chars()
		.enumerate()
		.filter(|(_, c)| *c == ' ')
		.map(|(index, _)| index)
		.collect()
}

/// Hides and recovers watermarks in text covers.
///
/// Alphabet, separator strategy, and placement are captured at construction
/// and immutable thereafter. The default configuration uses the default
/// four-space alphabet, [`SkipInsertPosition`](SeparatorStrategy::SkipInsertPosition)
/// framing, and ASCII-space placement.
pub struct TextWatermarker {
	alphabet: Alphabet,
	separator: SeparatorStrategy,
	placement: Placement,
}

impl fmt::Debug for TextWatermarker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TextWatermarker")
			.field("alphabet", &self.alphabet)
			.field("separator", &self.separator)
			.field("placement", &"placement function")
			.finish()
	}
}

impl Default for TextWatermarker {
	fn default() -> Self {
		Self {
			alphabet: Alphabet::default(),
			separator: SeparatorStrategy::SkipInsertPosition,
			placement: Box::new(space_placement),
		}
	}
}

impl TextWatermarker {
	/// Build a codec from explicit parts.
	///
	/// Rejects configurations whose separator characters are members of the
	/// transcoding alphabet, since extraction could then not tell frames
	/// from digits.
	pub fn new(
		alphabet: Alphabet,
		separator: SeparatorStrategy,
		placement: Placement,
	) -> Result<Self> {
		let overlap: Vec<char> = separator
			.chars()
			.into_iter()
			.filter(|c| alphabet.contains(*c))
			.collect();
		if !overlap.is_empty() {
			return Err(Error::SeparatorInAlphabet(overlap));
		}

		Ok(Self { alphabet, separator, placement })
	}

	/// The default codec with another separator strategy.
	pub fn with_separator(separator: SeparatorStrategy) -> Result<Self> {
		Self::new(Alphabet::default(), separator, Box::new(space_placement))
	}

	/// The transcoding alphabet.
	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	/// The separator strategy.
	pub fn separator(&self) -> &SeparatorStrategy {
		&self.separator
	}

	/// Separator characters followed by the transcoding alphabet.
	pub fn full_alphabet(&self) -> Vec<char> {
		let mut chars = self.separator.chars();
		chars.extend_from_slice(self.alphabet.chars());
		chars
	}

	/// The cover's insertable positions, per the configured placement.
	pub fn insert_positions(&self, cover: &str) -> Vec<usize> {
		(self.placement)(cover)
	}

	/// Whether the cover holds any full-alphabet character.
	pub fn contains(&self, cover: &str) -> bool {
		let full = self.full_alphabet();
		cover.chars().any(|c| full.contains(&c))
	}

	/// Insert positions needed to place one recoverable copy of a payload.
	pub fn minimum_insert_positions(&self, payload: &Watermark, wrap: bool) -> usize {
		let payload_len = if wrap { payload.len() + 1 } else { payload.len() };
		let encoded_len = payload_len * self.alphabet.digits_per_byte();
		let separated_len = encoded_len + self.separator.chars().len();
		self.separator.minimum_insert_positions(separated_len)
	}

	/// Hide a payload in the cover, wrapped in a bare tag.
	pub fn add(&self, cover: &str, payload: impl Into<Watermark>) -> Outcome<String> {
		self.add_with(cover, payload, true)
	}

	/// Hide a payload in the cover.
	///
	/// When `wrap` is set the payload is first wrapped in a
	/// [`Raw`](InnamarkTag::Raw) tag. As many complete copies as fit are
	/// substituted over the insertable positions; a cover that cannot hold
	/// even one copy is returned unmodified under an
	/// [`OversizedWatermark`](Event::OversizedWatermark) warning.
	pub fn add_with(
		&self,
		cover: &str,
		payload: impl Into<Watermark>,
		wrap: bool,
	) -> Outcome<String> {
		let watermark = payload.into();

		let full = self.full_alphabet();
		let mut offending: Vec<char> = Vec::new();
		for c in cover.chars() {
			if full.contains(&c) && !offending.contains(&c) {
				offending.push(c);
			}
		}
		if !offending.is_empty() {
			return Status::from_event(Event::ContainsAlphabetChars { chars: offending })
				.into_empty();
		}

		let payload_bytes = if wrap {
			InnamarkTag::raw(watermark.into_bytes()).to_bytes()
		} else {
			watermark.into_bytes()
		};
		let encoded = self.alphabet.encode(&payload_bytes);
		let separated = self.separator.separated(&encoded);

		let mut status = Status::success();
		if separated.is_empty() {
			status.add_event(Event::Inserted { copies: 0, incomplete: false });
			return status.into_outcome(cover.to_owned());
		}

		let mut chars: Vec<char> = cover.chars().collect();
		let mut positions = self.insert_positions(cover);
		positions.retain(|position| *position < chars.len());

		let minimum = self.separator.minimum_insert_positions(separated.len());
		if positions.len() < minimum {
			status.add_event(Event::OversizedWatermark {
				required: minimum,
				actual: positions.len(),
			});
			return status.into_outcome(cover.to_owned());
		}

		let chunk_len = self.separator.chunk_len(separated.len());
		let mut copies = 0usize;
		let mut incomplete = false;
		for chunk in positions.chunks(chunk_len) {
			if chunk.len() < chunk_len {
				// a partial copy would decode to garbage, leave it out
				incomplete = true;
				continue;
			}

			for (position, c) in chunk.iter().zip(separated.iter()) {
				chars[*position] = *c;
			}
			copies += 1;
		}

		trace!(copies, incomplete, "placed watermark copies");
		status.add_event(Event::Inserted { copies, incomplete });
		status.into_outcome(chars.into_iter().collect())
	}

	/// Recover the watermarks hidden in a cover.
	///
	/// `single` keeps only the most frequent value(s); `squash`
	/// deduplicates, preserving first occurrence. When every recovered
	/// watermark parses and validates as a tag, the parsed tags are
	/// returned instead of the raw payloads.
	pub fn watermarks(&self, cover: &str, squash: bool, single: bool) -> Outcome<Vec<Recovered>> {
		let chars: Vec<char> = cover.chars().collect();
		let mut status = Status::success();

		let mut ranges = self.watermark_ranges(cover, &chars);
		if ranges.is_empty() {
			if chars.iter().any(|c| self.alphabet.contains(*c)) {
				status.add_event(Event::IncompleteWatermark);
			}
			ranges.push(0..chars.len());
		}

		let mut found: Vec<Watermark> = Vec::new();
		for range in ranges {
			let digits: Vec<char> = chars[range]
				.iter()
				.copied()
				.filter(|c| self.alphabet.contains(*c))
				.collect();
			if digits.is_empty() {
				continue;
			}

			let (decode_status, bytes) = self.alphabet.decode(digits).into_parts();
			status.append(decode_status);
			if let Some(bytes) = bytes {
				found.push(Watermark::new(bytes));
			}
		}
		trace!(segments = found.len(), "decoded watermark segments");

		let refined = refine(found, squash, single, &mut status);
		status.into_outcome(refined)
	}

	/// Recover watermarks with the default filters (squash, most frequent).
	pub fn get(&self, cover: &str) -> Outcome<Vec<Recovered>> {
		self.watermarks(cover, true, true)
	}

	/// The most frequent watermark's content bytes.
	pub fn bytes(&self, cover: &str) -> Outcome<Vec<u8>> {
		let (mut status, value) = self.get(cover).into_parts();
		let Some(first) = value.and_then(|list| list.into_iter().next()) else {
			return status.into_empty();
		};

		let (content_status, content) = first.content().into_parts();
		status.append(content_status);
		Outcome::new(status, content)
	}

	/// The most frequent watermark's content, decoded as UTF-8.
	///
	/// Undecodable bytes become U+FFFD and are flagged with a
	/// [`StringDecode`](Event::StringDecode) warning.
	pub fn string(&self, cover: &str) -> Outcome<String> {
		let (mut status, bytes) = self.bytes(cover).into_parts();
		let Some(bytes) = bytes else {
			return status.into_empty();
		};

		let decoded = String::from_utf8_lossy(&bytes).into_owned();
		if decoded.contains('\u{FFFD}') {
			status.add_event(Event::StringDecode { decoded: decoded.clone() });
		}
		Outcome::new(status, Some(decoded))
	}

	/// Replace every full-alphabet character with an ASCII space.
	///
	/// This does not reconstruct the original cover beyond that
	/// substitution; it is idempotent.
	pub fn remove(&self, cover: &str) -> Outcome<String> {
		let full = self.full_alphabet();
		let cleaned = cover
			.chars()
			.map(|c| if full.contains(&c) { ' ' } else { c })
			.collect();
		Outcome::success(cleaned)
	}

	/// Segment the cover into ranges that each hold one watermark copy.
	fn watermark_ranges(&self, cover: &str, chars: &[char]) -> Vec<Range<usize>> {
		match self.separator {
			SeparatorStrategy::SingleSeparatorChar(sep) => {
				let separators: Vec<usize> = chars
					.iter()
					.enumerate()
					.filter(|(_, c)| **c == sep)
					.map(|(index, _)| index)
					.collect();

				// a lone separator yields no range
				separators
					.windows(2)
					.map(|pair| pair[0] + 1..pair[1])
					.collect()
			}
			SeparatorStrategy::StartEndSeparatorChars(start, end) => {
				let mut ranges = Vec::new();
				let mut open: Option<usize> = None;
				let mut last_end: Option<usize> = None;
				for (index, c) in chars.iter().enumerate() {
					if *c == start {
						open = Some(index + 1);
					} else if *c == end {
						// an unmatched end opens just after the previous end
						let from = open
							.take()
							.unwrap_or_else(|| last_end.map_or(0, |e| e + 1));
						ranges.push(from..index);
						last_end = Some(index);
					}
				}
				ranges
			}
			SeparatorStrategy::SkipInsertPosition => {
				// boundaries are insertable positions not preceded by a digit
				let mut ranges = Vec::new();
				let mut previous = 0usize;
				for position in self
					.insert_positions(cover)
					.into_iter()
					.filter(|position| *position < chars.len())
				{
					if position == 0 || !self.alphabet.contains(chars[position - 1]) {
						if position > previous {
							ranges.push(previous..position);
						}
						previous = position;
					}
				}
				ranges
			}
		}
	}
}
