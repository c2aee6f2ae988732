//! Framing of repeated watermark copies.

use std::iter::once;

/// How repeated watermark copies are delimited in a cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeparatorStrategy {
	/// No separator character: one insertable position is left unoccupied
	/// after each copy, and extraction finds copy boundaries at insertable
	/// positions not preceded by an alphabet character.
	SkipInsertPosition,

	/// Each copy is preceded by a single separator character.
	SingleSeparatorChar(char),

	/// Each copy is wrapped in a start and an end character.
	StartEndSeparatorChars(char, char),
}

impl SeparatorStrategy {
	/// The separator characters this strategy occupies, if any.
	///
	/// These join the transcoding alphabet to form the codec's full
	/// alphabet, and must not collide with it.
	pub fn chars(&self) -> Vec<char> {
		match self {
			Self::SkipInsertPosition => Vec::new(),
			Self::SingleSeparatorChar(c) => vec![*c],
			Self::StartEndSeparatorChars(start, end) => vec![*start, *end],
		}
	}

	/// One copy of the watermark with its separators attached.
	pub(crate) fn separated(&self, encoded: &str) -> Vec<char> {
		match self {
			Self::SkipInsertPosition => encoded.chars().collect(),
			Self::SingleSeparatorChar(c) => once(*c).chain(encoded.chars()).collect(),
			Self::StartEndSeparatorChars(start, end) => {
				once(*start).chain(encoded.chars()).chain(once(*end)).collect()
			}
		}
	}

	/// Insert positions one copy occupies, including any reserved blank.
	pub(crate) fn chunk_len(&self, separated_len: usize) -> usize {
		match self {
			Self::SkipInsertPosition => separated_len + 1,
			Self::SingleSeparatorChar(_) | Self::StartEndSeparatorChars(..) => separated_len,
		}
	}

	/// Insert positions needed for one *recoverable* copy.
	///
	/// Skip and single-separator framing both need one position beyond the
	/// copy itself (the reserved blank, respectively the next copy's
	/// separator); start/end framing is self-delimiting.
	pub(crate) fn minimum_insert_positions(&self, separated_len: usize) -> usize {
		match self {
			Self::StartEndSeparatorChars(..) => separated_len,
			Self::SkipInsertPosition | Self::SingleSeparatorChar(_) => separated_len + 1,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn separated_lengths() {
		let encoded = "abcd";
		assert_eq!(SeparatorStrategy::SkipInsertPosition.separated(encoded).len(), 4);
		assert_eq!(SeparatorStrategy::SingleSeparatorChar('|').separated(encoded).len(), 5);
		assert_eq!(
			SeparatorStrategy::StartEndSeparatorChars('<', '>').separated(encoded).len(),
			6,
		);
	}

	#[test]
	fn framing_position_counts() {
		let skip = SeparatorStrategy::SkipInsertPosition;
		assert_eq!(skip.chunk_len(4), 5);
		assert_eq!(skip.minimum_insert_positions(4), 5);

		let single = SeparatorStrategy::SingleSeparatorChar('|');
		assert_eq!(single.chunk_len(5), 5);
		assert_eq!(single.minimum_insert_positions(5), 6);

		let wrapped = SeparatorStrategy::StartEndSeparatorChars('<', '>');
		assert_eq!(wrapped.chunk_len(6), 6);
		assert_eq!(wrapped.minimum_insert_positions(6), 6);
	}
}
