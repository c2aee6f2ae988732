//! Configuration error types.
//!
//! These cover the cases where a codec cannot even be constructed or a
//! builder is self-contradictory. Everything that can go wrong while
//! *operating* on a cover is reported through [`Status`](crate::status::Status)
//! events instead, so that partial results survive.

use miette::Diagnostic;
use thiserror::Error;

/// Convenience return type.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A transcoding alphabet needs at least two distinct characters.
	#[error("alphabet needs at least two characters, got {0}")]
	AlphabetTooSmall(usize),

	/// A transcoding alphabet must not repeat characters.
	#[error("alphabet repeats the character {0:?}")]
	AlphabetDuplicateChar(char),

	/// Separator characters may not be members of the transcoding alphabet.
	///
	/// An extractor could otherwise not tell frame delimiters from digits.
	#[error("separator characters overlap the alphabet: {0:?}")]
	SeparatorInAlphabet(Vec<char>),

	/// A tag can carry a CRC-32 or a SHA3-256 digest, not both.
	#[error("at most one digest may be selected for a tag")]
	ConflictingDigests,
}
