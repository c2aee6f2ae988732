//! ZIP archive codec.
//!
//! Parses an archive into its Local File Headers, Central Directory, and
//! End of Central Directory record, preserving every field verbatim, and
//! embeds watermarks as extra fields under the reserved id
//! [`WATERMARK_EXTRA_FIELD_ID`](crate::WATERMARK_EXTRA_FIELD_ID).

#[doc(inline)]
pub use self::format::*;
#[doc(inline)]
pub use self::watermarker::*;

mod format;
mod watermarker;
