//! Tag-prefixed watermark format.
//!
//! A tag wraps a raw payload with an optional length prefix, an optional
//! integrity digest (CRC-32 or SHA3-256), and optional deflate compression,
//! all announced by a single leading tag byte.

#[doc(inline)]
pub use self::builder::*;
#[doc(inline)]
pub use self::format::*;

mod builder;
mod format;
