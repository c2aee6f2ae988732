//! Text cover codec.
//!
//! Lays one or more copies of an encoded watermark over a cover's
//! insertable positions (by default, its ASCII spaces), framed by a
//! [`SeparatorStrategy`] so extraction can re-segment the character stream.

#[doc(inline)]
pub use self::frequency::*;
#[doc(inline)]
pub use self::separator::*;
#[doc(inline)]
pub use self::watermarker::*;

pub(crate) use self::frequency::refine;

mod frequency;
mod separator;
mod watermarker;
