//! Innamark: invisible watermarks for text covers and ZIP archives.
//!
//! Text covers are watermarked by substituting visually-identical Unicode
//! space characters at insertable positions ([`text`]); ZIP archives carry
//! payloads in reserved extra fields ([`zip`]). Payloads can be wrapped in
//! a tag format with length, digest, and compression options ([`tag`]).
//! Operations report through event-carrying statuses ([`status`]) rather
//! than failing outright, so partial recoveries stay usable.

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[doc(inline)]
pub use self::constants::*;
mod constants;

pub mod error;
pub mod registry;
pub mod status;
pub mod tag;
pub mod text;
pub mod transcode;
pub mod watermark;
pub mod watermarker;
pub mod zip;
