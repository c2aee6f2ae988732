//! Process-wide mapping of file extensions to codecs.
//!
//! The registry is initialised with defaults and is meant to be extended
//! during startup via [`SupportedFileType::register_extension`]; it is not
//! designed for registration racing against lookups.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

/// Cover formats the library can watermark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupportedFileType {
	/// UTF-8 text, watermarked through whitespace substitution.
	Text,

	/// ZIP archive, watermarked through extra fields.
	Zip,
}

static EXTENSIONS: LazyLock<RwLock<HashMap<String, SupportedFileType>>> = LazyLock::new(|| {
	RwLock::new(HashMap::from([
		("txt".to_string(), SupportedFileType::Text),
		("md".to_string(), SupportedFileType::Text),
		("zip".to_string(), SupportedFileType::Zip),
		("jar".to_string(), SupportedFileType::Zip),
	]))
});

impl SupportedFileType {
	/// Look an extension up in the registry.
	///
	/// Extensions are matched case-insensitively and without a leading dot.
	pub fn from_extension(extension: &str) -> Option<Self> {
		let extension = extension.trim_start_matches('.').to_ascii_lowercase();
		EXTENSIONS
			.read()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.get(&extension)
			.copied()
	}

	/// Map an extension to a codec, overriding any existing mapping.
	pub fn register_extension(extension: &str, file_type: Self) {
		let extension = extension.trim_start_matches('.').to_ascii_lowercase();
		EXTENSIONS
			.write()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.insert(extension, file_type);
	}

	/// Codec name, for diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Zip => "zip",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_extensions_are_registered() {
		assert_eq!(SupportedFileType::from_extension("txt"), Some(SupportedFileType::Text));
		assert_eq!(SupportedFileType::from_extension("md"), Some(SupportedFileType::Text));
		assert_eq!(SupportedFileType::from_extension("zip"), Some(SupportedFileType::Zip));
		assert_eq!(SupportedFileType::from_extension("jar"), Some(SupportedFileType::Zip));
		assert_eq!(SupportedFileType::from_extension("exe"), None);
	}

	#[test]
	fn lookups_normalise_case_and_dots() {
		assert_eq!(SupportedFileType::from_extension(".TXT"), Some(SupportedFileType::Text));
	}

	#[test]
	fn registration_extends_the_mapping() {
		SupportedFileType::register_extension("innamark-test-log", SupportedFileType::Text);
		assert_eq!(
			SupportedFileType::from_extension("innamark-test-log"),
			Some(SupportedFileType::Text),
		);
	}
}
