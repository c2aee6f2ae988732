/// Characters of the default transcoding alphabet, in digit order.
///
/// Four Unicode space code points that render like an ordinary space in
/// common editors: PUNCTUATION SPACE, THIN SPACE, NARROW NO-BREAK SPACE,
/// MEDIUM MATHEMATICAL SPACE.
pub const DEFAULT_ALPHABET_CHARS: [char; 4] = ['\u{2008}', '\u{2009}', '\u{202F}', '\u{205F}'];

/// ZIP extra-field id reserved for watermark payloads.
pub const WATERMARK_EXTRA_FIELD_ID: u16 = 0x8777;

/// Magic number of a ZIP Local File Header, little-endian.
pub const LOCAL_FILE_HEADER_MAGIC: u32 = 0x04034b50;

/// Magic number of a ZIP Central Directory entry, little-endian.
pub const CENTRAL_DIRECTORY_MAGIC: u32 = 0x02014b50;

/// Magic number of the ZIP End of Central Directory record, little-endian.
pub const END_OF_CENTRAL_DIRECTORY_MAGIC: u32 = 0x06054b50;

/// Magic number of an (optional) ZIP Data Descriptor record, little-endian.
pub const DATA_DESCRIPTOR_MAGIC: u32 = 0x08074b50;
