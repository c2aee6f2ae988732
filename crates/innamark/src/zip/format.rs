//! Wire structures of the ZIP format.
//!
//! Only what extra-field watermarking needs: Local File Headers with their
//! data blobs, Central Directory entries, and the End of Central Directory
//! record, each identified by its little-endian magic. Zip64 records are
//! out of scope.

use deku::prelude::*;
use tracing::trace;

use crate::constants::{
	CENTRAL_DIRECTORY_MAGIC, DATA_DESCRIPTOR_MAGIC, END_OF_CENTRAL_DIRECTORY_MAGIC,
	LOCAL_FILE_HEADER_MAGIC,
};
use crate::status::{Event, Outcome, Status};

/// One extra field: a 16-bit id and its data.
#[derive(Clone, Debug, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(
	endian = "endian",
	ctx = "endian: deku::ctx::Endian",
	ctx_default = "deku::ctx::Endian::Little"
)]
pub struct ExtraField {
	/// Field id.
	pub id: u16,

	/// Declared data length in bytes.
	pub size: u16,

	/// Field data.
	#[deku(count = "size")]
	pub data: Vec<u8>,
}

impl ExtraField {
	/// An extra field over raw data.
	pub fn new(id: u16, data: Vec<u8>) -> Self {
		Self { id, size: data.len() as u16, data }
	}

	/// Wire length of this field, header included.
	pub fn byte_len(&self) -> usize {
		4 + self.data.len()
	}
}

/// A ZIP Local File Header, without its data blob.
#[derive(Clone, Debug, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct LocalFileHeader {
	/// Magic number. Asserted to match [`LOCAL_FILE_HEADER_MAGIC`].
	#[deku(assert = "*magic == LOCAL_FILE_HEADER_MAGIC")]
	pub magic: u32,

	/// Minimum ZIP version needed to extract.
	pub version_needed: u16,

	/// General purpose bit flags.
	pub flags: u16,

	/// Compression method of the data blob.
	pub compression_method: u16,

	/// Modification time, MS-DOS format.
	pub modified_time: u16,

	/// Modification date, MS-DOS format.
	pub modified_date: u16,

	/// CRC-32 of the uncompressed data.
	pub crc32: u32,

	/// Size of the data blob as stored.
	pub compressed_size: u32,

	/// Size of the data once decompressed.
	pub uncompressed_size: u32,

	/// Length of the file name in bytes.
	pub file_name_length: u16,

	/// Total length of the extra-field list in bytes.
	pub extra_fields_length: u16,

	/// File name bytes.
	#[deku(count = "file_name_length")]
	pub file_name: Vec<u8>,

	/// Extra fields.
	#[deku(bytes_read = "extra_fields_length")]
	pub extra_fields: Vec<ExtraField>,
}

impl LocalFileHeader {
	/// Total wire length of the extra-field list.
	pub fn extra_fields_byte_len(&self) -> usize {
		self.extra_fields.iter().map(ExtraField::byte_len).sum()
	}

	/// Re-derive the length fields from the variable-length contents.
	pub fn sync_lengths(&mut self) {
		self.file_name_length = self.file_name.len() as u16;
		self.extra_fields_length = self.extra_fields_byte_len() as u16;
	}
}

/// A ZIP Central Directory entry.
#[derive(Clone, Debug, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct CentralDirectoryHeader {
	/// Magic number. Asserted to match [`CENTRAL_DIRECTORY_MAGIC`].
	#[deku(assert = "*magic == CENTRAL_DIRECTORY_MAGIC")]
	pub magic: u32,

	/// ZIP version that wrote the entry.
	pub version_made_by: u16,

	/// Minimum ZIP version needed to extract.
	pub version_needed: u16,

	/// General purpose bit flags.
	pub flags: u16,

	/// Compression method of the data blob.
	pub compression_method: u16,

	/// Modification time, MS-DOS format.
	pub modified_time: u16,

	/// Modification date, MS-DOS format.
	pub modified_date: u16,

	/// CRC-32 of the uncompressed data.
	pub crc32: u32,

	/// Size of the data blob as stored.
	pub compressed_size: u32,

	/// Size of the data once decompressed.
	pub uncompressed_size: u32,

	/// Length of the file name in bytes.
	pub file_name_length: u16,

	/// Total length of the extra-field list in bytes.
	pub extra_fields_length: u16,

	/// Length of the comment in bytes.
	pub comment_length: u16,

	/// Disk on which the entry's local header lives.
	pub disk_number_start: u16,

	/// Internal attributes.
	pub internal_attributes: u16,

	/// Host-dependent external attributes.
	pub external_attributes: u32,

	/// Byte offset of the entry's Local File Header.
	pub local_header_offset: u32,

	/// File name bytes.
	#[deku(count = "file_name_length")]
	pub file_name: Vec<u8>,

	/// Extra fields.
	#[deku(bytes_read = "extra_fields_length")]
	pub extra_fields: Vec<ExtraField>,

	/// Comment bytes.
	#[deku(count = "comment_length")]
	pub comment: Vec<u8>,
}

/// The ZIP End of Central Directory record.
#[derive(Clone, Debug, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct EndOfCentralDirectory {
	/// Magic number. Asserted to match [`END_OF_CENTRAL_DIRECTORY_MAGIC`].
	#[deku(assert = "*magic == END_OF_CENTRAL_DIRECTORY_MAGIC")]
	pub magic: u32,

	/// This disk's number.
	pub disk_number: u16,

	/// Disk on which the Central Directory starts.
	pub central_directory_disk: u16,

	/// Central Directory entries on this disk.
	pub entries_on_disk: u16,

	/// Central Directory entries in total.
	pub total_entries: u16,

	/// Central Directory size in bytes.
	pub central_directory_size: u32,

	/// Byte offset of the Central Directory.
	pub central_directory_offset: u32,

	/// Length of the comment in bytes.
	pub comment_length: u16,

	/// Comment bytes.
	#[deku(count = "comment_length")]
	pub comment: Vec<u8>,
}

/// An optional Data Descriptor record trailing an entry's data.
#[derive(Clone, Debug, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct DataDescriptor {
	/// Magic number. Asserted to match [`DATA_DESCRIPTOR_MAGIC`].
	#[deku(assert = "*magic == DATA_DESCRIPTOR_MAGIC")]
	pub magic: u32,

	/// CRC-32 of the uncompressed data.
	pub crc32: u32,

	/// Size of the data blob as stored.
	pub compressed_size: u32,

	/// Size of the data once decompressed.
	pub uncompressed_size: u32,
}

/// A Local File Header together with its data blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZipEntry {
	/// The header.
	pub header: LocalFileHeader,

	/// The data blob, verbatim, of the header's declared compressed size.
	pub data: Vec<u8>,

	/// Data Descriptor following the blob, when one was present.
	pub data_descriptor: Option<DataDescriptor>,

	/// Where the header sat in the parsed input; used to remap Central
	/// Directory offsets on re-emission.
	pub(crate) original_offset: u64,
}

/// A parsed ZIP archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZipArchive {
	/// The entries, in stream order.
	pub entries: Vec<ZipEntry>,

	/// The Central Directory entries, in stream order.
	pub central_directory: Vec<CentralDirectoryHeader>,

	/// The End of Central Directory record.
	pub end_of_central_directory: EndOfCentralDirectory,

	/// Bytes after the End of Central Directory record, verbatim.
	pub trailing: Vec<u8>,
}

fn read_record<T>(bytes: &[u8], offset: usize) -> Result<(T, usize), Event>
where
	T: for<'a> DekuContainerRead<'a>,
{
	let input = &bytes[offset..];
	match T::from_bytes((input, 0)) {
		Ok(((rest, _), record)) => Ok((record, input.len() - rest.len())),
		Err(_) => Err(Event::TruncatedArchive { offset }),
	}
}

fn write_record<T: DekuContainerWrite>(out: &mut Vec<u8>, record: &T) {
	// UNWRAP: there's no way to construct a record that doesn't serialise
	#[allow(clippy::unwrap_used)]
	out.extend(record.to_bytes().unwrap());
}

fn peek_magic(bytes: &[u8], offset: usize) -> Option<u32> {
	let slice = bytes.get(offset..offset + 4)?;
	Some(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

impl ZipArchive {
	/// Parse an archive from an owned byte buffer.
	///
	/// Records are dispatched on their peeked magic; any other value is an
	/// [`InvalidMagicBytes`](Event::InvalidMagicBytes) error, and running
	/// out of bytes mid-record is a
	/// [`TruncatedArchive`](Event::TruncatedArchive) error.
	pub fn parse(bytes: &[u8]) -> Outcome<Self> {
		let mut entries = Vec::new();
		let mut central_directory = Vec::new();
		let mut offset = 0usize;

		loop {
			let Some(magic) = peek_magic(bytes, offset) else {
				return Status::from_event(Event::TruncatedArchive { offset }).into_empty();
			};

			match magic {
				LOCAL_FILE_HEADER_MAGIC => {
					let (header, consumed) = match read_record::<LocalFileHeader>(bytes, offset) {
						Ok(read) => read,
						Err(event) => return Status::from_event(event).into_empty(),
					};

					let data_start = offset + consumed;
					let data_end = data_start + header.compressed_size as usize;
					let Some(data) = bytes.get(data_start..data_end) else {
						return Status::from_event(Event::TruncatedArchive { offset: data_start })
							.into_empty();
					};

					let mut next = data_end;
					let mut data_descriptor = None;
					if header.flags & 0x0008 != 0
						&& peek_magic(bytes, next) == Some(DATA_DESCRIPTOR_MAGIC)
					{
						let (descriptor, consumed) =
							match read_record::<DataDescriptor>(bytes, next) {
								Ok(read) => read,
								Err(event) => return Status::from_event(event).into_empty(),
							};
						data_descriptor = Some(descriptor);
						next += consumed;
					}

					entries.push(ZipEntry {
						header,
						data: data.to_vec(),
						data_descriptor,
						original_offset: offset as u64,
					});
					offset = next;
				}
				CENTRAL_DIRECTORY_MAGIC => {
					let (header, consumed) =
						match read_record::<CentralDirectoryHeader>(bytes, offset) {
							Ok(read) => read,
							Err(event) => return Status::from_event(event).into_empty(),
						};
					central_directory.push(header);
					offset += consumed;
				}
				END_OF_CENTRAL_DIRECTORY_MAGIC => {
					let (end_of_central_directory, consumed) =
						match read_record::<EndOfCentralDirectory>(bytes, offset) {
							Ok(read) => read,
							Err(event) => return Status::from_event(event).into_empty(),
						};

					trace!(
						entries = entries.len(),
						directory = central_directory.len(),
						"parsed archive"
					);
					return Outcome::success(Self {
						entries,
						central_directory,
						end_of_central_directory,
						trailing: bytes[offset + consumed..].to_vec(),
					});
				}
				magic => {
					return Status::from_event(Event::InvalidMagicBytes { offset, magic })
						.into_empty();
				}
			}
		}
	}

	/// Serialise the archive, recomputing every offset-dependent field.
	///
	/// Central Directory entries are remapped from the local headers'
	/// original offsets to their re-emitted positions, and the End of
	/// Central Directory size and offset fields are rederived, so that the
	/// output stays internally consistent after extra-field edits.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::new();

		let mut offsets: Vec<(u64, u64)> = Vec::with_capacity(self.entries.len());
		for entry in &self.entries {
			offsets.push((entry.original_offset, out.len() as u64));
			write_record(&mut out, &entry.header);
			out.extend(&entry.data);
			if let Some(descriptor) = &entry.data_descriptor {
				write_record(&mut out, descriptor);
			}
		}

		let central_start = out.len() as u64;
		for header in &self.central_directory {
			let mut header = header.clone();
			if let Some((_, new)) = offsets
				.iter()
				.find(|(original, _)| *original == header.local_header_offset as u64)
			{
				header.local_header_offset = *new as u32;
			}
			write_record(&mut out, &header);
		}

		let mut end = self.end_of_central_directory.clone();
		end.central_directory_size = (out.len() as u64 - central_start) as u32;
		end.central_directory_offset = central_start as u32;
		write_record(&mut out, &end);

		out.extend(&self.trailing);
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extra_field_round_trips() {
		let field = ExtraField::new(0x8777, vec![1, 2, 3]);
		assert_eq!(field.byte_len(), 7);

		// id and size little-endian, then data
		let bytes = [0x77, 0x87, 0x03, 0x00, 1, 2, 3];
		let ((rest, _), parsed) =
			ExtraField::from_bytes((&bytes, 0)).expect("well-formed field");
		assert!(rest.is_empty());
		assert_eq!(parsed, field);
	}

	#[test]
	fn garbage_is_invalid_magic() {
		let outcome = ZipArchive::parse(b"PK\x07\x09not a zip");
		assert!(outcome.is_error());
		assert!(matches!(
			outcome.status().events(),
			[Event::InvalidMagicBytes { offset: 0, .. }],
		));
	}

	#[test]
	fn short_input_is_truncated() {
		let outcome = ZipArchive::parse(&[0x50, 0x4b]);
		assert!(outcome.is_error());
		assert_eq!(outcome.status().events(), &[Event::TruncatedArchive { offset: 0 }]);
	}
}
