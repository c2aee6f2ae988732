use innamark::status::Event;
use innamark::watermark::{Recovered, Watermark};
use innamark::zip::{ZipArchive, ZipWatermarker};

fn local_header(name: &[u8], data: &[u8], crc: u32, flags: u16, extra: &[u8]) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend(0x04034b50u32.to_le_bytes());
	out.extend(20u16.to_le_bytes()); // version needed
	out.extend(flags.to_le_bytes());
	out.extend(0u16.to_le_bytes()); // stored
	out.extend(0x6B2Du16.to_le_bytes()); // time
	out.extend(0x58D5u16.to_le_bytes()); // date
	out.extend(crc.to_le_bytes());
	out.extend((data.len() as u32).to_le_bytes());
	out.extend((data.len() as u32).to_le_bytes());
	out.extend((name.len() as u16).to_le_bytes());
	out.extend((extra.len() as u16).to_le_bytes());
	out.extend(name);
	out.extend(extra);
	out.extend(data);
	out
}

fn central_header(name: &[u8], data_len: u32, crc: u32, offset: u32) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend(0x02014b50u32.to_le_bytes());
	out.extend(20u16.to_le_bytes()); // version made by
	out.extend(20u16.to_le_bytes()); // version needed
	out.extend(0u16.to_le_bytes()); // flags
	out.extend(0u16.to_le_bytes()); // stored
	out.extend(0x6B2Du16.to_le_bytes()); // time
	out.extend(0x58D5u16.to_le_bytes()); // date
	out.extend(crc.to_le_bytes());
	out.extend(data_len.to_le_bytes());
	out.extend(data_len.to_le_bytes());
	out.extend((name.len() as u16).to_le_bytes());
	out.extend(0u16.to_le_bytes()); // extra fields
	out.extend(0u16.to_le_bytes()); // comment
	out.extend(0u16.to_le_bytes()); // disk number start
	out.extend(0u16.to_le_bytes()); // internal attributes
	out.extend(0u32.to_le_bytes()); // external attributes
	out.extend(offset.to_le_bytes());
	out.extend(name);
	out
}

fn end_record(total: u16, directory_size: u32, directory_offset: u32) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend(0x06054b50u32.to_le_bytes());
	out.extend(0u16.to_le_bytes()); // disk number
	out.extend(0u16.to_le_bytes()); // directory disk
	out.extend(total.to_le_bytes());
	out.extend(total.to_le_bytes());
	out.extend(directory_size.to_le_bytes());
	out.extend(directory_offset.to_le_bytes());
	out.extend(0u16.to_le_bytes()); // comment
	out
}

const ALPHA_DATA: &[u8] = b"alpha file contents";
const BETA_DATA: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// A two-entry stored archive, built by hand.
fn sample_zip() -> Vec<u8> {
	let first = local_header(b"alpha.txt", ALPHA_DATA, 0x1111_1111, 0, &[]);
	let second = local_header(b"beta.bin", BETA_DATA, 0x2222_2222, 0, &[]);
	let second_offset = first.len() as u32;

	let mut zip = first;
	zip.extend(&second);

	let directory_offset = zip.len() as u32;
	let first_entry = central_header(b"alpha.txt", ALPHA_DATA.len() as u32, 0x1111_1111, 0);
	let second_entry =
		central_header(b"beta.bin", BETA_DATA.len() as u32, 0x2222_2222, second_offset);
	let directory_size = (first_entry.len() + second_entry.len()) as u32;
	zip.extend(first_entry);
	zip.extend(second_entry);

	zip.extend(end_record(2, directory_size, directory_offset));
	zip
}

#[test]
fn parse_and_reemit_is_the_identity() {
	let zip = sample_zip();
	let archive = ZipArchive::parse(&zip).into_value().expect("archive parses");
	assert_eq!(archive.entries.len(), 2);
	assert_eq!(archive.central_directory.len(), 2);
	assert_eq!(archive.to_bytes(), zip);
}

#[test]
fn add_list_remove_round_trips_byte_exactly() {
	let codec = ZipWatermarker;
	let zip = sample_zip();
	let watermark = Watermark::from_text("Lorem ipsum dolor sit amet");

	assert!(!codec.contains(&zip));

	let marked = codec
		.add(&zip, watermark.clone())
		.into_value()
		.expect("watermark fits");
	assert_ne!(marked, zip);
	assert!(codec.contains(&marked));

	let got = codec.get(&marked);
	assert!(got.is_success(), "status was: {}", got.status());
	assert_eq!(got.into_value(), Some(vec![Recovered::Raw(watermark.clone())]));

	let (cleaned, removed) = codec
		.remove(&marked)
		.into_value()
		.expect("removal always yields");
	assert_eq!(cleaned, zip);
	assert_eq!(removed, vec![watermark]);
}

#[test]
fn add_rewrites_central_directory_offsets() {
	let codec = ZipWatermarker;
	let zip = sample_zip();
	let payload = b"offset shifting payload";

	let marked = codec
		.add(&zip, payload.as_slice())
		.into_value()
		.expect("watermark fits");
	let archive = ZipArchive::parse(&marked).into_value().expect("output parses");

	// the first entry grew by one extra-field header plus the payload
	let growth = (4 + payload.len()) as u32;
	let original = ZipArchive::parse(&zip).into_value().expect("input parses");
	assert_eq!(
		archive.central_directory[0].local_header_offset,
		original.central_directory[0].local_header_offset,
	);
	assert_eq!(
		archive.central_directory[1].local_header_offset,
		original.central_directory[1].local_header_offset + growth,
	);
	assert_eq!(
		archive.end_of_central_directory.central_directory_offset,
		original.end_of_central_directory.central_directory_offset + growth,
	);

	// data blobs are untouched
	assert_eq!(archive.entries[0].data, ALPHA_DATA);
	assert_eq!(archive.entries[1].data, BETA_DATA);
}

#[test]
fn removal_is_idempotent() {
	let codec = ZipWatermarker;
	let zip = sample_zip();

	let marked = codec.add(&zip, "mark").into_value().expect("watermark fits");
	let (once, _) = codec.remove(&marked).into_value().expect("removal always yields");
	let (twice, removed) = codec.remove(&once).into_value().expect("removal always yields");
	assert_eq!(once, twice);
	assert!(removed.is_empty());
}

#[test]
fn repeated_watermarks_tie_in_stream_order() {
	let codec = ZipWatermarker;
	let zip = sample_zip();

	let marked = codec.add(&zip, "one").into_value().expect("watermark fits");
	let marked = codec.add(&marked, "two").into_value().expect("watermark fits");

	let got = codec.watermarks(&marked, true, true);
	assert!(got.status().events().contains(&Event::MultipleMostFrequent { count: 2 }));
	assert_eq!(
		got.into_value(),
		Some(vec![
			Recovered::Raw(Watermark::from_text("one")),
			Recovered::Raw(Watermark::from_text("two")),
		]),
	);

	assert_eq!(codec.string(&marked).into_value().as_deref(), Some("one"));
}

#[test]
fn oversized_extra_field_is_rejected_without_change() {
	let codec = ZipWatermarker;

	// first header already carries 65529 extra-field bytes
	let big_extra = {
		let mut extra = Vec::new();
		extra.extend(0x0001u16.to_le_bytes());
		extra.extend(65525u16.to_le_bytes());
		extra.extend(std::iter::repeat(0xAA).take(65525));
		extra
	};
	let first = local_header(b"alpha.txt", ALPHA_DATA, 0x1111_1111, 0, &big_extra);
	let directory_offset = first.len() as u32;
	let entry = central_header(b"alpha.txt", ALPHA_DATA.len() as u32, 0x1111_1111, 0);
	let directory_size = entry.len() as u32;
	let mut zip = first;
	zip.extend(entry);
	zip.extend(end_record(1, directory_size, directory_offset));

	let outcome = codec.add(&zip, vec![0u8; 3]);
	assert!(outcome.is_error());
	assert!(!outcome.has_value());
	assert_eq!(
		outcome.status().events(),
		&[Event::OversizedHeader { total: 65536 }],
	);
}

#[test]
fn empty_archive_cannot_carry_a_watermark() {
	let codec = ZipWatermarker;
	let zip = end_record(0, 0, 0);

	assert!(ZipArchive::parse(&zip).is_success());

	let outcome = codec.add(&zip, "mark");
	assert!(outcome.is_error());
	assert_eq!(outcome.status().events(), &[Event::EmptyArchive]);
}

#[test]
fn garbage_between_records_is_an_invalid_magic_error() {
	let mut zip = local_header(b"alpha.txt", ALPHA_DATA, 0x1111_1111, 0, &[]);
	let offset = zip.len();
	zip.extend(b"garbage!");

	let outcome = ZipArchive::parse(&zip);
	assert!(outcome.is_error());
	assert!(matches!(
		outcome.status().events(),
		[Event::InvalidMagicBytes { offset: o, .. }] if *o == offset,
	));
}

#[test]
fn data_descriptors_are_preserved_verbatim() {
	let mut zip = local_header(b"alpha.txt", ALPHA_DATA, 0x1111_1111, 0x0008, &[]);
	zip.extend(0x08074b50u32.to_le_bytes());
	zip.extend(0x1111_1111u32.to_le_bytes());
	zip.extend((ALPHA_DATA.len() as u32).to_le_bytes());
	zip.extend((ALPHA_DATA.len() as u32).to_le_bytes());

	let directory_offset = zip.len() as u32;
	let entry = central_header(b"alpha.txt", ALPHA_DATA.len() as u32, 0x1111_1111, 0);
	let directory_size = entry.len() as u32;
	zip.extend(entry);
	zip.extend(end_record(1, directory_size, directory_offset));

	let archive = ZipArchive::parse(&zip).into_value().expect("archive parses");
	assert!(archive.entries[0].data_descriptor.is_some());
	assert_eq!(archive.to_bytes(), zip);
}
