use innamark::status::Event;
use innamark::text::{SeparatorStrategy, TextWatermarker};
use innamark::watermark::{Recovered, Watermark};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

const A0: char = '\u{2008}';
const A1: char = '\u{2009}';
const A2: char = '\u{202F}';
const A3: char = '\u{205F}';

/// A paragraph with plenty of spaces (one of them doubled) and no
/// full-alphabet characters.
const LOREM: &str = "Lorem ipsum dolor sit amet,  consectetur adipiscing elit, sed do \
	eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, \
	quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. \
	Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu \
	fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa \
	qui officia deserunt mollit anim id est laborum. Sed ut perspiciatis unde omnis iste \
	natus error sit voluptatem accusantium doloremque laudantium, totam rem aperiam.";

fn content_of(recovered: &Recovered) -> Vec<u8> {
	recovered.content().into_value().expect("recovered content is readable")
}

#[test]
fn encoding_emits_four_known_digits_per_byte() {
	let codec = TextWatermarker::default();
	let bytes = [0x00, 0x01, 0x0F, 0x41, 0x62, 0xAA, 0xF0, 0xFE, 0xFF, 0x42];

	let encoded: Vec<char> = codec.alphabet().encode(&bytes).chars().collect();
	assert_eq!(encoded.len(), 40);

	// 0x00: four zero digits; 0x01: digit one then zeroes (LSD first)
	assert_eq!(&encoded[..4], &[A0, A0, A0, A0]);
	assert_eq!(&encoded[4..8], &[A1, A0, A0, A0]);
	// 0x0F = 3 + 3*4; 0xFF = 3 + 3*4 + 3*16 + 3*64
	assert_eq!(&encoded[8..12], &[A3, A3, A0, A0]);
	assert_eq!(&encoded[32..36], &[A3, A3, A3, A3]);
	// 0xAA = 2 + 2*4 + 2*16 + 2*64
	assert_eq!(&encoded[20..24], &[A2, A2, A2, A2]);

	let decoded = codec.alphabet().decode(encoded);
	assert!(decoded.is_success());
	assert_eq!(decoded.into_value(), Some(bytes.to_vec()));
}

#[test]
fn add_then_get_recovers_the_watermark() {
	let codec = TextWatermarker::default();

	let added = codec.add(LOREM, "Hello World");
	assert!(added.is_success(), "status was: {}", added.status());
	let marked = added.into_value().expect("add yields a cover");

	// same visible length, different characters
	assert_eq!(marked.chars().count(), LOREM.chars().count());
	assert_ne!(marked, LOREM);
	assert!(codec.contains(&marked));
	assert!(!codec.contains(LOREM));

	let got = codec.get(&marked);
	assert!(got.is_success(), "status was: {}", got.status());
	let list = got.into_value().expect("get yields a list");
	assert_eq!(list.len(), 1);
	assert_eq!(content_of(&list[0]), b"Hello World");
	assert!(matches!(list[0], Recovered::Tag(_)));
}

#[test]
fn add_reports_complete_copies_and_leftovers() {
	let codec = TextWatermarker::default();
	let added = codec.add(LOREM, "Hello World");

	// 48 digits per wrapped copy, 49 positions per frame: the paragraph
	// fits one copy and has leftovers
	assert_eq!(
		added.status().events(),
		&[Event::Inserted { copies: 1, incomplete: true }],
	);
}

#[test]
fn partial_watermark_is_recovered_best_effort() {
	let codec = TextWatermarker::default();

	// five insert positions, watermarked by hand with the first five digits
	// of "Test" (an interrupted embedding)
	let digits: Vec<char> = codec.alphabet().encode(b"Test").chars().take(5).collect();
	let mut digit_iter = digits.into_iter();
	let cover: String = "Loremipsum dolor sit amet, consetetur "
		.chars()
		.map(|c| {
			if c == ' ' {
				digit_iter.next().expect("five spaces, five digits")
			} else {
				c
			}
		})
		.collect();

	let got = codec.watermarks(&cover, true, true);
	assert!(got.is_warning());
	assert!(got.status().events().contains(&Event::IncompleteWatermark));
	assert_eq!(
		got.into_value(),
		Some(vec![Recovered::Raw(Watermark::new(vec![0x54, 0x01]))]),
	);
}

#[test]
fn oversized_watermark_leaves_the_cover_unmodified() {
	let codec = TextWatermarker::with_separator(SeparatorStrategy::SingleSeparatorChar(
		'\u{2063}',
	))
	.expect("separator is outside the alphabet");
	let cover = "Lorem ipsum dolor sit amet";

	let added = codec.add(cover, "Test");
	assert!(added.is_warning());
	assert_eq!(
		added.status().events(),
		&[Event::OversizedWatermark { required: 22, actual: 4 }],
	);
	assert_eq!(added.into_value().as_deref(), Some(cover));
}

#[test]
fn tied_watermarks_warn_and_keep_stream_order() {
	let codec = TextWatermarker::default();

	let first = codec.add(LOREM, "Hello World").into_value().expect("cover fits");
	let second = codec.add(LOREM, "Goodbye Moon").into_value().expect("cover fits");
	let cover = format!("{first}{second}");

	let got = codec.string(&cover);
	assert!(got.status().events().contains(&Event::MultipleMostFrequent { count: 2 }));
	assert_eq!(got.into_value().as_deref(), Some("Hello World"));
}

#[test]
fn remove_after_add_restores_the_cover() {
	let codec = TextWatermarker::default();

	let marked = codec.add(LOREM, "Hello World").into_value().expect("cover fits");
	let cleaned = codec.remove(&marked).into_value().expect("remove always yields");
	assert_eq!(cleaned, LOREM);

	// and removal is idempotent
	let again = codec.remove(&cleaned).into_value().expect("remove always yields");
	assert_eq!(again, cleaned);
}

#[test]
fn single_separator_framing_round_trips() {
	let codec = TextWatermarker::with_separator(SeparatorStrategy::SingleSeparatorChar(
		'\u{2063}',
	))
	.expect("separator is outside the alphabet");

	// 16 positions, 5 per framed copy: three copies placed, two recoverable
	let cover = "a b c d e f g h i j k l m n o p q";
	let marked = codec
		.add_with(cover, vec![0xAB], false)
		.into_value()
		.expect("cover fits");

	let all = codec.watermarks(&marked, false, false);
	assert!(all.is_success());
	let list = all.into_value().expect("extraction yields a list");
	assert_eq!(list.len(), 2);
	for recovered in &list {
		assert_eq!(content_of(recovered), vec![0xAB]);
	}

	let squashed = codec.get(&marked).into_value().expect("extraction yields a list");
	assert_eq!(squashed.len(), 1);
}

#[test]
fn start_end_framing_round_trips() {
	let codec = TextWatermarker::with_separator(SeparatorStrategy::StartEndSeparatorChars(
		'<', '>',
	))
	.expect("separators are outside the alphabet");

	// 13 positions, 6 per framed copy: two complete copies
	let cover = "a b c d e f g h i j k l m n";
	let marked = codec
		.add_with(cover, vec![0xAB], false)
		.into_value()
		.expect("cover fits");

	let all = codec.watermarks(&marked, false, false);
	let list = all.into_value().expect("extraction yields a list");
	assert_eq!(list.len(), 2);
	assert_eq!(content_of(&list[0]), vec![0xAB]);
}

#[test]
fn unmatched_end_separator_opens_at_the_start() {
	let codec = TextWatermarker::with_separator(SeparatorStrategy::StartEndSeparatorChars(
		'<', '>',
	))
	.expect("separators are outside the alphabet");

	// digits of 0x54, then a closing separator with no opener
	let cover: String = [A0, A1, A1, A1, '>'].iter().collect();
	let got = codec.watermarks(&cover, false, false);
	assert_eq!(
		got.into_value(),
		Some(vec![Recovered::Raw(Watermark::new(vec![0x54]))]),
	);
}

#[test]
fn clean_cover_yields_no_watermarks() {
	let codec = TextWatermarker::default();
	let got = codec.get(LOREM);
	assert!(got.is_success());
	assert_eq!(got.into_value(), Some(Vec::new()));
}

#[test]
fn random_payloads_round_trip_through_covers() {
	let codec = TextWatermarker::default();
	let mut rng = StdRng::seed_from_u64(0x1217);
	let cover = "lorem ipsum ".repeat(30);

	for _ in 0..10 {
		let mut payload = vec![0u8; rng.gen_range(1..=6)];
		rng.fill_bytes(&mut payload);

		let marked = codec
			.add(&cover, payload.clone())
			.into_value()
			.expect("cover fits small payloads");
		let list = codec.get(&marked).into_value().expect("extraction yields a list");
		assert_eq!(list.len(), 1, "payload {payload:02x?}");
		assert_eq!(content_of(&list[0]), payload);
	}
}

#[test]
fn random_bytes_round_trip_through_the_alphabet() {
	let codec = TextWatermarker::default();
	let mut rng = StdRng::seed_from_u64(0x2008);

	for _ in 0..100 {
		let mut bytes = vec![0u8; rng.gen_range(0..64)];
		rng.fill_bytes(&mut bytes);

		let decoded = codec.alphabet().decode(codec.alphabet().encode(&bytes).chars());
		assert!(decoded.is_success());
		assert_eq!(decoded.into_value(), Some(bytes));
	}
}
