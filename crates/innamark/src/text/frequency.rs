//! Most-frequent selection over recovered watermarks.

use crate::status::{Event, Outcome, Status};
use crate::tag::InnamarkTag;
use crate::watermark::{Recovered, Watermark};

/// Keep only the value(s) tied for maximum frequency.
///
/// A sole winner with frequency k is returned as k copies. When n ≥ 2
/// values tie, the result is k copies of each tied value (in first-seen
/// order) and a [`MultipleMostFrequent`](Event::MultipleMostFrequent)
/// warning. An empty input is an empty success.
pub fn most_frequent<T: Clone + Eq>(items: &[T]) -> Outcome<Vec<T>> {
	if items.is_empty() {
		return Outcome::success(Vec::new());
	}

	let mut counts: Vec<(&T, usize)> = Vec::new();
	for item in items {
		match counts.iter_mut().find(|(value, _)| *value == item) {
			Some((_, n)) => *n += 1,
			None => counts.push((item, 1)),
		}
	}

	let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
	let winners: Vec<&T> = counts
		.iter()
		.filter(|(_, n)| *n == max)
		.map(|(value, _)| *value)
		.collect();

	let mut status = Status::success();
	if winners.len() > 1 {
		status.add_event(Event::MultipleMostFrequent { count: winners.len() });
	}

	let mut result = Vec::with_capacity(winners.len() * max);
	for winner in winners {
		result.extend(std::iter::repeat(winner.clone()).take(max));
	}

	status.into_outcome(result)
}

/// Apply the single-watermark and squash filters, then promote the list to
/// tag form if every member parses and validates cleanly.
pub(crate) fn refine(
	mut watermarks: Vec<Watermark>,
	squash: bool,
	single: bool,
	status: &mut Status,
) -> Vec<Recovered> {
	if single {
		let (frequency_status, value) = most_frequent(&watermarks).into_parts();
		status.append(frequency_status);
		watermarks = value.unwrap_or_default();
	}

	if squash {
		let mut seen: Vec<Watermark> = Vec::new();
		watermarks.retain(|watermark| {
			if seen.contains(watermark) {
				false
			} else {
				seen.push(watermark.clone());
				true
			}
		});
	}

	// all-or-nothing promotion: one unparseable copy keeps everything raw
	let mut tags = Vec::with_capacity(watermarks.len());
	for watermark in &watermarks {
		let parsed = InnamarkTag::from_watermark(watermark);
		if !parsed.is_success() {
			return watermarks.into_iter().map(Recovered::Raw).collect();
		}
		match parsed.into_value() {
			Some(tag) => tags.push(tag),
			None => return watermarks.into_iter().map(Recovered::Raw).collect(),
		}
	}

	tags.into_iter().map(Recovered::Tag).collect()
}
