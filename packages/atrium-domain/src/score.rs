use std::collections::HashSet;

use crate::{query::Intent, tables};

const PAYMENT_KEYWORDS: &[&str] =
	&["clp", "plp", "milestone", "installment", "instalment", "booking", "possession"];
const AMENITY_KEYWORDS: &[&str] = &["club", "wellness", "gym", "pool", "spa", "garden"];
const LOCATION_KEYWORDS: &[&str] =
	&["sector", "road", "metro", "highway", "airport", "distance", "proximity"];

/// Provenance fields a chunk carries into scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct Provenance<'a> {
	pub source: Option<&'a str>,
	pub project: Option<&'a str>,
	pub section: Option<&'a str>,
	pub page: Option<i32>,
}

/// Inclusive page span where payment schedules typically sit.
#[derive(Debug, Clone, Copy)]
pub struct PaymentPageRange {
	pub min: i32,
	pub max: i32,
}

impl PaymentPageRange {
	fn contains(self, page: i32) -> bool {
		page >= self.min && page <= self.max
	}
}

/// Intent-aware relevance of a chunk against a query token list. Pure and
/// deterministic: base token overlap, plus provenance boosts, plus
/// intent-specific boosts, all length-normalized so long chunks don't win on
/// raw coverage alone.
pub fn score(
	text: &str,
	provenance: Provenance<'_>,
	query_tokens: &[String],
	intent: Intent,
	payment_pages: PaymentPageRange,
) -> f32 {
	let lowered = text.to_lowercase();
	let words = word_set(&lowered);
	let mut total = query_tokens.iter().filter(|token| words.contains(token.as_str())).count()
		as f32;

	for field in [provenance.source, provenance.project, provenance.section] {
		let Some(value) = field else {
			continue;
		};
		let value = value.to_lowercase();

		total += 1.5
			* query_tokens.iter().filter(|token| value.contains(token.as_str())).count() as f32;
	}

	total += match intent {
		Intent::Payment => payment_boost(text, &lowered, provenance.page, payment_pages),
		Intent::Amenities => amenities_boost(&lowered),
		Intent::Location => keyword_boost(&lowered, LOCATION_KEYWORDS, 2.0),
		Intent::None => 0.0,
	};

	let word_count = lowered.split_whitespace().count().max(50);

	total * (600.0 / word_count as f32).min(1.0)
}

fn payment_boost(text: &str, lowered: &str, page: Option<i32>, range: PaymentPageRange) -> f32 {
	let mut boost = 0.0;

	if tables::looks_like_payment_schedule(text) {
		boost += 8.0;
	}

	let percent_signs = lowered.matches('%').count() as f32;

	boost += (percent_signs * 1.5).min(6.0);

	if page.map(|page| range.contains(page)).unwrap_or(false) {
		boost += 2.0;
	}

	boost + keyword_boost(lowered, PAYMENT_KEYWORDS, 1.5)
}

fn amenities_boost(lowered: &str) -> f32 {
	let bullet_lines = lowered
		.lines()
		.filter(|line| {
			let trimmed = line.trim_start();

			trimmed.starts_with("- ") || trimmed.starts_with("* ")
		})
		.count() as f32;

	(bullet_lines * 0.8).min(4.0) + keyword_boost(lowered, AMENITY_KEYWORDS, 2.0)
}

fn keyword_boost(lowered: &str, keywords: &[&str], weight: f32) -> f32 {
	let occurrences: usize = keywords.iter().map(|keyword| lowered.matches(keyword).count()).sum();

	weight * occurrences as f32
}

// Same character set and edge-trimming as `query::tokenize`, so query tokens
// like "sq.ft." and "1.5" compare against chunk words consistently.
fn word_set(lowered: &str) -> HashSet<&str> {
	lowered
		.split(|ch: char| !(ch.is_ascii_alphanumeric() || matches!(ch, '₹' | '.' | '%' | '/' | '-')))
		.map(|word| word.trim_matches(|ch| matches!(ch, '.' | '/' | '-')))
		.filter(|word| !word.is_empty())
		.collect()
}
