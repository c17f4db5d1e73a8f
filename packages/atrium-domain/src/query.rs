use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| compile(r#""([^"]+)""#));
static CAPITALIZED: LazyLock<Regex> =
	LazyLock::new(|| compile(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b"));
static FALLBACK_WORD: LazyLock<Regex> = LazyLock::new(|| compile(r"\b\w{4,}\b"));

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).expect("hard-coded query pattern must compile")
}

/// Coarse classification of what a brochure query is after. Checked in a
/// fixed priority order: payment beats amenities beats location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
	Payment,
	Amenities,
	Location,
	None,
}

impl Intent {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Payment => "payment",
			Self::Amenities => "amenities",
			Self::Location => "location",
			Self::None => "none",
		}
	}
}

// Multi-word markers match as substrings; single-word markers match whole
// tokens so e.g. "emi" never fires inside "premium".
const PAYMENT_MARKERS: &[&str] = &[
	"payment plan",
	"payment schedule",
	"payment",
	"milestone",
	"installment",
	"instalment",
	"emi",
	"subvention",
	"down payment",
	"booking amount",
	"construction linked",
	"possession linked",
	"clp",
	"plp",
];
const AMENITY_MARKERS: &[&str] = &[
	"amenities",
	"amenity",
	"facilities",
	"facility",
	"clubhouse",
	"club house",
	"gym",
	"swimming pool",
	"pool",
	"spa",
	"garden",
	"sports",
];
const LOCATION_MARKERS: &[&str] = &[
	"location",
	"located",
	"where is",
	"address",
	"sector",
	"connectivity",
	"distance",
	"nearby",
	"metro",
	"airport",
	"highway",
	"proximity",
];

const STOPWORDS: &[&str] = &[
	"the", "a", "an", "and", "or", "of", "to", "in", "on", "for", "with", "at", "by", "from",
	"is", "are", "was", "were", "be", "as", "that", "this", "these", "those",
];

const DOMAIN_PHRASES: &[&str] = &[
	"payment plan",
	"construction linked",
	"possession linked",
	"clp",
	"plp",
	"rera",
	"carpet area",
	"super area",
	"built-up area",
	"bhk",
	"possession",
	"booking",
	"down payment",
	"emi",
];

pub fn intent_tag(query: &str) -> Intent {
	let lowered = query.to_lowercase();
	// Whole-token matching over cleaned tokens: "gym?" still counts as "gym",
	// while "premium" never fires the "emi" marker.
	let tokens: HashSet<String> = tokenize(query).into_iter().collect();
	let has = |markers: &[&str]| {
		markers.iter().any(|marker| {
			if marker.contains(' ') {
				lowered.contains(marker)
			} else {
				tokens.contains(*marker)
			}
		})
	};

	if has(PAYMENT_MARKERS) {
		Intent::Payment
	} else if has(AMENITY_MARKERS) {
		Intent::Amenities
	} else if has(LOCATION_MARKERS) {
		Intent::Location
	} else {
		Intent::None
	}
}

/// Lowercases, strips to the character set brochures actually use, and drops
/// stopwords. Duplicates are kept on purpose: the scorer counts each query
/// token occurrence.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut cleaned = String::with_capacity(text.len());

	for ch in text.chars() {
		let lowered = ch.to_ascii_lowercase();

		if lowered.is_ascii_alphanumeric() || matches!(lowered, '₹' | '.' | '%' | '/' | '-') {
			cleaned.push(lowered);
		} else {
			cleaned.push(' ');
		}
	}

	cleaned
		.split_whitespace()
		.map(|word| word.trim_matches(|ch| matches!(ch, '.' | '/' | '-')))
		.filter(|word| !word.is_empty())
		.filter(|word| !STOPWORDS.contains(word))
		.map(str::to_string)
		.collect()
}

/// Extracts the terms that feed lexical fallback queries: quoted phrases
/// first, then capitalized multi-word spans (candidate project names), then
/// known domain phrases; failing all of those, the first five words of
/// length >= 4.
pub fn keyword_terms(question: &str) -> Vec<String> {
	let lowered = question.to_lowercase();
	let mut terms = Vec::new();

	for capture in QUOTED.captures_iter(question) {
		if let Some(group) = capture.get(1) {
			terms.push(group.as_str().to_string());
		}
	}

	for span in CAPITALIZED.find_iter(question) {
		terms.push(span.as_str().to_string());
	}

	for phrase in DOMAIN_PHRASES {
		if lowered.contains(phrase) {
			terms.push((*phrase).to_string());
		}
	}

	if terms.is_empty() {
		terms = FALLBACK_WORD
			.find_iter(&lowered)
			.take(5)
			.map(|word| word.as_str().to_string())
			.collect();
	}

	let mut seen = HashSet::new();

	terms.retain(|term| seen.insert(term.to_lowercase()));

	terms
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAlias {
	pub alias: String,
	pub canonical: String,
}

/// Resolves the project a query is scoped to. An explicitly supplied name
/// always wins; otherwise the longest alias found in the query decides.
pub fn detect_project_filter(
	query: &str,
	explicit: Option<&str>,
	aliases: &[ProjectAlias],
) -> Option<String> {
	if let Some(name) = explicit {
		let trimmed = name.trim();

		if !trimmed.is_empty() {
			return Some(trimmed.to_string());
		}
	}

	let lowered = query.to_lowercase();
	let mut best: Option<&ProjectAlias> = None;

	for candidate in aliases {
		let alias = candidate.alias.trim().to_lowercase();

		if alias.len() < 3 || !lowered.contains(&alias) {
			continue;
		}
		if best.map(|prev| alias.len() > prev.alias.trim().len()).unwrap_or(true) {
			best = Some(candidate);
		}
	}

	best.map(|alias| alias.canonical.clone())
}

/// Produces the original query plus up to two intent-selected rewrites.
/// Purely textual; no model call. The original is always first and the output
/// is deduplicated.
pub fn expand_query(query: &str, intent: Intent) -> Vec<String> {
	let lowered = query.to_lowercase();
	let rewrites: &[&str] = match intent {
		Intent::Payment => &["payment schedule", "construction linked payment"],
		Intent::Amenities => &["facilities", "clubhouse features"],
		Intent::Location | Intent::None => {
			if ["bhk", "carpet", "size", "area"].iter().any(|term| lowered.contains(term)) {
				&["carpet area", "super area"]
			} else {
				&[]
			}
		},
	};
	let mut out = vec![query.to_string()];
	let mut seen: HashSet<String> = HashSet::from([lowered]);

	for rewrite in rewrites {
		if seen.insert(rewrite.to_lowercase()) {
			out.push((*rewrite).to_string());
		}
	}

	out.truncate(3);

	out
}
