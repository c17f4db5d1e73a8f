use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^>]+>"));
static CURRENCY_RS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bRs\.?[ \t]*"));
static CURRENCY_INR: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bINR[ \t]*"));
static CURRENCY_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"₹[ \t]+"));
static AREA_SQFT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(?:sq\.?[ \t]*ft|sqft|sft)\b\.?"));
static AREA_SQM: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(?:sq\.?[ \t]*m|sqm)\b\.?"));
static BHK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bb\.?[ \t]*h\.?[ \t]*k\.?\b"));
static HSPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"[ \t]+"));
static NEWLINE_TRIM: LazyLock<Regex> = LazyLock::new(|| compile(r"[ \t]*\n[ \t]*"));
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| compile(r"\n{3,}"));

fn compile(pattern: &str) -> Regex {
	// Patterns are string literals; a failure here is a programming error.
	Regex::new(pattern).expect("hard-coded normalizer pattern must compile")
}

/// Canonicalizes brochure text so stored chunks and query text compare
/// consistently. Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
	let out = unescape_entities(text);
	let out = TAG.replace_all(&out, " ").into_owned();
	let out = fold_glyphs(&out);
	let out = CURRENCY_RS.replace_all(&out, "₹").into_owned();
	let out = CURRENCY_INR.replace_all(&out, "₹").into_owned();
	let out = CURRENCY_SPACE.replace_all(&out, "₹").into_owned();
	let out = AREA_SQFT.replace_all(&out, "sq.ft.").into_owned();
	let out = AREA_SQM.replace_all(&out, "sq.m.").into_owned();
	let out = BHK.replace_all(&out, "BHK").into_owned();
	let out = HSPACE.replace_all(&out, " ").into_owned();
	let out = NEWLINE_TRIM.replace_all(&out, "\n").into_owned();
	let out = BLANK_LINES.replace_all(&out, "\n\n").into_owned();

	out.trim().to_string()
}

/// Unescapes the handful of HTML entities OCR output carries. Iterates to a
/// fixpoint so double-escaped input still normalizes idempotently.
fn unescape_entities(text: &str) -> String {
	let mut out = text.to_string();

	for _ in 0..4 {
		let next = out
			.replace("&nbsp;", " ")
			.replace("&quot;", "\"")
			.replace("&#39;", "'")
			.replace("&lt;", "<")
			.replace("&gt;", ">")
			.replace("&amp;", "&");

		if next == out {
			break;
		}

		out = next;
	}

	out
}

fn fold_glyphs(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.chars() {
		match ch {
			'\u{2018}' | '\u{2019}' => out.push('\''),
			'\u{201C}' | '\u{201D}' => out.push('"'),
			'\u{2013}' | '\u{2014}' => out.push('-'),
			// Bullets become a list marker, not a bare dash; OCR often glues
			// them to the first word.
			'\u{2022}' | '\u{25CF}' | '\u{25AA}' | '\u{00B7}' => out.push_str("- "),
			'\r' => out.push('\n'),
			other => out.push(other),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_currency_prefixes() {
		assert_eq!(normalize("Rs. 45 lakh"), "₹45 lakh");
		assert_eq!(normalize("INR 1.2 Cr"), "₹1.2 Cr");
		assert_eq!(normalize("₹ 90,000"), "₹90,000");
	}

	#[test]
	fn folds_area_units() {
		assert_eq!(normalize("1450 sqft carpet"), "1450 sq.ft. carpet");
		assert_eq!(normalize("1450 sq ft carpet"), "1450 sq.ft. carpet");
		assert_eq!(normalize("1450 sft carpet"), "1450 sq.ft. carpet");
	}

	#[test]
	fn bullets_become_list_markers() {
		assert_eq!(normalize("•Clubhouse"), "- Clubhouse");
		assert_eq!(normalize("● Gym\n▪ Pool"), "- Gym\n- Pool");
	}

	#[test]
	fn folds_bhk_spellings() {
		assert_eq!(normalize("spacious b.h.k layout"), "spacious BHK layout");
		assert_eq!(normalize("spacious bhk layout"), "spacious BHK layout");
	}
}
