use crate::query::Intent;

/// Classification labels for tables extracted from brochures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
	PaymentPlan,
	UnitSpecifications,
	Pricing,
	Amenities,
	Location,
	Specifications,
	Unknown,
}

impl TableKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::PaymentPlan => "payment_plan",
			Self::UnitSpecifications => "unit_specifications",
			Self::Pricing => "pricing",
			Self::Amenities => "amenities",
			Self::Location => "location",
			Self::Specifications => "specifications",
			Self::Unknown => "unknown",
		}
	}

	pub fn parse(label: &str) -> Self {
		match label {
			"payment_plan" => Self::PaymentPlan,
			"unit_specifications" => Self::UnitSpecifications,
			"pricing" => Self::Pricing,
			"amenities" => Self::Amenities,
			"location" => Self::Location,
			"specifications" => Self::Specifications,
			_ => Self::Unknown,
		}
	}
}

/// The table-type label worth filtering on for a given query intent.
pub fn desired_kind(intent: Intent) -> Option<TableKind> {
	match intent {
		Intent::Payment => Some(TableKind::PaymentPlan),
		Intent::Amenities => Some(TableKind::Amenities),
		Intent::Location => Some(TableKind::Location),
		Intent::None => None,
	}
}

/// Heuristic table-type detection. Inherently fuzzy, so it hides behind a
/// trait: swap in a learned classifier without touching the callers.
pub trait TableClassifier
where
	Self: Send + Sync,
{
	fn classify(&self, table_text: &str, header_row: Option<&str>) -> TableKind;
}

/// Keyword-scanning classifier matching the labels the extraction pipeline
/// writes. Payment plans require the header row to agree, so a pricing grid
/// that merely mentions "payment" is not mislabeled.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordTableClassifier;

impl TableClassifier for KeywordTableClassifier {
	fn classify(&self, table_text: &str, header_row: Option<&str>) -> TableKind {
		let text = table_text.to_lowercase();
		let header = header_row.unwrap_or_default().to_lowercase();
		let any = |haystack: &str, needles: &[&str]| {
			needles.iter().any(|needle| haystack.contains(needle))
		};

		if any(
			&text,
			&[
				"payment",
				"milestone",
				"installment",
				"booking",
				"possession",
				"clp",
				"plp",
				"construction linked",
				"stage",
				"due",
			],
		) && any(&header, &["payment", "milestone", "stage", "installment"])
		{
			return TableKind::PaymentPlan;
		}
		if any(&text, &["price", "rate", "cost", "charge", "fee"]) && !text.contains("payment") {
			return TableKind::Pricing;
		}
		if any(&text, &["bhk", "carpet", "super area", "saleable", "sq.ft", "sqft", "unit"]) {
			return TableKind::UnitSpecifications;
		}
		if any(&text, &["amenity", "amenities", "facility", "club", "gym", "pool"]) {
			return TableKind::Amenities;
		}
		if any(&text, &["distance", "km", "mins", "location", "nearby", "proximity"]) {
			return TableKind::Location;
		}
		if any(&text, &["specification", "flooring", "fitting", "finishing"]) {
			return TableKind::Specifications;
		}

		TableKind::Unknown
	}
}

/// Detects a tabular payment schedule: a multi-row pipe grid whose header row
/// carries payment words. Used by the scorer's payment-intent boost.
pub fn looks_like_payment_schedule(text: &str) -> bool {
	let mut grid_rows = text.lines().filter(|line| line.matches('|').count() >= 2);
	let Some(header) = grid_rows.next() else {
		return false;
	};

	if grid_rows.count() < 2 {
		return false;
	}

	let header = header.to_lowercase();

	["payment", "milestone", "stage", "installment", "instalment"]
		.iter()
		.any(|word| header.contains(word))
}
