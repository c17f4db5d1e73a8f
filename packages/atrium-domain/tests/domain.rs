use atrium_domain::{
	Intent, KeywordTableClassifier, PaymentPageRange, ProjectAlias, Provenance, TableClassifier,
	TableKind, mmr,
	normalize::normalize,
	query::{detect_project_filter, expand_query, intent_tag, keyword_terms, tokenize},
	score::score,
	tables::{desired_kind, looks_like_payment_schedule},
};

const PAGES: PaymentPageRange = PaymentPageRange { min: 8, max: 16 };

#[test]
fn normalize_is_idempotent() {
	let samples = [
		"Rs. 45 lakh booking amount &amp; Rs 5 lakh on possession",
		"<b>3 b.h.k</b> \u{2013} 1450 sq ft \u{201C}premium\u{201D}",
		"\u{2022} Gym\n\u{2022} Pool\n\n\n\nINR 90,000 per sqft",
		"  spaced\t\ttext \n\n\n\n with   runs  ",
		"&amp;lt;table&amp;gt; stays text",
	];

	for sample in samples {
		let once = normalize(sample);
		let twice = normalize(&once);

		assert_eq!(once, twice, "normalize must be idempotent for {sample:?}");
	}
}

#[test]
fn normalize_preserves_numbers_and_letters() {
	let out = normalize("Tower-A: 1450 sq ft, Rs. 1.2 Cr, 65% on completion");

	assert!(out.contains("1450"));
	assert!(out.contains("1.2"));
	assert!(out.contains("65%"));
	assert!(out.contains("₹1.2"));
	assert!(out.contains("sq.ft."));
}

#[test]
fn normalize_folds_bullets_and_dashes() {
	let out = normalize("\u{2022} Clubhouse \u{2014} 24x7");

	assert_eq!(out, "- Clubhouse - 24x7");
}

#[test]
fn intent_priority_is_payment_first() {
	assert_eq!(intent_tag("payment plan near the clubhouse location"), Intent::Payment);
	assert_eq!(intent_tag("amenities near the metro"), Intent::Amenities);
	assert_eq!(intent_tag("how far is the airport"), Intent::Location);
	assert_eq!(intent_tag("who is the architect"), Intent::None);
}

#[test]
fn intent_covers_payment_synonyms() {
	for query in [
		"which milestone triggers the next payout",
		"installment breakdown please",
		"is there an EMI option",
		"subvention scheme details",
		"construction linked plan",
	] {
		assert_eq!(intent_tag(query), Intent::Payment, "query {query:?}");
	}
}

#[test]
fn short_markers_do_not_fire_inside_words() {
	// "premium" contains "emi"; token matching keeps it out of payment.
	assert_eq!(intent_tag("premium residences overview"), Intent::None);
}

#[test]
fn intent_markers_survive_adjacent_punctuation() {
	assert_eq!(intent_tag("is there a gym?"), Intent::Amenities);
	assert_eq!(intent_tag("do you offer EMI?"), Intent::Payment);
	assert_eq!(intent_tag("how far is the metro?"), Intent::Location);
	assert_eq!(intent_tag("pool, spa, garden."), Intent::Amenities);
}

#[test]
fn tokenize_drops_stopwords_and_keeps_domain_terms() {
	let tokens = tokenize("What is the payment plan for a 3 BHK?");

	assert!(tokens.contains(&"payment".to_string()));
	assert!(tokens.contains(&"plan".to_string()));
	assert!(tokens.contains(&"bhk".to_string()));
	assert!(tokens.contains(&"3".to_string()));
	assert!(!tokens.contains(&"the".to_string()));
	assert!(!tokens.contains(&"for".to_string()));
}

#[test]
fn keyword_terms_prefer_quoted_phrases() {
	let terms = keyword_terms("show \"construction linked plan\" details for Aravalli Heights");

	assert_eq!(terms[0], "construction linked plan");
	assert!(terms.iter().any(|term| term == "Aravalli Heights"));
}

#[test]
fn keyword_terms_fall_back_to_long_words() {
	let terms = keyword_terms("tell about tallest tower there");

	assert!(!terms.is_empty());
	assert!(terms.len() <= 5);
	assert!(terms.iter().all(|term| term.len() >= 4));
}

#[test]
fn project_filter_explicit_name_wins() {
	let aliases = vec![ProjectAlias {
		alias: "aravalli".to_string(),
		canonical: "Aravalli Heights".to_string(),
	}];
	let detected =
		detect_project_filter("price in aravalli", Some("Green Meadows"), &aliases);

	assert_eq!(detected.as_deref(), Some("Green Meadows"));
}

#[test]
fn project_filter_longest_alias_wins() {
	let aliases = vec![
		ProjectAlias { alias: "green".to_string(), canonical: "Green Meadows".to_string() },
		ProjectAlias {
			alias: "green towers".to_string(),
			canonical: "Green Towers".to_string(),
		},
	];
	let detected = detect_project_filter("amenities at green towers?", None, &aliases);

	assert_eq!(detected.as_deref(), Some("Green Towers"));
}

#[test]
fn project_filter_absent_when_nothing_matches() {
	assert_eq!(detect_project_filter("any payment plan?", None, &[]), None);
}

#[test]
fn expansion_starts_with_original_and_dedups() {
	let expanded = expand_query("payment schedule?", Intent::Payment);

	assert_eq!(expanded[0], "payment schedule?");
	assert!(expanded.len() <= 3);

	let lowered: Vec<String> = expanded.iter().map(|q| q.to_lowercase()).collect();
	let mut unique = lowered.clone();

	unique.sort();
	unique.dedup();
	assert_eq!(unique.len(), lowered.len());
}

#[test]
fn expansion_covers_unit_size_queries() {
	let expanded = expand_query("how big is a 3 bhk", Intent::None);

	assert!(expanded.iter().any(|q| q == "carpet area"));
	assert!(expanded.iter().any(|q| q == "super area"));
}

#[test]
fn scorer_ranks_payment_table_above_passing_mention() {
	let table_chunk = "Payment Plan | Milestone | Due\n\
		Booking | On booking | 10%\n\
		Foundation | Within 90 days | 25%\n\
		Possession | On offer | 65%";
	let mention_chunk = "The brochure also briefly mentions payment flexibility options.";
	let query_tokens = tokenize("What is the payment plan?");
	let table_score =
		score(table_chunk, Provenance::default(), &query_tokens, Intent::Payment, PAGES);
	let mention_score =
		score(mention_chunk, Provenance::default(), &query_tokens, Intent::Payment, PAGES);

	assert!(
		table_score > mention_score,
		"table chunk must outrank passing mention: {table_score} vs {mention_score}"
	);
}

#[test]
fn scorer_rewards_provenance_matches() {
	let provenance = Provenance {
		source: Some("aravalli_brochure.pdf"),
		project: Some("Aravalli Heights"),
		section: None,
		page: None,
	};
	let query_tokens = tokenize("aravalli payment plan");
	let with_meta = score("payment plan details", provenance, &query_tokens, Intent::None, PAGES);
	let without_meta =
		score("payment plan details", Provenance::default(), &query_tokens, Intent::None, PAGES);

	assert!(with_meta > without_meta);
}

#[test]
fn scorer_length_normalizes_long_chunks() {
	let short = "payment plan milestone installment";
	let long = format!("{short} {}", "filler ".repeat(1_200));
	let query_tokens = tokenize("payment plan");
	let short_score = score(short, Provenance::default(), &query_tokens, Intent::None, PAGES);
	let long_score = score(&long, Provenance::default(), &query_tokens, Intent::None, PAGES);

	assert!(short_score > long_score);
}

#[test]
fn scorer_is_deterministic() {
	let query_tokens = tokenize("clubhouse amenities");
	let text = "- Clubhouse\n- Gym\n- Pool";
	let first = score(text, Provenance::default(), &query_tokens, Intent::Amenities, PAGES);
	let second = score(text, Provenance::default(), &query_tokens, Intent::Amenities, PAGES);

	assert_eq!(first, second);
}

#[test]
fn mmr_returns_exactly_k_distinct_items() {
	let documents: Vec<String> =
		(0..10).map(|i| format!("chunk {i} about payment milestone {i}")).collect();
	let relevance: Vec<f32> = (0..10).map(|i| i as f32).collect();
	let selected = mmr::diversify(&documents, &relevance, 0.75, 4);

	assert_eq!(selected.len(), 4);

	let mut unique = selected.clone();

	unique.sort_unstable();
	unique.dedup();
	assert_eq!(unique.len(), 4);
}

#[test]
fn mmr_selects_global_best_first() {
	let documents = vec![
		"alpha beta".to_string(),
		"gamma delta".to_string(),
		"epsilon zeta".to_string(),
	];
	let relevance = vec![1.0, 9.0, 3.0];
	let selected = mmr::diversify(&documents, &relevance, 0.75, 2);

	assert_eq!(selected[0], 1);
}

#[test]
fn mmr_low_lambda_prefers_diversity() {
	// Documents 0 and 1 are near-duplicates; 2 is distinct but less relevant.
	let documents = vec![
		"booking payment milestone schedule".to_string(),
		"booking payment milestone schedule extra".to_string(),
		"clubhouse gym pool garden".to_string(),
	];
	let relevance = vec![10.0, 9.5, 2.0];
	let diverse = mmr::diversify(&documents, &relevance, 0.1, 2);

	assert_eq!(diverse[0], 0);
	assert_eq!(diverse[1], 2, "low lambda must skip the near-duplicate");
}

#[test]
fn mmr_handles_pool_smaller_than_k() {
	let documents = vec!["only one".to_string()];
	let selected = mmr::diversify(&documents, &[1.0], 0.75, 5);

	assert_eq!(selected, vec![0]);
}

#[test]
fn classifier_labels_payment_plan_only_with_header_agreement() {
	let classifier = KeywordTableClassifier;
	let payment = "Milestone | Payment Due\nBooking | 10%\nPossession | 90%";
	let pricing = "Unit | Rate\n2 BHK | low rise pricing per sq.ft";

	assert_eq!(classifier.classify(payment, Some("Milestone | Payment Due")), TableKind::PaymentPlan);
	assert_ne!(classifier.classify(pricing, Some("Unit | Rate")), TableKind::PaymentPlan);
}

#[test]
fn classifier_covers_standard_labels() {
	let classifier = KeywordTableClassifier;

	assert_eq!(
		classifier.classify("2 BHK carpet 1450 sq.ft saleable", None),
		TableKind::UnitSpecifications
	);
	assert_eq!(
		classifier.classify("clubhouse gym pool amenity list", None),
		TableKind::Amenities
	);
	assert_eq!(
		classifier.classify("airport 12 km, metro nearby", None),
		TableKind::Location
	);
	assert_eq!(classifier.classify("vitrified flooring, cp fitting", None), TableKind::Specifications);
	assert_eq!(classifier.classify("completely unrelated prose", None), TableKind::Unknown);
}

#[test]
fn table_kind_round_trips_labels() {
	for kind in [
		TableKind::PaymentPlan,
		TableKind::UnitSpecifications,
		TableKind::Pricing,
		TableKind::Amenities,
		TableKind::Location,
		TableKind::Specifications,
		TableKind::Unknown,
	] {
		assert_eq!(TableKind::parse(kind.as_str()), kind);
	}
}

#[test]
fn intent_serializes_as_snake_case() {
	assert_eq!(serde_json::to_string(&Intent::Payment).expect("serialize failed"), "\"payment\"");
	assert_eq!(
		serde_json::from_str::<Intent>("\"amenities\"").expect("deserialize failed"),
		Intent::Amenities
	);
}

#[test]
fn desired_kind_follows_intent() {
	assert_eq!(desired_kind(Intent::Payment), Some(TableKind::PaymentPlan));
	assert_eq!(desired_kind(Intent::Amenities), Some(TableKind::Amenities));
	assert_eq!(desired_kind(Intent::Location), Some(TableKind::Location));
	assert_eq!(desired_kind(Intent::None), None);
}

#[test]
fn payment_schedule_detection_requires_grid_and_header() {
	let schedule = "Stage | Milestone | %\nBooking | Agreement | 10%\nFinish | Possession | 90%";
	let prose = "payment is due at every stage of construction";

	assert!(looks_like_payment_schedule(schedule));
	assert!(!looks_like_payment_schedule(prose));
}
