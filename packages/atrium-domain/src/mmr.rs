use std::collections::HashSet;

/// Greedy Maximal-Marginal-Relevance selection over an overfetched pool.
///
/// `relevance` holds the precomputed `score::score` value per document.
/// Returns the indices of the selected documents in selection order; the
/// first index is always the single highest-relevance candidate. Higher
/// `lambda` biases toward pure relevance, lower toward diversity.
pub fn diversify(documents: &[String], relevance: &[f32], lambda: f32, top_k: usize) -> Vec<usize> {
	if documents.is_empty() || relevance.len() != documents.len() || top_k == 0 {
		return Vec::new();
	}

	let lowered: Vec<String> = documents.iter().map(|doc| doc.to_lowercase()).collect();
	let token_sets: Vec<HashSet<&str>> =
		lowered.iter().map(|doc| doc.split_whitespace().collect()).collect();
	let mut remaining: Vec<usize> = (0..documents.len()).collect();
	let mut selected = Vec::with_capacity(top_k.min(documents.len()));

	while !remaining.is_empty() && selected.len() < top_k {
		let mut best_pos = 0;
		let mut best_score = f32::NEG_INFINITY;

		for (pos, &index) in remaining.iter().enumerate() {
			let redundancy = selected
				.iter()
				.map(|&chosen| token_overlap(&token_sets[index], &token_sets[chosen]))
				.fold(0.0_f32, f32::max);
			let mmr = lambda * relevance[index] - (1.0 - lambda) * redundancy;

			if mmr > best_score {
				best_pos = pos;
				best_score = mmr;
			}
		}

		selected.push(remaining.swap_remove(best_pos));
	}

	selected
}

/// Jaccard-like overlap: shared tokens over the smaller set, so a short
/// chunk fully contained in a longer one counts as fully redundant.
fn token_overlap(lhs: &HashSet<&str>, rhs: &HashSet<&str>) -> f32 {
	let smaller = lhs.len().min(rhs.len()).max(1);
	let shared = lhs.intersection(rhs).count();

	shared as f32 / smaller as f32
}
