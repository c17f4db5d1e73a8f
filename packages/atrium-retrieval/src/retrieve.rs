use std::time::Instant;

use atrium_domain::{
	Intent, PaymentPageRange, ProjectAlias, Provenance, mmr,
	normalize::normalize,
	query::{detect_project_filter, expand_query, intent_tag, keyword_terms, tokenize},
	score::score,
	tables::desired_kind,
};
use atrium_storage::models::ChunkHit;
use pgvector::Vector;
use tracing::{info, warn};

use crate::{
	Error, Result, RetrievalService, cache,
	result::{EvidenceKind, EvidenceMeta, Mode, RetrievalResult, RetrievalTrace, RetrieveRequest},
};

impl RetrievalService {
	/// Runs the strategies in priority order with threshold-gated early
	/// exit: facts, then tables, then dense documents, then the lexical
	/// fallback. Missing tables degrade to the next path; provider and
	/// connection failures are fatal.
	pub async fn retrieve(&self, req: &RetrieveRequest) -> Result<RetrievalResult> {
		let started = Instant::now();
		let raw_query = req.query.trim();

		if raw_query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must not be empty".into() });
		}

		let retrieval = &self.cfg.retrieval;
		let query = normalize(raw_query);
		let intent = intent_tag(&query);
		let terms = keyword_terms(raw_query);
		let k = req.k.unwrap_or(retrieval.top_k) as usize;
		let overfetch = req.overfetch.unwrap_or(if intent == Intent::Payment {
			retrieval.payment_overfetch
		} else {
			retrieval.overfetch
		}) as usize;
		let (project_id, project_label) = self.resolve_project(raw_query, req).await?;
		let include_facts = req.include_facts && retrieval.facts_enabled;
		let cache_key = cache::result_cache_key(
			&query,
			k,
			overfetch,
			project_label.as_deref(),
			include_facts,
			req.debug,
		);

		if retrieval.cache.enabled
			&& let Some(cached) = self.results.get(&cache_key)
		{
			info!(mode = cached.mode.as_str(), elapsed_ms = started.elapsed().as_millis() as u64, cached = true, "retrieve");

			return Ok(cached);
		}

		let trace = req.debug.then(|| RetrievalTrace {
			intent,
			keyword_terms: terms.clone(),
			expanded_queries: Vec::new(),
			project_filter: project_label.clone(),
		});
		let result = self
			.run_strategies(&query, intent, &terms, k, overfetch, project_id, include_facts, trace)
			.await?;

		if retrieval.cache.enabled {
			self.results.put(&cache_key, result.clone());
		}

		info!(
			mode = result.mode.as_str(),
			intent = intent.as_str(),
			hits = result.answers.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"retrieve"
		);

		Ok(result)
	}

	#[allow(clippy::too_many_arguments)]
	async fn run_strategies(
		&self,
		query: &str,
		intent: Intent,
		terms: &[String],
		k: usize,
		overfetch: usize,
		project_id: Option<i64>,
		include_facts: bool,
		trace: Option<RetrievalTrace>,
	) -> Result<RetrievalResult> {
		let retrieval = &self.cfg.retrieval;

		// Facts path. One authoritative curated answer ends the search.
		if include_facts {
			let vector = self.embed_query(query).await?;
			let facts = absorb(
				self.backend.search_facts(Vector::from(vector), project_id, 1).await,
				"facts",
			)?;

			if let Some(fact) = facts.first()
				&& fact.similarity >= retrieval.facts_threshold
			{
				return Ok(RetrievalResult {
					mode: Mode::Facts,
					answers: vec![fact.value.clone()],
					metas: vec![EvidenceMeta {
						kind: EvidenceKind::Fact,
						source: fact.source_page.clone(),
						page: None,
						project_id: Some(fact.project_id),
						section: Some(fact.key.clone()),
						tags: None,
					}],
					scores: vec![fact.similarity],
					trace,
				});
			}
		}

		// Tables path, pinned to the intent's table type when there is one.
		let table_type = desired_kind(intent);
		let vector = self.embed_query(query).await?;
		let tables = absorb(
			self.backend
				.search_tables(
					Vector::from(vector.clone()),
					project_id,
					table_type.map(|kind| kind.as_str()),
					2,
				)
				.await,
			"tables",
		)?;

		if tables.first().map(|hit| hit.similarity >= retrieval.tables_threshold).unwrap_or(false)
		{
			let mut answers = Vec::new();
			let mut metas = Vec::new();
			let mut scores = Vec::new();

			for hit in
				tables.iter().filter(|hit| hit.similarity >= retrieval.tables_threshold).take(2)
			{
				answers.push(hit.markdown_content.clone());
				metas.push(EvidenceMeta {
					kind: EvidenceKind::Table,
					source: Some(hit.source_path.clone()),
					page: hit.page,
					project_id: hit.project_id,
					section: Some(hit.table_type.clone()),
					tags: None,
				});
				scores.push(hit.similarity);
			}

			// One dense chunk of surrounding context, ranked below the tables.
			let context = absorb(
				self.backend.search_chunks(Vector::from(vector), project_id, 1).await,
				"doc_chunks",
			)?;

			if let Some(chunk) = context.into_iter().next() {
				answers.push(chunk.content);
				metas.push(EvidenceMeta {
					kind: EvidenceKind::Document,
					source: Some(chunk.source),
					page: chunk.page,
					project_id: chunk.project_id,
					section: chunk.section,
					tags: chunk.tags,
				});
				scores.push(scores.last().copied().unwrap_or(0.0).min(chunk.similarity));
			}

			return Ok(RetrievalResult { mode: Mode::Tables, answers, metas, scores, trace });
		}

		// Dense documents path with textual query expansion.
		let expansions = if retrieval.expansion_enabled {
			expand_query(query, intent)
		} else {
			vec![query.to_string()]
		};
		let mut pool: Vec<ChunkHit> = Vec::new();

		for expansion in &expansions {
			let vector = self.embed_query(expansion).await?;
			let hits = absorb(
				self.backend
					.search_chunks(Vector::from(vector), project_id, overfetch as i64)
					.await,
				"doc_chunks",
			)?;

			for hit in hits {
				if !pool.iter().any(|seen| seen.id == hit.id) {
					pool.push(hit);
				}
			}
		}

		if !pool.is_empty() {
			// Docs means expansion was off, not that no rewrite happened to fire.
			let mode =
				if retrieval.expansion_enabled { Mode::DocsExpanded } else { Mode::Docs };
			let trace = trace.map(|mut trace| {
				trace.expanded_queries = expansions.clone();

				trace
			});

			return Ok(self.diversified(pool, query, intent, k, mode, trace));
		}

		// Lexical fallback over OCR page text; no embeddings involved.
		let patterns: Vec<String> = terms.iter().map(|term| format!("%{term}%")).collect();
		let pages = absorb(
			self.backend.search_pages_ilike(&patterns, project_id, overfetch as i64).await,
			"ocr_pages",
		)?;

		if !pages.is_empty() {
			let lowered_terms: Vec<String> =
				terms.iter().map(|term| term.to_lowercase()).collect();
			let mut scored: Vec<(f32, _)> = pages
				.into_iter()
				.map(|hit| {
					let text = hit.ocr_text.to_lowercase();
					let matched =
						lowered_terms.iter().filter(|term| text.contains(term.as_str())).count();
					let fraction = matched as f32 / lowered_terms.len().max(1) as f32;

					(fraction, hit)
				})
				.collect();

			scored.sort_by(|a, b| b.0.total_cmp(&a.0));
			scored.truncate(k);

			let mut answers = Vec::new();
			let mut metas = Vec::new();
			let mut scores = Vec::new();

			for (fraction, hit) in scored {
				answers.push(hit.ocr_text);
				metas.push(EvidenceMeta {
					kind: EvidenceKind::Document,
					source: Some(hit.source),
					page: hit.page,
					project_id: hit.project_id,
					section: None,
					tags: None,
				});
				scores.push(fraction);
			}

			return Ok(RetrievalResult { mode: Mode::OcrIlike, answers, metas, scores, trace });
		}

		let pages = absorb(
			self.backend.search_pages_trgm(query, project_id, k as i64).await,
			"ocr_pages",
		)?;

		if !pages.is_empty() {
			let mut answers = Vec::new();
			let mut metas = Vec::new();
			let mut scores = Vec::new();

			for hit in pages {
				answers.push(hit.ocr_text);
				metas.push(EvidenceMeta {
					kind: EvidenceKind::Document,
					source: Some(hit.source),
					page: hit.page,
					project_id: hit.project_id,
					section: None,
					tags: None,
				});
				scores.push(hit.similarity);
			}

			return Ok(RetrievalResult { mode: Mode::OcrTrgm, answers, metas, scores, trace });
		}

		Ok(RetrievalResult { trace, ..RetrievalResult::empty(Mode::None) })
	}

	fn diversified(
		&self,
		pool: Vec<ChunkHit>,
		query: &str,
		intent: Intent,
		k: usize,
		mode: Mode,
		trace: Option<RetrievalTrace>,
	) -> RetrievalResult {
		let retrieval = &self.cfg.retrieval;
		let payment_pages = PaymentPageRange {
			min: retrieval.payment_pages.min,
			max: retrieval.payment_pages.max,
		};
		let query_tokens = tokenize(query);
		let relevance: Vec<f32> = pool
			.iter()
			.map(|chunk| {
				let provenance = Provenance {
					source: Some(chunk.source.as_str()),
					project: None,
					section: chunk.section.as_deref(),
					page: chunk.page,
				};

				score(&chunk.content, provenance, &query_tokens, intent, payment_pages)
			})
			.collect();
		let documents: Vec<String> = pool.iter().map(|chunk| chunk.content.clone()).collect();
		let selected = mmr::diversify(&documents, &relevance, retrieval.mmr_lambda, k);
		let mut answers = Vec::new();
		let mut metas = Vec::new();
		let mut scores = Vec::new();

		for index in selected {
			let chunk = &pool[index];

			answers.push(chunk.content.clone());
			metas.push(EvidenceMeta {
				kind: EvidenceKind::Document,
				source: Some(chunk.source.clone()),
				page: chunk.page,
				project_id: chunk.project_id,
				section: chunk.section.clone(),
				tags: chunk.tags.clone(),
			});
			scores.push(relevance[index]);
		}

		RetrievalResult { mode, answers, metas, scores, trace }
	}

	/// Project scoping: an explicit id wins outright, then an explicit or
	/// alias-detected name is resolved to an id. An unknown name still
	/// narrows the cache key but applies no id filter.
	async fn resolve_project(
		&self,
		raw_query: &str,
		req: &RetrieveRequest,
	) -> Result<(Option<i64>, Option<String>)> {
		if let Some(id) = req.project_id {
			return Ok((Some(id), Some(id.to_string())));
		}

		let rows = absorb(self.backend.project_aliases().await, "project_aliases")?;
		let aliases: Vec<ProjectAlias> = rows
			.into_iter()
			.map(|row| ProjectAlias { alias: row.alias, canonical: row.canonical })
			.collect();
		let Some(name) = detect_project_filter(raw_query, req.project_name.as_deref(), &aliases)
		else {
			return Ok((None, None));
		};
		let id = absorb(self.backend.project_id_by_name(&name).await, "projects")?;

		Ok((id, Some(name)))
	}

	/// Embeds one query text, via the LRU cache. A vector of the wrong
	/// dimensionality is a configuration error, never something to score
	/// against.
	async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
		if let Some(cached) = self.embedding_cache.get(text) {
			return Ok(cached);
		}

		let cfg = &self.cfg.providers.embedding;
		let texts = [text.to_string()];
		let mut vectors = self.embeddings.embed(cfg, &texts).await?;
		let vector = if vectors.is_empty() {
			return Err(Error::Provider { message: "embedding response was empty".into() });
		} else {
			vectors.swap_remove(0)
		};

		if vector.len() != cfg.dimensions as usize {
			return Err(Error::Provider {
				message: format!(
					"embedding dimension mismatch: got {}, configured {}",
					vector.len(),
					cfg.dimensions
				),
			});
		}

		self.embedding_cache.put(text, vector.clone());

		Ok(vector)
	}
}

/// Partial-data failures (missing table or column) degrade to an empty
/// result; anything else is a broken store and must fail the call.
fn absorb<T>(result: atrium_storage::Result<T>, what: &str) -> Result<T>
where
	T: Default,
{
	match result {
		Ok(value) => Ok(value),
		Err(err) if err.is_partial() => {
			warn!("{what} unavailable, skipping: {err}");

			Ok(T::default())
		},
		Err(err) => Err(Error::Storage { message: err.to_string() }),
	}
}
