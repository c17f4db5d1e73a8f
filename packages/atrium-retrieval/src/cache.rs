use std::{
	collections::{HashMap, VecDeque},
	sync::Mutex,
	time::{Duration, Instant},
};

use crate::result::RetrievalResult;

/// LRU cache for query embeddings. The external embedding function is
/// deterministic per model version, so identical texts can safely share a
/// vector for the process lifetime.
pub struct EmbeddingCache {
	inner: Mutex<EmbeddingCacheInner>,
	capacity: usize,
}

struct EmbeddingCacheInner {
	map: HashMap<String, Vec<f32>>,
	order: VecDeque<String>,
}

impl EmbeddingCache {
	pub fn new(capacity: usize) -> Self {
		Self {
			inner: Mutex::new(EmbeddingCacheInner {
				map: HashMap::new(),
				order: VecDeque::new(),
			}),
			capacity,
		}
	}

	pub fn get(&self, text: &str) -> Option<Vec<f32>> {
		let mut inner = self.inner.lock().expect("embedding cache poisoned");
		let hit = inner.map.get(text).cloned();

		if hit.is_some()
			&& let Some(pos) = inner.order.iter().position(|key| key == text)
		{
			let key = inner.order.remove(pos).expect("position just found");

			inner.order.push_back(key);
		}

		hit
	}

	pub fn put(&self, text: &str, vector: Vec<f32>) {
		if self.capacity == 0 {
			return;
		}

		let mut inner = self.inner.lock().expect("embedding cache poisoned");

		if inner.map.contains_key(text) {
			inner.map.insert(text.to_string(), vector);

			return;
		}
		while inner.map.len() >= self.capacity {
			let Some(evicted) = inner.order.pop_front() else {
				break;
			};

			inner.map.remove(&evicted);
		}

		inner.map.insert(text.to_string(), vector);
		inner.order.push_back(text.to_string());
	}
}

/// Bounded, time-expiring cache of full retrieval results. Purely a
/// performance layer; dropping it changes latency, never answers.
pub struct ResultCache {
	inner: Mutex<ResultCacheInner>,
	capacity: usize,
	ttl: Duration,
}

struct ResultCacheInner {
	map: HashMap<String, (Instant, RetrievalResult)>,
	order: VecDeque<String>,
}

impl ResultCache {
	pub fn new(capacity: usize, ttl: Duration) -> Self {
		Self {
			inner: Mutex::new(ResultCacheInner { map: HashMap::new(), order: VecDeque::new() }),
			capacity,
			ttl,
		}
	}

	pub fn get(&self, key: &str) -> Option<RetrievalResult> {
		let mut inner = self.inner.lock().expect("result cache poisoned");

		match inner.map.get(key) {
			Some((stored_at, result)) if stored_at.elapsed() < self.ttl => Some(result.clone()),
			Some(_) => {
				inner.map.remove(key);
				inner.order.retain(|entry| entry != key);

				None
			},
			None => None,
		}
	}

	pub fn put(&self, key: &str, result: RetrievalResult) {
		if self.capacity == 0 {
			return;
		}

		let mut inner = self.inner.lock().expect("result cache poisoned");

		if !inner.map.contains_key(key) {
			while inner.map.len() >= self.capacity {
				let Some(evicted) = inner.order.pop_front() else {
					break;
				};

				inner.map.remove(&evicted);
			}

			inner.order.push_back(key.to_string());
		}

		inner.map.insert(key.to_string(), (Instant::now(), result));
	}
}

/// Cache key over the full parameter tuple. Hashed so project names and long
/// queries don't blow up key sizes; the trailing flags keep facts-gated and
/// traced variants of the same query apart.
pub fn result_cache_key(
	normalized_query: &str,
	k: usize,
	overfetch: usize,
	project_filter: Option<&str>,
	include_facts: bool,
	debug: bool,
) -> String {
	let mut hasher = blake3::Hasher::new();

	hasher.update(normalized_query.as_bytes());
	hasher.update(&[0]);
	hasher.update(&(k as u64).to_le_bytes());
	hasher.update(&(overfetch as u64).to_le_bytes());
	hasher.update(&[0]);
	hasher.update(project_filter.unwrap_or_default().as_bytes());
	hasher.update(&[u8::from(include_facts), u8::from(debug)]);

	hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::result::Mode;

	#[test]
	fn embedding_cache_evicts_least_recently_used() {
		let cache = EmbeddingCache::new(2);

		cache.put("a", vec![1.0]);
		cache.put("b", vec![2.0]);
		// Touch "a" so "b" becomes the eviction candidate.
		cache.get("a");
		cache.put("c", vec![3.0]);

		assert!(cache.get("a").is_some());
		assert!(cache.get("b").is_none());
		assert!(cache.get("c").is_some());
	}

	#[test]
	fn result_cache_expires_entries() {
		let cache = ResultCache::new(4, Duration::ZERO);

		cache.put("key", RetrievalResult::empty(Mode::None));

		assert!(cache.get("key").is_none());
	}

	#[test]
	fn result_cache_evicts_oldest_at_capacity() {
		let cache = ResultCache::new(1, Duration::from_secs(60));

		cache.put("first", RetrievalResult::empty(Mode::None));
		cache.put("second", RetrievalResult::empty(Mode::None));

		assert!(cache.get("first").is_none());
		assert!(cache.get("second").is_some());
	}

	#[test]
	fn cache_key_distinguishes_every_parameter() {
		let base = result_cache_key("q", 3, 48, None, true, false);

		assert_ne!(base, result_cache_key("q2", 3, 48, None, true, false));
		assert_ne!(base, result_cache_key("q", 4, 48, None, true, false));
		assert_ne!(base, result_cache_key("q", 3, 96, None, true, false));
		assert_ne!(base, result_cache_key("q", 3, 48, Some("Aravalli Heights"), true, false));
		assert_ne!(base, result_cache_key("q", 3, 48, None, false, false));
		assert_ne!(base, result_cache_key("q", 3, 48, None, true, true));
		assert_eq!(base, result_cache_key("q", 3, 48, None, true, false));
	}
}
