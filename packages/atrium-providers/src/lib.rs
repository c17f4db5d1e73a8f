pub mod chat;
pub mod embedding;

mod error;
pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

fn auth_headers(api_key: &str) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))?;

	value.set_sensitive(true);
	headers.insert(AUTHORIZATION, value);

	Ok(headers)
}
