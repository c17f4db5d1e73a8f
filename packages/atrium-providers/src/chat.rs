use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// A chat turn in the OpenAI wire shape.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Message {
	pub role: &'static str,
	pub content: String,
}

impl Message {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: "system", content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: "user", content: content.into() }
	}
}

/// Calls an OpenAI-compatible chat completions endpoint and returns the first
/// choice's message content. Temperature comes from config so answer
/// generation stays deterministic when set to zero.
pub async fn complete(
	cfg: &atrium_config::ChatProviderConfig,
	messages: &[Message],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"messages": messages,
		"temperature": cfg.temperature,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_chat_response(json)
}

fn parse_chat_response(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(|content| content.as_str())
		.map(|content| content.trim().to_string())
		.ok_or_else(|| Error::invalid_response("chat response is missing message content"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "  10% on booking.  " } }
			]
		});

		assert_eq!(parse_chat_response(json).expect("parse failed"), "10% on booking.");
	}

	#[test]
	fn rejects_empty_choices() {
		let json = serde_json::json!({ "choices": [] });

		assert!(parse_chat_response(json).is_err());
	}
}
