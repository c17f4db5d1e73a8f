use atrium_providers::chat::Message;

use crate::{
	Result, RetrievalService,
	result::{RetrievalResult, RetrieveRequest},
};

/// The exact refusal string callers render when no evidence supports an
/// answer. Kept verbatim so downstream layers can match on it.
pub const NOT_IN_DOCUMENTS: &str = "Not in the documents.";

const SYSTEM_PROMPT: &str = "\
You are a project-information assistant for real-estate brochures.
Use ONLY facts found in <context>. Formatting instructions (like bullets) do not need to appear in context.
If no relevant facts exist, reply exactly: 'Not in the documents.'
Use concise bullets when listing items. Do not provide opinions or financial advice.";

pub fn build_prompt(question: &str, evidence: &RetrievalResult) -> Vec<Message> {
	let context = evidence.answers.join("\n\n");

	vec![
		Message::system(SYSTEM_PROMPT),
		Message::user(format!("<context>\n{context}\n</context>\nQuestion: {question}\nAnswer:")),
	]
}

impl RetrievalService {
	/// Full question answering: retrieve evidence, then ground a model
	/// answer in it. An empty evidence set or an unconfigured chat provider
	/// short-circuits to the refusal string without a model call.
	pub async fn ask(&self, req: &RetrieveRequest) -> Result<String> {
		let evidence = self.retrieve(req).await?;

		if evidence.is_empty() {
			return Ok(NOT_IN_DOCUMENTS.to_string());
		}

		let Some(chat_cfg) = self.cfg.providers.chat.as_ref() else {
			return Ok(NOT_IN_DOCUMENTS.to_string());
		};
		let messages = build_prompt(req.query.trim(), &evidence);
		let answer = self.chat.complete(chat_cfg, &messages).await?;

		if answer.is_empty() {
			return Ok(NOT_IN_DOCUMENTS.to_string());
		}

		Ok(answer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::result::Mode;

	#[test]
	fn prompt_carries_context_and_question() {
		let evidence = RetrievalResult {
			answers: vec!["10% on booking".to_string(), "90% on possession".to_string()],
			..RetrievalResult::empty(Mode::Docs)
		};
		let messages = build_prompt("What is the payment plan?", &evidence);

		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].role, "system");
		assert!(messages[1].content.contains("10% on booking\n\n90% on possession"));
		assert!(messages[1].content.contains("Question: What is the payment plan?"));
	}
}
