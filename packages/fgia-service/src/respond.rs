use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Assistant, Error, Result, prompts};
use fgia_domain::{KnowledgeEntry, MatchResult, Priority};
use fgia_providers::CompletionRequest;

/// Matches strictly above this confidence are answered from the knowledge table.
pub const ENRICH_THRESHOLD: f64 = 0.7;
pub const ENRICH_MAX_TOKENS: u32 = 400;
pub const GENERAL_MAX_TOKENS: u32 = 600;
pub const TEMPERATURE: f64 = 0.3;
pub const AI_CONFIDENCE: f64 = 0.8;
pub const GENERAL_DOCUMENTATION: [&str; 2] = ["https://developers.vtex.com", "https://help.vtex.com/pt"];
pub const GENERAL_CATEGORY: &str = "General";
pub const SYSTEM_CATEGORY: &str = "System";

const LOGGED_QUERY_CHARS: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
	#[serde(default)]
	pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
	LocalEnriched,
	AiGenerated,
	#[serde(rename = "error")]
	ErrorFallback,
}
impl ResponseSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::LocalEnriched => "local_enriched",
			Self::AiGenerated => "ai_generated",
			Self::ErrorFallback => "error",
		}
	}
}

/// Descriptive tag for the answer path. Not a measured latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyClass {
	Fast,
	Ai,
	Error,
}
impl LatencyClass {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Fast => "fast(<1s)",
			Self::Ai => "ai(2-5s)",
			Self::Error => "error",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
	#[serde(rename = "response")]
	pub text: String,
	pub source: ResponseSource,
	pub confidence: f64,
	pub category: String,
	pub priority: Priority,
	pub documentation: Vec<String>,
	pub processing_time: String,
}
impl ResponsePayload {
	fn from_entry(entry: &KnowledgeEntry, text: String, confidence: f64) -> Self {
		Self {
			text,
			source: ResponseSource::LocalEnriched,
			confidence,
			category: entry.category.to_string(),
			priority: entry.priority,
			documentation: entry.documentation.iter().map(|link| link.to_string()).collect(),
			processing_time: LatencyClass::Fast.as_str().to_string(),
		}
	}

	fn general(text: String) -> Self {
		Self {
			text,
			source: ResponseSource::AiGenerated,
			confidence: AI_CONFIDENCE,
			category: GENERAL_CATEGORY.to_string(),
			priority: Priority::Medium,
			documentation: general_documentation(),
			processing_time: LatencyClass::Ai.as_str().to_string(),
		}
	}

	fn error_fallback(error: &str) -> Self {
		Self {
			text: prompts::error_fallback_text(error),
			source: ResponseSource::ErrorFallback,
			confidence: 0.0,
			category: SYSTEM_CATEGORY.to_string(),
			priority: Priority::Low,
			documentation: general_documentation(),
			processing_time: LatencyClass::Error.as_str().to_string(),
		}
	}
}

impl Assistant {
	/// Validates the inbound message, then answers it.
	pub async fn chat(&self, request: ChatRequest, caller: Option<&str>) -> Result<ResponsePayload> {
		let message = request
			.message
			.filter(|message| !message.trim().is_empty())
			.ok_or_else(|| Error::InvalidRequest { message: "Message is required".to_string() })?;

		Ok(self.respond(&message, caller).await)
	}

	/// Never fails: completion errors degrade to the canned answer or the error payload.
	pub async fn respond(&self, query: &str, caller: Option<&str>) -> ResponsePayload {
		let payload = match fgia_domain::find_match(&self.knowledge, query) {
			Some(hit) if hit.confidence > ENRICH_THRESHOLD => self.enriched(query, hit).await,
			_ => self.general(query).await,
		};

		log_query(query, &payload, caller);

		payload
	}

	async fn enriched(&self, query: &str, hit: MatchResult<'_>) -> ResponsePayload {
		let request = CompletionRequest {
			system_prompt: prompts::enrichment_system_prompt(hit.entry.response),
			user_message: query.to_string(),
			max_tokens: ENRICH_MAX_TOKENS,
			temperature: TEMPERATURE,
		};
		let text = match self.completion.complete(&request).await {
			Ok(text) if !text.trim().is_empty() => text,
			Ok(_) => {
				tracing::warn!(key = hit.entry.key, "Enrichment returned no content; using canned response.");

				hit.entry.response.to_string()
			},
			Err(err) => {
				tracing::warn!(key = hit.entry.key, error = %err, "Enrichment failed; using canned response.");

				hit.entry.response.to_string()
			},
		};

		ResponsePayload::from_entry(hit.entry, text, hit.confidence)
	}

	async fn general(&self, query: &str) -> ResponsePayload {
		let request = CompletionRequest {
			system_prompt: prompts::GENERAL_SYSTEM_PROMPT.to_string(),
			user_message: query.to_string(),
			max_tokens: GENERAL_MAX_TOKENS,
			temperature: TEMPERATURE,
		};

		match self.completion.complete(&request).await {
			Ok(text) if text.trim().is_empty() =>
				ResponsePayload::general(prompts::EMPTY_COMPLETION_TEXT.to_string()),
			Ok(text) => ResponsePayload::general(text),
			Err(err) => {
				tracing::warn!(error = %err, "Completion failed; returning error payload.");

				ResponsePayload::error_fallback(&err.to_string())
			},
		}
	}
}

fn general_documentation() -> Vec<String> {
	GENERAL_DOCUMENTATION.iter().map(|link| link.to_string()).collect()
}

fn log_query(query: &str, payload: &ResponsePayload, caller: Option<&str>) {
	let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();

	tracing::info!(
		target: "fgia::query",
		%timestamp,
		query = %truncate_chars(query, LOGGED_QUERY_CHARS),
		source = payload.source.as_str(),
		confidence = payload.confidence,
		category = %payload.category,
		user = caller.unwrap_or("anonymous"),
		"Assistant query answered."
	);
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((end, _)) => &text[..end],
		None => text,
	}
}
