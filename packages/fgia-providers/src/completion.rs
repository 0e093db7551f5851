use std::time::Duration;

use reqwest::{Client, header::HeaderMap};
use serde_json::Value;

use crate::{Error, Result};
use fgia_config::CompletionProviderConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
	pub system_prompt: String,
	pub user_message: String,
	pub max_tokens: u32,
	pub temperature: f64,
}

/// Chat-completion client. Built once from config and shared for the process lifetime.
pub struct CompletionClient {
	http: Client,
	url: String,
	model: String,
	headers: HeaderMap,
}
impl CompletionClient {
	pub fn new(cfg: &CompletionProviderConfig) -> Result<Self> {
		if cfg.api_key.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: "Completion provider api_key must be non-empty.".to_string(),
			});
		}

		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;

		Ok(Self {
			http,
			url: format!("{}{}", cfg.api_base, cfg.path),
			model: cfg.model.clone(),
			headers,
		})
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	/// Returns the first choice's text, or an empty string when the provider sent no content.
	pub async fn complete(&self, request: &CompletionRequest) -> Result<String> {
		let res = self
			.http
			.post(&self.url)
			.headers(self.headers.clone())
			.json(&request_body(&self.model, request))
			.send()
			.await?;
		let status = res.status();
		let body = res.text().await?;

		if !status.is_success() {
			return Err(crate::provider_error(status, &body));
		}

		let json: Value = serde_json::from_str(&body)?;

		parse_completion_response(json)
	}
}

fn request_body(model: &str, request: &CompletionRequest) -> Value {
	serde_json::json!({
		"model": model,
		"messages": [
			{ "role": "system", "content": request.system_prompt },
			{ "role": "user", "content": request.user_message },
		],
		"max_tokens": request.max_tokens,
		"temperature": request.temperature,
	})
}

fn parse_completion_response(json: Value) -> Result<String> {
	if !json.is_object() {
		return Err(Error::InvalidResponse {
			message: "Completion response must be a JSON object.".to_string(),
		});
	}

	let content = json
		.get("choices")
		.and_then(Value::as_array)
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(Value::as_str)
		.unwrap_or_default();

	Ok(content.to_string())
}
