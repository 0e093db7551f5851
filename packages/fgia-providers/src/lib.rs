pub mod completion;
pub mod identity;

mod error;

pub use completion::{CompletionClient, CompletionRequest};
pub use error::{Error, Result};
pub use identity::{Identity, IdentityClient};

use reqwest::{
	StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Prefers the OpenAI-style `error.message`, then OAuth's `error_description`, then the raw body.
pub(crate) fn provider_error(status: StatusCode, body: &str) -> Error {
	let parsed = serde_json::from_str::<Value>(body).ok();
	let from_json = parsed.as_ref().and_then(|json| {
		json.get("error")
			.and_then(|err| err.get("message"))
			.or_else(|| json.get("error_description"))
			.or_else(|| json.get("error"))
			.and_then(Value::as_str)
			.map(str::to_string)
	});
	let message = from_json.unwrap_or_else(|| {
		let trimmed = body.trim();

		if trimmed.is_empty() {
			status.canonical_reason().unwrap_or("Unknown provider error").to_string()
		} else {
			trimmed.to_string()
		}
	});

	Error::Provider { status: status.as_u16(), message }
}
