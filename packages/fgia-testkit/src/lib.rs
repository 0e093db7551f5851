use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::Map;

use fgia_config::{
	Auth, CompletionProviderConfig, Config, IdentityProviderConfig, PathRule, Providers, Service,
};
use fgia_providers::{CompletionRequest, Error};
use fgia_service::{BoxFuture, CompletionProvider};

pub const TEST_SESSION_SECRET: &str = "test-session-secret-0123456789abcdef";
pub const TEST_EMAIL_SUFFIX: &str = "@agenciafg.com.br";

#[derive(Debug, Clone)]
enum Outcome {
	Reply(String),
	NetworkFailure(String),
	ProviderFailure { status: u16, message: String },
}

/// Completion fake with a fixed outcome. Counts calls and keeps every request it saw.
#[derive(Clone)]
pub struct ScriptedCompletion {
	outcome: Outcome,
	calls: Arc<AtomicUsize>,
	requests: Arc<Mutex<Vec<CompletionRequest>>>,
}
impl ScriptedCompletion {
	pub fn replying(text: impl Into<String>) -> Self {
		Self::with_outcome(Outcome::Reply(text.into()))
	}

	pub fn failing(message: impl Into<String>) -> Self {
		Self::with_outcome(Outcome::NetworkFailure(message.into()))
	}

	pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
		Self::with_outcome(Outcome::ProviderFailure { status, message: message.into() })
	}

	fn with_outcome(outcome: Outcome) -> Self {
		Self { outcome, calls: Arc::new(AtomicUsize::new(0)), requests: Arc::new(Mutex::new(Vec::new())) }
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn requests(&self) -> Vec<CompletionRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl CompletionProvider for ScriptedCompletion {
	fn complete<'a>(
		&'a self,
		request: &'a CompletionRequest,
	) -> BoxFuture<'a, fgia_providers::Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(request.clone());

		let result = match &self.outcome {
			Outcome::Reply(text) => Ok(text.clone()),
			Outcome::NetworkFailure(message) => Err(Error::Network { message: message.clone() }),
			Outcome::ProviderFailure { status, message } =>
				Err(Error::Provider { status: *status, message: message.clone() }),
		};

		Box::pin(async move { result })
	}
}

/// Complete config with secrets filled in and providers pointing at an unroutable address.
pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			public_url: "http://localhost:3000".to_string(),
		},
		providers: Providers {
			completion: CompletionProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "gpt-4o-mini".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
				api_key: "sk-test".to_string(),
			},
			identity: IdentityProviderConfig {
				provider_id: "test".to_string(),
				authorize_url: "http://127.0.0.1:1/o/oauth2/v2/auth".to_string(),
				token_url: "http://127.0.0.1:1/token".to_string(),
				userinfo_url: "http://127.0.0.1:1/userinfo".to_string(),
				scopes: vec!["openid".to_string(), "email".to_string(), "profile".to_string()],
				timeout_ms: 1_000,
				client_id: "client-id".to_string(),
				client_secret: "client-secret".to_string(),
			},
		},
		auth: Auth {
			allowed_email_suffix: TEST_EMAIL_SUFFIX.to_string(),
			protected_paths: vec![
				PathRule::Exact("/".to_string()),
				PathRule::Prefix("/api/chat".to_string()),
			],
			signin_path: "/auth/signin".to_string(),
			error_path: "/auth/error".to_string(),
			session_ttl_secs: 3_600,
			cookie_secure: false,
			session_secret: TEST_SESSION_SECRET.to_string(),
		},
	}
}
