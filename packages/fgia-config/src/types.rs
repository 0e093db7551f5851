use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub auth: Auth,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Externally visible origin, used to build the OAuth redirect URI.
	pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub completion: CompletionProviderConfig,
	pub identity: IdentityProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	/// Resolved from `OPENAI_API_KEY`.
	#[serde(skip)]
	pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityProviderConfig {
	pub provider_id: String,
	pub authorize_url: String,
	pub token_url: String,
	pub userinfo_url: String,
	pub scopes: Vec<String>,
	pub timeout_ms: u64,
	/// Resolved from `GOOGLE_CLIENT_ID`.
	#[serde(skip)]
	pub client_id: String,
	/// Resolved from `GOOGLE_CLIENT_SECRET`.
	#[serde(skip)]
	pub client_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
	pub allowed_email_suffix: String,
	/// Exact paths, or prefixes when the entry ends with `*`.
	pub protected_paths: Vec<PathRule>,
	#[serde(default = "default_signin_path")]
	pub signin_path: String,
	#[serde(default = "default_error_path")]
	pub error_path: String,
	#[serde(default = "default_session_ttl_secs")]
	pub session_ttl_secs: u64,
	#[serde(default)]
	pub cookie_secure: bool,
	/// Resolved from `SESSION_SECRET`.
	#[serde(skip)]
	pub session_secret: String,
}

fn default_signin_path() -> String {
	"/auth/signin".to_string()
}

fn default_error_path() -> String {
	"/auth/error".to_string()
}

fn default_session_ttl_secs() -> u64 {
	30 * 24 * 60 * 60
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum PathRule {
	Exact(String),
	Prefix(String),
}
impl PathRule {
	pub fn matches(&self, path: &str) -> bool {
		match self {
			Self::Exact(exact) => path == exact,
			Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
		}
	}
}
impl TryFrom<String> for PathRule {
	type Error = String;

	fn try_from(raw: String) -> Result<Self, Self::Error> {
		let trimmed = raw.trim();

		if !trimmed.starts_with('/') {
			return Err(format!("Protected path {trimmed:?} must start with '/'."));
		}

		match trimmed.strip_suffix('*') {
			Some(prefix) => Ok(Self::Prefix(prefix.to_string())),
			None => Ok(Self::Exact(trimmed.to_string())),
		}
	}
}
