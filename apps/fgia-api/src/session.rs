//! Session cookie carrying an HS256 JWT signed with `SESSION_SECRET`.

use axum::http::{HeaderMap, header::COOKIE};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use fgia_domain::UserRole;

pub const SESSION_COOKIE: &str = "fgia_session";
pub const STATE_COOKIE: &str = "fgia_oauth_state";

const STATE_COOKIE_MAX_AGE_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	pub email: String,
	#[serde(default)]
	pub name: Option<String>,
	pub role: UserRole,
	/// Unix seconds.
	pub exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
	encoding: EncodingKey,
	decoding: DecodingKey,
	ttl_secs: u64,
	secure: bool,
}
impl SessionKeys {
	pub fn new(secret: &str, ttl_secs: u64, secure: bool) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret.as_bytes()),
			decoding: DecodingKey::from_secret(secret.as_bytes()),
			ttl_secs,
			secure,
		}
	}

	pub fn from_config(auth: &fgia_config::Auth) -> Self {
		Self::new(&auth.session_secret, auth.session_ttl_secs, auth.cookie_secure)
	}

	pub fn issue(&self, email: &str, name: Option<String>, now: OffsetDateTime) -> Claims {
		let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);

		Claims {
			email: email.trim().to_string(),
			name,
			role: UserRole::from_email(email),
			exp: now.unix_timestamp().saturating_add(ttl),
		}
	}

	pub fn encode(&self, claims: &Claims) -> jsonwebtoken::errors::Result<String> {
		jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
	}

	/// Malformed, foreign, tampered, and expired tokens all decode to `None`.
	pub fn decode(&self, token: &str) -> Option<Claims> {
		let mut validation = Validation::new(Algorithm::HS256);

		validation.validate_exp = true;
		validation.leeway = 0;

		jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
			.ok()
			.map(|data| data.claims)
	}

	pub fn session_cookie(&self, token: &str) -> String {
		self.cookie(SESSION_COOKIE, token, "/", self.ttl_secs)
	}

	pub fn clear_session_cookie(&self) -> String {
		self.cookie(SESSION_COOKIE, "", "/", 0)
	}

	pub fn state_cookie(&self, state: &str) -> String {
		self.cookie(STATE_COOKIE, state, "/auth", STATE_COOKIE_MAX_AGE_SECS)
	}

	pub fn clear_state_cookie(&self) -> String {
		self.cookie(STATE_COOKIE, "", "/auth", 0)
	}

	fn cookie(&self, name: &str, value: &str, path: &str, max_age: u64) -> String {
		let secure = if self.secure { "; Secure" } else { "" };

		format!("{name}={value}; Path={path}; Max-Age={max_age}; HttpOnly; SameSite=Lax{secure}")
	}
}

pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|raw| raw.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(key, _)| *key == name)
		.map(|(_, value)| value)
		.filter(|value| !value.is_empty())
}
