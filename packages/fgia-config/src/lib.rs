mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Auth, CompletionProviderConfig, Config, IdentityProviderConfig, PathRule, Providers, Service,
};

use std::{env, fs, path::Path};

pub const ENV_COMPLETION_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_IDENTITY_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const ENV_IDENTITY_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";

/// Routes the HTTP app registers itself. Sign-in and error pages may not shadow them.
pub const RESERVED_PATHS: [&str; 6] =
	["/", "/health", "/api/chat", "/auth/google/login", "/auth/google/callback", "/auth/signout"];

const MIN_SESSION_SECRET_BYTES: usize = 32;

pub fn load(path: &Path) -> Result<Config> {
	load_with_env(path, |name| env::var(name).ok())
}

pub fn load_with_env<F>(path: &Path, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	resolve_secrets(&mut cfg, lookup)?;
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if !is_http_url(&cfg.service.public_url) {
		return Err(Error::Validation {
			message: "service.public_url must start with http:// or https://.".to_string(),
		});
	}

	let completion = &cfg.providers.completion;

	if !is_http_url(&completion.api_base) {
		return Err(Error::Validation {
			message: "providers.completion.api_base must start with http:// or https://."
				.to_string(),
		});
	}
	if !completion.path.starts_with('/') {
		return Err(Error::Validation {
			message: "providers.completion.path must start with '/'.".to_string(),
		});
	}
	if completion.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.completion.model must be non-empty.".to_string(),
		});
	}
	if completion.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "providers.completion.default_headers values must be strings.".to_string(),
		});
	}

	let identity = &cfg.providers.identity;

	for (label, url) in [
		("providers.identity.authorize_url", &identity.authorize_url),
		("providers.identity.token_url", &identity.token_url),
		("providers.identity.userinfo_url", &identity.userinfo_url),
	] {
		if !is_http_url(url) {
			return Err(Error::Validation {
				message: format!("{label} must start with http:// or https://."),
			});
		}
	}

	if identity.scopes.is_empty() {
		return Err(Error::Validation {
			message: "providers.identity.scopes must be non-empty.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.completion.timeout_ms", completion.timeout_ms),
		("providers.identity.timeout_ms", identity.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	validate_auth(&cfg.auth)
}

fn validate_auth(auth: &Auth) -> Result<()> {
	if !is_valid_email_suffix(&auth.allowed_email_suffix) {
		return Err(Error::Validation {
			message: "auth.allowed_email_suffix must look like @example.com.".to_string(),
		});
	}
	if auth.protected_paths.is_empty() {
		return Err(Error::Validation {
			message: "auth.protected_paths must be non-empty.".to_string(),
		});
	}

	for (label, path) in [("auth.signin_path", &auth.signin_path), ("auth.error_path", &auth.error_path)]
	{
		if !path.starts_with('/') {
			return Err(Error::Validation { message: format!("{label} must start with '/'.") });
		}
		if auth.protected_paths.iter().any(|rule| rule.matches(path)) {
			return Err(Error::Validation {
				message: format!("{label} must not be a protected path."),
			});
		}
		if RESERVED_PATHS.contains(&path.as_str()) {
			return Err(Error::Validation {
				message: format!("{label} must not reuse a built-in route ({path})."),
			});
		}
	}

	if auth.signin_path == auth.error_path {
		return Err(Error::Validation {
			message: "auth.signin_path and auth.error_path must differ.".to_string(),
		});
	}

	if auth.session_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "auth.session_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if auth.session_secret.len() < MIN_SESSION_SECRET_BYTES {
		return Err(Error::Validation {
			message: format!(
				"{ENV_SESSION_SECRET} must be at least {MIN_SESSION_SECRET_BYTES} bytes long."
			),
		});
	}

	Ok(())
}

fn resolve_secrets<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	let required = |name: &'static str| {
		lookup(name)
			.map(|value| value.trim().to_string())
			.filter(|value| !value.is_empty())
			.ok_or(Error::MissingSecret { name })
	};

	cfg.providers.completion.api_key = required(ENV_COMPLETION_API_KEY)?;
	cfg.providers.identity.client_id = required(ENV_IDENTITY_CLIENT_ID)?;
	cfg.providers.identity.client_secret = required(ENV_IDENTITY_CLIENT_SECRET)?;
	cfg.auth.session_secret = required(ENV_SESSION_SECRET)?;

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.public_url = cfg.service.public_url.trim().trim_end_matches('/').to_string();
	cfg.providers.completion.api_base =
		cfg.providers.completion.api_base.trim().trim_end_matches('/').to_string();
	cfg.auth.allowed_email_suffix = cfg.auth.allowed_email_suffix.trim().to_ascii_lowercase();
}

fn is_http_url(raw: &str) -> bool {
	raw.starts_with("http://") || raw.starts_with("https://")
}

fn is_valid_email_suffix(suffix: &str) -> bool {
	let Some(domain) = suffix.strip_prefix('@') else {
		return false;
	};

	domain.contains('.')
		&& !domain.starts_with('.')
		&& !domain.ends_with('.')
		&& domain.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
}
