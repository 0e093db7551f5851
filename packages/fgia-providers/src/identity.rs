use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{Error, Result};
use fgia_config::IdentityProviderConfig;

/// Claims read from the provider's userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub email_verified: Option<bool>,
	#[serde(default)]
	pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
}

/// OAuth2 authorization-code client for Google-compatible endpoints.
pub struct IdentityClient {
	http: Client,
	cfg: IdentityProviderConfig,
}
impl IdentityClient {
	pub fn new(cfg: &IdentityProviderConfig) -> Result<Self> {
		if cfg.client_id.trim().is_empty() || cfg.client_secret.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: "Identity provider client_id and client_secret must be non-empty."
					.to_string(),
			});
		}

		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { http, cfg: cfg.clone() })
	}

	pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<String> {
		let scope = self.cfg.scopes.join(" ");
		let url = Url::parse_with_params(&self.cfg.authorize_url, [
			("response_type", "code"),
			("client_id", self.cfg.client_id.as_str()),
			("redirect_uri", redirect_uri),
			("scope", scope.as_str()),
			("state", state),
		])
		.map_err(|err| Error::InvalidConfig {
			message: format!("providers.identity.authorize_url is not a valid URL: {err}."),
		})?;

		Ok(url.into())
	}

	/// Exchanges the authorization code and reads the signed-in identity.
	pub async fn identify(&self, code: &str, redirect_uri: &str) -> Result<Identity> {
		let access_token = self.exchange_code(code, redirect_uri).await?;

		self.fetch_identity(&access_token).await
	}

	async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String> {
		let res = self
			.http
			.post(&self.cfg.token_url)
			.form(&[
				("grant_type", "authorization_code"),
				("code", code),
				("redirect_uri", redirect_uri),
				("client_id", self.cfg.client_id.as_str()),
				("client_secret", self.cfg.client_secret.as_str()),
			])
			.send()
			.await?;
		let status = res.status();
		let body = res.text().await?;

		if !status.is_success() {
			return Err(crate::provider_error(status, &body));
		}

		let token: TokenResponse = serde_json::from_str(&body)?;

		Ok(token.access_token)
	}

	async fn fetch_identity(&self, access_token: &str) -> Result<Identity> {
		let res = self.http.get(&self.cfg.userinfo_url).bearer_auth(access_token).send().await?;
		let status = res.status();
		let body = res.text().await?;

		if !status.is_success() {
			return Err(crate::provider_error(status, &body));
		}

		Ok(serde_json::from_str(&body)?)
	}
}
