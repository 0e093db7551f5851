use std::sync::Arc;

use fgia_config::Config;
use fgia_domain::AccessPolicy;
use fgia_providers::{CompletionClient, IdentityClient};
use fgia_service::{Assistant, CompletionProvider};

use crate::{auth::IdentityProvider, session::SessionKeys};

#[derive(Clone)]
pub struct AppState {
	pub assistant: Arc<Assistant>,
	pub identity: Arc<dyn IdentityProvider>,
	pub policy: Arc<AccessPolicy>,
	pub sessions: SessionKeys,
	/// Absolute origin used to build the OAuth redirect URI. No trailing slash.
	pub public_url: String,
}
impl AppState {
	pub fn new(config: &Config) -> color_eyre::Result<Self> {
		let completion = CompletionClient::new(&config.providers.completion)?;
		let identity = IdentityClient::new(&config.providers.identity)?;

		tracing::info!(
			model = completion.model(),
			identity_provider = %config.providers.identity.provider_id,
			"Providers initialized."
		);

		Ok(Self::with_providers(config, Arc::new(completion), Arc::new(identity)))
	}

	pub fn with_providers(
		config: &Config,
		completion: Arc<dyn CompletionProvider>,
		identity: Arc<dyn IdentityProvider>,
	) -> Self {
		Self {
			assistant: Arc::new(Assistant::new(completion)),
			identity,
			policy: Arc::new(AccessPolicy::from_config(&config.auth)),
			sessions: SessionKeys::from_config(&config.auth),
			public_url: config.service.public_url.clone(),
		}
	}

	pub fn callback_url(&self) -> String {
		format!("{}{}", self.public_url, crate::auth::CALLBACK_PATH)
	}
}
