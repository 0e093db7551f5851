//! OAuth2 sign-in against the configured identity provider.

use axum::{
	extract::{Query, State, rejection::QueryRejection},
	http::{HeaderMap, header::SET_COOKIE},
	response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	gate::Caller,
	pages,
	session::{self, STATE_COOKIE},
	state::AppState,
};
use fgia_providers::{Identity, IdentityClient};
use fgia_service::BoxFuture;

pub const LOGIN_PATH: &str = "/auth/google/login";
pub const CALLBACK_PATH: &str = "/auth/google/callback";
pub const SIGNOUT_PATH: &str = "/auth/signout";

pub trait IdentityProvider
where
	Self: Send + Sync,
{
	fn authorize_url(&self, redirect_uri: &str, state: &str) -> fgia_providers::Result<String>;

	fn identify<'a>(
		&'a self,
		code: &'a str,
		redirect_uri: &'a str,
	) -> BoxFuture<'a, fgia_providers::Result<Identity>>;
}

impl IdentityProvider for IdentityClient {
	fn authorize_url(&self, redirect_uri: &str, state: &str) -> fgia_providers::Result<String> {
		IdentityClient::authorize_url(self, redirect_uri, state)
	}

	fn identify<'a>(
		&'a self,
		code: &'a str,
		redirect_uri: &'a str,
	) -> BoxFuture<'a, fgia_providers::Result<Identity>> {
		Box::pin(IdentityClient::identify(self, code, redirect_uri))
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
	#[serde(default)]
	pub code: Option<String>,
	#[serde(default)]
	pub state: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
}

pub async fn signin_page(State(state): State<AppState>, caller: Caller) -> Response {
	if caller.email().is_some_and(|email| state.policy.email_allowed(email)) {
		return Redirect::to("/").into_response();
	}

	Html(pages::signin()).into_response()
}

pub async fn error_page(State(state): State<AppState>) -> Html<String> {
	Html(pages::access_denied(state.policy.allowed_email_suffix()))
}

pub async fn google_login(State(state): State<AppState>) -> Response {
	let csrf = Uuid::new_v4().simple().to_string();

	match state.identity.authorize_url(&state.callback_url(), &csrf) {
		Ok(url) => (
			AppendHeaders([(SET_COOKIE, state.sessions.state_cookie(&csrf))]),
			Redirect::temporary(&url),
		)
			.into_response(),
		Err(err) => {
			tracing::error!(error = %err, "Failed to build authorization URL.");

			Redirect::to(state.policy.error_path()).into_response()
		},
	}
}

pub async fn google_callback(
	State(state): State<AppState>,
	headers: HeaderMap,
	params: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
	let outcome = match params {
		Ok(Query(params)) => complete_sign_in(&state, &headers, params).await,
		Err(err) => Err(format!("callback query could not be parsed: {err}")),
	};

	match outcome {
		Ok(token) => (
			AppendHeaders([
				(SET_COOKIE, state.sessions.session_cookie(&token)),
				(SET_COOKIE, state.sessions.clear_state_cookie()),
			]),
			Redirect::to("/"),
		)
			.into_response(),
		Err(reason) => {
			tracing::warn!(%reason, "Sign-in denied.");

			(
				AppendHeaders([(SET_COOKIE, state.sessions.clear_state_cookie())]),
				Redirect::to(state.policy.error_path()),
			)
				.into_response()
		},
	}
}

pub async fn signout(State(state): State<AppState>, caller: Caller) -> Response {
	if let Some(email) = caller.email() {
		tracing::info!(%email, "Signed out.");
	}

	(
		AppendHeaders([(SET_COOKIE, state.sessions.clear_session_cookie())]),
		Redirect::to(state.policy.signin_path()),
	)
		.into_response()
}

/// Returns the encoded session token, or the reason sign-in was refused.
async fn complete_sign_in(
	state: &AppState,
	headers: &HeaderMap,
	params: CallbackParams,
) -> Result<String, String> {
	if let Some(error) = params.error {
		return Err(format!("provider returned error {error}"));
	}

	let (Some(code), Some(returned_state)) = (params.code, params.state) else {
		return Err("callback is missing code or state".to_string());
	};
	let expected_state = session::read_cookie(headers, STATE_COOKIE);

	if expected_state != Some(returned_state.as_str()) {
		return Err("state does not match the login request".to_string());
	}

	let identity = state
		.identity
		.identify(&code, &state.callback_url())
		.await
		.map_err(|err| format!("identity lookup failed: {err}"))?;

	if identity.email_verified == Some(false) {
		return Err("provider reports the email as unverified".to_string());
	}
	if !state.policy.allows_sign_in(identity.email.as_deref()) {
		return Err(format!(
			"email {} is outside the allowed domain",
			identity.email.as_deref().unwrap_or("<none>")
		));
	}

	let Some(email) = identity.email else {
		return Err("provider returned no email".to_string());
	};
	let session = state.sessions.issue(&email, identity.name, OffsetDateTime::now_utc());
	let token =
		state.sessions.encode(&session).map_err(|err| format!("session encoding failed: {err}"))?;

	tracing::info!(email = %session.email, role = session.role.as_str(), "Sign-in authorized.");

	Ok(token)
}
