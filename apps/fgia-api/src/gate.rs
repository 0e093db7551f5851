use std::convert::Infallible;

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{Request, request::Parts},
	middleware::Next,
	response::{IntoResponse, Redirect, Response},
};

use crate::{
	session::{self, Claims, SESSION_COOKIE},
	state::AppState,
};
use fgia_domain::GateDecision;

/// Runs before every route. Protected paths need a live session on the allowed domain.
pub async fn access_gate(
	State(state): State<AppState>,
	mut req: Request<Body>,
	next: Next,
) -> Response {
	let session = session::read_cookie(req.headers(), SESSION_COOKIE)
		.and_then(|token| state.sessions.decode(token));
	let decision =
		state.policy.decide(req.uri().path(), session.as_ref().map(|session| session.email.as_str()));

	match decision {
		GateDecision::Allow => {
			if let Some(session) = session {
				req.extensions_mut().insert(session);
			}

			next.run(req).await
		},
		GateDecision::Redirect(target) => {
			tracing::debug!(path = %req.uri().path(), %target, "Access gate redirected request.");

			Redirect::temporary(&target).into_response()
		},
	}
}

/// Session admitted by [`access_gate`], if any.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<Claims>);
impl Caller {
	pub fn email(&self) -> Option<&str> {
		self.0.as_ref().map(|session| session.email.as_str())
	}
}

impl<S> FromRequestParts<S> for Caller
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(Self(parts.extensions.get::<Claims>().cloned()))
	}
}
