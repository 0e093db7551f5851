use axum::{
	Json, Router,
	body::Bytes,
	extract::State,
	http::StatusCode,
	middleware,
	response::{Html, IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::{
	auth::{self, CALLBACK_PATH, LOGIN_PATH, SIGNOUT_PATH},
	gate::{self, Caller},
	pages,
	state::AppState,
};
use fgia_service::{ChatRequest, ResponsePayload};

pub const INTERNAL_ERROR_TEXT: &str =
	"Desculpe, ocorreu um erro interno. Tente novamente em alguns instantes.";

pub fn router(state: AppState) -> Router {
	let signin_path = state.policy.signin_path().to_string();
	let error_path = state.policy.error_path().to_string();

	Router::new()
		.route("/", get(index))
		.route("/health", get(health))
		.route("/api/chat", post(chat))
		.route(&signin_path, get(auth::signin_page))
		.route(&error_path, get(auth::error_page))
		.route(LOGIN_PATH, get(auth::google_login))
		.route(CALLBACK_PATH, get(auth::google_callback))
		.route(SIGNOUT_PATH, get(auth::signout).post(auth::signout))
		.layer(middleware::from_fn_with_state(state.clone(), gate::access_gate))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn index(caller: Caller) -> Html<String> {
	Html(pages::index(caller.email()))
}

async fn chat(
	State(state): State<AppState>,
	caller: Caller,
	body: Bytes,
) -> Result<Json<ResponsePayload>, ApiError> {
	// Parsed regardless of the declared content type.
	let request: ChatRequest = serde_json::from_slice(&body).map_err(|err| {
		tracing::error!(error = %err, "Chat request body could not be parsed.");

		ApiError::internal()
	})?;
	let response = state.assistant.chat(request, caller.email()).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	response: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	source: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	apology: bool,
}
impl ApiError {
	fn bad_request(message: impl Into<String>) -> Self {
		Self { status: StatusCode::BAD_REQUEST, error: message.into(), apology: false }
	}

	fn internal() -> Self {
		Self {
			status: StatusCode::INTERNAL_SERVER_ERROR,
			error: "Internal Server Error".to_string(),
			apology: true,
		}
	}
}

impl From<fgia_service::Error> for ApiError {
	fn from(err: fgia_service::Error) -> Self {
		match err {
			fgia_service::Error::InvalidRequest { message } => Self::bad_request(message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error: self.error,
			response: self.apology.then_some(INTERNAL_ERROR_TEXT),
			source: self.apology.then_some("error"),
		};

		(self.status, Json(body)).into_response()
	}
}
