use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use axum::{
	Router,
	body::{self, Body},
	http::{
		Request, Response, StatusCode,
		header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
	},
};
use time::{Duration, OffsetDateTime};
use tower::util::ServiceExt;

use fgia_api::{
	auth::IdentityProvider,
	routes::{self, INTERNAL_ERROR_TEXT},
	session::{SESSION_COOKIE, STATE_COOKIE, SessionKeys},
	state::AppState,
};
use fgia_providers::Identity;
use fgia_service::BoxFuture;
use fgia_testkit::{ScriptedCompletion, TEST_SESSION_SECRET, test_config};

const MEMBER: &str = "ana@agenciafg.com.br";
const OUTSIDER: &str = "x@other.com";

#[derive(Clone)]
struct FakeIdentity {
	email: Option<String>,
	lookups: Arc<AtomicUsize>,
}
impl FakeIdentity {
	fn returning(email: &str) -> Self {
		Self { email: Some(email.to_string()), lookups: Arc::new(AtomicUsize::new(0)) }
	}
}
impl IdentityProvider for FakeIdentity {
	fn authorize_url(&self, redirect_uri: &str, state: &str) -> fgia_providers::Result<String> {
		Ok(format!("https://accounts.example.test/auth?redirect_uri={redirect_uri}&state={state}"))
	}

	fn identify<'a>(
		&'a self,
		_code: &'a str,
		_redirect_uri: &'a str,
	) -> BoxFuture<'a, fgia_providers::Result<Identity>> {
		self.lookups.fetch_add(1, Ordering::SeqCst);

		let identity = Identity {
			email: self.email.clone(),
			email_verified: Some(true),
			name: Some("Ana".to_string()),
		};

		Box::pin(async move { Ok(identity) })
	}
}

fn app(completion: &ScriptedCompletion, identity: &FakeIdentity) -> Router {
	let state = AppState::with_providers(
		&test_config(),
		Arc::new(completion.clone()),
		Arc::new(identity.clone()),
	);

	routes::router(state)
}

fn default_app() -> Router {
	app(&ScriptedCompletion::replying("🔍 Resposta"), &FakeIdentity::returning(MEMBER))
}

fn session_cookie_with(secret: &str, email: &str, issued_at: OffsetDateTime) -> String {
	let keys = SessionKeys::new(secret, 3_600, false);
	let token = keys.encode(&keys.issue(email, None, issued_at)).expect("Failed to encode session.");

	format!("{SESSION_COOKIE}={token}")
}

fn session_cookie(email: &str) -> String {
	session_cookie_with(TEST_SESSION_SECRET, email, OffsetDateTime::now_utc())
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder().uri(uri);

	if let Some(cookie) = cookie {
		builder = builder.header(COOKIE, cookie);
	}

	builder.body(Body::empty()).expect("Failed to build request.")
}

fn post_chat(body: &str, cookie: Option<&str>) -> Request<Body> {
	post_chat_as(Some("application/json"), body, cookie)
}

fn post_chat_as(content_type: Option<&str>, body: &str, cookie: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder().method("POST").uri("/api/chat");

	if let Some(content_type) = content_type {
		builder = builder.header(CONTENT_TYPE, content_type);
	}
	if let Some(cookie) = cookie {
		builder = builder.header(COOKIE, cookie);
	}

	builder.body(Body::from(body.to_string())).expect("Failed to build request.")
}

fn location(response: &Response<Body>) -> &str {
	response
		.headers()
		.get(LOCATION)
		.and_then(|value| value.to_str().ok())
		.expect("Response has no Location header.")
}

fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
	response
		.headers()
		.get_all(SET_COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.find(|value| value.starts_with(&format!("{name}=")))
		.map(str::to_string)
}

async fn body_text(response: Response<Body>) -> String {
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	String::from_utf8(body.to_vec()).expect("Body is not UTF-8.")
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
	serde_json::from_str(&body_text(response).await).expect("Failed to parse response.")
}

#[tokio::test]
async fn health_ok_without_session() {
	let response = default_app().oneshot(get("/health", None)).await.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_page_redirects_to_signin_without_session() {
	let response = default_app().oneshot(get("/", None)).await.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(location(&response), "/auth/signin");
}

#[tokio::test]
async fn chat_without_session_never_reaches_the_model() {
	let completion = ScriptedCompletion::replying("unused");
	let app = app(&completion, &FakeIdentity::returning(MEMBER));
	let response = app
		.oneshot(post_chat(r#"{"message":"produto não aparece"}"#, None))
		.await
		.expect("Failed to call /api/chat.");

	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(location(&response), "/auth/signin");
	assert_eq!(completion.count(), 0);
}

#[tokio::test]
async fn outsider_session_redirects_to_error_page() {
	let cookie = session_cookie(OUTSIDER);
	let response = default_app()
		.oneshot(post_chat(r#"{"message":"oi"}"#, Some(&cookie)))
		.await
		.expect("Failed to call /api/chat.");

	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(location(&response), "/auth/error");
}

#[tokio::test]
async fn member_session_opens_the_chat_page() {
	let cookie = session_cookie(MEMBER);
	let response = default_app().oneshot(get("/", Some(&cookie))).await.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::OK);

	let html = body_text(response).await;

	assert!(html.contains("/api/chat"));
	assert!(html.contains(MEMBER));
}

#[tokio::test]
async fn session_with_suffix_in_other_case_is_allowed() {
	let cookie = session_cookie("Ana@AgenciaFG.com.br");
	let response = default_app().oneshot(get("/", Some(&cookie))).await.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_signed_with_another_secret_is_ignored() {
	let cookie = session_cookie_with(
		"some-other-session-secret-0123456789",
		MEMBER,
		OffsetDateTime::now_utc(),
	);
	let response = default_app().oneshot(get("/", Some(&cookie))).await.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(location(&response), "/auth/signin");
}

#[tokio::test]
async fn expired_session_is_ignored() {
	let cookie = session_cookie_with(
		TEST_SESSION_SECRET,
		MEMBER,
		OffsetDateTime::now_utc() - Duration::hours(2),
	);
	let response = default_app().oneshot(get("/", Some(&cookie))).await.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(location(&response), "/auth/signin");
}

#[tokio::test]
async fn chat_answers_known_topic_from_knowledge_table() {
	let completion = ScriptedCompletion::replying("🔍 Produto não aparece: passo a passo");
	let app = app(&completion, &FakeIdentity::returning(MEMBER));
	let cookie = session_cookie(MEMBER);
	let response = app
		.oneshot(post_chat(r#"{"message":"produto não aparece"}"#, Some(&cookie)))
		.await
		.expect("Failed to call /api/chat.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = body_json(response).await;

	assert_eq!(json["source"], "local_enriched");
	assert_eq!(json["category"], "Catálogo");
	assert_eq!(json["priority"], "high");
	assert_eq!(json["processing_time"], "fast(<1s)");
	assert_eq!(json["response"], "🔍 Produto não aparece: passo a passo");
	assert!(json["confidence"].as_f64().expect("Confidence is not a number.") > 0.7);
	assert!(!json["documentation"].as_array().expect("Documentation is not an array.").is_empty());
	assert_eq!(completion.count(), 1);
}

#[tokio::test]
async fn provider_failure_still_answers_with_200() {
	let completion = ScriptedCompletion::rejecting(500, "upstream exploded");
	let app = app(&completion, &FakeIdentity::returning(MEMBER));
	let cookie = session_cookie(MEMBER);
	let response = app
		.oneshot(post_chat(r#"{"message":"como criar uma promoção de natal?"}"#, Some(&cookie)))
		.await
		.expect("Failed to call /api/chat.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = body_json(response).await;

	assert_eq!(json["source"], "error");
	assert_eq!(json["confidence"], 0.0);
	assert_eq!(json["category"], "System");
}

#[tokio::test]
async fn chat_accepts_json_body_without_json_content_type() {
	let cookie = session_cookie(MEMBER);

	for content_type in [None, Some("text/plain;charset=UTF-8")] {
		let response = default_app()
			.oneshot(post_chat_as(content_type, r#"{"message":"produto não aparece"}"#, Some(&cookie)))
			.await
			.expect("Failed to call /api/chat.");

		assert_eq!(response.status(), StatusCode::OK, "content type: {content_type:?}");

		let json = body_json(response).await;

		assert_eq!(json["source"], "local_enriched");
		assert_eq!(json["category"], "Catálogo");
	}
}

#[tokio::test]
async fn chat_without_message_is_bad_request() {
	let cookie = session_cookie(MEMBER);

	for body in [r#"{}"#, r#"{"message":""}"#] {
		let response = default_app()
			.oneshot(post_chat(body, Some(&cookie)))
			.await
			.expect("Failed to call /api/chat.");

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let json = body_json(response).await;

		assert_eq!(json["error"], "Message is required");
		assert!(json.get("source").is_none());
	}
}

#[tokio::test]
async fn malformed_body_returns_apology_with_500() {
	let cookie = session_cookie(MEMBER);
	let response = default_app()
		.oneshot(post_chat("{not json", Some(&cookie)))
		.await
		.expect("Failed to call /api/chat.");

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let json = body_json(response).await;

	assert_eq!(json["error"], "Internal Server Error");
	assert_eq!(json["response"], INTERNAL_ERROR_TEXT);
	assert_eq!(json["source"], "error");
}

#[tokio::test]
async fn signin_and_error_pages_are_public() {
	let signin = default_app().oneshot(get("/auth/signin", None)).await.expect("Failed to call signin.");

	assert_eq!(signin.status(), StatusCode::OK);
	assert!(body_text(signin).await.contains("/auth/google/login"));

	let error = default_app().oneshot(get("/auth/error", None)).await.expect("Failed to call error.");

	assert_eq!(error.status(), StatusCode::OK);
	assert!(body_text(error).await.contains("@agenciafg.com.br"));
}

#[tokio::test]
async fn signin_page_sends_members_home() {
	let cookie = session_cookie(MEMBER);
	let response =
		default_app().oneshot(get("/auth/signin", Some(&cookie))).await.expect("Failed to call signin.");

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn login_redirects_to_provider_with_state_cookie() {
	let response = default_app()
		.oneshot(get("/auth/google/login", None))
		.await
		.expect("Failed to call login.");

	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

	let target = location(&response).to_string();
	let cookie = set_cookie(&response, STATE_COOKIE).expect("State cookie not set.");
	let state = cookie
		.split(';')
		.next()
		.and_then(|pair| pair.split_once('='))
		.map(|(_, value)| value.to_string())
		.expect("State cookie has no value.");

	assert!(!state.is_empty());
	assert!(cookie.contains("HttpOnly"));
	assert!(target.starts_with("https://accounts.example.test/auth"));
	assert!(target.contains("http://localhost:3000/auth/google/callback"));
	assert!(target.ends_with(&format!("state={state}")));
}

#[tokio::test]
async fn callback_issues_session_for_member() {
	let identity = FakeIdentity::returning(MEMBER);
	let app = app(&ScriptedCompletion::replying("ok"), &identity);
	let response = app
		.clone()
		.oneshot(get(
			"/auth/google/callback?code=good-code&state=abc123",
			Some(&format!("{STATE_COOKIE}=abc123")),
		))
		.await
		.expect("Failed to call callback.");

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/");
	assert_eq!(identity.lookups.load(Ordering::SeqCst), 1);

	let issued = set_cookie(&response, SESSION_COOKIE).expect("Session cookie not set.");

	assert!(issued.contains("HttpOnly"));
	assert!(issued.contains("SameSite=Lax"));
	assert!(issued.contains("Path=/;"));

	let pair = issued.split(';').next().expect("Cookie has a name=value pair.").to_string();
	let response = app.oneshot(get("/", Some(&pair))).await.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn callback_with_mismatched_state_is_denied() {
	let identity = FakeIdentity::returning(MEMBER);
	let app = app(&ScriptedCompletion::replying("ok"), &identity);
	let response = app
		.oneshot(get(
			"/auth/google/callback?code=good-code&state=forged",
			Some(&format!("{STATE_COOKIE}=abc123")),
		))
		.await
		.expect("Failed to call callback.");

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/auth/error");
	assert!(set_cookie(&response, SESSION_COOKIE).is_none());
	assert_eq!(identity.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn callback_for_outsider_sets_no_session() {
	let identity = FakeIdentity::returning(OUTSIDER);
	let app = app(&ScriptedCompletion::replying("ok"), &identity);
	let response = app
		.oneshot(get(
			"/auth/google/callback?code=good-code&state=abc123",
			Some(&format!("{STATE_COOKIE}=abc123")),
		))
		.await
		.expect("Failed to call callback.");

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/auth/error");
	assert!(set_cookie(&response, SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn callback_with_malformed_query_redirects_to_error_page() {
	let identity = FakeIdentity::returning(MEMBER);
	let app = app(&ScriptedCompletion::replying("ok"), &identity);
	let response = app
		.oneshot(get(
			"/auth/google/callback?code=a&code=b&state=abc123",
			Some(&format!("{STATE_COOKIE}=abc123")),
		))
		.await
		.expect("Failed to call callback.");

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/auth/error");
	assert!(set_cookie(&response, SESSION_COOKIE).is_none());
	assert_eq!(identity.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn signout_clears_session_cookie() {
	let cookie = session_cookie(MEMBER);
	let response =
		default_app().oneshot(get("/auth/signout", Some(&cookie))).await.expect("Failed to sign out.");

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/auth/signin");

	let cleared = set_cookie(&response, SESSION_COOKIE).expect("Session cookie not cleared.");

	assert!(cleared.starts_with(&format!("{SESSION_COOKIE}=;")));
	assert!(cleared.contains("Max-Age=0"));
}
