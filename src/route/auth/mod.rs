use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use tower_governor::GovernorLayer;

use crate::{error, ratelimit, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password hashing error: {0}")]
	Argon(#[from] argon2::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

/// The authentication routes. `limit` only applies to `POST /auth`,
/// since it is the only route that hashes passwords.
pub fn routes(limit: Option<ratelimit::Config>) -> ApiRouter<AppState> {
	use route::*;

	let mut credentials =
		ApiRouter::new().api_route("/auth", post_with(authenticate, authenticate_docs));

	if let Some(config) = limit {
		credentials = credentials.layer(GovernorLayer { config });
	}

	ApiRouter::new()
		.merge(credentials)
		.api_route("/auth/me", get_with(get_me, get_me_docs))
		.api_route("/auth/logout", post_with(logout, logout_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::EmailTaken => StatusCode::BAD_REQUEST,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let (code, content) = match self {
			Self::InvalidEmailOrPassword => ("invalid_credentials", "Invalid credentials"),
			Self::Argon(..) => ("internal_error", "Authentication failed"),
			Self::NoSessionCookie => ("no_session", "You need to sign in first"),
			Self::InvalidSessionCookie => ("invalid_session", "Your session is no longer valid"),
			Self::EmailTaken => ("email_taken", "User already exists"),
		};

		error::Message::new(code).content(content).into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_signup_flow() {
		let app = app();

		let response = app
			.post("/auth")
			.json(&json!({
				"email": "a@x.com",
				"password": "pw1",
				"type": "signup",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>(), json!({ "email": "a@x.com" }));

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app
			.post("/auth")
			.json(&json!({
				"email": "a@x.com",
				"password": "pw1",
				"type": "signin",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["email"], "a@x.com");

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["email"], "a@x.com");
	}

	#[tokio::test]
	async fn test_duplicate_signup() {
		let (app, store) = app_with_store();

		sign_up(&app, "a@x.com", "pw1").await;

		let response = app
			.post("/auth")
			.json(&json!({
				"email": "a@x.com",
				"password": "other",
				"type": "signup",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

		let body = response.json::<Value>();

		assert_eq!(body["error"], "User already exists");
		assert_eq!(body["success"], false);
		assert_eq!(store.user_count().await, 1);
	}

	#[tokio::test]
	async fn test_signin_with_wrong_password() {
		let (app, store) = app_with_store();

		sign_up(&app, "a@x.com", "pw1").await;

		let response = app
			.post("/auth")
			.json(&json!({
				"email": "a@x.com",
				"password": "pw2",
				"type": "signin",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["error"], "Invalid credentials");
		assert_eq!(store.user_count().await, 1);
	}

	#[tokio::test]
	async fn test_signin_with_unknown_email() {
		let app = app();

		let response = app
			.post("/auth")
			.json(&json!({
				"email": "nobody@x.com",
				"password": "pw1",
				"type": "signin",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_invalid_auth_input() {
		let app = app();

		let response = app
			.post("/auth")
			.json(&json!({
				"email": "not an email",
				"password": "pw1",
				"type": "signup",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(response.json::<Value>()["errors"][0]["field"], "email");

		let response = app
			.post("/auth")
			.json(&json!({
				"email": "a@x.com",
				"password": "pw1",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_me_requires_session() {
		let app = app();

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["errors"][0]["code"], "no_session");
	}

	#[tokio::test]
	async fn test_unsigned_cookie_is_rejected() {
		let (app, store) = app_with_store();

		store
			.create_user(Uuid::new_v4(), "a@x.com", b"hash")
			.await
			.unwrap();

		// A bare email, as a client could forge it
		let response = app
			.get("/auth/me")
			.add_cookie(Cookie::new("session", "a@x.com"))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<Value>()["errors"][0]["code"],
			"invalid_session"
		);
	}

	#[tokio::test]
	async fn test_logout_clears_session() {
		let app = app();

		sign_up(&app, "a@x.com", "pw1").await;

		let response = app.post("/auth/logout").await;

		assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("Max-Age=0"));

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_rate_limit_only_guards_credentials() {
		let app = app_with_rate_limits();

		sign_up(&app, "a@x.com", "pw1").await;

		// Well past the credential burst, well within the default one
		for _ in 0..10 {
			let response = app.get("/auth/me").await;

			assert_eq!(response.status_code(), StatusCode::OK);
		}

		let mut statuses = Vec::new();

		for _ in 0..10 {
			statuses.push(app.post("/auth").json(&json!({})).await.status_code());
		}

		assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));
	}
}
