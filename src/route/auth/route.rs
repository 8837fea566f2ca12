use aide::axum::IntoApiResponse;
use argon2::Argon2;
use axum::{
	extract::State,
	http::{header, StatusCode},
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	session, store, AppState,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for signing up and signing in,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Creates a new account, failing if the email is already registered.
async fn signup(state: &AppState, input: &model::AuthInput) -> Result<model::User, RouteError> {
	if state.database.find_user(&input.email).await?.is_some() {
		return Err(Error::EmailTaken.into());
	}

	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &input.password, &user_id).map_err(Error::Argon)?;

	// Two signups racing past the check above still collide on the unique email
	state
		.database
		.create_user(user_id, &input.email, &hashed)
		.await
		.map_err(|e| match e {
			store::Error::Duplicate(..) => Error::EmailTaken.into(),
			e => RouteError::from(e),
		})
}

/// Checks a password against an account, if there is one.
///
/// The password is hashed even when the account does not exist, so an unknown
/// email takes as long to reject as a wrong password.
fn check_password(
	hasher: &Argon2,
	password: &str,
	user: Option<&model::User>,
) -> Result<bool, argon2::Error> {
	let id = user.map_or(Uuid::nil(), |user| user.id);
	let hashed = hash_password(hasher, password, &id)?;

	Ok(user.is_some_and(|user| user.password == hashed))
}

/// Finds the account matching both the email and the password.
async fn signin(state: &AppState, input: &model::AuthInput) -> Result<model::User, RouteError> {
	let user = state.database.find_user(&input.email).await?;

	let valid =
		check_password(&state.hasher, &input.password, user.as_ref()).map_err(Error::Argon)?;

	match user {
		Some(user) if valid => Ok(user),
		_ => Err(Error::InvalidEmailOrPassword.into()),
	}
}

/// Authenticate
/// Signs up for a new account or signs in to an existing one, depending on `type`.
/// Returns the account's email along with a signed session cookie.
#[route(tag = tag::AUTH, response(status = 200, description = "Authenticated successfully.", shape = "Json<model::Identity>"))]
pub async fn authenticate(
	State(state): State<AppState>,
	Json(input): Json<model::AuthInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = match input.kind {
		model::AuthType::Signup => signup(&state, &input).await?,
		model::AuthType::Signin => signin(&state, &input).await?,
	};

	tracing::info!(email = %user.email, kind = ?input.kind, "authenticated");

	let cookie = session::create_cookie(&state.key, &user.email, state.config.session_ttl);

	Ok((
		[(header::SET_COOKIE, cookie.to_string())],
		Json(model::Identity::from(user)),
	))
}

/// Get identity
/// Returns the email of the signed-in account.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::Identity> {
	Json(session.user.into())
}

/// Log out
/// Asks the client to drop its session cookie.
/// Sessions are not stored on the server, so a copy of the cookie remains valid until it expires.
#[route(tag = tag::AUTH, response(status = 204, description = "Logged out successfully."))]
pub async fn logout(_session: Session) -> impl IntoApiResponse {
	(
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		StatusCode::NO_CONTENT,
	)
}
