use std::time::Duration;

use chrono::{DateTime, Utc};
use cookie::{Cookie, CookieJar, Key, SameSite};

pub const COOKIE_NAME: &str = "session";

/// Creates a session cookie holding the user's email and the time it was issued,
/// signed with `key`.
///
/// Sessions are stateless: logging out only asks the client to drop the cookie,
/// so a copy of it stays valid until `ttl` has passed since it was issued.
pub fn create_cookie(key: &Key, email: &str, ttl: Duration) -> Cookie<'static> {
	issue_cookie(key, email, ttl, Utc::now())
}

fn issue_cookie(
	key: &Key,
	email: &str,
	ttl: Duration,
	issued_at: DateTime<Utc>,
) -> Cookie<'static> {
	let value = format!("{email}|{}", issued_at.timestamp());
	let cookie = Cookie::build((COOKIE_NAME, value))
		.secure(!cfg!(debug_assertions))
		.http_only(true)
		.same_site(SameSite::Lax)
		.path("/")
		.max_age(cookie::time::Duration::try_from(ttl).unwrap_or(cookie::time::Duration::MAX))
		.build();

	let mut jar = CookieJar::new();
	jar.signed_mut(key).add(cookie);

	jar.get(COOKIE_NAME)
		.cloned()
		.expect("signed jar stores the cookie under the same name")
}

/// Creates an empty session cookie used to invalidate a previous one
pub fn clear_cookie() -> Cookie<'static> {
	Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

/// Verifies a session cookie's signature and age, returning the email it holds.
///
/// The age is checked against the signed issue time, since the client controls
/// the cookie's `Max-Age`.
pub fn verify_cookie(key: &Key, cookie: Cookie<'_>, ttl: Duration) -> Option<String> {
	let mut jar = CookieJar::new();
	jar.add_original(cookie.into_owned());

	let cookie = jar.signed(key).get(COOKIE_NAME)?;
	let (email, issued_at) = cookie.value().rsplit_once('|')?;
	let issued_at = DateTime::from_timestamp(issued_at.parse().ok()?, 0)?;

	// A lifetime too large for chrono never expires
	let expired = chrono::Duration::from_std(ttl).is_ok_and(|ttl| Utc::now() - issued_at > ttl);

	(!expired).then(|| email.to_owned())
}
