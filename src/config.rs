use std::{
	net::{IpAddr, Ipv4Addr},
	str::FromStr,
	time::Duration,
};

use axum::http::HeaderValue;
use tracing::Level;

/// The minimum length of `SESSION_SECRET`, required to derive a signing key.
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
	#[error("SESSION_SECRET must be at least {MIN_SECRET_LENGTH} bytes long")]
	ShortSecret,
}

/// Runtime configuration, read from the environment (and a `.env` file, if present).
#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	/// When unset, posts and users are kept in memory.
	pub database_url: Option<String>,
	/// Used to derive the cookie signing key. A random key is generated when unset,
	/// which invalidates every session on restart.
	pub session_secret: Option<String>,
	pub session_ttl: Duration,
	/// A single origin allowed to make credentialed cross-origin requests.
	pub cors_origin: Option<HeaderValue>,
	pub rate_limit: bool,
	pub log_level: Level,
	/// Whether traces and metrics are exported over OTLP.
	pub otel: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			host: IpAddr::V4(Ipv4Addr::LOCALHOST),
			port: 3000,
			database_url: None,
			session_secret: None,
			session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
			cors_origin: None,
			rate_limit: true,
			log_level: Level::INFO,
			otel: false,
		}
	}
}

/// Reads and parses an environment variable, returning `None` if it is unset or empty.
fn var<T: FromStr>(name: &'static str) -> Result<Option<T>, Error> {
	match std::env::var(name) {
		Ok(value) if !value.is_empty() => value
			.parse()
			.map(Some)
			.map_err(|_| Error::Invalid { name, value }),
		_ => Ok(None),
	}
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		let default = Self::default();

		let session_secret = var::<String>("SESSION_SECRET")?;

		if session_secret
			.as_ref()
			.is_some_and(|secret| secret.len() < MIN_SECRET_LENGTH)
		{
			return Err(Error::ShortSecret);
		}

		Ok(Self {
			host: var("HOST")?.unwrap_or(default.host),
			port: var("PORT")?.unwrap_or(default.port),
			database_url: var("DATABASE_URL")?,
			session_secret,
			session_ttl: var::<u64>("SESSION_DAYS")?
				.map_or(default.session_ttl, |days| {
					Duration::from_secs(days * 24 * 60 * 60)
				}),
			cors_origin: var("CORS_ORIGIN")?,
			rate_limit: var("RATE_LIMIT")?.unwrap_or(default.rate_limit),
			log_level: var("LOG_LEVEL")?.unwrap_or(default.log_level),
			otel: var::<String>("OTEL_EXPORTER_OTLP_ENDPOINT")?.is_some(),
		})
	}

	/// Derives the cookie signing key from the configured secret.
	pub fn signing_key(&self) -> cookie::Key {
		match self.session_secret {
			Some(ref secret) => cookie::Key::derive_from(secret.as_bytes()),
			None => {
				tracing::warn!("SESSION_SECRET is not set, sessions will not survive a restart");

				cookie::Key::generate()
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_signing_key_is_stable_for_a_secret() {
		let config = Config {
			session_secret: Some("a".repeat(MIN_SECRET_LENGTH)),
			..Config::default()
		};

		assert_eq!(
			config.signing_key().master(),
			config.signing_key().master()
		);
	}

	#[test]
	fn test_default_session_lasts_a_week() {
		assert_eq!(
			Config::default().session_ttl,
			Duration::from_secs(604_800)
		);
	}
}
