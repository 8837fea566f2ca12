#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{
	extract::Request,
	http::{header, Method},
	Extension, Router, ServiceExt,
};
use tower::Layer;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub use config::Config;

pub type Database = Arc<dyn store::Store>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the store, the password hasher and the cookie signing key.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub key: cookie::Key,
	pub config: Arc<Config>,
}

impl State {
	pub fn new(database: Database, config: Config) -> Self {
		Self {
			database,
			hasher: Argon2::default(),
			key: config.signing_key(),
			config: Arc::new(config),
		}
	}
}

/// Builds the application with every route, its documentation and middleware.
pub fn router(state: State) -> Router {
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();

	let limits = state.config.rate_limit.then(|| {
		let default = ratelimit::default();
		let secure = ratelimit::secure();

		ratelimit::cleanup_old_limits(&[&default, &secure]);
		(default, secure)
	});

	let mut app = ApiRouter::new()
		.merge(route::auth::routes(
			limits.as_ref().map(|(_, secure)| secure.clone()),
		))
		.merge(route::post::routes())
		.merge(route::status::routes())
		.merge(route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)));

	if let Some((default, _)) = limits {
		app = app.layer(GovernorLayer { config: default });
	}

	if let Some(ref origin) = state.config.cors_origin {
		app = app.layer(
			CorsLayer::new()
				.allow_origin(origin.clone())
				.allow_credentials(true)
				.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
				.allow_headers([header::CONTENT_TYPE]),
		);
	}

	app.layer(CompressionLayer::new())
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(TraceLayer::new_for_http())
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(&config)?;

	let database: Database = if let Some(ref url) = config.database_url {
		Arc::new(store::PgStore::connect(url).await?)
	} else {
		tracing::warn!("DATABASE_URL is not set, data will be kept in memory");

		Arc::new(store::MemoryStore::new())
	};

	let addr = SocketAddr::new(config.host, config.port);
	let app = NormalizePathLayer::trim_trailing_slash().layer(router(State::new(database, config)));

	let listener = tokio::net::TcpListener::bind(addr).await?;

	tracing::info!("listening on {}", addr);

	axum::serve(
		listener,
		ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
	)
	.await?;

	Ok(())
}
