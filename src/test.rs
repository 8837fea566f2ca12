//! Shared helpers for route tests.

pub use std::sync::Arc;

pub use axum::http::StatusCode;
pub use axum_test::TestServer;
pub use cookie::Cookie;
pub use serde_json::{json, Value};
pub use uuid::Uuid;

pub use crate::store::{MemoryStore, Store};

use std::net::SocketAddr;

use axum_test::TestServerConfig;

use crate::{
	config::MIN_SECRET_LENGTH,
	route::{
		auth::model::User,
		post::model::{CreatePostInput, Post, UpdatePostInput},
	},
	router, store, Config, Database, State,
};

fn config() -> Config {
	Config {
		session_secret: Some("s".repeat(MIN_SECRET_LENGTH)),
		rate_limit: false,
		..Config::default()
	}
}

/// Cookies are saved between requests, so signing up signs in every following request.
fn server_config() -> TestServerConfig {
	TestServerConfig {
		save_cookies: true,
		..TestServerConfig::default()
	}
}

/// Creates a test server backed by `database`.
pub fn app_with(database: Database) -> TestServer {
	TestServer::new_with_config(router(State::new(database, config())), server_config()).unwrap()
}

/// Creates a test server backed by a fresh in-memory store, returning the store
/// so tests can inspect it directly.
pub fn app_with_store() -> (TestServer, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::new());

	(app_with(store.clone()), store)
}

pub fn app() -> TestServer {
	app_with_store().0
}

/// Creates a test server with rate limiting enabled.
///
/// Limits are keyed by the peer address, so this serves over a real socket.
pub fn app_with_rate_limits() -> TestServer {
	let config = Config {
		rate_limit: true,
		..config()
	};

	let app = router(State::new(Arc::new(MemoryStore::new()), config))
		.into_make_service_with_connect_info::<SocketAddr>();

	TestServer::new_with_config(app, server_config()).unwrap()
}

/// Signs up for a new account, storing the session cookie on the server.
pub async fn sign_up(app: &TestServer, email: &str, password: &str) {
	let response = app
		.post("/auth")
		.json(&json!({
			"email": email,
			"password": password,
			"type": "signup",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);
}

/// A store that has lost its database connection for everything but accounts,
/// so requests can still be signed in.
#[derive(Default)]
pub struct BrokenStore {
	users: MemoryStore,
}

fn unavailable<T>() -> Result<T, store::Error> {
	Err(sqlx::Error::PoolClosed.into())
}

#[axum::async_trait]
impl Store for BrokenStore {
	async fn ping(&self) -> Result<(), store::Error> {
		unavailable()
	}

	async fn find_user(&self, email: &str) -> Result<Option<User>, store::Error> {
		self.users.find_user(email).await
	}

	async fn create_user(
		&self,
		id: Uuid,
		email: &str,
		password: &[u8],
	) -> Result<User, store::Error> {
		self.users.create_user(id, email, password).await
	}

	async fn list_posts(&self) -> Result<Vec<Post>, store::Error> {
		unavailable()
	}

	async fn find_post(&self, _id: Uuid) -> Result<Option<Post>, store::Error> {
		unavailable()
	}

	async fn create_post(&self, _input: CreatePostInput) -> Result<Post, store::Error> {
		unavailable()
	}

	async fn update_post(
		&self,
		_id: Uuid,
		_input: UpdatePostInput,
	) -> Result<Option<Post>, store::Error> {
		unavailable()
	}

	async fn delete_post(&self, _id: Uuid) -> Result<bool, store::Error> {
		unavailable()
	}
}
