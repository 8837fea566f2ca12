//! Persistence for users and posts.
//!
//! Routes only talk to the [`Store`] trait, so the backing database can be
//! swapped without touching them. [`PgStore`] is used when a `DATABASE_URL`
//! is configured, and [`MemoryStore`] otherwise (and in tests).

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use uuid::Uuid;

use crate::route::{
	auth::model::User,
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
	/// A unique constraint was violated, e.g. an email that is already registered.
	#[error("duplicate {0}")]
	Duplicate(&'static str),
}

#[axum::async_trait]
pub trait Store: Send + Sync + 'static {
	/// Checks that the store is reachable.
	async fn ping(&self) -> Result<(), Error>;

	async fn find_user(&self, email: &str) -> Result<Option<User>, Error>;

	/// Inserts a new user, failing with [`Error::Duplicate`] if the email is taken.
	async fn create_user(&self, id: Uuid, email: &str, password: &[u8]) -> Result<User, Error>;

	/// Returns every post, newest first.
	async fn list_posts(&self) -> Result<Vec<Post>, Error>;

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error>;

	async fn create_post(&self, input: CreatePostInput) -> Result<Post, Error>;

	/// Replaces the provided fields, returning `None` if the post does not exist.
	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error>;

	/// Removes a post, returning whether it existed.
	async fn delete_post(&self, id: Uuid) -> Result<bool, Error>;
}
