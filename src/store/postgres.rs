use uuid::Uuid;

use super::{Error, Store};
use crate::route::{
	auth::model::User,
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

/// The name of the unique constraint on `"user".email`.
const USER_EMAIL_KEY: &str = "user_email_key";

#[derive(Clone)]
pub struct PgStore {
	pool: sqlx::PgPool,
}

impl PgStore {
	/// Connects to the database and applies any pending migrations.
	pub async fn connect(url: &str) -> Result<Self, Error> {
		let pool = sqlx::PgPool::connect(url).await?;

		sqlx::migrate!().run(&pool).await?;

		Ok(Self { pool })
	}
}

#[axum::async_trait]
impl Store for PgStore {
	async fn ping(&self) -> Result<(), Error> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;

		Ok(())
	}

	async fn find_user(&self, email: &str) -> Result<Option<User>, Error> {
		let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = $1"#)
			.bind(email)
			.fetch_optional(&self.pool)
			.await?;

		Ok(user)
	}

	async fn create_user(&self, id: Uuid, email: &str, password: &[u8]) -> Result<User, Error> {
		sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (id, email, password) VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(id)
		.bind(email)
		.bind(password)
		.fetch_one(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref d) if d.constraint() == Some(USER_EMAIL_KEY) => {
				Error::Duplicate("email")
			}
			e => Error::Database(e),
		})
	}

	async fn list_posts(&self) -> Result<Vec<Post>, Error> {
		let posts = sqlx::query_as::<_, Post>(
			r#"
				SELECT * FROM post
				ORDER BY created_at DESC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(posts)
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		let post = sqlx::query_as::<_, Post>("SELECT * FROM post WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(post)
	}

	async fn create_post(&self, input: CreatePostInput) -> Result<Post, Error> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (id, title, content, image_url)
				VALUES (DEFAULT, $1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(input.title)
		.bind(input.content)
		.bind(input.image_url)
		.fetch_one(&self.pool)
		.await?;

		Ok(post)
	}

	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				UPDATE post
				SET title = COALESCE($1, title),
					content = COALESCE($2, content),
					image_url = COALESCE($3, image_url)
				WHERE id = $4
				RETURNING *
			"#,
		)
		.bind(input.title)
		.bind(input.content)
		.bind(input.image_url)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(post)
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}
