use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Error, Store};
use crate::route::{
	auth::model::User,
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

#[derive(Default)]
struct Collections {
	/// Users keyed by email.
	users: HashMap<String, User>,
	/// Posts in insertion order.
	posts: Vec<Post>,
}

/// A store that keeps everything in process memory.
///
/// Nothing is persisted, so this is only suitable for development and tests.
#[derive(Default)]
pub struct MemoryStore {
	inner: RwLock<Collections>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	#[cfg(test)]
	pub async fn user_count(&self) -> usize {
		self.inner.read().await.users.len()
	}
}

#[axum::async_trait]
impl Store for MemoryStore {
	async fn ping(&self) -> Result<(), Error> {
		Ok(())
	}

	async fn find_user(&self, email: &str) -> Result<Option<User>, Error> {
		Ok(self.inner.read().await.users.get(email).cloned())
	}

	async fn create_user(&self, id: Uuid, email: &str, password: &[u8]) -> Result<User, Error> {
		let mut inner = self.inner.write().await;

		if inner.users.contains_key(email) {
			return Err(Error::Duplicate("email"));
		}

		let user = User {
			id,
			email: email.to_owned(),
			password: password.to_vec(),
			created_at: chrono::Utc::now(),
		};

		inner.users.insert(user.email.clone(), user.clone());

		Ok(user)
	}

	async fn list_posts(&self) -> Result<Vec<Post>, Error> {
		let inner = self.inner.read().await;

		// Newest insert first, so posts sharing a timestamp stay newest first after the stable sort
		let mut posts = inner.posts.iter().rev().cloned().collect::<Vec<_>>();
		posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

		Ok(posts)
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		let inner = self.inner.read().await;

		Ok(inner.posts.iter().find(|post| post.id == id).cloned())
	}

	async fn create_post(&self, input: CreatePostInput) -> Result<Post, Error> {
		let post = Post {
			id: Uuid::new_v4(),
			title: input.title,
			content: input.content,
			image_url: input.image_url,
			created_at: chrono::Utc::now(),
		};

		self.inner.write().await.posts.push(post.clone());

		Ok(post)
	}

	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error> {
		let mut inner = self.inner.write().await;

		let Some(post) = inner.posts.iter_mut().find(|post| post.id == id) else {
			return Ok(None);
		};

		if let Some(title) = input.title {
			post.title = title;
		}

		if let Some(content) = input.content {
			post.content = content;
		}

		if let Some(image_url) = input.image_url {
			post.image_url = image_url;
		}

		Ok(Some(post.clone()))
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let mut inner = self.inner.write().await;
		let len = inner.posts.len();

		inner.posts.retain(|post| post.id != id);

		Ok(inner.posts.len() != len)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn input(title: &str) -> CreatePostInput {
		CreatePostInput {
			title: title.into(),
			content: "C".into(),
			image_url: "http://i".into(),
		}
	}

	#[tokio::test]
	async fn test_list_posts_newest_first() {
		let store = MemoryStore::new();

		store.create_post(input("first")).await.unwrap();
		store.create_post(input("second")).await.unwrap();
		store.create_post(input("third")).await.unwrap();

		let titles = store
			.list_posts()
			.await
			.unwrap()
			.into_iter()
			.map(|post| post.title)
			.collect::<Vec<_>>();

		assert_eq!(titles, ["third", "second", "first"]);
	}

	#[tokio::test]
	async fn test_duplicate_user_is_rejected() {
		let store = MemoryStore::new();

		store
			.create_user(Uuid::new_v4(), "a@x.com", b"hash")
			.await
			.unwrap();

		let result = store.create_user(Uuid::new_v4(), "a@x.com", b"other").await;

		assert!(matches!(result, Err(Error::Duplicate("email"))));
		assert_eq!(store.user_count().await, 1);
	}

	#[tokio::test]
	async fn test_partial_update_keeps_other_fields() {
		let store = MemoryStore::new();
		let post = store.create_post(input("T")).await.unwrap();

		let updated = store
			.update_post(
				post.id,
				UpdatePostInput {
					title: Some("T2".into()),
					content: None,
					image_url: None,
				},
			)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.title, "T2");
		assert_eq!(updated.content, "C");
		assert_eq!(updated.created_at, post.created_at);
	}

	#[tokio::test]
	async fn test_delete_reports_missing_post() {
		let store = MemoryStore::new();
		let post = store.create_post(input("T")).await.unwrap();

		assert!(store.delete_post(post.id).await.unwrap());
		assert!(!store.delete_post(post.id).await.unwrap());
	}
}
