pub use crate::route::model::IdInput;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single blog post.
///
/// Posts have no author, so anyone who is signed in can edit or delete them.
#[model]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The title of the post.
	#[validate(length(min = 1, message = "title is required"))]
	pub title: String,
	/// The body of the post.
	#[validate(length(min = 1, message = "content is required"))]
	pub content: String,
	/// The URL of the cover image. This is not validated.
	pub image_url: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The response to a successful post creation.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Created<T> {
	pub success: bool,
	pub data: T,
}

impl<T> Created<T> {
	pub fn new(data: T) -> Self {
		Self {
			success: true,
			data,
		}
	}
}

/// The home page feed: the newest post is featured and the rest follow it.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Feed {
	pub featured: Option<Post>,
	pub posts: Vec<Post>,
}

impl From<Vec<Post>> for Feed {
	fn from(mut posts: Vec<Post>) -> Self {
		if posts.is_empty() {
			return Self {
				featured: None,
				posts,
			};
		}

		let featured = posts.remove(0);

		Self {
			featured: Some(featured),
			posts,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn post(title: &str) -> Post {
		Post {
			id: Uuid::new_v4(),
			title: title.into(),
			content: "C".into(),
			image_url: "http://i".into(),
			created_at: chrono::Utc::now(),
		}
	}

	#[test]
	fn test_feed_features_first_post() {
		let feed = Feed::from(vec![post("new"), post("old"), post("older")]);

		assert_eq!(feed.featured.map(|post| post.title).as_deref(), Some("new"));
		assert_eq!(feed.posts.len(), 2);
		assert_eq!(feed.posts[0].title, "old");
	}

	#[test]
	fn test_empty_feed() {
		let feed = Feed::from(Vec::new());

		assert!(feed.featured.is_none());
		assert!(feed.posts.is_empty());
	}

	#[test]
	fn test_post_serializes_camel_case() {
		let value = serde_json::to_value(post("T")).unwrap();

		assert_eq!(value["imageUrl"], "http://i");
		assert!(value.get("createdAt").is_some());
		assert!(value.get("image_url").is_none());
	}

	#[test]
	fn test_create_input_requires_title() {
		let input = CreatePostInput {
			title: String::new(),
			content: "C".into(),
			image_url: "http://i".into(),
		};

		let errors = input.validate().unwrap_err();

		assert!(errors.field_errors().contains_key("title"));
	}
}
