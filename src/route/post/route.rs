use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode};
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

/// Get all posts
/// Returns every post, newest first.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	let posts = database.list_posts().await?;

	Ok(Json(posts))
}

/// Get feed
/// Returns the newest post as the featured post, followed by every other post.
#[route(tag = tag::POST)]
pub async fn get_feed(State(database): State<Database>) -> Result<Json<model::Feed>, RouteError> {
	let posts = database.list_posts().await?;

	Ok(Json(posts.into()))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = database.find_post(path.id).await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.id))?))
}

/// Create post
/// Creates a new post. Any signed-in account can create posts.
#[route(tag = tag::POST, response(status = 201, description = "Post created.", shape = "Json<model::Created<model::Post>>"))]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = database.create_post(input).await?;

	tracing::info!(post = %post.id, email = %session.user.email, "created post");

	Ok((StatusCode::CREATED, Json(model::Created::new(post))))
}

/// Update post
/// Updates an existing post by its unique id. Fields that are not provided keep their value.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = database
		.update_post(path.id, input)
		.await?
		.ok_or(Error::UnknownPost(path.id))?;

	tracing::info!(post = %post.id, email = %session.user.email, "updated post");

	Ok(Json(post))
}

/// Delete post
/// Deletes an existing post by its unique id.
#[route(tag = tag::POST)]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	if !database.delete_post(path.id).await? {
		return Err(Error::UnknownPost(path.id).into());
	}

	tracing::info!(post = %path.id, email = %session.user.email, "deleted post");

	Ok(())
}
