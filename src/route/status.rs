use aide::axum::{routing::get_with, ApiRouter};
use axum::extract::State;
use macros::route;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{error::AppError, extract::Json, openapi::tag, AppState, Database};

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
	Connected,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Status {
	pub status: Connection,
	pub message: &'static str,
}

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/status", get_with(get_status, get_status_docs))
}

/// Get status
/// Checks that the service can reach its store.
#[route(tag = tag::STATUS)]
pub async fn get_status(State(database): State<Database>) -> Result<Json<Status>, AppError> {
	database.ping().await?;

	Ok(Json(Status {
		status: Connection::Connected,
		message: "Database connection successful",
	}))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_status_connected() {
		let app = app();

		let response = app.get("/status").await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["status"], "connected");
	}

	#[tokio::test]
	async fn test_status_disconnected() {
		let app = app_with(Arc::new(BrokenStore::default()));

		let response = app.get("/status").await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

		let body = response.json::<Value>();

		assert_eq!(body["success"], false);
		assert_eq!(body["error"], "Something went wrong, try again later.");
	}
}
