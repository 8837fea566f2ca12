use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::extract::Json;

pub const SPEC_URL: &str = "/docs/private/api.json";

pub fn routes<S>() -> ApiRouter<S>
where
	S: Clone + Send + Sync + 'static,
{
	ApiRouter::new()
		.api_route_with(
			"/docs",
			get_with(
				Scalar::new(SPEC_URL).with_title("Quill").axum_handler(),
				|op| op.description("This documentation page."),
			),
			|p| p.security_requirement(crate::openapi::SECURITY_SCHEME_SESSION),
		)
		.route(SPEC_URL, get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_openapi_lists_routes() {
		let app = app();

		let response = app.get("/docs/private/api.json").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let api = response.json::<Value>();

		assert!(api["paths"]["/auth"]["post"].is_object());
		assert!(api["paths"]["/posts/{id}"]["delete"].is_object());
		assert_eq!(api["info"]["title"], "Quill");
	}
}
