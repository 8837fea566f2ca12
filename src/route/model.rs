use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// A path containing a single resource id, e.g. `/posts/:id`.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_id_input_rejects_malformed_uuid() {
		let result = serde_json::from_value::<IdInput>(serde_json::json!({ "id": "not-a-uuid" }));

		assert!(result.is_err());
	}
}
