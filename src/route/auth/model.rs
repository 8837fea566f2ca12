use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single user account, identified by its email.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// The unique identifier of the user, also used to salt the password hash.
	#[serde(skip)]
	pub id: Uuid,
	/// The email used to sign in.
	pub email: String,
	/// The hashed password.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The creation time of the user.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Whether an authentication request creates an account or signs in to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
	Signup,
	Signin,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct AuthInput {
	#[validate(email(message = "email must be a valid email address"))]
	pub email: String,
	#[validate(length(min = 1, max = 128, message = "password must be between 1 and 128 characters"))]
	pub password: String,
	#[serde(rename = "type")]
	pub kind: AuthType,
}

/// The identity of an authenticated user.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Identity {
	pub email: String,
}

impl From<User> for Identity {
	fn from(user: User) -> Self {
		Self { email: user.email }
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_auth_input_parses_type() {
		let input = serde_json::from_value::<AuthInput>(serde_json::json!({
			"email": "a@x.com",
			"password": "pw1",
			"type": "signup",
		}))
		.unwrap();

		assert_eq!(input.kind, AuthType::Signup);
		assert!(input.validate().is_ok());
	}

	#[test]
	fn test_auth_input_rejects_unknown_type() {
		let result = serde_json::from_value::<AuthInput>(serde_json::json!({
			"email": "a@x.com",
			"password": "pw1",
			"type": "reset",
		}));

		assert!(result.is_err());
	}

	#[test]
	fn test_auth_input_rejects_bad_email() {
		let input = AuthInput {
			email: "not an email".into(),
			password: "pw1".into(),
			kind: AuthType::Signin,
		};

		assert!(input.validate().is_err());
	}

	#[test]
	fn test_user_hides_password() {
		let user = User {
			id: Uuid::new_v4(),
			email: "a@x.com".into(),
			password: vec![1, 2, 3],
			created_at: chrono::Utc::now(),
		};

		let value = serde_json::to_value(&user).unwrap();

		assert_eq!(value["email"], "a@x.com");
		assert!(value.get("password").is_none());
		assert!(value.get("id").is_none());
	}
}
