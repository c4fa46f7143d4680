use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use quill_core::serde::{deserialize_lowercase, deserialize_optional_lowercase, deserialize_trimmed};
use quill_db::bson::{Document, doc};

use crate::modules::users::model::User;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: String,
    /// Stored lowercased; must be unique
    #[serde(deserialize_with = "deserialize_lowercase")]
    #[validate(length(min = 8, message = "Username must be at least 8 characters long."))]
    pub username: String,
    /// Stored lowercased; must be unique
    #[serde(deserialize_with = "deserialize_lowercase")]
    #[validate(email(message = "Please use a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    #[schema(format = Password)]
    pub password: String,
}

impl RegisterRequestDto {
    /// Stored form of the new user; the password must already be hashed.
    pub fn into_document(self, password_hash: String) -> Document {
        doc! {
            "firstName": self.first_name,
            "lastName": self.last_name,
            "username": self.username,
            "email": self.email,
            "password": password_hash,
            "blogsPosted": 0,
            "__v": 0,
        }
    }
}

/// Both fields are optional at the JSON level so that a missing credential
/// gets its own message instead of a generic validation error.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "deserialize_optional_lowercase")]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(format = Password)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
    pub data: RegisteredUser,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<User> for LoginUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name: user.full_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginData {
    pub user: LoginUser,
    /// Bearer token for authenticated endpoints
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
    pub data: LoginData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_dto_normalizes_identity_fields() {
        let dto: RegisterRequestDto = serde_json::from_value(json!({
            "firstName": " Ada ",
            "lastName": "Lovelace",
            "username": " AdaLovelace ",
            "email": " Ada@Example.COM ",
            "password": "analytical-engine"
        }))
        .unwrap();

        assert!(dto.validate().is_ok());
        let document = dto.into_document("hash".to_string());
        assert_eq!(document.get_str("firstName").unwrap(), "Ada");
        assert_eq!(document.get_str("username").unwrap(), "adalovelace");
        assert_eq!(document.get_str("email").unwrap(), "ada@example.com");
        assert_eq!(document.get_str("password").unwrap(), "hash");
    }

    #[test]
    fn test_register_dto_rejects_short_username() {
        let dto: RegisterRequestDto = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "username": "ada",
            "email": "ada@example.com",
            "password": "analytical-engine"
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_login_request_allows_missing_fields() {
        let dto: LoginRequest = serde_json::from_value(json!({ "email": "ADA@example.com" })).unwrap();
        assert_eq!(dto.email.as_deref(), Some("ada@example.com"));
        assert!(dto.password.is_none());
    }
}
