//! User data models and DTOs.
//!
//! Stored user documents carry a bcrypt `password` hash; [`User`] is the
//! public view and never includes it. `fullName` is derived from the first
//! and last name whenever a user is loaded.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use quill_core::serde::{deserialize_optional_lowercase, deserialize_optional_trimmed};
use quill_db::bson::Document;
use quill_db::document_to_json;

pub const USERS_COLLECTION: &str = "users";

/// Fields never sent to clients.
pub const HIDDEN_USER_FIELDS: [&str; 2] = ["password", "__v"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub blogs_posted: i64,
}

impl User {
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        let mut user: User = serde_json::from_value(document_to_json(document))?;
        user.full_name = format!("{} {}", user.first_name, user.last_name);
        Ok(user)
    }
}

/// Partial update of the caller's own account.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_lowercase")]
    #[validate(length(min = 8, message = "Username must be at least 8 characters long."))]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_lowercase")]
    #[validate(email(message = "Please use a valid email address."))]
    pub email: Option<String>,
}

impl UpdateUserDto {
    pub fn into_changes(self) -> Document {
        let mut changes = Document::new();
        if let Some(first_name) = self.first_name {
            changes.insert("firstName", first_name);
        }
        if let Some(last_name) = self.last_name {
            changes.insert("lastName", last_name);
        }
        if let Some(username) = self.username {
            changes.insert("username", username);
        }
        if let Some(email) = self.email {
            changes.insert("email", email);
        }
        changes
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UserData {
    pub user: User,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UserResponse {
    #[schema(example = "success")]
    pub status: String,
    pub data: UserData,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        Self {
            status: "success".to_string(),
            data: UserData { user },
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UsersData {
    pub users: Vec<User>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UsersResponse {
    #[schema(example = "success")]
    pub status: String,
    pub results: usize,
    pub data: UsersData,
}

impl From<Vec<User>> for UsersResponse {
    fn from(users: Vec<User>) -> Self {
        Self {
            status: "success".to_string(),
            results: users.len(),
            data: UsersData { users },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_db::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_from_document_derives_full_name_and_hides_password() {
        let id = ObjectId::new();
        let user = User::from_document(doc! {
            "_id": id,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "username": "adalovelace",
            "email": "ada@example.com",
            "password": "$2b$12$hash",
            "blogsPosted": 3,
        })
        .unwrap();

        assert_eq!(user.id, id.to_hex());
        assert_eq!(user.full_name, "Ada Lovelace");
        assert_eq!(user.blogs_posted, 3);

        let body = serde_json::to_value(&user).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["fullName"], "Ada Lovelace");
    }

    #[test]
    fn test_update_dto_normalizes_and_validates() {
        let dto: UpdateUserDto = serde_json::from_value(json!({
            "username": "  AdaLovelace ",
            "email": "not-an-email"
        }))
        .unwrap();

        assert_eq!(dto.username.as_deref(), Some("adalovelace"));
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_changes_skip_missing_fields() {
        let dto = UpdateUserDto {
            first_name: Some("Augusta".to_string()),
            ..Default::default()
        };
        let changes = dto.into_changes();
        assert_eq!(changes, doc! { "firstName": "Augusta" });
    }
}
