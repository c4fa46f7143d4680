use tracing::{info, instrument};

use quill_core::AppError;
use quill_core::query::{FieldProjection, FilterExpression, SortSpec};
use quill_db::{DocumentStore, FindOptions};

use crate::modules::users::model::{HIDDEN_USER_FIELDS, USERS_COLLECTION, UpdateUserDto, User};

fn user_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("No User found with that ID"))
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db), fields(db.operation = "FIND", db.collection = USERS_COLLECTION))]
    pub async fn get_users(db: &dyn DocumentStore) -> Result<Vec<User>, AppError> {
        let options = FindOptions {
            sort: SortSpec::parse("username"),
            projection: FieldProjection::excluding(&HIDDEN_USER_FIELDS),
            ..Default::default()
        };

        let documents = db
            .find(USERS_COLLECTION, &FilterExpression::new(), options)
            .await?;

        documents
            .into_iter()
            .map(|document| User::from_document(document).map_err(AppError::from))
            .collect()
    }

    #[instrument(skip(db), fields(db.operation = "FIND_ONE", db.collection = USERS_COLLECTION))]
    pub async fn get_user(db: &dyn DocumentStore, id: &str) -> Result<User, AppError> {
        let document = db
            .find_one(USERS_COLLECTION, &FilterExpression::matching("_id", id))
            .await?
            .ok_or_else(user_not_found)?;

        Ok(User::from_document(document)?)
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.collection = USERS_COLLECTION))]
    pub async fn update_user(
        db: &dyn DocumentStore,
        id: &str,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let changes = dto.into_changes();
        if changes.is_empty() {
            return Self::get_user(db, id).await;
        }

        let document = db
            .update_one(
                USERS_COLLECTION,
                &FilterExpression::matching("_id", id),
                changes,
            )
            .await?
            .ok_or_else(user_not_found)?;

        info!(user.id = %id, "User updated");
        Ok(User::from_document(document)?)
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.collection = USERS_COLLECTION))]
    pub async fn delete_user(db: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
        db.delete_one(USERS_COLLECTION, &FilterExpression::matching("_id", id))
            .await?
            .ok_or_else(user_not_found)?;

        info!(user.id = %id, "User deleted");
        Ok(())
    }
}
