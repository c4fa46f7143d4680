use tracing::{info, instrument, warn};

use quill_auth::create_access_token;
use quill_config::JwtConfig;
use quill_core::query::FilterExpression;
use quill_core::{AppError, hash_password, verify_password};
use quill_db::DocumentStore;

use crate::metrics;
use crate::modules::auth::model::{LoginData, LoginRequest, RegisterRequestDto, RegisteredUser};
use crate::modules::users::model::{USERS_COLLECTION, User};

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid email or password".to_string())
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(user.email = %dto.email, db.operation = "INSERT", db.collection = USERS_COLLECTION))]
    pub async fn register_user(
        db: &dyn DocumentStore,
        dto: RegisterRequestDto,
    ) -> Result<RegisteredUser, AppError> {
        let existing = db
            .find_one(
                USERS_COLLECTION,
                &FilterExpression::matching("email", dto.email.as_str()),
            )
            .await?;

        if existing.is_some() {
            warn!("Registration with an existing email");
            return Err(AppError::conflict(
                "user with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.password)?;
        let stored = db
            .insert_one(USERS_COLLECTION, dto.into_document(password_hash))
            .await?;
        let user = User::from_document(stored)?;

        metrics::track_user_registered();
        info!(user.id = %user.id, "User registered");

        Ok(RegisteredUser {
            user_id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        })
    }

    /// Verifies the credentials and issues an access token. Unknown emails
    /// and wrong passwords fail with the same message.
    #[instrument(skip(db, dto, jwt_config), fields(user.email = ?dto.email))]
    pub async fn login_user(
        db: &dyn DocumentStore,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginData, AppError> {
        let (Some(email), Some(password)) = (
            dto.email.filter(|e| !e.is_empty()),
            dto.password.filter(|p| !p.is_empty()),
        ) else {
            metrics::track_user_login_failure("missing_credentials");
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Please provide email and password"
            )));
        };

        let Some(document) = db
            .find_one(USERS_COLLECTION, &FilterExpression::matching("email", email))
            .await?
        else {
            metrics::track_user_login_failure("unknown_email");
            return Err(invalid_credentials());
        };

        let password_hash = document.get_str("password").unwrap_or_default().to_string();
        if password_hash.is_empty() || !verify_password(&password, &password_hash)? {
            metrics::track_user_login_failure("wrong_password");
            return Err(invalid_credentials());
        }

        let user = User::from_document(document)?;
        let token = create_access_token(&user.id, &user.email, &user.username, jwt_config)?;

        metrics::track_user_login_success();
        metrics::track_jwt_issued();
        info!(user.id = %user.id, "User logged in");

        Ok(LoginData {
            user: user.into(),
            token,
        })
    }
}
