pub mod auth;
pub mod blogs;
pub mod status;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::blogs::model::Blog;
pub use self::users::model::User;
