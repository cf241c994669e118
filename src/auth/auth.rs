use crate::error::ApiError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};
use sqlx::MySqlPool;

/// The identity the auth middleware resolved for this request: the token's
/// subject projected from the students table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub student_no: String,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            // Only reachable on a route that skipped the middleware.
            None => ready(Err(ErrorUnauthorized("Missing authenticated user"))),
        }
    }
}

/// Admin privilege is looked up fresh per call rather than baked into the
/// token, so revoking the flag takes effect immediately.
pub async fn require_admin(pool: &MySqlPool, user: &AuthUser) -> Result<(), ApiError> {
    let is_admin = sqlx::query_scalar::<_, bool>("SELECT is_admin FROM students WHERE id = ?")
        .bind(&user.id)
        .fetch_optional(pool)
        .await?;

    if is_admin.unwrap_or(false) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
