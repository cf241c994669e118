use crate::auth::auth::AuthUser;
use crate::auth::jwt::{TokenError, verify_token};
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;
use sqlx::MySqlPool;

fn unauthorized(
    req: ServiceRequest,
    message: &str,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let resp = HttpResponse::Unauthorized().json(json!({ "error": message }));
    Ok(req.into_response(resp.map_into_boxed_body()))
}

/// Request gate for every protected route: extracts the bearer token,
/// verifies it, and resolves the subject against the students table. A
/// structurally valid token whose subject no longer exists is not honored.
pub async fn auth_middleware(
    mut req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;
    let pool = req
        .app_data::<Data<MySqlPool>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Database pool missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => match h.to_str() {
            Ok(v) => v.to_owned(),
            Err(_) => return unauthorized(req, "Invalid Authorization header encoding"),
        },
        None => return unauthorized(req, "Missing Authorization header"),
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return unauthorized(req, "Authorization header must start with Bearer"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        // Both land on 401, but expiry is distinguishable from forgery.
        Err(TokenError::Expired) => return unauthorized(req, "Token expired"),
        Err(TokenError::Invalid) => return unauthorized(req, "Invalid token"),
    };

    let user = match sqlx::query_as::<_, AuthUser>(
        r#"
        SELECT id, email, full_name, student_no
        FROM students
        WHERE id = ?
        "#,
    )
    .bind(&claims.sub)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized(req, "Invalid token"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve token subject");
            return Err(actix_web::error::ErrorInternalServerError("Server error"));
        }
    };

    req.extensions_mut().insert(user);

    next.call(req).await
}
