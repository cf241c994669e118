use crate::{
    auth::{
        jwt::issue_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    model::{qr_code::QrPayload, student::Student},
    models::{LoginRequest, RegisterRequest, StudentAuthSql},
    utils::{email_cache, email_filter},
};
use actix_web::{HttpResponse, web};
use anyhow::anyhow;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // 1. Cuckoo filter - fast negative: "not in filter" means never registered
    if !email_filter::might_exist(&email) {
        return true;
    }

    // 2. Moka cache - fast positive
    if email_cache::is_taken(&email).await {
        return false;
    }

    // 3. Database fallback
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM students WHERE email = ? LIMIT 1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// Student registration: creates the profile and its initial QR snapshot in
/// one transaction, then hands back a session token right away.
pub async fn register(
    body: web::Json<RegisterRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.trim().to_lowercase();
    let full_name = body.full_name.trim();
    let student_no = body.student_id.trim();

    if email.is_empty() || body.password.is_empty() || full_name.is_empty() || student_no.is_empty()
    {
        return Err(ApiError::Validation(
            "email, password, fullName and studentId are required".into(),
        ));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash =
        hash_password(&body.password).map_err(|e| anyhow!("password hashing failed: {e}"))?;

    let id = Uuid::new_v4().to_string();
    let payload = QrPayload {
        student_id: student_no.to_owned(),
        full_name: full_name.to_owned(),
        course: body.course.clone(),
        lab_schedule: None,
    };

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO students (id, email, password_hash, full_name, student_no, course)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&email)
    .bind(&password_hash)
    .bind(full_name)
    .bind(student_no)
    .bind(&body.course)
    .execute(&mut *tx)
    .await;

    if let Err(e) = inserted {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return Err(ApiError::Conflict("Email already registered".into()));
            }
        }
        return Err(e.into());
    }

    sqlx::query("INSERT INTO qr_codes (student_id, qr_data) VALUES (?, ?)")
        .bind(&id)
        .bind(sqlx::types::Json(&payload))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    // Keep the availability fast path in sync with the new row.
    email_filter::insert(&email);
    email_cache::mark_taken(&email).await;

    let token = issue_token(&id, &config.jwt_secret, config.token_ttl)
        .map_err(|e| anyhow!("token issuance failed: {e}"))?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, email, full_name, student_no, course, lab_schedule, is_admin, created_at
        FROM students
        WHERE id = ?
        "#,
    )
    .bind(&id)
    .fetch_one(pool.get_ref())
    .await?;

    info!(student_id = %student.id, "Student registered");

    Ok(HttpResponse::Created().json(json!({
        "message": "Student registered successfully",
        "user": student,
        "token": token,
    })))
}

#[instrument(
    name = "auth_login",
    skip(pool, config, body),
    fields(email = %body.email)
)]
pub async fn login(
    body: web::Json<LoginRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if body.email.trim().is_empty() || body.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(ApiError::Validation("email and password are required".into()));
    }

    debug!("Fetching student from database");

    let row = sqlx::query_as::<_, StudentAuthSql>(
        r#"
        SELECT id, email, password_hash, full_name, student_no, course,
               lab_schedule, is_admin, created_at
        FROM students
        WHERE email = ?
        "#,
    )
    .bind(body.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Database error while fetching student");
        ApiError::from(e)
    })?;

    let Some(row) = row else {
        info!("Invalid credentials: no such email");
        return Err(ApiError::Unauthenticated("Invalid credentials".into()));
    };

    debug!("Verifying password");

    if verify_password(&body.password, &row.password_hash).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Unauthenticated("Invalid credentials".into()));
    }

    let token = issue_token(&row.id, &config.jwt_secret, config.token_ttl)
        .map_err(|e| anyhow!("token issuance failed: {e}"))?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": row.into_student(),
    })))
}
