use crate::{
    auth::auth::{AuthUser, require_admin},
    error::ApiError,
    model::{qr_code::QrPayload, student::Student},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::debug;
use utoipa::ToSchema;

const SELECT_STUDENT: &str = r#"
    SELECT id, email, full_name, student_no, course, lab_schedule, is_admin, created_at
    FROM students
    WHERE id = ?
"#;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    #[schema(example = "Juan Dela Cruz")]
    pub full_name: Option<String>,
    #[schema(example = "BSCS")]
    pub course: Option<String>,
    #[schema(example = "MWF 10:00-12:00")]
    pub lab_schedule: Option<String>,
}

/// Assemble the UPDATE statement for the fields present in the body.
/// Returns None when nothing was provided.
fn build_update_sql(body: &UpdateStudent) -> Option<(String, Vec<String>)> {
    let mut sets = Vec::new();
    let mut values = Vec::new();

    if let Some(full_name) = &body.full_name {
        sets.push("full_name = ?");
        values.push(full_name.clone());
    }
    if let Some(course) = &body.course {
        sets.push("course = ?");
        values.push(course.clone());
    }
    if let Some(lab_schedule) = &body.lab_schedule {
        sets.push("lab_schedule = ?");
        values.push(lab_schedule.clone());
    }

    if sets.is_empty() {
        return None;
    }

    let sql = format!("UPDATE students SET {} WHERE id = ?", sets.join(", "));
    Some((sql, values))
}

/// Get student profile
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id", Path, description = "Student profile id")
    ),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_student(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let student = sqlx::query_as::<_, Student>(SELECT_STUDENT)
        .bind(&id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or(ApiError::NotFound("Student"))?;

    Ok(HttpResponse::Ok().json(student))
}

/// Partial profile update. Only the fields present in the body are touched;
/// the QR snapshot is rewritten in the same transaction so a failed sync
/// rolls the profile change back too.
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id", Path, description = "Student profile id")
    ),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 400, description = "No fields provided"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn update_student(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<UpdateStudent>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let (sql, values) = build_update_sql(&body)
        .ok_or_else(|| ApiError::Validation("No fields provided for update".into()))?;
    debug!(sql = %sql, student_id = %id, "Updating student profile");

    let mut tx = pool.begin().await?;

    let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students WHERE id = ?")
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;
    if known == 0 {
        return Err(ApiError::NotFound("Student"));
    }

    let mut query = sqlx::query(&sql);
    for value in &values {
        query = query.bind(value);
    }
    query.bind(&id).execute(&mut *tx).await?;

    // Re-read the row and overwrite the QR snapshot with the fresh values.
    let student = sqlx::query_as::<_, Student>(SELECT_STUDENT)
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;

    let payload = QrPayload::from_student(&student);
    sqlx::query("UPDATE qr_codes SET qr_data = ?, updated_at = NOW() WHERE student_id = ?")
        .bind(sqlx::types::Json(&payload))
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(HttpResponse::Ok().json(student))
}

/// List all student profiles, newest registration first. Admin only.
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All student profiles", body = [Student]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn list_students(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    require_admin(pool.get_ref(), &auth).await?;

    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, email, full_name, student_no, course, lab_schedule, is_admin, created_at
        FROM students
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(students))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_touches_only_the_fields_present() {
        let body = UpdateStudent {
            full_name: None,
            course: Some("BSIT".into()),
            lab_schedule: None,
        };

        let (sql, values) = build_update_sql(&body).unwrap();
        assert_eq!(sql, "UPDATE students SET course = ? WHERE id = ?");
        assert_eq!(values, vec!["BSIT".to_string()]);
    }

    #[test]
    fn update_binds_fields_in_declaration_order() {
        let body = UpdateStudent {
            full_name: Some("Juan Dela Cruz".into()),
            course: Some("BSCS".into()),
            lab_schedule: Some("TTh 13:00-15:00".into()),
        };

        let (sql, values) = build_update_sql(&body).unwrap();
        assert_eq!(
            sql,
            "UPDATE students SET full_name = ?, course = ?, lab_schedule = ? WHERE id = ?"
        );
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn empty_update_is_rejected() {
        let body = UpdateStudent {
            full_name: None,
            course: None,
            lab_schedule: None,
        };
        assert!(build_update_sql(&body).is_none());
    }
}
