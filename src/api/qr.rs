use crate::{
    api::attendance::{fetch_student_history, insert_time_in},
    error::ApiError,
    model::{attendance::AttendanceRecord, qr_code::QrPayload, student::Student},
    utils::qr_image,
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Raw text decoded from the scanned image; expected to be a
    /// JSON-encoded QR payload.
    pub qr_data: String,
}

/// Render a student's QR code image plus the payload it encodes
#[utoipa::path(
    get,
    path = "/api/qr/generate/{id}",
    params(
        ("id", Path, description = "Student profile id")
    ),
    responses(
        (status = 200, description = "QR image and payload", body = Object, example = json!({
            "qrCode": "data:image/png;base64,...",
            "studentData": {
                "studentId": "2021-00123",
                "fullName": "Juan Dela Cruz",
                "course": "BSCS",
                "labSchedule": "MWF 10:00-12:00"
            }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "QR"
)]
pub async fn generate(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let student = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, email, full_name, student_no, course, lab_schedule, is_admin, created_at
        FROM students
        WHERE id = ?
        "#,
    )
    .bind(&id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::NotFound("Student"))?;

    let payload = QrPayload::from_student(&student);
    let qr_code = qr_image::to_data_url(&payload)?;

    Ok(HttpResponse::Ok().json(json!({
        "qrCode": qr_code,
        "studentData": payload,
    })))
}

/// Intake of a scanned payload: parse, resolve the student number to a
/// profile, and open an attendance record through the same path as the
/// direct time-in route.
#[utoipa::path(
    post,
    path = "/api/qr/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = Object, example = json!({
            "message": "Attendance recorded successfully"
        })),
        (status = 400, description = "Malformed QR payload"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "QR"
)]
pub async fn scan(
    pool: web::Data<MySqlPool>,
    body: web::Json<ScanRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload: QrPayload = serde_json::from_str(&body.qr_data)
        .map_err(|e| ApiError::Validation(format!("Malformed QR payload: {e}")))?;

    let student_id = sqlx::query_scalar::<_, String>("SELECT id FROM students WHERE student_no = ?")
        .bind(&payload.student_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or(ApiError::NotFound("Student"))?;

    let record = insert_time_in(
        pool.get_ref(),
        &student_id,
        payload.lab_schedule.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance recorded successfully",
        "attendance": record,
    })))
}

/// Attendance history, exposed here as well for scanner clients; same
/// implementation as the attendance route.
#[utoipa::path(
    get,
    path = "/api/qr/attendance/{id}",
    params(
        ("id", Path, description = "Student profile id")
    ),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "QR"
)]
pub async fn history(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let records = fetch_student_history(pool.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}
