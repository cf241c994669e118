use crate::{
    auth::auth::{AuthUser, require_admin},
    error::ApiError,
    model::attendance::{AttendanceRecord, AttendanceWithStudent},
};
use actix_web::{HttpResponse, web};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeInRequest {
    /// Student profile id (students.id).
    #[schema(example = "5c4f7a52-1f0b-4c1e-9f37-3a8f6d2f9b10")]
    pub student_id: String,
    #[serde(default)]
    #[schema(example = "MWF 10:00-12:00")]
    pub lab_schedule: Option<String>,
}

/// Existence check + insert as one transaction; shared by the direct
/// time-in route and the QR scan intake. Multiple open records per student
/// are allowed: a missed time-out must not block the next session.
pub(crate) async fn insert_time_in(
    pool: &MySqlPool,
    student_id: &str,
    lab_schedule: Option<&str>,
) -> Result<AttendanceRecord, ApiError> {
    let mut tx = pool.begin().await?;

    let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students WHERE id = ?")
        .bind(student_id)
        .fetch_one(&mut *tx)
        .await?;
    if known == 0 {
        return Err(ApiError::NotFound("Student"));
    }

    let time_in = Utc::now().naive_utc();
    let result = sqlx::query(
        "INSERT INTO attendance (student_id, time_in, lab_schedule) VALUES (?, ?, ?)",
    )
    .bind(student_id)
    .bind(time_in)
    .bind(lab_schedule)
    .execute(&mut *tx)
    .await?;

    let record = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, student_id, time_in, time_out, lab_schedule FROM attendance WHERE id = ?",
    )
    .bind(result.last_insert_id())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(record)
}

pub(crate) async fn fetch_student_history(
    pool: &MySqlPool,
    student_id: &str,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, student_id, time_in, time_out, lab_schedule
        FROM attendance
        WHERE student_id = ?
        ORDER BY time_in DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Closed interval covering the whole calendar day: midnight through
/// 23:59:59.999 inclusive.
pub(crate) fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

/// Open an attendance record
#[utoipa::path(
    post,
    path = "/api/attendance/time-in",
    request_body = TimeInRequest,
    responses(
        (status = 201, description = "Time in recorded", body = Object, example = json!({
            "message": "Time in recorded successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn time_in(
    pool: web::Data<MySqlPool>,
    body: web::Json<TimeInRequest>,
) -> Result<HttpResponse, ApiError> {
    let record = insert_time_in(
        pool.get_ref(),
        &body.student_id,
        body.lab_schedule.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Time in recorded successfully",
        "attendance": record,
    })))
}

/// Close an attendance record. Repeated calls overwrite the time-out
/// timestamp rather than failing.
#[utoipa::path(
    patch,
    path = "/api/attendance/time-out/{id}",
    params(
        ("id", Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Time out recorded", body = Object, example = json!({
            "message": "Time out recorded successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Attendance record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn time_out(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    sqlx::query("UPDATE attendance SET time_out = ? WHERE id = ?")
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let record = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, student_id, time_in, time_out, lab_schedule FROM attendance WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::NotFound("Attendance record"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Time out recorded successfully",
        "attendance": record,
    })))
}

/// Attendance history for one student, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/student/{id}",
    params(
        ("id", Path, description = "Student profile id")
    ),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn student_history(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let records = fetch_student_history(pool.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Day report: records whose time-in falls on the given date, joined with
/// student directory fields. Admin only.
#[utoipa::path(
    get,
    path = "/api/attendance/date/{date}",
    params(
        ("date", Path, description = "Calendar day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Records for the day", body = [AttendanceWithStudent]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn by_date(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<NaiveDate>,
) -> Result<HttpResponse, ApiError> {
    require_admin(pool.get_ref(), &auth).await?;

    let (start, end) = day_bounds(path.into_inner());

    let records = sqlx::query_as::<_, AttendanceWithStudent>(
        r#"
        SELECT a.id, a.student_id, a.time_in, a.time_out, a.lab_schedule,
               s.full_name, s.student_no, s.course
        FROM attendance a
        JOIN students s ON s.id = a.student_id
        WHERE a.time_in BETWEEN ? AND ?
        ORDER BY a.time_in ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_are_closed_at_both_ends() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let (start, end) = day_bounds(date);

        let midnight = date.and_time(NaiveTime::MIN);
        let last_ms = date
            .and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
        let next_midnight = NaiveDate::from_ymd_opt(2026, 3, 15)
            .unwrap()
            .and_time(NaiveTime::MIN);

        // BETWEEN start AND end is inclusive on both ends
        assert!(midnight >= start && midnight <= end);
        assert!(last_ms >= start && last_ms <= end);
        assert!(next_midnight > end);
    }

    #[test]
    fn day_bounds_span_exactly_one_day_minus_one_millisecond() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(end - start, Duration::milliseconds(86_399_999));
    }
}
