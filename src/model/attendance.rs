use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A record is "open" while `time_out` is null and "closed" once it is set.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    /// Profile id of the student (students.id).
    #[schema(example = "5c4f7a52-1f0b-4c1e-9f37-3a8f6d2f9b10")]
    pub student_id: String,

    #[schema(example = "2026-01-01T08:00:00", format = "date-time", value_type = String)]
    pub time_in: NaiveDateTime,

    #[schema(example = "2026-01-01T12:00:00", format = "date-time", value_type = String, nullable = true)]
    pub time_out: Option<NaiveDateTime>,

    /// Copied from the request at creation time, never re-derived.
    #[schema(example = "MWF 10:00-12:00", nullable = true)]
    pub lab_schedule: Option<String>,
}

/// Day-report row: attendance joined with the owning student's directory fields.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceWithStudent {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "5c4f7a52-1f0b-4c1e-9f37-3a8f6d2f9b10")]
    pub student_id: String,

    #[schema(example = "2026-01-01T08:00:00", format = "date-time", value_type = String)]
    pub time_in: NaiveDateTime,

    #[schema(example = "2026-01-01T12:00:00", format = "date-time", value_type = String, nullable = true)]
    pub time_out: Option<NaiveDateTime>,

    #[schema(example = "MWF 10:00-12:00", nullable = true)]
    pub lab_schedule: Option<String>,

    #[schema(example = "Juan Dela Cruz")]
    pub full_name: String,

    #[schema(example = "2021-00123")]
    pub student_no: String,

    #[schema(example = "BSCS", nullable = true)]
    pub course: Option<String>,
}
