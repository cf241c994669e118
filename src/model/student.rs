use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "5c4f7a52-1f0b-4c1e-9f37-3a8f6d2f9b10",
        "email": "juan.delacruz@university.edu",
        "full_name": "Juan Dela Cruz",
        "student_no": "2021-00123",
        "course": "BSCS",
        "lab_schedule": "MWF 10:00-12:00",
        "is_admin": false,
        "created_at": "2026-01-01T00:00:00Z"
    })
)]
pub struct Student {
    #[schema(example = "5c4f7a52-1f0b-4c1e-9f37-3a8f6d2f9b10")]
    pub id: String,

    #[schema(example = "juan.delacruz@university.edu")]
    pub email: String,

    #[schema(example = "Juan Dela Cruz")]
    pub full_name: String,

    /// Institutional student number, distinct from the profile id.
    #[schema(example = "2021-00123")]
    pub student_no: String,

    #[schema(example = "BSCS", nullable = true)]
    pub course: Option<String>,

    #[schema(example = "MWF 10:00-12:00", nullable = true)]
    pub lab_schedule: Option<String>,

    #[schema(example = false)]
    pub is_admin: bool,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
