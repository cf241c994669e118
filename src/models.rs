use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::student::Student;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Institutional student number.
    pub student_id: String,
    #[serde(default)]
    pub course: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Full student row including the credential hash. Never serialized;
/// responses go through [`Student`].
#[derive(FromRow)]
pub struct StudentAuthSql {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub student_no: String,
    pub course: Option<String>,
    pub lab_schedule: Option<String>,
    pub is_admin: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl StudentAuthSql {
    pub fn into_student(self) -> Student {
        Student {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            student_no: self.student_no,
            course: self.course,
            lab_schedule: self.lab_schedule,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// students.id of the token holder.
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}
