use crate::api::attendance::TimeInRequest;
use crate::api::qr::ScanRequest;
use crate::api::students::UpdateStudent;
use crate::model::attendance::{AttendanceRecord, AttendanceWithStudent};
use crate::model::qr_code::QrPayload;
use crate::model::student::Student;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SwiftPass API",
        version = "1.0.0",
        description = r#"
## SwiftPass — student attendance tracking

Students register and receive a QR-encoded identity; staff scan it to log
time-in/time-out events against a lab schedule.

### Key Features
- **Student Directory** — profiles with course and lab-schedule tags
- **Attendance Ledger** — time-in/time-out records, per-student and per-day views
- **QR Issuance & Intake** — QR image generation and scan-to-attend

### Security
All routes except register/login require **JWT Bearer authentication**.
Listing and day-report endpoints additionally require the admin flag.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::students::get_student,
        crate::api::students::update_student,
        crate::api::students::list_students,

        crate::api::attendance::time_in,
        crate::api::attendance::time_out,
        crate::api::attendance::student_history,
        crate::api::attendance::by_date,

        crate::api::qr::generate,
        crate::api::qr::scan,
        crate::api::qr::history,
    ),
    components(
        schemas(
            Student,
            UpdateStudent,
            AttendanceRecord,
            AttendanceWithStudent,
            TimeInRequest,
            ScanRequest,
            QrPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Students", description = "Student directory APIs"),
        (name = "Attendance", description = "Attendance ledger APIs"),
        (name = "QR", description = "QR issuance and intake APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
