use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::student::Student;

/// The structured payload encoded into a student's QR image and decoded on
/// intake. Field names are camelCase on the wire so existing scanner apps
/// keep working. `student_id` carries the institutional number, not the
/// profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "studentId": "2021-00123",
        "fullName": "Juan Dela Cruz",
        "course": "BSCS",
        "labSchedule": "MWF 10:00-12:00"
    })
)]
pub struct QrPayload {
    #[schema(example = "2021-00123")]
    pub student_id: String,

    #[schema(example = "Juan Dela Cruz")]
    pub full_name: String,

    #[serde(default)]
    #[schema(example = "BSCS", nullable = true)]
    pub course: Option<String>,

    #[serde(default)]
    #[schema(example = "MWF 10:00-12:00", nullable = true)]
    pub lab_schedule: Option<String>,
}

impl QrPayload {
    pub fn from_student(student: &Student) -> Self {
        Self {
            student_id: student.student_no.clone(),
            full_name: student.full_name.clone(),
            course: student.course.clone(),
            lab_schedule: student.lab_schedule.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QrPayload {
        QrPayload {
            student_id: "2021-00123".into(),
            full_name: "Juan Dela Cruz".into(),
            course: Some("BSCS".into()),
            lab_schedule: Some("MWF 10:00-12:00".into()),
        }
    }

    #[test]
    fn payload_is_camel_case_on_the_wire() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["studentId"], "2021-00123");
        assert_eq!(json["fullName"], "Juan Dela Cruz");
        assert_eq!(json["labSchedule"], "MWF 10:00-12:00");
    }

    #[test]
    fn payload_round_trips() {
        let payload = sample();
        let json = serde_json::to_string(&payload).unwrap();
        let back: QrPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let back: QrPayload =
            serde_json::from_str(r#"{"studentId":"2021-00123","fullName":"Juan Dela Cruz"}"#)
                .unwrap();
        assert_eq!(back.course, None);
        assert_eq!(back.lab_schedule, None);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        assert!(serde_json::from_str::<QrPayload>(r#"{"fullName":"Juan Dela Cruz"}"#).is_err());
        assert!(serde_json::from_str::<QrPayload>("not json").is_err());
    }
}
