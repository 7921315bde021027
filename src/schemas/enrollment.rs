use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::repositories::enrollments::EnrollmentView;

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollRequest {
    #[serde(alias = "courseId")]
    pub(crate) course_id: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: i32,
    pub(crate) course_id: i32,
    pub(crate) enrolled_at: String,
    pub(crate) progress: i32,
    pub(crate) completed: bool,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: crate::db::models::Enrollment) -> Self {
        Self {
            id: enrollment.id,
            course_id: enrollment.course_id,
            enrolled_at: format_primitive(enrollment.enrolled_at),
            progress: enrollment.progress,
            completed: enrollment.completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollResponse {
    pub(crate) already_enrolled: bool,
    pub(crate) enrollment: EnrollmentResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentListItem {
    pub(crate) id: i32,
    pub(crate) course_id: i32,
    pub(crate) course_title: String,
    pub(crate) enrolled_at: String,
    pub(crate) progress: i32,
    pub(crate) completed: bool,
}

impl EnrollmentListItem {
    pub(crate) fn from_view(view: EnrollmentView) -> Self {
        Self {
            id: view.id,
            course_id: view.course_id,
            course_title: view.course_title,
            enrolled_at: format_primitive(view.enrolled_at),
            progress: view.progress,
            completed: view.completed,
        }
    }
}
