use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::types::CourseLevel;
use crate::schemas::review::ReviewResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 5, max = 200, message = "title must be between 5 and 200 characters"))]
    pub(crate) title: String,
    #[validate(length(min = 20, message = "description must be at least 20 characters"))]
    pub(crate) description: String,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub(crate) price: f64,
    #[serde(default)]
    #[validate(length(max = 50, message = "duration cannot exceed 50 characters"))]
    pub(crate) duration: Option<String>,
    #[serde(default)]
    pub(crate) level: Option<CourseLevel>,
    #[serde(alias = "categoryId")]
    pub(crate) category_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    #[validate(length(min = 5, max = 200, message = "title must be between 5 and 200 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 20, message = "description must be at least 20 characters"))]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub(crate) price: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 50, message = "duration cannot exceed 50 characters"))]
    pub(crate) duration: Option<String>,
    #[serde(default)]
    pub(crate) level: Option<CourseLevel>,
    #[serde(default)]
    #[serde(alias = "categoryId")]
    pub(crate) category_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) price: f64,
    pub(crate) duration: Option<String>,
    pub(crate) level: Option<CourseLevel>,
    pub(crate) instructor_id: i32,
    pub(crate) category_id: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: crate::db::models::Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            price: course.price,
            duration: course.duration,
            level: course.level,
            instructor_id: course.instructor_id,
            category_id: course.category_id,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseDetailResponse {
    pub(crate) course: CourseResponse,
    pub(crate) enrollment_count: i64,
    pub(crate) average_rating: f64,
    pub(crate) is_enrolled: bool,
    pub(crate) reviews: Vec<ReviewResponse>,
}
