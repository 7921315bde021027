use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ReviewCreate {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub(crate) rating: i32,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewResponse {
    pub(crate) id: i32,
    pub(crate) user_id: i32,
    pub(crate) course_id: i32,
    pub(crate) rating: i32,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: String,
}

impl ReviewResponse {
    pub(crate) fn from_db(review: crate::db::models::Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            course_id: review.course_id,
            rating: review.rating,
            comment: review.comment,
            created_at: format_primitive(review.created_at),
        }
    }
}
