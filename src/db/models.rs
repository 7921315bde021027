use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{CourseLevel, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) bio: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Category {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) price: f64,
    pub(crate) duration: Option<String>,
    pub(crate) level: Option<CourseLevel>,
    pub(crate) instructor_id: i32,
    pub(crate) category_id: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: i32,
    pub(crate) user_id: i32,
    pub(crate) course_id: i32,
    pub(crate) enrolled_at: PrimitiveDateTime,
    pub(crate) progress: i32,
    pub(crate) completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Review {
    pub(crate) id: i32,
    pub(crate) user_id: i32,
    pub(crate) course_id: i32,
    pub(crate) rating: i32,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}
