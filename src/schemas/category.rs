use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CategoryCreate {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub(crate) name: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "description cannot exceed 200 characters"))]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryResponse {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
}

impl CategoryResponse {
    pub(crate) fn from_db(category: crate::db::models::Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: format_primitive(category.created_at),
        }
    }
}
