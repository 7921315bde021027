use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlatformStats {
    pub(crate) total_users: i64,
    pub(crate) total_courses: i64,
    pub(crate) total_enrollments: i64,
    pub(crate) total_categories: i64,
}

pub(crate) async fn platform_totals(pool: &PgPool) -> Result<PlatformStats, sqlx::Error> {
    sqlx::query_as::<_, PlatformStats>(
        "SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM courses) AS total_courses,
            (SELECT COUNT(*) FROM enrollments) AS total_enrollments,
            (SELECT COUNT(*) FROM categories) AS total_categories",
    )
    .fetch_one(pool)
    .await
}
