use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("Web Development", "Build websites and web applications"),
    ("Data Science", "Analyze and visualize data"),
    ("Mobile Development", "Create mobile apps"),
    ("Design", "UI/UX and graphic design"),
    ("Business", "Business and entrepreneurship"),
    ("Marketing", "Digital marketing strategies"),
];

/// Seed the baseline admin account and course categories. Skips silently if
/// an admin with the configured seed email already exists.
pub(crate) async fn seed_baseline_data(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_admin_password.is_empty() {
        tracing::warn!("FIRST_ADMIN_PASSWORD not configured; skipping baseline seed");
        return Ok(());
    }

    let existing =
        repositories::users::find_by_email(state.db(), &admin.first_admin_email).await?;
    if existing.is_some() {
        tracing::info!("Baseline admin already exists; skipping seed");
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_admin_password)?;
    let now = primitive_now_utc();

    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            name: &admin.first_admin_name,
            email: &admin.first_admin_email,
            hashed_password,
            role: UserRole::Admin,
            created_at: now,
        },
    )
    .await?;

    for (name, description) in SEED_CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (name, description, created_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(state.db())
        .await?;
    }

    tracing::info!(
        admin_email = %admin.first_admin_email,
        categories = SEED_CATEGORIES.len(),
        "Seeded baseline admin and categories"
    );
    Ok(())
}
