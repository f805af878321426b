use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{User, user::Role},
};

pub async fn update_user_role(
    user_id: Uuid,
    role: Role,
    postgres: &PgPool,
) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET role = $2
        WHERE id = $1
        RETURNING id, name, email, role, created_at",
    )
    .bind(user_id)
    .bind(role)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to update user role: {}", e)))
}
