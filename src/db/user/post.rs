use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{User, user::NewUser},
};

pub async fn create_user(user: NewUser, postgres: &PgPool) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, role, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.role)
    .fetch_one(postgres)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::BadRequest(format!("Email '{}' is already registered", user.email))
        }
        e => AppError::DatabaseError(format!("Failed to create user: {}", e)),
    })
}
