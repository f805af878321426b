use uuid::Uuid;

use crate::{
    db::TriviaStore,
    errors::AppError,
    models::{
        User,
        pagination::{PageRequest, Paginated},
        user::{NewUser, Role, RoleStats},
    },
};

pub async fn create_user(
    store: &dyn TriviaStore,
    name: &str,
    email: &str,
) -> Result<User, AppError> {
    let name = name.trim();
    let email = email.trim().to_lowercase();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }

    let user = store
        .create_user(NewUser {
            name: name.to_string(),
            email,
            role: Role::Host,
        })
        .await?;

    tracing::info!("User created: {} ({})", user.email, user.id);
    Ok(user)
}

pub async fn get_users(
    store: &dyn TriviaStore,
    role: Option<Role>,
    page: PageRequest,
) -> Result<Paginated<User>, AppError> {
    let (users, total) = store.list_users(role, page).await?;
    Ok(Paginated::new(users, total, page))
}

pub async fn get_user_by_id(store: &dyn TriviaStore, user_id: Uuid) -> Result<User, AppError> {
    store
        .get_user(user_id)
        .await?
        .ok_or(AppError::UserNotFound(user_id))
}

pub async fn update_user_role(
    store: &dyn TriviaStore,
    actor_id: Uuid,
    target_id: Uuid,
    role: Role,
) -> Result<User, AppError> {
    if actor_id == target_id {
        return Err(AppError::Forbidden("You cannot change your own role".into()));
    }

    let user = store
        .update_user_role(target_id, role)
        .await?
        .ok_or(AppError::UserNotFound(target_id))?;

    tracing::info!("User {} role changed to {} by {}", user.id, role, actor_id);
    Ok(user)
}

pub async fn get_role_stats(store: &dyn TriviaStore) -> Result<RoleStats, AppError> {
    let counts = store.count_users_by_role().await?;
    let mut stats = RoleStats::default();
    for (role, count) in counts {
        match role {
            Role::Host => stats.host += count,
            Role::Producer => stats.producer += count,
            Role::Admin => stats.admin += count,
        }
        stats.total += count;
    }
    Ok(stats)
}
