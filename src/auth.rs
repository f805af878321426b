use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        User,
        user::{Claims, Role},
    },
    state::AppState,
};

pub struct AuthClaims(pub Claims);

impl AuthClaims {
    pub fn from_token(token: &str, secret: &str) -> Result<Self, (StatusCode, String)> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token".into()))?;

        Ok(Self(token_data.claims))
    }

    pub fn user_id(&self) -> Result<Uuid, (StatusCode, String)> {
        Uuid::parse_str(&self.0.sub).map_err(|_| {
            tracing::error!("Unauthorized access attempt");
            AppError::Unauthorized("Invalid user ID in token".into()).to_response()
        })
    }
}

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    (
                        StatusCode::UNAUTHORIZED,
                        "Missing or invalid Authorization header".into(),
                    )
                })?;

        AuthClaims::from_token(bearer.token(), &state.config.jwt_secret)
    }
}

/// The caller behind a valid token, loaded fresh so role changes apply
/// immediately.
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), (StatusCode, String)> {
        if allowed.contains(&self.0.role) {
            return Ok(());
        }
        tracing::warn!(
            "User {} with role {} denied, requires one of {:?}",
            self.0.id,
            self.0.role,
            allowed
        );
        Err(
            AppError::Forbidden(format!("Role {} is not allowed to do this", self.0.role))
                .to_response(),
        )
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = AuthClaims::from_request_parts(parts, state).await?;
        let user_id = claims.user_id()?;

        let user = state
            .store
            .get_user(user_id)
            .await
            .map_err(|e| e.to_response())?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".into()).to_response())?;

        Ok(Self(user))
    }
}

pub const MANAGERS: &[Role] = &[Role::Producer, Role::Admin];
pub const PRESENTERS: &[Role] = &[Role::Host, Role::Producer, Role::Admin];
pub const ADMINS: &[Role] = &[Role::Admin];

pub fn generate_jwt(user: &User, secret: &str, expiration_hours: i64) -> Result<String, AppError> {
    let expiration = (Utc::now() + Duration::hours(expiration_hours)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(AppError::JwtError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Pat".into(),
            email: "pat@example.com".into(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let user = user(Role::Producer);
        let token = generate_jwt(&user, "secret", 1).unwrap();
        let claims = AuthClaims::from_token(&token, "secret").unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.0.role, Role::Producer);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = generate_jwt(&user(Role::Host), "secret", 1).unwrap();
        let err = AuthClaims::from_token(&token, "other").err().unwrap();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn hosts_cannot_manage() {
        let host = AuthUser(user(Role::Host));
        assert!(host.require_role(PRESENTERS).is_ok());
        assert_eq!(
            host.require_role(MANAGERS).unwrap_err().0,
            StatusCode::FORBIDDEN
        );
    }
}
