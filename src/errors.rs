use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::models::card::Difficulty;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("The {difficulty} deck of season {season_id} is full")]
    DeckFull {
        season_id: Uuid,
        difficulty: Difficulty,
    },

    #[error("Card number {card_number} is already used in the {difficulty} deck")]
    DuplicateCardNumber {
        difficulty: Difficulty,
        card_number: i32,
    },

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Season not found: {0}")]
    SeasonNotFound(Uuid),

    #[error("No attempts found for contestant '{0}'")]
    ContestantNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Attempt not found: {0}")]
    AttemptNotFound(Uuid),

    #[error("The {difficulty} deck of season {season_id} has no cards")]
    DeckEmpty {
        season_id: Uuid,
        difficulty: Difficulty,
    },

    #[error("Failed to record attempt: {0}")]
    AttemptRecording(#[source] Box<AppError>),

    #[error("Analytics failed: {0}")]
    Analytics(#[source] Box<AppError>),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    InternalError,
}

impl AppError {
    /// Expected rule violations that callers see unchanged.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            AppError::DeckFull { .. }
                | AppError::DuplicateCardNumber { .. }
                | AppError::CardNotFound(_)
                | AppError::SeasonNotFound(_)
                | AppError::ContestantNotFound(_)
                | AppError::UserNotFound(_)
                | AppError::AttemptNotFound(_)
                | AppError::DeckEmpty { .. }
                | AppError::BadRequest(_)
                | AppError::Forbidden(_)
        )
    }

    pub fn into_attempt_recording(self) -> Self {
        match self {
            e if e.is_business_rule() => e,
            e @ AppError::AttemptRecording(_) => e,
            e => AppError::AttemptRecording(Box::new(e)),
        }
    }

    pub fn into_analytics(self) -> Self {
        match self {
            e if e.is_business_rule() => e,
            e @ AppError::Analytics(_) => e,
            e => AppError::Analytics(Box::new(e)),
        }
    }

    pub fn to_response(&self) -> (StatusCode, String) {
        match self {
            AppError::DeckFull { .. } | AppError::DuplicateCardNumber { .. } => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::DeckEmpty { .. } => (StatusCode::CONFLICT, self.to_string()),
            AppError::CardNotFound(_)
            | AppError::SeasonNotFound(_)
            | AppError::ContestantNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::AttemptNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::AttemptRecording(_) | AppError::Analytics(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::JwtError(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected server error".into(),
            ),
        }
    }
}
