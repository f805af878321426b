use uuid::Uuid;

use crate::{
    db::TriviaStore,
    errors::AppError,
    models::{
        attempt::AttemptFilter,
        season::{DeckUsageStats, NewSeason, Season, SeasonUpdate, SeasonWithStats},
    },
    services::aggregate,
};

pub async fn ensure_season(store: &dyn TriviaStore, season_id: Uuid) -> Result<Season, AppError> {
    store
        .get_season(season_id)
        .await?
        .ok_or(AppError::SeasonNotFound(season_id))
}

async fn with_stats(store: &dyn TriviaStore, season: Season) -> Result<SeasonWithStats, AppError> {
    let cards = store.list_cards(season.id, None).await?;
    let total_attempts = store
        .count_attempts(&AttemptFilter::season(season.id))
        .await?;
    let deck_counts = aggregate::deck_counts(&cards);

    Ok(SeasonWithStats {
        season,
        total_cards: deck_counts.total(),
        deck_counts,
        total_attempts,
    })
}

fn normalize_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Season name must not be empty".into()));
    }
    Ok(name.to_string())
}

pub async fn create_season(
    store: &dyn TriviaStore,
    name: &str,
    description: Option<String>,
    created_by: Uuid,
) -> Result<Season, AppError> {
    let name = normalize_name(name)?;

    if store.find_season_by_name(&name).await?.is_some() {
        return Err(AppError::BadRequest(format!(
            "Season with name '{}' already exists",
            name
        )));
    }

    let season = store
        .create_season(NewSeason {
            name,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_by_id: created_by,
        })
        .await?;

    tracing::info!("Created new season: {} (ID: {})", season.name, season.id);
    Ok(season)
}

pub async fn get_all_seasons_with_stats(
    store: &dyn TriviaStore,
) -> Result<Vec<SeasonWithStats>, AppError> {
    let seasons = store.list_seasons(None).await?;
    let mut result = Vec::with_capacity(seasons.len());
    for season in seasons {
        result.push(with_stats(store, season).await?);
    }
    Ok(result)
}

pub async fn get_seasons_by_user(
    store: &dyn TriviaStore,
    user_id: Uuid,
) -> Result<Vec<SeasonWithStats>, AppError> {
    let seasons = store.list_seasons(Some(user_id)).await?;
    let mut result = Vec::with_capacity(seasons.len());
    for season in seasons {
        result.push(with_stats(store, season).await?);
    }
    Ok(result)
}

pub async fn get_season_by_id(
    store: &dyn TriviaStore,
    season_id: Uuid,
) -> Result<SeasonWithStats, AppError> {
    let season = ensure_season(store, season_id).await?;
    with_stats(store, season).await
}

pub async fn update_season(
    store: &dyn TriviaStore,
    season_id: Uuid,
    update: SeasonUpdate,
) -> Result<Season, AppError> {
    let update = SeasonUpdate {
        name: update.name.as_deref().map(normalize_name).transpose()?,
        description: update.description.map(|d| d.trim().to_string()),
    };

    let season = store
        .update_season(season_id, update)
        .await?
        .ok_or(AppError::SeasonNotFound(season_id))?;

    tracing::info!("Updated season: {} (ID: {})", season.name, season.id);
    Ok(season)
}

pub async fn delete_season(store: &dyn TriviaStore, season_id: Uuid) -> Result<bool, AppError> {
    let deleted = store.delete_season(season_id).await?;
    if deleted {
        tracing::info!("Deleted season {}", season_id);
    }
    Ok(deleted)
}

pub async fn get_season_deck_stats(
    store: &dyn TriviaStore,
    season_id: Uuid,
) -> Result<Vec<DeckUsageStats>, AppError> {
    ensure_season(store, season_id).await?;
    let cards = store.list_cards(season_id, None).await?;
    Ok(aggregate::deck_usage_stats(&cards))
}
