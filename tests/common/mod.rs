#![allow(dead_code)]

use std::sync::Arc;

use deckshow_be::{
    db::{MemoryStore, TriviaStore},
    models::{
        User,
        card::{Card, Difficulty},
        season::Season,
        user::{NewUser, Role},
    },
    services::{cards, seasons},
};
use rand::{SeedableRng, rngs::StdRng};
use uuid::Uuid;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub async fn user_with_role(store: &MemoryStore, role: Role) -> User {
    let tag = Uuid::new_v4().simple().to_string();
    store
        .create_user(NewUser {
            name: format!("{:?} {}", role, &tag[..6]),
            email: format!("{}@deckshow.test", tag),
            role,
        })
        .await
        .unwrap()
}

pub async fn season(store: &MemoryStore, name: &str) -> (User, Season) {
    let producer = user_with_role(store, Role::Producer).await;
    let season = seasons::create_season(store, name, None, producer.id)
        .await
        .unwrap();
    (producer, season)
}

/// Fills `count` cards of one deck, numbered from 1.
pub async fn fill_deck(
    store: &MemoryStore,
    season_id: Uuid,
    difficulty: Difficulty,
    count: i32,
) -> Vec<Card> {
    let mut created = Vec::new();
    for n in 1..=count {
        created.push(
            cards::create_card(
                store,
                season_id,
                difficulty,
                n,
                &format!("{} question {}", difficulty, n),
                &format!("answer {}", n),
            )
            .await
            .unwrap(),
        );
    }
    created
}
