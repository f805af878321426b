pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

pub use delete::delete_card;
pub use get::{
    count_cards, get_card_by_id, get_card_numbers, get_cards, get_least_used_cards,
    get_unused_cards,
};
pub use patch::{increment_usage, reset_deck_usage, update_card};
pub use post::create_card;
