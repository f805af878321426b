pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

pub use delete::delete_season;
pub use get::{get_season_by_id, get_season_by_name, get_seasons};
pub use patch::update_season;
pub use post::create_season;
