pub mod get;
pub mod patch;
pub mod post;

pub use get::{count_users_by_role, get_user_by_id, get_users};
pub use patch::update_user_role;
pub use post::create_user;
