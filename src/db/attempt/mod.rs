pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

pub use delete::delete_attempt;
pub use get::{count_attempts, get_attempts};
pub use patch::set_attempt_correctness;
pub use post::record_attempt;
