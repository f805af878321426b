pub mod analytics;
pub mod attempt;
pub mod card;
pub mod pagination;
pub mod season;
pub mod user;

pub use user::User;
