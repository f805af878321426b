pub mod aggregate;
pub mod analytics;
pub mod attempts;
pub mod cards;
pub mod draw;
pub mod seasons;
pub mod users;
