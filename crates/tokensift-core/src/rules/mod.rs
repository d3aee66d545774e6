pub mod catalog;
pub mod finding;
pub mod score;
