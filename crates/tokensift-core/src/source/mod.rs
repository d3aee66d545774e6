pub mod model;
pub mod parse;
pub mod patterns;
pub mod read;
