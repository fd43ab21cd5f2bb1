pub mod boundaries;
pub mod parse;
pub mod shift;
