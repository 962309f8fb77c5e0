pub mod date;
pub mod pattern;

pub use date::parse_date;
pub use pattern::PatternValidator;
