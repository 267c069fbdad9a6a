pub mod export;
pub mod query;
