pub mod details;
pub mod get_name;
