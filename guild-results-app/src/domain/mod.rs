use std::str::FromStr;

use thiserror::Error;

pub mod export;
pub mod result;

/// Key under which a guild's records and display name are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GuildId(pub u64);

impl GuildId {
    pub fn as_key(&self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GuildId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(GuildId)
    }
}

#[derive(Debug, Error)]
pub enum RepoRetrieveError {
    #[error("resource not found")]
    NotFound,

    #[error("storage error: {0}")]
    StorageError(String),
}
