use crate::domain::{GuildId, RepoRetrieveError, result::GameResult};

pub mod guild;
pub mod results;

/// Outcome of a failed store lookup, already logged.
pub enum LookupError {
    NotFound,
    Storage,
}

/// A stored item without any games counts as missing.
pub(crate) fn require_results(
    guild_id: GuildId,
    lookup: Result<Vec<GameResult>, RepoRetrieveError>,
) -> Result<Vec<GameResult>, LookupError> {
    match lookup {
        Ok(results) if results.is_empty() => Err(LookupError::NotFound),
        Ok(results) => Ok(results),
        Err(RepoRetrieveError::NotFound) => Err(LookupError::NotFound),
        Err(RepoRetrieveError::StorageError(e)) => {
            log::error!("Error retrieving results for guild {}: {}", guild_id, e);
            Err(LookupError::Storage)
        }
    }
}

pub(crate) fn optional_name(
    guild_id: GuildId,
    lookup: Result<String, RepoRetrieveError>,
) -> Result<Option<String>, LookupError> {
    match lookup {
        Ok(name) => Ok(Some(name)),
        Err(RepoRetrieveError::NotFound) => Ok(None),
        Err(RepoRetrieveError::StorageError(e)) => {
            log::error!("Error retrieving name of guild {}: {}", guild_id, e);
            Err(LookupError::Storage)
        }
    }
}
