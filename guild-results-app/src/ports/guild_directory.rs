use crate::domain::{GuildId, RepoRetrieveError};

#[async_trait::async_trait]
pub trait GuildDirectory {
    async fn get_guild_name(&self, guild_id: GuildId) -> Result<String, RepoRetrieveError>;
}

#[cfg(test)]
#[derive(Default, Clone)]
pub struct MockGuildDirectory {
    pub names: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<GuildId, String>>>,
    pub broken: bool,
}

#[cfg(test)]
impl MockGuildDirectory {
    pub fn with(guild_id: GuildId, name: &str) -> Self {
        let directory = Self::default();
        directory
            .names
            .lock()
            .unwrap()
            .insert(guild_id, name.to_string());
        directory
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl GuildDirectory for MockGuildDirectory {
    async fn get_guild_name(&self, guild_id: GuildId) -> Result<String, RepoRetrieveError> {
        if self.broken {
            return Err(RepoRetrieveError::StorageError("timed out".to_string()));
        }
        self.names
            .lock()
            .unwrap()
            .get(&guild_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }
}
