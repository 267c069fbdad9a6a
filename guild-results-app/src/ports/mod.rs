pub mod guild_directory;
