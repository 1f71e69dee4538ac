//! Session configuration.
//!
//! The bot needs four facts from its settings: who its master is, what
//! its own character is called, which other names belong to bots, and how
//! many players a game holds. They're read once and never change during a
//! session.

use std::path::Path;

use serde::Deserialize;

use crate::SessionError;

/// Default game capacity when the config doesn't say.
pub const DEFAULT_MAX_PLAYERS: usize = 8;

fn default_max_players() -> usize {
    DEFAULT_MAX_PLAYERS
}

/// Read-only settings for one game session.
///
/// Every name comparison against these fields is ASCII case-insensitive.
///
/// ```toml
/// master_name = "Boss"
/// character_name = "IdleBot"
/// bot_names = ["IdleBot2", "IdleBot3"]
/// max_players = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// The only sender whose chat commands are obeyed.
    pub master_name: String,

    /// Our own character. Never invited to a party.
    pub character_name: String,

    /// Names reported as bots in player-count events.
    #[serde(default)]
    pub bot_names: Vec<String>,

    /// Capacity reported alongside the player count.
    #[serde(default = "default_max_players")]
    pub max_players: usize,
}

impl SessionConfig {
    /// Creates a config with no known bots and the default capacity.
    pub fn new(
        master_name: impl Into<String>,
        character_name: impl Into<String>,
    ) -> Self {
        Self {
            master_name: master_name.into(),
            character_name: character_name.into(),
            bot_names: Vec::new(),
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }

    pub fn with_bot_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bot_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// - [`SessionError::ConfigParse`] if the TOML is malformed or a
    ///   required field is missing
    /// - [`SessionError::InvalidConfig`] if a field has an unusable value
    pub fn from_toml_str(text: &str) -> Result<Self, SessionError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    /// Everything [`from_toml_str`](Self::from_toml_str) returns, plus
    /// [`SessionError::ConfigRead`] if the file can't be read.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|source| {
            SessionError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded session config");
        Ok(config)
    }

    /// Checks the fields a session can't work without.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.master_name.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "master_name must not be empty".into(),
            ));
        }
        if self.character_name.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "character_name must not be empty".into(),
            ));
        }
        if self.max_players == 0 {
            return Err(SessionError::InvalidConfig(
                "max_players must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn is_master(&self, name: &str) -> bool {
        self.master_name.eq_ignore_ascii_case(name)
    }

    pub fn is_self(&self, name: &str) -> bool {
        self.character_name.eq_ignore_ascii_case(name)
    }

    pub fn is_bot(&self, name: &str) -> bool {
        self.bot_names.iter().any(|bot| bot.eq_ignore_ascii_case(name))
    }
}
