use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, str::FromStr, time::Duration};

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Built front end to serve at the root, if any
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub word_search_size: usize,
    pub crossword_size: usize,
    pub max_grid_size: usize,
    pub max_words: usize,
    pub word_search_attempts: usize,
    pub crossword_intersect_attempts: usize,
    pub crossword_random_attempts: usize,
    /// JSON file of sample sets replacing the built-in catalog
    pub catalog_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
}

/// Smallest grid a puzzle may ask for
pub const MIN_GRID_SIZE: usize = 2;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty()),
        };

        let game = GameConfig {
            word_search_size: env_or("WORD_SEARCH_SIZE", 10)?,
            crossword_size: env_or("CROSSWORD_SIZE", 12)?,
            max_grid_size: env_or("MAX_GRID_SIZE", 30)?,
            max_words: env_or("MAX_WORDS", 40)?,
            word_search_attempts: env_or("WORD_SEARCH_ATTEMPTS", 300)?,
            crossword_intersect_attempts: env_or("CROSSWORD_INTERSECT_ATTEMPTS", 200)?,
            crossword_random_attempts: env_or("CROSSWORD_RANDOM_ATTEMPTS", 100)?,
            catalog_path: env::var("CATALOG_PATH").ok().filter(|path| !path.is_empty()),
        };

        let session = SessionConfig {
            idle_timeout_secs: env_or("SESSION_IDLE_TIMEOUT_SECS", 1800)?,
        };

        Ok(Config {
            server,
            game,
            session,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                static_dir: None,
            },
            game: GameConfig::default(),
            session: SessionConfig {
                idle_timeout_secs: 1800,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_search_size: 10,
            crossword_size: 12,
            max_grid_size: 30,
            max_words: 40,
            word_search_attempts: 300,
            crossword_intersect_attempts: 200,
            crossword_random_attempts: 100,
            catalog_path: None,
        }
    }
}

impl GameConfig {
    /// Check a puzzle request against the limits and resolve its grid size
    pub fn resolve_size(
        &self,
        word_count: usize,
        requested: Option<usize>,
        default: usize,
    ) -> Result<usize, ApiError> {
        if word_count == 0 {
            return Err(ApiError::Validation("at least one word is required".to_string()));
        }
        if word_count > self.max_words {
            return Err(ApiError::Validation(format!(
                "too many words: {} (limit {})",
                word_count, self.max_words
            )));
        }

        let size = requested.unwrap_or(default);
        if !(MIN_GRID_SIZE..=self.max_grid_size).contains(&size) {
            return Err(ApiError::Validation(format!(
                "grid size must be between {} and {}",
                MIN_GRID_SIZE, self.max_grid_size
            )));
        }
        Ok(size)
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .ok()
            .with_context(|| format!("{} must be a number", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_size_defaults_and_limits() {
        let game = GameConfig::default();
        assert_eq!(game.resolve_size(3, None, 10).unwrap(), 10);
        assert_eq!(game.resolve_size(3, Some(15), 10).unwrap(), 15);
        assert!(game.resolve_size(0, None, 10).is_err());
        assert!(game.resolve_size(41, None, 10).is_err());
        assert!(game.resolve_size(3, Some(1), 10).is_err());
        assert!(game.resolve_size(3, Some(31), 10).is_err());
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: usize = env_or("STUDY_TUTOR_TEST_UNSET_KEY", 42).unwrap();
        assert_eq!(value, 42);
    }
}
