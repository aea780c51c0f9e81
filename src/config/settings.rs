use std::env;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Runtime settings, loaded once at startup.
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub listen_addr: String,
    pub token_secret: String,
    pub token_expire_minutes: i64,
    pub static_dir: Option<String>,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// `TOKEN_SECRET` has no default; the server must not start with a
    /// guessable signing key.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://stockroom.db?mode=rwc".to_string());

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let token_secret =
            env::var("TOKEN_SECRET").map_err(|_| SettingsError::MissingVar("TOKEN_SECRET"))?;

        let token_expire_minutes = match env::var("TOKEN_EXPIRE_MINUTES") {
            Ok(value) => value.parse().map_err(|_| SettingsError::InvalidVar {
                name: "TOKEN_EXPIRE_MINUTES",
                value,
            })?,
            Err(_) => 480,
        };

        let static_dir = env::var("STATIC_DIR").ok();

        Ok(Self {
            database_url,
            listen_addr,
            token_secret,
            token_expire_minutes,
            static_dir,
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("listen_addr", &self.listen_addr)
            .field("token_secret", &"<redacted>")
            .field("token_expire_minutes", &self.token_expire_minutes)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}
