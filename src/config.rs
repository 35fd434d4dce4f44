use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::Error;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3001";
const DEFAULT_DATABASE_URL: &str = "sqlite://catalog.db";
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
const DEFAULT_MAX_UPLOAD_BYTES: &str = "5242880";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub upload: UploadSettings,
    pub seed: bool,
}

#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub root: PathBuf,
    pub max_bytes: usize,
}

impl Config {
    /// Reads the process environment, after merging in a `.env` file when one
    /// is present.
    pub fn load() -> Result<Config, Error> {
        match dotenvy::dotenv() {
            Ok(path) => info!("loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => warn!("ignoring unreadable .env file: {}", err),
        }

        Ok(Config {
            bind_address: try_load("CATALOG_BIND_ADDRESS", DEFAULT_BIND_ADDRESS)?,
            database_url: try_load("CATALOG_DATABASE_URL", DEFAULT_DATABASE_URL)?,
            upload: UploadSettings {
                root: try_load("CATALOG_UPLOAD_DIR", DEFAULT_UPLOAD_DIR)?,
                max_bytes: try_load("CATALOG_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
            seed: try_load("CATALOG_SEED", "false")?,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });

    value.parse().map_err(|err: T::Err| {
        warn!("invalid {} value {:?}: {}", key, value, err);
        Error::InvalidConfig {
            key,
            value: value.clone(),
        }
    })
}
