//! Database settings, read from the environment (and `.env`).
//!
//! | Variable                   | Alias          | Required                       |
//! |----------------------------|----------------|--------------------------------|
//! | `DATABASE_URL`             | `default`      | yes                            |
//! | `CATALOGUE_DATABASE_URL`   | `catalogue_db` | no, falls back to DATABASE_URL |
//! | `DATABASE_MAX_CONNECTIONS` | all            | no, defaults to 5              |
use std::collections::BTreeMap;
use std::env;

use crate::db::{CATALOGUE_DB, DEFAULT_DB};
use crate::{Error, Result};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub databases: BTreeMap<String, DatabaseSettings>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, alias: impl Into<String>, database: DatabaseSettings) -> Self {
        self.databases.insert(alias.into(), database);
        self
    }

    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default_url = lookup("DATABASE_URL")
            .ok_or_else(|| Error::Config("DATABASE_URL is not set".to_string()))?;
        let catalogue_url = lookup("CATALOGUE_DATABASE_URL").unwrap_or_else(|| default_url.clone());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse::<u32>().map_err(|e| {
                Error::Config(format!("DATABASE_MAX_CONNECTIONS '{value}' is invalid: {e}"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self::new()
            .with_database(
                DEFAULT_DB,
                DatabaseSettings::new(default_url).max_connections(max_connections),
            )
            .with_database(
                CATALOGUE_DB,
                DatabaseSettings::new(catalogue_url).max_connections(max_connections),
            ))
    }
}
