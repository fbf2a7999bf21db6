use thiserror::Error;

/// Errors raised by the catalogue data layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database alias '{0}' is not configured")]
    UnknownDatabase(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {model}.{field}: {message}")]
    Validation {
        model: &'static str,
        field: &'static str,
        message: String,
    },

    #[error("{0} matching query does not exist")]
    DoesNotExist(&'static str),

    #[error("reverse for '{0}' not found")]
    NoReverseMatch(String),

    #[error("foreign keys form a cycle between tables: {0}")]
    MigrationCycle(String),

    #[error("unknown catalogue table '{0}'")]
    UnknownTable(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn validation(
        model: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            model,
            field,
            message: message.into(),
        }
    }
}
