//! Auto-parts catalogue: categories, manufacturers, parts with their
//! characteristics and similar parts, and the vehicles each part fits.
//!
//! Models are declared with `#[derive(Model)]` and stored through
//! `sqlx::Any`, so the same code runs on SQLite, PostgreSQL and MySQL.
extern crate self as autoparts_catalogue;

/// This module contains the macros used in the crate.
#[macro_use]
mod macros;

/// This module contains the database-related functionality.
pub mod db;

/// The catalogue models and their relationships.
pub mod catalogue;

/// This module contains the prelude for the crate.
pub mod prelude;

pub mod settings;

/// This module contains the custom types used in the crate.
pub mod types;

pub mod urls;

pub mod utils;

mod error;

pub use error::{Error, Result};

pub use async_trait;
pub use inventory;
pub use sqlx;
