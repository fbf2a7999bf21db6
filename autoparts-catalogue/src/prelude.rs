pub use sqlx::FromRow;

pub use super::catalogue::{
    Autoparts, Car, CarPart, Category, Characteristic, CharacteristicValue, Manufacturer,
    ManufacturerCar, ModelCar, SimilarPart,
};
pub use super::db::{
    manager::Manager,
    model::{Delete, Model},
    query::{And, Kwargs, Or, Statement, Value},
    Backend, Connection, Database, Databases, CATALOGUE_DB, DEFAULT_DB,
};
pub use super::settings::{DatabaseSettings, Settings};
pub use super::types::*;
pub use super::urls::AbsoluteUrl;
pub use super::{kwargs, select, Error, Result};
pub use async_trait::async_trait;
pub use autoparts_catalogue_derive::Model;
