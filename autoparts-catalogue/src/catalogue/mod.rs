//! The catalogue tables.
//!
//! Every model shares the `source`, `updated_at` and `is_active` columns and
//! is routed to the [`CATALOGUE_DB`](crate::db::CATALOGUE_DB) alias.
//! Relationship helpers take the connection of that database, usually
//! obtained through `Model::objects(&databases)?.conn()`.

mod autoparts;
mod car;
mod category;
mod characteristic;
mod manufacturer;
mod similar;

pub use autoparts::Autoparts;
pub use car::{Car, CarPart, ManufacturerCar, ModelCar};
pub use category::Category;
pub use characteristic::{Characteristic, CharacteristicValue};
pub use manufacturer::Manufacturer;
pub use similar::SimilarPart;

use serde::Serialize;
use tracing::debug;

use crate::db::{model::Model, Databases};
use crate::{Error, Result};

/// Names of the catalogue tables, as accepted by [`dump_table`].
pub const TABLES: &[&str] = &[
    Category::NAME,
    Manufacturer::NAME,
    Autoparts::NAME,
    SimilarPart::NAME,
    Characteristic::NAME,
    CharacteristicValue::NAME,
    ManufacturerCar::NAME,
    ModelCar::NAME,
    Car::NAME,
    CarPart::NAME,
];

async fn dump<M: Model + Serialize>(databases: &Databases) -> Result<String> {
    let rows = M::objects(databases)?.all().await?;
    debug!(table = M::NAME, rows = rows.len(), "dumping");
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// All rows of a catalogue table as a pretty-printed JSON array.
pub async fn dump_table(databases: &Databases, table: &str) -> Result<String> {
    match table {
        t if t == Category::NAME => dump::<Category>(databases).await,
        t if t == Manufacturer::NAME => dump::<Manufacturer>(databases).await,
        t if t == Autoparts::NAME => dump::<Autoparts>(databases).await,
        t if t == SimilarPart::NAME => dump::<SimilarPart>(databases).await,
        t if t == Characteristic::NAME => dump::<Characteristic>(databases).await,
        t if t == CharacteristicValue::NAME => dump::<CharacteristicValue>(databases).await,
        t if t == ManufacturerCar::NAME => dump::<ManufacturerCar>(databases).await,
        t if t == ModelCar::NAME => dump::<ModelCar>(databases).await,
        t if t == Car::NAME => dump::<Car>(databases).await,
        t if t == CarPart::NAME => dump::<CarPart>(databases).await,
        other => Err(Error::UnknownTable(other.to_string())),
    }
}
