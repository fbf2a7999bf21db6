use std::fmt;

use serde::Serialize;

use crate::prelude::*;
use crate::urls::reverse_pk;
use crate::utils::non_blank;

/// Name of a product attribute, e.g. "Width".
#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_characteristic",
    db = "catalogue_db",
    verbose_name = "Crawler Product Characteristic Name",
    verbose_name_plural = "Crawler Product Characteristic Names"
)]
pub struct Characteristic {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    /// Author of the name.
    #[field(size = 120, default = "")]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    /// Name as scraped; see [`Characteristic::name`].
    #[field(column = "_name", size = 150, unique = true)]
    #[sqlx(rename = "_name")]
    #[serde(rename = "_name")]
    pub raw_name: String,
    #[field(size = 150)]
    pub replacement_name: Option<String>,
}

impl Characteristic {
    /// Replacement name when set, the scraped name otherwise.
    pub fn name(&self) -> &str {
        non_blank(&self.replacement_name).unwrap_or(&self.raw_name)
    }

    pub async fn values(&self, conn: &Connection) -> Result<Vec<CharacteristicValue>> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        CharacteristicValue::filter(kwargs!(characteristic_id = id), conn).await
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AbsoluteUrl for Characteristic {
    fn get_absolute_url(&self) -> Result<String> {
        reverse_pk("catalogue:characteristic-edit", self.id)
    }
}

/// Value of one characteristic for one product.
#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_characteristicvalue",
    db = "catalogue_db",
    ordering = "characteristic_id",
    unique_together = ["characteristic_id, product_id"],
    verbose_name = "Characteristic Value"
)]
pub struct CharacteristicValue {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(size = 150)]
    pub characteristic_value: String,
    #[field(foreign_key = Autoparts.id, on_delete = "cascade")]
    pub product_id: Integer,
    #[field(foreign_key = Characteristic.id, on_delete = "cascade")]
    pub characteristic_id: Integer,
}

impl CharacteristicValue {
    pub async fn product(&self, conn: &Connection) -> Result<Autoparts> {
        Autoparts::get_by_pk(self.product_id, conn).await
    }

    pub async fn characteristic(&self, conn: &Connection) -> Result<Characteristic> {
        Characteristic::get_by_pk(self.characteristic_id, conn).await
    }

    /// `{id}. Product {article}; {characteristic name}: {value}`
    pub fn label(&self, product: &Autoparts, characteristic: &Characteristic) -> String {
        let id = self.id.map(|id| id.to_string()).unwrap_or_default();
        format!(
            "{id}. Product {}; {}: {}",
            product.article,
            characteristic.name(),
            self.characteristic_value
        )
    }

    pub async fn describe(&self, conn: &Connection) -> Result<String> {
        let product = self.product(conn).await?;
        let characteristic = self.characteristic(conn).await?;
        Ok(self.label(&product, &characteristic))
    }
}

impl AbsoluteUrl for CharacteristicValue {
    fn get_absolute_url(&self) -> Result<String> {
        reverse_pk("catalogue:product-characteristics-view", self.id)
    }
}
