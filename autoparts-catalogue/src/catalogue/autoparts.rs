use serde::Serialize;
use tracing::debug;

use crate::prelude::*;
use crate::urls::reverse_pk;

/// A part as scraped from a supplier's site.
#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_autoparts",
    db = "catalogue_db",
    ordering = "title",
    verbose_name = "Autopart",
    verbose_name_plural = "Autopart"
)]
pub struct Autoparts {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(foreign_key = Category.id, on_delete = "cascade")]
    pub category_id: Option<Integer>,
    #[field(size = 255, index = true)]
    pub title: String,
    #[field(foreign_key = Manufacturer.id, on_delete = "cascade")]
    pub manufacturer_id: Option<Integer>,
    #[field(size = 255, index = true)]
    pub article: String,
    /// Links the part with goods of the main database.
    #[field(size = 255)]
    pub product_number: Option<String>,
    #[field(size = 255, url = true)]
    pub url: String,
    pub description: Option<Text>,
    /// Key of the vehicle in the remote source.
    #[field(size = 40)]
    pub usedin_key: Option<String>,
}

impl Autoparts {
    fn id(&self) -> Result<i32> {
        self.pk().ok_or(Error::DoesNotExist(Self::MODEL))
    }

    pub async fn category(&self, conn: &Connection) -> Result<Option<Category>> {
        match self.category_id {
            Some(category_id) => Category::get(kwargs!(id = category_id), conn).await,
            None => Ok(None),
        }
    }

    pub async fn manufacturer(&self, conn: &Connection) -> Result<Option<Manufacturer>> {
        match self.manufacturer_id {
            Some(manufacturer_id) => Manufacturer::get(kwargs!(id = manufacturer_id), conn).await,
            None => Ok(None),
        }
    }

    pub async fn characteristic_values(&self, conn: &Connection) -> Result<Vec<CharacteristicValue>> {
        let id = self.id()?;
        CharacteristicValue::filter(kwargs!(product_id = id), conn).await
    }

    /// Characteristics this part has a value for.
    pub async fn characteristics(&self, conn: &Connection) -> Result<Vec<Characteristic>> {
        let id = self.id()?;
        select!(Characteristic)
            .inner_join::<CharacteristicValue>(kwargs!(
                Characteristic.id == @CharacteristicValue.characteristic_id
            ))
            .r#where(kwargs!(CharacteristicValue.product_id == id))
            .order_by(&["Characteristic.id"])
            .fetch_all(conn)
            .await
    }

    /// Stores `value` for `characteristic`, replacing the previous value.
    pub async fn set_characteristic(
        &self,
        characteristic: &Characteristic,
        value: &str,
        conn: &Connection,
    ) -> Result<CharacteristicValue> {
        let product_id = self.id()?;
        let characteristic_id = characteristic
            .pk()
            .ok_or(Error::DoesNotExist(Characteristic::MODEL))?;

        let existing = CharacteristicValue::get(
            kwargs!(characteristic_id = characteristic_id, product_id = product_id),
            conn,
        )
        .await?;

        let id = match existing {
            Some(mut row) => {
                debug!(product_id, characteristic_id, "replacing characteristic value");
                row.characteristic_value = value.to_string();
                row.update(conn).await?;
                row.pk().ok_or(Error::DoesNotExist(CharacteristicValue::MODEL))?
            }
            None => {
                CharacteristicValue {
                    characteristic_value: value.to_string(),
                    product_id,
                    characteristic_id,
                    ..Default::default()
                }
                .save(conn)
                .await?
            }
        };
        CharacteristicValue::get_by_pk(id, conn).await
    }

    /// Parts linked as similar to this one, highest ranking first.
    pub async fn similar_products(&self, conn: &Connection) -> Result<Vec<Autoparts>> {
        let id = self.id()?;
        select!(Autoparts)
            .inner_join::<SimilarPart>(kwargs!(Autoparts.id == @SimilarPart.similar_id))
            .r#where(kwargs!(SimilarPart.primary_id == id))
            .order_by(&["-SimilarPart.ranking", "Autoparts.title"])
            .fetch_all(conn)
            .await
    }

    pub async fn add_similar(
        &self,
        similar: &Autoparts,
        ranking: i32,
        conn: &Connection,
    ) -> Result<SimilarPart> {
        let link = SimilarPart {
            primary_id: self.id()?,
            similar_id: similar.id()?,
            ranking,
            ..Default::default()
        };
        let id = link.save(conn).await?;
        SimilarPart::get_by_pk(id, conn).await
    }

    /// Vehicles this part fits.
    pub async fn cars(&self, conn: &Connection) -> Result<Vec<Car>> {
        let id = self.id()?;
        select!(Car)
            .inner_join::<CarPart>(kwargs!(Car.id == @CarPart.car_id))
            .r#where(kwargs!(CarPart.autoparts_id == id))
            .fetch_all(conn)
            .await
    }

    /// `{manufacturer name} : {article} - {title}`; a part without a
    /// manufacturer renders an empty name.
    pub fn label(&self, manufacturer: Option<&Manufacturer>) -> String {
        let name = manufacturer
            .and_then(|m| m.name.as_deref())
            .unwrap_or_default();
        format!("{name} : {} - {}", self.article, self.title)
    }

    pub async fn describe(&self, conn: &Connection) -> Result<String> {
        let manufacturer = self.manufacturer(conn).await?;
        Ok(self.label(manufacturer.as_ref()))
    }
}

impl AbsoluteUrl for Autoparts {
    fn get_absolute_url(&self) -> Result<String> {
        reverse_pk("catalogue:products", self.id)
    }
}
