//! Vehicle compatibility: car makers, their models, concrete vehicle types
//! and the parts fitting each vehicle.
use std::fmt;

use serde::Serialize;

use crate::prelude::*;

#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_manufacturercar",
    db = "catalogue_db",
    ordering = "name",
    verbose_name = "Car manufacturer"
)]
pub struct ManufacturerCar {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(size = 150, unique = true, index = true)]
    pub name: String,
}

impl ManufacturerCar {
    pub async fn models(&self, conn: &Connection) -> Result<Vec<ModelCar>> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        select!(ModelCar)
            .r#where(kwargs!(manufacturer_id = id))
            .order_by(&["ModelCar.name"])
            .fetch_all(conn)
            .await
    }
}

impl fmt::Display for ManufacturerCar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_modelcar",
    db = "catalogue_db",
    unique_together = ["name, manufacturer_id"],
    verbose_name = "Car model"
)]
pub struct ModelCar {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(size = 150, index = true)]
    pub name: String,
    #[field(foreign_key = ManufacturerCar.id, on_delete = "cascade")]
    pub manufacturer_id: Integer,
}

impl ModelCar {
    pub async fn manufacturer(&self, conn: &Connection) -> Result<ManufacturerCar> {
        ManufacturerCar::get_by_pk(self.manufacturer_id, conn).await
    }

    pub async fn cars(&self, conn: &Connection) -> Result<Vec<Car>> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        select!(Car)
            .r#where(kwargs!(model_id = id))
            .order_by(&["Car.type"])
            .fetch_all(conn)
            .await
    }
}

impl fmt::Display for ModelCar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One engine/body variant of a car model.
#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_car",
    db = "catalogue_db",
    unique_together = ["model_id, type"],
    verbose_name = "Car"
)]
pub struct Car {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(foreign_key = ModelCar.id, on_delete = "cascade")]
    pub model_id: Integer,
    #[field(column = "type", size = 150, index = true)]
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub car_type: String,
    #[field(size = 150)]
    pub construction: Option<String>,
    #[field(positive = true)]
    pub volume_cm: Option<SmallInteger>,
    #[field(positive = true)]
    pub power_kwt: Option<SmallInteger>,
    #[field(positive = true)]
    pub power_hp: Option<SmallInteger>,
    #[field(positive = true)]
    pub some_key: Option<BigInteger>,
    #[field(size = 40)]
    pub key: Option<String>,
}

impl Car {
    fn id(&self) -> Result<i32> {
        self.pk().ok_or(Error::DoesNotExist(Self::MODEL))
    }

    pub async fn model(&self, conn: &Connection) -> Result<ModelCar> {
        ModelCar::get_by_pk(self.model_id, conn).await
    }

    /// Parts fitting this vehicle, by title.
    pub async fn parts(&self, conn: &Connection) -> Result<Vec<Autoparts>> {
        let id = self.id()?;
        select!(Autoparts)
            .inner_join::<CarPart>(kwargs!(Autoparts.id == @CarPart.autoparts_id))
            .r#where(kwargs!(CarPart.car_id == id))
            .fetch_all(conn)
            .await
    }

    /// Links `part` to this vehicle; linking twice is a no-op.
    pub async fn add_part(&self, part: &Autoparts, conn: &Connection) -> Result<()> {
        let car_id = self.id()?;
        let autoparts_id = part.pk().ok_or(Error::DoesNotExist(Autoparts::MODEL))?;
        let kw = kwargs!(car_id = car_id, autoparts_id = autoparts_id);
        if CarPart::exists(kw, conn).await? {
            return Ok(());
        }
        CarPart {
            car_id,
            autoparts_id,
            ..Default::default()
        }
        .save(conn)
        .await?;
        Ok(())
    }

    pub async fn remove_part(&self, part: &Autoparts, conn: &Connection) -> Result<()> {
        let car_id = self.id()?;
        let autoparts_id = part.pk().ok_or(Error::DoesNotExist(Autoparts::MODEL))?;
        CarPart::filter(kwargs!(car_id = car_id, autoparts_id = autoparts_id), conn)
            .await?
            .delete(conn)
            .await
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.car_type)
    }
}

/// Join table between [`Car`] and [`Autoparts`].
#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_car_parts",
    db = "catalogue_db",
    unique_together = ["car_id, autoparts_id"],
    verbose_name = "Car part"
)]
pub struct CarPart {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(foreign_key = Car.id, on_delete = "cascade")]
    pub car_id: Integer,
    #[field(foreign_key = Autoparts.id, on_delete = "cascade")]
    pub autoparts_id: Integer,
}

impl fmt::Display for CarPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.car_id, self.autoparts_id)
    }
}
