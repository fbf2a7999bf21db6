use std::fmt;

use serde::Serialize;

use crate::prelude::*;

#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_category",
    db = "catalogue_db",
    ordering = "name",
    verbose_name = "Category",
    verbose_name_plural = "Categories"
)]
pub struct Category {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(size = 255, unique = true, index = true)]
    pub name: String,
    #[field(foreign_key = Category.id, on_delete = "cascade")]
    pub parent_id: Option<Integer>,
    #[field(size = 255)]
    pub crumbs: Option<String>,
}

impl Category {
    pub async fn parent(&self, conn: &Connection) -> Result<Option<Category>> {
        match self.parent_id {
            Some(parent_id) => Category::get(kwargs!(id = parent_id), conn).await,
            None => Ok(None),
        }
    }

    /// Direct subcategories, by name.
    pub async fn children(&self, conn: &Connection) -> Result<Vec<Category>> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        Category::filter(kwargs!(parent_id = id), conn).await
    }

    pub async fn products(&self, conn: &Connection) -> Result<Vec<Autoparts>> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        Autoparts::filter(kwargs!(category_id = id), conn).await
    }

    /// Categories without a parent.
    pub async fn roots(conn: &Connection) -> Result<Vec<Category>> {
        Category::filter(kwargs!(parent_id == None::<i32>), conn).await
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
