use std::fmt;

use serde::Serialize;

use crate::prelude::*;
use crate::utils::non_blank;

/// Maker of parts.
#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_manufacturer",
    db = "catalogue_db",
    ordering = "name",
    verbose_name = "Manufacturer"
)]
pub struct Manufacturer {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(size = 255, unique = true, index = true)]
    pub name: Option<String>,
    /// Alternative spelling shown instead of `name` when set.
    #[field(size = 255, index = true)]
    pub related_name: Option<String>,
}

impl Manufacturer {
    pub async fn products(&self, conn: &Connection) -> Result<Vec<Autoparts>> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        Autoparts::filter(kwargs!(manufacturer_id = id), conn).await
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = non_blank(&self.related_name)
            .or(self.name.as_deref())
            .unwrap_or_default();
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manufacturer(name: Option<&str>, related_name: Option<&str>) -> Manufacturer {
        Manufacturer {
            name: name.map(str::to_string),
            related_name: related_name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn display_prefers_related_name() {
        assert_eq!(manufacturer(Some("BOSCH"), Some("Bosch")).to_string(), "Bosch");
        assert_eq!(manufacturer(Some("BOSCH"), Some("")).to_string(), "BOSCH");
        assert_eq!(manufacturer(Some("BOSCH"), None).to_string(), "BOSCH");
        assert_eq!(manufacturer(None, None).to_string(), "");
    }
}
