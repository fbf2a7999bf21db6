use serde::Serialize;

use crate::prelude::*;

/// Ranked link between two parts; a higher ranking is listed first.
#[derive(Model, FromRow, Clone, Debug, Serialize)]
#[model(
    table = "catalogue_similarpart",
    db = "catalogue_db",
    ordering = "-ranking, primary_id",
    unique_together = ["primary_id, similar_id"],
    verbose_name = "Similar part"
)]
pub struct SimilarPart {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,
    #[field(size = 255)]
    pub source: Option<String>,
    #[field(default = "now", auto_now = true)]
    pub updated_at: DateTime,
    #[field(default = true)]
    pub is_active: Boolean,

    #[field(foreign_key = Autoparts.id, on_delete = "cascade")]
    pub primary_id: Integer,
    #[field(foreign_key = Autoparts.id, on_delete = "cascade")]
    pub similar_id: Integer,
    #[field(default = 0, positive = true, index = true)]
    pub ranking: SmallInteger,
}

impl SimilarPart {
    pub async fn primary(&self, conn: &Connection) -> Result<Autoparts> {
        Autoparts::get_by_pk(self.primary_id, conn).await
    }

    pub async fn similar(&self, conn: &Connection) -> Result<Autoparts> {
        Autoparts::get_by_pk(self.similar_id, conn).await
    }

    pub async fn describe(&self, conn: &Connection) -> Result<String> {
        let primary = self.primary(conn).await?;
        let similar = self.similar(conn).await?;
        Ok(Self::label(&primary, &similar))
    }

    /// `{primary article} -> {similar article}`
    pub fn label(primary: &Autoparts, similar: &Autoparts) -> String {
        format!("{} -> {}", primary.article, similar.article)
    }
}
