//! The [`Model`] trait: table metadata plus the CRUD operations every
//! catalogue table shares.
//!
//! Implementations are generated by `#[derive(Model)]`; only the metadata
//! and the per-row argument lists are generated, the queries live here.

use sqlx::{any::AnyRow, FromRow, Row};
use tracing::{debug, trace};

use super::manager::Manager;
use super::query::{builder, condition::Kwargs, Query, Statement, Value};
use super::schema::{self, Column};
use super::{Backend, Connection, Databases, FutRes};
use crate::{Error, Result};

/// Trait for database model operations.
#[async_trait::async_trait]
pub trait Model: Sized + Clone + Send + Sync + Unpin + 'static + for<'r> FromRow<'r, AnyRow> {
    /// Table name.
    const NAME: &'static str;
    /// Rust type name, used as the table alias in statements.
    const MODEL: &'static str;
    /// Primary key column.
    const PK: &'static str;
    /// Database alias the model is routed to; `None` means `default`.
    const DB: Option<&'static str>;
    /// Default ordering, `-column` for descending.
    const ORDERING: &'static [&'static str];
    const UNIQUE_TOGETHER: &'static [&'static [&'static str]];
    const VERBOSE_NAME: &'static str;
    const VERBOSE_NAME_PLURAL: &'static str;
    const COLUMNS: &'static [Column];
    /// Tables referenced through foreign keys.
    const DEPENDS_ON: &'static [&'static str];

    /// Primary key value, `None` until the row is saved.
    fn pk(&self) -> Option<i32>;

    /// Columns written by [`save`](Model::save); `auto_now` columns carry the
    /// current time.
    fn insert_args(&self) -> Vec<Kwargs>;

    /// Columns written by [`update`](Model::update).
    fn update_args(&self) -> Vec<Kwargs>;

    /// Checks lengths, ranges and URLs the database may not enforce.
    fn validate(&self) -> Result<()> {
        Self::validate_kwargs(&self.insert_args())
    }

    /// Runs the column checks on every value about to be written.
    fn validate_kwargs(kw: &[Kwargs]) -> Result<()> {
        for condition in kw {
            if let Kwargs::Condition { field, value, .. } = condition {
                if let Some(column) = Self::COLUMNS.iter().find(|c| c.name == field.as_str()) {
                    column.validate(Self::MODEL, value)?;
                }
            }
        }
        Ok(())
    }

    fn schema(backend: Backend) -> Vec<String> {
        schema::create_table_sql(Self::NAME, Self::COLUMNS, Self::UNIQUE_TOGETHER, backend)
    }

    /// Manager bound to the database this model is routed to.
    fn objects(databases: &Databases) -> Result<Manager<'_, Self>> {
        Manager::new(databases)
    }

    /// Creates the table (and its indexes) when missing.
    fn migrate(conn: &'_ Connection) -> FutRes<'_, (), Error> {
        Box::pin(async move {
            for statement in Self::schema(conn.backend) {
                let formatted_sql = sqlformat::format(
                    &statement,
                    &sqlformat::QueryParams::None,
                    &sqlformat::FormatOptions::default(),
                );
                debug!(table = Self::NAME, "\n{formatted_sql}");
                sqlx::query(&statement).execute(&conn.pool).await?;
            }
            Ok(())
        })
    }

    /// Inserts the row and returns the new primary key.
    async fn save(&self, conn: &Connection) -> Result<i32> {
        Self::insert(self.insert_args(), conn).await
    }

    /// Inserts a row from the given values.
    async fn create(kw: Vec<Kwargs>, conn: &Connection) -> Result<()> {
        Self::insert(kw, conn).await.map(|_| ())
    }

    /// Validates and inserts the values, returning the new primary key.
    async fn insert(kw: Vec<Kwargs>, conn: &Connection) -> Result<i32> {
        Self::validate_kwargs(&kw)?;
        let Query {
            placeholders,
            fields,
            args,
        } = builder::to_insert_query(kw, conn.backend);
        let table = conn.backend.quote(Self::NAME);
        let query = if fields.is_empty() {
            format!("insert into {table} default values")
        } else {
            format!("insert into {table} ({fields}) values ({placeholders})")
        };
        trace!(model = Self::MODEL, "{query}");

        if conn.backend.supports_returning() {
            let query = format!("{query} returning {}", conn.backend.quote(Self::PK));
            let mut stream = sqlx::query(&query);
            binds!(args, stream);
            let row = stream.fetch_one(&conn.pool).await?;
            Ok(row.try_get::<i32, _>(0)?)
        } else {
            let mut stream = sqlx::query(&query);
            binds!(args, stream);
            let result = stream.execute(&conn.pool).await?;
            let id = result
                .last_insert_id()
                .ok_or(Error::DoesNotExist(Self::MODEL))?;
            i32::try_from(id).map_err(|e| Error::Database(sqlx::Error::Decode(Box::new(e))))
        }
    }

    /// Writes every column of a saved row back to the database.
    async fn update(&self, conn: &Connection) -> Result<()> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        Self::set(id, self.update_args(), conn).await
    }

    /// Updates the row with the given primary key.
    async fn set(id_value: i32, kw: Vec<Kwargs>, conn: &Connection) -> Result<()> {
        Self::validate_kwargs(&kw)?;
        let Query {
            placeholders,
            mut args,
            ..
        } = builder::to_update_query(kw, conn.backend);
        args.push(Value::Integer(id_value));

        let query = format!(
            "update {table} set {placeholders} where {id}={placeholder}",
            table = conn.backend.quote(Self::NAME),
            id = conn.backend.quote(Self::PK),
            placeholder = conn.backend.placeholder(args.len()),
        );
        trace!(model = Self::MODEL, "{query}");

        let mut stream = sqlx::query(&query);
        binds!(args, stream);
        stream.execute(&conn.pool).await?;
        Ok(())
    }

    /// Deletes the row; foreign keys cascade to dependent rows.
    async fn delete(&self, conn: &Connection) -> Result<()> {
        let id = self.pk().ok_or(Error::DoesNotExist(Self::MODEL))?;
        let query = format!(
            "delete from {table} where {pk}={placeholder}",
            table = conn.backend.quote(Self::NAME),
            pk = conn.backend.quote(Self::PK),
            placeholder = conn.backend.placeholder(1),
        );
        trace!(model = Self::MODEL, "{query}");
        sqlx::query(&query).bind(id).execute(&conn.pool).await?;
        Ok(())
    }

    /// Retrieves all rows in default ordering.
    async fn all(conn: &Connection) -> Result<Vec<Self>> {
        Statement::select::<Self>().fetch_all(conn).await
    }

    /// Rows matching the conditions, in default ordering.
    async fn filter(kw: Vec<Kwargs>, conn: &Connection) -> Result<Vec<Self>> {
        Statement::select::<Self>().r#where(kw).fetch_all(conn).await
    }

    /// First row matching the conditions.
    async fn get(kw: Vec<Kwargs>, conn: &Connection) -> Result<Option<Self>> {
        Statement::select::<Self>()
            .r#where(kw)
            .fetch_optional(conn)
            .await
    }

    /// The row with the given primary key, or [`Error::DoesNotExist`].
    async fn get_by_pk(id: i32, conn: &Connection) -> Result<Self> {
        Statement::select::<Self>()
            .r#where(vec![Kwargs::assign(Self::PK, id)])
            .fetch_one(conn)
            .await
    }

    async fn count(conn: &Connection) -> Result<i64> {
        let query = format!("select count(*) from {}", conn.backend.quote(Self::NAME));
        Ok(sqlx::query(&query)
            .fetch_one(&conn.pool)
            .await?
            .try_get::<i64, _>(0)?)
    }

    async fn exists(kw: Vec<Kwargs>, conn: &Connection) -> Result<bool> {
        Ok(Self::get(kw, conn).await?.is_some())
    }
}

/// Trait for deleting database records.
#[async_trait::async_trait]
pub trait Delete {
    async fn delete(&self, conn: &Connection) -> Result<()>;
}

#[async_trait::async_trait]
impl<T> Delete for Vec<T>
where
    T: Model,
{
    /// Deletes the listed rows.
    async fn delete(&self, conn: &Connection) -> Result<()> {
        for row in self {
            Model::delete(row, conn).await?;
        }
        Ok(())
    }
}
