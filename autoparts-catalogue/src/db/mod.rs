//! The `db` module provides functionality for interacting with the database.
//!
//! It owns the connection pools, the alias registry that decides which
//! database a model lives on, and the migration runner. Model behaviour
//! lives in [`model`], query building in [`query`] and DDL in [`schema`].
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use sqlx::any::AnyPoolOptions;
use tracing::{debug, info, warn};

use crate::settings::{DatabaseSettings, Settings};
use crate::{Error, Result};

pub mod manager;
pub mod model;
pub mod query;
pub mod schema;

/// Alias used by models that do not declare one.
pub const DEFAULT_DB: &str = "default";

/// Alias every catalogue model is routed to.
pub const CATALOGUE_DB: &str = "catalogue_db";

/// SQL dialect of a connection, derived from its URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Sqlite,
    Postgres,
    Mysql,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::Mysql),
            other => Err(Error::Config(format!(
                "unsupported database scheme '{other}', expected sqlite, postgres or mysql"
            ))),
        }
    }

    /// Bind placeholder for the `index`-th (1-based) argument.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Sqlite => format!("?{index}"),
            Self::Postgres => format!("${index}"),
            Self::Mysql => "?".to_string(),
        }
    }

    /// Quotes an identifier; `table.column` paths are quoted per segment
    /// and `*` is left alone.
    pub fn quote(&self, ident: &str) -> String {
        ident
            .split('.')
            .map(|part| match (part, self) {
                ("*", _) => part.to_string(),
                (_, Self::Mysql) => format!("`{part}`"),
                _ => format!("\"{part}\""),
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn supports_returning(&self) -> bool {
        !matches!(self, Self::Mysql)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
        };
        f.write_str(name)
    }
}

/// A connection pool together with the dialect it speaks.
#[derive(Debug, Clone)]
pub struct Connection {
    pub pool: sqlx::AnyPool,
    pub backend: Backend,
}

impl Connection {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let backend = Backend::from_url(url)?;
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    if backend == Backend::Sqlite {
                        sqlx::query("PRAGMA foreign_keys = ON")
                            .execute(&mut *conn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .connect(url)
            .await?;
        Ok(Self { pool, backend })
    }

    pub async fn execute(&self, sql: &str) -> Result<()> {
        debug!(backend = %self.backend, "{sql}");
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}

/// Represents a database.
#[derive(Debug, Clone)]
pub struct Database {
    pub alias: String,
    pub conn: Connection,
}

impl Database {
    pub async fn new(alias: &str, settings: &DatabaseSettings) -> Result<Self> {
        let conn = Connection::connect(&settings.url, settings.max_connections).await?;
        info!(alias, backend = %conn.backend, "connected to database");
        Ok(Self {
            alias: alias.to_string(),
            conn,
        })
    }

    /// Creates every registered table routed to this database.
    pub async fn migrate(&self) -> Result<()> {
        for registrar in ordered_registrars()? {
            if registrar.db.unwrap_or(DEFAULT_DB) == self.alias {
                info!(alias = %self.alias, table = registrar.table, "migrating");
                (registrar.migrate_fn)(&self.conn).await?;
            }
        }
        Ok(())
    }
}

/// The configured databases keyed by alias.
#[derive(Debug, Clone, Default)]
pub struct Databases {
    databases: BTreeMap<String, Database>,
}

impl Databases {
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let mut databases = BTreeMap::new();
        for (alias, database) in &settings.databases {
            databases.insert(alias.clone(), Database::new(alias, database).await?);
        }
        Ok(Self { databases })
    }

    pub fn insert(&mut self, database: Database) {
        self.databases.insert(database.alias.clone(), database);
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    pub fn get(&self, alias: &str) -> Result<&Database> {
        self.databases
            .get(alias)
            .ok_or_else(|| Error::UnknownDatabase(alias.to_string()))
    }

    /// Database a model with the given alias hint is routed to.
    pub fn route(&self, hint: Option<&str>) -> Result<&Database> {
        self.get(hint.unwrap_or(DEFAULT_DB))
    }

    /// Runs `migrate` on every database; a model routed to an alias that is
    /// not configured is an error.
    pub async fn migrate(&self) -> Result<()> {
        for registrar in ordered_registrars()? {
            let alias = registrar.db.unwrap_or(DEFAULT_DB);
            let database = self.get(alias)?;
            info!(alias, table = registrar.table, "migrating");
            (registrar.migrate_fn)(&database.conn).await?;
        }
        Ok(())
    }
}

pub type FutRes<'fut, T, E> = Pin<Box<dyn Future<Output = std::result::Result<T, E>> + Send + 'fut>>;

type MigrateFn = for<'m> fn(&'m Connection) -> FutRes<'m, (), Error>;

type SchemaFn = fn(Backend) -> Vec<String>;

/// Registered once per model by `#[derive(Model)]`.
pub struct MigrationRegistrar {
    pub table: &'static str,
    pub db: Option<&'static str>,
    pub depends_on: &'static [&'static str],
    pub migrate_fn: MigrateFn,
    pub schema_fn: SchemaFn,
}

inventory::collect!(MigrationRegistrar);

/// Registered models, referenced tables first.
pub fn ordered_registrars() -> Result<Vec<&'static MigrationRegistrar>> {
    let mut registrars = inventory::iter::<MigrationRegistrar>
        .into_iter()
        .collect::<Vec<_>>();
    registrars.sort_by_key(|r| r.table);
    order_by_dependencies(registrars)
}

fn order_by_dependencies(
    registrars: Vec<&'static MigrationRegistrar>,
) -> Result<Vec<&'static MigrationRegistrar>> {
    let known = registrars.iter().map(|r| r.table).collect::<HashSet<_>>();
    let mut pending = registrars
        .iter()
        .map(|r| {
            let deps = r
                .depends_on
                .iter()
                .copied()
                .filter(|dep| *dep != r.table)
                .filter(|dep| {
                    let found = known.contains(dep);
                    if !found {
                        warn!(table = r.table, dependency = dep, "dependency is not registered");
                    }
                    found
                })
                .collect::<HashSet<_>>();
            (r.table, deps)
        })
        .collect::<HashMap<_, _>>();

    let mut ordered = Vec::with_capacity(registrars.len());
    let mut remaining = registrars;
    while !remaining.is_empty() {
        let (ready, blocked): (Vec<_>, Vec<_>) = remaining
            .into_iter()
            .partition(|r| pending.get(r.table).is_some_and(HashSet::is_empty));
        if ready.is_empty() {
            let tables = blocked.iter().map(|r| r.table).collect::<Vec<_>>();
            return Err(Error::MigrationCycle(tables.join(", ")));
        }
        for registrar in &ready {
            for deps in pending.values_mut() {
                deps.remove(registrar.table);
            }
        }
        ordered.extend(ready);
        remaining = blocked;
    }
    Ok(ordered)
}

/// DDL of every registered model for the given backend.
pub fn schema_sql(backend: Backend) -> Result<Vec<String>> {
    Ok(ordered_registrars()?
        .into_iter()
        .flat_map(|r| (r.schema_fn)(backend))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Connection) -> FutRes<'_, (), Error> {
        Box::pin(async { Ok(()) })
    }

    fn no_schema(_: Backend) -> Vec<String> {
        Vec::new()
    }

    fn leak(table: &'static str, depends_on: &'static [&'static str]) -> &'static MigrationRegistrar {
        Box::leak(Box::new(MigrationRegistrar {
            table,
            db: None,
            depends_on,
            migrate_fn: noop,
            schema_fn: no_schema,
        }))
    }

    #[test]
    fn referenced_tables_come_first() {
        let ordered = order_by_dependencies(vec![
            leak("car", &["model"]),
            leak("model", &["maker"]),
            leak("maker", &[]),
        ])
        .unwrap();
        let tables = ordered.iter().map(|r| r.table).collect::<Vec<_>>();
        assert_eq!(tables, ["maker", "model", "car"]);
    }

    #[test]
    fn self_reference_is_not_a_cycle() {
        let ordered = order_by_dependencies(vec![leak("category", &["category"])]).unwrap();
        assert_eq!(ordered.len(), 1);
    }

    #[test]
    fn cycles_are_reported() {
        let result = order_by_dependencies(vec![leak("a", &["b"]), leak("b", &["a"])]);
        assert!(matches!(result, Err(Error::MigrationCycle(_))));
    }

    #[test]
    fn backend_dialects() {
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert_eq!(Backend::from_url("postgresql://localhost/db").unwrap(), Backend::Postgres);
        assert!(Backend::from_url("oracle://db").is_err());

        assert_eq!(Backend::Postgres.placeholder(2), "$2");
        assert_eq!(Backend::Sqlite.placeholder(2), "?2");
        assert_eq!(Backend::Mysql.placeholder(2), "?");

        assert_eq!(Backend::Sqlite.quote("Car.type"), "\"Car\".\"type\"");
        assert_eq!(Backend::Mysql.quote("key"), "`key`");
        assert_eq!(Backend::Postgres.quote("Car.*"), "\"Car\".*");
    }
}
