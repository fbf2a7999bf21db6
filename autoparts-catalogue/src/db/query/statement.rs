use tracing::trace;

use super::{builder, condition::Kwargs, And, Query, Value};
use crate::db::{model::Model, Backend, Connection};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join_type_name = match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        };
        std::write!(f, "{}", join_type_name)
    }
}

#[derive(Debug, Clone)]
struct Join {
    join_type: JoinType,
    table: &'static str,
    alias: &'static str,
    on: Vec<Kwargs>,
}

/// A `SELECT Model.* FROM table Model [JOIN ...] [WHERE ...]` statement.
///
/// Tables are aliased by their Rust model name so conditions can be written
/// as `kwargs!(Autoparts.id == @SimilarPart.similar_id)`.
#[derive(Debug, Clone)]
pub struct Statement {
    table: &'static str,
    alias: &'static str,
    joins: Vec<Join>,
    conditions: Vec<Kwargs>,
    ordering: Vec<String>,
    limit: Option<u64>,
}

impl Statement {
    pub fn select<M: Model>() -> Self {
        Self {
            table: M::NAME,
            alias: M::MODEL,
            joins: Vec::new(),
            conditions: Vec::new(),
            ordering: M::ORDERING
                .iter()
                .map(|item| qualify(M::MODEL, item))
                .collect(),
            limit: None,
        }
    }

    pub fn join<J: Model>(mut self, join_type: JoinType, on: Vec<Kwargs>) -> Self {
        self.joins.push(Join {
            join_type,
            table: J::NAME,
            alias: J::MODEL,
            on,
        });
        self
    }

    pub fn inner_join<J: Model>(self, on: Vec<Kwargs>) -> Self {
        self.join::<J>(JoinType::Inner, on)
    }

    pub fn left_join<J: Model>(self, on: Vec<Kwargs>) -> Self {
        self.join::<J>(JoinType::Left, on)
    }

    /// Adds conditions, joined with `AND` to the ones already present.
    pub fn r#where(mut self, kw: Vec<Kwargs>) -> Self {
        self.conditions = if self.conditions.is_empty() {
            kw
        } else {
            self.conditions.and(kw)
        };
        self
    }

    /// Replaces the ordering; items are `Model.column`, prefixed with `-` for
    /// descending order.
    pub fn order_by(mut self, ordering: &[&str]) -> Self {
        self.ordering = ordering.iter().map(|item| item.to_string()).collect();
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_sql(&self, backend: Backend) -> (String, Vec<Value>) {
        let mut sql = format!(
            "SELECT {columns} FROM {table} {alias}",
            columns = backend.quote(&format!("{}.*", self.alias)),
            table = backend.quote(self.table),
            alias = backend.quote(self.alias),
        );
        let mut args = Vec::new();

        for join in &self.joins {
            let Query {
                placeholders,
                args: join_args,
                ..
            } = builder::to_select_query(join.on.clone(), backend, args.len());
            sql.push_str(&format!(
                " {join_type} JOIN {table} {alias} ON {placeholders}",
                join_type = join.join_type,
                table = backend.quote(join.table),
                alias = backend.quote(join.alias),
            ));
            args.extend(join_args);
        }

        if !self.conditions.is_empty() {
            let Query {
                placeholders,
                args: where_args,
                ..
            } = builder::to_select_query(self.conditions.clone(), backend, args.len());
            sql.push_str(&format!(" WHERE {placeholders}"));
            args.extend(where_args);
        }

        if !self.ordering.is_empty() {
            let ordering = self.ordering.iter().map(String::as_str).collect::<Vec<_>>();
            sql.push_str(&format!(
                " ORDER BY {}",
                builder::to_order_by(&ordering, None, backend)
            ));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        (sql, args)
    }

    pub async fn fetch_all<T: Model>(self, conn: &Connection) -> Result<Vec<T>> {
        let (sql, args) = self.to_sql(conn.backend);
        trace!(model = T::MODEL, "{sql}");
        let mut stream = sqlx::query_as::<_, T>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_all(&conn.pool).await?)
    }

    pub async fn fetch_optional<T: Model>(self, conn: &Connection) -> Result<Option<T>> {
        let (sql, args) = self.limit(1).to_sql(conn.backend);
        trace!(model = T::MODEL, "{sql}");
        let mut stream = sqlx::query_as::<_, T>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_optional(&conn.pool).await?)
    }

    pub async fn fetch_one<T: Model>(self, conn: &Connection) -> Result<T> {
        self.fetch_optional(conn)
            .await?
            .ok_or(Error::DoesNotExist(T::MODEL))
    }
}

fn qualify(alias: &str, item: &str) -> String {
    match item.strip_prefix('-') {
        Some(column) => format!("-{alias}.{column}"),
        None => format!("{alias}.{item}"),
    }
}
