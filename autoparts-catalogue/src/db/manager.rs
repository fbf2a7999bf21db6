//! Per-model entry point that pins every query to the model's database.
//!
//! `Category::objects(&databases)?` resolves the alias declared with
//! `#[model(db = "...")]` once; all queries issued through the returned
//! manager run on that database. [`Manager::using`] targets another alias
//! explicitly.
use std::marker::PhantomData;

use tracing::trace;

use super::model::Model;
use super::query::{Kwargs, Statement};
use super::{Connection, Database, Databases};
use crate::Result;

pub struct Manager<'db, M> {
    database: &'db Database,
    _model: PhantomData<M>,
}

impl<M> Clone for Manager<'_, M> {
    fn clone(&self) -> Self {
        Self {
            database: self.database,
            _model: PhantomData,
        }
    }
}

impl<'db, M: Model> Manager<'db, M> {
    pub fn new(databases: &'db Databases) -> Result<Self> {
        let database = databases.route(M::DB)?;
        trace!(model = M::MODEL, alias = %database.alias, "routing");
        Ok(Self {
            database,
            _model: PhantomData,
        })
    }

    pub fn using(databases: &'db Databases, alias: &str) -> Result<Self> {
        Ok(Self {
            database: databases.get(alias)?,
            _model: PhantomData,
        })
    }

    pub fn alias(&self) -> &str {
        &self.database.alias
    }

    pub fn conn(&self) -> &'db Connection {
        &self.database.conn
    }

    /// A statement on this model, to be fetched with [`Manager::conn`].
    pub fn select(&self) -> Statement {
        Statement::select::<M>()
    }

    pub async fn all(&self) -> Result<Vec<M>> {
        M::all(self.conn()).await
    }

    pub async fn filter(&self, kw: Vec<Kwargs>) -> Result<Vec<M>> {
        M::filter(kw, self.conn()).await
    }

    pub async fn get(&self, kw: Vec<Kwargs>) -> Result<Option<M>> {
        M::get(kw, self.conn()).await
    }

    pub async fn get_by_pk(&self, id: i32) -> Result<M> {
        M::get_by_pk(id, self.conn()).await
    }

    pub async fn exists(&self, kw: Vec<Kwargs>) -> Result<bool> {
        M::exists(kw, self.conn()).await
    }

    pub async fn count(&self) -> Result<i64> {
        M::count(self.conn()).await
    }

    pub async fn create(&self, kw: Vec<Kwargs>) -> Result<()> {
        M::create(kw, self.conn()).await
    }

    /// Inserts the row and returns it as stored, primary key included.
    pub async fn save(&self, row: &M) -> Result<M> {
        let id = row.save(self.conn()).await?;
        M::get_by_pk(id, self.conn()).await
    }

    pub async fn update(&self, row: &M) -> Result<()> {
        row.update(self.conn()).await
    }

    pub async fn delete(&self, row: &M) -> Result<()> {
        row.delete(self.conn()).await
    }

    pub async fn migrate(&self) -> Result<()> {
        M::migrate(self.conn()).await
    }
}
