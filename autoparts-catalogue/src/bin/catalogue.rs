//! `catalogue` management commands.
use anyhow::Context;
use clap::{builder::PossibleValuesParser, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use autoparts_catalogue::catalogue::{dump_table, TABLES};
use autoparts_catalogue::db::schema_sql;
use autoparts_catalogue::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "catalogue", version, about = "Auto-parts catalogue database tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Create missing tables on every configured database, or on one alias.
    Migrate {
        #[arg(long)]
        database: Option<String>,
    },
    /// Print the DDL of every table.
    Sqlmigrate {
        #[arg(long, value_enum, default_value_t = Dialect::Sqlite)]
        backend: Dialect,
    },
    /// Print all rows of a catalogue table as JSON.
    Dump {
        #[arg(value_parser = PossibleValuesParser::new(TABLES.iter().copied()))]
        table: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dialect {
    Sqlite,
    Postgres,
    Mysql,
}

impl From<Dialect> for Backend {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Sqlite => Backend::Sqlite,
            Dialect::Postgres => Backend::Postgres,
            Dialect::Mysql => Backend::Mysql,
        }
    }
}

async fn connect() -> anyhow::Result<Databases> {
    let settings = Settings::from_env().context("loading database settings")?;
    Ok(Databases::connect(&settings).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Sqlmigrate { backend } => {
            for statement in schema_sql(backend.into())? {
                println!("{statement}");
            }
        }
        Command::Migrate { database } => {
            let databases = connect().await?;
            match database {
                Some(alias) => databases.get(&alias)?.migrate().await?,
                None => databases.migrate().await?,
            }
        }
        Command::Dump { table } => {
            let databases = connect().await?;
            println!("{}", dump_table(&databases, &table).await?);
        }
    }

    Ok(())
}
