//! Column metadata emitted by `#[derive(Model)]`, its rendering to DDL and
//! the value checks every write goes through.
use super::query::Value;
use super::Backend;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    SmallInteger,
    BigInteger,
    Varchar(usize),
    Text,
    Float,
    Boolean,
    Date,
    DateTime,
}

impl SqlType {
    fn render(&self, backend: Backend) -> String {
        match self {
            Self::Integer | Self::Boolean => "integer".to_string(),
            Self::SmallInteger => "smallint".to_string(),
            Self::BigInteger => "bigint".to_string(),
            Self::Varchar(size) => format!("varchar({size})"),
            Self::Text => "text".to_string(),
            Self::Float if backend == Backend::Mysql => "double".to_string(),
            Self::Float => "double precision".to_string(),
            Self::Date => "varchar(10)".to_string(),
            Self::DateTime => "varchar(40)".to_string(),
        }
    }

    /// Largest value a positive column of this type may hold.
    pub fn positive_max(&self) -> Option<i64> {
        match self {
            Self::SmallInteger => Some(i16::MAX as i64),
            Self::Integer => Some(i32::MAX as i64),
            Self::BigInteger => Some(i64::MAX),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
    Restrict,
}

impl OnDelete {
    fn render(&self) -> &'static str {
        match self {
            Self::Cascade => "cascade",
            Self::SetNull => "set null",
            Self::Restrict => "restrict",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    pub auto: bool,
    pub nullable: bool,
    pub unique: bool,
    pub index: bool,
    pub positive: bool,
    /// Text must be an absolute `http(s)` URL.
    pub url: bool,
    pub default: Option<&'static str>,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    /// Checks a value about to be written: varchar length, positive range
    /// and URL format. Nulls are left to the `not null` constraint.
    pub fn validate(&self, model: &'static str, value: &Value) -> Result<()> {
        let error = |message: String| Err(Error::validation(model, self.name, message));
        match value {
            Value::Text(text) => {
                if let SqlType::Varchar(size) = self.sql_type {
                    let length = text.chars().count();
                    if length > size {
                        return error(format!(
                            "ensure this value has at most {size} characters (it has {length})"
                        ));
                    }
                }
                if self.url && !crate::utils::is_absolute_url(text) {
                    return error(format!("'{text}' is not a valid URL"));
                }
            }
            Value::Integer(number) if self.positive => {
                return self.validate_range(model, i64::from(*number));
            }
            Value::BigInteger(number) if self.positive => {
                return self.validate_range(model, *number);
            }
            _ => {}
        }
        Ok(())
    }

    fn validate_range(&self, model: &'static str, number: i64) -> Result<()> {
        let max = self.sql_type.positive_max().unwrap_or(i64::MAX);
        if (0..=max).contains(&number) {
            Ok(())
        } else {
            Err(Error::validation(
                model,
                self.name,
                format!("{number} is outside the range 0..={max}"),
            ))
        }
    }
}

/// MySQL only accepts expression defaults in parentheses on varchar columns.
fn render_default(default: &str, backend: Backend) -> String {
    match default {
        "current_timestamp" | "current_date" if backend == Backend::Mysql => {
            format!("default ({default})")
        }
        _ => format!("default {default}"),
    }
}

fn render_foreign_key(fk: &ForeignKey, backend: Backend) -> String {
    format!(
        "references {}({}) on delete {}",
        backend.quote(fk.table),
        backend.quote(fk.column),
        fk.on_delete.render()
    )
}

fn render_column(column: &Column, backend: Backend) -> String {
    let name = backend.quote(column.name);

    if column.primary_key && column.auto {
        return match backend {
            Backend::Sqlite => format!("{name} integer primary key autoincrement"),
            Backend::Postgres => format!("{name} serial primary key"),
            Backend::Mysql => format!("{name} integer primary key auto_increment"),
        };
    }

    let mut parts = vec![name.clone(), column.sql_type.render(backend)];
    if column.primary_key {
        parts.push("primary key".to_string());
    }
    if column.unique {
        parts.push("unique".to_string());
    }
    if let Some(default) = column.default {
        parts.push(render_default(default, backend));
    }
    if !column.nullable && !column.primary_key {
        parts.push("not null".to_string());
    }
    if column.positive {
        parts.push(format!("check ({name} >= 0)"));
    }
    // InnoDB ignores column-level references; MySQL gets table-level keys.
    if let Some(fk) = &column.foreign_key {
        if backend != Backend::Mysql {
            parts.push(render_foreign_key(fk, backend));
        }
    }
    parts.join(" ")
}

fn index_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_idx")
}

/// `create table` plus `create index` statements for one model.
pub fn create_table_sql(
    table: &str,
    columns: &[Column],
    unique_together: &[&[&str]],
    backend: Backend,
) -> Vec<String> {
    let mut definitions = columns
        .iter()
        .map(|column| render_column(column, backend))
        .collect::<Vec<_>>();

    for group in unique_together {
        let columns = group
            .iter()
            .map(|column| backend.quote(column))
            .collect::<Vec<_>>();
        definitions.push(format!("unique ({})", columns.join(", ")));
    }

    let indexed = columns
        .iter()
        .filter(|column| column.index && !column.unique && !column.primary_key)
        .collect::<Vec<_>>();

    if backend == Backend::Mysql {
        for column in columns {
            if let Some(fk) = &column.foreign_key {
                definitions.push(format!(
                    "foreign key ({}) {}",
                    backend.quote(column.name),
                    render_foreign_key(fk, backend)
                ));
            }
        }
        for column in &indexed {
            definitions.push(format!(
                "index {} ({})",
                backend.quote(&index_name(table, column.name)),
                backend.quote(column.name)
            ));
        }
    }

    let mut statements = vec![format!(
        "create table if not exists {} ({});",
        backend.quote(table),
        definitions.join(", ")
    )];

    if backend != Backend::Mysql {
        statements.extend(indexed.iter().map(|column| {
            format!(
                "create index if not exists {} on {} ({});",
                backend.quote(&index_name(table, column.name)),
                backend.quote(table),
                backend.quote(column.name)
            )
        }));
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn column(name: &'static str, sql_type: SqlType) -> Column {
        Column {
            name,
            sql_type,
            primary_key: false,
            auto: false,
            nullable: false,
            unique: false,
            index: false,
            positive: false,
            url: false,
            default: None,
            foreign_key: None,
        }
    }

    const COLUMNS: &[Column] = &[
        Column {
            primary_key: true,
            auto: true,
            nullable: true,
            ..column("id", SqlType::Integer)
        },
        Column {
            foreign_key: Some(ForeignKey {
                table: "catalogue_autoparts",
                column: "id",
                on_delete: OnDelete::Cascade,
            }),
            ..column("primary_id", SqlType::Integer)
        },
        Column {
            positive: true,
            index: true,
            default: Some("0"),
            ..column("ranking", SqlType::SmallInteger)
        },
        Column {
            default: Some("current_timestamp"),
            ..column("updated_at", SqlType::DateTime)
        },
    ];

    #[test]
    fn sqlite_table() {
        let sql = create_table_sql(
            "catalogue_similarpart",
            COLUMNS,
            &[&["primary_id", "ranking"]],
            Backend::Sqlite,
        );
        assert_eq!(
            sql,
            vec![
                concat!(
                    r#"create table if not exists "catalogue_similarpart" ("#,
                    r#""id" integer primary key autoincrement, "#,
                    r#""primary_id" integer not null references "catalogue_autoparts"("id") on delete cascade, "#,
                    r#""ranking" smallint default 0 not null check ("ranking" >= 0), "#,
                    r#""updated_at" varchar(40) default current_timestamp not null, "#,
                    r#"unique ("primary_id", "ranking"));"#
                )
                .to_string(),
                r#"create index if not exists "catalogue_similarpart_ranking_idx" on "catalogue_similarpart" ("ranking");"#
                    .to_string(),
            ]
        );
    }

    #[test]
    fn postgres_serial_and_mysql_inline_index() {
        let postgres = create_table_sql("t", COLUMNS, &[], Backend::Postgres);
        assert!(postgres[0].contains(r#""id" serial primary key"#));

        let mysql = create_table_sql("t", COLUMNS, &[], Backend::Mysql);
        assert_eq!(mysql.len(), 1);
        assert!(mysql[0].contains("`id` integer primary key auto_increment"));
        assert!(mysql[0].contains("index `t_ranking_idx` (`ranking`)"));
    }

    #[test]
    fn mysql_defaults_and_table_level_foreign_keys() {
        let mysql = create_table_sql("catalogue_similarpart", COLUMNS, &[], Backend::Mysql);
        assert!(mysql[0].contains("`updated_at` varchar(40) default (current_timestamp) not null"));
        assert!(mysql[0].contains("`primary_id` integer not null, "));
        assert!(mysql[0].contains(
            "foreign key (`primary_id`) references `catalogue_autoparts`(`id`) on delete cascade"
        ));
        assert!(!mysql[0].contains("integer not null references"));
    }

    #[test]
    fn column_checks() {
        let name = column("name", SqlType::Varchar(5));
        assert!(name.validate("Category", &Value::from("Pads")).is_ok());
        assert!(matches!(
            name.validate("Category", &Value::from("Brake pads")),
            Err(Error::Validation { model: "Category", field: "name", .. })
        ));
        assert!(name.validate("Category", &Value::from(None::<String>)).is_ok());

        let ranking = COLUMNS[2];
        assert!(ranking.validate("SimilarPart", &Value::Integer(32767)).is_ok());
        assert!(ranking.validate("SimilarPart", &Value::Integer(32768)).is_err());
        assert!(ranking.validate("SimilarPart", &Value::Integer(-1)).is_err());

        let link = Column {
            url: true,
            ..column("url", SqlType::Varchar(255))
        };
        assert!(link.validate("Autoparts", &Value::from("https://example.com/p/1")).is_ok());
        assert!(link.validate("Autoparts", &Value::from("/p/1")).is_err());
    }
}
