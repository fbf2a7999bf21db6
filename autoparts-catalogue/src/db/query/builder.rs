use super::condition::Kwargs;
use super::Query;
use crate::db::Backend;

fn sql_operator(comparison_operator: &str) -> &str {
    match comparison_operator {
        "==" => "=",
        "!=" => "<>",
        other => other,
    }
}

pub fn to_update_query(kw: Vec<Kwargs>, backend: Backend) -> Query {
    let mut args = Vec::new();
    let mut placeholders = Vec::new();
    for condition in kw {
        if let Kwargs::Condition { field, value, .. } = condition {
            args.push(value);
            placeholders.push(format!(
                "{}={}",
                backend.quote(&field),
                backend.placeholder(args.len())
            ));
        }
    }

    Query {
        placeholders: placeholders.join(", "),
        args,
        ..Default::default()
    }
}

/// Renders a where/on clause; bind placeholders are numbered from `offset + 1`.
///
/// Adjacent conditions without an explicit operator, as produced by
/// `kwargs!(a = 1, b = 2)`, are joined with `AND`.
pub fn to_select_query(kw: Vec<Kwargs>, backend: Backend, offset: usize) -> Query {
    let mut args = Vec::new();
    let mut placeholders = Vec::new();
    let mut after_condition = false;
    for condition in kw {
        let is_operator = matches!(condition, Kwargs::LogicalOperator { .. });
        if after_condition && !is_operator {
            placeholders.push("AND".to_string());
        }
        after_condition = !is_operator;
        match condition {
            Kwargs::Condition {
                field,
                value,
                comparison_operator,
            } => {
                let field = backend.quote(&field);
                let operator = sql_operator(&comparison_operator);
                match (value.is_null(), operator) {
                    (true, "=") => placeholders.push(format!("{field} IS NULL")),
                    (true, "<>") => placeholders.push(format!("{field} IS NOT NULL")),
                    _ => {
                        args.push(value);
                        let placeholder = backend.placeholder(offset + args.len());
                        placeholders.push(format!("{field}{operator}{placeholder}"));
                    }
                }
            }
            Kwargs::ColumnCondition {
                field,
                column,
                comparison_operator,
            } => {
                placeholders.push(format!(
                    "{}{}{}",
                    backend.quote(&field),
                    sql_operator(&comparison_operator),
                    backend.quote(&column)
                ));
            }
            Kwargs::LogicalOperator { operator } => {
                placeholders.push(operator.to_uppercase());
            }
        }
    }

    Query {
        placeholders: placeholders.join(" "),
        args,
        ..Default::default()
    }
}

pub fn to_insert_query(kw: Vec<Kwargs>, backend: Backend) -> Query {
    let mut args = Vec::new();
    let mut fields = Vec::new();
    let mut placeholders = Vec::new();
    for condition in kw {
        if let Kwargs::Condition { field, value, .. } = condition {
            args.push(value);
            fields.push(backend.quote(&field));
            placeholders.push(backend.placeholder(args.len()));
        }
    }

    Query {
        placeholders: placeholders.join(", "),
        fields: fields.join(", "),
        args,
    }
}

/// `ORDER BY` items for a default ordering such as `["-ranking", "primary_id"]`.
pub fn to_order_by(ordering: &[&str], qualifier: Option<&str>, backend: Backend) -> String {
    ordering
        .iter()
        .map(|item| {
            let (column, direction) = match item.strip_prefix('-') {
                Some(column) => (column, "DESC"),
                None => (*item, "ASC"),
            };
            let column = match qualifier {
                Some(qualifier) => format!("{qualifier}.{column}"),
                None => column.to_string(),
            };
            format!("{} {direction}", backend.quote(&column))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
