/// A macro to create a vector of `Kwargs` conditions.
///
/// Supported forms: `field = value` (several, comma separated), `field op value`,
/// `Model.field op value` and `Model.field op @Other.field`, where `op` is one of
/// `==`, `!=`, `<`, `<=`, `>`, `>=`. `Model` is the model's SQL alias, i.e. its
/// Rust type name, as used by [`select!`](crate::select). A column on the right
/// is marked with `@`; anything else, `car.id` included, is bound as a value.
///
/// # Example
///
/// ```
/// use autoparts_catalogue::prelude::*;
///
/// let article = "0 986 494 524";
/// let conditions = kwargs!(article == article).and(kwargs!(is_active = True));
/// let join = kwargs!(Autoparts.id == @SimilarPart.similar_id);
/// assert_eq!(conditions.len(), 3);
/// assert_eq!(join.len(), 1);
/// ```
#[macro_export]
macro_rules! kwargs {
    ($($field:ident = $value:expr),* $(,)?) => {
        {
            let mut args = Vec::new();
            $(
                args.push($crate::db::query::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::db::query::Value::from($value.clone()),
                    comparison_operator: "=".to_string(),
                });
            )*
            args
        }
    };

    ($table:ident.$column:ident $op:tt @$v_table:ident.$v_column:ident) => {
        {
            vec![
                $crate::db::query::Kwargs::ColumnCondition {
                    field: format!("{}.{}", stringify!($table), stringify!($column)),
                    column: format!("{}.{}", stringify!($v_table), stringify!($v_column)),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };

    ($table:ident.$column:ident $op:tt $value:expr) => {
        {
            vec![
                $crate::db::query::Kwargs::Condition {
                    field: format!("{}.{}", stringify!($table), stringify!($column)),
                    value: $crate::db::query::Value::from($value.clone()),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };

    ($field:ident $op:tt $value:expr) => {
        {
            vec![
                $crate::db::query::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::db::query::Value::from($value.clone()),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };
}

macro_rules! binds {
    ($args:expr, $stream:expr) => {{
        use $crate::db::query::{NullKind, Value};
        for arg in $args {
            $stream = match arg {
                Value::Null(NullKind::Integer) => $stream.bind(Option::<i32>::None),
                Value::Null(NullKind::BigInteger) => $stream.bind(Option::<i64>::None),
                Value::Null(NullKind::Float) => $stream.bind(Option::<f64>::None),
                Value::Null(NullKind::Text) => $stream.bind(Option::<String>::None),
                Value::Integer(value) => $stream.bind(value),
                Value::BigInteger(value) => $stream.bind(value),
                Value::Float(value) => $stream.bind(value),
                Value::Text(value) => $stream.bind(value),
            };
        }
    }};
}

/// Starts a [`Statement`](crate::db::query::Statement) selecting the columns of
/// one model.
#[macro_export]
macro_rules! select {
    ($model:ty) => {
        $crate::db::query::Statement::select::<$model>()
    };
}
