pub mod builder;
pub mod condition;
pub mod statement;
pub mod value;

pub use condition::{And, Kwargs, Or};
pub use statement::{JoinType, Statement};
pub use value::{NullKind, Value};

#[derive(Debug, Default)]
pub struct Query {
    pub placeholders: String,
    pub fields: String,
    pub args: Vec<Value>,
}
