use super::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Kwargs {
    /// `field <op> value`
    Condition {
        field: String,
        value: Value,
        comparison_operator: String,
    },
    /// `field <op> other_column`
    ColumnCondition {
        field: String,
        column: String,
        comparison_operator: String,
    },
    LogicalOperator {
        operator: String,
    },
}

impl Kwargs {
    /// `field = value`, as used by inserts and updates.
    pub fn assign(field: &str, value: impl Into<Value>) -> Self {
        Self::Condition {
            field: field.to_string(),
            value: value.into(),
            comparison_operator: "=".to_string(),
        }
    }
}

pub trait Or {
    fn or(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs>;
}

pub trait And {
    fn and(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs>;
}

impl Or for Vec<Kwargs> {
    fn or(mut self, kwargs: Vec<Kwargs>) -> Vec<Kwargs> {
        self.push(Kwargs::LogicalOperator {
            operator: "or".to_string(),
        });
        self.extend(kwargs);
        self
    }
}

impl And for Vec<Kwargs> {
    fn and(mut self, kwargs: Vec<Kwargs>) -> Vec<Kwargs> {
        self.push(Kwargs::LogicalOperator {
            operator: "and".to_string(),
        });
        self.extend(kwargs);
        self
    }
}
