/// SQL type carried by a null, so the driver binds it with the right type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullKind {
    Integer,
    BigInteger,
    Float,
    Text,
}

/// A typed bind argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null(NullKind),
    Integer(i32),
    BigInteger(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::BigInteger(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Integer(i32::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! nullable {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<Option<$ty>> for Value {
                fn from(value: Option<$ty>) -> Self {
                    value.map_or(Self::Null(NullKind::$kind), Self::from)
                }
            }
        )*
    };
}

nullable! {
    i32 => Integer,
    i64 => BigInteger,
    f64 => Float,
    bool => Integer,
    String => Text,
    &str => Text,
}
