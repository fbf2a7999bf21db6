//! Column type aliases understood by `#[derive(Model)]`.
//!
//! The alias name picks the SQL type; the Rust type is what `sqlx::Any`
//! decodes the column into.

pub type Integer = i32;
pub type SmallInteger = i32;
pub type BigInteger = i64;
pub type Text = String;
pub type Float = f64;
pub type Date = String;
pub type DateTime = String;
pub type Boolean = i32;

#[allow(non_upper_case_globals)]
pub const True: i32 = 1;
#[allow(non_upper_case_globals)]
pub const False: i32 = 0;
