//! Persistence of generated data.
//!
//! Every generated entity converts into a [`Record`] through [`ToRecord`], and
//! a [`Store`] bulk-appends uniform records to a table. [`Seeder`] writes to
//! PostgreSQL; [`MemoryStore`] keeps rows in memory and enforces the same
//! keys and references, which makes it the store of choice in tests.

mod memory;
mod records;
pub mod schema;
mod seeder;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::ids::to_hex;

pub use memory::MemoryStore;
pub use seeder::Seeder;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Duplicate primary key {key} in {table}")]
    DuplicateKey { table: String, key: String },
    #[error("Duplicate value {value} for unique {columns} in {table}")]
    UniqueViolation {
        table: String,
        columns: String,
        value: String,
    },
    #[error("{table}.{column} = {value} references a missing {references} row")]
    ForeignKeyViolation {
        table: String,
        column: String,
        value: String,
        references: String,
    },
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Record for {table} is missing column {column}")]
    MissingColumn { table: String, column: String },
    #[error("Records for {table} do not share the same columns")]
    ShapeMismatch { table: String },
}

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Timestamp(OffsetDateTime),
    Date(Date),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

/// Identifiers are stored as 32-character lowercase hex.
impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Text(to_hex(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// One row: ordered column/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when both records have the same columns in the same order.
    pub fn same_shape(&self, other: &Record) -> bool {
        self.columns().eq(other.columns())
    }
}

/// Conversion of a generated entity into a row of its table.
pub trait ToRecord {
    const TABLE: &'static str;

    fn to_record(&self) -> Record;
}

/// Bulk sink for generated rows.
#[async_trait]
pub trait Store: Send + Sync {
    /// Appends `records` to `table`, returning the number of rows written.
    ///
    /// Fails on duplicate keys, unique violations, and dangling references.
    async fn insert_records(&self, table: &str, records: &[Record]) -> Result<u64, SeedError>;
}

/// Converts `rows` and writes them to their table.
pub async fn seed_rows<T>(store: &dyn Store, rows: &[T]) -> Result<u64, SeedError>
where
    T: ToRecord + Sync,
{
    info!("Seeding {} {}...", rows.len(), T::TABLE);

    let records: Vec<Record> = rows.iter().map(ToRecord::to_record).collect();
    let written = store.insert_records(T::TABLE, &records).await?;

    info!("Seeded {} {}", written, T::TABLE);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(3_i32)), Value::Integer(3));
        assert_eq!(Value::from("x"), Value::Text("x".to_string()));
        assert_eq!(
            Value::from(date!(2024 - 03 - 01)),
            Value::Date(date!(2024 - 03 - 01))
        );

        let id = Uuid::from_u128(0xfeed);
        assert_eq!(
            Value::from(id),
            Value::Text("0000000000000000000000000000feed".to_string())
        );
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::new()
            .with("id", "a")
            .with("count", 2_i64)
            .with("at", datetime!(2024-01-01 0:00 UTC));

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("count"), Some(&Value::Integer(2)));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.columns().collect::<Vec<_>>(), ["id", "count", "at"]);

        let other = Record::new().with("id", "b").with("at", Value::Null).with("count", 1_i64);
        assert!(!record.same_shape(&other));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Date(date!(2024 - 02 - 29)).to_string(), "2024-02-29");
    }
}
