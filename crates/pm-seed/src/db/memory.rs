//! In-memory store that enforces the table catalog.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::schema::{self, TableSpec};
use super::{Record, SeedError, Store, Value};

/// Keeps rows per table and rejects duplicate keys, unique violations, and
/// dangling references the way the database would.
///
/// A batch is validated as a whole before any of it is kept, so a failed
/// insert leaves the store unchanged.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the rows stored in `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .lock()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn count(&self, table: &str) -> usize {
        self.tables.lock().await.get(table).map_or(0, Vec::len)
    }

    pub async fn total_rows(&self) -> usize {
        self.tables.lock().await.values().map(Vec::len).sum()
    }
}

fn key_of(record: &Record, columns: &[&str]) -> Option<Vec<String>> {
    columns
        .iter()
        .map(|column| match record.get(column) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value.to_string()),
        })
        .collect()
}

fn check_columns(spec: &TableSpec, record: &Record) -> Result<(), SeedError> {
    let required = spec
        .primary_key
        .iter()
        .chain(spec.unique.iter().flat_map(|cols| cols.iter()))
        .chain(spec.foreign_keys.iter().map(|key| &key.column));

    for column in required {
        if record.get(column).is_none() {
            return Err(SeedError::MissingColumn {
                table: spec.name.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Primary key values of a referenced table, including rows staged in the
/// current batch when the table references itself.
fn referenced_keys(
    tables: &HashMap<String, Vec<Record>>,
    referenced: &TableSpec,
    staged: &[Record],
    self_reference: bool,
) -> HashSet<String> {
    let column = referenced.primary_key[0];
    let existing = tables.get(referenced.name).map(Vec::as_slice).unwrap_or(&[]);
    let staged = if self_reference { staged } else { &[] };

    existing
        .iter()
        .chain(staged)
        .filter_map(|row| row.get(column).map(Value::to_string))
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_records(&self, table: &str, records: &[Record]) -> Result<u64, SeedError> {
        let spec = schema::table(table).ok_or_else(|| SeedError::UnknownTable(table.to_string()))?;
        let Some(first) = records.first() else {
            return Ok(0);
        };

        for record in records {
            if !record.same_shape(first) {
                return Err(SeedError::ShapeMismatch {
                    table: table.to_string(),
                });
            }
        }
        check_columns(spec, first)?;

        let mut tables = self.tables.lock().await;
        let existing = tables.get(table).map(Vec::as_slice).unwrap_or(&[]);

        let mut primary: HashSet<Vec<String>> = existing
            .iter()
            .filter_map(|row| key_of(row, spec.primary_key))
            .collect();
        for record in records {
            if let Some(key) = key_of(record, spec.primary_key)
                && !primary.insert(key.clone())
            {
                return Err(SeedError::DuplicateKey {
                    table: table.to_string(),
                    key: key.join(", "),
                });
            }
        }

        for columns in spec.unique {
            let mut seen: HashSet<Vec<String>> = existing
                .iter()
                .filter_map(|row| key_of(row, columns))
                .collect();
            for record in records {
                if let Some(key) = key_of(record, columns)
                    && !seen.insert(key.clone())
                {
                    return Err(SeedError::UniqueViolation {
                        table: table.to_string(),
                        columns: columns.join(", "),
                        value: key.join(", "),
                    });
                }
            }
        }

        for foreign in spec.foreign_keys {
            let referenced = schema::table(foreign.references)
                .ok_or_else(|| SeedError::UnknownTable(foreign.references.to_string()))?;
            let known = referenced_keys(&tables, referenced, records, referenced.name == table);

            for record in records {
                match record.get(foreign.column) {
                    Some(Value::Null) | None => {}
                    Some(value) => {
                        let value = value.to_string();
                        if !known.contains(&value) {
                            return Err(SeedError::ForeignKeyViolation {
                                table: table.to_string(),
                                column: foreign.column.to_string(),
                                value,
                                references: foreign.references.to_string(),
                            });
                        }
                    }
                }
            }
        }

        tables
            .entry(table.to_string())
            .or_default()
            .extend_from_slice(records);
        debug!("Stored {} rows in {}", records.len(), table);

        Ok(records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn org(id: &str) -> Record {
        Record::new()
            .with("organization_id", id)
            .with("name", "Acme")
            .with("domain", "acme.com")
            .with("created_at", datetime!(2024-01-01 0:00 UTC))
    }

    fn user(id: &str, org: &str, email: &str) -> Record {
        Record::new()
            .with("user_id", id)
            .with("organization_id", org)
            .with("email", email)
            .with("name", "Ada")
            .with("role", "Engineer")
            .with("department", "Engineering")
            .with("created_at", datetime!(2024-01-02 0:00 UTC))
    }

    #[tokio::test]
    async fn test_insert_and_count() {
        let store = MemoryStore::new();
        assert_eq!(store.insert_records("organizations", &[org("o1")]).await.unwrap(), 1);
        assert_eq!(
            store
                .insert_records("users", &[user("u1", "o1", "a@x"), user("u2", "o1", "b@x")])
                .await
                .unwrap(),
            2
        );
        assert_eq!(store.count("users").await, 2);
        assert_eq!(store.total_rows().await, 3);
        assert_eq!(store.rows("users").await[1].get("email"), Some(&Value::from("b@x")));
    }

    #[tokio::test]
    async fn test_duplicate_primary_key() {
        let store = MemoryStore::new();
        store.insert_records("organizations", &[org("o1")]).await.unwrap();

        let err = store.insert_records("organizations", &[org("o1")]).await.unwrap_err();
        assert!(matches!(err, SeedError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_unique_email() {
        let store = MemoryStore::new();
        store.insert_records("organizations", &[org("o1")]).await.unwrap();

        let err = store
            .insert_records("users", &[user("u1", "o1", "a@x"), user("u2", "o1", "a@x")])
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::UniqueViolation { .. }));
        assert_eq!(store.count("users").await, 0, "failed batch must not be kept");
    }

    #[tokio::test]
    async fn test_dangling_reference() {
        let store = MemoryStore::new();
        let err = store
            .insert_records("users", &[user("u1", "missing", "a@x")])
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_table_and_shape() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert_records("activities", &[org("o1")]).await,
            Err(SeedError::UnknownTable(_))
        ));

        let odd = Record::new().with("organization_id", "o2");
        assert!(matches!(
            store.insert_records("organizations", &[org("o1"), odd]).await,
            Err(SeedError::ShapeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_key_column() {
        let store = MemoryStore::new();
        let nameless = Record::new().with("name", "Acme");
        assert!(matches!(
            store.insert_records("organizations", &[nameless]).await,
            Err(SeedError::MissingColumn { .. })
        ));
    }
}
