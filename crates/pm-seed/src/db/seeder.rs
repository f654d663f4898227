//! PostgreSQL seeding.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use super::schema::{self, TABLES};
use super::{Record, SeedError, Store, Value};

/// Postgres caps bind parameters per statement at 65535.
const MAX_BIND_PARAMS: usize = 65_535;

/// Database seeder for inserting generated data.
///
/// Rows are written with multi-row `INSERT` statements of at most
/// `batch_size` rows, each in its own transaction.
pub struct Seeder {
    pool: PgPool,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            batch_size: 500,
        }
    }

    /// Sets the number of rows per insert statement.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), SeedError> {
        info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Deletes every seeded row, children first.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        info!("Clearing all seeded data...");

        for spec in TABLES.iter().rev() {
            let deleted = sqlx::query(&format!("DELETE FROM {}", spec.name))
                .execute(&self.pool)
                .await?
                .rows_affected();
            debug!("Deleted {} rows from {}", deleted, spec.name);
        }

        info!("All data cleared");
        Ok(())
    }

    /// Inserts one chunk of same-shaped records in a single statement.
    async fn insert_chunk(
        &self,
        table: &str,
        columns: &[&str],
        chunk: &[Record],
    ) -> Result<u64, SeedError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {table} ({}) ", columns.join(", ")));

        builder.push_values(chunk, |mut row, record| {
            for value in record.values() {
                match value {
                    Value::Null => {
                        row.push("NULL");
                    }
                    Value::Text(s) => {
                        row.push_bind(s.clone());
                    }
                    Value::Integer(n) => {
                        row.push_bind(*n);
                    }
                    Value::Real(x) => {
                        row.push_bind(*x);
                    }
                    Value::Bool(b) => {
                        row.push_bind(*b);
                    }
                    Value::Timestamp(ts) => {
                        row.push_bind(*ts);
                    }
                    Value::Date(d) => {
                        row.push_bind(*d);
                    }
                }
            }
        });

        let mut tx = self.pool.begin().await?;
        let result = builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(table, e))?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }
}

/// Maps constraint failures onto the matching [`SeedError`] variant.
fn classify(table: &str, err: sqlx::Error) -> SeedError {
    let sqlx::Error::Database(db_err) = &err else {
        return SeedError::Database(err);
    };
    let constraint = db_err.constraint().unwrap_or("unknown");

    constraint_error(table, db_err.kind(), constraint, db_err.message())
        .unwrap_or(SeedError::Database(err))
}

/// Postgres names primary key constraints `<table>_pkey`; those collisions
/// are reported as [`SeedError::DuplicateKey`] like every other store does.
fn constraint_error(
    table: &str,
    kind: ErrorKind,
    constraint: &str,
    message: &str,
) -> Option<SeedError> {
    match kind {
        ErrorKind::UniqueViolation if constraint.ends_with("_pkey") => {
            Some(SeedError::DuplicateKey {
                table: table.to_string(),
                key: message.to_string(),
            })
        }
        ErrorKind::UniqueViolation => Some(SeedError::UniqueViolation {
            table: table.to_string(),
            columns: constraint.to_string(),
            value: message.to_string(),
        }),
        ErrorKind::ForeignKeyViolation => Some(SeedError::ForeignKeyViolation {
            table: table.to_string(),
            column: constraint.to_string(),
            value: message.to_string(),
            references: "referenced table".to_string(),
        }),
        _ => None,
    }
}

#[async_trait]
impl Store for Seeder {
    async fn insert_records(&self, table: &str, records: &[Record]) -> Result<u64, SeedError> {
        // Table names are interpolated into SQL, so only catalog tables pass.
        let spec = schema::table(table).ok_or_else(|| SeedError::UnknownTable(table.to_string()))?;
        let Some(first) = records.first() else {
            return Ok(0);
        };
        if records.iter().any(|record| !record.same_shape(first)) {
            return Err(SeedError::ShapeMismatch {
                table: table.to_string(),
            });
        }

        let columns: Vec<&str> = first.columns().collect();
        let rows_per_statement = self
            .batch_size
            .min(MAX_BIND_PARAMS / columns.len().max(1))
            .max(1);

        let mut written = 0;
        for chunk in records.chunks(rows_per_statement) {
            written += self.insert_chunk(spec.name, &columns, chunk).await?;
            if written as usize % (rows_per_statement * 20) == 0 && (written as usize) < records.len() {
                info!("  Seeded {}/{} {}", written, records.len(), spec.name);
            }
        }

        Ok(written)
    }
}
