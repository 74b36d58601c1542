use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, TapError};
use crate::domain::Record;
use crate::store::{Store, StoredRecord};
use crate::streams::StreamKind;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| TapError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            TapError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    fn row_to_record(stream: StreamKind, row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
        let payload: String = row.get(1)?;
        let payload = serde_json::from_str(&payload).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(StoredRecord {
            stream,
            key: row.get(0)?,
            payload,
            extracted_at: row
                .get::<_, String>(2)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        })
    }
}

impl Store for SqliteStore {
    fn put_record(&self, record: &Record, extracted_at: DateTime<Utc>) -> Result<()> {
        let payload = serde_json::to_string(record)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO records (stream, record_key, payload, extracted_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(stream, record_key) DO UPDATE SET
                payload = excluded.payload,
                extracted_at = excluded.extracted_at",
            params![
                record.stream().name(),
                record.key(),
                payload,
                extracted_at.to_rfc3339()
            ],
        )?;

        Ok(())
    }

    fn get_record(&self, stream: StreamKind, key: &str) -> Result<Option<StoredRecord>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                "SELECT record_key, payload, extracted_at FROM records
                 WHERE stream = ?1 AND record_key = ?2",
                params![stream.name(), key],
                |row| Self::row_to_record(stream, row),
            )
            .optional()?;

        Ok(result)
    }

    fn records(&self, stream: StreamKind) -> Result<Vec<StoredRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT record_key, payload, extracted_at FROM records
             WHERE stream = ?1 ORDER BY extracted_at, rowid",
        )?;

        let records = stmt
            .query_map(params![stream.name()], |row| Self::row_to_record(stream, row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
