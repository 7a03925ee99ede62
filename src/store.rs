use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::models::RunRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only history of completed runs. The report engine never reads
/// this; it exists for the history view and for audit. One row is written
/// per completed run by the surrounding application.
pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open (and initialise if needed) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                property_address TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                internal_report_path TEXT NOT NULL,
                client_report_path TEXT NOT NULL,
                signal_count INTEGER NOT NULL,
                red_count INTEGER NOT NULL,
                amber_count INTEGER NOT NULL,
                green_count INTEGER NOT NULL
            )",
        )?;
        Ok(())
    }

    /// Record a completed run. Returns the new row id.
    pub fn insert_run(&self, record: &RunRecord) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO reports
                (property_address, created_at, internal_report_path, client_report_path,
                 signal_count, red_count, amber_count, green_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.property_address,
                record.created_at,
                record.internal_report_path,
                record.client_report_path,
                record.signal_count as i64,
                record.red_count as i64,
                record.amber_count as i64,
                record.green_count as i64,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent runs, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<RunRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, property_address, created_at, internal_report_path,
                    client_report_path, signal_count, red_count, amber_count, green_count
             FROM reports
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(RunRecord {
                id: Some(row.get(0)?),
                property_address: row.get(1)?,
                created_at: row.get::<_, DateTime<Utc>>(2)?,
                internal_report_path: row.get(3)?,
                client_report_path: row.get(4)?,
                signal_count: row.get::<_, i64>(5)? as usize,
                red_count: row.get::<_, i64>(6)? as usize,
                amber_count: row.get::<_, i64>(7)? as usize,
                green_count: row.get::<_, i64>(8)? as usize,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
