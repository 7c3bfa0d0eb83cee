//! SQLite export of product records
//!
//! Every run gets a row in `runs`; its records go to `products` keyed by
//! `(run_id, position)`. Runs are never merged or de-duplicated.

use crate::model::ProductRecord;
use crate::output::schema::initialize_schema;
use crate::output::traits::{OutputResult, ResultSink};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// Durable store appending each run to a SQLite database
pub struct SqliteSink {
    conn: Connection,
    run_id: i64,
    position: i64,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path` and starts a new run
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Hash of the configuration driving this run
    pub fn open(path: &Path, config_hash: &str) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::start(conn, config_hash)
    }

    /// Creates an in-memory database with a fresh run
    pub fn open_in_memory(config_hash: &str) -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::start(conn, config_hash)
    }

    fn start(conn: Connection, config_hash: &str) -> OutputResult<Self> {
        initialize_schema(&conn)?;

        conn.execute(
            "INSERT INTO runs (started_at, config_hash) VALUES (?1, ?2)",
            params![Utc::now().to_rfc3339(), config_hash],
        )?;
        let run_id = conn.last_insert_rowid();
        tracing::debug!("Started SQLite run {}", run_id);

        Ok(Self {
            conn,
            run_id,
            position: 0,
        })
    }

    /// Identifier of the run this sink writes to
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Loads the records of `run_id` in encounter order
    pub fn load_products(&self, run_id: i64) -> OutputResult<Vec<ProductRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, title, color, price, link, image_path
             FROM products WHERE run_id = ?1 ORDER BY position",
        )?;

        let records = stmt
            .query_map(params![run_id], |row| {
                Ok(ProductRecord {
                    category: row.get(0)?,
                    title: row.get(1)?,
                    color: row.get(2)?,
                    price: row.get(3)?,
                    link: row.get(4)?,
                    image_path: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Returns `(finished_at, record_count)` for `run_id`
    pub fn run_status(&self, run_id: i64) -> OutputResult<(Option<String>, i64)> {
        let status = self.conn.query_row(
            "SELECT finished_at, record_count FROM runs WHERE id = ?1",
            params![run_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(status)
    }
}

impl ResultSink for SqliteSink {
    fn append(&mut self, record: ProductRecord) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO products (run_id, position, category, title, color, price, link, image_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.run_id,
                self.position,
                record.category,
                record.title,
                record.color,
                record.price,
                record.link,
                record.image_path,
            ],
        )?;
        self.position += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.conn.execute(
            "UPDATE runs SET finished_at = ?1, record_count = ?2 WHERE id = ?3",
            params![Utc::now().to_rfc3339(), self.position, self.run_id],
        )?;
        tracing::info!("Stored {} records in run {}", self.position, self.run_id);
        Ok(())
    }
}
