//! SQLite persistence for scan snapshots and last-known stock metadata.

use crate::error::{AppError, Result};
use crate::types::{ScoreResult, StockInfo};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// A persisted scoring result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPrediction {
    pub run_id: String,
    pub ticker: String,
    pub score: f64,
    pub created_at: String,
    pub analysis: ScoreResult,
}

/// SQLite store for prediction history and the stock metadata cache.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;
        info!("SQLite store opened at {}", path.as_ref().display());
        Ok(store)
    }

    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("SQLite connection lock poisoned".into()))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_id TEXT NOT NULL,
                ticker TEXT NOT NULL,
                score REAL NOT NULL,
                technical_score REAL,
                sentiment_score REAL,
                volume_score REAL,
                ml_prediction REAL,
                analysis_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_predictions_run ON predictions(run_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_predictions_created ON predictions(created_at DESC)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS stock_cache (
                ticker TEXT PRIMARY KEY,
                data_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    // ========== Predictions ==========

    /// Append one result to the run `run_id`.
    pub fn save_prediction(&self, run_id: &str, result: &ScoreResult) -> Result<()> {
        let analysis_json = serde_json::to_string(result)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO predictions
                (run_id, ticker, score, technical_score, sentiment_score, volume_score,
                 ml_prediction, analysis_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                run_id,
                result.ticker,
                result.total_score,
                result.technical_score,
                result.sentiment_score,
                result.volume_score,
                result.ml_surge_probability,
                analysis_json,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Results of the most recent run, best score first.
    pub fn latest_predictions(&self, limit: usize) -> Result<Vec<StoredPrediction>> {
        let conn = self.conn()?;
        let run_id: Option<String> = conn
            .query_row(
                "SELECT run_id FROM predictions ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let Some(run_id) = run_id else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            "SELECT run_id, ticker, score, created_at, analysis_json
             FROM predictions WHERE run_id = ?1
             ORDER BY score DESC, id ASC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![run_id, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (run_id, ticker, score, created_at, json) = row?;
            out.push(StoredPrediction {
                run_id,
                ticker,
                score,
                created_at,
                analysis: serde_json::from_str(&json)?,
            });
        }
        Ok(out)
    }

    /// Number of rows saved under `run_id`.
    pub fn run_size(&self, run_id: &str) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM predictions WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ========== Stock cache ==========

    pub fn cache_stock(&self, info: &StockInfo) -> Result<()> {
        let json = serde_json::to_string(info)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO stock_cache (ticker, data_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(ticker) DO UPDATE SET data_json = excluded.data_json, updated_at = excluded.updated_at",
            params![info.ticker, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn cached_stock(&self, ticker: &str) -> Result<Option<StockInfo>> {
        let conn = self.conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT data_json FROM stock_cache WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(AppError::from))
            .transpose()
    }
}
