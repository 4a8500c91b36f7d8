//! SQLite-based storage for calculation results and request logs.
//!
//! Provides persistent storage for:
//! - Calculation results, keyed by caller (nullable for anonymous calls)
//! - The status-check log
//! - Concepts access leads

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::migrations;
use crate::engine::{CalculationInputs, CalculationResult, Tier};
use crate::error::{CoreError, DatabaseError};
use crate::records::{ConceptAccess, StatusCheck};

/// A stored calculation together with the caller that requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub caller_id: Option<String>,
    #[serde(flatten)]
    pub result: CalculationResult,
}

/// Fixed-width timestamps so lexical order matches chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(table: &'static str, s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::CorruptRow {
            table,
            message: format!("bad timestamp '{s}': {e}"),
        })
}

struct CalculationRow {
    id: String,
    caller_id: Option<String>,
    inputs: String,
    value_number: f64,
    recommendation: String,
    explanation: String,
    computed_at: String,
}

impl CalculationRow {
    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            caller_id: row.get(1)?,
            inputs: row.get(2)?,
            value_number: row.get(3)?,
            recommendation: row.get(4)?,
            explanation: row.get(5)?,
            computed_at: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<CalculationRecord, DatabaseError> {
        let corrupt = |message: String| DatabaseError::CorruptRow {
            table: "calculations",
            message,
        };
        let inputs: CalculationInputs = serde_json::from_str(&self.inputs)
            .map_err(|e| corrupt(format!("inputs for {}: {e}", self.id)))?;
        let tier = Tier::parse(&self.recommendation)
            .ok_or_else(|| corrupt(format!("unknown recommendation '{}'", self.recommendation)))?;
        let computed_at = parse_timestamp("calculations", &self.computed_at)?;
        Ok(CalculationRecord {
            caller_id: self.caller_id,
            result: CalculationResult::restore(
                self.id,
                inputs,
                self.value_number,
                tier,
                self.explanation,
                computed_at,
            ),
        })
    }
}

const CALCULATION_COLUMNS: &str =
    "id, caller_id, inputs, value_number, recommendation, explanation, computed_at";

/// SQLite database for calculation results and request logs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/valuenum.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unusable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("valuenum.db");
        Ok(Self::open_at(path)?)
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Calculations ────────────────────────────────────────────────

    /// Store a calculation result verbatim plus the caller identifier.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_calculation(
        &self,
        result: &CalculationResult,
        caller_id: Option<&str>,
    ) -> Result<(), CoreError> {
        let inputs = serde_json::to_string(result.inputs())?;
        self.conn
            .execute(
                "INSERT INTO calculations (id, caller_id, calculation_type, inputs, value_number,
                                           recommendation, explanation, computed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    result.id(),
                    caller_id,
                    result.formula_kind().as_str(),
                    inputs,
                    result.value_number(),
                    result.tier().as_str(),
                    result.rationale(),
                    format_timestamp(result.computed_at()),
                ],
            )
            .map_err(DatabaseError::from)?;
        tracing::debug!(id = result.id(), caller = ?caller_id, "calculation recorded");
        Ok(())
    }

    /// Most recent calculations for one caller, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn calculation_history(
        &self,
        caller_id: &str,
        limit: usize,
    ) -> Result<Vec<CalculationRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CALCULATION_COLUMNS} FROM calculations
             WHERE caller_id = ?1
             ORDER BY computed_at DESC, rowid DESC
             LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![caller_id, limit as i64], CalculationRow::from_row)?;
        let records = rows.map(|row| row?.into_record()).collect();
        records
    }

    /// Most recent calculations across all callers, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn recent_calculations(&self, limit: usize) -> Result<Vec<CalculationRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CALCULATION_COLUMNS} FROM calculations
             ORDER BY computed_at DESC, rowid DESC
             LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit as i64], CalculationRow::from_row)?;
        let records = rows.map(|row| row?.into_record()).collect();
        records
    }

    pub fn get_calculation(&self, id: &str) -> Result<Option<CalculationRecord>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CALCULATION_COLUMNS} FROM calculations WHERE id = ?1"),
                params![id],
                CalculationRow::from_row,
            )
            .optional()?;
        row.map(CalculationRow::into_record).transpose()
    }

    // ── Status checks ───────────────────────────────────────────────

    pub fn record_status_check(&self, check: &StatusCheck) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO status_checks (id, client_name, timestamp) VALUES (?1, ?2, ?3)",
            params![check.id, check.client_name, format_timestamp(check.timestamp)],
        )?;
        Ok(())
    }

    /// Status checks in insertion order.
    pub fn list_status_checks(&self, limit: usize) -> Result<Vec<StatusCheck>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, client_name, timestamp FROM status_checks ORDER BY rowid LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut checks = Vec::new();
        for row in rows {
            let (id, client_name, timestamp) = row?;
            checks.push(StatusCheck {
                id,
                client_name,
                timestamp: parse_timestamp("status_checks", &timestamp)?,
            });
        }
        Ok(checks)
    }

    // ── Concepts access ─────────────────────────────────────────────

    pub fn record_concept_access(&self, access: &ConceptAccess) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO concept_access (id, fullname, email, zip, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                access.id,
                access.fullname,
                access.email,
                access.zip,
                format_timestamp(access.timestamp),
            ],
        )?;
        Ok(())
    }

    /// Leads, newest first.
    pub fn list_concept_access(&self, limit: usize) -> Result<Vec<ConceptAccess>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, fullname, email, zip, timestamp FROM concept_access
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut leads = Vec::new();
        for row in rows {
            let (id, fullname, email, zip, timestamp) = row?;
            leads.push(ConceptAccess {
                id,
                fullname,
                email,
                zip,
                timestamp: parse_timestamp("concept_access", &timestamp)?,
            });
        }
        Ok(leads)
    }
}
