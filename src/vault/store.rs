//! SQLite-backed vault storage.
//!
//! The vault is one SQLite file holding a single `servicecodes` table.
//! The table layout is kept compatible with databases written by earlier
//! releases of the tool:
//!
//! ```text
//! id                      INTEGER PRIMARY KEY AUTOINCREMENT
//! service_name            TEXT NOT NULL UNIQUE
//! description             TEXT
//! encrypted_backup_codes  BLOB
//! date_added              TEXT
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use log::debug;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::record::{EncryptedPayload, ServiceRecord};
use crate::errors::{Result, TwoFaError};

/// How long a second process waits on SQLite's file lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS servicecodes (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    service_name           TEXT NOT NULL UNIQUE,
    description            TEXT,
    encrypted_backup_codes BLOB,
    date_added             TEXT
);";

/// Raw column values of one row, before conversion into a `ServiceRecord`.
type RawRow = (i64, String, Option<String>, Option<Vec<u8>>, Option<String>);

/// Handle to the vault database.
pub struct VaultStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl VaultStore {
    /// Open (or create) the vault database at `path` and make sure the
    /// schema exists.
    ///
    /// The parent directory is created if missing.  Any failure to create,
    /// open, or initialise the file is `StoreUnavailable`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    TwoFaError::StoreUnavailable(format!(
                        "cannot create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            TwoFaError::StoreUnavailable(format!("cannot open {}: {e}", path.display()))
        })?;

        // Set restrictive permissions on the vault database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(path, perms);
        }

        conn.busy_timeout(BUSY_TIMEOUT)?;

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.ensure_schema()?;
        debug!("opened vault database at {}", path.display());
        Ok(store)
    }

    /// Open a throwaway in-memory vault (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the record table if it does not exist yet.  Idempotent.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(())
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM servicecodes", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Insert a new record stamped with the current time.  Returns its id.
    pub fn insert(
        &mut self,
        service_name: &str,
        description: Option<&str>,
        payload: &EncryptedPayload,
    ) -> Result<i64> {
        self.insert_at(service_name, description, payload, Utc::now())
    }

    /// Insert a new record with an explicit `date_added`.  Returns its id.
    ///
    /// A name that is already taken fails with `DuplicateServiceName`; the
    /// insert runs in its own transaction, so nothing is written in that case.
    pub fn insert_at(
        &mut self,
        service_name: &str,
        description: Option<&str>,
        payload: &EncryptedPayload,
        date_added: DateTime<Utc>,
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO servicecodes (service_name, description, encrypted_backup_codes, date_added)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                service_name,
                description,
                payload.as_bytes(),
                date_added.to_rfc3339()
            ],
        )
        .map_err(|e| map_insert_error(e, service_name))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!("inserted service record id={id}");
        Ok(id)
    }

    /// Every stored record, in insertion order, with empty decrypted codes.
    pub fn scan_all(&self) -> Result<Vec<ServiceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, service_name, description, encrypted_backup_codes, date_added
             FROM servicecodes
             ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| -> rusqlite::Result<RawRow> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row?)?);
        }

        debug!("scanned {} service record(s)", records.len());
        Ok(records)
    }

    /// Payload of the oldest record that has one, used to check an
    /// operator's key before a write.
    pub fn oldest_payload(&self) -> Result<Option<EncryptedPayload>> {
        let codes: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT encrypted_backup_codes FROM servicecodes
                 WHERE encrypted_backup_codes IS NOT NULL
                 ORDER BY id
                 LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(codes.map(EncryptedPayload::from_sealed))
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Path of the database file, or `None` for an in-memory vault.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Turn a uniqueness violation into `DuplicateServiceName`.
fn map_insert_error(err: rusqlite::Error, service_name: &str) -> TwoFaError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            TwoFaError::DuplicateServiceName(service_name.to_string())
        }
        other => other.into(),
    }
}

fn into_record((id, service_name, description, codes, date_added): RawRow) -> Result<ServiceRecord> {
    let Some(codes) = codes else {
        return Err(TwoFaError::CorruptRecord(service_name));
    };
    let Some(date_added) = date_added.as_deref().and_then(parse_timestamp) else {
        return Err(TwoFaError::CorruptRecord(service_name));
    };

    Ok(ServiceRecord::from_row(
        id,
        service_name,
        description,
        EncryptedPayload::from_sealed(codes),
        date_added,
    ))
}

/// Parse a stored `date_added` value.
///
/// Current rows hold RFC 3339.  Rows written by older releases hold a
/// naive local time such as `2024-03-01 09:15:42.123456`.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok()?;
    Some(
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc)),
    )
}
