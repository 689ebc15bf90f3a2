use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::models::{ListingId, ListingRecord};
use crate::store::StoreError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS listings (
        id   INTEGER PRIMARY KEY,
        url  TEXT,
        json TEXT NOT NULL
    )";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Listing document store over a single long-lived SQLite connection.
///
/// Each row holds one whole [`ListingRecord`] serialized as JSON; writes
/// replace the document wholesale. Mutations run inside a transaction that
/// is committed on success and rolled back on any error.
///
/// The connection is opened in WAL mode so several stores, possibly in other
/// processes, can share one file: readers never wait on the writer. Release
/// the connection with [`close`](Self::close), or let the store drop.
pub struct ListingStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl ListingStore {
    /// Open or create the store file at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        configure(&conn)?;
        debug!(path = %path.display(), "opened listing store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Ephemeral store, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the listings table if it does not exist yet.
    pub fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.in_transaction("ensure_schema", |tx| {
            tx.execute_batch(SCHEMA)?;
            Ok(())
        })?;
        debug!("listing table verified");
        Ok(())
    }

    /// Insert or replace the document for `record.id`.
    pub fn put(&mut self, record: &ListingRecord) -> Result<(), StoreError> {
        if record.id <= 0 {
            return Err(StoreError::MissingIdentity(record.id));
        }
        // JSON has no NaN or infinity; such a float would be written as null.
        for (field, value) in [("cost", record.cost), ("average_rating", record.average_rating)] {
            if !value.is_finite() {
                return Err(StoreError::NonFinite {
                    id: record.id,
                    field,
                });
            }
        }
        let json = serde_json::to_string(record).map_err(|source| StoreError::Serialize {
            id: record.id,
            source,
        })?;

        self.in_transaction("put", |tx| {
            tx.execute(
                "INSERT OR REPLACE INTO listings (id, url, json) VALUES (?1, ?2, ?3)",
                params![record.id, record.url, json],
            )?;
            Ok(())
        })?;

        info!(listing_id = record.id, "saved listing");
        Ok(())
    }

    pub fn get(&self, id: ListingId) -> Result<Option<ListingRecord>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT json FROM listings WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;

        json.map(|json| {
            serde_json::from_str(&json).map_err(|source| {
                error!(listing_id = id, error = %source, "corrupt listing document");
                StoreError::CorruptDocument { id, source }
            })
        })
        .transpose()
    }

    /// Every readable document, ordered by id. Corrupt rows are skipped.
    pub fn list_all(&self) -> Result<Vec<ListingRecord>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, json FROM listings ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, ListingId>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut listings = Vec::new();
        for row in rows {
            let (id, json) = row?;
            match serde_json::from_str(&json) {
                Ok(record) => listings.push(record),
                Err(e) => warn!(listing_id = id, error = %e, "failed to parse listing, skipping"),
            }
        }
        Ok(listings)
    }

    /// Case-insensitive substring scan over every stored `location`.
    pub fn find_by_location(&self, query: &str) -> Result<Vec<ListingRecord>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|record| record.location.to_lowercase().contains(&needle))
            .collect())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Remove a listing; `false` when there was nothing to remove.
    pub fn delete(&mut self, id: ListingId) -> Result<bool, StoreError> {
        let removed = self.in_transaction("delete", |tx| {
            Ok(tx.execute("DELETE FROM listings WHERE id = ?1", params![id])? > 0)
        })?;

        if removed {
            info!(listing_id = id, "deleted listing");
        } else {
            warn!(listing_id = id, "listing not found for deletion");
        }
        Ok(removed)
    }

    pub fn exists(&self, id: ListingId) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM listings WHERE id = ?1 LIMIT 1",
                params![id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Journal mode reported by SQLite, `wal` for file-backed stores.
    pub fn journal_mode(&self) -> Result<String, StoreError> {
        Ok(self
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))?)
    }

    /// Release the connection, surfacing any error from closing it.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))?;
        debug!("listing store closed");
        Ok(())
    }

    fn in_transaction<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let tx = self.conn.transaction()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback() {
                    error!(op, error = %rollback, "rollback failed");
                }
                error!(op, error = %e, "store operation failed, rolled back");
                Err(e)
            }
        }
    }
}

fn configure(conn: &Connection) -> Result<(), StoreError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    debug!(journal_mode = %mode, "configured sqlite connection");
    Ok(())
}
