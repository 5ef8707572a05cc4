//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tracing::{debug, info};

use firehall_types::{LocalId, ReferencePartition, ReferenceRecord, TenantId};

use crate::error::{Error, Result};
use crate::models::{QueuedInspection, meta_keys};
use crate::schema;

/// SQLite-based store for offline Firehall data.
///
/// One store holds the reference cache for the active tenant, the
/// pending-inspection queue, and a small metadata table. Writes are durable
/// once the call returns.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] when the file cannot be opened or
    /// written, and [`Error::Corrupt`] when it exists but is not a usable
    /// database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL keeps readers unblocked while the snapshot loader writes
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Delete the database files at `path` and open a fresh store.
    ///
    /// This is the recovery path for a corrupt database. All locally cached
    /// reference data and any pending inspections are lost.
    pub fn reset<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // The WAL sidecars must go too, or SQLite replays them on open
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.as_os_str().to_owned();
            file.push(suffix);
            let file = std::path::PathBuf::from(file);
            if file.exists() {
                std::fs::remove_file(&file)?;
            }
        }

        info!("Reset database at {}", path.display());
        Self::open(path)
    }
}

// Reference partition operations
impl Store {
    /// Insert or update records in their partition.
    ///
    /// Existing records with the same id are overwritten; other records in
    /// the partition are untouched. Returns the number of rows written.
    pub fn put_many<R>(&mut self, records: &[R]) -> Result<usize>
    where
        R: ReferenceRecord + Serialize,
    {
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO reference_records (partition, id, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT(partition, id) DO UPDATE SET body = excluded.body",
            )?;
            for record in records {
                let body = serde_json::to_string(record)?;
                written += stmt.execute(rusqlite::params![
                    R::PARTITION.as_str(),
                    record.id(),
                    body
                ])?;
            }
        }
        tx.commit()?;

        debug!("Wrote {} records into partition {}", written, R::PARTITION);
        Ok(written)
    }

    /// Replace the whole partition with the given records.
    ///
    /// Clear and fill run in one transaction, so concurrent readers see
    /// either the previous full set or the new full set, never a mix.
    /// Returns the number of records now in the partition.
    pub fn replace_all<R>(&mut self, records: &[R]) -> Result<usize>
    where
        R: ReferenceRecord + Serialize,
    {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM reference_records WHERE partition = ?",
            [R::PARTITION.as_str()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO reference_records (partition, id, body) VALUES (?1, ?2, ?3)",
            )?;
            for record in records {
                let body = serde_json::to_string(record)?;
                stmt.execute(rusqlite::params![R::PARTITION.as_str(), record.id(), body])?;
            }
        }
        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM reference_records WHERE partition = ?",
            [R::PARTITION.as_str()],
            |row| row.get(0),
        )?;
        tx.commit()?;

        debug!("Replaced partition {} with {} records", R::PARTITION, count);
        Ok(count as usize)
    }

    /// Load every record in the partition, ordered by id.
    pub fn get_all<R>(&self) -> Result<Vec<R>>
    where
        R: ReferenceRecord + DeserializeOwned,
    {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM reference_records WHERE partition = ? ORDER BY id",
        )?;
        let bodies = stmt
            .query_map([R::PARTITION.as_str()], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(Error::from))
            .collect()
    }

    /// Load a single record by id, if present.
    pub fn get_one<R>(&self, id: &str) -> Result<Option<R>>
    where
        R: ReferenceRecord + DeserializeOwned,
    {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM reference_records WHERE partition = ?1 AND id = ?2",
                rusqlite::params![R::PARTITION.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    /// Delete a single record. Returns whether a record was removed.
    pub fn delete_one(&self, partition: ReferencePartition, id: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM reference_records WHERE partition = ?1 AND id = ?2",
            rusqlite::params![partition.as_str(), id],
        )?;
        Ok(deleted > 0)
    }

    /// Delete every record in the partition. Returns the number removed.
    pub fn clear(&self, partition: ReferencePartition) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM reference_records WHERE partition = ?",
            [partition.as_str()],
        )?;
        debug!("Cleared {} records from partition {}", deleted, partition);
        Ok(deleted)
    }

    /// Count records in the partition.
    pub fn count(&self, partition: ReferencePartition) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reference_records WHERE partition = ?",
            [partition.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

// Pending queue operations
impl Store {
    /// Append an inspection to the pending queue.
    ///
    /// The row is durable once this returns; a crash immediately after
    /// cannot lose the record.
    pub fn enqueue_pending(&self, record: &QueuedInspection) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pending_inspections (local_id, payload, synced, created_at, synced_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                record.local_id.as_str(),
                serde_json::to_string(&record.payload)?,
                record.synced,
                record.created_at.unix_timestamp(),
                record.synced_at.map(|at| at.unix_timestamp()),
            ],
        )?;

        debug!("Enqueued pending inspection {}", record.local_id);
        Ok(())
    }

    /// Every queued inspection, synced or not, in creation order.
    pub fn pending(&self) -> Result<Vec<QueuedInspection>> {
        self.query_pending(
            "SELECT local_id, payload, synced, created_at, synced_at
             FROM pending_inspections ORDER BY seq ASC",
        )
    }

    /// Queued inspections not yet accepted by the server, in creation order.
    pub fn unsynced_pending(&self) -> Result<Vec<QueuedInspection>> {
        self.query_pending(
            "SELECT local_id, payload, synced, created_at, synced_at
             FROM pending_inspections WHERE synced = 0 ORDER BY seq ASC",
        )
    }

    /// Look up a queued inspection by its local id.
    pub fn get_pending(&self, local_id: &LocalId) -> Result<Option<QueuedInspection>> {
        let mut stmt = self.conn.prepare(
            "SELECT local_id, payload, synced, created_at, synced_at
             FROM pending_inspections WHERE local_id = ?",
        )?;
        let row = stmt
            .query_row([local_id.as_str()], pending_row)
            .optional()?;

        row.map(pending_from_row).transpose()
    }

    /// Flag a queued inspection as accepted by the server.
    ///
    /// Returns `true` if the record transitioned from unsynced to synced.
    /// Marking an already-synced or missing record changes nothing and
    /// returns `false`; the synced flag never goes back.
    pub fn mark_synced(&self, local_id: &LocalId) -> Result<bool> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let changed = self.conn.execute(
            "UPDATE pending_inspections SET synced = 1, synced_at = ?1
             WHERE local_id = ?2 AND synced = 0",
            rusqlite::params![now, local_id.as_str()],
        )?;

        if changed > 0 {
            debug!("Marked pending inspection {} as synced", local_id);
        }
        Ok(changed > 0)
    }

    /// Remove a queued inspection. Returns whether a record was removed.
    pub fn delete_pending(&self, local_id: &LocalId) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM pending_inspections WHERE local_id = ?",
            [local_id.as_str()],
        )?;
        Ok(deleted > 0)
    }

    /// Remove every synced inspection from the queue.
    ///
    /// Returns the number removed. Unsynced records are never touched.
    pub fn purge_synced(&self) -> Result<usize> {
        let purged = self
            .conn
            .execute("DELETE FROM pending_inspections WHERE synced = 1", [])?;

        if purged > 0 {
            info!("Purged {} synced inspections from the queue", purged);
        }
        Ok(purged)
    }

    /// Count inspections still waiting for upload.
    pub fn count_unsynced(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pending_inspections WHERE synced = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn query_pending(&self, sql: &str) -> Result<Vec<QueuedInspection>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], pending_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(pending_from_row).collect()
    }
}

type PendingRow = (String, String, bool, i64, Option<i64>);

fn pending_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PendingRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn pending_from_row(
    (local_id, payload, synced, created_at, synced_at): PendingRow,
) -> Result<QueuedInspection> {
    Ok(QueuedInspection {
        local_id: LocalId::new(local_id),
        payload: serde_json::from_str(&payload)?,
        synced,
        created_at: OffsetDateTime::from_unix_timestamp(created_at).unwrap(),
        synced_at: synced_at.map(|ts| OffsetDateTime::from_unix_timestamp(ts).unwrap()),
    })
}

// Metadata operations
impl Store {
    /// Read a metadata value.
    pub fn meta(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a metadata value, replacing any previous one.
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// When the reference cache was last repopulated, if ever.
    pub fn last_snapshot_at(&self) -> Result<Option<OffsetDateTime>> {
        self.meta_timestamp(meta_keys::LAST_SNAPSHOT_AT)
    }

    /// Record a successful snapshot.
    pub fn set_last_snapshot_at(&self, at: OffsetDateTime) -> Result<()> {
        self.set_meta_timestamp(meta_keys::LAST_SNAPSHOT_AT, at)
    }

    /// When the pending queue was last reconciled, if ever.
    pub fn last_sync_at(&self) -> Result<Option<OffsetDateTime>> {
        self.meta_timestamp(meta_keys::LAST_SYNC_AT)
    }

    /// Record a reconcile pass.
    pub fn set_last_sync_at(&self, at: OffsetDateTime) -> Result<()> {
        self.set_meta_timestamp(meta_keys::LAST_SYNC_AT, at)
    }

    /// The tenant whose data currently fills the reference partitions.
    pub fn active_tenant(&self) -> Result<Option<TenantId>> {
        Ok(self.meta(meta_keys::ACTIVE_TENANT)?.map(TenantId::new))
    }

    /// Record which tenant the cached data belongs to.
    pub fn set_active_tenant(&self, tenant: &TenantId) -> Result<()> {
        self.set_meta(meta_keys::ACTIVE_TENANT, tenant.as_str())
    }

    fn meta_timestamp(&self, key: &str) -> Result<Option<OffsetDateTime>> {
        Ok(self
            .meta(key)?
            .and_then(|value| value.parse::<i64>().ok())
            .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok()))
    }

    fn set_meta_timestamp(&self, key: &str, at: OffsetDateTime) -> Result<()> {
        self.set_meta(key, &at.unix_timestamp().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firehall_types::{Building, InspectionDraft, InspectionTemplate};
    use serde_json::json;

    fn building(id: &str, name: &str) -> Building {
        Building {
            id: id.to_string(),
            name: Some(name.to_string()),
            address: None,
            extra: serde_json::Map::new(),
        }
    }

    fn template(id: &str) -> InspectionTemplate {
        InspectionTemplate {
            id: id.to_string(),
            name: None,
            extra: serde_json::Map::new(),
        }
    }

    fn draft() -> InspectionDraft {
        InspectionDraft::from_value(json!({ "buildingId": "1", "answers": [] })).unwrap()
    }

    fn queued(local_id: &str) -> QueuedInspection {
        QueuedInspection::new(LocalId::new(local_id), draft())
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 0);
        assert_eq!(store.count_unsynced().unwrap(), 0);
    }

    #[test]
    fn test_put_and_get_records() {
        let mut store = Store::open_in_memory().unwrap();

        store
            .put_many(&[building("a1", "Station 1"), building("a2", "Station 2")])
            .unwrap();

        let all: Vec<Building> = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "a1");
        assert_eq!(all[0].name.as_deref(), Some("Station 1"));
    }

    #[test]
    fn test_put_many_upserts_existing_records() {
        let mut store = Store::open_in_memory().unwrap();

        store.put_many(&[building("a1", "Old name")]).unwrap();
        store.put_many(&[building("a1", "New name")]).unwrap();

        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 1);
        let one: Building = store.get_one("a1").unwrap().unwrap();
        assert_eq!(one.name.as_deref(), Some("New name"));
    }

    #[test]
    fn test_get_one_missing_returns_none() {
        let store = Store::open_in_memory().unwrap();
        let missing: Option<Building> = store.get_one("nope").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_replace_all_drops_stale_records() {
        let mut store = Store::open_in_memory().unwrap();

        store
            .replace_all(&[building("a1", "One"), building("a2", "Two")])
            .unwrap();
        let replaced = store.replace_all(&[building("a3", "Three")]).unwrap();

        assert_eq!(replaced, 1);
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 1);
        let gone: Option<Building> = store.get_one("a1").unwrap();
        assert!(gone.is_none());
    }

    #[test]
    fn test_replace_all_twice_does_not_duplicate() {
        let mut store = Store::open_in_memory().unwrap();
        let records = [building("a1", "One"), building("a2", "Two")];

        store.replace_all(&records).unwrap();
        store.replace_all(&records).unwrap();

        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 2);
    }

    #[test]
    fn test_replace_all_with_empty_set_clears_partition() {
        let mut store = Store::open_in_memory().unwrap();
        store.replace_all(&[building("a1", "One")]).unwrap();

        let replaced = store.replace_all::<Building>(&[]).unwrap();
        assert_eq!(replaced, 0);
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 0);
    }

    #[test]
    fn test_partitions_are_isolated() {
        let mut store = Store::open_in_memory().unwrap();

        // Same id in two partitions must not collide
        store.put_many(&[building("1", "Station")]).unwrap();
        store.put_many(&[template("1")]).unwrap();

        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 1);
        assert_eq!(
            store.count(ReferencePartition::InspectionTemplates).unwrap(),
            1
        );

        store.clear(ReferencePartition::Buildings).unwrap();
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 0);
        assert_eq!(
            store.count(ReferencePartition::InspectionTemplates).unwrap(),
            1
        );
    }

    #[test]
    fn test_delete_one() {
        let mut store = Store::open_in_memory().unwrap();
        store.put_many(&[building("a1", "One")]).unwrap();

        assert!(store.delete_one(ReferencePartition::Buildings, "a1").unwrap());
        assert!(!store.delete_one(ReferencePartition::Buildings, "a1").unwrap());
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 0);
    }

    #[test]
    fn test_record_extras_survive_storage() {
        let mut store = Store::open_in_memory().unwrap();
        let mut b = building("a1", "One");
        b.extra
            .insert("floors".to_string(), json!(4));

        store.put_many(&[b]).unwrap();

        let back: Building = store.get_one("a1").unwrap().unwrap();
        assert_eq!(back.extra.get("floors"), Some(&json!(4)));
    }

    #[test]
    fn test_enqueue_and_list_pending_in_order() {
        let store = Store::open_in_memory().unwrap();

        store.enqueue_pending(&queued("local-1-aa")).unwrap();
        store.enqueue_pending(&queued("local-2-bb")).unwrap();
        store.enqueue_pending(&queued("local-3-cc")).unwrap();

        let pending = store.pending().unwrap();
        let ids: Vec<&str> = pending.iter().map(|p| p.local_id.as_str()).collect();
        assert_eq!(ids, vec!["local-1-aa", "local-2-bb", "local-3-cc"]);
        assert!(pending.iter().all(|p| !p.synced));
        assert!(pending.iter().all(|p| p.synced_at.is_none()));
    }

    #[test]
    fn test_pending_payload_round_trips() {
        let store = Store::open_in_memory().unwrap();
        let entry = queued("local-1-aa");
        store.enqueue_pending(&entry).unwrap();

        let back = store.get_pending(&entry.local_id).unwrap().unwrap();
        assert_eq!(back.payload, entry.payload);
        assert_eq!(
            back.created_at.unix_timestamp(),
            entry.created_at.unix_timestamp()
        );
    }

    #[test]
    fn test_mark_synced_transitions_exactly_once() {
        let store = Store::open_in_memory().unwrap();
        let entry = queued("local-1-aa");
        store.enqueue_pending(&entry).unwrap();

        // First call flips the flag
        assert!(store.mark_synced(&entry.local_id).unwrap());
        let after_first = store.get_pending(&entry.local_id).unwrap().unwrap();
        assert!(after_first.synced);
        assert!(after_first.synced_at.is_some());

        // Second call is a no-op and must not touch synced_at
        assert!(!store.mark_synced(&entry.local_id).unwrap());
        let after_second = store.get_pending(&entry.local_id).unwrap().unwrap();
        assert_eq!(after_second.synced_at, after_first.synced_at);
    }

    #[test]
    fn test_mark_synced_missing_record_is_noop() {
        let store = Store::open_in_memory().unwrap();
        assert!(!store.mark_synced(&LocalId::new("local-gone")).unwrap());
    }

    #[test]
    fn test_unsynced_pending_excludes_synced_records() {
        let store = Store::open_in_memory().unwrap();
        store.enqueue_pending(&queued("local-1-aa")).unwrap();
        store.enqueue_pending(&queued("local-2-bb")).unwrap();

        store.mark_synced(&LocalId::new("local-1-aa")).unwrap();

        let unsynced = store.unsynced_pending().unwrap();
        assert_eq!(unsynced.len(), 1);
        assert_eq!(unsynced[0].local_id.as_str(), "local-2-bb");
        assert_eq!(store.count_unsynced().unwrap(), 1);
    }

    #[test]
    fn test_purge_synced_keeps_unsynced_records() {
        let store = Store::open_in_memory().unwrap();
        store.enqueue_pending(&queued("local-1-aa")).unwrap();
        store.enqueue_pending(&queued("local-2-bb")).unwrap();
        store.mark_synced(&LocalId::new("local-1-aa")).unwrap();

        assert_eq!(store.purge_synced().unwrap(), 1);

        let remaining = store.pending().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].local_id.as_str(), "local-2-bb");
    }

    #[test]
    fn test_delete_pending() {
        let store = Store::open_in_memory().unwrap();
        store.enqueue_pending(&queued("local-1-aa")).unwrap();

        assert!(store.delete_pending(&LocalId::new("local-1-aa")).unwrap());
        assert!(!store.delete_pending(&LocalId::new("local-1-aa")).unwrap());
        assert!(store.pending().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_local_id_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        store.enqueue_pending(&queued("local-1-aa")).unwrap();

        let result = store.enqueue_pending(&queued("local-1-aa"));
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_round_trip() {
        let store = Store::open_in_memory().unwrap();

        assert!(store.meta("missing").unwrap().is_none());

        store.set_meta("key", "first").unwrap();
        store.set_meta("key", "second").unwrap();
        assert_eq!(store.meta("key").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_typed_metadata_accessors() {
        let store = Store::open_in_memory().unwrap();

        assert!(store.last_snapshot_at().unwrap().is_none());
        assert!(store.last_sync_at().unwrap().is_none());
        assert!(store.active_tenant().unwrap().is_none());

        let now = OffsetDateTime::now_utc();
        store.set_last_snapshot_at(now).unwrap();
        store.set_last_sync_at(now).unwrap();
        store.set_active_tenant(&TenantId::new("dept-42")).unwrap();

        // Timestamps are stored at second precision
        assert_eq!(
            store.last_snapshot_at().unwrap().unwrap().unix_timestamp(),
            now.unix_timestamp()
        );
        assert_eq!(
            store.last_sync_at().unwrap().unwrap().unix_timestamp(),
            now.unix_timestamp()
        );
        assert_eq!(
            store.active_tenant().unwrap(),
            Some(TenantId::new("dept-42"))
        );
    }

    #[test]
    fn test_garbage_metadata_timestamp_reads_as_none() {
        let store = Store::open_in_memory().unwrap();
        store.set_meta(meta_keys::LAST_SNAPSHOT_AT, "not a number").unwrap();
        assert!(store.last_snapshot_at().unwrap().is_none());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offline.db");

        {
            let mut store = Store::open(&path).unwrap();
            store.replace_all(&[building("a1", "Station")]).unwrap();
            store.enqueue_pending(&queued("local-1-aa")).unwrap();
            store.set_active_tenant(&TenantId::new("dept-42")).unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 1);
        assert_eq!(store.pending().unwrap().len(), 1);
        assert_eq!(
            store.active_tenant().unwrap(),
            Some(TenantId::new("dept-42"))
        );
    }

    #[test]
    fn test_open_rejects_newer_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offline.db");
        drop(Store::open(&path).unwrap());

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute("UPDATE schema_version SET version = 99", [])
                .unwrap();
        }

        let err = Store::open(&path).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_open_rejects_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, "not a sqlite database ".repeat(16)).unwrap();

        let err = Store::open(&path).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_reset_discards_data_and_reopens_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offline.db");

        {
            let mut store = Store::open(&path).unwrap();
            store.replace_all(&[building("a1", "Station")]).unwrap();
            store.enqueue_pending(&queued("local-1-aa")).unwrap();
        }

        let store = Store::reset(&path).unwrap();
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 0);
        assert!(store.pending().unwrap().is_empty());
    }

    #[test]
    fn test_reset_recovers_a_corrupt_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, "not a sqlite database ".repeat(16)).unwrap();
        assert!(Store::open(&path).unwrap_err().is_corrupt());

        let store = Store::reset(&path).unwrap();
        assert_eq!(store.count(ReferencePartition::Buildings).unwrap(), 0);
    }

    #[test]
    fn test_open_unavailable_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "in the way").unwrap();

        let err = Store::open(blocker.join("offline.db")).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_open_create_directory_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "in the way").unwrap();

        let err = Store::open(blocker.join("nested").join("offline.db")).unwrap_err();
        assert!(matches!(err, Error::CreateDirectory { .. }));
    }
}
