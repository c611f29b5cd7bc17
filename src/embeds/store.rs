//! SQLite-backed content-addressed store for embed records.

use std::path::PathBuf;

use rusqlite::{params, Connection, OptionalExtension};

use super::{EmbedRecord, EMBED_DESCRIPTION};
use crate::config::get_db_path;
use crate::error::{Error, Result};

/// Store keyed by the composite (video_id, custom_title) pair. Records are
/// created lazily on first use and never updated afterwards.
#[derive(Debug, Clone)]
pub struct EmbedStore {
    db_path: PathBuf,
}

impl EmbedStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(get_db_path()?))
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)
            .map_err(|e| Error::Store(format!("sqlite open: {}", e)))?;
        // Concurrent command invocations and the HTTP path share the file.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| Error::Store(format!("sqlite busy_timeout: {}", e)))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS embeds (
                video_id TEXT NOT NULL,
                custom_title TEXT NOT NULL,
                description TEXT NOT NULL,
                og_title TEXT NOT NULL,
                og_url TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (video_id, custom_title)
            );
            "#,
        )
        .map_err(|e| Error::Store(format!("sqlite init: {}", e)))?;
        Ok(conn)
    }

    /// Point lookup by the exact composite key. A missing row is the
    /// expected miss path, not an error.
    pub fn find(&self, video_id: &str, custom_title: &str) -> Result<Option<EmbedRecord>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT video_id, custom_title, description, og_title, og_url, created_at
             FROM embeds WHERE video_id = ?1 AND custom_title = ?2",
            params![video_id, custom_title],
            |row| {
                Ok(EmbedRecord {
                    video_id: row.get(0)?,
                    custom_title: row.get(1)?,
                    description: row.get(2)?,
                    og_title: row.get(3)?,
                    og_url: row.get(4)?,
                    created_at: row.get(5)?,
                })
            },
        )
        .optional()
        .map_err(|e| Error::Store(format!("sqlite find embed: {}", e)))
    }

    /// Return the stored record for the key pair, creating it on first use.
    /// Metadata is immutable after creation: a later call with a different
    /// source URL for the same key still returns the original record.
    /// Concurrent same-key inserts converge on one canonical row.
    pub fn get_or_create(
        &self,
        video_id: &str,
        custom_title: &str,
        source_url: &str,
    ) -> Result<EmbedRecord> {
        if let Some(existing) = self.find(video_id, custom_title)? {
            return Ok(existing);
        }

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO embeds (video_id, custom_title, description, og_title, og_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(video_id, custom_title) DO NOTHING",
            params![
                video_id,
                custom_title,
                EMBED_DESCRIPTION,
                custom_title,
                source_url,
                chrono::Utc::now().timestamp_millis()
            ],
        )
        .map_err(|e| Error::Store(format!("sqlite insert embed: {}", e)))?;

        self.find(video_id, custom_title)?.ok_or_else(|| {
            Error::Store(format!(
                "embed missing after insert: ({}, {})",
                video_id, custom_title
            ))
        })
    }

    /// Number of stored records, for diagnostics.
    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM embeds", [], |row| row.get(0))
            .map_err(|e| Error::Store(format!("sqlite count embeds: {}", e)))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, EmbedStore) {
        let dir = TempDir::new().unwrap();
        let store = EmbedStore::new(dir.path().join("embeds.db"));
        (dir, store)
    }

    #[test]
    fn test_miss_then_create() {
        let (_dir, store) = temp_store();

        assert!(store.find("dQw4w9WgXcQ", "cat video").unwrap().is_none());

        let record = store
            .get_or_create("dQw4w9WgXcQ", "cat video", "https://youtu.be/dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(record.video_id, "dQw4w9WgXcQ");
        assert_eq!(record.og_title, "cat video");
        assert_eq!(record.og_url, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(record.description, EMBED_DESCRIPTION);
        assert!(record.created_at > 0);
    }

    #[test]
    fn test_hit_is_immutable() {
        let (_dir, store) = temp_store();

        let first = store
            .get_or_create("dQw4w9WgXcQ", "cat video", "https://youtu.be/dQw4w9WgXcQ")
            .unwrap();
        // Different source URL for the same key pair does not update anything.
        let second = store
            .get_or_create(
                "dQw4w9WgXcQ",
                "cat video",
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            )
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_distinct_titles_are_distinct_records() {
        let (_dir, store) = temp_store();

        let a = store
            .get_or_create("dQw4w9WgXcQ", "title one", "https://youtu.be/dQw4w9WgXcQ")
            .unwrap();
        let b = store
            .get_or_create("dQw4w9WgXcQ", "title two", "https://youtu.be/dQw4w9WgXcQ")
            .unwrap();

        assert_ne!(a.custom_title, b.custom_title);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_concurrent_same_key_inserts_converge() {
        let (_dir, store) = temp_store();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store
                    .get_or_create("dQw4w9WgXcQ", "race", "https://youtu.be/dQw4w9WgXcQ")
                    .unwrap()
            }));
        }

        let records: Vec<EmbedRecord> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(records.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.count().unwrap(), 1);
    }
}
