use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use crate::models::{ComponentKind, FilterVocabulary};
use crate::storage::FilterStore;

pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).context("Failed to open SQLite database")?;
        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory SQLite database")?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("SQLite connection lock poisoned"))
    }
}

#[async_trait]
impl FilterStore for SqliteStorage {
    async fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;

        // Fields live in their own table so a field with no options survives
        // a round trip.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS filter_fields (
                kind TEXT NOT NULL,
                field TEXT NOT NULL,
                discovered_at TEXT NOT NULL,
                PRIMARY KEY (kind, field)
            );
            CREATE TABLE IF NOT EXISTS filter_options (
                kind TEXT NOT NULL,
                field TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (kind, field, value)
            );
            CREATE INDEX IF NOT EXISTS idx_filter_options_kind ON filter_options(kind);",
        )?;

        info!("Database migration completed");
        Ok(())
    }

    async fn save_vocabulary(
        &self,
        kind: ComponentKind,
        vocabulary: &FilterVocabulary,
    ) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let discovered_at = Utc::now().to_rfc3339();

        tx.execute("DELETE FROM filter_options WHERE kind = ?1", params![kind.key()])?;
        tx.execute("DELETE FROM filter_fields WHERE kind = ?1", params![kind.key()])?;

        for (field, options) in vocabulary.fields() {
            tx.execute(
                "INSERT INTO filter_fields (kind, field, discovered_at) VALUES (?1, ?2, ?3)",
                params![kind.key(), field, discovered_at],
            )?;
            for value in options {
                tx.execute(
                    "INSERT OR IGNORE INTO filter_options (kind, field, value) VALUES (?1, ?2, ?3)",
                    params![kind.key(), field, value],
                )?;
            }
        }

        tx.commit()?;
        info!("Stored {} filter fields for {}", vocabulary.len(), kind);
        Ok(())
    }

    async fn load_vocabulary(&self, kind: ComponentKind) -> Result<Option<FilterVocabulary>> {
        let conn = self.lock()?;

        let mut fields = conn.prepare("SELECT field FROM filter_fields WHERE kind = ?1")?;
        let field_names = fields
            .query_map(params![kind.key()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if field_names.is_empty() {
            return Ok(None);
        }

        let mut vocabulary = FilterVocabulary::new();
        for field in &field_names {
            vocabulary.insert_field(field.as_str(), Vec::<String>::new());
        }

        let mut options = conn.prepare("SELECT field, value FROM filter_options WHERE kind = ?1")?;
        let rows = options.query_map(params![kind.key()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (field, value) = row?;
            vocabulary.insert_field(field, [value]);
        }

        Ok(Some(vocabulary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vocabulary() -> FilterVocabulary {
        let mut vocabulary = FilterVocabulary::new();
        vocabulary.insert_field("mfgr", ["AMD", "Intel"]);
        vocabulary.insert_field("igp", Vec::<String>::new());
        vocabulary
    }

    #[tokio::test]
    async fn vocabulary_survives_round_trip() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.migrate().await.unwrap();

        assert_eq!(storage.load_vocabulary(ComponentKind::Cpu).await.unwrap(), None);

        storage.save_vocabulary(ComponentKind::Cpu, &vocabulary()).await.unwrap();
        assert_eq!(
            storage.load_vocabulary(ComponentKind::Cpu).await.unwrap(),
            Some(vocabulary())
        );
        assert_eq!(storage.load_vocabulary(ComponentKind::Gpu).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_previous_snapshot() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.migrate().await.unwrap();
        storage.save_vocabulary(ComponentKind::Gpu, &vocabulary()).await.unwrap();

        let mut newer = FilterVocabulary::new();
        newer.insert_field("mfgr", ["NVIDIA"]);
        storage.save_vocabulary(ComponentKind::Gpu, &newer).await.unwrap();

        assert_eq!(storage.load_vocabulary(ComponentKind::Gpu).await.unwrap(), Some(newer));
    }
}
