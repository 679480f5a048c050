use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ComponentKind, FilterVocabulary};

mod sqlite;
pub use sqlite::SqliteStorage;

/// Persisted filter vocabularies, one snapshot per category.
#[async_trait]
pub trait FilterStore: Send + Sync {
    async fn migrate(&self) -> Result<()>;
    /// Replaces the stored snapshot for `kind`.
    async fn save_vocabulary(
        &self,
        kind: ComponentKind,
        vocabulary: &FilterVocabulary,
    ) -> Result<()>;
    async fn load_vocabulary(&self, kind: ComponentKind) -> Result<Option<FilterVocabulary>>;
}
