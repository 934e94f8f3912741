use anyhow::Result;
use tokio::sync::RwLock;

use super::entry::DreamEntry;

/// Storage for dream entries, newest first
#[async_trait::async_trait]
pub trait DreamRepository: Send + Sync {
    /// Add a dream in front of the existing ones
    async fn insert(&self, entry: DreamEntry) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<DreamEntry>>;

    /// Every dream, newest first
    async fn list(&self) -> Result<Vec<DreamEntry>>;

    /// Replace the dream with the same id; false if it does not exist
    async fn replace(&self, entry: DreamEntry) -> Result<bool>;

    /// Remove a dream; false if it did not exist
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Keeps dreams in memory for the lifetime of the process
#[derive(Default)]
pub struct InMemoryRepository {
    dreams: RwLock<Vec<DreamEntry>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DreamRepository for InMemoryRepository {
    async fn insert(&self, entry: DreamEntry) -> Result<()> {
        self.dreams.write().await.insert(0, entry);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<DreamEntry>> {
        let dreams = self.dreams.read().await;
        Ok(dreams.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<DreamEntry>> {
        Ok(self.dreams.read().await.clone())
    }

    async fn replace(&self, entry: DreamEntry) -> Result<bool> {
        let mut dreams = self.dreams.write().await;
        match dreams.iter_mut().find(|d| d.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut dreams = self.dreams.write().await;
        let before = dreams.len();
        dreams.retain(|d| d.id != id);
        Ok(dreams.len() != before)
    }
}
