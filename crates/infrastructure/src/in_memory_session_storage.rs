//! In-memory session storage.
//!
//! Single-slot storage for the embeddable session core; useful in tests
//! and in hosts that do not want durable persistence.

use async_trait::async_trait;
use tokio::sync::RwLock;
use vestry_application::SessionStorage;
use vestry_core::AppResult;
use vestry_domain::Session;

/// Volatile single-slot session storage.
#[derive(Default)]
pub struct InMemorySessionStorage {
    slot: RwLock<Option<Session>>,
}

impl InMemorySessionStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn save(&self, session: &Session) -> AppResult<()> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> AppResult<Option<Session>> {
        Ok(self.slot.read().await.clone())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vestry_application::SessionStorage;
    use vestry_domain::Session;

    use super::InMemorySessionStorage;

    #[tokio::test]
    async fn save_load_clear_roundtrip() {
        let storage = InMemorySessionStorage::new();

        let loaded = storage.load().await;
        assert!(matches!(loaded, Ok(None)));

        let session = Session::empty();
        assert!(storage.save(&session).await.is_ok());
        let loaded = storage.load().await;
        assert!(matches!(loaded, Ok(Some(_))));

        assert!(storage.clear().await.is_ok());
        assert!(storage.clear().await.is_ok());
        let loaded = storage.load().await;
        assert!(matches!(loaded, Ok(None)));
    }
}
