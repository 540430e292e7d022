use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tower_sessions::Session;

use crate::models::FlowError;

/// Key/value storage scoped to a single browser session.
#[async_trait]
pub trait FlowSession: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, FlowError>;
    async fn set(&self, key: &str, value: String) -> Result<(), FlowError>;
    async fn remove(&self, key: &str) -> Result<Option<String>, FlowError>;
}

#[async_trait]
impl FlowSession for Session {
    async fn get(&self, key: &str) -> Result<Option<String>, FlowError> {
        Ok(Session::get::<String>(self, key).await?)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), FlowError> {
        Ok(self.insert(key, value).await?)
    }

    async fn remove(&self, key: &str) -> Result<Option<String>, FlowError> {
        Ok(Session::remove::<String>(self, key).await?)
    }
}

/// Process-local session, used where no cookie layer is present.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlowSession for MemorySession {
    async fn get(&self, key: &str) -> Result<Option<String>, FlowError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), FlowError> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<Option<String>, FlowError> {
        Ok(self.values.lock().await.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_memory_session_roundtrip() {
        let session = MemorySession::new();
        session.set("access_token", "tok".to_string()).await.unwrap();

        assert_eq!(session.get("access_token").await.unwrap().as_deref(), Some("tok"));
        assert_eq!(session.remove("access_token").await.unwrap().as_deref(), Some("tok"));
        assert_eq!(session.get("access_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = Arc::new(MemoryStore::default());
        let first = Session::new(None, store.clone(), None);
        let second = Session::new(None, store, None);

        FlowSession::set(&first, "access_token", "first".to_string())
            .await
            .unwrap();

        assert_eq!(FlowSession::get(&second, "access_token").await.unwrap(), None);
        assert_eq!(
            FlowSession::get(&first, "access_token").await.unwrap().as_deref(),
            Some("first")
        );
    }
}
