// SPDX-License-Identifier: MIT

//! Conversation memory persistence
//!
//! Snapshots are stored, loaded and deleted by conversation id. Each stored
//! conversation also carries a coarse-grained `ConversationState`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::step::ConversationStep;
use crate::error::StoreError;

/// Lifecycle marker of a stored conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationState {
    Ready,
    InProgress,
    Ended,
    ExecutionInterrupted,
    Error,
}

/// Persisted form of a conversation's memory
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMemorySnapshot {
    pub conversation_id: String,
    pub conversation_state: ConversationState,
    /// Chronological, the last entry is the current step
    #[serde(default)]
    pub steps: Vec<ConversationStep>,
}

/// Storage backend for conversation memory snapshots
#[async_trait]
pub trait ConversationMemoryStore: Send + Sync {
    /// Store (or replace) a snapshot, returning its conversation id
    async fn store_snapshot(&self, snapshot: ConversationMemorySnapshot)
        -> Result<String, StoreError>;

    async fn load_snapshot(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationMemorySnapshot, StoreError>;

    async fn delete_snapshot(&self, conversation_id: &str) -> Result<(), StoreError>;

    async fn set_conversation_state(
        &self,
        conversation_id: &str,
        state: ConversationState,
    ) -> Result<(), StoreError>;

    /// State of a stored conversation, `None` if it is unknown
    async fn get_conversation_state(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationState>, StoreError>;
}

/// Store keeping snapshots in process memory
#[derive(Clone, Default)]
pub struct InMemoryConversationMemoryStore {
    snapshots: Arc<RwLock<HashMap<String, ConversationMemorySnapshot>>>,
}

impl InMemoryConversationMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationMemoryStore for InMemoryConversationMemoryStore {
    async fn store_snapshot(
        &self,
        snapshot: ConversationMemorySnapshot,
    ) -> Result<String, StoreError> {
        let id = snapshot.conversation_id.clone();
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(id.clone(), snapshot);
        Ok(id)
    }

    async fn load_snapshot(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationMemorySnapshot, StoreError> {
        let snapshots = self.snapshots.read().await;
        snapshots
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(conversation_id.to_string()))
    }

    async fn delete_snapshot(&self, conversation_id: &str) -> Result<(), StoreError> {
        let mut snapshots = self.snapshots.write().await;
        snapshots
            .remove(conversation_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(conversation_id.to_string()))
    }

    async fn set_conversation_state(
        &self,
        conversation_id: &str,
        state: ConversationState,
    ) -> Result<(), StoreError> {
        let mut snapshots = self.snapshots.write().await;
        let snapshot = snapshots
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::NotFound(conversation_id.to_string()))?;
        snapshot.conversation_state = state;
        Ok(())
    }

    async fn get_conversation_state(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationState>, StoreError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(conversation_id).map(|s| s.conversation_state))
    }
}

/// Store writing one JSON file per conversation into a directory
#[derive(Debug, Clone)]
pub struct FileConversationMemoryStore {
    dir: PathBuf,
}

impl FileConversationMemoryStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, conversation_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !conversation_id.is_empty()
            && !conversation_id.starts_with('.')
            && conversation_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !valid {
            return Err(StoreError::InvalidId(conversation_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", conversation_id)))
    }

    async fn write(&self, snapshot: &ConversationMemorySnapshot) -> Result<(), StoreError> {
        let path = self.path_for(&snapshot.conversation_id)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

fn not_found_or(err: std::io::Error, conversation_id: &str) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound(conversation_id.to_string())
    } else {
        StoreError::Io(err)
    }
}

#[async_trait]
impl ConversationMemoryStore for FileConversationMemoryStore {
    async fn store_snapshot(
        &self,
        snapshot: ConversationMemorySnapshot,
    ) -> Result<String, StoreError> {
        self.write(&snapshot).await?;
        log::debug!("Stored conversation memory {}", snapshot.conversation_id);
        Ok(snapshot.conversation_id)
    }

    async fn load_snapshot(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationMemorySnapshot, StoreError> {
        let path = self.path_for(conversation_id)?;
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| not_found_or(e, conversation_id))?;
        Ok(serde_json::from_slice(&content)?)
    }

    async fn delete_snapshot(&self, conversation_id: &str) -> Result<(), StoreError> {
        let path = self.path_for(conversation_id)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or(e, conversation_id))
    }

    async fn set_conversation_state(
        &self,
        conversation_id: &str,
        state: ConversationState,
    ) -> Result<(), StoreError> {
        let mut snapshot = self.load_snapshot(conversation_id).await?;
        snapshot.conversation_state = state;
        self.write(&snapshot).await
    }

    async fn get_conversation_state(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationState>, StoreError> {
        match self.load_snapshot(conversation_id).await {
            Ok(snapshot) => Ok(Some(snapshot.conversation_state)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::step::{Data, KEY_EXPRESSIONS};

    fn snapshot(id: &str) -> ConversationMemorySnapshot {
        let mut step = ConversationStep::new();
        step.store_data(Data::new(KEY_EXPRESSIONS, "greeting(hello)"));
        ConversationMemorySnapshot {
            conversation_id: id.to_string(),
            conversation_state: ConversationState::InProgress,
            steps: vec![step],
        }
    }

    async fn exercise_store(store: &dyn ConversationMemoryStore) {
        let expected = snapshot("conv-1");
        let id = store.store_snapshot(expected.clone()).await.unwrap();
        assert_eq!(id, "conv-1");

        let loaded = store.load_snapshot("conv-1").await.unwrap();
        assert_eq!(loaded, expected);

        assert_eq!(
            store.get_conversation_state("conv-1").await.unwrap(),
            Some(ConversationState::InProgress)
        );
        store
            .set_conversation_state("conv-1", ConversationState::Ended)
            .await
            .unwrap();
        assert_eq!(
            store.get_conversation_state("conv-1").await.unwrap(),
            Some(ConversationState::Ended)
        );

        store.delete_snapshot("conv-1").await.unwrap();
        assert!(matches!(
            store.load_snapshot("conv-1").await,
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.get_conversation_state("conv-1").await.unwrap(), None);
        assert!(matches!(
            store.delete_snapshot("conv-1").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store
                .set_conversation_state("conv-1", ConversationState::Ready)
                .await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryConversationMemoryStore::new();
        exercise_store(&store).await;
    }

    #[tokio::test]
    async fn test_in_memory_store_is_clone() {
        let store = InMemoryConversationMemoryStore::new();
        let cloned = store.clone();
        cloned.store_snapshot(snapshot("shared")).await.unwrap();
        assert!(store.load_snapshot("shared").await.is_ok());
    }

    #[tokio::test]
    async fn test_file_store() {
        let dir = std::env::temp_dir().join(format!("dialog-matcher-{}", uuid::Uuid::new_v4()));
        let store = FileConversationMemoryStore::new(&dir);
        exercise_store(&store).await;
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_ids() {
        let store = FileConversationMemoryStore::new(std::env::temp_dir());
        for id in ["../escape", "a/b", "", ".hidden"] {
            assert!(matches!(
                store.load_snapshot(id).await,
                Err(StoreError::InvalidId(_))
            ));
        }
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = r#"{
            "conversationId": "c1",
            "conversationState": "IN_PROGRESS",
            "steps": [{"data": [{"key": "expressions", "result": "a(b)"}]}]
        }"#;
        let snapshot: ConversationMemorySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.conversation_id, "c1");
        assert_eq!(snapshot.conversation_state, ConversationState::InProgress);
        assert_eq!(
            snapshot.steps[0].latest_data(KEY_EXPRESSIONS).unwrap().result,
            "a(b)"
        );
    }
}
