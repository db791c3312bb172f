use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

const FIXTURE: &str = include_str!("../fixtures/documents.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub name: String,
    /// Size in kilobytes.
    pub size: u64,
}

/// Process-local document list. State is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<Vec<StoredDocument>>>,
}

impl DocumentStore {
    pub fn new(documents: Vec<StoredDocument>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    /// Store seeded with the bundled fixture.
    pub fn seeded() -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(FIXTURE)?))
    }

    /// All documents, or those whose name contains `name` ignoring case.
    /// An empty filter matches everything.
    pub async fn list(&self, name: Option<&str>) -> Vec<StoredDocument> {
        let documents = self.documents.read().await;
        match name.filter(|name| !name.is_empty()) {
            Some(name) => {
                let needle = name.to_lowercase();
                documents
                    .iter()
                    .filter(|doc| doc.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
            None => documents.clone(),
        }
    }

    /// Returns whether a document was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        documents.len() != before
    }

    /// Stores a new upload at the front of the list.
    pub async fn insert(&self, name: impl Into<String>, byte_len: usize) -> StoredDocument {
        let document = StoredDocument {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            size: size_in_kb(byte_len),
        };
        self.documents.write().await.insert(0, document.clone());
        document
    }
}

fn size_in_kb(byte_len: usize) -> u64 {
    (byte_len as u64).div_ceil(1024)
}
