use std::fmt;

/// Server-assigned document identity. The client never creates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    /// Size in kilobytes.
    pub size: u64,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
        }
    }
}

/// Ordered client-side view of the known documents.
///
/// Every mutation consumes the collection and hands back the next one, so a
/// caller never observes a half-applied change. Ids are unique within a
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collection {
    documents: Vec<Document>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from server order, keeping the first occurrence
    /// of any repeated id.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut unique: Vec<Document> = Vec::new();
        for doc in documents {
            if !unique.iter().any(|existing| existing.id == doc.id) {
                unique.push(doc);
            }
        }
        Self { documents: unique }
    }

    #[must_use]
    pub fn replace_all(self, documents: impl IntoIterator<Item = Document>) -> Self {
        Self::from_documents(documents)
    }

    /// Puts `doc` first. An entry with the same id is dropped from its old
    /// position.
    #[must_use]
    pub fn prepend(self, doc: Document) -> Self {
        let mut documents = Vec::with_capacity(self.documents.len() + 1);
        let id = doc.id.clone();
        documents.push(doc);
        documents.extend(self.documents.into_iter().filter(|existing| existing.id != id));
        Self { documents }
    }

    /// Removes the document with `id`, if present.
    #[must_use]
    pub fn remove_by_id(mut self, id: &DocumentId) -> Self {
        if let Some(index) = self.documents.iter().position(|doc| &doc.id == id) {
            self.documents.remove(index);
        }
        self
    }

    /// Sum of member sizes in kilobytes.
    pub fn total_size(&self) -> u64 {
        self.documents.iter().map(|doc| doc.size).sum()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.iter().any(|doc| &doc.id == id)
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| &doc.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Document> for Collection {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::from_documents(iter)
    }
}
