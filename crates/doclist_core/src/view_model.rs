use crate::DocumentId;

/// Everything the front end needs to draw the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// "{count} documents".
    pub header: String,
    /// "Total size: {kb}kb".
    pub total_size_label: String,
    pub document_count: usize,
    pub total_size_kb: u64,
    pub search_text: String,
    pub searching: bool,
    pub load_error: Option<String>,
    pub search_error: Option<String>,
    pub documents: Vec<DocumentCardView>,
    pub upload: UploadStatusView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCardView {
    pub id: DocumentId,
    pub name: String,
    pub size_label: String,
    pub error: Option<String>,
    pub deleting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadStatusView {
    pub error: Option<String>,
    pub success: Option<String>,
    pub in_flight: bool,
}
