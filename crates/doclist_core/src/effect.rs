use crate::{DocumentId, FileSelection, RequestSeq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadDocuments { seq: RequestSeq },
    /// Restart the debounce timer with the latest search text.
    ScheduleSearch { text: String },
    SearchDocuments { seq: RequestSeq, text: String },
    DeleteDocument { id: DocumentId },
    UploadFile(FileSelection),
    CancelPendingSearch,
}
