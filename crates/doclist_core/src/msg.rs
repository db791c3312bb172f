use crate::{DeleteOutcome, Document, DocumentId, FileSelection, RequestSeq, UploadOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page shown; triggers the one-shot initial load.
    Mounted,
    /// Page torn down; any pending debounced search must not fire.
    Unmounted,
    /// User edited the search box (raw keystroke, not yet debounced).
    SearchTextChanged(String),
    /// Search input went quiet for the debounce window.
    SearchDebounced(String),
    /// Engine completed the initial list fetch.
    DocumentsLoaded {
        seq: RequestSeq,
        documents: Vec<Document>,
    },
    /// Engine failed the initial list fetch.
    LoadFailed { seq: RequestSeq },
    /// Engine completed a name search.
    SearchResults {
        seq: RequestSeq,
        documents: Vec<Document>,
    },
    /// Engine failed a name search.
    SearchFailed { seq: RequestSeq },
    /// User clicked Delete on a document card.
    DeleteClicked { id: DocumentId },
    /// Engine finished a delete request.
    DeleteCompleted {
        id: DocumentId,
        outcome: DeleteOutcome,
    },
    /// User picked a file to upload.
    FileSelected(FileSelection),
    /// File passed validation and is being sent.
    UploadStarted,
    /// Engine finished (or rejected) an upload.
    UploadCompleted(UploadOutcome),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
