use std::collections::BTreeMap;

use bytes::Bytes;

use crate::view_model::{AppViewModel, DocumentCardView, UploadStatusView};
use crate::{Collection, Document, DocumentId};

/// Monotonic tag shared by load and search requests. Both replace the
/// collection wholesale, so they are ordered against each other.
pub type RequestSeq = u64;

pub const LOAD_ERROR_MESSAGE: &str = "There was an error loading the documents.";
pub const SEARCH_ERROR_MESSAGE: &str =
    "There was an error while searching documents. Please try again.";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Server refused the request (4xx).
    Rejected { message: String },
    /// Server or transport failure.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Client-side validation refused the file; nothing was sent.
    Rejected { message: String },
    Uploaded(Document),
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadFailed,
    /// The load finished after a newer search had already replaced the
    /// collection, so its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Succeeded,
    Failed,
}

/// Per-document delete progress. A finished delete leaves no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePhase {
    Deleting,
    Rejected { message: String },
    Failed { message: String },
}

impl DeletePhase {
    pub fn error(&self) -> Option<&str> {
        match self {
            DeletePhase::Deleting => None,
            DeletePhase::Rejected { message } | DeletePhase::Failed { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Validating,
    Rejected,
    Uploading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadStatus {
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Listing {
    Load,
    Search(String),
}

impl Listing {
    fn matches(&self, doc: &Document) -> bool {
        match self {
            Listing::Load => true,
            Listing::Search(text) => doc.name.to_lowercase().contains(&text.to_lowercase()),
        }
    }
}

/// Mutation that completed while listings were in flight. `issued_up_to` is
/// the newest listing seq that existed when it completed; results of
/// listings at or below it predate the mutation and get it re-applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    issued_up_to: RequestSeq,
    item: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    collection: Collection,
    search_text: String,
    load: LoadPhase,
    search: SearchPhase,
    search_error: bool,
    deletes: BTreeMap<DocumentId, DeletePhase>,
    upload: UploadPhase,
    upload_status: UploadStatus,
    last_seq: RequestSeq,
    last_applied: Option<RequestSeq>,
    latest_search: Option<RequestSeq>,
    in_flight: BTreeMap<RequestSeq, Listing>,
    tombstones: Vec<Pending<DocumentId>>,
    arrivals: Vec<Pending<Document>>,
    unmounted: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.load
    }

    pub fn search_phase(&self) -> SearchPhase {
        self.search
    }

    pub fn load_error(&self) -> bool {
        self.load == LoadPhase::LoadFailed
    }

    pub fn search_error(&self) -> bool {
        self.search_error
    }

    pub fn delete_phase(&self, id: &DocumentId) -> Option<&DeletePhase> {
        self.deletes.get(id)
    }

    pub fn upload_phase(&self) -> &UploadPhase {
        &self.upload
    }

    pub fn upload_status(&self) -> &UploadStatus {
        &self.upload_status
    }

    pub fn view(&self) -> AppViewModel {
        let documents = self
            .collection
            .iter()
            .map(|doc| {
                let phase = self.deletes.get(&doc.id);
                DocumentCardView {
                    id: doc.id.clone(),
                    name: doc.name.clone(),
                    size_label: format!("{}kb", doc.size),
                    error: phase.and_then(DeletePhase::error).map(ToOwned::to_owned),
                    deleting: matches!(phase, Some(DeletePhase::Deleting)),
                }
            })
            .collect();

        AppViewModel {
            header: format!("{} documents", self.collection.len()),
            total_size_label: format!("Total size: {}kb", self.collection.total_size()),
            document_count: self.collection.len(),
            total_size_kb: self.collection.total_size(),
            search_text: self.search_text.clone(),
            searching: self.search == SearchPhase::Searching,
            load_error: self.load_error().then(|| LOAD_ERROR_MESSAGE.to_string()),
            search_error: self.search_error.then(|| SEARCH_ERROR_MESSAGE.to_string()),
            documents,
            upload: UploadStatusView {
                error: self.upload_status.error.clone(),
                success: self
                    .upload_status
                    .success
                    .then(|| UPLOAD_SUCCESS_MESSAGE.to_string()),
                in_flight: matches!(self.upload, UploadPhase::Validating | UploadPhase::Uploading),
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and
    /// resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_search_text(&mut self, text: String) {
        if self.search_text != text {
            self.search_text = text;
            self.mark_dirty();
        }
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    pub(crate) fn unmount(&mut self) {
        self.unmounted = true;
    }

    pub(crate) fn begin_load(&mut self) -> Option<RequestSeq> {
        if self.load != LoadPhase::Idle {
            return None;
        }
        self.load = LoadPhase::Loading;
        self.mark_dirty();
        Some(self.issue_listing(Listing::Load))
    }

    pub(crate) fn begin_search(&mut self, text: String) -> RequestSeq {
        let seq = self.issue_listing(Listing::Search(text));
        self.latest_search = Some(seq);
        self.search = SearchPhase::Searching;
        self.search_error = false;
        self.mark_dirty();
        seq
    }

    pub(crate) fn apply_load(&mut self, seq: RequestSeq, result: Option<Vec<Document>>) {
        match (self.finish_listing(seq), result) {
            (Some(listing), Some(documents)) => {
                self.replace_from_listing(seq, &listing, documents);
                self.load = LoadPhase::Loaded;
                self.mark_dirty();
            }
            (Some(_), None) => {
                self.load = LoadPhase::LoadFailed;
                self.mark_dirty();
            }
            (None, _) if self.load == LoadPhase::Loading => {
                self.load = LoadPhase::Superseded;
            }
            (None, _) => {}
        }
        self.prune_pending();
    }

    pub(crate) fn apply_search(&mut self, seq: RequestSeq, result: Option<Vec<Document>>) {
        if let Some(listing) = self.finish_listing(seq) {
            let is_latest = self.latest_search == Some(seq);
            match result {
                Some(documents) => {
                    self.replace_from_listing(seq, &listing, documents);
                    if is_latest {
                        self.search = SearchPhase::Succeeded;
                    }
                }
                // A newer search already cleared the error slot; an older
                // failure must not bring it back.
                None if is_latest => {
                    self.search_error = true;
                    self.search = SearchPhase::Failed;
                }
                None => {}
            }
            self.mark_dirty();
        }
        self.prune_pending();
    }

    pub(crate) fn begin_delete(&mut self, id: &DocumentId) -> bool {
        if !self.collection.contains(id)
            || matches!(self.deletes.get(id), Some(DeletePhase::Deleting))
        {
            return false;
        }
        self.deletes.insert(id.clone(), DeletePhase::Deleting);
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_delete(&mut self, id: DocumentId, outcome: DeleteOutcome) {
        match outcome {
            DeleteOutcome::Deleted => {
                self.deletes.remove(&id);
                self.collection = std::mem::take(&mut self.collection).remove_by_id(&id);
                self.arrivals.retain(|pending| pending.item.id != id);
                if !self.in_flight.is_empty() {
                    self.tombstones.push(Pending {
                        issued_up_to: self.last_seq,
                        item: id,
                    });
                }
            }
            DeleteOutcome::Rejected { message } => {
                self.deletes.insert(id, DeletePhase::Rejected { message });
            }
            DeleteOutcome::Failed { message } => {
                self.deletes.insert(id, DeletePhase::Failed { message });
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self) {
        self.upload = UploadPhase::Validating;
        self.upload_status = UploadStatus::default();
        self.mark_dirty();
    }

    pub(crate) fn mark_uploading(&mut self) {
        if self.upload == UploadPhase::Validating {
            self.upload = UploadPhase::Uploading;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_upload(&mut self, outcome: UploadOutcome) {
        match outcome {
            UploadOutcome::Rejected { message } => {
                self.upload = UploadPhase::Rejected;
                self.upload_status = UploadStatus {
                    error: Some(message),
                    success: false,
                };
            }
            UploadOutcome::Uploaded(doc) => {
                if !self.in_flight.is_empty() {
                    self.arrivals.push(Pending {
                        issued_up_to: self.last_seq,
                        item: doc.clone(),
                    });
                }
                self.collection = std::mem::take(&mut self.collection).prepend(doc);
                self.upload = UploadPhase::Succeeded;
                self.upload_status = UploadStatus {
                    error: None,
                    success: true,
                };
            }
            UploadOutcome::Failed { message } => {
                self.upload = UploadPhase::Failed;
                self.upload_status = UploadStatus {
                    error: Some(message),
                    success: false,
                };
            }
        }
        self.mark_dirty();
    }

    fn issue_listing(&mut self, listing: Listing) -> RequestSeq {
        self.last_seq += 1;
        self.in_flight.insert(self.last_seq, listing);
        self.last_seq
    }

    /// Retires `seq` and returns its listing unless a newer listing already
    /// replaced the collection, in which case the result is stale. Only
    /// [`Self::replace_from_listing`] advances `last_applied`, so failures
    /// never supersede anything.
    fn finish_listing(&mut self, seq: RequestSeq) -> Option<Listing> {
        let listing = self.in_flight.remove(&seq)?;
        let stale = self.last_applied.is_some_and(|applied| seq < applied);
        (!stale).then_some(listing)
    }

    fn replace_from_listing(
        &mut self,
        seq: RequestSeq,
        listing: &Listing,
        documents: Vec<Document>,
    ) {
        self.last_applied = Some(seq);
        let mut next = Collection::new().replace_all(documents);
        for tombstone in self.tombstones.iter().filter(|t| seq <= t.issued_up_to) {
            next = next.remove_by_id(&tombstone.item);
        }
        for arrival in self.arrivals.iter().filter(|a| seq <= a.issued_up_to) {
            if !next.contains(&arrival.item.id) && listing.matches(&arrival.item) {
                next = next.prepend(arrival.item.clone());
            }
        }
        self.collection = next;
    }

    fn prune_pending(&mut self) {
        let oldest = self.in_flight.keys().next().copied();
        let still_needed =
            |issued_up_to: RequestSeq| oldest.is_some_and(|seq| seq <= issued_up_to);
        self.tombstones.retain(|t| still_needed(t.issued_up_to));
        self.arrivals.retain(|a| still_needed(a.issued_up_to));
    }
}
