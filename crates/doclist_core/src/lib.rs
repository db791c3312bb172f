//! Doclist core: pure document-collection state machine and view-model helpers.
mod collection;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use collection::{Collection, Document, DocumentId};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, DeleteOutcome, DeletePhase, FileSelection, LoadPhase, RequestSeq, SearchPhase,
    UploadOutcome, UploadPhase, UploadStatus, LOAD_ERROR_MESSAGE, SEARCH_ERROR_MESSAGE,
    UPLOAD_SUCCESS_MESSAGE,
};
pub use update::update;
pub use view_model::{AppViewModel, DocumentCardView, UploadStatusView};
