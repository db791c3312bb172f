//! Doclist engine: document repository client, debounced search and the
//! worker thread that runs requests for the front end.
mod debounce;
mod engine;
mod repository;
mod types;
mod upload;

pub use debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use engine::{EngineHandle, EngineSettings};
pub use repository::{
    DocumentRepository, ReqwestRepository, RepositorySettings, SetupError, MAX_UPLOAD_BYTES,
};
pub use types::{DocumentRecord, EngineEvent, FailureKind, RepositoryError, RequestSeq};
pub use upload::UploadFile;
