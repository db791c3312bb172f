use std::sync::mpsc;
use std::thread;

use doclist_core::{DeleteOutcome, Document, DocumentId, Effect, Msg, UploadOutcome};
use doclist_engine::{
    DocumentRecord, EngineEvent, EngineHandle, EngineSettings, RepositoryError, SetupError,
    UploadFile,
};
use doclist_logging::{doclist_debug, doclist_warn};

use super::app::AppEvent;

/// Turns core effects into engine requests and engine events back into
/// messages for the main loop.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, tx: mpsc::Sender<AppEvent>) -> Result<Self, SetupError> {
        let (engine, events) = EngineHandle::new(settings)?;
        spawn_event_loop(events, tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            doclist_debug!("Effect {:?}", effect);
            match effect {
                Effect::LoadDocuments { seq } => self.engine.load(seq),
                Effect::ScheduleSearch { text } => self.engine.schedule_search(text),
                Effect::SearchDocuments { seq, text } => self.engine.search(seq, text),
                Effect::DeleteDocument { id } => self.engine.delete(id.as_str()),
                Effect::UploadFile(selection) => self.engine.upload(UploadFile::new(
                    selection.file_name,
                    selection.mime_type,
                    selection.contents,
                )),
                Effect::CancelPendingSearch => self.engine.cancel_pending_search(),
            }
        }
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn spawn_event_loop(events: mpsc::Receiver<EngineEvent>, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for event in events {
            if tx.send(AppEvent::Msg(msg_from_event(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn msg_from_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchReady { text } => Msg::SearchDebounced(text),
        EngineEvent::ListCompleted { seq, result } => match result {
            Ok(records) => Msg::DocumentsLoaded {
                seq,
                documents: to_documents(records),
            },
            Err(err) => {
                log_failure(&err);
                Msg::LoadFailed { seq }
            }
        },
        EngineEvent::SearchCompleted { seq, result } => match result {
            Ok(records) => Msg::SearchResults {
                seq,
                documents: to_documents(records),
            },
            Err(err) => {
                log_failure(&err);
                Msg::SearchFailed { seq }
            }
        },
        EngineEvent::DeleteCompleted { id, result } => {
            let outcome = match result {
                Ok(()) => DeleteOutcome::Deleted,
                Err(err @ RepositoryError::DeleteRejected { .. }) => {
                    log_failure(&err);
                    DeleteOutcome::Rejected {
                        message: err.to_string(),
                    }
                }
                Err(err) => {
                    log_failure(&err);
                    DeleteOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            };
            Msg::DeleteCompleted {
                id: DocumentId::new(id),
                outcome,
            }
        }
        EngineEvent::UploadStarted => Msg::UploadStarted,
        EngineEvent::UploadCompleted { result } => {
            let outcome = match result {
                Ok(record) => UploadOutcome::Uploaded(to_document(record)),
                Err(err) if err.is_validation() => UploadOutcome::Rejected {
                    message: err.to_string(),
                },
                Err(err) => {
                    log_failure(&err);
                    UploadOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            };
            Msg::UploadCompleted(outcome)
        }
    }
}

fn log_failure(err: &RepositoryError) {
    doclist_warn!("Request failed: {} ({:?})", err, err);
}

fn to_document(record: DocumentRecord) -> Document {
    Document::new(record.id, record.name, record.size)
}

fn to_documents(records: Vec<DocumentRecord>) -> Vec<Document> {
    records.into_iter().map(to_document).collect()
}
