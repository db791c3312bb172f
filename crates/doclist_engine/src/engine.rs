use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use doclist_logging::{doclist_debug, doclist_info};

use crate::debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE};
use crate::repository::{ReqwestRepository, RepositorySettings, SetupError};
use crate::{DocumentRepository, EngineEvent, RequestSeq, UploadFile};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub repository: RepositorySettings,
    pub search_debounce: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            repository: RepositorySettings::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

enum Request {
    List { seq: RequestSeq },
    Search { seq: RequestSeq, text: String },
    Delete { id: String },
    Upload { file: UploadFile },
}

enum EngineCommand {
    Request(Request),
    ScheduleSearch { text: String },
    CancelPendingSearch,
    Shutdown,
}

/// Front-end side of the engine worker thread.
///
/// Requests run concurrently on a tokio runtime owned by the worker; each
/// one reports back exactly one completion event. In-flight requests are
/// never aborted, only the pending debounced search can be cancelled.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Starts a worker talking to the configured HTTP endpoint.
    pub fn new(
        settings: EngineSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), SetupError> {
        let repository = Arc::new(ReqwestRepository::new(settings.repository)?);
        Self::with_repository(repository, settings.search_debounce)
    }

    pub fn with_repository(
        repository: Arc<dyn DocumentRepository>,
        search_debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), SetupError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("doclist-io")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("doclist-engine".to_string())
            .spawn(move || run_worker(runtime, repository, search_debounce, cmd_rx, event_tx))?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn load(&self, seq: RequestSeq) {
        self.send(EngineCommand::Request(Request::List { seq }));
    }

    pub fn search(&self, seq: RequestSeq, text: impl Into<String>) {
        self.send(EngineCommand::Request(Request::Search {
            seq,
            text: text.into(),
        }));
    }

    /// Restarts the debounce window; `EngineEvent::SearchReady` follows once
    /// input goes quiet.
    pub fn schedule_search(&self, text: impl Into<String>) {
        self.send(EngineCommand::ScheduleSearch { text: text.into() });
    }

    pub fn cancel_pending_search(&self) {
        self.send(EngineCommand::CancelPendingSearch);
    }

    pub fn delete(&self, id: impl Into<String>) {
        self.send(EngineCommand::Request(Request::Delete { id: id.into() }));
    }

    pub fn upload(&self, file: UploadFile) {
        self.send(EngineCommand::Request(Request::Upload { file }));
    }

    /// Stops accepting work and cancels the pending search. Requests
    /// already running are dropped with the runtime.
    pub fn shutdown(&self) {
        self.send(EngineCommand::Shutdown);
    }

    fn send(&self, command: EngineCommand) {
        // The worker only goes away after shutdown; late commands are moot.
        let _ = self.cmd_tx.send(command);
    }
}

fn run_worker(
    runtime: tokio::runtime::Runtime,
    repository: Arc<dyn DocumentRepository>,
    search_debounce: Duration,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let ready_tx = event_tx.clone();
    let mut debouncer = Debouncer::new(
        runtime.handle().clone(),
        search_debounce,
        move |text: String| {
            let _ = ready_tx.send(EngineEvent::SearchReady { text });
        },
    );

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Request(request) => {
                let repository = repository.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_request(repository.as_ref(), request, &event_tx).await;
                    let _ = event_tx.send(event);
                });
            }
            EngineCommand::ScheduleSearch { text } => debouncer.schedule(text),
            EngineCommand::CancelPendingSearch => debouncer.cancel(),
            EngineCommand::Shutdown => break,
        }
    }

    debouncer.cancel();
    runtime.shutdown_background();
    doclist_info!("Engine worker stopped");
}

async fn handle_request(
    repository: &dyn DocumentRepository,
    request: Request,
    event_tx: &mpsc::Sender<EngineEvent>,
) -> EngineEvent {
    match request {
        Request::List { seq } => {
            doclist_debug!("List seq={}", seq);
            EngineEvent::ListCompleted {
                seq,
                result: repository.list_all().await,
            }
        }
        Request::Search { seq, text } => {
            doclist_debug!("Search seq={} text={:?}", seq, text);
            EngineEvent::SearchCompleted {
                seq,
                result: repository.search_by_name(&text).await,
            }
        }
        Request::Delete { id } => {
            doclist_debug!("Delete id={}", id);
            let result = repository.delete_by_id(&id).await;
            EngineEvent::DeleteCompleted { id, result }
        }
        Request::Upload { file } => {
            if let Err(err) = repository.validate_upload(&file) {
                doclist_info!("Upload of {:?} rejected: {}", file.file_name, err);
                return EngineEvent::UploadCompleted { result: Err(err) };
            }
            let _ = event_tx.send(EngineEvent::UploadStarted);
            EngineEvent::UploadCompleted {
                result: repository.upload(file).await,
            }
        }
    }
}
