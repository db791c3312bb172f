use std::sync::Once;

use bytes::Bytes;
use doclist_core::{
    update, AppState, DeleteOutcome, Document, DocumentId, Effect, FileSelection, LoadPhase, Msg,
    SearchPhase, UploadOutcome, UploadPhase, LOAD_ERROR_MESSAGE, SEARCH_ERROR_MESSAGE,
    UPLOAD_SUCCESS_MESSAGE,
};

const DELETE_REJECTED: &str =
    "An error occured while trying to delete this document. Please try again.";
const DELETE_FAILED: &str = "Please try again.";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(doclist_logging::initialize_for_tests);
}

fn fixture() -> Vec<Document> {
    vec![
        Document::new("1", "foo", 180),
        Document::new("2", "bar", 300),
        Document::new("3", "baz", 520),
        Document::new("4", "qux", 320),
    ]
}

fn loaded_state() -> AppState {
    let (state, effects) = update(AppState::new(), Msg::Mounted);
    assert_eq!(effects, vec![Effect::LoadDocuments { seq: 1 }]);
    let (mut state, _) = update(
        state,
        Msg::DocumentsLoaded {
            seq: 1,
            documents: fixture(),
        },
    );
    state.consume_dirty();
    state
}

fn jpeg(name: &str, len: usize) -> FileSelection {
    FileSelection {
        file_name: name.to_string(),
        mime_type: "image/jpeg".to_string(),
        contents: Bytes::from(vec![0u8; len]),
    }
}

#[test]
fn mount_loads_documents() {
    init_logging();
    let state = loaded_state();
    let view = state.view();

    assert_eq!(state.load_phase(), LoadPhase::Loaded);
    assert_eq!(view.header, "4 documents");
    assert_eq!(view.total_size_label, "Total size: 1320kb");
    assert_eq!(view.documents[0].name, "foo");
    assert_eq!(view.documents[0].size_label, "180kb");
    assert_eq!(view.load_error, None);
}

#[test]
fn load_is_one_shot() {
    init_logging();
    let state = loaded_state();
    let (_state, effects) = update(state, Msg::Mounted);

    assert!(effects.is_empty());
}

#[test]
fn load_failure_sets_only_the_load_error() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Mounted);
    let (mut state, effects) = update(state, Msg::LoadFailed { seq: 1 });
    let view = state.view();

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.load_phase(), LoadPhase::LoadFailed);
    assert_eq!(view.load_error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert_eq!(view.search_error, None);
    assert_eq!(view.header, "0 documents");
    assert_eq!(view.total_size_label, "Total size: 0kb");
}

#[test]
fn delete_removes_document_and_updates_totals() {
    init_logging();
    let id = DocumentId::new("4");
    let (state, effects) = update(loaded_state(), Msg::DeleteClicked { id: id.clone() });
    assert_eq!(effects, vec![Effect::DeleteDocument { id: id.clone() }]);
    assert!(state.view().documents[3].deleting);

    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: id.clone(),
            outcome: DeleteOutcome::Deleted,
        },
    );
    let view = state.view();

    assert_eq!(view.header, "3 documents");
    assert_eq!(view.total_size_label, "Total size: 1000kb");
    assert!(!state.collection().contains(&id));
    assert_eq!(state.delete_phase(&id), None);
}

#[test]
fn delete_rejection_keeps_document_with_inline_error() {
    init_logging();
    let id = DocumentId::new("4");
    let (state, _) = update(loaded_state(), Msg::DeleteClicked { id: id.clone() });
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: id.clone(),
            outcome: DeleteOutcome::Rejected {
                message: DELETE_REJECTED.to_string(),
            },
        },
    );
    let view = state.view();

    assert_eq!(view.header, "4 documents");
    let card = view.documents.iter().find(|card| card.id == id).unwrap();
    assert_eq!(card.error.as_deref(), Some(DELETE_REJECTED));
    assert!(!card.deleting);
    assert!(view
        .documents
        .iter()
        .filter(|card| card.id != id)
        .all(|card| card.error.is_none()));
}

#[test]
fn delete_server_failure_keeps_document_with_retry_hint() {
    init_logging();
    let id = DocumentId::new("4");
    let (state, _) = update(loaded_state(), Msg::DeleteClicked { id: id.clone() });
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: id.clone(),
            outcome: DeleteOutcome::Failed {
                message: DELETE_FAILED.to_string(),
            },
        },
    );

    assert!(state.collection().contains(&id));
    let card = state.view().documents.into_iter().find(|card| card.id == id).unwrap();
    assert_eq!(card.error.as_deref(), Some(DELETE_FAILED));
}

#[test]
fn delete_retry_clears_previous_error() {
    init_logging();
    let id = DocumentId::new("2");
    let (state, _) = update(loaded_state(), Msg::DeleteClicked { id: id.clone() });
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: id.clone(),
            outcome: DeleteOutcome::Failed {
                message: DELETE_FAILED.to_string(),
            },
        },
    );

    let (state, effects) = update(state, Msg::DeleteClicked { id: id.clone() });
    assert_eq!(effects, vec![Effect::DeleteDocument { id: id.clone() }]);
    let card = state.view().documents.into_iter().find(|card| card.id == id).unwrap();
    assert_eq!(card.error, None);
    assert!(card.deleting);
}

#[test]
fn delete_click_while_deleting_is_ignored() {
    init_logging();
    let id = DocumentId::new("1");
    let (state, _) = update(loaded_state(), Msg::DeleteClicked { id: id.clone() });
    let (_state, effects) = update(state, Msg::DeleteClicked { id });

    assert!(effects.is_empty());
}

#[test]
fn deletes_of_different_documents_run_independently() {
    init_logging();
    let (state, first) = update(loaded_state(), Msg::DeleteClicked { id: "1".into() });
    let (state, second) = update(state, Msg::DeleteClicked { id: "2".into() });
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: "1".into(),
            outcome: DeleteOutcome::Rejected {
                message: DELETE_REJECTED.to_string(),
            },
        },
    );
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: "2".into(),
            outcome: DeleteOutcome::Deleted,
        },
    );

    let view = state.view();
    assert_eq!(view.header, "3 documents");
    assert_eq!(view.documents[0].error.as_deref(), Some(DELETE_REJECTED));
}

#[test]
fn delete_of_unknown_document_is_ignored() {
    init_logging();
    let (_state, effects) = update(loaded_state(), Msg::DeleteClicked { id: "404".into() });

    assert!(effects.is_empty());
}

#[test]
fn keystrokes_schedule_debounced_search() {
    init_logging();
    let (state, effects) = update(loaded_state(), Msg::SearchTextChanged("b".to_string()));
    assert_eq!(
        effects,
        vec![Effect::ScheduleSearch {
            text: "b".to_string()
        }]
    );
    let (state, effects) = update(state, Msg::SearchTextChanged("ba".to_string()));
    assert_eq!(
        effects,
        vec![Effect::ScheduleSearch {
            text: "ba".to_string()
        }]
    );

    assert_eq!(state.search_text(), "ba");
    assert_eq!(state.search_phase(), SearchPhase::Idle);
}

#[test]
fn search_replaces_collection() {
    init_logging();
    let (state, effects) = update(loaded_state(), Msg::SearchDebounced("baz".to_string()));
    assert_eq!(
        effects,
        vec![Effect::SearchDocuments {
            seq: 2,
            text: "baz".to_string()
        }]
    );
    assert_eq!(state.search_phase(), SearchPhase::Searching);

    let (state, _) = update(
        state,
        Msg::SearchResults {
            seq: 2,
            documents: vec![Document::new("3", "baz", 520)],
        },
    );
    let view = state.view();

    assert_eq!(state.search_phase(), SearchPhase::Succeeded);
    assert_eq!(view.header, "1 documents");
    assert_eq!(view.total_size_label, "Total size: 520kb");
    assert_eq!(view.documents.len(), 1);
    assert_eq!(view.documents[0].name, "baz");
    assert_eq!(view.documents[0].size_label, "520kb");
}

#[test]
fn search_failure_keeps_collection_and_next_search_clears_error() {
    init_logging();
    let (state, _) = update(loaded_state(), Msg::SearchDebounced("ba".to_string()));
    let (state, _) = update(state, Msg::SearchFailed { seq: 2 });

    let view = state.view();
    assert_eq!(state.search_phase(), SearchPhase::Failed);
    assert_eq!(view.search_error.as_deref(), Some(SEARCH_ERROR_MESSAGE));
    assert_eq!(view.header, "4 documents");
    assert_eq!(view.load_error, None);

    let (state, _) = update(state, Msg::SearchDebounced("baz".to_string()));
    assert!(!state.search_error());
    assert_eq!(state.view().search_error, None);
}

#[test]
fn upload_success_prepends_document() {
    init_logging();
    let file = jpeg("google.jpg", 100 * 1024);
    let (state, effects) = update(loaded_state(), Msg::FileSelected(file.clone()));
    assert_eq!(effects, vec![Effect::UploadFile(file)]);
    assert_eq!(state.upload_phase(), &UploadPhase::Validating);
    assert!(state.view().upload.in_flight);

    let (state, _) = update(state, Msg::UploadStarted);
    assert_eq!(state.upload_phase(), &UploadPhase::Uploading);

    let (state, _) = update(
        state,
        Msg::UploadCompleted(UploadOutcome::Uploaded(Document::new("8", "google.jpg", 100))),
    );
    let view = state.view();

    assert_eq!(state.upload_phase(), &UploadPhase::Succeeded);
    assert_eq!(view.header, "5 documents");
    assert_eq!(view.total_size_label, "Total size: 1420kb");
    assert_eq!(view.documents[0].id, DocumentId::new("8"));
    assert_eq!(view.documents[0].size_label, "100kb");
    assert_eq!(view.upload.success.as_deref(), Some(UPLOAD_SUCCESS_MESSAGE));
    assert_eq!(view.upload.error, None);
    assert!(!view.upload.in_flight);
}

#[test]
fn upload_rejection_reports_reason_without_touching_collection() {
    init_logging();
    let (state, _) = update(
        loaded_state(),
        Msg::FileSelected(jpeg("huge.jpg", 11 * 1024 * 1024)),
    );
    let (state, _) = update(
        state,
        Msg::UploadCompleted(UploadOutcome::Rejected {
            message: "File size is too large.".to_string(),
        }),
    );
    let view = state.view();

    assert_eq!(state.upload_phase(), &UploadPhase::Rejected);
    assert_eq!(view.upload.error.as_deref(), Some("File size is too large."));
    assert_eq!(view.upload.success, None);
    assert_eq!(view.header, "4 documents");
}

#[test]
fn upload_status_persists_until_next_attempt() {
    init_logging();
    let (state, _) = update(loaded_state(), Msg::FileSelected(jpeg("a.jpg", 10)));
    let (state, _) = update(state, Msg::UploadStarted);
    let (state, _) = update(
        state,
        Msg::UploadCompleted(UploadOutcome::Failed {
            message: "There was an error uploading the file. Please try again.".to_string(),
        }),
    );
    let (state, _) = update(state, Msg::Tick);
    assert_eq!(state.upload_phase(), &UploadPhase::Failed);
    assert!(state.upload_status().error.is_some());

    let (state, _) = update(state, Msg::FileSelected(jpeg("b.jpg", 10)));
    assert_eq!(state.upload_status().error, None);
    assert!(!state.upload_status().success);
}

#[test]
fn unmount_cancels_pending_search() {
    init_logging();
    let (state, _) = update(loaded_state(), Msg::SearchTextChanged("ba".to_string()));
    let (_state, effects) = update(state, Msg::Unmounted);

    assert_eq!(effects, vec![Effect::CancelPendingSearch]);
}

#[test]
fn debounce_signal_after_unmount_issues_no_search() {
    init_logging();
    let (state, _) = update(loaded_state(), Msg::SearchTextChanged("baz".to_string()));
    let (state, _) = update(state, Msg::Unmounted);
    assert!(state.is_unmounted());

    let (state, effects) = update(state, Msg::SearchDebounced("baz".to_string()));

    assert!(effects.is_empty());
    assert_eq!(state.search_phase(), SearchPhase::Idle);
    assert_eq!(state.collection().len(), 4);
}
