use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => match state.begin_load() {
            Some(seq) => vec![Effect::LoadDocuments { seq }],
            None => Vec::new(),
        },
        Msg::Unmounted => {
            state.unmount();
            vec![Effect::CancelPendingSearch]
        }
        Msg::SearchTextChanged(text) => {
            state.set_search_text(text.clone());
            vec![Effect::ScheduleSearch { text }]
        }
        // A debounce signal already queued at teardown must not reach the server.
        Msg::SearchDebounced(_) if state.is_unmounted() => Vec::new(),
        Msg::SearchDebounced(text) => {
            let seq = state.begin_search(text.clone());
            vec![Effect::SearchDocuments { seq, text }]
        }
        Msg::DocumentsLoaded { seq, documents } => {
            state.apply_load(seq, Some(documents));
            Vec::new()
        }
        Msg::LoadFailed { seq } => {
            state.apply_load(seq, None);
            Vec::new()
        }
        Msg::SearchResults { seq, documents } => {
            state.apply_search(seq, Some(documents));
            Vec::new()
        }
        Msg::SearchFailed { seq } => {
            state.apply_search(seq, None);
            Vec::new()
        }
        Msg::DeleteClicked { id } => {
            if state.begin_delete(&id) {
                vec![Effect::DeleteDocument { id }]
            } else {
                Vec::new()
            }
        }
        Msg::DeleteCompleted { id, outcome } => {
            state.apply_delete(id, outcome);
            Vec::new()
        }
        Msg::FileSelected(file) => {
            state.begin_upload();
            vec![Effect::UploadFile(file)]
        }
        Msg::UploadStarted => {
            state.mark_uploading();
            Vec::new()
        }
        Msg::UploadCompleted(outcome) => {
            state.apply_upload(outcome);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
