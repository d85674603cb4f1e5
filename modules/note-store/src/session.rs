//! Editor session: a note store plus the AI-assist busy state.
//!
//! An assist runs in two halves so that editing can continue while the
//! request is in flight: [`EditorSession::begin_assist`] captures the target
//! note and marks the session busy, [`EditorSession::finish_assist`] applies
//! the outcome and always clears the busy flag.

use crate::client::{AssistBackend, AssistClientError};
use crate::store::NoteStore;
use crate::storage::SnapshotStorage;
use note_assist_types::{AssistRequest, AssistResponse};

/// An in-flight assist request for one note.
#[derive(Debug, Clone)]
pub struct AssistTicket {
    note_id: String,
    request: AssistRequest,
}

impl AssistTicket {
    pub fn note_id(&self) -> &str {
        &self.note_id
    }

    pub fn request(&self) -> &AssistRequest {
        &self.request
    }
}

pub struct EditorSession<S: SnapshotStorage> {
    store: NoteStore<S>,
    busy: bool,
}

impl<S: SnapshotStorage> EditorSession<S> {
    pub fn new(store: NoteStore<S>) -> Self {
        Self { store, busy: false }
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NoteStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> NoteStore<S> {
        self.store
    }

    /// True while an assist request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start an assist for the selected note.
    ///
    /// Returns `None` without side effects when the prompt is empty, nothing
    /// is selected, or another assist is still in flight.
    pub fn begin_assist(&mut self, prompt: &str) -> Option<AssistTicket> {
        if self.busy || prompt.is_empty() {
            return None;
        }
        let note = self.store.selected()?;
        let ticket = AssistTicket {
            note_id: note.id.clone(),
            request: AssistRequest::new(prompt, note.content.clone()),
        };
        self.busy = true;
        Some(ticket)
    }

    /// Apply the outcome of `ticket`. Returns `true` if text was appended.
    ///
    /// The result is appended to the note's current content, so edits made
    /// while the request was in flight are kept. Failures are logged and
    /// leave the note untouched.
    pub fn finish_assist(
        &mut self,
        ticket: AssistTicket,
        outcome: Result<AssistResponse, AssistClientError>,
    ) -> bool {
        self.busy = false;
        match outcome {
            Ok(resp) if !resp.result.is_empty() => {
                let appended = self
                    .store
                    .append_content(&ticket.note_id, &resp.result)
                    .is_some();
                if !appended {
                    log::warn!(
                        "[NOTE_STORE] Note {} was deleted before its assist result arrived",
                        ticket.note_id
                    );
                }
                appended
            }
            Ok(_) => false,
            Err(e) => {
                log::error!("AI assist error: {}", e);
                false
            }
        }
    }

    /// Abandon `ticket` without touching the note.
    pub fn cancel_assist(&mut self, ticket: AssistTicket) {
        log::debug!("[NOTE_STORE] Assist for note {} cancelled", ticket.note_id);
        self.busy = false;
    }

    /// Begin, send through `backend`, and finish in one step.
    ///
    /// Dropping the returned future before the backend answers abandons the
    /// request: the note is left alone and the session is no longer busy.
    pub async fn run_assist<B>(&mut self, backend: &B, prompt: &str) -> bool
    where
        B: AssistBackend + ?Sized,
    {
        let Some(ticket) = self.begin_assist(prompt) else {
            return false;
        };
        let outcome = {
            let _busy = BusyGuard(&mut self.busy);
            backend.assist(ticket.request()).await
        };
        self.finish_assist(ticket, outcome)
    }
}

/// Clears the busy flag when dropped, including mid-await.
struct BusyGuard<'a>(&'a mut bool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
