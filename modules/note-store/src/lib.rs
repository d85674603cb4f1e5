//! Client-side note storage and AI-assist session for the note-assist app.
//!
//! [`NoteStore`] keeps the ordered note collection and the current selection,
//! writing the whole collection through a [`SnapshotStorage`] after every
//! change. [`EditorSession`] layers the AI-assist flow on top, talking to the
//! service through an [`AssistBackend`] such as [`NoteAssistClient`].

pub mod client;
pub mod session;
pub mod storage;
pub mod store;

pub use client::{AssistBackend, AssistClientError, NoteAssistClient};
pub use note_assist_types::Note;
pub use session::{AssistTicket, EditorSession};
pub use storage::{FileSnapshotStorage, MemorySnapshotStorage, SnapshotStorage, StorageError};
pub use store::{NotePatch, NoteStore};
