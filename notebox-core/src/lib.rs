//! Core library for Notebox — a minimal local note store with a headless list view.
//!
//! [`NotesApp`] is the usual entry point: it opens the `notes` database,
//! keeps the form and list in sync with it, and logs store failures instead of
//! propagating them. Hosts that want the store results directly can call
//! [`submit_note`], [`render_notes`] and [`delete_note`] with a [`StoreHandle`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    app::{
        delete_note, refresh_notes, render_notes, submit_note, Message, NotesApp, StoreState,
    },
    cursor::Cursor,
    error::{NoteboxError, Result},
    handle::{PendingAdd, StoreHandle},
    note::{NewNote, Note, NoteId},
    settings::{
        load_settings, save_settings, settings_file_path, AppSettings, StoreConfig,
        DEFAULT_STORE_NAME, DEFAULT_STORE_VERSION,
    },
    storage::Storage,
    store::NoteStore,
    view::{ListItem, NoteForm, NoteList, NoteRow, DELETE_LABEL, PLACEHOLDER_TEXT, SUBMIT_LABEL},
};
