//! Internal domain modules for the Notebox core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod app;
pub mod cursor;
pub mod error;
pub mod handle;
pub mod note;
pub mod settings;
pub mod storage;
pub mod store;
pub mod view;

#[doc(inline)]
pub use app::{
    delete_note, refresh_notes, render_notes, submit_note, Message, NotesApp, StoreState,
};
#[doc(inline)]
pub use cursor::Cursor;
#[doc(inline)]
pub use error::{NoteboxError, Result};
#[doc(inline)]
pub use handle::{PendingAdd, StoreHandle};
#[doc(inline)]
pub use note::{NewNote, Note, NoteId};
#[doc(inline)]
pub use settings::{AppSettings, StoreConfig};
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use store::NoteStore;
#[doc(inline)]
pub use view::{ListItem, NoteForm, NoteList, NoteRow};
