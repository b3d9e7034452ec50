//! Note-taking controller: opens the store and wires the form and list to it.
//!
//! The free functions ([`render_notes`], [`submit_note`], [`delete_note`]) take
//! the store handle explicitly and return the store's result; [`refresh_notes`]
//! is the logging variant of a render. [`NotesApp`] drives them from UI
//! messages and turns failures into log lines, so a failed open or transaction
//! never takes the rest of the widget down.

use crate::{NoteForm, NoteId, NoteList, Result, StoreConfig, StoreHandle};

/// Lifecycle of the store behind a [`NotesApp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreState {
    Unopened,
    Opening,
    Ready,
    /// Open failed; carries the error text.
    Failed(String),
}

/// Something the user did in the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    TitleChanged(String),
    BodyChanged(String),
    Submit,
    /// The delete control of the row tagged with this id was clicked.
    DeleteClicked(NoteId),
    Refresh,
}

/// Rebuilds `list` from a fresh walk over the store.
///
/// Returns the number of note rows. On error `list` is left as it was.
pub async fn render_notes(store: &StoreHandle, list: &mut NoteList) -> Result<usize> {
    let notes = store.list_all().await?;
    let rendered = list.rebuild(notes);
    log::debug!("Rendered {rendered} notes");
    Ok(rendered)
}

/// Like [`render_notes`], but logs a failed read instead of returning it.
pub async fn refresh_notes(store: &StoreHandle, list: &mut NoteList) {
    if let Err(e) = render_notes(store, list).await {
        log::error!("Failed to read notes: {e}");
    }
}

/// Stores the form's current values as a new note.
///
/// The form is cleared as soon as the insert succeeds; once the transaction
/// has committed, `list` is rebuilt through [`refresh_notes`]. A failed
/// re-render does not fail the submit since the note is already stored.
///
/// # Errors
///
/// Returns the insert or commit error. The form keeps its values if the
/// insert failed, and is already cleared if only the commit failed.
pub async fn submit_note(
    store: &StoreHandle,
    form: &mut NoteForm,
    list: &mut NoteList,
) -> Result<NoteId> {
    let mut pending = store.begin_add(form.values());
    if pending.inserted().await.is_some() {
        form.clear();
    }
    let id = pending.completed().await?;
    log::info!("Transaction completed: database modification finished.");
    refresh_notes(store, list).await;
    Ok(id)
}

/// Deletes the note behind a row's delete control and drops only that row.
///
/// Returns whether the store held a note with `id`.
pub async fn delete_note(store: &StoreHandle, list: &mut NoteList, id: NoteId) -> Result<bool> {
    let existed = store.delete(id).await?;
    list.remove_row(id);
    log::info!("Note {id} deleted.");
    Ok(existed)
}

/// The note-taking widget: one form, one list, one store.
pub struct NotesApp {
    state: StoreState,
    store: Option<StoreHandle>,
    form: NoteForm,
    list: NoteList,
}

impl Default for NotesApp {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesApp {
    pub fn new() -> Self {
        Self {
            state: StoreState::Unopened,
            store: None,
            form: NoteForm::new(),
            list: NoteList::new(),
        }
    }

    /// Opens the store and performs the initial render.
    ///
    /// A failed open is logged and leaves the app in [`StoreState::Failed`];
    /// every later message is then ignored.
    pub async fn start(&mut self, config: StoreConfig) {
        self.state = StoreState::Opening;
        match StoreHandle::open(config).await {
            Ok(handle) => {
                log::info!("Database opened successfully");
                self.attach(handle).await;
            }
            Err(e) => {
                log::error!("Database failed to open: {e}");
                self.state = StoreState::Failed(e.to_string());
            }
        }
    }

    /// Uses an already-open store and performs the initial render.
    pub async fn attach(&mut self, handle: StoreHandle) {
        self.store = Some(handle);
        self.state = StoreState::Ready;
        self.refresh().await;
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn store(&self) -> Option<&StoreHandle> {
        self.store.as_ref()
    }

    pub fn form(&self) -> &NoteForm {
        &self.form
    }

    pub fn list(&self) -> &NoteList {
        &self.list
    }

    pub async fn update(&mut self, message: Message) {
        match message {
            Message::TitleChanged(title) => self.form.set_title(title),
            Message::BodyChanged(body) => self.form.set_body(body),
            Message::Submit => self.submit().await,
            Message::DeleteClicked(id) => self.delete(id).await,
            Message::Refresh => self.refresh().await,
        }
    }

    /// The form followed by the list, as one HTML fragment.
    pub fn view(&self) -> String {
        format!("{}{}", self.form.to_html(), self.list.to_html())
    }

    async fn submit(&mut self) {
        let Some(store) = self.ready_store("submit") else {
            return;
        };
        if let Err(e) = submit_note(&store, &mut self.form, &mut self.list).await {
            log::error!("Transaction not opened due to error: {e}");
        }
    }

    async fn delete(&mut self, id: NoteId) {
        let Some(store) = self.ready_store("delete") else {
            return;
        };
        if let Err(e) = delete_note(&store, &mut self.list, id).await {
            log::error!("Transaction not opened due to error: {e}");
        }
    }

    async fn refresh(&mut self) {
        let Some(store) = self.ready_store("render") else {
            return;
        };
        refresh_notes(&store, &mut self.list).await;
    }

    fn ready_store(&self, action: &str) -> Option<StoreHandle> {
        match (&self.state, &self.store) {
            (StoreState::Ready, Some(store)) => Some(store.clone()),
            _ => {
                log::warn!("Ignoring {action}: store is {:?}", self.state);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ListItem, NoteStore, PLACEHOLDER_TEXT};
    use tempfile::tempdir;

    async fn started(dir: &tempfile::TempDir) -> NotesApp {
        let mut app = NotesApp::new();
        app.start(StoreConfig::in_directory(dir.path())).await;
        assert_eq!(app.state(), &StoreState::Ready);
        app
    }

    async fn add(app: &mut NotesApp, title: &str, body: &str) {
        app.update(Message::TitleChanged(title.to_string())).await;
        app.update(Message::BodyChanged(body.to_string())).await;
        app.update(Message::Submit).await;
    }

    #[tokio::test]
    async fn test_start_renders_placeholder_for_empty_store() {
        let dir = tempdir().unwrap();
        let app = started(&dir).await;

        assert_eq!(app.list().items(), &[ListItem::Placeholder]);
        assert!(app.view().contains(PLACEHOLDER_TEXT));
    }

    #[tokio::test]
    async fn test_submit_renders_one_new_row_with_increasing_id() {
        let dir = tempdir().unwrap();
        let mut app = started(&dir).await;

        add(&mut app, "first", "note").await;
        let before = app.list().ids();

        add(&mut app, "A", "B").await;
        let rows: Vec<_> = app.list().rows().cloned().collect();

        assert_eq!(rows.len(), before.len() + 1);
        let new_row = rows.last().unwrap();
        assert_eq!(new_row.title, "A");
        assert_eq!(new_row.body, "B");
        assert!(before.iter().all(|id| *id < new_row.id));
        assert!(!app.list().is_showing_placeholder());
    }

    #[tokio::test]
    async fn test_submit_clears_form_after_insert() {
        let dir = tempdir().unwrap();
        let mut app = started(&dir).await;

        add(&mut app, "A", "B").await;
        assert!(app.form().is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_form_values() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(&StoreConfig::in_directory(dir.path())).unwrap();
        store.connection().execute("DROP TABLE notes", []).unwrap();

        let mut app = NotesApp::new();
        app.attach(StoreHandle::new(store)).await;
        add(&mut app, "kept", "values").await;

        assert_eq!(app.form().title(), "kept");
        assert_eq!(app.form().body(), "values");
    }

    #[tokio::test]
    async fn test_commit_failure_after_insert_clears_form_but_stores_nothing() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(&StoreConfig::in_directory(dir.path())).unwrap();
        store.fail_commits_after_insert();
        let handle = StoreHandle::new(store);

        let mut form = NoteForm::new();
        form.set_title("A");
        form.set_body("B");
        let mut list = NoteList::new();
        render_notes(&handle, &mut list).await.unwrap();

        let result = submit_note(&handle, &mut form, &mut list).await;
        assert!(result.is_err());
        assert!(form.is_empty());
        assert_eq!(handle.count().await.unwrap(), 0);
        assert_eq!(list.items(), &[ListItem::Placeholder]);
    }

    #[tokio::test]
    async fn test_submit_succeeds_when_rerender_fails() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(&StoreConfig::in_directory(dir.path())).unwrap();
        // A BLOB title cannot be read back as text, so every full render fails.
        store
            .connection()
            .execute("INSERT INTO notes (title, body) VALUES (X'00', '')", [])
            .unwrap();
        let handle = StoreHandle::new(store);

        let mut form = NoteForm::new();
        form.set_title("A");
        form.set_body("B");
        let mut list = NoteList::new();

        let id = submit_note(&handle, &mut form, &mut list).await.unwrap();

        assert!(form.is_empty());
        assert_eq!(handle.count().await.unwrap(), 2);
        assert_eq!(handle.get(id).await.unwrap().unwrap().title, "A");
        assert!(list.items().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_row() {
        let dir = tempdir().unwrap();
        let mut app = started(&dir).await;
        add(&mut app, "a", "").await;
        add(&mut app, "b", "").await;
        add(&mut app, "c", "").await;

        let ids = app.list().ids();
        app.update(Message::DeleteClicked(ids[1])).await;
        assert_eq!(app.list().ids(), vec![ids[0], ids[2]]);

        app.update(Message::Refresh).await;
        assert_eq!(app.list().ids(), vec![ids[0], ids[2]]);
    }

    #[tokio::test]
    async fn test_delete_last_note_shows_placeholder() {
        let dir = tempdir().unwrap();
        let mut app = started(&dir).await;
        add(&mut app, "only", "").await;

        let id = app.list().ids()[0];
        app.update(Message::DeleteClicked(id)).await;
        assert_eq!(app.list().items(), &[ListItem::Placeholder]);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_id_leaves_list_unchanged() {
        let dir = tempdir().unwrap();
        let mut app = started(&dir).await;
        add(&mut app, "a", "").await;
        let before = app.list().clone();

        let store = app.store().unwrap().clone();
        let mut list = app.list().clone();
        let existed = delete_note(&store, &mut list, NoteId(999)).await.unwrap();
        assert!(!existed);
        assert_eq!(list, before);

        app.update(Message::DeleteClicked(NoteId(999))).await;
        assert_eq!(app.list(), &before);
    }

    #[tokio::test]
    async fn test_render_twice_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut app = started(&dir).await;
        add(&mut app, "a", "1").await;
        add(&mut app, "b", "2").await;

        app.update(Message::Refresh).await;
        let first = app.list().clone();
        app.update(Message::Refresh).await;
        assert_eq!(app.list(), &first);
    }

    #[tokio::test]
    async fn test_failed_open_ignores_messages() {
        let dir = tempdir().unwrap();
        let mut config = StoreConfig::in_directory(dir.path());
        config.version = 2;
        NoteStore::open(&config).unwrap();

        let mut app = NotesApp::new();
        config.version = 1;
        app.start(config).await;
        assert!(matches!(app.state(), StoreState::Failed(_)));

        add(&mut app, "A", "B").await;
        assert_eq!(app.form().title(), "A");
        assert!(app.list().items().is_empty());
    }

    #[tokio::test]
    async fn test_notes_reappear_after_restart() {
        let dir = tempdir().unwrap();
        {
            let mut app = started(&dir).await;
            add(&mut app, "persisted", "yes").await;
        }

        let app = started(&dir).await;
        let rows: Vec<_> = app.list().rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "persisted");
    }

    #[test]
    fn test_new_app_is_unopened() {
        let app = NotesApp::new();
        assert_eq!(app.state(), &StoreState::Unopened);
        assert!(app.store().is_none());
    }
}
