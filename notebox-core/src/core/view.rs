//! Headless view model: the note form and the rendered note list.
//!
//! Nothing here touches the store. [`NoteForm`] holds the two input values,
//! [`NoteList`] holds the rows currently on screen. Both can render themselves
//! as HTML fragments for hosts that display markup.

use crate::{NewNote, Note, NoteId};
use serde::Serialize;

/// Text of the single row shown when the store holds no notes.
pub const PLACEHOLDER_TEXT: &str = "No notes stored.";

/// Label of the per-row delete control.
pub const DELETE_LABEL: &str = "Delete";

/// Label of the form's submit control.
pub const SUBMIT_LABEL: &str = "Create new note";

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The title/body input form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    title: String,
    body: String,
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Snapshot of the current input values, ready to hand to the store.
    pub fn values(&self) -> NewNote {
        NewNote {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.body.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<form><input id="title" type="text" value="{}"><input id="body" type="text" value="{}"><button>{}</button></form>"#,
            html_escape(&self.title),
            html_escape(&self.body),
            SUBMIT_LABEL,
        )
    }
}

/// One rendered note, tagged with the id its delete control acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRow {
    pub id: NoteId,
    pub title: String,
    pub body: String,
}

impl From<Note> for NoteRow {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            body: note.body,
        }
    }
}

impl NoteRow {
    fn to_html(&self) -> String {
        format!(
            r#"<li data-note-id="{}"><h3>{}</h3><p>{}</p><button>{}</button></li>"#,
            self.id,
            html_escape(&self.title),
            html_escape(&self.body),
            DELETE_LABEL,
        )
    }
}

/// An entry of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ListItem {
    Note(NoteRow),
    Placeholder,
}

/// The unordered list of rendered notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteList {
    items: Vec<ListItem>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn rows(&self) -> impl Iterator<Item = &NoteRow> {
        self.items.iter().filter_map(|item| match item {
            ListItem::Note(row) => Some(row),
            ListItem::Placeholder => None,
        })
    }

    pub fn ids(&self) -> Vec<NoteId> {
        self.rows().map(|row| row.id).collect()
    }

    pub fn row(&self, id: NoteId) -> Option<&NoteRow> {
        self.rows().find(|row| row.id == id)
    }

    pub fn is_showing_placeholder(&self) -> bool {
        self.items.iter().any(|item| matches!(item, ListItem::Placeholder))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces the whole list with one row per note, or the placeholder when
    /// `notes` is empty. Returns the number of note rows.
    pub fn rebuild<I>(&mut self, notes: I) -> usize
    where
        I: IntoIterator<Item = Note>,
    {
        self.clear();
        self.items
            .extend(notes.into_iter().map(|note| ListItem::Note(note.into())));
        let rendered = self.items.len();
        if rendered == 0 {
            self.items.push(ListItem::Placeholder);
        }
        rendered
    }

    /// Removes the row tagged `id`, leaving every other row in place.
    ///
    /// Shows the placeholder once the last row is gone. Returns `false` and
    /// changes nothing if no row carries `id`.
    pub fn remove_row(&mut self, id: NoteId) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| !matches!(item, ListItem::Note(row) if row.id == id));
        if self.items.len() == before {
            return false;
        }
        if self.items.is_empty() {
            self.items.push(ListItem::Placeholder);
        }
        true
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<ul>");
        for item in &self.items {
            match item {
                ListItem::Note(row) => html.push_str(&row.to_html()),
                ListItem::Placeholder => {
                    html.push_str("<li>");
                    html.push_str(PLACEHOLDER_TEXT);
                    html.push_str("</li>");
                }
            }
        }
        html.push_str("</ul>");
        html
    }
}
