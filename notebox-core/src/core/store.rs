//! Record-level operations on the `notes` table.

use crate::core::cursor::map_note_row;
use crate::{Cursor, NewNote, Note, NoteId, Result, Storage, StoreConfig};
use rusqlite::{Connection, OptionalExtension};

/// The open note store.
///
/// Every mutation runs in its own read-write transaction; reads go straight to
/// the connection. Ids come from SQLite's `AUTOINCREMENT` key generator, so they
/// start at 1, only grow, and are never handed out twice.
pub struct NoteStore {
    storage: Storage,
}

impl NoteStore {
    /// Opens (and if necessary sets up) the store described by `config`.
    ///
    /// # Errors
    ///
    /// See [`Storage::open`].
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            storage: Storage::open(config)?,
        })
    }

    pub fn connection(&self) -> &Connection {
        self.storage.connection()
    }

    /// Inserts `note` and returns the id the store assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NoteboxError::Database`] if the INSERT or the commit fails;
    /// nothing is written in that case.
    pub fn add(&mut self, note: &NewNote) -> Result<NoteId> {
        self.add_with(note, |_| {})
    }

    /// Like [`add`](Self::add), but calls `on_inserted` with the new id as soon
    /// as the INSERT succeeds, before the transaction commits.
    ///
    /// `on_inserted` is not called if the INSERT fails. It is still called when
    /// only the commit fails, in which case the row is rolled back and the
    /// commit error is returned.
    pub fn add_with<F>(&mut self, note: &NewNote, on_inserted: F) -> Result<NoteId>
    where
        F: FnOnce(NoteId),
    {
        let tx = self.storage.connection_mut().transaction()?;
        tx.execute(
            "INSERT INTO notes (title, body) VALUES (?, ?)",
            rusqlite::params![note.title, note.body],
        )?;
        let id = NoteId(tx.last_insert_rowid());
        on_inserted(id);
        tx.commit()?;
        Ok(id)
    }

    /// Deletes the note with `id`.
    ///
    /// Returns `true` if a record was removed. Deleting an id that is not in the
    /// store commits normally and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NoteboxError::Database`] if the DELETE or the commit fails.
    pub fn delete(&mut self, id: NoteId) -> Result<bool> {
        let tx = self.storage.connection_mut().transaction()?;
        let removed = tx.execute("DELETE FROM notes WHERE id = ?", [id.0])?;
        tx.commit()?;
        Ok(removed > 0)
    }

    pub fn get(&self, id: NoteId) -> Result<Option<Note>> {
        let note = self
            .connection()
            .query_row(
                "SELECT id, title, body FROM notes WHERE id = ?",
                [id.0],
                map_note_row,
            )
            .optional()?;
        Ok(note)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .connection()
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Opens a fresh forward cursor positioned before the first note.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self.connection())
    }

    /// Walks a fresh cursor to the end and collects every note in key order.
    ///
    /// # Errors
    ///
    /// Returns the first error the cursor reports.
    pub fn list_all(&self) -> Result<Vec<Note>> {
        self.cursor().collect()
    }

    /// Returns every note whose title equals `title`, in key order.
    pub fn find_by_title(&self, title: &str) -> Result<Vec<Note>> {
        self.find_by(
            "SELECT id, title, body FROM notes INDEXED BY title WHERE title = ? ORDER BY id",
            title,
        )
    }

    /// Returns every note whose body equals `body`, in key order.
    pub fn find_by_body(&self, body: &str) -> Result<Vec<Note>> {
        self.find_by(
            "SELECT id, title, body FROM notes INDEXED BY body WHERE body = ? ORDER BY id",
            body,
        )
    }

    fn find_by(&self, sql: &str, value: &str) -> Result<Vec<Note>> {
        let mut stmt = self.connection().prepare(sql)?;
        let notes = stmt
            .query_map([value], map_note_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Makes every later insert commit fail on a deferred foreign key, while the
    /// INSERT statement itself still succeeds.
    #[cfg(test)]
    pub(crate) fn fail_commits_after_insert(&self) {
        self.connection()
            .execute_batch(
                "PRAGMA foreign_keys = ON;
                 CREATE TABLE owners (id INTEGER PRIMARY KEY);
                 CREATE TABLE audit (
                     owner_id INTEGER REFERENCES owners(id) DEFERRABLE INITIALLY DEFERRED
                 );
                 CREATE TRIGGER notes_audit AFTER INSERT ON notes
                 BEGIN
                     INSERT INTO audit (owner_id) VALUES (999);
                 END;",
            )
            .unwrap();
    }
}
