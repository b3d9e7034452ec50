//! Forward cursor over the `notes` table.

use crate::{Note, NoteId, Result};
use rusqlite::{Connection, OptionalExtension};

/// A lazy, forward-only walk over every note in key order.
///
/// Each call to [`Iterator::next`] fetches the single record following the
/// last key seen, so rows are read on demand and a walk that stops early
/// never touches the rest of the table. A cursor cannot be rewound; open a
/// new one with [`NoteStore::cursor`](crate::NoteStore::cursor).
///
/// After the first error the cursor is exhausted.
pub struct Cursor<'conn> {
    conn: &'conn Connection,
    last_key: Option<NoteId>,
    done: bool,
}

impl<'conn> Cursor<'conn> {
    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            last_key: None,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<Option<Note>> {
        // -1 sorts below every key the generator can produce.
        let after = self.last_key.map_or(-1, |id| id.0);
        let note = self
            .conn
            .query_row(
                "SELECT id, title, body FROM notes WHERE id > ? ORDER BY id LIMIT 1",
                [after],
                map_note_row,
            )
            .optional()?;
        Ok(note)
    }
}

impl Iterator for Cursor<'_> {
    type Item = Result<Note>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(note)) => {
                self.last_key = Some(note.id);
                Some(Ok(note))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Maps a `SELECT id, title, body` row to a [`Note`].
pub(crate) fn map_note_row(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: NoteId(row.get(0)?),
        title: row.get(1)?,
        body: row.get(2)?,
    })
}
