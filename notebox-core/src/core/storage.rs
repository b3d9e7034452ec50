use crate::{NoteboxError, Result, StoreConfig};
use rusqlite::Connection;
use std::fs;

/// Index names created alongside the `notes` table.
const INDEX_NAMES: [&str; 2] = ["title", "body"];

/// An open, versioned note database.
pub struct Storage {
    conn: Connection,
    name: String,
    version: u32,
}

impl Storage {
    /// Opens the database described by `config`, creating it if needed.
    ///
    /// A database whose stored version is older than `config.version` is set up
    /// in one transaction: the `notes` table, its `title` and `body` indexes, and
    /// the new version number are committed together.
    ///
    /// # Errors
    ///
    /// Returns [`NoteboxError::VersionMismatch`] if the stored version is newer
    /// than requested, [`NoteboxError::InvalidStore`] if a database at the
    /// requested version lacks the notes table or an index, and
    /// [`NoteboxError::Database`] / [`NoteboxError::Io`] for lower-level failures.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_directory)?;
        let mut conn = Connection::open(config.database_path())?;

        let stored = stored_version(&conn)?;
        if stored > config.version {
            return Err(NoteboxError::VersionMismatch {
                stored,
                requested: config.version,
            });
        }

        if stored < config.version {
            upgrade(&mut conn, config.version)?;
            log::info!("Database setup complete");
        } else {
            validate(&conn)?;
        }

        Ok(Self {
            conn,
            name: config.name.clone(),
            version: config.version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

fn stored_version(conn: &Connection) -> Result<u32> {
    let raw: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    u32::try_from(raw)
        .map_err(|_| NoteboxError::InvalidStore(format!("Unexpected store version {raw}")))
}

fn upgrade(conn: &mut Connection, version: u32) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(include_str!("schema.sql"))?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()?;
    Ok(())
}

fn validate(conn: &Connection) -> Result<()> {
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'notes'",
        [],
        |row| row.get(0),
    )?;
    if table_count != 1 {
        return Err(NoteboxError::InvalidStore("Missing notes table".to_string()));
    }

    for index in INDEX_NAMES {
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'index' AND tbl_name = 'notes' AND name = ?",
            [index],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(NoteboxError::InvalidStore(format!("Missing index '{index}'")));
        }
    }

    Ok(())
}
