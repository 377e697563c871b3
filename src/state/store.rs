use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::data::{ArtFields, ArtRecord};
use crate::error::Result;

/// Name of the on-disk database file
pub const DATABASE_FILE: &str = "Arts.db";

/// The RecordStore owns the SQLite connection and the `arts` table.
/// It only creates records and reads them back by id.
pub struct RecordStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl RecordStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "database opened");

        let store = RecordStore {
            conn,
            db_path: Some(path.to_path_buf()),
        };
        store.ensure_schema()?;

        Ok(store)
    }

    /// Open a private in-memory database
    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let store = RecordStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Default location of the database file:
    /// - Linux: ~/.local/share/art-book/Arts.db
    /// - macOS: ~/Library/Application Support/art-book/Arts.db
    /// - Windows: %APPDATA%\art-book\Arts.db
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("art-book");
        path.push(DATABASE_FILE);
        path
    }

    /// Create the `arts` table if it is not there yet.
    /// Returns true when the table was created by this call.
    pub fn ensure_schema(&self) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'arts')",
            [],
            |row| row.get(0),
        )?;

        if exists {
            debug!("arts table already present");
            return Ok(false);
        }

        // Column names are the on-disk contract shared with other tooling
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS arts (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                artName     VARCHAR,
                artistName  VARCHAR,
                year        VARCHAR,
                image       BLOB
            )",
            [],
        )?;

        info!("arts table created");
        Ok(true)
    }

    /// Path to the database file (None for in-memory stores)
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Append a new record and return its id
    pub fn insert(&self, fields: &ArtFields, image: Option<&[u8]>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO arts (artName, artistName, year, image) VALUES (?1, ?2, ?3, ?4)",
            params![fields.art_name, fields.artist_name, fields.year, image],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, bytes = image.map_or(0, |b| b.len()), "art inserted");
        Ok(id)
    }

    /// Read one record by id. A missing id is `Ok(None)`, not an error.
    pub fn fetch_by_id(&self, id: i64) -> Result<Option<ArtRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, artName, artistName, year, image FROM arts WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ArtRecord {
                        id: row.get(0)?,
                        art_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        artist_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        year: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        image: image_bytes(row.get_ref(4)?),
                    })
                },
            )
            .optional()?;

        debug!(id, found = record.is_some(), "fetch by id");
        Ok(record)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get a count of records in the catalog
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM arts", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Bytes of the `image` cell. Outside tooling may have written TEXT there;
/// its bytes are returned as-is and left for the decoder to reject.
fn image_bytes(value: ValueRef<'_>) -> Option<Vec<u8>> {
    match value {
        ValueRef::Blob(bytes) | ValueRef::Text(bytes) => Some(bytes.to_vec()),
        ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) => None,
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, artist: &str, year: &str) -> ArtFields {
        ArtFields {
            art_name: name.to_string(),
            artist_name: artist.to_string(),
            year: year.to_string(),
        }
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = RecordStore::open_in_memory().unwrap();
        assert!(!store.ensure_schema().unwrap());
        assert!(!store.ensure_schema().unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_then_fetch_is_exact() {
        let store = RecordStore::open_in_memory().unwrap();
        let payload = vec![0u8, 1, 2, 255, 254, 0, 7];

        let id = store
            .insert(&fields("Starry Night", "Van Gogh", "1889"), Some(payload.as_slice()))
            .unwrap();
        let record = store.fetch_by_id(id).unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.art_name, "Starry Night");
        assert_eq!(record.artist_name, "Van Gogh");
        assert_eq!(record.year, "1889");
        assert_eq!(record.image.as_deref(), Some(payload.as_slice()));
    }

    #[test]
    fn test_missing_id_is_not_an_error() {
        let store = RecordStore::open_in_memory().unwrap();
        assert!(store.fetch_by_id(42).unwrap().is_none());
        assert!(store.fetch_by_id(0).unwrap().is_none());
    }

    #[test]
    fn test_image_may_be_absent() {
        let store = RecordStore::open_in_memory().unwrap();
        let id = store.insert(&fields("Sketch", "Anon", ""), None).unwrap();
        assert_eq!(store.fetch_by_id(id).unwrap().unwrap().image, None);
    }

    #[test]
    fn test_user_input_is_bound_not_interpolated() {
        let store = RecordStore::open_in_memory().unwrap();
        let hostile = "x'); DROP TABLE arts; --";

        let id = store.insert(&fields(hostile, "O'Keeffe", "19\"29"), None).unwrap();
        let record = store.fetch_by_id(id).unwrap().unwrap();

        assert_eq!(record.art_name, hostile);
        assert_eq!(record.artist_name, "O'Keeffe");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = RecordStore::open_in_memory().unwrap();
        let first = store.insert(&fields("A", "a", "1"), None).unwrap();
        store
            .conn
            .execute("DELETE FROM arts WHERE id = ?1", params![first])
            .unwrap();
        let second = store.insert(&fields("B", "b", "2"), None).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_reopen_file_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DATABASE_FILE);

        let id = {
            let store = RecordStore::open(&path).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
            store.insert(&fields("Water Lilies", "Monet", "1906"), Some(&[9u8, 9][..])).unwrap()
        };

        let store = RecordStore::open(&path).unwrap();
        let record = store.fetch_by_id(id).unwrap().unwrap();
        assert_eq!(record.art_name, "Water Lilies");
        assert_eq!(record.image, Some(vec![9, 9]));
    }

    #[test]
    fn test_null_text_columns_read_as_empty() {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .conn
            .execute("INSERT INTO arts (image) VALUES (NULL)", [])
            .unwrap();
        let id = store.conn.last_insert_rowid();

        let record = store.fetch_by_id(id).unwrap().unwrap();
        assert_eq!(record.art_name, "");
        assert_eq!(record.year, "");
    }

    #[test]
    fn test_text_image_cell_is_read_as_bytes() {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO arts (artName, artistName, year, image) VALUES ('Mona', 'Leo', '1503', 'not-a-blob')",
                [],
            )
            .unwrap();
        let id = store.conn.last_insert_rowid();

        let record = store.fetch_by_id(id).unwrap().unwrap();
        assert_eq!(record.art_name, "Mona");
        assert_eq!(record.year, "1503");
        assert_eq!(record.image, Some(b"not-a-blob".to_vec()));
    }

    #[test]
    fn test_numeric_image_cell_is_absent() {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .conn
            .execute("INSERT INTO arts (artName, image) VALUES ('Zero', 0)", [])
            .unwrap();
        let id = store.conn.last_insert_rowid();

        let record = store.fetch_by_id(id).unwrap().unwrap();
        assert_eq!(record.art_name, "Zero");
        assert_eq!(record.image, None);
    }
}
