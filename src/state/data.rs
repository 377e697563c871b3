/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the database layer and the screen.

/// One persisted artwork, as read back from the `arts` table
#[derive(Debug, Clone, PartialEq)]
pub struct ArtRecord {
    /// Unique database ID, assigned on insert
    pub id: i64,
    pub art_name: String,
    pub artist_name: String,
    /// Free-form text, never validated as a number
    pub year: String,
    /// Encoded image bytes (None if the column is NULL)
    pub image: Option<Vec<u8>>,
}

/// Text fields entered on the screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtFields {
    pub art_name: String,
    pub artist_name: String,
    pub year: String,
}

impl From<&ArtRecord> for ArtFields {
    fn from(record: &ArtRecord) -> Self {
        Self {
            art_name: record.art_name.clone(),
            artist_name: record.artist_name.clone(),
            year: record.year.clone(),
        }
    }
}
