/// The art screen controller
///
/// Two modes, chosen when the screen opens:
/// - Create: fields are editable, an image can be picked, save stores a record
/// - View: an existing record is loaded read-only, nothing can be saved
///
/// The capture path is downscale -> encode -> insert, the load path is
/// fetch -> decode. Failures never escape the screen: they turn into a
/// `Notice` or a blank image area.
use image::DynamicImage;
use tracing::{debug, error, info, warn};

use super::data::ArtFields;
use super::store::RecordStore;
use crate::error::Result;
use crate::imaging::{self, StoredFormat};
use crate::platform::{Permission, PermissionGate};

/// How the screen was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Create,
    Existing(i64),
}

/// Image normalization parameters used on save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSettings {
    pub max_dimension: u32,
    pub format: StoredFormat,
    pub quality: u8,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            max_dimension: imaging::MAX_DIMENSION,
            format: StoredFormat::Png,
            quality: imaging::ENCODE_QUALITY,
        }
    }
}

/// Transient user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    SaveFailed,
    PermissionNeeded,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Saved => "The art saved successfully.",
            Notice::SaveFailed => "The art didn't save.",
            Notice::PermissionNeeded => "You have to give permission",
        }
    }
}

/// Where to go once the screen is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    ToRecordList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { id: i64, exit: Exit },
    /// No image selected, nothing was written
    NoImage,
    /// The screen is in view mode
    ReadOnly,
    Failed(Notice),
}

/// Proof that a gallery pick is outstanding. Hand it back exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct PickTicket {
    seq: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ImageRequest {
    /// Access granted, show the picker and complete with this ticket
    Pick(PickTicket),
    Denied,
    /// A pick is already outstanding
    Busy,
    /// View mode, image selection is off
    Disabled,
}

/// Downscale and encode an image the way it is stored
pub fn prepare_image(image: &DynamicImage, settings: &ScreenSettings) -> Result<Vec<u8>> {
    let small = imaging::downscale(image, settings.max_dimension)?;
    imaging::encode(&small, settings.format, settings.quality)
}

pub struct ArtScreen {
    store: RecordStore,
    mode: OpenMode,
    settings: ScreenSettings,
    fields: ArtFields,
    /// Selected image in create mode, decoded stored image in view mode
    image: Option<DynamicImage>,
    pending: Option<u64>,
    next_seq: u64,
    notice: Option<Notice>,
}

impl ArtScreen {
    /// Open the screen. In view mode the record is loaded immediately.
    pub fn open(store: RecordStore, mode: OpenMode, settings: ScreenSettings) -> Self {
        let mut screen = ArtScreen {
            store,
            mode,
            settings,
            fields: ArtFields::default(),
            image: None,
            pending: None,
            next_seq: 0,
            notice: None,
        };

        if let OpenMode::Existing(id) = mode {
            screen.load(id);
        }

        screen
    }

    fn load(&mut self, id: i64) {
        let record = match self.store.fetch_by_id(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(id, "no art with this id");
                return;
            }
            Err(e) => {
                error!(id, error = %e, "failed to read art");
                return;
            }
        };

        info!(id = record.id, "art loaded");
        self.fields = ArtFields::from(&record);

        self.image = match record.image.as_deref().map(imaging::decode) {
            Some(Ok(image)) => Some(image),
            Some(Err(e)) => {
                warn!(id, error = %e, "stored image is unreadable");
                None
            }
            None => None,
        };
    }

    pub fn is_editable(&self) -> bool {
        self.mode == OpenMode::Create
    }

    pub fn fields(&self) -> &ArtFields {
        &self.fields
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn set_art_name(&mut self, value: String) {
        if self.is_editable() {
            self.fields.art_name = value;
        }
    }

    pub fn set_artist_name(&mut self, value: String) {
        if self.is_editable() {
            self.fields.artist_name = value;
        }
    }

    pub fn set_year(&mut self, value: String) {
        if self.is_editable() {
            self.fields.year = value;
        }
    }

    /// Ask for gallery access and, if granted, issue a pick ticket.
    pub fn begin_image_request(&mut self, gate: &dyn PermissionGate) -> ImageRequest {
        if !self.is_editable() {
            return ImageRequest::Disabled;
        }
        if self.pending.is_some() {
            return ImageRequest::Busy;
        }

        let permission = match gate.check() {
            Permission::Granted => Permission::Granted,
            Permission::Denied => gate.request(),
        };

        if permission == Permission::Denied {
            warn!("gallery permission denied");
            self.notice = Some(Notice::PermissionNeeded);
            return ImageRequest::Denied;
        }

        // A grant supersedes an earlier denial notice
        self.notice = None;

        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending = Some(seq);
        ImageRequest::Pick(PickTicket { seq })
    }

    /// Resolve an outstanding pick. `None` means the user cancelled.
    /// Returns false for a ticket that is no longer outstanding.
    pub fn complete_image_request(
        &mut self,
        ticket: PickTicket,
        picked: Option<DynamicImage>,
    ) -> bool {
        if self.pending != Some(ticket.seq) {
            debug!(seq = ticket.seq, "stale pick ignored");
            return false;
        }
        self.pending = None;

        if let Some(image) = picked {
            self.image = Some(image);
        }
        true
    }

    /// Drop the outstanding pick, if any
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Store the current fields and image as a new record.
    pub fn save(&mut self) -> SaveOutcome {
        if !self.is_editable() {
            return SaveOutcome::ReadOnly;
        }

        let Some(image) = self.image.as_ref() else {
            debug!("save skipped, no image selected");
            return SaveOutcome::NoImage;
        };

        let result = prepare_image(image, &self.settings)
            .and_then(|bytes| self.store.insert(&self.fields, Some(bytes.as_slice())));

        match result {
            Ok(id) => {
                self.notice = Some(Notice::Saved);
                SaveOutcome::Saved {
                    id,
                    exit: Exit::ToRecordList,
                }
            }
            Err(e) => {
                error!(error = %e, "failed to save art");
                self.notice = Some(Notice::SaveFailed);
                SaveOutcome::Failed(Notice::SaveFailed)
            }
        }
    }

    /// Close the screen: any outstanding pick is dropped, and the
    /// database is released when the screen itself is dropped.
    pub fn close(&mut self) {
        self.cancel_pending();
        debug!(db = ?self.store.path(), "art screen closed");
    }
}
