use clap::Parser;
use iced::widget::{self, button, column, container, text, text_input, Column};
use iced::{window, Alignment, Element, Length, Subscription, Task, Theme};
use std::process::ExitCode;
use tracing::{error, info};

mod cli;
mod config;
mod error;
mod imaging;
mod logging;
mod platform;
mod state;

use cli::Cli;
use config::Config;
use platform::{GalleryDirGate, PickedImage};
use state::screen::{ArtScreen, Exit, ImageRequest, PickTicket, SaveOutcome};
use state::store::RecordStore;

/// Main application state
struct ArtBook {
    /// The art screen and its database
    screen: ArtScreen,
    /// Decides whether the gallery may be opened
    gate: GalleryDirGate,
    /// Outstanding gallery pick, if any
    ticket: Option<PickTicket>,
    /// Pixels of the current image, ready for the image widget
    preview: Option<widget::image::Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    ArtNameChanged(String),
    ArtistNameChanged(String),
    YearChanged(String),
    /// User clicked the image area
    SelectImage,
    /// Picker closed, with the decoded image if one was chosen
    ImagePicked(Option<PickedImage>),
    /// User clicked "Save"
    Save,
    /// User asked to close the window
    CloseRequested(window::Id),
}

impl ArtBook {
    fn new(screen: ArtScreen, gate: GalleryDirGate) -> Self {
        let mut app = ArtBook {
            screen,
            gate,
            ticket: None,
            preview: None,
        };
        app.refresh_preview();
        app
    }

    fn refresh_preview(&mut self) {
        self.preview = self.screen.image().map(|image| {
            let rgba = image.to_rgba8();
            widget::image::Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
        });
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ArtNameChanged(value) => self.screen.set_art_name(value),
            Message::ArtistNameChanged(value) => self.screen.set_artist_name(value),
            Message::YearChanged(value) => self.screen.set_year(value),
            Message::SelectImage => {
                if let ImageRequest::Pick(ticket) = self.screen.begin_image_request(&self.gate) {
                    self.ticket = Some(ticket);
                    return Task::perform(
                        platform::pick_image(self.gate.dir().to_path_buf()),
                        Message::ImagePicked,
                    );
                }
            }
            Message::ImagePicked(picked) => {
                if let Some(ticket) = self.ticket.take() {
                    if let Some(picked) = &picked {
                        info!(path = %picked.path.display(), "image selected");
                    }
                    if self.screen.complete_image_request(ticket, picked.map(|p| p.image)) {
                        self.refresh_preview();
                    }
                }
            }
            Message::Save => match self.screen.save() {
                SaveOutcome::Saved {
                    id,
                    exit: Exit::ToRecordList,
                } => {
                    info!(id, "art saved, leaving the screen");
                    return self.leave();
                }
                SaveOutcome::NoImage | SaveOutcome::ReadOnly | SaveOutcome::Failed(_) => {}
            },
            Message::CloseRequested(_) => return self.leave(),
        }

        Task::none()
    }

    /// Close the screen and end the application
    fn leave(&mut self) -> Task<Message> {
        self.ticket = None;
        self.screen.close();
        iced::exit()
    }

    /// Route window close requests through `leave`
    fn subscription(&self) -> Subscription<Message> {
        window::close_requests().map(Message::CloseRequested)
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let editable = self.screen.is_editable();
        let fields = self.screen.fields();

        let picture: Element<Message> = match &self.preview {
            Some(handle) => widget::image(handle.clone())
                .width(Length::Fixed(300.0))
                .height(Length::Fixed(300.0))
                .into(),
            None => container(text("Select image").size(16))
                .width(Length::Fixed(300.0))
                .height(Length::Fixed(300.0))
                .center_x(Length::Fixed(300.0))
                .center_y(Length::Fixed(300.0))
                .into(),
        };

        let can_pick = editable && !self.screen.has_pending_request();
        let picture = button(picture)
            .on_press_maybe(can_pick.then_some(Message::SelectImage))
            .padding(0);

        // Read-only inputs have no on_input handler
        let mut art_name = text_input("Art name", &fields.art_name).padding(10);
        let mut artist_name = text_input("Artist name", &fields.artist_name).padding(10);
        let mut year = text_input("Year", &fields.year).padding(10);
        if editable {
            art_name = art_name.on_input(Message::ArtNameChanged);
            artist_name = artist_name.on_input(Message::ArtistNameChanged);
            year = year.on_input(Message::YearChanged);
        }

        let notice = self
            .screen
            .notice()
            .map(|notice| notice.message())
            .unwrap_or_default();

        let content: Column<Message> = column![picture, art_name, artist_name, year]
            .push_maybe(editable.then(|| button("Save").on_press(Message::Save).padding(10)))
            .push(text(notice).size(16))
            .spacing(20)
            .padding(40)
            .max_width(420.0)
            .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!(error = %e, "could not load configuration");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_level);

    let db_path = cli.database.clone().unwrap_or_else(|| config.database_path());
    let store = match RecordStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            error!(path = %db_path.display(), error = %e, "could not open database");
            return ExitCode::FAILURE;
        }
    };

    let art_count = store.count().unwrap_or(0);
    info!(art_count, mode = ?cli.open_mode(), "art book initialized");

    let screen = ArtScreen::open(store, cli.open_mode(), config.screen_settings());
    let gate = GalleryDirGate::from_system(config.picture_dir.clone());

    let result = iced::application("Art Book", ArtBook::update, ArtBook::view)
        .theme(ArtBook::theme)
        .subscription(ArtBook::subscription)
        .exit_on_close_request(false)
        .centered()
        .run_with(move || (ArtBook::new(screen, gate), Task::none()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "window closed with an error");
            ExitCode::FAILURE
        }
    }
}
