use clap::Parser;
use iced::widget::image::Handle;
use iced::{clipboard, Element, Task, Theme};
use log::{error, info, warn};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use url::Url;

mod api;
mod config;
mod error;
mod state;
mod ui;

use api::client::MemesClient;
use config::GalleryConfig;
use error::ConfigError;
use state::data::Image;
use state::gallery::{highlight_reset, CopyButton, GalleryState};

/// Browse, search and share the memes collection
#[derive(Parser, Debug)]
#[command(name = "memes-gallery", version, about)]
struct Cli {
    /// Config file (default: ~/.config/memes-gallery.json, ./memes-gallery.json, /etc/memes-gallery.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the service base address from the config file
    #[arg(long)]
    baseurl: Option<String>,

    /// Check the service answers `OK` on /up, then exit
    #[arg(long)]
    healthcheck: bool,

    /// Address or query string to open, e.g. "?q=cat&p=2"
    location: Option<String>,
}

/// Pages either side of the visible one whose thumbnails stay decoded
const THUMBNAIL_PAGE_MARGIN: usize = 1;

/// Everything the window needs, resolved before it opens
struct Launch {
    base_url: Url,
    api_base: Url,
    address: Url,
}

impl Launch {
    fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match GalleryConfig::load(cli.config.as_deref()) {
            Ok((config, path)) => {
                info!("📁 Loaded config from {}", path.display());
                config
            }
            // A bare --baseurl is enough when no config file exists
            Err(ConfigError::NotFound(path)) if cli.config.is_none() => match &cli.baseurl {
                Some(baseurl) => {
                    warn!("⚠️  No config file found (last tried {}), using --baseurl", path.display());
                    GalleryConfig::new(baseurl.clone())
                }
                None => return Err(ConfigError::NotFound(path)),
            },
            Err(err) => return Err(err),
        };

        if let Some(baseurl) = &cli.baseurl {
            config.baseurl = baseurl.clone();
        }

        let base_url = config.base_url()?;
        let api_base = config.api_base()?;
        let location = cli.location.as_deref();
        let address = state::query::resolve_location(&base_url, location).map_err(|e| {
            ConfigError::InvalidUrl {
                url: location.unwrap_or_default().to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            base_url,
            api_base,
            address,
        })
    }
}

/// Main application state
struct MemeGallery {
    /// Search, pagination and copy state
    gallery: GalleryState,
    /// API client for the image list and thumbnails
    client: MemesClient,
    /// Public base address, used for shared links
    base_url: Url,
    /// Decoded thumbnails by image
    thumbnails: HashMap<Image, Handle>,
    /// Thumbnails currently being fetched
    thumbnails_pending: HashSet<Image>,
    /// Thumbnails that failed once; not retried this session
    thumbnails_failed: HashSet<Image>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The image-list fetch finished
    ImagesLoaded(Result<Vec<Image>, String>),
    /// User edited the search field
    SearchChanged(String),
    /// User clicked "Reset"
    ResetSearch,
    /// User picked a page in the pagination control
    PageSelected(usize),
    /// User clicked a thumbnail
    ImageSelected(Image),
    /// User closed the selected-image panel
    CloseImage,
    /// User clicked one of the copy buttons
    CopyLink(CopyButton),
    /// A copy highlight timer fired
    HighlightExpired(CopyButton),
    /// A thumbnail fetch finished
    ThumbnailLoaded(Image, Result<Vec<u8>, String>),
}

impl MemeGallery {
    /// Create the gallery and kick off the one image-list fetch
    fn new(launch: Launch) -> (Self, Task<Message>) {
        let client = MemesClient::new(launch.api_base);
        info!("🌐 Using API at {}", client.base());

        let app = MemeGallery {
            gallery: GalleryState::from_address(launch.address),
            client: client.clone(),
            base_url: launch.base_url,
            thumbnails: HashMap::new(),
            thumbnails_pending: HashSet::new(),
            thumbnails_failed: HashSet::new(),
        };

        (app, load_images(client))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImagesLoaded(Ok(images)) => {
                self.gallery.replace_images(images);
                self.request_thumbnails()
            }
            Message::ImagesLoaded(Err(err)) => {
                // Nothing shown to the user; the gallery keeps what it has
                error!("❌ Failed to load image list: {}", err);
                Task::none()
            }
            Message::SearchChanged(term) => {
                self.gallery.set_search_term(term);
                self.request_thumbnails()
            }
            Message::ResetSearch => {
                self.gallery.reset_search();
                self.request_thumbnails()
            }
            Message::PageSelected(page) => {
                self.gallery.set_current_page(page);
                self.request_thumbnails()
            }
            Message::ImageSelected(image) => {
                self.gallery.select_image(Some(image));
                Task::none()
            }
            Message::CloseImage => {
                self.gallery.select_image(None);
                Task::none()
            }
            Message::CopyLink(button) => match self.gallery.copy_link(button, &self.base_url) {
                Some(link) => Task::batch([
                    clipboard::write(link),
                    Task::perform(highlight_reset(button), Message::HighlightExpired),
                ]),
                None => Task::none(),
            },
            Message::HighlightExpired(button) => {
                self.gallery.clear_highlight(button);
                Task::none()
            }
            Message::ThumbnailLoaded(image, result) => {
                self.thumbnails_pending.remove(&image);
                match result {
                    Ok(bytes) => {
                        self.thumbnails.insert(image, Handle::from_bytes(bytes));
                    }
                    Err(err) => {
                        warn!("⚠️  Thumbnail for {} failed: {}", image, err);
                        self.thumbnails_failed.insert(image);
                    }
                }
                Task::none()
            }
        }
    }

    /// Fetch thumbnails for the visible page that aren't cached, in flight
    /// or known to fail
    fn request_thumbnails(&mut self) -> Task<Message> {
        // Drop decoded thumbnails that are no longer near the visible page
        let keep: HashSet<&Image> = self
            .gallery
            .nearby_images(THUMBNAIL_PAGE_MARGIN)
            .into_iter()
            .collect();
        self.thumbnails.retain(|image, _| keep.contains(image));

        let wanted: Vec<Image> = self
            .gallery
            .paginated_images()
            .into_iter()
            .filter(|image| {
                !self.thumbnails.contains_key(*image)
                    && !self.thumbnails_pending.contains(*image)
                    && !self.thumbnails_failed.contains(*image)
            })
            .cloned()
            .collect();

        let mut tasks = Vec::with_capacity(wanted.len());
        for image in wanted {
            self.thumbnails_pending.insert(image.clone());
            let client = self.client.clone();

            tasks.push(Task::perform(
                async move {
                    let result = client
                        .fetch_thumbnail(&image)
                        .await
                        .map_err(|e| e.to_string());
                    (image, result)
                },
                |(image, result)| Message::ThumbnailLoaded(image, result),
            ));
        }

        Task::batch(tasks)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        ui::gallery::view(&self.gallery, &self.thumbnails, &self.base_url)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Background fetch of the image list
fn load_images(client: MemesClient) -> Task<Message> {
    Task::perform(
        async move { client.fetch_images().await.map_err(|e| e.to_string()) },
        Message::ImagesLoaded,
    )
}

/// Run the `/up` check outside the GUI; returns the process exit code
fn run_healthcheck(api_base: Url) -> i32 {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("❌ Failed to start runtime: {}", err);
            return 1;
        }
    };

    match runtime.block_on(MemesClient::new(api_base).healthcheck()) {
        Ok(()) => {
            println!("OK");
            0
        }
        Err(err) => {
            println!("Failed to get 'OK' response: {}", err);
            1
        }
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let launch = match Launch::from_cli(&cli) {
        Ok(launch) => launch,
        Err(err) => {
            error!("❌ {}", err);
            std::process::exit(1);
        }
    };

    if cli.healthcheck {
        std::process::exit(run_healthcheck(launch.api_base));
    }

    info!("🎨 Memes gallery opening {}", launch.address);

    iced::application("Memes!", MemeGallery::update, MemeGallery::view)
        .theme(MemeGallery::theme)
        .centered()
        .run_with(move || MemeGallery::new(launch))
}
