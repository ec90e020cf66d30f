//! Image export and share dispatch
//!
//! The pipeline is: locate the attached card, rasterize it to PNG, then hand
//! the bytes to the surface chosen by [`SharePlatform`]. A failed share
//! (anything but the user dismissing the sheet) regenerates the image and
//! falls back to a plain download; if that fails too the error is logged
//! and dropped.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::card::{render_card_png, CaptureOptions, ShareableCard};
use crate::errors::{ExportError, ShareError};
use crate::share::{download_file_name, ShareData, SharePlatform};

/// Slot a rendered card is attached to before it can be captured
#[derive(Debug, Clone, Default)]
pub struct CardRef {
    card: Option<ShareableCard>,
}

impl CardRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(card: ShareableCard) -> Self {
        Self { card: Some(card) }
    }

    pub fn attach(&mut self, card: ShareableCard) {
        self.card = Some(card);
    }

    pub fn detach(&mut self) -> Option<ShareableCard> {
        self.card.take()
    }

    pub fn get(&self) -> Option<&ShareableCard> {
        self.card.as_ref()
    }
}

/// Turns a card into encoded image bytes
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, card: &ShareableCard, options: &CaptureOptions) -> Result<Vec<u8>, ExportError>;
}

/// Built-in deterministic PNG renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct PngRasterizer;

#[async_trait]
impl Rasterizer for PngRasterizer {
    async fn rasterize(&self, card: &ShareableCard, options: &CaptureOptions) -> Result<Vec<u8>, ExportError> {
        render_card_png(card, options)
    }
}

/// Captures the card attached to a [`CardRef`]
pub struct ImageExporter<R> {
    rasterizer: R,
    options: CaptureOptions,
}

impl<R: Rasterizer> ImageExporter<R> {
    pub fn new(rasterizer: R, options: CaptureOptions) -> Self {
        Self { rasterizer, options }
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    /// Capture the attached card as PNG bytes
    ///
    /// A missing card fails with [`ExportError::TargetMissing`] before the
    /// rasterizer is touched.
    pub async fn generate_image(&self, target: &CardRef) -> Result<Vec<u8>, ExportError> {
        let card = target.get().ok_or(ExportError::TargetMissing)?;
        debug!(calculator = %card.kind, scale = self.options.scale, "Rasterizing result card");

        self.rasterizer.rasterize(card, &self.options).await.map_err(|e| {
            error!(error = %e, "Error generating shareable image");
            e
        })
    }
}

/// A place results can be shared to: a browser, a desktop, a test double
#[async_trait]
pub trait ShareSurface: Send + Sync {
    /// Whether a system share sheet exists
    fn supports_native_share(&self) -> bool;

    /// Whether the share sheet accepts image attachments
    fn can_share_files(&self) -> bool;

    async fn native_share(&self, data: &ShareData, image: Option<&[u8]>) -> Result<(), ShareError>;

    async fn open_url(&self, url: &str) -> Result<(), ShareError>;

    async fn write_clipboard(&self, text: &str) -> Result<(), ShareError>;

    async fn save_file(&self, file_name: &str, bytes: &[u8], message: Option<&str>) -> Result<(), ShareError>;
}

/// What a share request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    OpenedLink(String),
    Downloaded {
        file_name: String,
        message: Option<&'static str>,
    },
    /// The share failed and the image was downloaded instead
    FellBackToDownload {
        file_name: String,
        cause: ShareError,
    },
    /// The user dismissed the share sheet
    Aborted,
    /// Both the share and the fallback download failed
    GaveUp {
        cause: ShareError,
    },
}

/// Dispatches a share request to one surface
pub struct ShareService<R, S> {
    exporter: ImageExporter<R>,
    surface: S,
}

impl<R: Rasterizer, S: ShareSurface> ShareService<R, S> {
    pub fn new(exporter: ImageExporter<R>, surface: S) -> Self {
        Self { exporter, surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Share the attached card; never fails, the outcome says what happened
    pub async fn share(&self, target: &CardRef, data: &ShareData, platform: SharePlatform) -> ShareOutcome {
        match self.dispatch(target, data, platform).await {
            Ok(outcome) => outcome,
            Err(ShareError::Aborted) => {
                info!(%platform, "Share dismissed by user");
                ShareOutcome::Aborted
            }
            Err(cause) => {
                warn!(%platform, error = %cause, "Share failed, falling back to download");
                match self.download(target, data).await {
                    Ok(file_name) => ShareOutcome::FellBackToDownload { file_name, cause },
                    Err(download_error) => {
                        error!(error = %download_error, "Error downloading image");
                        ShareOutcome::GaveUp { cause: download_error }
                    }
                }
            }
        }
    }

    async fn dispatch(
        &self,
        target: &CardRef,
        data: &ShareData,
        platform: SharePlatform,
    ) -> Result<ShareOutcome, ShareError> {
        let image = self.exporter.generate_image(target).await?;

        match platform {
            SharePlatform::Native if self.surface.supports_native_share() => {
                let files = self.surface.can_share_files().then_some(image.as_slice());
                self.surface.native_share(data, files).await?;
                info!(with_image = files.is_some(), "Shared via system share sheet");
                Ok(ShareOutcome::Shared)
            }
            SharePlatform::Copy => {
                self.surface.write_clipboard(&data.clipboard_text()).await?;
                info!("Copied share link to clipboard");
                Ok(ShareOutcome::Copied)
            }
            _ => match platform.intent_url(data) {
                Some(url) => {
                    self.surface.open_url(&url).await?;
                    info!(%platform, "Opened share link");
                    Ok(ShareOutcome::OpenedLink(url))
                }
                None => {
                    let message = platform.download_message();
                    let file_name = self.save(data, &image, message).await?;
                    Ok(ShareOutcome::Downloaded { file_name, message })
                }
            },
        }
    }

    /// Fresh capture straight to a download
    async fn download(&self, target: &CardRef, data: &ShareData) -> Result<String, ShareError> {
        let image = self.exporter.generate_image(target).await?;
        self.save(data, &image, None).await
    }

    async fn save(&self, data: &ShareData, image: &[u8], message: Option<&str>) -> Result<String, ShareError> {
        let file_name = download_file_name(&data.title)?;
        self.surface.save_file(&file_name, image, message).await?;
        info!(file = %file_name, bytes = image.len(), "Saved result image");
        if let Some(message) = message {
            info!("{}", message);
        }
        Ok(file_name)
    }
}
