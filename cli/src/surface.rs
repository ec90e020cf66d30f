//! Terminal share surface
//!
//! A terminal has no share sheet and no browser. Downloads land in the
//! configured output directory; links and clipboard text are collected as
//! notices for the caller to print.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use nutrisculpt_shared::{share::ShareData, ShareError, ShareSurface};
use tracing::debug;

pub struct TerminalSurface {
    output_dir: PathBuf,
    notices: Mutex<Vec<String>>,
}

impl TerminalSurface {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Drain the notices collected so far
    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn notify(&self, notice: String) {
        self.lock().push(notice);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ShareSurface for TerminalSurface {
    fn supports_native_share(&self) -> bool {
        false
    }

    fn can_share_files(&self) -> bool {
        false
    }

    async fn native_share(&self, _data: &ShareData, _image: Option<&[u8]>) -> Result<(), ShareError> {
        Err(ShareError::Surface("no system share sheet in a terminal".to_string()))
    }

    async fn open_url(&self, url: &str) -> Result<(), ShareError> {
        self.notify(format!("Open this link to share: {}", url));
        Ok(())
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), ShareError> {
        self.notify(format!("Copy this to share: {}", text));
        Ok(())
    }

    async fn save_file(&self, file_name: &str, bytes: &[u8], message: Option<&str>) -> Result<(), ShareError> {
        let path = self.output_dir.join(file_name);
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ShareError::Surface(format!("{}: {}", self.output_dir.display(), e)))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ShareError::Surface(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Wrote card image");

        self.notify(format!("Saved {}", path.display()));
        if let Some(message) = message {
            self.notify(message.to_string());
        }
        Ok(())
    }
}
