//! Common test utilities for integration tests
//!
//! Each [`TestApp`] gets its own temp directory for downloads and the
//! preference file, so tests never touch the user's config.

use clap::Parser;
use nutrisculpt_cli::{app, commands::Cli, config::AppConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test application wrapper
pub struct TestApp {
    pub config: AppConfig,
    dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.export.output_dir = dir.path().join("downloads");
        config.export.scale = 1;
        config.preferences.path = Some(dir.path().join("preferences.json"));
        Self { config, dir }
    }

    /// Run `nutrisculpt <args>` and return stdout
    pub async fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("nutrisculpt").chain(args.iter().copied()))?;
        app::run(cli, &self.config).await
    }

    pub fn download(&self, file_name: &str) -> PathBuf {
        self.dir.path().join("downloads").join(file_name)
    }
}
