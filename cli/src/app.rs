//! Ties a parsed command line to preferences, calculators and the share
//! pipeline. Everything the user should see comes back as a string.

use anyhow::{Context, Result};
use nutrisculpt_shared::{
    sanitize_for_sharing, AspectRatio, CardRef, FilePreferenceStore, ImageExporter, PngRasterizer, PreferenceSession,
    PreferenceStore, Preferences, ShareData, ShareOutcome, ShareService, ShareableCard,
};
use tracing::{debug, info};

use crate::commands::{run_calculator, Cli, Command, PrefsAction};
use crate::config::AppConfig;
use crate::surface::TerminalSurface;

/// Run one invocation and return its stdout text
pub async fn run(cli: Cli, config: &AppConfig) -> Result<String> {
    let store = FilePreferenceStore::new(config.preferences.resolved_path());
    debug!(path = %store.path().display(), "Using preference file");
    let mut session = PreferenceSession::open(store);

    if let Command::Prefs { action } = &cli.command {
        return preferences(&mut session, action, &cli);
    }

    let prefs = session.current();
    let units = cli.units.unwrap_or(prefs.unit_system);
    let report = run_calculator(&cli.command, units)?;

    let summary = report.summary();
    let shareable = report.result.map(|result| sanitize_for_sharing(result, &[]));

    let mut output = Vec::new();
    if cli.json {
        let result = shareable.as_ref().context("Nothing to share for this input")?;
        output.push(serde_json::to_string_pretty(result)?);
    } else {
        output.push(summary);
    }

    if let Some(platform) = cli.share {
        let result = shareable.as_ref().context("Nothing to share for this input")?;
        let aspect_ratio = if cli.portrait {
            AspectRatio::Portrait
        } else {
            config.export.aspect_ratio
        };
        let theme = cli.theme.unwrap_or(prefs.theme);
        let card = ShareableCard::from_result(result, &config.share, aspect_ratio, theme)?;
        let data = ShareData::for_result(result, &config.share, cli.message.as_deref())?;

        info!(calculator = %result.kind(), %platform, "Sharing result");
        let service = ShareService::new(
            ImageExporter::new(PngRasterizer, config.export.capture_options()),
            TerminalSurface::new(&config.export.output_dir),
        );
        let outcome = service.share(&CardRef::attached(card), &data, platform).await;
        output.extend(service.surface().take_notices());
        output.push(describe_outcome(&outcome));
    }

    Ok(output.join("\n"))
}

fn preferences<S: PreferenceStore>(
    session: &mut PreferenceSession<S>,
    action: &PrefsAction,
    cli: &Cli,
) -> Result<String> {
    match action {
        PrefsAction::Show => {}
        PrefsAction::Set => {
            let current = session.current();
            session.update(Preferences {
                unit_system: cli.units.unwrap_or(current.unit_system),
                theme: cli.theme.unwrap_or(current.theme),
            })?;
        }
        PrefsAction::ToggleTheme => {
            session.toggle_theme()?;
        }
    }
    let prefs = session.current();
    Ok(format!("units: {}\ntheme: {}", prefs.unit_system, prefs.theme))
}

/// One-line summary of what a share did
pub fn describe_outcome(outcome: &ShareOutcome) -> String {
    match outcome {
        ShareOutcome::Shared => "Shared.".to_string(),
        ShareOutcome::Copied => "Link ready to paste.".to_string(),
        ShareOutcome::OpenedLink(_) => "Share link ready.".to_string(),
        ShareOutcome::Downloaded { file_name, .. } => format!("Downloaded {}", file_name),
        ShareOutcome::FellBackToDownload { file_name, cause } => {
            format!("Share failed ({}), downloaded {} instead", cause, file_name)
        }
        ShareOutcome::Aborted => "Share cancelled.".to_string(),
        ShareOutcome::GaveUp { cause } => format!("Could not share or save the image: {}", cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use nutrisculpt_shared::ShareError;
    use std::path::Path;

    fn config(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.export.output_dir = dir.join("out");
        config.export.scale = 1;
        config.preferences.path = Some(dir.join("prefs.json"));
        config
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nutrisculpt").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn test_summary_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(cli(&["bmi", "--weight", "70", "--height", "170"]), &config(dir.path()))
            .await
            .unwrap();
        assert!(out.starts_with("BMI: 24.2 (Normal)"));
    }

    #[tokio::test]
    async fn test_json_output_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(
            cli(&["water", "--weight", "70", "--age", "25", "--json"]),
            &config(dir.path()),
        )
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["value"], 2.7);
        assert_eq!(json["unit"], "L/day");
        assert!(json.get("weight").is_none());
        assert!(json.get("age").is_none());
    }

    #[tokio::test]
    async fn test_download_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(
            cli(&["bmi", "--weight", "70", "--height", "170", "--share", "download"]),
            &config(dir.path()),
        )
        .await
        .unwrap();

        let path = dir.path().join("out").join("nutrisculpt_bmi_calculator_result_result.png");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        assert!(out.ends_with("Downloaded nutrisculpt_bmi_calculator_result_result.png"));
    }

    #[tokio::test]
    async fn test_link_platforms_print_intent() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(
            cli(&["one-rm", "--weight", "100", "--reps", "5", "--share", "whatsapp"]),
            &config(dir.path()),
        )
        .await
        .unwrap();
        assert!(out.contains("Open this link to share: https://wa.me/?text="));
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_native_falls_through_to_download() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(
            cli(&["water", "--weight", "70", "--age", "25", "--share", "native", "--portrait"]),
            &config(dir.path()),
        )
        .await
        .unwrap();
        assert!(out.ends_with("Downloaded nutrisculpt_water-intake_calculator_result_result.png"));
    }

    #[tokio::test]
    async fn test_prefs_set_and_show() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let out = run(cli(&["prefs", "show"]), &config).await.unwrap();
        assert_eq!(out, "units: metric\ntheme: dark");

        run(cli(&["--units", "imperial", "prefs", "set"]), &config).await.unwrap();
        let out = run(cli(&["prefs", "toggle-theme"]), &config).await.unwrap();
        assert_eq!(out, "units: imperial\ntheme: light");

        let out = run(cli(&["bmi", "--weight", "154.3", "--height", "66.93"]), &config)
            .await
            .unwrap();
        assert!(out.contains("lb"));
    }

    #[test]
    fn test_describe_outcome() {
        assert_eq!(describe_outcome(&ShareOutcome::Aborted), "Share cancelled.");
        let gave_up = ShareOutcome::GaveUp {
            cause: ShareError::Surface("disk full".to_string()),
        };
        assert_eq!(
            describe_outcome(&gave_up),
            "Could not share or save the image: Share surface error: disk full"
        );
    }
}
