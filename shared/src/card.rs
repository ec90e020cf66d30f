//! Shareable result cards
//!
//! A card is a fixed-size picture of one result: themed gradient, accent
//! header, the headline value, its category, a progress bar against the
//! calculator's scale and a branded footer. Drawing goes through plotters'
//! bitmap backend with an embedded DejaVu Sans face, so the same card
//! always encodes to the same PNG bytes.

use std::io::Cursor;

use image::{imageops, DynamicImage, ImageFormat, RgbImage, Rgba, RgbaImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackend;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ExportError;
use crate::share::{display_value, tracking_url, CalculatorKind, ShareConfig, ShareableResult, UtmMedium};

/// Largest supported resolution multiplier
pub const MAX_SCALE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    #[default]
    Square,
    Portrait,
}

impl AspectRatio {
    /// Logical (width, height) in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (600, 600),
            AspectRatio::Portrait => (600, 750),
        }
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "square" => Ok(AspectRatio::Square),
            "portrait" => Ok(AspectRatio::Portrait),
            _ => Err(format!("Unknown aspect ratio: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

struct Palette {
    gradient_from: RGBColor,
    gradient_to: RGBColor,
    text: RGBColor,
    text_secondary: RGBColor,
}

impl Theme {
    fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                gradient_from: RGBColor(0x0F, 0x17, 0x2A),
                gradient_to: RGBColor(0x33, 0x41, 0x55),
                text: RGBColor(0xFF, 0xFF, 0xFF),
                text_secondary: RGBColor(0x94, 0xA3, 0xB8),
            },
            Theme::Light => Palette {
                gradient_from: RGBColor(0xF8, 0xFA, 0xFC),
                gradient_to: RGBColor(0xCB, 0xD5, 0xE1),
                text: RGBColor(0x1E, 0x29, 0x3B),
                text_secondary: RGBColor(0x64, 0x74, 0x8B),
            },
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Rasterization options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Resolution multiplier
    pub scale: u32,
    /// Canvas fill behind the card, `#rrggbb`
    pub background: String,
    /// Logical canvas size; defaults to the card's own size
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2,
            background: "#ffffff".to_string(),
            width: None,
            height: None,
        }
    }
}

/// Everything drawn on a result card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareableCard {
    pub kind: CalculatorKind,
    pub value: String,
    pub unit: String,
    pub category: Option<String>,
    pub subtitle: Option<String>,
    pub aspect_ratio: AspectRatio,
    pub theme: Theme,
    /// Link printed in the footer, tagged `utm_medium=image`
    pub footer_url: String,
}

impl ShareableCard {
    /// Card for a sanitized result
    pub fn from_result(
        result: &ShareableResult,
        config: &ShareConfig,
        aspect_ratio: AspectRatio,
        theme: Theme,
    ) -> Result<Self, ExportError> {
        let kind = result.kind();
        let footer_url = tracking_url(&config.base_url, kind, UtmMedium::Image)
            .map_err(|e| ExportError::Rasterization(e.to_string()))?;

        // Heart-rate results have no headline number; the zone list goes
        // underneath instead.
        let value = match result.get("value") {
            Some(value) => display_value(value),
            None => result.display("goal"),
        };
        let category = ["category", "frameType", "exercise", "preset"]
            .into_iter()
            .find_map(|key| result.get(key).map(display_value));
        let subtitle = ["healthyRange", "zones", "alternativeUnits"]
            .into_iter()
            .find_map(|key| result.get(key).map(display_value));

        Ok(Self {
            kind,
            value,
            unit: result.display("unit"),
            category,
            subtitle,
            aspect_ratio,
            theme,
            footer_url: footer_url.to_string(),
        })
    }

    pub fn numeric_value(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    /// Progress bar fill in 0..=1
    pub fn progress(&self) -> f64 {
        match self.numeric_value() {
            Some(v) if v > 0.0 => (v / self.kind.max_value()).min(1.0),
            _ => 0.0,
        }
    }

    pub fn value_color(&self) -> &'static str {
        match self.numeric_value() {
            Some(v) => self.kind.value_color(v),
            None => self.kind.accent(),
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

const MARGIN: i32 = 32;

/// Family name the embedded faces are registered under
const FONT_FAMILY: &str = "sans-serif";

/// Largest scaled canvas side
pub const MAX_CANVAS_SIDE: u32 = 8192;

#[cfg(not(target_arch = "wasm32"))]
static FONT_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
#[cfg(not(target_arch = "wasm32"))]
static FONT_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Register the embedded faces with plotters once per process.
///
/// In the browser plotters measures and draws text through the page's own
/// fonts, so there is nothing to register there.
fn register_fonts() -> Result<(), ExportError> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::sync::OnceLock;

        static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();
        REGISTERED
            .get_or_init(|| {
                plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, FONT_REGULAR)
                    .map_err(|_| "embedded regular font: InvalidFont".to_string())?;
                plotters::style::register_font(FONT_FAMILY, FontStyle::Bold, FONT_BOLD)
                    .map_err(|_| "embedded bold font: InvalidFont".to_string())
            })
            .clone()
            .map_err(ExportError::Rasterization)?;
    }
    Ok(())
}

fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 0xFF])
}

/// Parse `#rrggbb` or `#rgb`
pub fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Some(rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

fn hex_color(hex: &str) -> Option<RGBColor> {
    parse_hex_color(hex).map(|Rgba([r, g, b, _])| RGBColor(r, g, b))
}

fn lerp(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> ExportError {
    ExportError::Rasterization(e.to_string())
}

fn text_style(size: f64, weight: FontStyle, color: &RGBColor) -> TextStyle<'static> {
    (FONT_FAMILY, size).into_font().style(weight).color(color)
}

/// Draw `text` centred at `y`, shrinking from `max_size` until it fits
/// between the margins. Returns the drawn height.
fn draw_centered<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    y: i32,
    max_size: f64,
    weight: FontStyle,
    color: &RGBColor,
) -> Result<i32, ExportError> {
    let (width, _) = area.dim_in_pixel();
    let room = width.saturating_sub(2 * MARGIN as u32);
    let mut size = max_size;
    let mut style = text_style(size, weight, color);
    let mut extent = area.estimate_text_size(text, &style).map_err(draw_err)?;
    while extent.0 > room && size > 10.0 {
        size -= 2.0;
        style = text_style(size, weight, color);
        extent = area.estimate_text_size(text, &style).map_err(draw_err)?;
    }

    let centred = style.pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(text.to_string(), (width as i32 / 2, y), centred))
        .map_err(draw_err)?;
    Ok(extent.1 as i32)
}

/// Draw the card at logical size into the top-left of `area`
fn draw_card<DB: DrawingBackend>(card: &ShareableCard, area: &DrawingArea<DB, Shift>) -> Result<(), ExportError> {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let palette = card.theme.palette();
    let accent = hex_color(card.kind.accent()).unwrap_or(palette.text);
    let value_color = hex_color(card.value_color()).unwrap_or(accent);

    // Top-to-bottom gradient
    for y in 0..h {
        let color = lerp(palette.gradient_from, palette.gradient_to, y as f64 / h as f64);
        area.draw(&Rectangle::new([(0, y), (w, y + 1)], color.filled()))
            .map_err(draw_err)?;
    }

    // Header
    area.draw(&Rectangle::new([(0, 0), (w, 8)], accent.filled()))
        .map_err(draw_err)?;
    area.draw(&Text::new(
        "NutriSculpt",
        (MARGIN, 28),
        text_style(30.0, FontStyle::Bold, &palette.text),
    ))
    .map_err(draw_err)?;
    area.draw(&Text::new(
        card.kind.label(),
        (MARGIN, 68),
        text_style(20.0, FontStyle::Normal, &palette.text_secondary),
    ))
    .map_err(draw_err)?;

    // Headline
    let headline = if card.unit.is_empty() {
        card.value.clone()
    } else {
        format!("{} {}", card.value, card.unit)
    };
    let mut y = h * 2 / 7;
    y += draw_centered(area, &headline, y, 84.0, FontStyle::Bold, &value_color)? + 24;

    if let Some(category) = &card.category {
        y += draw_centered(area, category, y, 36.0, FontStyle::Bold, &value_color)? + 20;
    }
    if let Some(subtitle) = &card.subtitle {
        draw_centered(area, subtitle, y, 22.0, FontStyle::Normal, &palette.text_secondary)?;
    }

    // Progress bar with range legend
    let bar_w = w - 2 * MARGIN;
    let bar_y = h - 150;
    area.draw(&Rectangle::new(
        [(MARGIN, bar_y), (MARGIN + bar_w, bar_y + 16)],
        palette.text_secondary.mix(0.3).filled(),
    ))
    .map_err(draw_err)?;
    let filled = (bar_w as f64 * card.progress()).round() as i32;
    if filled > 0 {
        area.draw(&Rectangle::new(
            [(MARGIN, bar_y), (MARGIN + filled, bar_y + 16)],
            value_color.filled(),
        ))
        .map_err(draw_err)?;
    }

    let max_value = card.kind.max_value();
    let mut lower = 0.0;
    for (upper, color) in card.kind.bands() {
        let upper = upper.min(max_value);
        let start = (lower / max_value * bar_w as f64).round() as i32;
        let end = (upper / max_value * bar_w as f64).round() as i32;
        if let Some(color) = hex_color(color) {
            area.draw(&Rectangle::new(
                [(MARGIN + start, bar_y + 24), (MARGIN + end, bar_y + 30)],
                color.filled(),
            ))
            .map_err(draw_err)?;
        }
        lower = upper;
    }

    // Footer
    area.draw(&Rectangle::new(
        [(0, h - 80), (w, h)],
        palette.gradient_from.mix(0.5).filled(),
    ))
    .map_err(draw_err)?;
    area.draw(&Text::new(
        footer_display(&card.footer_url),
        (MARGIN, h - 50),
        text_style(18.0, FontStyle::Normal, &palette.text_secondary),
    ))
    .map_err(draw_err)?;

    Ok(())
}

/// `host/path` of the footer link; the tracking query stays in the card data
fn footer_display(footer_url: &str) -> String {
    match Url::parse(footer_url) {
        Ok(url) => format!(
            "{}{}",
            url.host_str().unwrap_or_default(),
            url.path().trim_end_matches('/')
        ),
        Err(_) => footer_url.to_string(),
    }
}

fn scaled(side: u32, scale: u32) -> Result<u32, ExportError> {
    side.checked_mul(scale)
        .filter(|&px| px <= MAX_CANVAS_SIDE)
        .ok_or_else(|| {
            ExportError::Rasterization(format!(
                "canvas side {} at scale {} exceeds {} pixels",
                side, scale, MAX_CANVAS_SIDE
            ))
        })
}

/// Rasterize a card into an RGBA image at `options.scale`
pub fn render_card(card: &ShareableCard, options: &CaptureOptions) -> Result<RgbaImage, ExportError> {
    if options.scale == 0 || options.scale > MAX_SCALE {
        return Err(ExportError::Rasterization(format!(
            "scale must be between 1 and {}, got {}",
            MAX_SCALE, options.scale
        )));
    }
    let background = hex_color(&options.background).ok_or_else(|| {
        ExportError::Rasterization(format!("invalid background color: {}", options.background))
    })?;

    let (card_w, card_h) = card.aspect_ratio.dimensions();
    let width = options.width.unwrap_or(card_w);
    let height = options.height.unwrap_or(card_h);
    if width == 0 || height == 0 {
        return Err(ExportError::Rasterization("canvas has zero size".to_string()));
    }
    let scaled_w = scaled(width, options.scale)?;
    let scaled_h = scaled(height, options.scale)?;

    register_fonts()?;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&background).map_err(draw_err)?;
        let card_area = root
            .clone()
            .shrink((0, 0), (card_w.min(width), card_h.min(height)));
        draw_card(card, &card_area)?;
        root.present().map_err(draw_err)?;
    }

    let logical = RgbImage::from_raw(width, height, buffer)
        .map(|img| DynamicImage::ImageRgb8(img).into_rgba8())
        .ok_or_else(|| ExportError::Rasterization("pixel buffer does not match canvas size".to_string()))?;
    if options.scale == 1 {
        return Ok(logical);
    }
    Ok(imageops::resize(&logical, scaled_w, scaled_h, imageops::FilterType::Nearest))
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    Ok(bytes)
}

/// Render and encode in one step
pub fn render_card_png(card: &ShareableCard, options: &CaptureOptions) -> Result<Vec<u8>, ExportError> {
    encode_png(&render_card(card, options)?)
}
