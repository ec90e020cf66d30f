//! Share payloads
//!
//! Every calculator projects its result into a [`CalculatorResult`]. Before
//! anything leaves the process the projection passes through
//! [`sanitize_for_sharing`], the only way to obtain a [`ShareableResult`].
//! Share links, platform intents and download names are built from there.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::errors::ShareError;

// ============================================================================
// Calculator kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    Bmi,
    Calories,
    Macros,
    #[serde(rename = "one-rm")]
    OneRepMax,
    HeartRate,
    IdealWeight,
    WaterIntake,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 7] = [
        CalculatorKind::Bmi,
        CalculatorKind::Calories,
        CalculatorKind::Macros,
        CalculatorKind::OneRepMax,
        CalculatorKind::HeartRate,
        CalculatorKind::IdealWeight,
        CalculatorKind::WaterIntake,
    ];

    /// URL path segment and `utm_content` value
    pub fn slug(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "bmi",
            CalculatorKind::Calories => "calories",
            CalculatorKind::Macros => "macros",
            CalculatorKind::OneRepMax => "one-rm",
            CalculatorKind::HeartRate => "heart-rate",
            CalculatorKind::IdealWeight => "ideal-weight",
            CalculatorKind::WaterIntake => "water-intake",
        }
    }

    /// Heading printed on result cards
    pub fn label(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "BMI",
            CalculatorKind::Calories => "Daily Calories",
            CalculatorKind::Macros => "Macros",
            CalculatorKind::OneRepMax => "One Rep Max",
            CalculatorKind::HeartRate => "Heart Rate",
            CalculatorKind::IdealWeight => "Ideal Weight",
            CalculatorKind::WaterIntake => "Water Intake",
        }
    }

    /// Brand colour for the calculator
    pub fn accent(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "#00F5A0",
            CalculatorKind::Calories => "#FF6B35",
            CalculatorKind::Macros => "#00D9FF",
            CalculatorKind::OneRepMax => "#F59E0B",
            CalculatorKind::HeartRate => "#EF4444",
            CalculatorKind::IdealWeight => "#8B5CF6",
            CalculatorKind::WaterIntake => "#00D9FF",
        }
    }

    /// Value that fills the card's progress bar
    pub fn max_value(&self) -> f64 {
        match self {
            CalculatorKind::Bmi => 40.0,
            CalculatorKind::Calories => 3000.0,
            CalculatorKind::Macros => 300.0,
            CalculatorKind::OneRepMax => 200.0,
            CalculatorKind::HeartRate => 200.0,
            CalculatorKind::IdealWeight => 100.0,
            CalculatorKind::WaterIntake => 4.0,
        }
    }

    /// Colour bands as (exclusive upper bound, colour), ascending
    pub fn bands(&self) -> &'static [(f64, &'static str)] {
        match self {
            CalculatorKind::Bmi => &[
                (18.5, "#3B82F6"),
                (25.0, "#00F5A0"),
                (30.0, "#F59E0B"),
                (f64::INFINITY, "#EF4444"),
            ],
            CalculatorKind::Calories => &[
                (1500.0, "#3B82F6"),
                (2500.0, "#00F5A0"),
                (f64::INFINITY, "#F59E0B"),
            ],
            CalculatorKind::Macros => &[
                (100.0, "#3B82F6"),
                (200.0, "#00F5A0"),
                (f64::INFINITY, "#F59E0B"),
            ],
            CalculatorKind::WaterIntake => &[
                (2.0, "#F59E0B"),
                (3.5, "#00F5A0"),
                (f64::INFINITY, "#3B82F6"),
            ],
            CalculatorKind::HeartRate => &[
                (100.0, "#3B82F6"),
                (160.0, "#00F5A0"),
                (f64::INFINITY, "#EF4444"),
            ],
            CalculatorKind::OneRepMax | CalculatorKind::IdealWeight => &[],
        }
    }

    /// Colour for a value; falls back to the accent outside every band
    pub fn value_color(&self, value: f64) -> &'static str {
        if value.is_nan() || value < 0.0 {
            return self.accent();
        }
        self.bands()
            .iter()
            .find(|(upper, _)| value < *upper)
            .map(|(_, color)| *color)
            .unwrap_or_else(|| self.accent())
    }

    /// Slug with its first character upper-cased, e.g. `Heart-rate`
    pub fn title_name(&self) -> String {
        let slug = self.slug();
        let mut chars = slug.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn default_share_text(&self, result: &ShareableResult) -> String {
        let field = |key: &str| result.display(key);
        match self {
            CalculatorKind::Bmi => format!(
                "My BMI is {} ({}). Calculate yours with NutriSculpt!",
                field("value"),
                field("category")
            ),
            CalculatorKind::Calories => format!(
                "My daily calorie target is {} calories. Find your perfect calorie goal!",
                field("value")
            ),
            CalculatorKind::Macros => format!(
                "Check out my macro breakdown: {}g protein, {}g carbs, {}g fat!",
                field("protein"),
                field("carbs"),
                field("fat")
            ),
            CalculatorKind::OneRepMax => format!(
                "My estimated 1RM is {}{}! Calculate your one-rep max!",
                field("value"),
                field("unit")
            ),
            CalculatorKind::HeartRate => {
                "Discovered my optimal heart rate zones! Find yours for better training!".to_string()
            }
            CalculatorKind::IdealWeight => format!(
                "Found my ideal weight range: {}{}. What's yours?",
                field("value"),
                field("unit")
            ),
            CalculatorKind::WaterIntake => format!(
                "I should drink {}{} of water daily. Calculate your hydration needs!",
                field("value"),
                field("unit")
            ),
        }
    }
}

impl std::fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for CalculatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculatorKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| format!("Unknown calculator: {}", s))
    }
}

// ============================================================================
// Results and sanitization
// ============================================================================

/// Fields stripped from every shared result
pub const COMMON_SENSITIVE_FIELDS: [&str; 9] = [
    "age",
    "weight",
    "height",
    "gender",
    "email",
    "name",
    "restingHeartRate",
    "maxHeartRate",
    "activityLevel",
];

/// A calculator's output as loose key/value pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    pub kind: CalculatorKind,
    pub fields: Map<String, Value>,
}

impl CalculatorResult {
    pub fn new(kind: CalculatorKind) -> Self {
        Self {
            kind,
            fields: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

/// A result that has been through [`sanitize_for_sharing`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareableResult {
    #[serde(skip)]
    kind: CalculatorKind,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ShareableResult {
    pub fn kind(&self) -> CalculatorKind {
        self.kind
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Numeric `value` field, accepting numbers or numeric strings
    pub fn numeric_value(&self) -> Option<f64> {
        match self.fields.get("value")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Field rendered for prose; empty when absent
    pub fn display(&self, key: &str) -> String {
        self.fields.get(key).map(display_value).unwrap_or_default()
    }
}

/// Render a JSON value the way it reads in share text: `2267`, not `2267.0`
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Remove the common sensitive fields and any caller-supplied ones
pub fn strip_sensitive_fields(fields: &mut Map<String, Value>, extra_excluded: &[&str]) {
    for key in extra_excluded.iter().chain(COMMON_SENSITIVE_FIELDS.iter()) {
        fields.remove(*key);
    }
}

/// The single gate between a computed result and any share surface
pub fn sanitize_for_sharing(result: CalculatorResult, extra_excluded: &[&str]) -> ShareableResult {
    let CalculatorResult { kind, mut fields } = result;
    strip_sensitive_fields(&mut fields, extra_excluded);
    ShareableResult { kind, fields }
}

// ============================================================================
// Share links
// ============================================================================

/// Where shared links point and whose name is on them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub brand: String,
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            brand: "NutriSculpt".to_string(),
            base_url: "https://nutrisculpt.vercel.app".to_string(),
        }
    }
}

/// `utm_medium` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtmMedium {
    Social,
    Image,
}

impl UtmMedium {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtmMedium::Social => "social",
            UtmMedium::Image => "image",
        }
    }
}

/// Calculator page URL tagged with UTM parameters
pub fn tracking_url(base_url: &str, kind: CalculatorKind, medium: UtmMedium) -> Result<Url, ShareError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| ShareError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .push(kind.slug());
    url.query_pairs_mut()
        .clear()
        .append_pair("utm_source", "share")
        .append_pair("utm_medium", medium.as_str())
        .append_pair("utm_campaign", "calculator_share")
        .append_pair("utm_content", kind.slug());
    Ok(url)
}

/// Plain-text payload handed to a share surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareData {
    /// Build the payload; a non-empty `custom_message` replaces the default text
    pub fn for_result(
        result: &ShareableResult,
        config: &ShareConfig,
        custom_message: Option<&str>,
    ) -> Result<Self, ShareError> {
        let kind = result.kind();
        let url = tracking_url(&config.base_url, kind, UtmMedium::Social)?;
        let text = match custom_message {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => kind.default_share_text(result),
        };

        Ok(Self {
            title: format!("{} {} Calculator Result", config.brand, kind.title_name()),
            text,
            url: url.to_string(),
        })
    }

    /// Text placed on the clipboard by the copy action
    pub fn clipboard_text(&self) -> String {
        format!("{} {}", self.text, self.url)
    }
}

/// File name for a downloaded card: whitespace runs become `_`, lower-cased
pub fn download_file_name(title: &str) -> Result<String, ShareError> {
    let whitespace = regex_lite::Regex::new(r"\s+").map_err(|e| ShareError::FileName(e.to_string()))?;
    let stem = whitespace.replace_all(title, "_").to_lowercase();
    Ok(format!("{}_result.png", stem))
}

// ============================================================================
// Platforms
// ============================================================================

/// Share targets offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    #[default]
    Native,
    Copy,
    Download,
    Pinterest,
    Facebook,
    WhatsApp,
    Instagram,
    Snapchat,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 8] = [
        SharePlatform::Native,
        SharePlatform::Copy,
        SharePlatform::Download,
        SharePlatform::Pinterest,
        SharePlatform::Facebook,
        SharePlatform::WhatsApp,
        SharePlatform::Instagram,
        SharePlatform::Snapchat,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SharePlatform::Native => "native",
            SharePlatform::Copy => "copy",
            SharePlatform::Download => "download",
            SharePlatform::Pinterest => "pinterest",
            SharePlatform::Facebook => "facebook",
            SharePlatform::WhatsApp => "whatsapp",
            SharePlatform::Instagram => "instagram",
            SharePlatform::Snapchat => "snapchat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SharePlatform::Native => "Share",
            SharePlatform::Copy => "Copy Link",
            SharePlatform::Download => "Download Image",
            SharePlatform::Pinterest => "Pinterest",
            SharePlatform::Facebook => "Facebook",
            SharePlatform::WhatsApp => "WhatsApp",
            SharePlatform::Instagram => "Instagram",
            SharePlatform::Snapchat => "Snapchat",
        }
    }

    /// Share-intent link for platforms that take one
    pub fn intent_url(&self, data: &ShareData) -> Option<String> {
        let text = urlencoding::encode(&data.text);
        let url = urlencoding::encode(&data.url);
        match self {
            SharePlatform::Pinterest => Some(format!(
                "https://pinterest.com/pin/create/button/?url={}&description={}",
                url, text
            )),
            SharePlatform::Facebook => Some(format!(
                "https://www.facebook.com/sharer/sharer.php?u={}&quote={}",
                url, text
            )),
            SharePlatform::WhatsApp => Some(format!("https://wa.me/?text={}%20{}", text, url)),
            _ => None,
        }
    }

    /// Instruction shown after saving for apps without a web share intent
    pub fn download_message(&self) -> Option<&'static str> {
        match self {
            SharePlatform::Instagram => Some(
                "Image saved! Open Instagram → New Post/Story → Select from Photos to share your result.",
            ),
            SharePlatform::Snapchat => Some(
                "Image saved! Open Snapchat → Camera → Upload from Gallery to share your result.",
            ),
            _ => None,
        }
    }
}

impl std::fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for SharePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        SharePlatform::ALL
            .into_iter()
            .find(|platform| platform.id() == lower)
            .ok_or_else(|| format!("Unknown share platform: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn bmi_result() -> ShareableResult {
        sanitize_for_sharing(
            CalculatorResult::new(CalculatorKind::Bmi)
                .with("value", 24.2)
                .with("category", "Normal")
                .with("weight", 70.0)
                .with("height", 170.0),
            &[],
        )
    }

    // ========================================================================
    // Sanitization
    // ========================================================================

    #[test]
    fn test_sanitize_strips_common_fields() {
        let mut result = CalculatorResult::new(CalculatorKind::HeartRate).with("zones", "Zone 2: 117-137 bpm");
        for key in COMMON_SENSITIVE_FIELDS {
            result = result.with(key, 1);
        }
        let shared = sanitize_for_sharing(result, &[]);
        assert_eq!(shared.fields().len(), 1);
        assert_eq!(shared.display("zones"), "Zone 2: 117-137 bpm");
    }

    #[test]
    fn test_sanitize_strips_extra_fields() {
        let result = CalculatorResult::new(CalculatorKind::WaterIntake)
            .with("value", 2.7)
            .with("climateCondition", "hot")
            .with("isPregnant", false);
        let shared = sanitize_for_sharing(result, &["climateCondition", "isPregnant"]);
        assert!(shared.get("climateCondition").is_none());
        assert!(shared.get("isPregnant").is_none());
        assert_eq!(shared.numeric_value(), Some(2.7));
    }

    #[test]
    fn test_shareable_serializes_only_fields() {
        let json = serde_json::to_value(bmi_result()).unwrap();
        assert_eq!(json, serde_json::json!({ "value": 24.2, "category": "Normal" }));
    }

    // ========================================================================
    // Share data
    // ========================================================================

    #[test]
    fn test_share_data_bmi() {
        let data = ShareData::for_result(&bmi_result(), &ShareConfig::default(), None).unwrap();
        assert_eq!(data.title, "NutriSculpt Bmi Calculator Result");
        assert_eq!(data.text, "My BMI is 24.2 (Normal). Calculate yours with NutriSculpt!");
        assert_eq!(
            data.url,
            "https://nutrisculpt.vercel.app/bmi?utm_source=share&utm_medium=social&utm_campaign=calculator_share&utm_content=bmi"
        );
        assert_eq!(data.clipboard_text(), format!("{} {}", data.text, data.url));
    }

    #[test]
    fn test_share_text_whole_numbers() {
        let result = sanitize_for_sharing(
            CalculatorResult::new(CalculatorKind::Calories).with("value", 2267.0),
            &[],
        );
        let data = ShareData::for_result(&result, &ShareConfig::default(), None).unwrap();
        assert_eq!(
            data.text,
            "My daily calorie target is 2267 calories. Find your perfect calorie goal!"
        );
    }

    #[test]
    fn test_custom_message_overrides() {
        let data = ShareData::for_result(&bmi_result(), &ShareConfig::default(), Some("Look at this")).unwrap();
        assert_eq!(data.text, "Look at this");

        let data = ShareData::for_result(&bmi_result(), &ShareConfig::default(), Some("")).unwrap();
        assert!(data.text.starts_with("My BMI is"));
    }

    #[test]
    fn test_tracking_url_image_medium_and_base_path() {
        let url = tracking_url("https://example.com/tools/", CalculatorKind::OneRepMax, UtmMedium::Image).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/tools/one-rm?utm_source=share&utm_medium=image&utm_campaign=calculator_share&utm_content=one-rm"
        );
        assert!(tracking_url("not a url", CalculatorKind::Bmi, UtmMedium::Social).is_err());
    }

    #[test]
    fn test_title_name() {
        assert_eq!(CalculatorKind::OneRepMax.title_name(), "One-rm");
        assert_eq!(CalculatorKind::WaterIntake.title_name(), "Water-intake");
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(
            download_file_name("NutriSculpt Bmi Calculator Result").unwrap(),
            "nutrisculpt_bmi_calculator_result_result.png"
        );
        assert_eq!(download_file_name("A  B\tC").unwrap(), "a_b_c_result.png");
        assert_eq!(download_file_name("Lift Log \n").unwrap(), "lift_log__result.png");
    }

    // ========================================================================
    // Platforms
    // ========================================================================

    #[test]
    fn test_intent_urls() {
        let data = ShareData {
            title: "T".to_string(),
            text: "My BMI".to_string(),
            url: "https://x.io/bmi?a=1".to_string(),
        };
        assert_eq!(
            SharePlatform::WhatsApp.intent_url(&data).unwrap(),
            "https://wa.me/?text=My%20BMI%20https%3A%2F%2Fx.io%2Fbmi%3Fa%3D1"
        );
        assert_eq!(
            SharePlatform::Facebook.intent_url(&data).unwrap(),
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fx.io%2Fbmi%3Fa%3D1&quote=My%20BMI"
        );
        assert!(SharePlatform::Pinterest
            .intent_url(&data)
            .unwrap()
            .starts_with("https://pinterest.com/pin/create/button/?url="));
        assert!(SharePlatform::Copy.intent_url(&data).is_none());
        assert!(SharePlatform::Instagram.download_message().is_some());
    }

    #[rstest]
    #[case(CalculatorKind::Bmi, 18.4, "#3B82F6")]
    #[case(CalculatorKind::Bmi, 22.0, "#00F5A0")]
    #[case(CalculatorKind::Bmi, 31.0, "#EF4444")]
    #[case(CalculatorKind::Calories, 2600.0, "#F59E0B")]
    #[case(CalculatorKind::WaterIntake, 2.7, "#00F5A0")]
    #[case(CalculatorKind::HeartRate, 90.0, "#3B82F6")]
    #[case(CalculatorKind::IdealWeight, 65.0, "#8B5CF6")]
    fn test_value_color(#[case] kind: CalculatorKind, #[case] value: f64, #[case] expected: &str) {
        assert_eq!(kind.value_color(value), expected);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("one-rm".parse::<CalculatorKind>().unwrap(), CalculatorKind::OneRepMax);
        assert_eq!("WhatsApp".parse::<SharePlatform>().unwrap(), SharePlatform::WhatsApp);
        assert!("myspace".parse::<SharePlatform>().is_err());
        assert_eq!(
            serde_json::to_string(&CalculatorKind::OneRepMax).unwrap(),
            "\"one-rm\""
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: no sensitive or excluded key survives sanitization
        #[test]
        fn prop_sanitize_removes_excluded(
            keys in proptest::collection::vec("[a-zA-Z]{1,12}", 0..10),
            excluded in proptest::collection::vec("[a-zA-Z]{1,12}", 0..4),
        ) {
            let mut result = CalculatorResult::new(CalculatorKind::Macros);
            for key in keys.iter().chain(excluded.iter()) {
                result = result.with(key, 1);
            }
            for key in COMMON_SENSITIVE_FIELDS {
                result = result.with(key, 1);
            }
            let extra: Vec<&str> = excluded.iter().map(String::as_str).collect();
            let shared = sanitize_for_sharing(result, &extra);

            for key in excluded.iter() {
                prop_assert!(shared.get(key).is_none());
            }
            for key in COMMON_SENSITIVE_FIELDS {
                prop_assert!(shared.get(key).is_none());
            }
        }
    }
}
