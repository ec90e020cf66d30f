//! NutriSculpt shared library
//!
//! Calculator formulas, unit conversions and the result sharing pipeline,
//! used by the CLI and the WASM bindings.

pub mod card;
pub mod errors;
pub mod export;
pub mod health_metrics;
pub mod heart_rate;
pub mod hydration;
pub mod macros;
pub mod one_rep_max;
pub mod preferences;
pub mod share;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use units::*;

pub use card::{render_card_png, AspectRatio, CaptureOptions, ShareableCard, Theme};
pub use export::{CardRef, ImageExporter, PngRasterizer, Rasterizer, ShareOutcome, ShareService, ShareSurface};
pub use heart_rate::{calculate_heart_rate, HeartRateInput, HeartRateResult, MaxHeartRateMethod, TrainingGoal};
pub use hydration::{
    calculate_water_intake, BottleCount, Climate, DrinkSlot, DrinkTime, HealthCondition, HydrationActivity, HydrationInput,
    HydrationResult,
};
pub use macros::{calculate_macros, CalorieSource, MacroBreakdown, MacroPreset, MacroSplit, MealPortion};
pub use one_rep_max::{calculate_one_rep_max, Exercise, OneRepMaxFormula, OneRepMaxResult};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceSession, PreferenceStore, Preferences};
pub use share::{
    sanitize_for_sharing, CalculatorKind, CalculatorResult, ShareConfig, ShareData, SharePlatform, ShareableResult,
};
