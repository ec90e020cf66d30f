//! NutriSculpt WASM Module
//!
//! Browser bindings for the calculator formulas and the share-card
//! renderer, so the site computes and draws exactly what the CLI does.

use nutrisculpt_shared as shared;
use serde_json::{Map, Value};
use shared::{
    card::{AspectRatio, CaptureOptions, ShareableCard, Theme},
    share::{sanitize_for_sharing, strip_sensitive_fields, CalculatorKind, CalculatorResult, ShareConfig, ShareData},
    BiologicalSex, FrameSize,
};
use wasm_bindgen::prelude::*;

fn sex(is_male: bool) -> BiologicalSex {
    if is_male {
        BiologicalSex::Male
    } else {
        BiologicalSex::Female
    }
}

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    shared::calculate_bmi(weight_kg, height_cm)
}

/// BMI category label, "—" when the BMI is not usable
#[wasm_bindgen]
pub fn classify_bmi(bmi: f64) -> String {
    shared::bmi_label(bmi).to_string()
}

/// Mifflin-St Jeor BMR
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, is_male: bool) -> f64 {
    shared::calculate_bmr(weight_kg, height_cm, age_years, sex(is_male))
}

#[wasm_bindgen]
pub fn calculate_tdee(bmr: f64, activity_multiplier: f64) -> f64 {
    shared::calculate_tdee(bmr, activity_multiplier)
}

/// Mean of the seven 1RM formulas, 0 for unusable input
#[wasm_bindgen]
pub fn one_rep_max_average(weight: f64, reps: u32) -> f64 {
    shared::one_rep_max::one_rep_max_average(weight, reps)
}

/// Average ideal weight in kg (one decimal), 0 below 100 cm
#[wasm_bindgen]
pub fn ideal_weight_average(height_cm: f64, is_male: bool, frame: &str) -> f64 {
    let frame = frame.parse().unwrap_or(FrameSize::Medium);
    shared::calculate_ideal_weight(height_cm, sex(is_male), frame)
        .average
        .map(|w| w.kg)
        .unwrap_or(0.0)
}

/// Predicted max heart rate; unknown methods use 220 - age
#[wasm_bindgen]
pub fn max_heart_rate(age_years: f64, is_male: bool, method: &str) -> f64 {
    let method = method.parse().unwrap_or_default();
    shared::heart_rate::max_heart_rate(age_years, sex(is_male), method)
}

/// Daily water target in liters (one decimal)
#[wasm_bindgen]
pub fn daily_water_liters(weight_kg: f64, age_years: u32, is_male: bool, activity: &str, climate: &str) -> f64 {
    let input = shared::HydrationInput {
        weight_kg,
        age_years,
        sex: sex(is_male),
        activity: activity.parse().unwrap_or_default(),
        climate: climate.parse().unwrap_or_default(),
        ..Default::default()
    };
    shared::calculate_water_intake(&input).daily.liters
}

#[wasm_bindgen]
pub fn kg_to_lb(kg: f64) -> f64 {
    shared::kg_to_lb(kg)
}

#[wasm_bindgen]
pub fn lb_to_kg(lb: f64) -> f64 {
    shared::lb_to_kg(lb)
}

/// Strip sensitive fields from a JSON object; `extra_excluded` is comma-separated
#[wasm_bindgen]
pub fn sanitize_result_json(result_json: &str, extra_excluded: &str) -> Result<String, JsValue> {
    sanitize_json(result_json, extra_excluded).map_err(|e| JsValue::from_str(&e))
}

/// `{ title, text, url }` for a calculator result
#[wasm_bindgen]
pub fn share_data_json(
    calculator: &str,
    result_json: &str,
    base_url: &str,
    custom_message: &str,
) -> Result<String, JsValue> {
    build_share_data(calculator, result_json, base_url, custom_message).map_err(|e| JsValue::from_str(&e))
}

/// PNG bytes of the result card
#[wasm_bindgen]
pub fn render_share_card_png(
    calculator: &str,
    result_json: &str,
    theme: &str,
    portrait: bool,
    scale: u32,
) -> Result<Vec<u8>, JsValue> {
    render_card(calculator, result_json, theme, portrait, scale).map_err(|e| JsValue::from_str(&e))
}

// ============================================================================
// Plain-Rust implementations (testable off wasm32)
// ============================================================================

fn parse_object(json: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(json).map_err(|e| e.to_string())? {
        Value::Object(map) => Ok(map),
        _ => Err("Expected a JSON object".to_string()),
    }
}

fn split_list(list: &str) -> Vec<&str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn sanitize_json(result_json: &str, extra_excluded: &str) -> Result<String, String> {
    let mut fields = parse_object(result_json)?;
    strip_sensitive_fields(&mut fields, &split_list(extra_excluded));
    serde_json::to_string(&fields).map_err(|e| e.to_string())
}

fn shareable(calculator: &str, result_json: &str) -> Result<shared::ShareableResult, String> {
    let kind: CalculatorKind = calculator.parse()?;
    let result = CalculatorResult {
        kind,
        fields: parse_object(result_json)?,
    };
    Ok(sanitize_for_sharing(result, &[]))
}

fn share_config(base_url: &str) -> ShareConfig {
    let mut config = ShareConfig::default();
    if !base_url.is_empty() {
        config.base_url = base_url.to_string();
    }
    config
}

fn build_share_data(calculator: &str, result_json: &str, base_url: &str, custom_message: &str) -> Result<String, String> {
    let result = shareable(calculator, result_json)?;
    let data = ShareData::for_result(&result, &share_config(base_url), Some(custom_message)).map_err(|e| e.to_string())?;
    serde_json::to_string(&data).map_err(|e| e.to_string())
}

fn render_card(calculator: &str, result_json: &str, theme: &str, portrait: bool, scale: u32) -> Result<Vec<u8>, String> {
    let result = shareable(calculator, result_json)?;
    let theme: Theme = theme.parse().unwrap_or_default();
    let aspect_ratio = if portrait {
        AspectRatio::Portrait
    } else {
        AspectRatio::Square
    };
    let card = ShareableCard::from_result(&result, &ShareConfig::default(), aspect_ratio, theme)
        .map_err(|e| e.to_string())?;
    let options = CaptureOptions {
        scale,
        ..CaptureOptions::default()
    };
    shared::render_card_png(&card, &options).map_err(|e| e.to_string())
}
