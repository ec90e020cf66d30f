//! Input validation functions
//!
//! Range checks for values typed by a user. The formula modules accept any
//! number and return sentinels; these checks run at the edges (CLI, bindings)
//! before a formula is called.

use validator::Validate;

use crate::errors::InputError;

fn require_finite(value: f64, what: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", what));
    }
    Ok(())
}

/// Validate body weight (kg), 20-500
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    require_finite(weight_kg, "Weight")?;
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate a lifted load (kg), 1-1100
pub fn validate_lift_weight(weight_kg: f64) -> Result<(), String> {
    require_finite(weight_kg, "Weight lifted")?;
    if weight_kg < 1.0 {
        return Err("Weight lifted must be at least 1 kg".to_string());
    }
    if weight_kg > 1100.0 {
        return Err("Weight lifted must be at most 1100 kg".to_string());
    }
    Ok(())
}

/// Validate height (cm), 50-300
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    require_finite(height_cm, "Height")?;
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate age in years, 1-120
pub fn validate_age(age_years: u32) -> Result<(), String> {
    if age_years < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age_years > 120 {
        return Err("Age cannot exceed 120 years".to_string());
    }
    Ok(())
}

/// Validate repetitions for a 1RM estimate, 1-36
pub fn validate_reps(reps: u32) -> Result<(), String> {
    if reps < 1 {
        return Err("Reps must be at least 1".to_string());
    }
    if reps > 36 {
        return Err("Reps must be at most 36".to_string());
    }
    Ok(())
}

/// Validate heart rate (bpm), 20-300
pub fn validate_heart_rate(bpm: f64) -> Result<(), String> {
    require_finite(bpm, "Heart rate")?;
    if bpm < 20.0 {
        return Err("Heart rate too low".to_string());
    }
    if bpm > 300.0 {
        return Err("Heart rate too high".to_string());
    }
    Ok(())
}

/// Validate calorie value, 0-50000
pub fn validate_calories(calories: f64) -> Result<(), String> {
    require_finite(calories, "Calories")?;
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > 50000.0 {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: f64) -> Result<(), String> {
    require_finite(value, "Percentage")?;
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

/// Validate a `#rgb` / `#rrggbb` colour
pub fn validate_hex_color(color: &str) -> Result<(), String> {
    let pattern = regex_lite::Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").map_err(|e| e.to_string())?;
    if !pattern.is_match(color) {
        return Err(format!("Invalid colour '{}', expected #rrggbb", color));
    }
    Ok(())
}

// ============================================================================
// Field labels
// ============================================================================

/// Map field names to display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" | "weight_kg" => "Weight",
        "lift_weight" => "Weight Lifted",
        "height" | "height_cm" => "Height",
        "age" | "age_years" => "Age",
        "reps" => "Reps",
        "resting_hr" => "Resting Heart Rate",
        "max_hr" => "Max Heart Rate",
        "calories" => "Daily Calories",
        "protein" => "Protein",
        "carbs" => "Carbs",
        "fat" => "Fat",
        "background" => "Background Colour",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

impl From<ValidationError> for InputError {
    fn from(err: ValidationError) -> Self {
        InputError::Validation(err.user_message())
    }
}

/// Run a check and tag its failure with the field name
pub fn check_field(field: &str, result: Result<(), String>) -> Result<(), InputError> {
    result.map_err(|message| ValidationError::new(field, &message).into())
}

// ============================================================================
// Derived validators
// ============================================================================

/// Custom macro split as typed by the user
#[derive(Debug, Clone, Copy, Validate)]
pub struct MacroPercentages {
    #[validate(range(min = 0.0, max = 100.0))]
    pub protein: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub carbs: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub fat: f64,
}

impl MacroPercentages {
    /// Range-check every field; NaN is rejected as well
    pub fn checked(self) -> Result<Self, InputError> {
        check_field("protein", require_finite(self.protein, "Protein"))?;
        check_field("carbs", require_finite(self.carbs, "Carbs"))?;
        check_field("fat", require_finite(self.fat, "Fat"))?;
        self.validate()?;
        Ok(self)
    }
}

/// Resting and optional max heart rate typed by the user
#[derive(Debug, Clone, Copy, Validate)]
pub struct HeartRateReadings {
    #[validate(range(min = 20.0, max = 300.0))]
    pub resting_hr: f64,
    #[validate(range(min = 20.0, max = 300.0))]
    pub max_hr: Option<f64>,
}

impl HeartRateReadings {
    pub fn checked(self) -> Result<Self, InputError> {
        check_field("resting_hr", require_finite(self.resting_hr, "Resting heart rate"))?;
        if let Some(max_hr) = self.max_hr {
            check_field("max_hr", require_finite(max_hr, "Max heart rate"))?;
            if max_hr <= self.resting_hr {
                return Err(ValidationError::new("max_hr", "must be above resting heart rate").into());
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// [`checked`](Self::checked), and without a typed max the age-based
    /// prediction must still sit above the resting rate
    pub fn checked_against(self, predicted_max_hr: f64) -> Result<Self, InputError> {
        let readings = self.checked()?;
        if readings.max_hr.is_none() && predicted_max_hr <= readings.resting_hr {
            let message = format!("must be below the predicted max heart rate of {} bpm", predicted_max_hr);
            return Err(ValidationError::new("resting_hr", &message).into());
        }
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(20.0).is_ok());
        assert!(validate_weight(500.0).is_ok());
        assert!(validate_weight(10.0).is_err());
        assert!(validate_weight(600.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_lift_weight() {
        assert!(validate_lift_weight(2.5).is_ok());
        assert!(validate_lift_weight(1100.0).is_ok());
        assert!(validate_lift_weight(0.5).is_err());
        assert!(validate_lift_weight(1200.0).is_err());
    }

    #[test]
    fn test_validate_height_cm() {
        assert!(validate_height_cm(170.0).is_ok());
        assert!(validate_height_cm(50.0).is_ok());
        assert!(validate_height_cm(300.0).is_ok());
        assert!(validate_height_cm(49.9).is_err());
        assert!(validate_height_cm(300.1).is_err());
        assert!(validate_height_cm(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_age_and_reps() {
        assert!(validate_age(25).is_ok());
        assert!(validate_age(0).is_err());
        assert!(validate_age(121).is_err());
        assert!(validate_reps(1).is_ok());
        assert!(validate_reps(36).is_ok());
        assert!(validate_reps(0).is_err());
        assert!(validate_reps(37).is_err());
    }

    #[test]
    fn test_validate_calories_and_percentage() {
        assert!(validate_calories(0.0).is_ok());
        assert!(validate_calories(-1.0).is_err());
        assert!(validate_calories(100000.0).is_err());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(101.0).is_err());
        assert!(validate_percentage(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_heart_rate() {
        assert!(validate_heart_rate(60.0).is_ok());
        assert!(validate_heart_rate(10.0).is_err());
        assert!(validate_heart_rate(350.0).is_err());
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("#ffffff").is_ok());
        assert!(validate_hex_color("#0F172A").is_ok());
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("white").is_err());
        assert!(validate_hex_color("#ffff").is_err());
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::new("height_cm", "must be at least 50 cm");
        assert_eq!(err.display_label, "Height");
        assert_eq!(err.user_message(), "Height: must be at least 50 cm");

        let input: InputError = check_field("reps", validate_reps(0)).unwrap_err();
        assert_eq!(input.to_string(), "Validation error: Reps: Reps must be at least 1");
    }

    #[test]
    fn test_macro_percentages() {
        let ok = MacroPercentages { protein: 30.0, carbs: 40.0, fat: 30.0 };
        assert!(ok.checked().is_ok());

        let over = MacroPercentages { protein: 130.0, carbs: 40.0, fat: 30.0 };
        assert!(matches!(over.checked(), Err(InputError::Fields(_))));

        let nan = MacroPercentages { protein: f64::NAN, carbs: 40.0, fat: 30.0 };
        assert!(matches!(nan.checked(), Err(InputError::Validation(_))));
    }

    #[test]
    fn test_heart_rate_readings() {
        assert!(HeartRateReadings { resting_hr: 60.0, max_hr: Some(190.0) }.checked().is_ok());
        assert!(HeartRateReadings { resting_hr: 60.0, max_hr: None }.checked().is_ok());
        assert!(HeartRateReadings { resting_hr: 10.0, max_hr: None }.checked().is_err());
        assert!(HeartRateReadings { resting_hr: 80.0, max_hr: Some(70.0) }.checked().is_err());
    }

    #[test]
    fn test_heart_rate_readings_against_prediction() {
        let resting = HeartRateReadings { resting_hr: 125.0, max_hr: None };
        assert!(resting.checked_against(190.0).is_ok());
        assert!(matches!(resting.checked_against(120.0), Err(InputError::Validation(_))));
        assert!(resting.checked_against(125.0).is_err());

        // A typed max replaces the prediction
        let typed = HeartRateReadings { resting_hr: 125.0, max_hr: Some(170.0) };
        assert!(typed.checked_against(120.0).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_weight_range(weight in 20.0f64..=500.0) {
            prop_assert!(validate_weight(weight).is_ok());
        }

        #[test]
        fn prop_invalid_height_below(height in 0.0f64..49.9) {
            prop_assert!(validate_height_cm(height).is_err());
        }
    }
}
