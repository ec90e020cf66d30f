//! Health metrics calculations module
//!
//! BMI, BMR/TDEE, daily calorie targets and ideal body weight.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Published Formulas**: Mifflin-St Jeor, Robinson, Miller, Devine, Hamwi
//! 3. **Sentinels, not Errors**: Division by zero yields 0 or "—"
//! 4. **Round Last**: Intermediate values stay unrounded; only reported
//!    results are rounded

use serde::{Deserialize, Serialize};

use crate::share::{CalculatorKind, CalculatorResult};
use crate::units::{self, round_to, UnitSystem};

/// Placeholder shown when a result cannot be computed
pub const EMPTY_DISPLAY: &str = "—";

// ============================================================================
// User Profile Types
// ============================================================================

/// Biological sex for physiological formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    #[default]
    Male,
    Female,
}

impl std::str::FromStr for BiologicalSex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(BiologicalSex::Male),
            "female" | "f" => Ok(BiologicalSex::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtremelyActive => "Extremely Active",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little to no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtremelyActive => "Very hard exercise, physical job",
        }
    }

    /// Look up the tier whose multiplier matches exactly
    pub fn from_multiplier(multiplier: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.multiplier() == multiplier)
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderate" | "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very" | "very_active" => Ok(ActivityLevel::VeryActive),
            "extreme" | "extremely_active" => Ok(ActivityLevel::ExtremelyActive),
            other => other
                .parse::<f64>()
                .ok()
                .and_then(ActivityLevel::from_multiplier)
                .ok_or_else(|| format!("Unknown activity level: {}", s)),
        }
    }
}

/// Body data the energy formulas need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Age in years
    pub age_years: u32,
    pub sex: BiologicalSex,
    pub activity_level: ActivityLevel,
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the BMI range for this category (lower bound inclusive)
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²; 0 when height is not positive
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    if height_m > 0.0 {
        weight_kg / (height_m * height_m)
    } else {
        0.0
    }
}

/// Classify BMI into category; `None` for a non-finite or non-positive BMI
pub fn classify_bmi(bmi: f64) -> Option<BmiCategory> {
    if !bmi.is_finite() || bmi <= 0.0 {
        None
    } else if bmi < 18.5 {
        Some(BmiCategory::Underweight)
    } else if bmi < 25.0 {
        Some(BmiCategory::Normal)
    } else if bmi < 30.0 {
        Some(BmiCategory::Overweight)
    } else {
        Some(BmiCategory::Obese)
    }
}

/// Display label for a BMI value ("—" when unclassifiable)
pub fn bmi_label(bmi: f64) -> &'static str {
    classify_bmi(bmi).map_or(EMPTY_DISPLAY, |category| category.label())
}

/// Healthy weight range (BMI 18.5-24.9) in kg for a height
pub fn healthy_weight_range_kg(height_cm: f64) -> Option<(f64, f64)> {
    let height_m = height_cm / 100.0;
    if height_m <= 0.0 {
        return None;
    }
    let height_m_sq = height_m * height_m;
    Some((18.5 * height_m_sq, 24.9 * height_m_sq))
}

/// Healthy weight range formatted for display
pub fn format_healthy_range(height_cm: f64, system: UnitSystem) -> String {
    match healthy_weight_range_kg(height_cm) {
        None => EMPTY_DISPLAY.to_string(),
        Some((min, max)) => match system {
            UnitSystem::Metric => format!("{}kg - {}kg", round_to(min, 1), round_to(max, 1)),
            UnitSystem::Imperial => {
                format!("{}lb - {}lb", units::kg_to_lb(min), units::kg_to_lb(max))
            }
        },
    }
}

/// BMI calculation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResult {
    /// Unrounded BMI value
    pub value: f64,
    pub category: Option<BmiCategory>,
    /// Healthy weight range, formatted in the requested unit system
    pub healthy_range: String,
}

impl BmiResult {
    /// Projection handed to the share path; `None` when there is nothing to share
    pub fn to_calculator_result(&self) -> Option<CalculatorResult> {
        let category = self.category?;
        Some(
            CalculatorResult::new(CalculatorKind::Bmi)
                .with("value", round_to(self.value, 1))
                .with("category", category.label())
                .with("healthyRange", self.healthy_range.as_str()),
        )
    }
}

/// Calculate complete BMI result
pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64, system: UnitSystem) -> BmiResult {
    let value = calculate_bmi(weight_kg, height_cm);
    BmiResult {
        value,
        category: classify_bmi(value),
        healthy_range: format_healthy_range(height_cm, system),
    }
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: BiologicalSex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    }
}

/// Total Daily Energy Expenditure: BMR × activity multiplier
pub fn calculate_tdee(bmr: f64, activity_multiplier: f64) -> f64 {
    bmr * activity_multiplier
}

/// Daily calorie adjustment for a weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CalorieGoal {
    LoseWeight,
    MildWeightLoss,
    #[default]
    Maintain,
    MildWeightGain,
    GainWeight,
}

impl CalorieGoal {
    /// kcal/day added to TDEE
    pub fn adjustment(&self) -> f64 {
        match self {
            CalorieGoal::LoseWeight => -500.0,
            CalorieGoal::MildWeightLoss => -250.0,
            CalorieGoal::Maintain => 0.0,
            CalorieGoal::MildWeightGain => 250.0,
            CalorieGoal::GainWeight => 500.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CalorieGoal::LoseWeight => "Lose Weight",
            CalorieGoal::MildWeightLoss => "Mild Weight Loss",
            CalorieGoal::Maintain => "Maintain Weight",
            CalorieGoal::MildWeightGain => "Mild Weight Gain",
            CalorieGoal::GainWeight => "Gain Weight",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CalorieGoal::LoseWeight => "1 lb/week loss",
            CalorieGoal::MildWeightLoss => "0.5 lb/week loss",
            CalorieGoal::Maintain => "Current weight",
            CalorieGoal::MildWeightGain => "0.5 lb/week gain",
            CalorieGoal::GainWeight => "1 lb/week gain",
        }
    }
}

impl std::str::FromStr for CalorieGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "lose" | "lose_weight" => Ok(CalorieGoal::LoseWeight),
            "mild_loss" | "mild_weight_loss" => Ok(CalorieGoal::MildWeightLoss),
            "maintain" | "maintain_weight" => Ok(CalorieGoal::Maintain),
            "mild_gain" | "mild_weight_gain" => Ok(CalorieGoal::MildWeightGain),
            "gain" | "gain_weight" => Ok(CalorieGoal::GainWeight),
            _ => Err(format!("Unknown calorie goal: {}", s)),
        }
    }
}

/// Daily calorie result, whole kcal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieResult {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub goal: CalorieGoal,
}

impl CalorieResult {
    pub fn to_calculator_result(&self) -> Option<CalculatorResult> {
        if self.target_calories.is_nan() || self.target_calories <= 0.0 {
            return None;
        }
        Some(
            CalculatorResult::new(CalculatorKind::Calories)
                .with("value", self.target_calories)
                .with("unit", "calories/day")
                .with("goal", self.goal.label())
                .with("bmr", self.bmr)
                .with("tdee", self.tdee),
        )
    }
}

/// BMR, TDEE and goal-adjusted target, each rounded only once at the end
pub fn calculate_calories(profile: &HealthProfile, goal: CalorieGoal) -> CalorieResult {
    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex);
    let tdee = calculate_tdee(bmr, profile.activity_level.multiplier());
    let target = tdee + goal.adjustment();

    CalorieResult {
        bmr: round_to(bmr, 0),
        tdee: round_to(tdee, 0),
        target_calories: round_to(target, 0),
        goal,
    }
}

// ============================================================================
// Averaging helper
// ============================================================================

/// Arithmetic mean of the finite, positive values; `None` if there are none
pub(crate) fn mean_of_positive(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// A weight reported in both unit families, one decimal each
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    pub kg: f64,
    pub lb: f64,
}

impl WeightPair {
    pub fn from_kg(kg: f64) -> Self {
        Self {
            kg: round_to(kg, 1),
            lb: units::kg_to_lb(kg),
        }
    }

    /// Value in the given unit system
    pub fn in_system(&self, system: UnitSystem) -> f64 {
        match system {
            UnitSystem::Metric => self.kg,
            UnitSystem::Imperial => self.lb,
        }
    }
}

// ============================================================================
// Ideal Weight Calculations
// ============================================================================

/// Minimum height (cm) the ideal weight formulas are evaluated for
pub const IDEAL_WEIGHT_MIN_HEIGHT_CM: f64 = 100.0;

/// Body frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FrameSize {
    pub fn multiplier(&self) -> f64 {
        match self {
            FrameSize::Small => 0.9,
            FrameSize::Medium => 1.0,
            FrameSize::Large => 1.1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FrameSize::Small => "Small Frame",
            FrameSize::Medium => "Medium Frame",
            FrameSize::Large => "Large Frame",
        }
    }
}

impl std::str::FromStr for FrameSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(FrameSize::Small),
            "medium" => Ok(FrameSize::Medium),
            "large" => Ok(FrameSize::Large),
            _ => Err(format!("Unknown frame size: {}", s)),
        }
    }
}

/// Named ideal body weight formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdealWeightFormula {
    Robinson,
    Miller,
    Devine,
    Hamwi,
    /// BMI 22 at the given height
    BmiMethod,
}

impl IdealWeightFormula {
    pub const ALL: [IdealWeightFormula; 5] = [
        IdealWeightFormula::Robinson,
        IdealWeightFormula::Miller,
        IdealWeightFormula::Devine,
        IdealWeightFormula::Hamwi,
        IdealWeightFormula::BmiMethod,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IdealWeightFormula::Robinson => "Robinson",
            IdealWeightFormula::Miller => "Miller",
            IdealWeightFormula::Devine => "Devine",
            IdealWeightFormula::Hamwi => "Hamwi",
            IdealWeightFormula::BmiMethod => "BMI Method",
        }
    }

    /// Whether the frame-size multiplier applies
    pub fn frame_adjusted(&self) -> bool {
        !matches!(self, IdealWeightFormula::BmiMethod)
    }

    /// Unadjusted estimate in kg
    pub fn estimate_kg(&self, height_cm: f64, sex: BiologicalSex) -> f64 {
        let over_60 = units::cm_to_inches(height_cm) - 60.0;
        let (base, per_inch) = match (self, sex) {
            (IdealWeightFormula::Robinson, BiologicalSex::Male) => (52.0, 1.9),
            (IdealWeightFormula::Robinson, BiologicalSex::Female) => (49.0, 1.7),
            (IdealWeightFormula::Miller, BiologicalSex::Male) => (56.2, 1.41),
            (IdealWeightFormula::Miller, BiologicalSex::Female) => (53.1, 1.36),
            (IdealWeightFormula::Devine, BiologicalSex::Male) => (50.0, 2.3),
            (IdealWeightFormula::Devine, BiologicalSex::Female) => (45.5, 2.3),
            (IdealWeightFormula::Hamwi, BiologicalSex::Male) => (48.0, 2.7),
            (IdealWeightFormula::Hamwi, BiologicalSex::Female) => (45.5, 2.2),
            (IdealWeightFormula::BmiMethod, _) => {
                let height_m = height_cm / 100.0;
                return 22.0 * height_m * height_m;
            }
        };
        base + per_inch * over_60
    }
}

/// One formula's frame-adjusted estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealWeightEstimate {
    pub formula: IdealWeightFormula,
    pub weight: WeightPair,
}

/// Ideal weight across all formulas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub estimates: Vec<IdealWeightEstimate>,
    pub average: Option<WeightPair>,
    pub frame: FrameSize,
    /// Healthy range (BMI 18.5-24.9) as (min, max)
    pub healthy_range: Option<(WeightPair, WeightPair)>,
}

impl IdealWeightResult {
    pub fn to_calculator_result(&self, system: UnitSystem) -> Option<CalculatorResult> {
        let average = self.average?;
        let (min, max) = self.healthy_range?;
        let (unit, range) = match system {
            UnitSystem::Metric => ("kg", format!("{}-{} kg", min.kg, max.kg)),
            UnitSystem::Imperial => ("lbs", format!("{}-{} lbs", min.lb, max.lb)),
        };
        Some(
            CalculatorResult::new(CalculatorKind::IdealWeight)
                .with("value", average.in_system(system))
                .with("unit", unit)
                .with("frameType", self.frame.label())
                .with("healthyRange", range),
        )
    }
}

/// Calculate ideal body weight with every formula
///
/// Returns an empty result (no estimates, no average) for heights under 100 cm.
pub fn calculate_ideal_weight(height_cm: f64, sex: BiologicalSex, frame: FrameSize) -> IdealWeightResult {
    let healthy_range = healthy_weight_range_kg(height_cm)
        .map(|(min, max)| (WeightPair::from_kg(min), WeightPair::from_kg(max)));

    if !(height_cm >= IDEAL_WEIGHT_MIN_HEIGHT_CM) {
        return IdealWeightResult {
            estimates: Vec::new(),
            average: None,
            frame,
            healthy_range,
        };
    }

    let raw: Vec<(IdealWeightFormula, f64)> = IdealWeightFormula::ALL
        .into_iter()
        .map(|formula| {
            let kg = formula.estimate_kg(height_cm, sex);
            let adjusted = if formula.frame_adjusted() {
                kg * frame.multiplier()
            } else {
                kg
            };
            (formula, adjusted)
        })
        .collect();

    let average = mean_of_positive(raw.iter().map(|(_, kg)| *kg)).map(WeightPair::from_kg);

    IdealWeightResult {
        estimates: raw
            .into_iter()
            .map(|(formula, kg)| IdealWeightEstimate {
                formula,
                weight: WeightPair::from_kg(kg),
            })
            .collect(),
        average,
        frame,
        healthy_range,
    }
}
