//! Macronutrient breakdown
//!
//! Splits a daily calorie target into protein, carbohydrate and fat using a
//! percentage preset. Protein and carbs carry 4 kcal/g, fat 9 kcal/g.

use serde::{Deserialize, Serialize};

use crate::health_metrics::{calculate_bmr, calculate_tdee, HealthProfile};
use crate::share::{CalculatorKind, CalculatorResult};
use crate::units::round_to;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Meals the day is split evenly across
pub const MEALS_PER_DAY: f64 = 3.0;

/// Percentage split of daily calories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroSplit {
    /// Sum of the three percentages; callers warn when it is not 100
    pub fn total_percentage(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }
}

/// Named macro distributions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MacroPreset {
    #[default]
    Balanced,
    HighProtein,
    LowCarb,
    Keto,
    HighCarb,
    Custom(MacroSplit),
}

impl MacroPreset {
    pub fn split(&self) -> MacroSplit {
        let (protein, carbs, fat) = match self {
            MacroPreset::Balanced => (25.0, 45.0, 30.0),
            MacroPreset::HighProtein => (35.0, 35.0, 30.0),
            MacroPreset::LowCarb => (30.0, 20.0, 50.0),
            MacroPreset::Keto => (25.0, 5.0, 70.0),
            MacroPreset::HighCarb => (20.0, 60.0, 20.0),
            MacroPreset::Custom(split) => return *split,
        };
        MacroSplit { protein, carbs, fat }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MacroPreset::Balanced => "Balanced",
            MacroPreset::HighProtein => "High Protein",
            MacroPreset::LowCarb => "Low Carb",
            MacroPreset::Keto => "Keto",
            MacroPreset::HighCarb => "High Carb",
            MacroPreset::Custom(_) => "Custom",
        }
    }
}

impl std::str::FromStr for MacroPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "balanced" => Ok(MacroPreset::Balanced),
            "high_protein" => Ok(MacroPreset::HighProtein),
            "low_carb" => Ok(MacroPreset::LowCarb),
            "keto" => Ok(MacroPreset::Keto),
            "high_carb" => Ok(MacroPreset::HighCarb),
            _ => Err(format!("Unknown macro preset: {}", s)),
        }
    }
}

/// Where the calorie total comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CalorieSource {
    /// TDEE from body stats
    Calculated(HealthProfile),
    /// Entered directly
    Manual(f64),
}

impl CalorieSource {
    /// Whole-kcal total for the breakdown
    pub fn total_calories(&self) -> f64 {
        match self {
            CalorieSource::Calculated(profile) => {
                let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex);
                round_to(calculate_tdee(bmr, profile.activity_level.multiplier()), 0)
            }
            CalorieSource::Manual(calories) => *calories,
        }
    }
}

/// One macro's share of the day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroAmount {
    pub percentage: f64,
    pub calories: f64,
    pub grams: f64,
}

impl MacroAmount {
    fn from_percentage(total_calories: f64, percentage: f64, kcal_per_gram: f64) -> Self {
        let calories = total_calories * (percentage / 100.0);
        Self {
            percentage,
            calories: round_to(calories, 0),
            grams: round_to(calories / kcal_per_gram, 0),
        }
    }
}

/// One meal's even share, whole kcal and grams
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MealPortion {
    pub calories: f64,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub total_calories: f64,
    pub preset: MacroPreset,
    pub protein: MacroAmount,
    pub carbs: MacroAmount,
    pub fat: MacroAmount,
    pub per_meal: MealPortion,
}

impl MacroBreakdown {
    pub fn total_percentage(&self) -> f64 {
        self.preset.split().total_percentage()
    }

    pub fn to_calculator_result(&self) -> Option<CalculatorResult> {
        if self.total_calories.is_nan() || self.total_calories <= 0.0 {
            return None;
        }
        Some(
            CalculatorResult::new(CalculatorKind::Macros)
                .with("value", self.total_calories)
                .with("unit", "kcal")
                .with("preset", self.preset.name())
                .with("protein", self.protein.grams)
                .with("carbs", self.carbs.grams)
                .with("fat", self.fat.grams),
        )
    }
}

/// Calculate the macro breakdown for a calorie source and preset
pub fn calculate_macros(source: &CalorieSource, preset: MacroPreset) -> MacroBreakdown {
    let total = source.total_calories();
    let split = preset.split();

    let protein = MacroAmount::from_percentage(total, split.protein, KCAL_PER_GRAM_PROTEIN);
    let carbs = MacroAmount::from_percentage(total, split.carbs, KCAL_PER_GRAM_CARBS);
    let fat = MacroAmount::from_percentage(total, split.fat, KCAL_PER_GRAM_FAT);
    let per_meal = MealPortion {
        calories: round_to(total / MEALS_PER_DAY, 0),
        protein_grams: round_to(protein.grams / MEALS_PER_DAY, 0),
        carbs_grams: round_to(carbs.grams / MEALS_PER_DAY, 0),
        fat_grams: round_to(fat.grams / MEALS_PER_DAY, 0),
    };

    MacroBreakdown {
        total_calories: total,
        preset,
        protein,
        carbs,
        fat,
        per_meal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_metrics::{ActivityLevel, BiologicalSex};

    #[test]
    fn test_balanced_2000() {
        let result = calculate_macros(&CalorieSource::Manual(2000.0), MacroPreset::Balanced);
        assert_eq!(result.protein.calories, 500.0);
        assert_eq!(result.protein.grams, 125.0);
        assert_eq!(result.carbs.calories, 900.0);
        assert_eq!(result.carbs.grams, 225.0);
        assert_eq!(result.fat.calories, 600.0);
        assert_eq!(result.fat.grams, 67.0);
    }

    #[test]
    fn test_keto_split() {
        let result = calculate_macros(&CalorieSource::Manual(1800.0), MacroPreset::Keto);
        assert_eq!(result.carbs.grams, 23.0);
        assert_eq!(result.fat.grams, 140.0);
        assert_eq!(result.total_percentage(), 100.0);
    }

    #[test]
    fn test_per_meal_split() {
        let result = calculate_macros(&CalorieSource::Manual(1800.0), MacroPreset::Balanced);
        assert_eq!(
            result.per_meal,
            MealPortion {
                calories: 600.0,
                protein_grams: 38.0,
                carbs_grams: 68.0,
                fat_grams: 20.0,
            }
        );

        let empty = calculate_macros(&CalorieSource::Manual(0.0), MacroPreset::Balanced);
        assert_eq!(empty.per_meal, MealPortion::default());
    }

    #[test]
    fn test_calculated_source_uses_tdee() {
        let profile = HealthProfile {
            height_cm: 170.0,
            weight_kg: 70.0,
            age_years: 25,
            sex: BiologicalSex::Male,
            activity_level: ActivityLevel::LightlyActive,
        };
        let result = calculate_macros(&CalorieSource::Calculated(profile), MacroPreset::HighProtein);
        assert_eq!(result.total_calories, 2258.0);
    }

    #[test]
    fn test_custom_split_reports_total() {
        let split = MacroSplit { protein: 40.0, carbs: 40.0, fat: 30.0 };
        let result = calculate_macros(&CalorieSource::Manual(2000.0), MacroPreset::Custom(split));
        assert_eq!(result.total_percentage(), 110.0);
        assert_eq!(result.preset.name(), "Custom");
    }

    #[test]
    fn test_share_projection_has_grams() {
        let result = calculate_macros(&CalorieSource::Manual(2000.0), MacroPreset::Balanced);
        let shared = result.to_calculator_result().unwrap();
        assert_eq!(shared.fields["protein"], 125.0);
        assert_eq!(shared.fields["fat"], 67.0);

        let empty = calculate_macros(&CalorieSource::Manual(0.0), MacroPreset::Balanced);
        assert!(empty.to_calculator_result().is_none());
    }
}
