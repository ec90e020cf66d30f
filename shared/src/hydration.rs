//! Daily water intake
//!
//! Base need is 35 mL per kg of body weight, scaled for age band and sex,
//! then shifted by fixed additive terms for activity, climate, pregnancy,
//! breastfeeding and health conditions. The result never drops below 1.5 L.

use serde::{Deserialize, Serialize};

use crate::health_metrics::BiologicalSex;
use crate::share::{CalculatorKind, CalculatorResult};
use crate::units::{self, round_to};

/// Minimum recommended daily intake in liters
pub const MIN_DAILY_LITERS: f64 = 1.5;

/// Waking hours the daily target is spread over
pub const WAKING_HOURS: f64 = 16.0;

const ML_PER_KG: f64 = 35.0;

const HALF_LITER_BOTTLE_L: f64 = 0.5;
const US_BOTTLE_OZ: f64 = 16.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HydrationActivity {
    #[default]
    Sedentary,
    Light,
    Moderate,
    High,
    VeryHigh,
}

impl HydrationActivity {
    /// Extra liters per day
    pub fn adjustment(&self) -> f64 {
        match self {
            HydrationActivity::Sedentary => 0.0,
            HydrationActivity::Light => 0.35,
            HydrationActivity::Moderate => 0.7,
            HydrationActivity::High => 1.0,
            HydrationActivity::VeryHigh => 1.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HydrationActivity::Sedentary => "Sedentary",
            HydrationActivity::Light => "Light Activity",
            HydrationActivity::Moderate => "Moderate Activity",
            HydrationActivity::High => "High Activity",
            HydrationActivity::VeryHigh => "Very High Activity",
        }
    }
}

impl std::str::FromStr for HydrationActivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Ok(HydrationActivity::Sedentary),
            "light" => Ok(HydrationActivity::Light),
            "moderate" => Ok(HydrationActivity::Moderate),
            "high" => Ok(HydrationActivity::High),
            "very_high" => Ok(HydrationActivity::VeryHigh),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    #[default]
    Temperate,
    Hot,
    VeryHot,
    Cold,
}

impl Climate {
    pub fn adjustment(&self) -> f64 {
        match self {
            Climate::Temperate => 0.0,
            Climate::Hot => 0.5,
            Climate::VeryHot => 1.0,
            Climate::Cold => 0.2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Climate::Temperate => "Temperate",
            Climate::Hot => "Hot Climate",
            Climate::VeryHot => "Very Hot/Humid",
            Climate::Cold => "Cold Climate",
        }
    }
}

impl std::str::FromStr for Climate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "temperate" => Ok(Climate::Temperate),
            "hot" => Ok(Climate::Hot),
            "very_hot" | "humid" => Ok(Climate::VeryHot),
            "cold" => Ok(Climate::Cold),
            _ => Err(format!("Unknown climate: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthCondition {
    Fever,
    Vomiting,
    BladderInfection,
    HeartDisease,
    KidneyDisease,
}

impl HealthCondition {
    pub fn adjustment(&self) -> f64 {
        match self {
            HealthCondition::Fever => 0.5,
            HealthCondition::Vomiting => 0.7,
            HealthCondition::BladderInfection => 0.3,
            HealthCondition::HeartDisease => -0.2,
            HealthCondition::KidneyDisease => -0.3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthCondition::Fever => "Fever",
            HealthCondition::Vomiting => "Vomiting/Diarrhea",
            HealthCondition::BladderInfection => "Bladder Infection",
            HealthCondition::HeartDisease => "Heart Disease",
            HealthCondition::KidneyDisease => "Kidney Disease",
        }
    }
}

impl std::str::FromStr for HealthCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "fever" => Ok(HealthCondition::Fever),
            "vomiting" | "diarrhea" => Ok(HealthCondition::Vomiting),
            "bladderinfection" => Ok(HealthCondition::BladderInfection),
            "heartdisease" => Ok(HealthCondition::HeartDisease),
            "kidneydisease" => Ok(HealthCondition::KidneyDisease),
            _ => Err(format!("Unknown health condition: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HydrationInput {
    pub weight_kg: f64,
    pub age_years: u32,
    pub sex: BiologicalSex,
    pub activity: HydrationActivity,
    pub climate: Climate,
    pub pregnant: bool,
    pub breastfeeding: bool,
    pub conditions: Vec<HealthCondition>,
}

/// Daily target in every display unit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterIntake {
    pub liters: f64,
    pub ml: f64,
    pub oz: f64,
    pub cups: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlyIntake {
    pub ml: f64,
    pub oz: f64,
}

/// Part of the waking day a share of the target is drunk in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrinkTime {
    #[default]
    WakeUp,
    Morning,
    Afternoon,
    Evening,
}

impl DrinkTime {
    pub const ALL: [DrinkTime; 4] = [DrinkTime::WakeUp, DrinkTime::Morning, DrinkTime::Afternoon, DrinkTime::Evening];

    /// Percent of the daily target; the four shares sum to 100
    pub fn share(&self) -> f64 {
        match self {
            DrinkTime::WakeUp => 15.0,
            DrinkTime::Morning => 25.0,
            DrinkTime::Afternoon => 35.0,
            DrinkTime::Evening => 25.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DrinkTime::WakeUp => "Wake Up",
            DrinkTime::Morning => "Morning",
            DrinkTime::Afternoon => "Afternoon",
            DrinkTime::Evening => "Evening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrinkSlot {
    pub time: DrinkTime,
    pub percentage: f64,
    pub ml: f64,
}

/// Daily target in common bottle sizes, 1 dp
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BottleCount {
    pub half_liter: f64,
    pub us_16_9_oz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HydrationResult {
    pub daily: WaterIntake,
    pub hourly: HourlyIntake,
    pub schedule: [DrinkSlot; 4],
    pub bottles: BottleCount,
}

impl HydrationResult {
    pub fn to_calculator_result(&self) -> Option<CalculatorResult> {
        if !(self.daily.liters > 0.0) {
            return None;
        }
        Some(
            CalculatorResult::new(CalculatorKind::WaterIntake)
                .with("value", self.daily.liters)
                .with("unit", "L/day")
                .with(
                    "alternativeUnits",
                    format!(
                        "{}ml | {}oz | {} cups",
                        self.daily.ml, self.daily.oz, self.daily.cups
                    ),
                )
                .with("hourlyGoal", format!("{}ml/hour", self.hourly.ml)),
        )
    }
}

/// Unrounded daily need in liters; 0 for a non-positive weight
pub fn daily_water_liters(input: &HydrationInput) -> f64 {
    if !(input.weight_kg > 0.0) {
        return 0.0;
    }

    let mut liters = input.weight_kg * ML_PER_KG / 1000.0;

    if input.age_years >= 65 {
        liters *= 0.9;
    } else if input.age_years < 18 {
        liters *= 1.1;
    }

    if input.sex == BiologicalSex::Male {
        liters *= 1.1;
    }

    liters += input.activity.adjustment();
    liters += input.climate.adjustment();

    if input.pregnant {
        liters += 0.3;
    }
    if input.breastfeeding {
        liters += 0.7;
    }

    liters += input.conditions.iter().map(HealthCondition::adjustment).sum::<f64>();

    liters.max(MIN_DAILY_LITERS)
}

pub fn calculate_water_intake(input: &HydrationInput) -> HydrationResult {
    let liters = daily_water_liters(input);
    if liters == 0.0 {
        return HydrationResult::default();
    }

    let daily = WaterIntake {
        liters: round_to(liters, 1),
        ml: round_to(liters * 1000.0, 0),
        oz: round_to(units::liters_to_oz(liters), 0),
        cups: units::liters_to_cups(liters),
    };
    let hourly = HourlyIntake {
        ml: round_to(daily.ml / WAKING_HOURS, 0),
        oz: round_to(units::liters_to_oz(daily.ml / 1000.0) / WAKING_HOURS, 1),
    };
    let schedule = DrinkTime::ALL.map(|time| DrinkSlot {
        time,
        percentage: time.share(),
        ml: round_to(daily.ml * time.share() / 100.0, 0),
    });
    let bottles = BottleCount {
        half_liter: round_to(daily.liters / HALF_LITER_BOTTLE_L, 1),
        us_16_9_oz: round_to(daily.oz / US_BOTTLE_OZ, 1),
    };

    HydrationResult {
        daily,
        hourly,
        schedule,
        bottles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn baseline() -> HydrationInput {
        HydrationInput {
            weight_kg: 70.0,
            age_years: 25,
            sex: BiologicalSex::Male,
            ..Default::default()
        }
    }

    #[test]
    fn test_baseline_male() {
        // 70 × 35 / 1000 = 2.45 L, × 1.1 for male = 2.695 L
        let result = calculate_water_intake(&baseline());
        assert_eq!(result.daily.liters, 2.7);
        assert_eq!(result.daily.ml, 2695.0);
        assert_eq!(result.daily.oz, 91.0);
        assert_eq!(result.daily.cups, 11.4);
        assert_eq!(result.hourly.ml, 168.0);
        assert_eq!(result.hourly.oz, 5.7);
    }

    #[test]
    fn test_drinking_schedule() {
        let result = calculate_water_intake(&baseline());
        let slots: Vec<(&str, f64)> = result.schedule.iter().map(|s| (s.time.label(), s.ml)).collect();
        assert_eq!(
            slots,
            vec![("Wake Up", 404.0), ("Morning", 674.0), ("Afternoon", 943.0), ("Evening", 674.0)]
        );
        assert_eq!(result.schedule.iter().map(|s| s.percentage).sum::<f64>(), 100.0);
    }

    #[test]
    fn test_bottle_equivalents() {
        // 2.7 L / 0.5 L and 91 oz / 16.9 oz
        let result = calculate_water_intake(&baseline());
        assert_eq!(result.bottles.half_liter, 5.4);
        assert_eq!(result.bottles.us_16_9_oz, 5.4);

        let mut floor = baseline();
        floor.weight_kg = 30.0;
        floor.sex = BiologicalSex::Female;
        assert_eq!(calculate_water_intake(&floor).bottles.half_liter, 3.0);
    }

    #[test]
    fn test_floor_applies() {
        let input = HydrationInput {
            weight_kg: 40.0,
            age_years: 30,
            sex: BiologicalSex::Female,
            ..Default::default()
        };
        assert_eq!(calculate_water_intake(&input).daily.liters, 1.5);
    }

    #[test]
    fn test_age_bands() {
        let mut senior = baseline();
        senior.age_years = 70;
        let mut teen = baseline();
        teen.age_years = 16;

        let adult = daily_water_liters(&baseline());
        assert!(daily_water_liters(&senior) < adult);
        assert!(daily_water_liters(&teen) > adult);
    }

    #[test]
    fn test_additive_adjustments() {
        let mut input = baseline();
        input.sex = BiologicalSex::Female;
        input.activity = HydrationActivity::High;
        input.climate = Climate::Hot;
        input.pregnant = true;
        input.conditions = vec![HealthCondition::Fever, HealthCondition::KidneyDisease];

        // 2.45 + 1.0 + 0.5 + 0.3 + 0.5 - 0.3 = 4.45
        let liters = daily_water_liters(&input);
        assert!((liters - 4.45).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_is_all_zero() {
        let mut input = baseline();
        input.weight_kg = 0.0;
        let result = calculate_water_intake(&input);
        assert_eq!(result, HydrationResult::default());
        assert!(result.to_calculator_result().is_none());
    }

    #[test]
    fn test_share_projection() {
        let shared = calculate_water_intake(&baseline()).to_calculator_result().unwrap();
        assert_eq!(shared.fields["value"], 2.7);
        assert_eq!(shared.fields["unit"], "L/day");
        assert_eq!(shared.fields["alternativeUnits"], "2695ml | 91oz | 11.4 cups");
        assert_eq!(shared.fields["hourlyGoal"], "168ml/hour");
    }

    #[test]
    fn test_condition_parsing() {
        assert_eq!(
            "bladderInfection".parse::<HealthCondition>().unwrap(),
            HealthCondition::BladderInfection
        );
        assert_eq!(
            "heart-disease".parse::<HealthCondition>().unwrap(),
            HealthCondition::HeartDisease
        );
        assert_eq!("very-hot".parse::<Climate>().unwrap(), Climate::VeryHot);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: never below the 1.5 L floor for a positive weight
        #[test]
        fn prop_floor(weight in 1.0f64..300.0, age in 1u32..120, heart in any::<bool>()) {
            let input = HydrationInput {
                weight_kg: weight,
                age_years: age,
                sex: BiologicalSex::Female,
                conditions: if heart { vec![HealthCondition::HeartDisease, HealthCondition::KidneyDisease] } else { Vec::new() },
                ..Default::default()
            };
            prop_assert!(daily_water_liters(&input) >= MIN_DAILY_LITERS);
        }

        /// Property: heavier people never need less water
        #[test]
        fn prop_monotonic_in_weight(weight in 20.0f64..200.0, extra in 0.0f64..50.0) {
            let light = HydrationInput { weight_kg: weight, age_years: 30, ..Default::default() };
            let heavy = HydrationInput { weight_kg: weight + extra, age_years: 30, ..Default::default() };
            prop_assert!(daily_water_liters(&heavy) >= daily_water_liters(&light));
        }
    }
}
