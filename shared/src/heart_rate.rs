//! Heart-rate training zones
//!
//! Predicts max heart rate from age, then derives five intensity zones both
//! as a straight percentage of max HR and with the Karvonen (heart-rate
//! reserve) method.

use serde::{Deserialize, Serialize};

use crate::health_metrics::BiologicalSex;
use crate::share::{CalculatorKind, CalculatorResult};
use crate::units::round_to;

/// Age-based max HR prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaxHeartRateMethod {
    /// 220 - age
    #[default]
    Standard,
    /// 208 - 0.7 × age
    Tanaka,
    /// 206 - 0.88 × age; women only, men fall back to Tanaka
    Gulati,
}

impl MaxHeartRateMethod {
    pub fn name(&self) -> &'static str {
        match self {
            MaxHeartRateMethod::Standard => "Standard (220 - Age)",
            MaxHeartRateMethod::Tanaka => "Tanaka (208 - 0.7 × Age)",
            MaxHeartRateMethod::Gulati => "Gulati Women (206 - 0.88 × Age)",
        }
    }

    /// Unrounded prediction
    pub fn predict(&self, age_years: f64, sex: BiologicalSex) -> f64 {
        match (self, sex) {
            (MaxHeartRateMethod::Standard, _) => 220.0 - age_years,
            (MaxHeartRateMethod::Tanaka, _) | (MaxHeartRateMethod::Gulati, BiologicalSex::Male) => {
                208.0 - 0.7 * age_years
            }
            (MaxHeartRateMethod::Gulati, BiologicalSex::Female) => 206.0 - 0.88 * age_years,
        }
    }
}

impl std::str::FromStr for MaxHeartRateMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "220" => Ok(MaxHeartRateMethod::Standard),
            "tanaka" => Ok(MaxHeartRateMethod::Tanaka),
            "gulati" => Ok(MaxHeartRateMethod::Gulati),
            _ => Err(format!("Unknown max heart rate method: {}", s)),
        }
    }
}

/// Predicted max heart rate in whole bpm
pub fn max_heart_rate(age_years: f64, sex: BiologicalSex, method: MaxHeartRateMethod) -> f64 {
    round_to(method.predict(age_years, sex), 0)
}

/// Static description of one intensity zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneDefinition {
    pub zone: u8,
    pub name: &'static str,
    pub min_percent: f64,
    pub max_percent: f64,
    pub description: &'static str,
    pub benefits: &'static str,
}

pub const ZONES: [ZoneDefinition; 5] = [
    ZoneDefinition {
        zone: 1,
        name: "Recovery",
        min_percent: 50.0,
        max_percent: 60.0,
        description: "Very light intensity, active recovery",
        benefits: "Recovery, fat burning, warm-up",
    },
    ZoneDefinition {
        zone: 2,
        name: "Aerobic Base",
        min_percent: 60.0,
        max_percent: 70.0,
        description: "Light intensity, aerobic development",
        benefits: "Builds aerobic capacity, fat burning",
    },
    ZoneDefinition {
        zone: 3,
        name: "Aerobic",
        min_percent: 70.0,
        max_percent: 80.0,
        description: "Moderate intensity, aerobic fitness",
        benefits: "Improves cardiovascular efficiency",
    },
    ZoneDefinition {
        zone: 4,
        name: "Lactate Threshold",
        min_percent: 80.0,
        max_percent: 90.0,
        description: "Hard intensity, lactate threshold",
        benefits: "Increases lactate threshold, speed",
    },
    ZoneDefinition {
        zone: 5,
        name: "VO2 Max",
        min_percent: 90.0,
        max_percent: 100.0,
        description: "Maximum intensity, neuromuscular power",
        benefits: "Improves VO2 max, anaerobic capacity",
    },
];

/// Whole-bpm band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BpmRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartRateZone {
    pub definition: ZoneDefinition,
    /// Percentage of max HR
    pub max_hr: BpmRange,
    /// Karvonen method
    pub karvonen: BpmRange,
}

/// Zones for a given max and resting heart rate.
///
/// A resting rate at or above max leaves no reserve, so every Karvonen
/// bound collapses onto the resting rate.
pub fn calculate_zones(max_hr: f64, resting_hr: f64) -> Vec<HeartRateZone> {
    let reserve = (max_hr - resting_hr).max(0.0);
    ZONES
        .iter()
        .map(|definition| {
            let (lo, hi) = (definition.min_percent / 100.0, definition.max_percent / 100.0);
            HeartRateZone {
                definition: *definition,
                max_hr: BpmRange {
                    min: round_to(lo * max_hr, 0),
                    max: round_to(hi * max_hr, 0),
                },
                karvonen: BpmRange {
                    min: round_to(resting_hr + lo * reserve, 0),
                    max: round_to(resting_hr + hi * reserve, 0),
                },
            }
        })
        .collect()
}

/// Training goal with its recommended zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrainingGoal {
    WeightLoss,
    #[default]
    GeneralFitness,
    Endurance,
    Performance,
}

impl TrainingGoal {
    pub fn label(&self) -> &'static str {
        match self {
            TrainingGoal::WeightLoss => "Weight Loss",
            TrainingGoal::GeneralFitness => "General Fitness",
            TrainingGoal::Endurance => "Endurance",
            TrainingGoal::Performance => "Performance",
        }
    }

    pub fn primary_zones(&self) -> &'static [u8] {
        match self {
            TrainingGoal::WeightLoss => &[1, 2],
            TrainingGoal::GeneralFitness => &[2, 3],
            TrainingGoal::Endurance => &[2, 3, 4],
            TrainingGoal::Performance => &[3, 4, 5],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrainingGoal::WeightLoss => "Focus on fat-burning zones with longer duration",
            TrainingGoal::GeneralFitness => "Build overall cardiovascular health",
            TrainingGoal::Endurance => "Build aerobic capacity and endurance",
            TrainingGoal::Performance => "Improve speed and power",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            TrainingGoal::WeightLoss => "60-70% of training time in zones 1-2",
            TrainingGoal::GeneralFitness => "Mix of zones 2-3 with some zone 1 recovery",
            TrainingGoal::Endurance => "80% easy (zones 1-2), 20% moderate-hard (zones 3-4)",
            TrainingGoal::Performance => "Include all zones with emphasis on 4-5",
        }
    }
}

impl std::str::FromStr for TrainingGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "weight_loss" => Ok(TrainingGoal::WeightLoss),
            "general_fitness" | "fitness" => Ok(TrainingGoal::GeneralFitness),
            "endurance" => Ok(TrainingGoal::Endurance),
            "performance" => Ok(TrainingGoal::Performance),
            _ => Err(format!("Unknown training goal: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateInput {
    pub age_years: u32,
    pub sex: BiologicalSex,
    pub resting_hr: f64,
    pub method: MaxHeartRateMethod,
    /// Overrides the age-based prediction when set
    pub custom_max_hr: Option<f64>,
    pub goal: TrainingGoal,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeartRateResult {
    pub predicted_max_hr: f64,
    pub effective_max_hr: f64,
    pub resting_hr: f64,
    pub goal: TrainingGoal,
    pub zones: Vec<HeartRateZone>,
}

impl HeartRateResult {
    pub fn is_recommended(&self, zone: &HeartRateZone) -> bool {
        self.goal.primary_zones().contains(&zone.definition.zone)
    }

    /// `"Zone 2: 117-137 bpm, Zone 3: ..."` for the goal's zones
    pub fn recommended_zones_summary(&self) -> String {
        self.zones
            .iter()
            .filter(|zone| self.is_recommended(zone))
            .map(|zone| {
                format!(
                    "Zone {}: {}-{} bpm",
                    zone.definition.zone, zone.max_hr.min, zone.max_hr.max
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Share projection; the HR inputs ride along under keys the sanitizer strips
    pub fn to_calculator_result(&self) -> Option<CalculatorResult> {
        if self.zones.is_empty() || !(self.effective_max_hr > 0.0) {
            return None;
        }
        Some(
            CalculatorResult::new(CalculatorKind::HeartRate)
                .with("goal", self.goal.label())
                .with("zones", self.recommended_zones_summary())
                .with("maxHeartRate", self.effective_max_hr)
                .with("restingHeartRate", self.resting_hr),
        )
    }
}

pub fn calculate_heart_rate(input: &HeartRateInput) -> HeartRateResult {
    let predicted = max_heart_rate(input.age_years as f64, input.sex, input.method);
    let effective = input.custom_max_hr.unwrap_or(predicted);

    HeartRateResult {
        predicted_max_hr: predicted,
        effective_max_hr: effective,
        resting_hr: input.resting_hr,
        goal: input.goal,
        zones: calculate_zones(effective, input.resting_hr),
    }
}
