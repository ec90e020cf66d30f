//! One-repetition maximum estimation
//!
//! Seven published formulas are evaluated over the same (load, reps) pair.
//! The headline figure is the mean of every formula that produced a
//! positive, finite estimate; training loads are derived from that mean.

use serde::{Deserialize, Serialize};

use crate::health_metrics::{mean_of_positive, WeightPair};
use crate::share::{CalculatorKind, CalculatorResult};
use crate::units::UnitSystem;

/// Named 1RM estimation formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneRepMaxFormula {
    Epley,
    Brzycki,
    Lander,
    Lombardi,
    Mayhew,
    OConner,
    Wathan,
}

impl OneRepMaxFormula {
    pub const ALL: [OneRepMaxFormula; 7] = [
        OneRepMaxFormula::Epley,
        OneRepMaxFormula::Brzycki,
        OneRepMaxFormula::Lander,
        OneRepMaxFormula::Lombardi,
        OneRepMaxFormula::Mayhew,
        OneRepMaxFormula::OConner,
        OneRepMaxFormula::Wathan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OneRepMaxFormula::Epley => "Epley",
            OneRepMaxFormula::Brzycki => "Brzycki",
            OneRepMaxFormula::Lander => "Lander",
            OneRepMaxFormula::Lombardi => "Lombardi",
            OneRepMaxFormula::Mayhew => "Mayhew",
            OneRepMaxFormula::OConner => "O'Conner",
            OneRepMaxFormula::Wathan => "Wathan",
        }
    }

    /// Raw estimate in the load's unit
    ///
    /// Brzycki and Lander diverge as reps approach 37-38; those values come
    /// back negative or infinite and are dropped by the average.
    pub fn estimate(&self, weight: f64, reps: u32) -> f64 {
        let r = reps as f64;
        match self {
            OneRepMaxFormula::Epley => weight * (1.0 + r / 30.0),
            OneRepMaxFormula::Brzycki => weight * (36.0 / (37.0 - r)),
            OneRepMaxFormula::Lander => weight / (1.013 - 0.0267123 * r),
            OneRepMaxFormula::Lombardi => weight * r.powf(0.1),
            OneRepMaxFormula::Mayhew => (100.0 * weight) / (52.2 + 41.9 * (-0.055 * r).exp()),
            OneRepMaxFormula::OConner => weight * (1.0 + 0.025 * r),
            OneRepMaxFormula::Wathan => (100.0 * weight) / (48.8 + 53.8 * (-0.075 * r).exp()),
        }
    }
}

/// Lift the estimate is for; carried into the share result only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Exercise {
    Squat,
    #[default]
    BenchPress,
    Deadlift,
    OverheadPress,
    Row,
    PullUp,
    Other,
}

impl Exercise {
    pub fn label(&self) -> &'static str {
        match self {
            Exercise::Squat => "Squat",
            Exercise::BenchPress => "Bench Press",
            Exercise::Deadlift => "Deadlift",
            Exercise::OverheadPress => "Overhead Press",
            Exercise::Row => "Row",
            Exercise::PullUp => "Pull-up/Chin-up",
            Exercise::Other => "Other",
        }
    }
}

impl std::str::FromStr for Exercise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' ', '/'], "_").as_str() {
            "squat" => Ok(Exercise::Squat),
            "bench" | "bench_press" => Ok(Exercise::BenchPress),
            "deadlift" => Ok(Exercise::Deadlift),
            "ohp" | "overhead_press" => Ok(Exercise::OverheadPress),
            "row" => Ok(Exercise::Row),
            "pull_up" | "pullup" | "chin_up" | "pull_up_chin_up" => Ok(Exercise::PullUp),
            "other" => Ok(Exercise::Other),
            _ => Err(format!("Unknown exercise: {}", s)),
        }
    }
}

/// One row of the percentage-based training table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingLoad {
    pub percentage: u32,
    pub weight: WeightPair,
    pub reps: &'static str,
    pub purpose: &'static str,
}

const TRAINING_PERCENTAGES: [(u32, &str, &str); 6] = [
    (50, "20+", "Endurance"),
    (60, "15-20", "Muscular Endurance"),
    (70, "12-15", "Hypertrophy"),
    (80, "8-12", "Strength"),
    (90, "3-6", "Power"),
    (95, "1-3", "Max Strength"),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneRepMaxEstimate {
    pub formula: OneRepMaxFormula,
    pub weight: WeightPair,
}

#[derive(Debug, Clone, Serialize)]
pub struct OneRepMaxResult {
    pub exercise: Exercise,
    pub reps: u32,
    pub estimates: Vec<OneRepMaxEstimate>,
    pub average: Option<WeightPair>,
    pub training: Vec<TrainingLoad>,
}

impl OneRepMaxResult {
    /// Share projection; the lifted load itself is never included
    pub fn to_calculator_result(&self, system: UnitSystem) -> Option<CalculatorResult> {
        let average = self.average?;
        let unit = match system {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        };
        Some(
            CalculatorResult::new(CalculatorKind::OneRepMax)
                .with("value", average.in_system(system))
                .with("unit", unit)
                .with("exercise", self.exercise.label())
                .with("repsUsed", self.reps),
        )
    }
}

/// Estimate the one-rep max from a load (kg) lifted for `reps` repetitions
///
/// Yields an empty result for a non-positive load or zero reps.
pub fn calculate_one_rep_max(weight_kg: f64, reps: u32, exercise: Exercise) -> OneRepMaxResult {
    if !(weight_kg > 0.0) || reps < 1 {
        return OneRepMaxResult {
            exercise,
            reps,
            estimates: Vec::new(),
            average: None,
            training: Vec::new(),
        };
    }

    let raw: Vec<(OneRepMaxFormula, f64)> = OneRepMaxFormula::ALL
        .into_iter()
        .map(|formula| (formula, formula.estimate(weight_kg, reps)))
        .collect();

    let mean = mean_of_positive(raw.iter().map(|(_, kg)| *kg));

    let training = mean
        .map(|avg| {
            TRAINING_PERCENTAGES
                .iter()
                .map(|&(percentage, reps, purpose)| TrainingLoad {
                    percentage,
                    weight: WeightPair::from_kg(avg * percentage as f64 / 100.0),
                    reps,
                    purpose,
                })
                .collect()
        })
        .unwrap_or_default();

    OneRepMaxResult {
        exercise,
        reps,
        estimates: raw
            .into_iter()
            .filter(|(_, kg)| kg.is_finite() && *kg > 0.0)
            .map(|(formula, kg)| OneRepMaxEstimate {
                formula,
                weight: WeightPair::from_kg(kg),
            })
            .collect(),
        average: mean.map(WeightPair::from_kg),
        training,
    }
}

/// Mean 1RM in the load's unit, or 0 when no formula applies
pub fn one_rep_max_average(weight: f64, reps: u32) -> f64 {
    if !(weight > 0.0) || reps < 1 {
        return 0.0;
    }
    mean_of_positive(OneRepMaxFormula::ALL.iter().map(|f| f.estimate(weight, reps))).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::round_to;
    use proptest::prelude::*;

    #[test]
    fn test_epley_100kg_5_reps() {
        let estimate = OneRepMaxFormula::Epley.estimate(100.0, 5);
        assert_eq!(round_to(estimate, 2), 116.67);
    }

    #[test]
    fn test_single_rep_formulas_near_load() {
        // At one rep every formula should land close to the lifted load
        for formula in OneRepMaxFormula::ALL {
            let estimate = formula.estimate(100.0, 1);
            assert!((estimate - 100.0).abs() < 10.0, "{} gave {}", formula.name(), estimate);
        }
    }

    #[test]
    fn test_average_is_mean_of_all_formulas() {
        let result = calculate_one_rep_max(80.0, 5, Exercise::BenchPress);
        assert_eq!(result.estimates.len(), 7);

        let expected: f64 =
            OneRepMaxFormula::ALL.iter().map(|f| f.estimate(80.0, 5)).sum::<f64>() / 7.0;
        assert_eq!(result.average.unwrap().kg, round_to(expected, 1));
    }

    #[test]
    fn test_diverging_formulas_are_dropped() {
        // Brzycki divides by zero at 37 reps, Lander turns negative at 38
        let result = calculate_one_rep_max(50.0, 38, Exercise::Other);
        assert!(result.estimates.iter().all(|e| e.weight.kg > 0.0));
        assert!(!result
            .estimates
            .iter()
            .any(|e| e.formula == OneRepMaxFormula::Lander));
        assert!(result.average.is_some());
    }

    #[test]
    fn test_invalid_input_is_empty() {
        let result = calculate_one_rep_max(0.0, 5, Exercise::Squat);
        assert!(result.estimates.is_empty());
        assert!(result.average.is_none());
        assert!(result.training.is_empty());

        let result = calculate_one_rep_max(100.0, 0, Exercise::Squat);
        assert!(result.average.is_none());
        assert_eq!(one_rep_max_average(100.0, 0), 0.0);
    }

    #[test]
    fn test_training_table() {
        let result = calculate_one_rep_max(100.0, 5, Exercise::Squat);
        assert_eq!(result.training.len(), 6);
        assert_eq!(result.training[0].percentage, 50);
        assert_eq!(result.training[0].purpose, "Endurance");
        assert_eq!(result.training[5].reps, "1-3");

        let avg = one_rep_max_average(100.0, 5);
        assert_eq!(result.training[3].weight.kg, round_to(avg * 80.0 / 100.0, 1));
    }

    #[test]
    fn test_share_projection_excludes_load() {
        let result = calculate_one_rep_max(100.0, 5, Exercise::Deadlift);
        let shared = result.to_calculator_result(UnitSystem::Imperial).unwrap();
        assert_eq!(shared.fields["unit"], "lb");
        assert_eq!(shared.fields["exercise"], "Deadlift");
        assert_eq!(shared.fields["repsUsed"], 5);
        assert!(!shared.fields.contains_key("weight"));
    }

    #[test]
    fn test_exercise_parsing() {
        assert_eq!("bench-press".parse::<Exercise>().unwrap(), Exercise::BenchPress);
        assert_eq!("Pull-up/Chin-up".parse::<Exercise>().unwrap(), Exercise::PullUp);
        assert!("curl".parse::<Exercise>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: more reps at the same load never lowers the estimate
        #[test]
        fn prop_average_grows_with_reps(weight in 20.0f64..300.0, reps in 1u32..20) {
            let lower = one_rep_max_average(weight, reps);
            let higher = one_rep_max_average(weight, reps + 1);
            prop_assert!(higher >= lower);
        }

        /// Property: the estimate is at least the lifted load
        #[test]
        fn prop_average_not_below_load(weight in 20.0f64..300.0, reps in 1u32..30) {
            prop_assert!(one_rep_max_average(weight, reps) >= weight * 0.95);
        }
    }
}
