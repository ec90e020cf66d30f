//! Command-line surface and calculator dispatch
//!
//! Each subcommand validates its input, runs one calculator and returns a
//! [`Report`]: the human summary plus the result projection the share path
//! consumes.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use nutrisculpt_shared::{
    heart_rate::{calculate_heart_rate, max_heart_rate, HeartRateInput, MaxHeartRateMethod, TrainingGoal},
    hydration::{calculate_water_intake, Climate, HealthCondition, HydrationActivity, HydrationInput},
    macros::{calculate_macros, CalorieSource, MacroAmount, MacroPreset, MacroSplit, MEALS_PER_DAY},
    one_rep_max::{calculate_one_rep_max, Exercise},
    share::SharePlatform,
    validation::{
        check_field, validate_age, validate_calories, validate_height_cm, validate_lift_weight, validate_reps,
        validate_weight, HeartRateReadings, MacroPercentages,
    },
    ActivityLevel, BiologicalSex, CalculatorResult, CalorieGoal, EMPTY_DISPLAY, FrameSize, HealthProfile, Theme, UnitSystem,
    CM_PER_INCH, LB_PER_KG,
};
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "nutrisculpt", version, about = "Fitness calculators with shareable result cards")]
pub struct Cli {
    /// Unit system for input and output; defaults to the saved preference
    #[arg(long, global = true)]
    pub units: Option<UnitSystem>,

    /// Share the result: native, copy, download, pinterest, facebook, whatsapp, instagram, snapchat
    #[arg(long, global = true)]
    pub share: Option<SharePlatform>,

    /// Replace the default share text
    #[arg(long, global = true)]
    pub message: Option<String>,

    /// Render the card in 4:5 portrait instead of square
    #[arg(long, global = true)]
    pub portrait: bool,

    /// Card theme; defaults to the saved preference
    #[arg(long, global = true)]
    pub theme: Option<Theme>,

    /// Print the sanitized share result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Body mass index and healthy weight range
    Bmi {
        #[command(flatten)]
        body: BodySize,
    },
    /// Daily calorie target
    Calories {
        #[command(flatten)]
        body: BodySize,
        #[command(flatten)]
        person: Person,
        #[arg(long, default_value = "sedentary")]
        activity: ActivityLevel,
        #[arg(long, default_value = "maintain")]
        goal: CalorieGoal,
    },
    /// Protein, carb and fat split of a calorie total
    Macros(MacroArgs),
    /// One-rep max estimate from a set
    #[command(name = "one-rm")]
    OneRm {
        /// Load lifted (kg, or lb with --units imperial)
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        reps: u32,
        #[arg(long, default_value = "bench-press")]
        exercise: Exercise,
    },
    /// Heart rate training zones
    HeartRate {
        #[command(flatten)]
        person: Person,
        #[arg(long, default_value_t = 60.0)]
        resting: f64,
        #[arg(long, default_value = "standard")]
        method: MaxHeartRateMethod,
        /// Measured max heart rate, overrides the age-based prediction
        #[arg(long)]
        max_hr: Option<f64>,
        #[arg(long, default_value = "general-fitness")]
        goal: TrainingGoal,
    },
    /// Ideal body weight across the classic formulas
    IdealWeight {
        /// Height (cm, or inches with --units imperial)
        #[arg(long)]
        height: f64,
        #[arg(long, default_value = "male")]
        sex: BiologicalSex,
        #[arg(long, default_value = "medium")]
        frame: FrameSize,
    },
    /// Daily water intake
    Water {
        /// Body weight (kg, or lb with --units imperial)
        #[arg(long)]
        weight: f64,
        #[command(flatten)]
        person: Person,
        #[arg(long, default_value = "sedentary")]
        activity: HydrationActivity,
        #[arg(long, default_value = "temperate")]
        climate: Climate,
        #[arg(long)]
        pregnant: bool,
        #[arg(long)]
        breastfeeding: bool,
        /// Repeat for several conditions
        #[arg(long = "condition")]
        conditions: Vec<HealthCondition>,
    },
    /// Show or change saved preferences (set uses --units and --theme)
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    Show,
    Set,
    /// Flip between dark and light card themes
    ToggleTheme,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct BodySize {
    /// Body weight (kg, or lb with --units imperial)
    #[arg(long)]
    pub weight: f64,
    /// Height (cm, or inches with --units imperial)
    #[arg(long)]
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct Person {
    #[arg(long)]
    pub age: u32,
    #[arg(long, default_value = "male")]
    pub sex: BiologicalSex,
}

#[derive(Debug, Clone, Args)]
pub struct MacroArgs {
    /// Daily calories; when absent they are calculated from body stats
    #[arg(long)]
    pub calories: Option<f64>,
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub height: Option<f64>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long, default_value = "male")]
    pub sex: BiologicalSex,
    #[arg(long, default_value = "sedentary")]
    pub activity: ActivityLevel,
    #[arg(long, default_value = "balanced")]
    pub preset: MacroPreset,
    /// Custom split; give all three percentages
    #[arg(long)]
    pub protein: Option<f64>,
    #[arg(long)]
    pub carbs: Option<f64>,
    #[arg(long)]
    pub fat: Option<f64>,
}

/// Calculator output
#[derive(Debug, Clone)]
pub struct Report {
    pub lines: Vec<String>,
    /// `None` when the input produced nothing worth sharing
    pub result: Option<CalculatorResult>,
}

impl Report {
    pub fn summary(&self) -> String {
        self.lines.join("\n")
    }
}

fn to_kg(weight: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => weight,
        UnitSystem::Imperial => weight / LB_PER_KG,
    }
}

fn to_cm(height: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => height,
        UnitSystem::Imperial => height * CM_PER_INCH,
    }
}

fn weight_unit(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "kg",
        UnitSystem::Imperial => "lb",
    }
}

impl BodySize {
    fn metric(&self, units: UnitSystem) -> Result<(f64, f64)> {
        let weight_kg = to_kg(self.weight, units);
        let height_cm = to_cm(self.height, units);
        check_field("weight", validate_weight(weight_kg))?;
        check_field("height", validate_height_cm(height_cm))?;
        Ok((weight_kg, height_cm))
    }
}

impl Person {
    fn checked_age(&self) -> Result<u32> {
        check_field("age", validate_age(self.age))?;
        Ok(self.age)
    }
}

/// Run a calculator subcommand
pub fn run_calculator(command: &Command, units: UnitSystem) -> Result<Report> {
    match command {
        Command::Bmi { body } => bmi(body, units),
        Command::Calories {
            body,
            person,
            activity,
            goal,
        } => calories(body, person, *activity, *goal, units),
        Command::Macros(args) => macros(args, units),
        Command::OneRm { weight, reps, exercise } => one_rep_max(*weight, *reps, *exercise, units),
        Command::HeartRate {
            person,
            resting,
            method,
            max_hr,
            goal,
        } => heart_rate(person, *resting, *method, *max_hr, *goal),
        Command::IdealWeight { height, sex, frame } => ideal_weight(*height, *sex, *frame, units),
        Command::Water {
            weight,
            person,
            activity,
            climate,
            pregnant,
            breastfeeding,
            conditions,
        } => {
            let weight_kg = to_kg(*weight, units);
            check_field("weight", validate_weight(weight_kg))?;
            let input = HydrationInput {
                weight_kg,
                age_years: person.checked_age()?,
                sex: person.sex,
                activity: *activity,
                climate: *climate,
                pregnant: *pregnant,
                breastfeeding: *breastfeeding,
                conditions: conditions.clone(),
            };
            water(&input, units)
        }
        Command::Prefs { .. } => bail!("prefs is not a calculator"),
    }
}

fn bmi(body: &BodySize, units: UnitSystem) -> Result<Report> {
    let (weight_kg, height_cm) = body.metric(units)?;
    let result = nutrisculpt_shared::calculate_bmi_result(weight_kg, height_cm, units);
    let label = result.category.map(|c| c.label()).unwrap_or(EMPTY_DISPLAY);

    Ok(Report {
        lines: vec![
            format!("BMI: {:.1} ({})", result.value, label),
            format!("Healthy weight range: {}", result.healthy_range),
        ],
        result: result.to_calculator_result(),
    })
}

fn calories(
    body: &BodySize,
    person: &Person,
    activity: ActivityLevel,
    goal: CalorieGoal,
    units: UnitSystem,
) -> Result<Report> {
    let (weight_kg, height_cm) = body.metric(units)?;
    let profile = HealthProfile {
        height_cm,
        weight_kg,
        age_years: person.checked_age()?,
        sex: person.sex,
        activity_level: activity,
    };
    let result = nutrisculpt_shared::calculate_calories(&profile, goal);

    Ok(Report {
        lines: vec![
            format!("BMR: {} kcal", result.bmr),
            format!("TDEE ({}): {} kcal", activity.label(), result.tdee),
            format!(
                "{} ({}): {} kcal/day",
                goal.label(),
                goal.description(),
                result.target_calories
            ),
        ],
        result: result.to_calculator_result(),
    })
}

fn macro_line(name: &str, amount: &MacroAmount) -> String {
    format!(
        "{:<8} {:>5}g  {:>5} kcal  ({}%)",
        name, amount.grams, amount.calories, amount.percentage
    )
}

fn macros(args: &MacroArgs, units: UnitSystem) -> Result<Report> {
    let source = match args.calories {
        Some(calories) => {
            check_field("calories", validate_calories(calories))?;
            CalorieSource::Manual(calories)
        }
        None => {
            let (Some(weight), Some(height), Some(age)) = (args.weight, args.height, args.age) else {
                bail!("Give --calories, or --weight, --height and --age to calculate them");
            };
            let (weight_kg, height_cm) = BodySize { weight, height }.metric(units)?;
            CalorieSource::Calculated(HealthProfile {
                height_cm,
                weight_kg,
                age_years: Person { age, sex: args.sex }.checked_age()?,
                sex: args.sex,
                activity_level: args.activity,
            })
        }
    };

    let preset = match (args.protein, args.carbs, args.fat) {
        (None, None, None) => args.preset,
        (Some(protein), Some(carbs), Some(fat)) => {
            let checked = MacroPercentages { protein, carbs, fat }.checked()?;
            MacroPreset::Custom(MacroSplit {
                protein: checked.protein,
                carbs: checked.carbs,
                fat: checked.fat,
            })
        }
        _ => bail!("A custom split needs --protein, --carbs and --fat"),
    };

    let breakdown = calculate_macros(&source, preset);
    let mut lines = vec![
        format!("{} split of {} kcal", preset.name(), breakdown.total_calories),
        macro_line("Protein", &breakdown.protein),
        macro_line("Carbs", &breakdown.carbs),
        macro_line("Fat", &breakdown.fat),
        format!(
            "Per meal ({}): {} kcal, {}g protein, {}g carbs, {}g fat",
            MEALS_PER_DAY,
            breakdown.per_meal.calories,
            breakdown.per_meal.protein_grams,
            breakdown.per_meal.carbs_grams,
            breakdown.per_meal.fat_grams
        ),
    ];
    let total = breakdown.total_percentage();
    if total != 100.0 {
        warn!(total, "Macro percentages do not add up to 100");
        lines.push(format!("Warning: percentages add up to {}%, not 100%", total));
    }

    Ok(Report {
        lines,
        result: breakdown.to_calculator_result(),
    })
}

fn one_rep_max(weight: f64, reps: u32, exercise: Exercise, units: UnitSystem) -> Result<Report> {
    let weight_kg = to_kg(weight, units);
    check_field("lift_weight", validate_lift_weight(weight_kg))?;
    check_field("reps", validate_reps(reps))?;

    let result = calculate_one_rep_max(weight_kg, reps, exercise);
    let unit = weight_unit(units);
    let mut lines = vec![format!("{}: {} {} x {}", exercise.label(), weight, unit, reps)];
    for estimate in &result.estimates {
        lines.push(format!(
            "  {:<10} {} {}",
            estimate.formula.name(),
            estimate.weight.in_system(units),
            unit
        ));
    }
    if let Some(average) = result.average {
        lines.push(format!("Estimated 1RM: {} {}", average.in_system(units), unit));
    }
    for load in &result.training {
        lines.push(format!(
            "  {:>3}%  {:>6} {}  {:>5} reps  {}",
            load.percentage,
            load.weight.in_system(units),
            unit,
            load.reps,
            load.purpose
        ));
    }

    Ok(Report {
        lines,
        result: result.to_calculator_result(units),
    })
}

fn heart_rate(
    person: &Person,
    resting: f64,
    method: MaxHeartRateMethod,
    max_hr: Option<f64>,
    goal: TrainingGoal,
) -> Result<Report> {
    let age_years = person.checked_age()?;
    let predicted = max_heart_rate(f64::from(age_years), person.sex, method);
    let readings = HeartRateReadings {
        resting_hr: resting,
        max_hr,
    }
    .checked_against(predicted)?;
    let input = HeartRateInput {
        age_years,
        sex: person.sex,
        resting_hr: readings.resting_hr,
        method,
        custom_max_hr: readings.max_hr,
        goal,
    };
    let result = calculate_heart_rate(&input);

    let mut lines = vec![
        format!("Max heart rate: {} bpm ({})", result.effective_max_hr, method.name()),
        format!("{}: {}", goal.label(), goal.recommendation()),
    ];
    for zone in &result.zones {
        let marker = if result.is_recommended(zone) { "*" } else { " " };
        lines.push(format!(
            "{} Zone {} {:<18} {}-{} bpm  (Karvonen {}-{})",
            marker,
            zone.definition.zone,
            zone.definition.name,
            zone.max_hr.min,
            zone.max_hr.max,
            zone.karvonen.min,
            zone.karvonen.max
        ));
    }

    Ok(Report {
        lines,
        result: result.to_calculator_result(),
    })
}

fn ideal_weight(height: f64, sex: BiologicalSex, frame: FrameSize, units: UnitSystem) -> Result<Report> {
    let height_cm = to_cm(height, units);
    check_field("height", validate_height_cm(height_cm))?;

    let result = nutrisculpt_shared::calculate_ideal_weight(height_cm, sex, frame);
    let unit = weight_unit(units);
    let mut lines = Vec::new();
    match result.average {
        Some(average) => {
            lines.push(format!(
                "Ideal weight ({}): {} {}",
                frame.label(),
                average.in_system(units),
                unit
            ));
            for estimate in &result.estimates {
                lines.push(format!(
                    "  {:<10} {} {}",
                    estimate.formula.name(),
                    estimate.weight.in_system(units),
                    unit
                ));
            }
        }
        None => lines.push("The ideal weight formulas need a height of at least 100 cm".to_string()),
    }
    if let Some((min, max)) = result.healthy_range {
        lines.push(format!(
            "Healthy range: {}-{} {}",
            min.in_system(units),
            max.in_system(units),
            unit
        ));
    }

    Ok(Report {
        lines,
        result: result.to_calculator_result(units),
    })
}

fn water(input: &HydrationInput, units: UnitSystem) -> Result<Report> {
    let result = calculate_water_intake(input);
    let headline = match units {
        UnitSystem::Metric => format!("Daily water: {} L ({} ml)", result.daily.liters, result.daily.ml),
        UnitSystem::Imperial => format!("Daily water: {} oz ({} cups)", result.daily.oz, result.daily.cups),
    };

    let mut lines = vec![
        headline,
        format!("Per waking hour: {} ml / {} oz", result.hourly.ml, result.hourly.oz),
        format!(
            "Bottles: {} x 500 ml or {} x 16.9 fl oz",
            result.bottles.half_liter, result.bottles.us_16_9_oz
        ),
    ];
    lines.extend(
        result
            .schedule
            .iter()
            .map(|slot| format!("{:<10} {:>5} ml  ({}%)", slot.time.label(), slot.ml, slot.percentage)),
    );

    Ok(Report {
        lines,
        result: result.to_calculator_result(),
    })
}
