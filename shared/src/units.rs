//! Unit conversion module
//!
//! Calculators keep their inputs in metric (kg, cm, liters) and convert at the
//! display boundary. Every conversion is a pure mapping with a fixed constant,
//! rounded to a caller-chosen number of decimals.
//!
//! # Design Principles
//!
//! 1. **Metric Inside**: Formulas only ever see kg, cm and liters
//! 2. **Explicit Units**: A [`Measurement`] always carries its [`Unit`]
//! 3. **Conversion at Boundaries**: Convert on input/output, not in formulas
//! 4. **No Guards**: NaN input propagates; form validation lives elsewhere

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// US fluid ounces per liter
pub const OZ_PER_LITER: f64 = 33.814;
/// US cups per liter
pub const CUPS_PER_LITER: f64 = 4.227;

/// Round to `digits` decimal places
pub fn round_to(value: f64, digits: i32) -> f64 {
    let p = 10f64.powi(digits);
    (value * p).round() / p
}

// ============================================================================
// Weight
// ============================================================================

/// Kilograms to pounds, one decimal
pub fn kg_to_lb(kg: f64) -> f64 {
    kg_to_lb_with(kg, 1)
}

/// Kilograms to pounds at the given precision
pub fn kg_to_lb_with(kg: f64, digits: i32) -> f64 {
    round_to(kg * LB_PER_KG, digits)
}

/// Pounds to kilograms, one decimal
pub fn lb_to_kg(lb: f64) -> f64 {
    lb_to_kg_with(lb, 1)
}

/// Pounds to kilograms at the given precision
pub fn lb_to_kg_with(lb: f64, digits: i32) -> f64 {
    round_to(lb / LB_PER_KG, digits)
}

// ============================================================================
// Height
// ============================================================================

/// Height split into whole feet and remaining inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: i32,
    pub inches: f64,
}

impl FeetInches {
    /// Convert to total inches
    pub fn to_total_inches(&self) -> f64 {
        f64::from(self.feet) * 12.0 + self.inches
    }
}

impl fmt::Display for FeetInches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}

/// Centimeters to feet + inches (inches rounded to one decimal, always below 12)
pub fn cm_to_ft_in(cm: f64) -> FeetInches {
    let total_inches = cm / CM_PER_INCH;
    let mut feet = (total_inches / 12.0).floor() as i32;
    let mut inches = round_to(total_inches % 12.0, 1);
    if inches >= 12.0 {
        feet += 1;
        inches = round_to(inches - 12.0, 1);
    }
    FeetInches { feet, inches }
}

/// Feet + inches to centimeters, one decimal
pub fn ft_in_to_cm(feet: f64, inches: f64) -> f64 {
    round_to((feet * 12.0 + inches) * CM_PER_INCH, 1)
}

/// Centimeters to total inches (unrounded)
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

// ============================================================================
// Volume
// ============================================================================

/// Liters to US fluid ounces, one decimal
pub fn liters_to_oz(liters: f64) -> f64 {
    liters_to_oz_with(liters, 1)
}

/// Liters to US fluid ounces at the given precision
pub fn liters_to_oz_with(liters: f64, digits: i32) -> f64 {
    round_to(liters * OZ_PER_LITER, digits)
}

/// US fluid ounces to liters, one decimal
pub fn oz_to_liters(oz: f64) -> f64 {
    round_to(oz / OZ_PER_LITER, 1)
}

/// Liters to US cups, one decimal
pub fn liters_to_cups(liters: f64) -> f64 {
    round_to(liters * CUPS_PER_LITER, 1)
}

/// US cups to liters, one decimal
pub fn cups_to_liters(cups: f64) -> f64 {
    round_to(cups / CUPS_PER_LITER, 1)
}

// ============================================================================
// Unit tags and measurements
// ============================================================================

/// Unit tag carried by a [`Measurement`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    Lb,
    Cm,
    Ft,
    In,
    #[serde(rename = "L")]
    Liters,
    #[serde(rename = "mL")]
    Milliliters,
    Oz,
    Cups,
    Bpm,
    Kcal,
}

/// Physical dimension a unit measures; conversions only happen within one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Mass,
    Length,
    Volume,
    HeartRate,
    Energy,
}

impl Unit {
    /// Dimension of this unit
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Kg | Unit::Lb => Dimension::Mass,
            Unit::Cm | Unit::Ft | Unit::In => Dimension::Length,
            Unit::Liters | Unit::Milliliters | Unit::Oz | Unit::Cups => Dimension::Volume,
            Unit::Bpm => Dimension::HeartRate,
            Unit::Kcal => Dimension::Energy,
        }
    }

    /// Factor that turns a value in this unit into the dimension's base unit
    /// (kg, cm, liters, bpm, kcal)
    fn to_base_factor(self) -> f64 {
        match self {
            Unit::Kg | Unit::Cm | Unit::Liters | Unit::Bpm | Unit::Kcal => 1.0,
            Unit::Lb => 1.0 / LB_PER_KG,
            Unit::In => CM_PER_INCH,
            Unit::Ft => 12.0 * CM_PER_INCH,
            Unit::Milliliters => 0.001,
            Unit::Oz => 1.0 / OZ_PER_LITER,
            Unit::Cups => 1.0 / CUPS_PER_LITER,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Lb => "lb",
            Unit::Cm => "cm",
            Unit::Ft => "ft",
            Unit::In => "in",
            Unit::Liters => "L",
            Unit::Milliliters => "mL",
            Unit::Oz => "oz",
            Unit::Cups => "cups",
            Unit::Bpm => "bpm",
            Unit::Kcal => "kcal",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "l" | "liter" | "liters" => return Ok(Unit::Liters),
            "mL" | "ml" => return Ok(Unit::Milliliters),
            _ => {}
        }
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(Unit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(Unit::Lb),
            "cm" | "centimeter" | "centimeters" => Ok(Unit::Cm),
            "ft" | "foot" | "feet" => Ok(Unit::Ft),
            "in" | "inch" | "inches" => Ok(Unit::In),
            "oz" | "fl oz" | "ounce" | "ounces" => Ok(Unit::Oz),
            "cup" | "cups" => Ok(Unit::Cups),
            "bpm" => Ok(Unit::Bpm),
            "kcal" | "cal" | "calories" => Ok(Unit::Kcal),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

/// A numeric quantity tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Convert to another unit of the same dimension (unrounded).
    /// Returns `None` when the dimensions differ.
    pub fn convert_to(&self, unit: Unit) -> Option<Measurement> {
        if self.unit.dimension() != unit.dimension() {
            return None;
        }
        let base = self.value * self.unit.to_base_factor();
        Some(Measurement::new(base / unit.to_base_factor(), unit))
    }

    /// Same measurement rounded to `digits` decimals
    pub fn rounded(&self, digits: i32) -> Measurement {
        Measurement::new(round_to(self.value, digits), self.unit)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

// ============================================================================
// Unit system preference
// ============================================================================

/// Which unit family the user reads results in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Weight unit for display
    pub fn weight_unit(&self) -> Unit {
        match self {
            UnitSystem::Metric => Unit::Kg,
            UnitSystem::Imperial => Unit::Lb,
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, UnitSystem::Metric)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // Weight Tests
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: kg -> lb -> kg stays within display rounding
        #[test]
        fn prop_weight_roundtrip_kg(kg in 0.1f64..500.0) {
            let back = lb_to_kg(kg_to_lb(kg));
            prop_assert!((kg - back).abs() <= 0.1,
                "Round-trip failed: {} -> {} -> {}", kg, kg_to_lb(kg), back);
        }

        /// Property: cm -> ft/in -> cm stays within inch rounding
        #[test]
        fn prop_height_roundtrip_cm(cm in 1.0f64..300.0) {
            let split = cm_to_ft_in(cm);
            let back = ft_in_to_cm(f64::from(split.feet), split.inches);
            prop_assert!((cm - back).abs() <= 1.3,
                "Round-trip failed: {} -> {} -> {}", cm, split, back);
            prop_assert!(split.inches < 12.0);
        }

        /// Property: unrounded measurement conversion is reversible
        #[test]
        fn prop_measurement_roundtrip(liters in 0.1f64..10.0) {
            let oz = Measurement::new(liters, Unit::Liters).convert_to(Unit::Oz).unwrap();
            let back = oz.convert_to(Unit::Liters).unwrap();
            prop_assert!((back.value - liters).abs() < 1e-9);
        }
    }

    #[test]
    fn test_known_weight_conversions() {
        assert_eq!(kg_to_lb(70.0), 154.3);
        assert_eq!(lb_to_kg(154.3), 70.0);
        assert_eq!(kg_to_lb(80.0), 176.4);
        assert_eq!(kg_to_lb_with(1.0, 5), 2.20462);
    }

    #[test]
    fn test_known_height_conversions() {
        let split = cm_to_ft_in(170.0);
        assert_eq!(split.feet, 5);
        assert_eq!(split.inches, 6.9);
        assert_eq!(ft_in_to_cm(6.0, 0.0), 182.9);
        assert_eq!(ft_in_to_cm(5.0, 10.0), 177.8);
    }

    #[test]
    fn test_inches_carry_into_feet() {
        // 182.8 cm is 71.97 in, which rounds up to a whole 6 ft
        let split = cm_to_ft_in(182.8);
        assert_eq!((split.feet, split.inches), (6, 0.0));
        assert_eq!(split.to_string(), "6'0\"");

        let just_under = cm_to_ft_in(182.7);
        assert_eq!((just_under.feet, just_under.inches), (5, 11.9));
    }

    #[test]
    fn test_volume_conversions() {
        assert_eq!(liters_to_oz(1.0), 33.8);
        assert_eq!(liters_to_cups(2.0), 8.5);
        assert_eq!(oz_to_liters(33.814), 1.0);
        assert_eq!(cups_to_liters(4.227), 1.0);
        assert_eq!(liters_to_oz_with(2.7, 0), 91.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1648.5, 0), 1649.0);
        assert_eq!(round_to(116.6666, 2), 116.67);
        assert_eq!(round_to(2.25, 1), 2.3);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(kg_to_lb(f64::NAN).is_nan());
        assert!(ft_in_to_cm(f64::NAN, 0.0).is_nan());
    }

    // =========================================================================
    // Measurement Tests
    // =========================================================================

    #[test]
    fn test_measurement_conversion() {
        let m = Measurement::new(6.0, Unit::Ft).convert_to(Unit::Cm).unwrap();
        assert!((m.value - 182.88).abs() < 1e-9);

        let ml = Measurement::new(2.5, Unit::Liters).convert_to(Unit::Milliliters).unwrap();
        assert!((ml.value - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_measurement_rejects_other_dimension() {
        assert!(Measurement::new(70.0, Unit::Kg).convert_to(Unit::Cm).is_none());
        assert!(Measurement::new(60.0, Unit::Bpm).convert_to(Unit::Kcal).is_none());
    }

    #[test]
    fn test_measurement_display() {
        assert_eq!(Measurement::new(2.7, Unit::Liters).to_string(), "2.7 L");
        assert_eq!(
            Measurement::new(154.32, Unit::Lb).rounded(1).to_string(),
            "154.3 lb"
        );
    }

    #[test]
    fn test_feet_inches_display() {
        let height = FeetInches { feet: 5, inches: 7.0 };
        assert_eq!(height.to_string(), "5'7\"");
        assert_eq!(height.to_total_inches(), 67.0);
    }

    // =========================================================================
    // String Parsing Tests
    // =========================================================================

    #[test]
    fn test_unit_parsing() {
        assert_eq!("kg".parse::<Unit>().unwrap(), Unit::Kg);
        assert_eq!("lbs".parse::<Unit>().unwrap(), Unit::Lb);
        assert_eq!("L".parse::<Unit>().unwrap(), Unit::Liters);
        assert_eq!("mL".parse::<Unit>().unwrap(), Unit::Milliliters);
        assert_eq!("fl oz".parse::<Unit>().unwrap(), Unit::Oz);
        assert!("stone".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_system_parsing() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("nautical".parse::<UnitSystem>().is_err());
        assert_eq!(UnitSystem::Imperial.weight_unit(), Unit::Lb);
    }
}
