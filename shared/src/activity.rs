//! Activity energy expenditure and fat-burn projections
//!
//! MET-based session energy estimates for the supported activities, with a
//! linear speed/intensity adjustment around each activity's baseline pace,
//! plus time-to-goal projection for a target fat burn.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::energy::{mifflin_st_jeor, BiologicalSex};
use crate::errors::CalcError;
use crate::units::{inches_to_cm, kmh_to_mph, lbs_to_kg, miles_to_km, UnitSystem};

/// Energy equivalent of one pound of body fat
pub const KCAL_PER_LB: f64 = 3500.0;
/// Adjusted MET never drops below resting level
const MIN_ADJUSTED_MET: f64 = 1.0;
const DAYS_PER_WEEK: f64 = 7.0;

// ============================================================================
// Activities and MET Profiles
// ============================================================================

/// Supported activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Walking,
    Running,
    Cycling,
    Swimming,
    Elliptical,
    StairMaster,
    Rowing,
    Hiking,
    WeightTraining,
    Yoga,
}

impl FromStr for Activity {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walking" => Ok(Activity::Walking),
            "running" => Ok(Activity::Running),
            "cycling" => Ok(Activity::Cycling),
            "swimming" => Ok(Activity::Swimming),
            "elliptical" => Ok(Activity::Elliptical),
            "stairmaster" | "stair_master" => Ok(Activity::StairMaster),
            "rowing" => Ok(Activity::Rowing),
            "hiking" => Ok(Activity::Hiking),
            "weighttraining" | "weight_training" => Ok(Activity::WeightTraining),
            "yoga" => Ok(Activity::Yoga),
            _ => Err(CalcError::UnknownActivity),
        }
    }
}

/// MET profile: base value at the baseline pace, with a linear slope per mph
/// (or per intensity level for stationary activities).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetProfile {
    pub base_met: f64,
    pub baseline: f64,
    pub slope: f64,
}

impl Activity {
    /// Compendium-anchored MET profile for this activity
    pub fn met_profile(&self) -> MetProfile {
        match self {
            Activity::Walking => MetProfile { base_met: 3.5, baseline: 2.0, slope: 0.3 },
            Activity::Running => MetProfile { base_met: 8.0, baseline: 5.0, slope: 0.8 },
            Activity::Cycling => MetProfile { base_met: 7.5, baseline: 12.0, slope: 0.4 },
            Activity::Swimming => MetProfile { base_met: 6.0, baseline: 2.0, slope: 1.2 },
            Activity::Elliptical => MetProfile { base_met: 5.0, baseline: 5.0, slope: 0.3 },
            Activity::StairMaster => MetProfile { base_met: 9.0, baseline: 5.0, slope: 0.4 },
            Activity::Rowing => MetProfile { base_met: 7.0, baseline: 5.0, slope: 0.5 },
            Activity::Hiking => MetProfile { base_met: 6.0, baseline: 2.0, slope: 0.4 },
            Activity::WeightTraining => MetProfile { base_met: 3.5, baseline: 5.0, slope: 0.25 },
            Activity::Yoga => MetProfile { base_met: 2.5, baseline: 5.0, slope: 0.15 },
        }
    }

    /// Whether speed doubles as pace over ground; only these activities
    /// report a per-session distance.
    pub fn has_distance(&self) -> bool {
        matches!(
            self,
            Activity::Walking | Activity::Running | Activity::Cycling | Activity::Swimming
        )
    }

    /// Linear MET adjustment around the baseline, floored at resting level.
    pub fn adjusted_met(&self, speed_mph: f64) -> f64 {
        let profile = self.met_profile();
        (profile.base_met + profile.slope * (speed_mph - profile.baseline)).max(MIN_ADJUSTED_MET)
    }
}

// ============================================================================
// Energy Calculations
// ============================================================================

/// Resting energy expenditure in kcal/day (Mifflin-St Jeor).
pub fn calculate_resting_energy_expenditure(
    sex: BiologicalSex,
    age: i32,
    weight_kg: f64,
    height_cm: f64,
) -> Result<f64, CalcError> {
    if !(1..=120).contains(&age) {
        return Err(CalcError::invalid("Age must be between 1 and 120 years"));
    }
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return Err(CalcError::invalid("Weight must be greater than 0"));
    }
    if height_cm.is_nan() || height_cm <= 0.0 {
        return Err(CalcError::invalid("Height must be greater than 0"));
    }
    Ok(mifflin_st_jeor(sex, age, weight_kg, height_cm))
}

/// Session energy: adjusted MET × weight(kg) × duration(h).
pub fn activity_energy_expenditure(
    activity: Activity,
    speed_mph: f64,
    weight_kg: f64,
    duration_minutes: f64,
) -> Result<f64, CalcError> {
    if speed_mph.is_nan() || speed_mph <= 0.0 {
        return Err(CalcError::invalid("Speed must be greater than 0"));
    }
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return Err(CalcError::invalid("Weight must be greater than 0"));
    }
    if duration_minutes.is_nan() || duration_minutes <= 0.0 {
        return Err(CalcError::invalid("Duration must be greater than 0"));
    }
    Ok(activity.adjusted_met(speed_mph) * weight_kg * duration_minutes / 60.0)
}

/// Weeks and days until a burn goal is met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeToGoal {
    pub weeks: u32,
    pub days: u32,
}

/// Project time to burn `burn_goal_lb` of fat at `frequency_per_week`
/// sessions. Weeks floor against the weekly burn; days ceil against the
/// daily burn. The two are derived independently, not days-from-weeks.
pub fn time_to_reach_goal(
    burn_goal_lb: f64,
    session_burn_kcal: f64,
    frequency_per_week: f64,
) -> Result<TimeToGoal, CalcError> {
    if burn_goal_lb.is_nan() || burn_goal_lb <= 0.0 {
        return Err(CalcError::invalid("Burn goal must be greater than 0"));
    }
    if session_burn_kcal.is_nan() || session_burn_kcal <= 0.0 {
        return Err(CalcError::invalid("Session burn must be greater than 0"));
    }
    if frequency_per_week.is_nan() || frequency_per_week <= 0.0 {
        return Err(CalcError::invalid("Frequency must be greater than 0"));
    }
    let goal_kcal = burn_goal_lb * KCAL_PER_LB;
    let weekly_burn = session_burn_kcal * frequency_per_week;
    let daily_burn = weekly_burn / DAYS_PER_WEEK;
    Ok(TimeToGoal {
        weeks: (goal_kcal / weekly_burn).floor() as u32,
        days: (goal_kcal / daily_burn).ceil() as u32,
    })
}

// ============================================================================
// Orchestration
// ============================================================================

/// Raw form values for the body-fat-burn calculator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BodyFatBurnInput {
    pub sex: BiologicalSex,
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120 years"))]
    pub age: i32,
    /// Weight in kg (metric) or lb (imperial)
    #[validate(range(min = 0.001, message = "Weight must be greater than 0"))]
    pub weight: f64,
    /// Height in cm (metric) or total inches (imperial)
    #[validate(range(min = 0.001, message = "Height must be greater than 0"))]
    pub height: f64,
    #[serde(default)]
    pub units: UnitSystem,
    pub activity: Activity,
    /// Speed in mph (imperial) or km/h (metric) for distance activities;
    /// intensity level for stationary ones (unit-independent)
    #[validate(range(min = 0.001, message = "Speed must be greater than 0"))]
    pub speed: f64,
    #[validate(range(min = 1.0, max = 1440.0, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration_minutes: f64,
    #[validate(range(min = 1.0, max = 14.0, message = "Frequency must be between 1 and 14 sessions per week"))]
    pub frequency_per_week: f64,
    #[validate(range(min = 0.1, max = 500.0, message = "Burn goal must be between 0.1 and 500 lb"))]
    pub burn_goal_lb: f64,
}

/// Aggregate result of the body-fat-burn calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatBurnResult {
    /// Resting energy expenditure, kcal/day
    pub resting_energy_expenditure: f64,
    /// Energy burned per session, kcal
    pub activity_energy_expenditure: f64,
    /// Energy burned per week, kcal
    pub weekly_burn: f64,
    /// Distance covered per session, km (metric) or miles (imperial);
    /// 0 for stationary activities
    pub distance_per_session: f64,
    pub time_to_reach_goal: TimeToGoal,
}

/// Full burn pipeline: unit conversion → REE → session energy → distance →
/// time to goal. Failures are logged and re-raised.
pub fn process_body_fat_burn(input: &BodyFatBurnInput) -> Result<BodyFatBurnResult, CalcError> {
    burn_pipeline(input).map_err(|err| {
        tracing::error!(%err, "body fat burn calculation failed");
        err
    })
}

fn burn_pipeline(input: &BodyFatBurnInput) -> Result<BodyFatBurnResult, CalcError> {
    input.validate()?;
    let (weight_kg, height_cm) = match input.units {
        UnitSystem::Metric => (input.weight, input.height),
        UnitSystem::Imperial => (lbs_to_kg(input.weight), inches_to_cm(input.height)),
    };
    // Intensity levels for stationary activities are not speeds and are
    // never converted.
    let speed_mph = if input.activity.has_distance() && input.units.is_metric() {
        kmh_to_mph(input.speed)
    } else {
        input.speed
    };
    let resting_energy_expenditure =
        calculate_resting_energy_expenditure(input.sex, input.age, weight_kg, height_cm)?;
    let session_burn = activity_energy_expenditure(
        input.activity,
        speed_mph,
        weight_kg,
        input.duration_minutes,
    )?;
    let distance_miles = if input.activity.has_distance() {
        speed_mph * input.duration_minutes / 60.0
    } else {
        0.0
    };
    let distance_per_session = match input.units {
        UnitSystem::Metric => miles_to_km(distance_miles),
        UnitSystem::Imperial => distance_miles,
    };
    let time_to_reach_goal =
        time_to_reach_goal(input.burn_goal_lb, session_burn, input.frequency_per_week)?;
    Ok(BodyFatBurnResult {
        resting_energy_expenditure,
        activity_energy_expenditure: session_burn,
        weekly_burn: session_burn * input.frequency_per_week,
        distance_per_session,
        time_to_reach_goal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    // =========================================================================
    // MET Tests
    // =========================================================================

    #[test]
    fn test_running_met_adjustment() {
        // Base 8.0 at 5 mph, +0.8 per mph above
        assert!((Activity::Running.adjusted_met(5.0) - 8.0).abs() < 1e-9);
        assert!((Activity::Running.adjusted_met(7.0) - 9.6).abs() < 1e-9);
        assert!((Activity::Running.adjusted_met(4.0) - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_walking_met_adjustment() {
        // Base 3.5 at 2 mph, +0.3 per mph above
        assert!((Activity::Walking.adjusted_met(2.0) - 3.5).abs() < 1e-9);
        assert!((Activity::Walking.adjusted_met(4.0) - 4.1).abs() < 1e-9);
    }

    #[test]
    fn test_met_floors_at_resting() {
        // Slowing down lowers MET, but never below resting level
        assert!((Activity::Yoga.adjusted_met(0.1) - 1.765).abs() < 1e-9);
        assert!((Activity::Walking.adjusted_met(0.1) - 2.93).abs() < 1e-9);
        assert_eq!(Activity::Yoga.adjusted_met(-100.0), MIN_ADJUSTED_MET);
    }

    #[test]
    fn test_distance_semantics() {
        assert!(Activity::Walking.has_distance());
        assert!(Activity::Running.has_distance());
        assert!(Activity::Cycling.has_distance());
        assert!(Activity::Swimming.has_distance());
        assert!(!Activity::Elliptical.has_distance());
        assert!(!Activity::WeightTraining.has_distance());
        assert!(!Activity::Yoga.has_distance());
    }

    #[rstest]
    #[case("running", Activity::Running)]
    #[case("stair_master", Activity::StairMaster)]
    #[case("stairMaster", Activity::StairMaster)]
    #[case("weight_training", Activity::WeightTraining)]
    fn test_activity_parsing(#[case] name: &str, #[case] expected: Activity) {
        assert_eq!(name.parse::<Activity>().unwrap(), expected);
    }

    #[test]
    fn test_invalid_activity_name() {
        let err = "parkour".parse::<Activity>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid activity selected");
    }

    // =========================================================================
    // Energy Tests
    // =========================================================================

    #[test]
    fn test_resting_energy_expenditure() {
        let ree = calculate_resting_energy_expenditure(BiologicalSex::Male, 30, 70.0, 175.0)
            .unwrap();
        assert!((ree - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn test_session_energy() {
        // Running at 6 mph: MET 8.8; 70kg for 30 min -> 8.8 * 70 * 0.5 = 308
        let burn = activity_energy_expenditure(Activity::Running, 6.0, 70.0, 30.0).unwrap();
        assert!((burn - 308.0).abs() < 1e-9);
    }

    #[test]
    fn test_session_energy_rejects_bad_arguments() {
        assert!(activity_energy_expenditure(Activity::Running, 0.0, 70.0, 30.0).is_err());
        assert!(activity_energy_expenditure(Activity::Running, 6.0, -70.0, 30.0).is_err());
        assert!(activity_energy_expenditure(Activity::Running, 6.0, 70.0, 0.0).is_err());
    }

    #[test]
    fn test_time_to_reach_goal_independent_derivations() {
        // 2 lb goal = 7000 kcal; 500 kcal/session, 3x/week -> 1500/week
        let goal = time_to_reach_goal(2.0, 500.0, 3.0).unwrap();
        // weeks: floor(7000/1500) = 4
        assert_eq!(goal.weeks, 4);
        // days: ceil(7000 / (1500/7)) = ceil(32.67) = 33, not 4*7+...
        assert_eq!(goal.days, 33);
    }

    #[test]
    fn test_time_to_reach_goal_exact_division() {
        // 1 lb = 3500 kcal; 500/session, 7x/week -> exactly 1 week / 7 days
        let goal = time_to_reach_goal(1.0, 500.0, 7.0).unwrap();
        assert_eq!(goal.weeks, 1);
        assert_eq!(goal.days, 7);
    }

    // =========================================================================
    // Orchestration Tests
    // =========================================================================

    fn running_input() -> BodyFatBurnInput {
        BodyFatBurnInput {
            sex: BiologicalSex::Male,
            age: 30,
            weight: 70.0,
            height: 175.0,
            units: UnitSystem::Metric,
            activity: Activity::Running,
            speed: 9.65606, // km/h, = 6 mph
            duration_minutes: 30.0,
            frequency_per_week: 3.0,
            burn_goal_lb: 2.0,
        }
    }

    #[test]
    fn test_process_body_fat_burn() {
        let result = process_body_fat_burn(&running_input()).unwrap();
        assert!((result.resting_energy_expenditure - 1648.75).abs() < 1e-9);
        assert!((result.activity_energy_expenditure - 308.0).abs() < 0.01);
        assert!((result.weekly_burn - 924.0).abs() < 0.05);
        // 6 mph for 30 min = 3 miles = 4.83 km, reported in km for metric
        assert!((result.distance_per_session - 4.828).abs() < 0.01);
    }

    #[test]
    fn test_process_unit_equivalence() {
        let metric = process_body_fat_burn(&running_input()).unwrap();
        let imperial = process_body_fat_burn(&BodyFatBurnInput {
            weight: 154.324,
            height: 68.8976,
            units: UnitSystem::Imperial,
            speed: 6.0,
            ..running_input()
        })
        .unwrap();
        assert!((metric.activity_energy_expenditure - imperial.activity_energy_expenditure).abs() < 0.5);
        assert_eq!(metric.time_to_reach_goal, imperial.time_to_reach_goal);
        // Distances describe the same ground covered
        assert!((metric.distance_per_session - miles_to_km(imperial.distance_per_session)).abs() < 0.01);
    }

    #[test]
    fn test_stationary_activity_reports_zero_distance() {
        let result = process_body_fat_burn(&BodyFatBurnInput {
            activity: Activity::Elliptical,
            speed: 5.0, // intensity level, not a pace
            ..running_input()
        })
        .unwrap();
        assert_eq!(result.distance_per_session, 0.0);
    }

    #[test]
    fn test_process_rejects_out_of_range_duration() {
        let err = process_body_fat_burn(&BodyFatBurnInput {
            duration_minutes: 2000.0,
            ..running_input()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duration must be between 1 and 1440 minutes"
        );
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: adjusted MET never drops below resting level
        #[test]
        fn prop_met_floor(speed in 0.1f64..30.0) {
            for activity in [
                Activity::Walking, Activity::Running, Activity::Cycling,
                Activity::Swimming, Activity::Elliptical, Activity::StairMaster,
                Activity::Rowing, Activity::Hiking, Activity::WeightTraining,
                Activity::Yoga,
            ] {
                prop_assert!(activity.adjusted_met(speed) >= MIN_ADJUSTED_MET);
            }
        }

        /// Property: session energy scales linearly with duration
        #[test]
        fn prop_energy_scales_with_duration(
            speed in 1.0f64..15.0,
            weight in 40.0f64..150.0,
            minutes in 10.0f64..120.0
        ) {
            let single = activity_energy_expenditure(Activity::Running, speed, weight, minutes).unwrap();
            let double = activity_energy_expenditure(Activity::Running, speed, weight, minutes * 2.0).unwrap();
            prop_assert!((double - single * 2.0).abs() < 1e-6);
        }

        /// Property: days and weeks stay consistent (days covers at least
        /// the flooring gap of weeks)
        #[test]
        fn prop_time_to_goal_consistent(
            goal_lb in 0.1f64..100.0,
            session in 100.0f64..1000.0,
            frequency in 1.0f64..14.0
        ) {
            let t = time_to_reach_goal(goal_lb, session, frequency).unwrap();
            prop_assert!(t.days as f64 >= t.weeks as f64 * DAYS_PER_WEEK);
        }
    }
}
