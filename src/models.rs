use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Inclusive date range. Constructed through `new` so `end < start` is
/// rejected before any scoring happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if end < start {
            return Err(EngineError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One calendar day's total water intake. Days with no log never produce a
/// record; scorers treat them as 0 ml.
#[derive(Debug, Clone)]
pub struct WaterDay {
    pub date: NaiveDate,
    pub total_ml: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plate {
    pub is_placeholder: bool,
    pub vegetables_pct: i32,
    pub protein_pct: i32,
    pub carbs_pct: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }
}

/// A meal slot. Plates are ordered by position; the slot starts life with a
/// placeholder plate, and the meal counts as reported only once a
/// non-placeholder plate has been added.
#[derive(Debug, Clone)]
pub struct Meal {
    pub id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub notes: Option<String>,
    pub plates: Vec<Plate>,
}

impl Meal {
    /// The plate the user actually ate: the last non-placeholder plate.
    pub fn as_eaten_plate(&self) -> Option<&Plate> {
        self.plates.iter().rev().find(|p| !p.is_placeholder)
    }

    pub fn is_reported(&self) -> bool {
        self.as_eaten_plate().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFoodEntry {
    pub food_name: String,
    pub difficulty_level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    NewFood,
    Quantity,
    Habit,
    General,
}

impl RecommendationCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new_food" => Some(Self::NewFood),
            "quantity" => Some(Self::Quantity),
            "habit" => Some(Self::Habit),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationItem {
    pub id: Uuid,
    pub text: String,
    pub category: RecommendationCategory,
    pub tracked: bool,
    pub target_value: Option<String>,
}

/// Result of the external recommendation-matching collaborator for one
/// period. The engine consumes this as-is and never second-guesses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub recommendations_followed: usize,
    pub total_recommendations: usize,
    pub analysis: String,
    pub matched_items: Vec<String>,
    pub unmatched_items: Vec<String>,
}

/// Per-user knobs. Defaults mirror the schema defaults.
#[derive(Debug, Clone, Copy)]
pub struct UserSettings {
    pub daily_water_goal_ml: i32,
    pub check_cadence_days: i64,
    pub plate_tolerance_pct: i32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            daily_water_goal_ml: 2000,
            check_cadence_days: 14,
            plate_tolerance_pct: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterIntakeDetails {
    pub daily_avg_ml: f64,
    pub goal_ml: i32,
    pub days_met_goal: i64,
    pub total_days: i64,
    pub percentage_days_met: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFoodsDetails {
    pub total_new_foods: usize,
    pub foods: Vec<NewFoodEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsMatchDetails {
    pub analysis: String,
    pub matched_items: Vec<String>,
    pub unmatched_items: Vec<String>,
    pub recommendations_followed: usize,
    pub total_recommendations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthyPlatesDetails {
    pub healthy_meals: usize,
    pub total_reported_meals: usize,
    pub ratio_percentage: f64,
}

/// Pure engine output: the four sub-scores with their evidence, plus the
/// aggregate. No id or check date; the service adds those when persisting.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceReport {
    pub water_intake_score: f64,
    pub water_intake_details: WaterIntakeDetails,
    pub new_foods_score: f64,
    pub new_foods_details: NewFoodsDetails,
    pub recommendations_match_score: f64,
    pub recommendations_match_details: RecommendationsMatchDetails,
    pub healthy_plates_ratio_score: f64,
    pub healthy_plates_details: HealthyPlatesDetails,
    pub overall_score: f64,
}

/// Persisted compliance check. Serializes to the JSON shape the UI layer
/// consumes: snake_case fields, dates as YYYY-MM-DD, scores as 0-100 numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub id: Uuid,
    pub check_date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub water_intake_score: f64,
    pub water_intake_details: WaterIntakeDetails,
    pub new_foods_score: f64,
    pub new_foods_details: NewFoodsDetails,
    pub recommendations_match_score: f64,
    pub recommendations_match_details: RecommendationsMatchDetails,
    pub healthy_plates_ratio_score: f64,
    pub healthy_plates_details: HealthyPlatesDetails,
    pub overall_score: f64,
}

impl ComplianceCheck {
    pub fn from_report(
        id: Uuid,
        check_date: NaiveDate,
        period: Period,
        report: ComplianceReport,
    ) -> Self {
        Self {
            id,
            check_date,
            period_start: period.start,
            period_end: period.end,
            water_intake_score: report.water_intake_score,
            water_intake_details: report.water_intake_details,
            new_foods_score: report.new_foods_score,
            new_foods_details: report.new_foods_details,
            recommendations_match_score: report.recommendations_match_score,
            recommendations_match_details: report.recommendations_match_details,
            healthy_plates_ratio_score: report.healthy_plates_ratio_score,
            healthy_plates_details: report.healthy_plates_details,
            overall_score: report.overall_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_rejects_reversed_range() {
        let err = Period::new(date(2026, 3, 10), date(2026, 3, 1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod { .. }));
    }

    #[test]
    fn period_day_count_is_inclusive() {
        let period = Period::new(date(2026, 3, 1), date(2026, 3, 3)).unwrap();
        assert_eq!(period.day_count(), 3);
        let single = Period::new(date(2026, 3, 1), date(2026, 3, 1)).unwrap();
        assert_eq!(single.day_count(), 1);
    }

    #[test]
    fn last_non_placeholder_plate_is_the_eaten_one() {
        let meal = Meal {
            id: Uuid::nil(),
            date: date(2026, 3, 1),
            meal_type: MealType::Breakfast,
            notes: None,
            plates: vec![
                Plate {
                    is_placeholder: true,
                    vegetables_pct: 50,
                    protein_pct: 30,
                    carbs_pct: 20,
                },
                Plate {
                    is_placeholder: false,
                    vegetables_pct: 40,
                    protein_pct: 40,
                    carbs_pct: 20,
                },
            ],
        };
        assert!(meal.is_reported());
        assert_eq!(meal.as_eaten_plate().unwrap().vegetables_pct, 40);
    }

    #[test]
    fn check_serializes_to_the_ui_shape() {
        let period = Period::new(date(2026, 3, 1), date(2026, 3, 14)).unwrap();
        let report = ComplianceReport {
            water_intake_score: 67.0,
            water_intake_details: WaterIntakeDetails {
                daily_avg_ml: 2100.0,
                goal_ml: 2000,
                days_met_goal: 2,
                total_days: 3,
                percentage_days_met: 66.7,
            },
            new_foods_score: 20.0,
            new_foods_details: NewFoodsDetails {
                total_new_foods: 2,
                foods: vec![],
            },
            recommendations_match_score: 100.0,
            recommendations_match_details: RecommendationsMatchDetails {
                analysis: "nothing tracked".to_string(),
                matched_items: vec![],
                unmatched_items: vec![],
                recommendations_followed: 0,
                total_recommendations: 0,
            },
            healthy_plates_ratio_score: 50.0,
            healthy_plates_details: HealthyPlatesDetails {
                healthy_meals: 1,
                total_reported_meals: 2,
                ratio_percentage: 50.0,
            },
            overall_score: 59.3,
        };
        let check =
            ComplianceCheck::from_report(Uuid::nil(), date(2026, 3, 15), period, report);

        let value = serde_json::to_value(&check).unwrap();
        assert_eq!(value["period_start"], "2026-03-01");
        assert_eq!(value["period_end"], "2026-03-14");
        assert_eq!(value["check_date"], "2026-03-15");
        assert_eq!(value["water_intake_score"], 67.0);
        assert_eq!(value["water_intake_details"]["days_met_goal"], 2);
        assert_eq!(value["recommendations_match_score"], 100.0);
        assert_eq!(value["healthy_plates_details"]["healthy_meals"], 1);
        assert_eq!(value["overall_score"], 59.3);

        let back: ComplianceCheck = serde_json::from_value(value).unwrap();
        assert_eq!(back, check);
    }
}

