use crate::models::{
    HealthyPlatesDetails, MatchOutcome, Meal, NewFoodEntry, NewFoodsDetails,
    RecommendationsMatchDetails, WaterDay, WaterIntakeDetails,
};
use crate::plate::{self, PlateTarget};

/// How many food entries the details payload keeps for display.
const FOODS_DISPLAY_LIMIT: usize = 10;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Water adherence over the period. `days` holds only the days that have a
/// log; every one of `total_days` counts toward the denominator, so missing
/// days drag both the score and the average down.
pub fn score_water(days: &[WaterDay], total_days: i64, goal_ml: i32) -> (f64, WaterIntakeDetails) {
    if total_days == 0 {
        return (
            0.0,
            WaterIntakeDetails {
                daily_avg_ml: 0.0,
                goal_ml,
                days_met_goal: 0,
                total_days: 0,
                percentage_days_met: 0.0,
            },
        );
    }

    let days_met_goal = days.iter().filter(|d| d.total_ml >= goal_ml).count() as i64;
    let total_ml: i64 = days.iter().map(|d| d.total_ml as i64).sum();
    let daily_avg_ml = round1(total_ml as f64 / total_days as f64);
    let percentage_days_met = round1(100.0 * days_met_goal as f64 / total_days as f64);
    let score = (100.0 * days_met_goal as f64 / total_days as f64).round();

    (
        score,
        WaterIntakeDetails {
            daily_avg_ml,
            goal_ml,
            days_met_goal,
            total_days,
            percentage_days_met,
        },
    )
}

/// Each new food tried is worth 10 points, capped at 100.
pub fn score_new_foods(entries: &[NewFoodEntry]) -> (f64, NewFoodsDetails) {
    let total_new_foods = entries.len();
    let score = (10 * total_new_foods).min(100) as f64;
    let foods = entries.iter().take(FOODS_DISPLAY_LIMIT).cloned().collect();

    (
        score,
        NewFoodsDetails {
            total_new_foods,
            foods,
        },
    )
}

/// Scores the externally-classified recommendation match. No recommendations
/// means nothing to violate, which scores 100.
pub fn score_recommendations(outcome: &MatchOutcome) -> (f64, RecommendationsMatchDetails) {
    let score = if outcome.total_recommendations == 0 {
        100.0
    } else {
        (100.0 * outcome.recommendations_followed as f64 / outcome.total_recommendations as f64)
            .round()
    };

    (
        score,
        RecommendationsMatchDetails {
            analysis: outcome.analysis.clone(),
            matched_items: outcome.matched_items.clone(),
            unmatched_items: outcome.unmatched_items.clone(),
            recommendations_followed: outcome.recommendations_followed,
            total_recommendations: outcome.total_recommendations,
        },
    )
}

/// Share of reported meals whose as-eaten plate matches the target split.
/// Zero reported meals scores 0: not logging meals is non-participation, not
/// vacuous compliance. A plate whose percentages do not sum to 100 drops its
/// meal from both counts.
pub fn score_healthy_plates(
    meals: &[Meal],
    target: PlateTarget,
    tolerance_pct: i32,
) -> (f64, HealthyPlatesDetails) {
    let mut total_reported_meals = 0usize;
    let mut healthy_meals = 0usize;

    for meal in meals {
        let Some(eaten) = meal.as_eaten_plate() else {
            continue;
        };
        match plate::classify(eaten, target, tolerance_pct) {
            Ok(healthy) => {
                total_reported_meals += 1;
                if healthy {
                    healthy_meals += 1;
                }
            }
            Err(err) => {
                tracing::warn!(meal_id = %meal.id, %err, "skipping meal with malformed plate");
            }
        }
    }

    let (score, ratio_percentage) = if total_reported_meals == 0 {
        (0.0, 0.0)
    } else {
        let ratio = 100.0 * healthy_meals as f64 / total_reported_meals as f64;
        (ratio.round(), round1(ratio))
    };

    (
        score,
        HealthyPlatesDetails {
            healthy_meals,
            total_reported_meals,
            ratio_percentage,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealType, Plate};
    use crate::plate::DEFAULT_TARGET;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(d: u32, ml: i32) -> WaterDay {
        WaterDay {
            date: NaiveDate::from_ymd_opt(2026, 3, d).unwrap(),
            total_ml: ml,
        }
    }

    fn food(name: &str) -> NewFoodEntry {
        NewFoodEntry {
            food_name: name.to_string(),
            difficulty_level: 3,
            notes: None,
        }
    }

    fn meal_with_plates(plates: Vec<Plate>) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            meal_type: MealType::Lunch,
            notes: None,
            plates,
        }
    }

    fn placeholder() -> Plate {
        Plate {
            is_placeholder: true,
            vegetables_pct: 50,
            protein_pct: 30,
            carbs_pct: 20,
        }
    }

    fn free_plate(veg: i32, protein: i32, carbs: i32) -> Plate {
        Plate {
            is_placeholder: false,
            vegetables_pct: veg,
            protein_pct: protein,
            carbs_pct: carbs,
        }
    }

    #[test]
    fn water_three_day_scenario() {
        let days = vec![day(1, 2000), day(2, 2500), day(3, 1800)];
        let (score, details) = score_water(&days, 3, 2000);
        assert_eq!(score, 67.0);
        assert_eq!(details.days_met_goal, 2);
        assert_eq!(details.total_days, 3);
        assert_eq!(details.daily_avg_ml, 2100.0);
    }

    #[test]
    fn water_missing_days_count_as_zero() {
        // 2 logged days out of a 4-day period
        let days = vec![day(1, 2000), day(3, 2200)];
        let (score, details) = score_water(&days, 4, 2000);
        assert_eq!(score, 50.0);
        assert_eq!(details.daily_avg_ml, 1050.0);
    }

    #[test]
    fn water_zero_day_period_scores_zero() {
        let (score, details) = score_water(&[], 0, 2000);
        assert_eq!(score, 0.0);
        assert_eq!(details.total_days, 0);
        assert_eq!(details.daily_avg_ml, 0.0);
    }

    #[test]
    fn water_score_monotonic_in_days_met() {
        let mut previous = -1.0;
        for met in 0..=7 {
            let days: Vec<WaterDay> = (1..=7)
                .map(|d| day(d, if (d as i64) <= met { 2000 } else { 500 }))
                .collect();
            let (score, _) = score_water(&days, 7, 2000);
            assert!(score >= previous, "score dropped at days_met={met}");
            previous = score;
        }
    }

    #[test]
    fn new_foods_ten_points_each() {
        let entries: Vec<NewFoodEntry> = (0..3).map(|i| food(&format!("food-{i}"))).collect();
        let (score, details) = score_new_foods(&entries);
        assert_eq!(score, 30.0);
        assert_eq!(details.total_new_foods, 3);
    }

    #[test]
    fn new_foods_caps_at_100() {
        for (n, expected) in [(0usize, 0.0), (10, 100.0), (15, 100.0)] {
            let entries: Vec<NewFoodEntry> =
                (0..n).map(|i| food(&format!("food-{i}"))).collect();
            let (score, _) = score_new_foods(&entries);
            assert_eq!(score, expected, "n={n}");
        }
    }

    #[test]
    fn new_foods_details_truncated_for_display() {
        let entries: Vec<NewFoodEntry> = (0..15).map(|i| food(&format!("food-{i}"))).collect();
        let (_, details) = score_new_foods(&entries);
        assert_eq!(details.total_new_foods, 15);
        assert_eq!(details.foods.len(), 10);
    }

    #[test]
    fn zero_recommendations_is_vacuously_compliant() {
        let outcome = MatchOutcome {
            recommendations_followed: 0,
            total_recommendations: 0,
            analysis: "no recommendations on file".to_string(),
            matched_items: vec![],
            unmatched_items: vec![],
        };
        let (score, _) = score_recommendations(&outcome);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn recommendations_score_rounds_ratio() {
        let outcome = MatchOutcome {
            recommendations_followed: 2,
            total_recommendations: 3,
            analysis: "followed 2 of 3".to_string(),
            matched_items: vec!["a".into(), "b".into()],
            unmatched_items: vec!["c".into()],
        };
        let (score, details) = score_recommendations(&outcome);
        assert_eq!(score, 67.0);
        assert_eq!(details.unmatched_items, vec!["c".to_string()]);
    }

    #[test]
    fn unreported_meals_are_not_counted() {
        let meals = vec![
            meal_with_plates(vec![placeholder()]),
            meal_with_plates(vec![placeholder(), free_plate(50, 30, 20)]),
        ];
        let (score, details) = score_healthy_plates(&meals, DEFAULT_TARGET, 10);
        assert_eq!(details.total_reported_meals, 1);
        assert_eq!(details.healthy_meals, 1);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn zero_reported_meals_scores_zero() {
        let meals = vec![meal_with_plates(vec![placeholder()])];
        let (score, details) = score_healthy_plates(&meals, DEFAULT_TARGET, 10);
        assert_eq!(score, 0.0);
        assert_eq!(details.ratio_percentage, 0.0);
    }

    #[test]
    fn last_free_plate_wins() {
        // earlier correction was unbalanced; the final plate is what counts
        let meals = vec![meal_with_plates(vec![
            placeholder(),
            free_plate(80, 10, 10),
            free_plate(50, 30, 20),
        ])];
        let (score, _) = score_healthy_plates(&meals, DEFAULT_TARGET, 10);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn malformed_plate_drops_meal_and_continues() {
        let meals = vec![
            meal_with_plates(vec![placeholder(), free_plate(50, 30, 30)]),
            meal_with_plates(vec![placeholder(), free_plate(50, 30, 20)]),
        ];
        let (score, details) = score_healthy_plates(&meals, DEFAULT_TARGET, 10);
        assert_eq!(details.total_reported_meals, 1);
        assert_eq!(score, 100.0);
    }
}
