use crate::models::{
    ComplianceReport, MatchOutcome, Meal, NewFoodEntry, Period, UserSettings, WaterDay,
};
use crate::plate::DEFAULT_TARGET;
use crate::scores;

/// Everything the engine needs for one check. The service assembles this
/// from storage and the matcher; the engine never fetches anything itself.
#[derive(Debug, Clone)]
pub struct EngineInput {
    pub water_days: Vec<WaterDay>,
    pub meals: Vec<Meal>,
    pub new_foods: Vec<NewFoodEntry>,
    pub match_outcome: MatchOutcome,
}

/// Runs the four scorers and folds them into one report. Pure and
/// deterministic: identical inputs give bit-identical output.
pub fn evaluate(period: Period, input: &EngineInput, settings: &UserSettings) -> ComplianceReport {
    let (water_intake_score, water_intake_details) = scores::score_water(
        &input.water_days,
        period.day_count(),
        settings.daily_water_goal_ml,
    );
    let (new_foods_score, new_foods_details) = scores::score_new_foods(&input.new_foods);
    let (recommendations_match_score, recommendations_match_details) =
        scores::score_recommendations(&input.match_outcome);
    let (healthy_plates_ratio_score, healthy_plates_details) = scores::score_healthy_plates(
        &input.meals,
        DEFAULT_TARGET,
        settings.plate_tolerance_pct,
    );

    let overall = (water_intake_score
        + new_foods_score
        + recommendations_match_score
        + healthy_plates_ratio_score)
        / 4.0;
    let overall_score = (overall * 10.0).round() / 10.0;

    ComplianceReport {
        water_intake_score,
        water_intake_details,
        new_foods_score,
        new_foods_details,
        recommendations_match_score,
        recommendations_match_details,
        healthy_plates_ratio_score,
        healthy_plates_details,
        overall_score,
    }
}
