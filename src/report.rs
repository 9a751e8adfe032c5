use std::fmt::Write;

use crate::models::ComplianceCheck;

pub fn build_report(user_label: &str, check: &ComplianceCheck) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Nutrition Compliance Report");
    let _ = writeln!(
        output,
        "Generated for {} covering {} to {} (checked {})",
        user_label, check.period_start, check.period_end, check.check_date
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall Score: {:.1} / 100", check.overall_score);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Water Intake: {:.0}", check.water_intake_score);
    let water = &check.water_intake_details;
    let _ = writeln!(
        output,
        "- Met the {} ml goal on {} of {} days ({:.1}%)",
        water.goal_ml, water.days_met_goal, water.total_days, water.percentage_days_met
    );
    let _ = writeln!(output, "- Daily average: {:.1} ml", water.daily_avg_ml);
    let _ = writeln!(output);

    let _ = writeln!(output, "## New Foods: {:.0}", check.new_foods_score);
    let foods = &check.new_foods_details;
    if foods.foods.is_empty() {
        let _ = writeln!(output, "No new foods tried this period.");
    } else {
        let _ = writeln!(output, "{} new foods tried:", foods.total_new_foods);
        for food in foods.foods.iter() {
            let _ = writeln!(
                output,
                "- {} (difficulty {}/10){}",
                food.food_name,
                food.difficulty_level,
                food.notes
                    .as_deref()
                    .map(|n| format!(": {n}"))
                    .unwrap_or_default()
            );
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(
        output,
        "## Recommendations Followed: {:.0}",
        check.recommendations_match_score
    );
    let recs = &check.recommendations_match_details;
    let _ = writeln!(output, "{}", recs.analysis);
    for item in recs.matched_items.iter() {
        let _ = writeln!(output, "- [followed] {item}");
    }
    for item in recs.unmatched_items.iter() {
        let _ = writeln!(output, "- [missed] {item}");
    }
    let _ = writeln!(output);

    let _ = writeln!(
        output,
        "## Healthy Plates: {:.0}",
        check.healthy_plates_ratio_score
    );
    let plates = &check.healthy_plates_details;
    if plates.total_reported_meals == 0 {
        let _ = writeln!(output, "No meals reported this period.");
    } else {
        let _ = writeln!(
            output,
            "- {} of {} reported meals matched the recommended plate ({:.1}%)",
            plates.healthy_meals, plates.total_reported_meals, plates.ratio_percentage
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        HealthyPlatesDetails, NewFoodEntry, NewFoodsDetails, RecommendationsMatchDetails,
        WaterIntakeDetails,
    };
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn sample_check() -> ComplianceCheck {
        ComplianceCheck {
            id: Uuid::nil(),
            check_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            period_start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
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
                foods: vec![NewFoodEntry {
                    food_name: "kohlrabi".to_string(),
                    difficulty_level: 6,
                    notes: None,
                }],
            },
            recommendations_match_score: 50.0,
            recommendations_match_details: RecommendationsMatchDetails {
                analysis: "Keyword match: 1 of 2 tracked recommendations found in 3 journal entries."
                    .to_string(),
                matched_items: vec!["Add quinoa to one lunch per week".to_string()],
                unmatched_items: vec!["Eat fish twice a week".to_string()],
                recommendations_followed: 1,
                total_recommendations: 2,
            },
            healthy_plates_ratio_score: 50.0,
            healthy_plates_details: HealthyPlatesDetails {
                healthy_meals: 1,
                total_reported_meals: 2,
                ratio_percentage: 50.0,
            },
            overall_score: 46.8,
        }
    }

    #[test]
    fn report_contains_every_section() {
        let report = build_report("Noa Levi", &sample_check());
        for heading in [
            "# Nutrition Compliance Report",
            "## Overall Score: 46.8 / 100",
            "## Water Intake: 67",
            "## New Foods: 20",
            "## Recommendations Followed: 50",
            "## Healthy Plates: 50",
        ] {
            assert!(report.contains(heading), "missing {heading:?}");
        }
    }

    #[test]
    fn matched_and_missed_items_are_listed() {
        let report = build_report("Noa Levi", &sample_check());
        assert!(report.contains("[followed] Add quinoa to one lunch per week"));
        assert!(report.contains("[missed] Eat fish twice a week"));
    }

    #[test]
    fn empty_sections_render_placeholders() {
        let mut check = sample_check();
        check.new_foods_details.foods.clear();
        check.healthy_plates_details = HealthyPlatesDetails {
            healthy_meals: 0,
            total_reported_meals: 0,
            ratio_percentage: 0.0,
        };
        let report = build_report("Noa Levi", &check);
        assert!(report.contains("No new foods tried this period."));
        assert!(report.contains("No meals reported this period."));
    }
}
