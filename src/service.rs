use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::engine::{self, EngineInput};
use crate::matcher::RecommendationMatcher;
use crate::models::{ComplianceCheck, MatchOutcome, Meal, NewFoodEntry, Period, RecommendationItem};
use crate::schedule::{self, DueStatus};

/// Boundary orchestration: storage and the matching collaborator on one
/// side, the pure engine on the other.
pub struct ComplianceService {
    pool: PgPool,
    matcher: Box<dyn RecommendationMatcher + Send + Sync>,
}

impl ComplianceService {
    pub fn new(pool: PgPool, matcher: Box<dyn RecommendationMatcher + Send + Sync>) -> Self {
        Self { pool, matcher }
    }

    /// Runs a full compliance check for the user and persists the result.
    /// `check_date` is injected by the caller so the run is reproducible.
    pub async fn run_check(
        &self,
        email: &str,
        period: Period,
        check_date: NaiveDate,
    ) -> anyhow::Result<ComplianceCheck> {
        let user = db::fetch_user(&self.pool, email).await?;
        let water_days = db::fetch_water_days(&self.pool, user.id, period).await?;
        let meals = db::fetch_meals(&self.pool, user.id, period).await?;
        let new_foods = db::fetch_new_foods(&self.pool, user.id, period).await?;
        let recommendations = db::fetch_tracked_recommendations(&self.pool, user.id).await?;

        let journal = journal_entries(&meals, &new_foods);
        let match_outcome = match self.matcher.match_recommendations(&recommendations, &journal) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(user = %user.email, %err, "recommendation matcher failed; scoring that factor 0");
                unavailable_outcome(&recommendations, &err.to_string())
            }
        };

        let input = EngineInput {
            water_days,
            meals,
            new_foods,
            match_outcome,
        };
        let report = engine::evaluate(period, &input, &user.settings);
        let check = ComplianceCheck::from_report(Uuid::new_v4(), check_date, period, report);
        db::insert_check(&self.pool, user.id, &check).await?;

        tracing::info!(
            user = %user.email,
            overall = check.overall_score,
            period_start = %period.start,
            period_end = %period.end,
            "compliance check stored"
        );
        Ok(check)
    }

    /// Is a new check due for this user as of `today`?
    pub async fn due(&self, email: &str, today: NaiveDate) -> anyhow::Result<DueStatus> {
        let user = db::fetch_user(&self.pool, email).await?;
        let last_check = db::last_check_date(&self.pool, user.id).await?;
        Ok(schedule::evaluate(
            last_check,
            today,
            user.settings.check_cadence_days,
        ))
    }

    pub async fn list_checks(&self, email: &str) -> anyhow::Result<Vec<ComplianceCheck>> {
        let user = db::fetch_user(&self.pool, email).await?;
        db::list_checks(&self.pool, user.id).await
    }

    pub async fn delete_check(&self, check_id: Uuid) -> anyhow::Result<bool> {
        db::delete_check(&self.pool, check_id).await
    }
}

/// Free text the matcher compares recommendation targets against: meal
/// notes plus new-food names and notes.
fn journal_entries(meals: &[Meal], new_foods: &[NewFoodEntry]) -> Vec<String> {
    let mut entries: Vec<String> = meals
        .iter()
        .filter_map(|meal| meal.notes.clone())
        .collect();
    for food in new_foods {
        entries.push(food.food_name.clone());
        if let Some(notes) = &food.notes {
            entries.push(notes.clone());
        }
    }
    entries
}

/// Fallback outcome when the classifier is unavailable: the factor scores 0
/// with the failure spelled out in the analysis, never a guessed number.
fn unavailable_outcome(recommendations: &[RecommendationItem], reason: &str) -> MatchOutcome {
    MatchOutcome {
        recommendations_followed: 0,
        total_recommendations: recommendations.len(),
        analysis: format!(
            "Recommendation classifier unavailable ({reason}); this factor was scored 0 and should be re-run."
        ),
        matched_items: vec![],
        unmatched_items: recommendations.iter().map(|r| r.text.clone()).collect(),
    }
}
