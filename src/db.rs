use anyhow::Context;
use chrono::{Duration, NaiveDate};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    ComplianceCheck, Meal, MealType, NewFoodEntry, Period, Plate, RecommendationCategory,
    RecommendationItem, UserSettings, WaterDay,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub settings: UserSettings,
}

pub async fn fetch_user(pool: &PgPool, email: &str) -> anyhow::Result<UserRecord> {
    let row = sqlx::query(
        "SELECT id, email, daily_water_goal_ml, check_cadence_days, plate_tolerance_pct \
         FROM nutrition_compliance.users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .with_context(|| format!("no user with email {email}"))?;

    Ok(UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        settings: UserSettings {
            daily_water_goal_ml: row.get("daily_water_goal_ml"),
            check_cadence_days: row.get::<i32, _>("check_cadence_days") as i64,
            plate_tolerance_pct: row.get("plate_tolerance_pct"),
        },
    })
}

/// Per-day water totals inside the period. Days without logs produce no row;
/// the scorer supplies the zeros.
pub async fn fetch_water_days(
    pool: &PgPool,
    user_id: Uuid,
    period: Period,
) -> anyhow::Result<Vec<WaterDay>> {
    let rows = sqlx::query(
        "SELECT logged_on, SUM(amount_ml)::BIGINT AS total_ml \
         FROM nutrition_compliance.water_logs \
         WHERE user_id = $1 AND logged_on BETWEEN $2 AND $3 \
         GROUP BY logged_on ORDER BY logged_on",
    )
    .bind(user_id)
    .bind(period.start)
    .bind(period.end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| WaterDay {
            date: row.get("logged_on"),
            total_ml: row.get::<i64, _>("total_ml") as i32,
        })
        .collect())
}

/// Meals in the period with their plates in position order.
pub async fn fetch_meals(
    pool: &PgPool,
    user_id: Uuid,
    period: Period,
) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query(
        "SELECT m.id AS meal_id, m.meal_type, m.eaten_on, m.notes, \
                p.is_placeholder, p.vegetables_pct, p.protein_pct, p.carbs_pct \
         FROM nutrition_compliance.meals m \
         JOIN nutrition_compliance.plates p ON p.meal_id = m.id \
         WHERE m.user_id = $1 AND m.eaten_on BETWEEN $2 AND $3 \
         ORDER BY m.eaten_on, m.id, p.position",
    )
    .bind(user_id)
    .bind(period.start)
    .bind(period.end)
    .fetch_all(pool)
    .await?;

    let mut meals: Vec<Meal> = Vec::new();
    for row in rows {
        let meal_id: Uuid = row.get("meal_id");
        let plate = Plate {
            is_placeholder: row.get("is_placeholder"),
            vegetables_pct: row.get("vegetables_pct"),
            protein_pct: row.get("protein_pct"),
            carbs_pct: row.get("carbs_pct"),
        };

        let appended = match meals.last_mut() {
            Some(last) if last.id == meal_id => {
                last.plates.push(plate);
                true
            }
            _ => false,
        };
        if !appended {
            let meal_type_raw: String = row.get("meal_type");
            let meal_type = MealType::parse(&meal_type_raw)
                .with_context(|| format!("unknown meal type {meal_type_raw}"))?;
            meals.push(Meal {
                id: meal_id,
                date: row.get("eaten_on"),
                meal_type,
                notes: row.get("notes"),
                plates: vec![plate],
            });
        }
    }

    Ok(meals)
}

/// New foods whose 7-day week overlaps the period.
pub async fn fetch_new_foods(
    pool: &PgPool,
    user_id: Uuid,
    period: Period,
) -> anyhow::Result<Vec<NewFoodEntry>> {
    let earliest_week_start = period.start - Duration::days(6);
    let rows = sqlx::query(
        "SELECT food_name, difficulty_level, notes \
         FROM nutrition_compliance.new_food_entries \
         WHERE user_id = $1 AND week_start >= $2 AND week_start <= $3 \
         ORDER BY week_start, food_name",
    )
    .bind(user_id)
    .bind(earliest_week_start)
    .bind(period.end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| NewFoodEntry {
            food_name: row.get("food_name"),
            difficulty_level: row.get("difficulty_level"),
            notes: row.get("notes"),
        })
        .collect())
}

pub async fn fetch_tracked_recommendations(
    pool: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Vec<RecommendationItem>> {
    let rows = sqlx::query(
        "SELECT id, text, category, tracked, target_value \
         FROM nutrition_compliance.recommendation_items \
         WHERE user_id = $1 AND tracked ORDER BY text",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut items = Vec::new();
    for row in rows {
        let category_raw: String = row.get("category");
        let category = RecommendationCategory::parse(&category_raw)
            .with_context(|| format!("unknown recommendation category {category_raw}"))?;
        items.push(RecommendationItem {
            id: row.get("id"),
            text: row.get("text"),
            category,
            tracked: row.get("tracked"),
            target_value: row.get("target_value"),
        });
    }

    Ok(items)
}

pub async fn last_check_date(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<NaiveDate>> {
    let row = sqlx::query(
        "SELECT MAX(check_date) AS last_check \
         FROM nutrition_compliance.compliance_checks WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("last_check"))
}

pub async fn insert_check(
    pool: &PgPool,
    user_id: Uuid,
    check: &ComplianceCheck,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO nutrition_compliance.compliance_checks
        (id, user_id, check_date, period_start, period_end,
         water_intake_score, water_intake_details,
         new_foods_score, new_foods_details,
         recommendations_match_score, recommendations_match_details,
         healthy_plates_ratio_score, healthy_plates_details,
         overall_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(check.id)
    .bind(user_id)
    .bind(check.check_date)
    .bind(check.period_start)
    .bind(check.period_end)
    .bind(check.water_intake_score)
    .bind(serde_json::to_value(&check.water_intake_details)?)
    .bind(check.new_foods_score)
    .bind(serde_json::to_value(&check.new_foods_details)?)
    .bind(check.recommendations_match_score)
    .bind(serde_json::to_value(&check.recommendations_match_details)?)
    .bind(check.healthy_plates_ratio_score)
    .bind(serde_json::to_value(&check.healthy_plates_details)?)
    .bind(check.overall_score)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_checks(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ComplianceCheck>> {
    let rows = sqlx::query(
        "SELECT id, check_date, period_start, period_end, \
                water_intake_score, water_intake_details, \
                new_foods_score, new_foods_details, \
                recommendations_match_score, recommendations_match_details, \
                healthy_plates_ratio_score, healthy_plates_details, \
                overall_score \
         FROM nutrition_compliance.compliance_checks \
         WHERE user_id = $1 ORDER BY check_date DESC, period_end DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut checks = Vec::new();
    for row in rows {
        checks.push(ComplianceCheck {
            id: row.get("id"),
            check_date: row.get("check_date"),
            period_start: row.get("period_start"),
            period_end: row.get("period_end"),
            water_intake_score: row.get("water_intake_score"),
            water_intake_details: serde_json::from_value(row.get("water_intake_details"))?,
            new_foods_score: row.get("new_foods_score"),
            new_foods_details: serde_json::from_value(row.get("new_foods_details"))?,
            recommendations_match_score: row.get("recommendations_match_score"),
            recommendations_match_details: serde_json::from_value(
                row.get("recommendations_match_details"),
            )?,
            healthy_plates_ratio_score: row.get("healthy_plates_ratio_score"),
            healthy_plates_details: serde_json::from_value(row.get("healthy_plates_details"))?,
            overall_score: row.get("overall_score"),
        });
    }

    Ok(checks)
}

pub async fn delete_check(pool: &PgPool, check_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM nutrition_compliance.compliance_checks WHERE id = $1")
        .bind(check_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let user_id = Uuid::parse_str("7b1c4e6a-8a92-4f4d-9d3a-5f0c2b9e1a44")?;
    sqlx::query(
        r#"
        INSERT INTO nutrition_compliance.users
        (id, full_name, email, daily_water_goal_ml, check_cadence_days, plate_tolerance_pct)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE
        SET full_name = EXCLUDED.full_name
        "#,
    )
    .bind(user_id)
    .bind("Noa Levi")
    .bind("noa.levi@example.com")
    .bind(2000)
    .bind(14)
    .bind(10)
    .execute(pool)
    .await?;

    let water = [
        ("seed-water-001", NaiveDate::from_ymd_opt(2026, 3, 1), 2100),
        ("seed-water-002", NaiveDate::from_ymd_opt(2026, 3, 2), 1700),
        ("seed-water-003", NaiveDate::from_ymd_opt(2026, 3, 3), 2400),
        ("seed-water-004", NaiveDate::from_ymd_opt(2026, 3, 5), 2000),
    ];
    for (source_key, logged_on, amount_ml) in water {
        sqlx::query(
            r#"
            INSERT INTO nutrition_compliance.water_logs
            (id, user_id, logged_on, amount_ml, source_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(logged_on.context("invalid date")?)
        .bind(amount_ml)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    // (meal id, type, date, notes, free plate veg/protein/carbs; None = still a placeholder-only slot)
    let meals = [
        (
            "3f0a7c1d-61b4-4a2e-9c3f-7e8d5a2b1c01",
            "lunch",
            NaiveDate::from_ymd_opt(2026, 3, 1),
            Some("Quinoa salad with roasted vegetables"),
            Some((50, 30, 20)),
        ),
        (
            "3f0a7c1d-61b4-4a2e-9c3f-7e8d5a2b1c02",
            "dinner",
            NaiveDate::from_ymd_opt(2026, 3, 2),
            Some("Pasta night"),
            Some((20, 20, 60)),
        ),
        (
            "3f0a7c1d-61b4-4a2e-9c3f-7e8d5a2b1c03",
            "breakfast",
            NaiveDate::from_ymd_opt(2026, 3, 3),
            None,
            None,
        ),
    ];
    for (meal_id, meal_type, eaten_on, notes, free_plate) in meals {
        let meal_id = Uuid::parse_str(meal_id)?;
        sqlx::query(
            r#"
            INSERT INTO nutrition_compliance.meals (id, user_id, meal_type, eaten_on, notes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(meal_type)
        .bind(eaten_on.context("invalid date")?)
        .bind(notes)
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO nutrition_compliance.plates
            (id, meal_id, position, is_placeholder, vegetables_pct, protein_pct, carbs_pct)
            VALUES ($1, $2, 0, TRUE, 50, 30, 20)
            ON CONFLICT (meal_id, position) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(meal_id)
        .execute(pool)
        .await?;

        if let Some((veg, protein, carbs)) = free_plate {
            sqlx::query(
                r#"
                INSERT INTO nutrition_compliance.plates
                (id, meal_id, position, is_placeholder, vegetables_pct, protein_pct, carbs_pct)
                VALUES ($1, $2, 1, FALSE, $3, $4, $5)
                ON CONFLICT (meal_id, position) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(meal_id)
            .bind(veg)
            .bind(protein)
            .bind(carbs)
            .execute(pool)
            .await?;
        }
    }

    let new_foods = [
        ("kohlrabi", 6, Some("Tried it raw, surprisingly good")),
        ("lentil stew", 3, None),
    ];
    let week_start = NaiveDate::from_ymd_opt(2026, 3, 1).context("invalid date")?;
    for (food_name, difficulty_level, notes) in new_foods {
        sqlx::query(
            r#"
            INSERT INTO nutrition_compliance.new_food_entries
            (id, user_id, week_start, food_name, difficulty_level, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, week_start, food_name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(week_start)
        .bind(food_name)
        .bind(difficulty_level)
        .bind(notes)
        .execute(pool)
        .await?;
    }

    let recommendations = [
        (
            "9e2b5d4c-7f1a-4b8e-a6c3-1d0f9e8b7a01",
            "Add quinoa to one lunch per week",
            "new_food",
            Some("quinoa"),
        ),
        (
            "9e2b5d4c-7f1a-4b8e-a6c3-1d0f9e8b7a02",
            "Eat fish twice a week",
            "habit",
            Some("fish"),
        ),
    ];
    for (id, text, category, target_value) in recommendations {
        sqlx::query(
            r#"
            INSERT INTO nutrition_compliance.recommendation_items
            (id, user_id, text, category, tracked, target_value)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(Uuid::parse_str(id)?)
        .bind(user_id)
        .bind(text)
        .bind(category)
        .bind(target_value)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Bulk water-log import. Users are upserted by email; rows with a repeated
/// source key are skipped, so re-importing the same file is safe.
pub async fn import_water_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        full_name: String,
        email: String,
        logged_on: NaiveDate,
        amount_ml: i32,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let user_id: Uuid = sqlx::query(
            r#"
            INSERT INTO nutrition_compliance.users (id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.full_name)
        .bind(&row.email)
        .fetch_one(pool)
        .await?
        .get("id");

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO nutrition_compliance.water_logs
            (id, user_id, logged_on, amount_ml, source_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(row.logged_on)
        .bind(row.amount_ml)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
