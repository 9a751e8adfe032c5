use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod db;
mod engine;
mod error;
mod matcher;
mod models;
mod plate;
mod report;
mod schedule;
mod scores;
mod service;

use matcher::KeywordMatcher;
use models::Period;
use service::ComplianceService;

#[derive(Parser)]
#[command(name = "nutrition-compliance")]
#[command(about = "Nutrition adherence tracker: scores logged meals, water and new foods against a nutritionist's recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import water logs from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Run a compliance check for a user over a period
    Check {
        #[arg(long)]
        email: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Print the persisted JSON shape instead of the summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Ask whether a new compliance check is due
    Due {
        #[arg(long)]
        email: String,
        /// Evaluate as of this date instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Run a compliance check and write a markdown report
    Report {
        #[arg(long)]
        email: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List stored compliance checks for a user
    Checks {
        #[arg(long)]
        email: String,
    },
    /// Delete a stored compliance check
    DeleteCheck {
        #[arg(long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    let service = ComplianceService::new(pool.clone(), Box::new(KeywordMatcher));

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_water_csv(&pool, &csv).await?;
            println!("Inserted {inserted} water logs from {}.", csv.display());
        }
        Commands::Check {
            email,
            start,
            end,
            json,
        } => {
            let period = Period::new(start, end)?;
            let check = service
                .run_check(&email, period, Utc::now().date_naive())
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&check)?);
            } else {
                print_summary(&check);
            }
        }
        Commands::Due { email, today } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let status = service.due(&email, today).await?;
            println!("{}", status.message);
        }
        Commands::Report {
            email,
            start,
            end,
            out,
        } => {
            let period = Period::new(start, end)?;
            let check = service
                .run_check(&email, period, Utc::now().date_naive())
                .await?;
            let report = report::build_report(&email, &check);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Checks { email } => {
            let checks = service.list_checks(&email).await?;
            if checks.is_empty() {
                println!("No compliance checks stored for {email}.");
            } else {
                for check in checks {
                    println!(
                        "- {} checked {} for {} to {}: overall {:.1}",
                        check.id,
                        check.check_date,
                        check.period_start,
                        check.period_end,
                        check.overall_score
                    );
                }
            }
        }
        Commands::DeleteCheck { id } => {
            if service.delete_check(id).await? {
                println!("Deleted compliance check {id}.");
            } else {
                println!("No compliance check with id {id}.");
            }
        }
    }

    Ok(())
}

fn print_summary(check: &models::ComplianceCheck) {
    println!(
        "Compliance for {} to {} (checked {}):",
        check.period_start, check.period_end, check.check_date
    );
    println!("- Water intake: {:.0}", check.water_intake_score);
    println!("- New foods: {:.0}", check.new_foods_score);
    println!(
        "- Recommendations followed: {:.0}",
        check.recommendations_match_score
    );
    println!("- Healthy plates: {:.0}", check.healthy_plates_ratio_score);
    println!("- Overall: {:.1}", check.overall_score);
}
