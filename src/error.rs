use chrono::NaiveDate;

/// Engine-level failures. Everything else the scorers can encounter is a
/// defined edge-case behavior, not an error.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("plate percentages must sum to 100, got {sum} (veg {vegetables_pct}, protein {protein_pct}, carbs {carbs_pct})")]
    InvalidPlate {
        vegetables_pct: i32,
        protein_pct: i32,
        carbs_pct: i32,
        sum: i32,
    },
    #[error("invalid period: end {end} is before start {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("recommendation classifier unavailable: {reason}")]
    MissingClassification { reason: String },
}
