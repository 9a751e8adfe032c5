use crate::error::EngineError;
use crate::models::Plate;

/// Recommended macro split for a healthy plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateTarget {
    pub vegetables_pct: i32,
    pub protein_pct: i32,
    pub carbs_pct: i32,
}

/// The nutritionist-standard 50/30/20 split.
pub const DEFAULT_TARGET: PlateTarget = PlateTarget {
    vegetables_pct: 50,
    protein_pct: 30,
    carbs_pct: 20,
};

/// A plate is healthy iff each macro sits within `tolerance_pct` percentage
/// points of its target. Percentages that do not sum to 100 are a producer
/// bug and are rejected rather than normalized.
pub fn classify(
    plate: &Plate,
    target: PlateTarget,
    tolerance_pct: i32,
) -> Result<bool, EngineError> {
    let sum = plate.vegetables_pct + plate.protein_pct + plate.carbs_pct;
    if sum != 100 {
        return Err(EngineError::InvalidPlate {
            vegetables_pct: plate.vegetables_pct,
            protein_pct: plate.protein_pct,
            carbs_pct: plate.carbs_pct,
            sum,
        });
    }

    let healthy = (plate.vegetables_pct - target.vegetables_pct).abs() <= tolerance_pct
        && (plate.protein_pct - target.protein_pct).abs() <= tolerance_pct
        && (plate.carbs_pct - target.carbs_pct).abs() <= tolerance_pct;
    Ok(healthy)
}
