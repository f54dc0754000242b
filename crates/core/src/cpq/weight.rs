use rust_decimal::Decimal;

use crate::domain::dimension::Dimension;
use crate::domain::material::density_for_label;
use crate::errors::DomainError;

const CM_PER_M: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Estimated shutter weight in kg, rounded to two decimals.
///
/// Unknown materials fall back to
/// [`DEFAULT_DENSITY_KG_M2`](crate::domain::material::DEFAULT_DENSITY_KG_M2).
pub fn estimate_weight(dimension: &str, material: &str) -> Result<Decimal, DomainError> {
    let dimension = Dimension::parse(dimension)?;
    Ok(estimate_weight_for(&dimension, material))
}

pub fn estimate_weight_for(dimension: &Dimension, material: &str) -> Decimal {
    let width_m = Decimal::from(dimension.width_cm) / CM_PER_M;
    let height_m = Decimal::from(dimension.height_cm) / CM_PER_M;
    (width_m * height_m * density_for_label(material)).round_dp(2)
}
