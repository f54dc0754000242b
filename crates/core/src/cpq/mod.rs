pub mod catalog;
pub mod motor;
pub mod pricing;
pub mod weight;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::errors::DomainError;

use self::{
    motor::{required_power_tier, select_motor, select_motor_by_brand},
    weight::estimate_weight,
};

/// Weight estimate, power tier and chosen motor for one shutter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorRecommendation {
    pub estimated_weight_kg: Decimal,
    pub required_power_nm: u32,
    pub motor: Option<Product>,
}

pub fn recommend_motor(
    dimension: &str,
    material: &str,
    brand: Option<&str>,
    catalog_motors: &[Product],
) -> Result<MotorRecommendation, DomainError> {
    let estimated_weight_kg = estimate_weight(dimension, material)?;
    let motor = match brand {
        Some(brand) => select_motor_by_brand(estimated_weight_kg, brand, catalog_motors),
        None => select_motor(estimated_weight_kg, catalog_motors),
    };

    Ok(MotorRecommendation {
        estimated_weight_kg,
        required_power_nm: required_power_tier(estimated_weight_kg),
        motor: motor.cloned(),
    })
}
