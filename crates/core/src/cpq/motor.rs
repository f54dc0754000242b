use rust_decimal::Decimal;

use crate::domain::product::Product;

/// Minimum motor power (Nm) required for a shutter of the given weight.
///
/// Step thresholds with strict comparisons: a shutter of exactly 80 kg still lands in the
/// 40 Nm tier.
pub fn required_power_tier(weight_kg: Decimal) -> u32 {
    if weight_kg > Decimal::from(80) {
        50
    } else if weight_kg > Decimal::from(60) {
        40
    } else if weight_kg > Decimal::from(40) {
        30
    } else {
        20
    }
}

/// Cheapest motor whose power reaches the required tier. Ties keep catalog order.
pub fn select_motor(weight_kg: Decimal, catalog_motors: &[Product]) -> Option<&Product> {
    cheapest_qualifying(required_power_tier(weight_kg), catalog_motors.iter())
}

/// Same as [`select_motor`], restricted to motors whose name mentions `brand`.
pub fn select_motor_by_brand<'a>(
    weight_kg: Decimal,
    brand: &str,
    catalog_motors: &'a [Product],
) -> Option<&'a Product> {
    let brand = brand.trim().to_lowercase();
    cheapest_qualifying(
        required_power_tier(weight_kg),
        catalog_motors.iter().filter(|motor| motor.name.to_lowercase().contains(&brand)),
    )
}

fn cheapest_qualifying<'a>(
    tier: u32,
    motors: impl Iterator<Item = &'a Product>,
) -> Option<&'a Product> {
    let mut best: Option<&Product> = None;
    for motor in motors {
        let Some(power_nm) = motor.power_nm() else {
            continue;
        };
        if power_nm < tier {
            continue;
        }
        if best.map(|current| motor.price < current.price).unwrap_or(true) {
            best = Some(motor);
        }
    }
    best
}
