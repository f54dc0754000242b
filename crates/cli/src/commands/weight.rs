use tapparelle_core::cpq::motor::required_power_tier;
use tapparelle_core::cpq::weight::estimate_weight;
use tapparelle_core::domain::material::Material;

use crate::commands::CommandResult;

/// Offline weight estimate and motor power tier for one shutter.
pub fn run(dimension: &str, material: &str) -> CommandResult {
    let weight = match estimate_weight(dimension, material) {
        Ok(weight) => weight,
        Err(error) => {
            return CommandResult::failure("weight", "invalid_input", error.to_string(), 2)
        }
    };

    let note = match Material::from_label(material) {
        Some(_) => "",
        None => " (materiale sconosciuto, densità predefinita)",
    };
    CommandResult::success(
        "weight",
        format!(
            "peso stimato {weight:.2} kg, potenza minima {} Nm{note}",
            required_power_tier(weight)
        ),
    )
}
