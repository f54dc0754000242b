//! Slot validators. Each one normalizes a raw user value for its slot or clears the slot
//! with a prompt asking the user to try again.

use serde::{Deserialize, Serialize};

use crate::cpq::recommend_motor;
use crate::domain::dimension::Dimension;
use crate::domain::material::{normalize_label, Material};
use crate::domain::product::Product;
use crate::domain::slots::{Slot, SlotContext};
use crate::errors::CatalogError;

pub const MOTOR_BRANDS: [&str; 4] = ["Somfy", "Nice", "Rollmatik", "Bubendorff"];

/// Intent that starts a motor quote; it must not be mistaken for a material answer.
pub const MOTOR_QUOTE_INTENT: &str = "generate_motor_quote";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValidation {
    pub slot: Slot,
    pub value: Option<String>,
    pub message: Option<String>,
}

impl SlotValidation {
    pub fn accepted(slot: Slot, value: impl Into<String>) -> Self {
        Self { slot, value: Some(value.into()), message: None }
    }

    pub fn rejected(slot: Slot, message: impl Into<String>) -> Self {
        Self { slot, value: None, message: Some(message.into()) }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_accepted(&self) -> bool {
        self.value.is_some()
    }
}

pub fn validate_dimension(raw: &str, _context: &SlotContext) -> SlotValidation {
    if !raw.contains('x') {
        return SlotValidation::rejected(
            Slot::Dimension,
            "Non ho capito le dimensioni. Puoi fornirle nel formato corretto? (es. 120x100)",
        );
    }

    match Dimension::parse(raw) {
        Ok(dimension) => SlotValidation::accepted(Slot::Dimension, dimension.to_string()),
        Err(_) => SlotValidation::rejected(
            Slot::Dimension,
            "Il formato delle dimensioni non è corretto. Usa il formato: larghezza x altezza (es. 120x100).",
        ),
    }
}

pub fn validate_material(raw: &str, context: &SlotContext) -> SlotValidation {
    if context.latest_intent.as_deref() == Some(MOTOR_QUOTE_INTENT) {
        return SlotValidation::rejected(
            Slot::Material,
            "Devo prima conoscere le dimensioni e il materiale della tapparella.",
        );
    }

    match Material::from_label(raw) {
        Some(material) => SlotValidation::accepted(Slot::Material, material.label()),
        None => SlotValidation::rejected(
            Slot::Material,
            format!(
                "Il materiale '{}' non è valido. Scegli tra: {}",
                raw.trim(),
                Material::labels().join(", ")
            ),
        ),
    }
}

/// `allowed` is the color set fetched for the material already in the context. An empty
/// set means the catalog has no color restrictions for that material.
pub fn validate_color(
    raw: &str,
    context: &SlotContext,
    allowed: Result<&[String], &CatalogError>,
) -> SlotValidation {
    let color = normalize_label(raw);
    if color.is_empty() {
        return SlotValidation::rejected(Slot::Color, "Per favore, scegli un colore valido.");
    }

    let allowed = match allowed {
        Ok(allowed) => allowed,
        Err(_) => {
            return SlotValidation::rejected(
                Slot::Color,
                "Non riesco a verificare i colori disponibili in questo momento. Puoi ripetere il colore tra poco?",
            )
        }
    };

    if allowed.is_empty() || allowed.iter().any(|candidate| normalize_label(candidate) == color) {
        return SlotValidation::accepted(Slot::Color, color);
    }

    let material = context.get(Slot::Material).unwrap_or("il materiale scelto");
    SlotValidation::rejected(
        Slot::Color,
        format!(
            "Il colore '{color}' non è disponibile per {material}. Colori disponibili: {}",
            allowed.join(", ")
        ),
    )
}

/// Picks the first known motor brand mentioned in free text.
pub fn validate_motor(raw: &str, _context: &SlotContext) -> SlotValidation {
    let brand = raw.split_whitespace().find_map(|token| {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        MOTOR_BRANDS.iter().find(|brand| brand.eq_ignore_ascii_case(token))
    });

    match brand {
        Some(brand) => SlotValidation::accepted(Slot::Motor, *brand),
        None => SlotValidation::rejected(
            Slot::Motor,
            format!(
                "Non ho capito quale motore vuoi. Puoi specificare uno tra {}?",
                MOTOR_BRANDS.join(", ")
            ),
        ),
    }
}

/// Best-fit motor for the dimension and material already collected.
pub fn suggest_motor(context: &SlotContext, catalog_motors: &[Product]) -> SlotValidation {
    let not_found = || {
        SlotValidation::rejected(
            Slot::Motor,
            "Non ho trovato un motore adatto. Puoi specificare una preferenza?",
        )
    };

    let Some(dimension) = context.get(Slot::Dimension) else {
        return not_found();
    };
    let material = context.get(Slot::Material).unwrap_or_default();

    match recommend_motor(dimension, material, None, catalog_motors) {
        Ok(recommendation) => match recommendation.motor {
            Some(motor) => {
                let message = format!(
                    "Ti consiglio il motore {} con {}Nm di potenza.",
                    motor.name,
                    motor.power_nm().unwrap_or(recommendation.required_power_nm)
                );
                SlotValidation::accepted(Slot::Motor, motor.name).with_message(message)
            }
            None => not_found(),
        },
        Err(_) => not_found(),
    }
}

pub fn validate_button(raw: &str, _context: &SlotContext) -> SlotValidation {
    let button = raw.trim();
    if button.is_empty() {
        return SlotValidation::rejected(
            Slot::Button,
            "Non ho capito la scelta del pulsante, puoi ripetere?",
        );
    }
    SlotValidation::accepted(Slot::Button, button)
        .with_message(format!("È stato selezionato: {button}"))
}
