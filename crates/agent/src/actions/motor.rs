use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use tapparelle_core::cpq::catalog::CatalogSource;
use tapparelle_core::cpq::motor::{required_power_tier, select_motor};
use tapparelle_core::cpq::pricing::format_eur;
use tapparelle_core::cpq::weight::estimate_weight_for;
use tapparelle_core::domain::dimension::Dimension;
use tapparelle_core::domain::slots::{Slot, SlotContext};
use tapparelle_core::errors::ApplicationError;

use crate::actions::Action;
use crate::events::{ActionResponse, Button, DialogueEvent};

/// Motor-only quote: estimated weight, power tier and the cheapest qualifying motor.
pub struct GenerateMotorQuote {
    catalog: Arc<dyn CatalogSource>,
}

impl GenerateMotorQuote {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Action for GenerateMotorQuote {
    fn name(&self) -> &'static str {
        "action_generate_motor_quote"
    }

    async fn run(&self, context: &SlotContext) -> Result<ActionResponse, ApplicationError> {
        let (Some(dimension), Some(material)) =
            (context.get(Slot::Dimension), context.get(Slot::Material))
        else {
            return Ok(ActionResponse::message(
                "Mi servono le dimensioni e il materiale della tapparella per calcolare il preventivo.",
            ));
        };

        let parsed = Dimension::parse(dimension)?;
        let weight = estimate_weight_for(&parsed, material);
        let tier = required_power_tier(weight);
        let motors = self.catalog.motors(tier).await?;

        let Some(motor) = select_motor(weight, &motors) else {
            return Err(ApplicationError::NoMatchFound { item: "motore".to_owned() });
        };

        info!(
            event_name = "quote.motor_selected",
            dimension = %parsed,
            material,
            estimated_weight_kg = %weight,
            required_power_nm = tier,
            motor = %motor.name,
            "motor selected for quote"
        );

        let mut response = ActionResponse::default();
        response
            .emit(DialogueEvent::set(Slot::Motor, motor.name.clone()))
            .say(format!(
                "Preventivo per il motore\nDimensioni: {parsed}\nMateriale: {material}\nPeso stimato: {weight:.2} kg\nMotore: {} - {}",
                motor.name,
                format_eur(motor.price)
            ))
            .say_with_buttons(
                "Vuoi confermare questo motore o preferisci vederne altri?",
                vec![
                    Button::new("Sì, conferma", "/confirm_motor"),
                    Button::new("Voglio vedere altre opzioni", "/change_motor"),
                ],
            );
        Ok(response)
    }
}

pub struct ConfirmMotor;

#[async_trait]
impl Action for ConfirmMotor {
    fn name(&self) -> &'static str {
        "action_confirm_motor"
    }

    async fn run(&self, context: &SlotContext) -> Result<ActionResponse, ApplicationError> {
        let shown = |slot| context.get(slot).unwrap_or("non indicato");

        let mut response = ActionResponse::default();
        response
            .say(format!(
                "Conferma del preventivo\nDimensioni: {}\nMateriale: {}\nMotore scelto: {}",
                shown(Slot::Dimension),
                shown(Slot::Material),
                shown(Slot::Motor)
            ))
            .say("Grazie per la richiesta! Ti contatteremo presto.")
            .emit(DialogueEvent::AllSlotsReset);
        Ok(response)
    }
}

pub struct FinalizeMotor;

#[async_trait]
impl Action for FinalizeMotor {
    fn name(&self) -> &'static str {
        "action_finalize_motor"
    }

    async fn run(&self, context: &SlotContext) -> Result<ActionResponse, ApplicationError> {
        let Some(motor) = context.get(Slot::Motor) else {
            return Ok(ActionResponse::message("Nessun motore selezionato. Vuoi vederne altri?"));
        };

        let mut response = ActionResponse::default();
        response
            .say(format!("Il motore {motor} è stato confermato! Procediamo con l'ordine."))
            .emit(DialogueEvent::clear(Slot::Motor));
        Ok(response)
    }
}

pub struct ResetSlots;

#[async_trait]
impl Action for ResetSlots {
    fn name(&self) -> &'static str {
        "action_reset_slots"
    }

    async fn run(&self, _context: &SlotContext) -> Result<ActionResponse, ApplicationError> {
        let mut response = ActionResponse::default();
        for slot in [Slot::Dimension, Slot::Material, Slot::Motor] {
            response.emit(DialogueEvent::clear(slot));
        }
        Ok(response)
    }
}
