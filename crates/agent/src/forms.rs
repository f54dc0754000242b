//! Form validation: runs the slot validators on the values extracted in one turn and
//! applies the retry bound from [`SlotFlow`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use tapparelle_core::cpq::catalog::CatalogSource;
use tapparelle_core::cpq::motor::required_power_tier;
use tapparelle_core::cpq::weight::estimate_weight;
use tapparelle_core::domain::slots::{Slot, SlotContext};
use tapparelle_core::errors::{ApplicationError, DomainError, FailureKind};
use tapparelle_core::flows::{SlotAction, SlotFlow, SlotState};
use tapparelle_core::validators::{
    suggest_motor, validate_button, validate_color, validate_dimension, validate_material,
    validate_motor, SlotValidation,
};

use crate::events::{ActionResponse, DialogueEvent};

/// Per-slot retry state of one conversation. Owned by the caller alongside the slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    states: BTreeMap<Slot, SlotState>,
}

impl FormState {
    pub fn get(&self, slot: Slot) -> SlotState {
        self.states.get(&slot).cloned().unwrap_or(SlotState::Unfilled)
    }

    pub fn attempts(&self, slot: Slot) -> u32 {
        self.get(slot).attempts()
    }

    fn set(&mut self, slot: Slot, state: SlotState) {
        self.states.insert(slot, state);
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormOutcome {
    pub response: ActionResponse,
    /// First required slot still empty after this turn, if any.
    pub next_slot: Option<Slot>,
}

#[async_trait]
pub trait FormValidator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Slots the form collects, in the order they are asked for.
    fn slots(&self) -> &'static [Slot];

    fn required_slots(&self) -> &'static [Slot];

    async fn validate_slot(&self, slot: Slot, raw: &str, context: &SlotContext) -> SlotValidation;
}

/// Drives a [`FormValidator`] through one turn.
pub async fn run_form(
    form: &dyn FormValidator,
    flow: &SlotFlow,
    context: &SlotContext,
    state: &mut FormState,
    submitted: &[(Slot, String)],
) -> FormOutcome {
    let mut working = context.clone();
    let mut response = ActionResponse::default();

    for &slot in form.slots() {
        let Some((_, raw)) = submitted.iter().find(|(candidate, _)| *candidate == slot) else {
            continue;
        };

        let validation = form.validate_slot(slot, raw, &working).await;
        let outcome = flow.submit_for_slot(slot, &state.get(slot), validation.value.clone());
        let transition = match outcome {
            Ok(transition) => transition,
            Err(error) => {
                let kind = ApplicationError::from(DomainError::from(error)).kind();
                response.say(kind.user_message());
                state.set(slot, SlotState::Unfilled);
                continue;
            }
        };

        if transition.actions.contains(&SlotAction::ResetConversation) {
            if let Some(message) = validation.message {
                response.say(message);
            }
            response.emit(DialogueEvent::AllSlotsReset).say(format!(
                "Non sono riuscito a capire il valore per {slot} dopo {} tentativi. Ricominciamo da capo.",
                transition.to.attempts()
            ));
            working.reset();
            state.reset();
            break;
        }

        if transition.actions.contains(&SlotAction::StoreValue) {
            let value = validation.value.unwrap_or_default();
            working.set(slot, Some(value.clone()));
            response.emit(DialogueEvent::set(slot, value));
        } else if transition.actions.contains(&SlotAction::ClearSlot) {
            working.set(slot, None);
            response.emit(DialogueEvent::clear(slot));
        }
        if let Some(message) = validation.message {
            response.say(message);
        }
        state.set(slot, transition.to);
    }

    let next_slot = working.missing(form.required_slots()).into_iter().next();
    FormOutcome { response, next_slot }
}

fn free_text(slot: Slot, raw: &str) -> SlotValidation {
    let value = raw.trim();
    if value.is_empty() {
        return SlotValidation::rejected(
            slot,
            format!("Non ho capito il valore per {slot}, puoi ripetere?"),
        );
    }
    SlotValidation::accepted(slot, value)
}

async fn check_color(
    catalog: &dyn CatalogSource,
    raw: &str,
    context: &SlotContext,
) -> SlotValidation {
    let Some(material) = context.get(Slot::Material) else {
        return validate_color(raw, context, Ok(&[][..]));
    };
    let allowed = catalog.colors(material).await;
    validate_color(raw, context, allowed.as_deref())
}

/// Named brand when one is mentioned, otherwise the best motor for the collected slots.
async fn check_motor(
    catalog: &dyn CatalogSource,
    raw: &str,
    context: &SlotContext,
) -> SlotValidation {
    let named = validate_motor(raw, context);
    if named.is_accepted() {
        return named;
    }

    let tier = context
        .get(Slot::Dimension)
        .and_then(|dimension| {
            estimate_weight(dimension, context.get(Slot::Material).unwrap_or_default()).ok()
        })
        .map(required_power_tier);
    let Some(tier) = tier else {
        return suggest_motor(context, &[]);
    };

    match catalog.motors(tier).await {
        Ok(motors) => suggest_motor(context, &motors),
        Err(_) => {
            SlotValidation::rejected(Slot::Motor, FailureKind::CatalogUnavailable.user_message())
        }
    }
}

/// Full quote form: shutter attributes plus optional motor brand, button and accessories.
pub struct PreventivoTapparellaForm {
    catalog: Arc<dyn CatalogSource>,
}

impl PreventivoTapparellaForm {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl FormValidator for PreventivoTapparellaForm {
    fn name(&self) -> &'static str {
        "validate_preventivo_tapparella_form"
    }

    fn slots(&self) -> &'static [Slot] {
        &[
            Slot::Dimension,
            Slot::Material,
            Slot::Color,
            Slot::Manovra,
            Slot::Motor,
            Slot::Button,
            Slot::Accessories,
        ]
    }

    fn required_slots(&self) -> &'static [Slot] {
        &[Slot::Dimension, Slot::Material, Slot::Color]
    }

    async fn validate_slot(&self, slot: Slot, raw: &str, context: &SlotContext) -> SlotValidation {
        match slot {
            Slot::Dimension => validate_dimension(raw, context),
            Slot::Material => validate_material(raw, context),
            Slot::Color => check_color(self.catalog.as_ref(), raw, context).await,
            Slot::Motor => validate_motor(raw, context),
            Slot::Button => validate_button(raw, context),
            Slot::Manovra | Slot::Accessories => free_text(slot, raw),
        }
    }
}

/// Motor quote form. A missing or unrecognised motor preference gets a suggestion.
pub struct MotorQuoteForm {
    catalog: Arc<dyn CatalogSource>,
}

impl MotorQuoteForm {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl FormValidator for MotorQuoteForm {
    fn name(&self) -> &'static str {
        "validate_motor_quote_form"
    }

    fn slots(&self) -> &'static [Slot] {
        &[Slot::Dimension, Slot::Material, Slot::Motor]
    }

    fn required_slots(&self) -> &'static [Slot] {
        &[Slot::Dimension, Slot::Material]
    }

    async fn validate_slot(&self, slot: Slot, raw: &str, context: &SlotContext) -> SlotValidation {
        match slot {
            Slot::Dimension => validate_dimension(raw, context),
            Slot::Material => validate_material(raw, context),
            Slot::Motor => check_motor(self.catalog.as_ref(), raw, context).await,
            other => free_text(other, raw),
        }
    }
}

/// Configuration form priced by the catalog backend.
pub struct TapparellaQuoteForm {
    catalog: Arc<dyn CatalogSource>,
}

impl TapparellaQuoteForm {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl FormValidator for TapparellaQuoteForm {
    fn name(&self) -> &'static str {
        "validate_tapparella_quote_form"
    }

    fn slots(&self) -> &'static [Slot] {
        &[Slot::Dimension, Slot::Material, Slot::Color, Slot::Accessories]
    }

    fn required_slots(&self) -> &'static [Slot] {
        &[Slot::Dimension, Slot::Material, Slot::Color]
    }

    async fn validate_slot(&self, slot: Slot, raw: &str, context: &SlotContext) -> SlotValidation {
        match slot {
            Slot::Dimension => validate_dimension(raw, context),
            Slot::Material => validate_material(raw, context),
            Slot::Color => check_color(self.catalog.as_ref(), raw, context).await,
            other => free_text(other, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use tapparelle_core::cpq::catalog::StaticCatalog;
    use tapparelle_core::domain::slots::{Slot, SlotContext};
    use tapparelle_core::flows::{SlotFlow, SlotState};

    use super::{run_form, FormState, MotorQuoteForm, PreventivoTapparellaForm, TapparellaQuoteForm};
    use crate::actions::fixtures::{catalog, context, shared};
    use crate::events::DialogueEvent;

    fn submit(values: &[(Slot, &str)]) -> Vec<(Slot, String)> {
        values.iter().map(|(slot, raw)| (*slot, (*raw).to_owned())).collect()
    }

    #[tokio::test]
    async fn accepted_values_are_normalized_and_set() {
        let form = TapparellaQuoteForm::new(shared(catalog()));
        let mut state = FormState::default();

        let outcome = run_form(
            &form,
            &SlotFlow::default(),
            &SlotContext::default(),
            &mut state,
            &submit(&[
                (Slot::Material, "PVC"),
                (Slot::Dimension, " 120 x 100 "),
                (Slot::Color, "Avorio"),
            ]),
        )
        .await;

        assert_eq!(
            outcome.response.events,
            vec![
                DialogueEvent::set(Slot::Dimension, "120x100"),
                DialogueEvent::set(Slot::Material, "pvc"),
                DialogueEvent::set(Slot::Color, "avorio"),
            ]
        );
        assert_eq!(outcome.next_slot, None);
        assert_eq!(state.get(Slot::Color), SlotState::Accepted("avorio".to_owned()));
    }

    #[tokio::test]
    async fn color_outside_material_palette_is_rejected() {
        let form = TapparellaQuoteForm::new(shared(catalog()));
        let mut state = FormState::default();

        let outcome = run_form(
            &form,
            &SlotFlow::default(),
            &context("120x100", "pvc"),
            &mut state,
            &submit(&[(Slot::Color, "verde")]),
        )
        .await;

        assert_eq!(outcome.response.events, vec![DialogueEvent::clear(Slot::Color)]);
        assert!(outcome.response.texts()[0].contains("Colori disponibili: Bianco, Avorio"));
        assert_eq!(outcome.next_slot, Some(Slot::Color));
        assert_eq!(state.attempts(Slot::Color), 1);
    }

    #[tokio::test]
    async fn retries_are_bounded_then_conversation_resets() {
        let form = TapparellaQuoteForm::new(shared(catalog()));
        let flow = SlotFlow::new(3);
        let mut state = FormState::default();
        let slots = SlotContext::default();
        let bad = submit(&[(Slot::Dimension, "centoventi per cento")]);

        for attempt in 1..=2 {
            let outcome = run_form(&form, &flow, &slots, &mut state, &bad).await;
            assert_eq!(outcome.response.events, vec![DialogueEvent::clear(Slot::Dimension)]);
            assert_eq!(state.attempts(Slot::Dimension), attempt);
        }

        let escalated = run_form(&form, &flow, &slots, &mut state, &bad).await;
        assert_eq!(escalated.response.events, vec![DialogueEvent::AllSlotsReset]);
        assert!(escalated
            .response
            .texts()
            .iter()
            .any(|text| text.contains("dopo 3 tentativi")));
        assert_eq!(state, FormState::default());
        assert_eq!(escalated.next_slot, Some(Slot::Dimension));
    }

    #[tokio::test]
    async fn good_value_after_rejection_is_accepted() {
        let form = TapparellaQuoteForm::new(shared(catalog()));
        let flow = SlotFlow::default();
        let mut state = FormState::default();

        let bad = submit(&[(Slot::Dimension, "120-100")]);
        run_form(&form, &flow, &SlotContext::default(), &mut state, &bad).await;
        let outcome = run_form(
            &form,
            &flow,
            &SlotContext::default(),
            &mut state,
            &submit(&[(Slot::Dimension, "120x100")]),
        )
        .await;

        assert_eq!(outcome.response.events, vec![DialogueEvent::set(Slot::Dimension, "120x100")]);
        assert_eq!(state.get(Slot::Dimension), SlotState::Accepted("120x100".to_owned()));
    }

    #[tokio::test]
    async fn motor_form_suggests_when_no_brand_given() {
        let form = MotorQuoteForm::new(shared(catalog()));
        let mut state = FormState::default();

        let outcome = run_form(
            &form,
            &SlotFlow::default(),
            &context("120x100", "pvc"),
            &mut state,
            &submit(&[(Slot::Motor, "")]),
        )
        .await;

        assert_eq!(outcome.response.events, vec![DialogueEvent::set(Slot::Motor, "Nice Era M 20")]);
        assert!(outcome.response.texts()[0].contains("Ti consiglio il motore Nice Era M 20"));
    }

    #[tokio::test]
    async fn motor_form_keeps_named_brand() {
        let form = MotorQuoteForm::new(shared(catalog()));
        let outcome = run_form(
            &form,
            &SlotFlow::default(),
            &context("120x100", "pvc"),
            &mut FormState::default(),
            &submit(&[(Slot::Motor, "preferisco nice")]),
        )
        .await;

        assert_eq!(outcome.response.events, vec![DialogueEvent::set(Slot::Motor, "Nice")]);
    }

    #[tokio::test]
    async fn catalog_outage_rejects_color_without_failing() {
        let form = PreventivoTapparellaForm::new(shared(StaticCatalog::unavailable()));
        let outcome = run_form(
            &form,
            &SlotFlow::default(),
            &context("120x100", "pvc"),
            &mut FormState::default(),
            &submit(&[(Slot::Color, "bianco")]),
        )
        .await;

        assert_eq!(outcome.response.events, vec![DialogueEvent::clear(Slot::Color)]);
        assert_eq!(outcome.next_slot, Some(Slot::Color));
    }

    #[tokio::test]
    async fn material_is_validated_before_color_in_the_same_turn() {
        let form = PreventivoTapparellaForm::new(shared(catalog()));
        let outcome = run_form(
            &form,
            &SlotFlow::default(),
            &SlotContext::default(),
            &mut FormState::default(),
            &submit(&[
                (Slot::Color, "Bianco"),
                (Slot::Material, "pvc"),
                (Slot::Button, "Pulsante Doppio"),
            ]),
        )
        .await;

        assert_eq!(
            outcome.response.events,
            vec![
                DialogueEvent::set(Slot::Material, "pvc"),
                DialogueEvent::set(Slot::Color, "bianco"),
                DialogueEvent::set(Slot::Button, "Pulsante Doppio"),
            ]
        );
        assert_eq!(outcome.next_slot, Some(Slot::Dimension));
    }
}
