use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use tapparelle_core::config::DialogueConfig;
use tapparelle_core::cpq::catalog::CatalogSource;
use tapparelle_core::domain::slots::{Slot, SlotContext};
use tapparelle_core::flows::SlotFlow;

use crate::actions::{
    ActionRegistry, ConfirmMotor, FinalizeMotor, GenerateMotorQuote, GeneratePreventivo,
    GenerateTapparellaQuote, ResetSlots,
};
use crate::events::ActionResponse;
use crate::forms::{
    run_form, FormOutcome, FormState, FormValidator, MotorQuoteForm, PreventivoTapparellaForm,
    TapparellaQuoteForm,
};

const UNKNOWN_ACTION: &str = "Non so ancora come gestire questa richiesta.";

/// Dispatches dialogue actions and form validations by name. Failures never escape: each
/// one is logged with a correlation id and turned into a user-facing reply.
pub struct AgentRuntime {
    actions: ActionRegistry,
    forms: BTreeMap<&'static str, Box<dyn FormValidator>>,
    flow: SlotFlow,
}

impl AgentRuntime {
    pub fn new(catalog: Arc<dyn CatalogSource>, flow: SlotFlow) -> Self {
        let mut actions = ActionRegistry::default();
        actions.register(GeneratePreventivo::new(Arc::clone(&catalog)));
        actions.register(GenerateMotorQuote::new(Arc::clone(&catalog)));
        actions.register(GenerateTapparellaQuote::new(Arc::clone(&catalog)));
        actions.register(ConfirmMotor);
        actions.register(FinalizeMotor);
        actions.register(ResetSlots);

        let validators: [Box<dyn FormValidator>; 3] = [
            Box::new(PreventivoTapparellaForm::new(Arc::clone(&catalog))),
            Box::new(MotorQuoteForm::new(Arc::clone(&catalog))),
            Box::new(TapparellaQuoteForm::new(catalog)),
        ];
        let mut forms = BTreeMap::new();
        for form in validators {
            forms.insert(form.name(), form);
        }

        Self { actions, forms, flow }
    }

    /// Runtime whose forms use the configured retry bound.
    pub fn from_config(catalog: Arc<dyn CatalogSource>, dialogue: &DialogueConfig) -> Self {
        Self::new(catalog, SlotFlow::from(dialogue))
    }

    pub fn action_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.names()
    }

    pub fn form_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forms.keys().copied()
    }

    pub async fn run_action(&self, name: &str, context: &SlotContext) -> ActionResponse {
        let Some(action) = self.actions.get(name) else {
            warn!(event_name = "agent.unknown_action", action = name, "unknown action requested");
            return ActionResponse::message(UNKNOWN_ACTION);
        };

        match action.run(context).await {
            Ok(response) => {
                debug!(
                    event_name = "agent.action_completed",
                    action = name,
                    events = response.events.len(),
                    messages = response.messages.len(),
                    "action completed"
                );
                response
            }
            Err(error) => {
                let interface = error.into_interface(Uuid::new_v4().to_string());
                warn!(
                    event_name = "agent.action_failed",
                    action = name,
                    correlation_id = interface.correlation_id(),
                    error = %interface,
                    "action failed, replying with fallback message"
                );
                ActionResponse::message(interface.user_message())
            }
        }
    }

    pub async fn validate_form(
        &self,
        name: &str,
        context: &SlotContext,
        state: &mut FormState,
        submitted: &[(Slot, String)],
    ) -> FormOutcome {
        let Some(form) = self.forms.get(name) else {
            warn!(event_name = "agent.unknown_form", form = name, "unknown form requested");
            return FormOutcome {
                response: ActionResponse::message(UNKNOWN_ACTION),
                next_slot: None,
            };
        };

        run_form(form.as_ref(), &self.flow, context, state, submitted).await
    }
}

#[cfg(test)]
mod tests {
    use tapparelle_core::config::DialogueConfig;
    use tapparelle_core::cpq::catalog::StaticCatalog;
    use tapparelle_core::domain::slots::{Slot, SlotContext};
    use tapparelle_core::errors::FailureKind;
    use tapparelle_core::flows::SlotFlow;

    use super::{AgentRuntime, UNKNOWN_ACTION};
    use crate::actions::fixtures::{catalog, context, shared};
    use crate::events::DialogueEvent;
    use crate::forms::FormState;

    fn runtime(catalog: StaticCatalog) -> AgentRuntime {
        AgentRuntime::new(shared(catalog), SlotFlow::default())
    }

    #[test]
    fn every_action_and_form_is_registered() {
        let runtime = runtime(catalog());
        assert_eq!(
            runtime.action_names().collect::<Vec<_>>(),
            vec![
                "action_confirm_motor",
                "action_finalize_motor",
                "action_generate_motor_quote",
                "action_generate_preventivo",
                "action_generate_tapparella_quote",
                "action_reset_slots",
            ]
        );
        assert_eq!(runtime.form_names().count(), 3);
    }

    #[tokio::test]
    async fn catalog_outage_becomes_a_user_message() {
        let runtime = runtime(StaticCatalog::unavailable());
        let response =
            runtime.run_action("action_generate_motor_quote", &context("120x100", "pvc")).await;

        assert_eq!(response.texts(), vec![FailureKind::CatalogUnavailable.user_message()]);
        assert!(response.events.is_empty());
    }

    #[tokio::test]
    async fn malformed_dimension_becomes_a_format_prompt() {
        let runtime = runtime(catalog());
        let response =
            runtime.run_action("action_generate_motor_quote", &context("centoventi", "pvc")).await;
        assert_eq!(response.texts(), vec![FailureKind::InvalidInputFormat.user_message()]);
    }

    #[tokio::test]
    async fn missing_motor_is_named_in_the_reply() {
        let runtime = runtime(StaticCatalog::new(Vec::new()));
        let response =
            runtime.run_action("action_generate_motor_quote", &context("120x100", "pvc")).await;

        assert_eq!(
            response.texts(),
            vec!["Non ho trovato un motore adatto per questa tapparella."]
        );
        assert!(response.events.is_empty());
    }

    #[tokio::test]
    async fn configured_retry_bound_reaches_the_forms() {
        let runtime =
            AgentRuntime::from_config(shared(catalog()), &DialogueConfig { max_slot_retries: 2 });
        let slots = SlotContext::default();
        let mut state = FormState::default();
        let bad = [(Slot::Dimension, "centoventi".to_owned())];

        let first =
            runtime.validate_form("validate_motor_quote_form", &slots, &mut state, &bad).await;
        assert_eq!(first.response.events, vec![DialogueEvent::clear(Slot::Dimension)]);

        let second =
            runtime.validate_form("validate_motor_quote_form", &slots, &mut state, &bad).await;
        assert_eq!(second.response.events, vec![DialogueEvent::AllSlotsReset]);
        assert!(second.response.texts().iter().any(|text| text.contains("dopo 2 tentativi")));
    }

    #[tokio::test]
    async fn unknown_action_is_answered() {
        let runtime = runtime(catalog());
        let response = runtime.run_action("action_order_pizza", &SlotContext::default()).await;
        assert_eq!(response.texts(), vec![UNKNOWN_ACTION]);
    }

    #[tokio::test]
    async fn motor_conversation_end_to_end() {
        let runtime = runtime(catalog());
        let mut slots = SlotContext::default();
        let mut state = FormState::default();

        let outcome = runtime
            .validate_form(
                "validate_motor_quote_form",
                &slots,
                &mut state,
                &[(Slot::Dimension, "120x100".to_owned()), (Slot::Material, "PVC".to_owned())],
            )
            .await;
        assert_eq!(outcome.next_slot, None);
        for event in &outcome.response.events {
            if let DialogueEvent::SlotSet { slot, value } = event {
                slots.set(*slot, value.clone());
            }
        }

        let quote = runtime.run_action("action_generate_motor_quote", &slots).await;
        assert!(quote.texts()[0].contains("Peso stimato: 4.80 kg"));
        for event in &quote.events {
            if let DialogueEvent::SlotSet { slot, value } = event {
                slots.set(*slot, value.clone());
            }
        }
        assert_eq!(slots.motor.as_deref(), Some("Nice Era M 20"));

        let confirmation = runtime.run_action("action_confirm_motor", &slots).await;
        assert_eq!(confirmation.events, vec![DialogueEvent::AllSlotsReset]);
    }

    #[tokio::test]
    async fn unknown_form_is_answered() {
        let runtime = runtime(catalog());
        let outcome = runtime
            .validate_form(
                "validate_pizza_form",
                &SlotContext::default(),
                &mut FormState::default(),
                &[],
            )
            .await;
        assert_eq!(outcome.response.texts(), vec![UNKNOWN_ACTION]);
    }
}
