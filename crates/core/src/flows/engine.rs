use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DialogueConfig;
use crate::domain::slots::Slot;
use crate::flows::states::{SlotAction, SlotEvent, SlotState, SlotTransition};

pub const DEFAULT_MAX_SLOT_RETRIES: u32 = 3;

/// Per-slot collection lifecycle with a bounded number of rejected attempts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotFlow {
    max_retries: u32,
}

impl Default for SlotFlow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SLOT_RETRIES)
    }
}

impl From<&DialogueConfig> for SlotFlow {
    fn from(config: &DialogueConfig) -> Self {
        Self::new(config.max_slot_retries)
    }
}

impl SlotFlow {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries: max_retries.max(1) }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn initial_state(&self) -> SlotState {
        SlotState::Unfilled
    }

    pub fn apply(
        &self,
        current: &SlotState,
        event: &SlotEvent,
    ) -> Result<SlotTransition, SlotTransitionError> {
        use SlotAction::{ClearSlot, PromptAgain, ResetConversation, StoreValue, ValidateValue};
        use SlotState::{Accepted, Escalated, PendingValidation, RejectedRetry, Unfilled};

        let (to, actions) = match (current, event) {
            (_, SlotEvent::ResetRequested) => (Unfilled, vec![ClearSlot]),
            (Unfilled | Accepted(_), SlotEvent::ValueProvided) => {
                (PendingValidation { attempts: 0 }, vec![ValidateValue])
            }
            (RejectedRetry { attempts }, SlotEvent::ValueProvided) => {
                (PendingValidation { attempts: *attempts }, vec![ValidateValue])
            }
            (PendingValidation { .. }, SlotEvent::ValidationPassed(value)) => {
                (Accepted(value.clone()), vec![StoreValue])
            }
            (PendingValidation { attempts }, SlotEvent::ValidationFailed) => {
                let attempts = attempts + 1;
                if attempts >= self.max_retries {
                    (Escalated { attempts }, vec![ClearSlot, ResetConversation])
                } else {
                    (RejectedRetry { attempts }, vec![ClearSlot, PromptAgain])
                }
            }
            _ => {
                return Err(SlotTransitionError::InvalidTransition {
                    state: current.clone(),
                    event: event.clone(),
                })
            }
        };

        Ok(SlotTransition { from: current.clone(), to, event: event.clone(), actions })
    }

    /// Runs a value through validation in one step: provided, then passed or failed.
    pub fn submit(
        &self,
        current: &SlotState,
        validated: Option<String>,
    ) -> Result<SlotTransition, SlotTransitionError> {
        let pending = self.apply(current, &SlotEvent::ValueProvided)?;
        let outcome = match validated {
            Some(value) => SlotEvent::ValidationPassed(value),
            None => SlotEvent::ValidationFailed,
        };
        let mut transition = self.apply(&pending.to, &outcome)?;
        transition.from = current.clone();
        Ok(transition)
    }

    pub fn submit_for_slot(
        &self,
        slot: Slot,
        current: &SlotState,
        validated: Option<String>,
    ) -> Result<SlotTransition, SlotTransitionError> {
        let result = self.submit(current, validated);
        match &result {
            Ok(transition) if matches!(transition.to, SlotState::Escalated { .. }) => {
                warn!(
                    event_name = "dialogue.slot_escalated",
                    slot = slot.name(),
                    attempts = transition.to.attempts(),
                    max_retries = self.max_retries,
                    "slot retries exhausted, resetting conversation"
                );
            }
            Ok(transition) => {
                debug!(
                    event_name = "dialogue.slot_transition",
                    slot = slot.name(),
                    from = ?transition.from,
                    to = ?transition.to,
                    "slot transition applied"
                );
            }
            Err(error) => {
                warn!(
                    event_name = "dialogue.slot_transition_rejected",
                    slot = slot.name(),
                    error = %error,
                    "slot transition rejected"
                );
            }
        }
        result
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SlotTransitionError {
    #[error("invalid slot transition from {state:?} using event {event:?}")]
    InvalidTransition { state: SlotState, event: SlotEvent },
}
