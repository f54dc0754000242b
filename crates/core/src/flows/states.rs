use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Unfilled,
    PendingValidation { attempts: u32 },
    Accepted(String),
    RejectedRetry { attempts: u32 },
    Escalated { attempts: u32 },
}

impl SlotState {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::PendingValidation { attempts }
            | Self::RejectedRetry { attempts }
            | Self::Escalated { attempts } => *attempts,
            Self::Unfilled | Self::Accepted(_) => 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted(_) | Self::Escalated { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotEvent {
    ValueProvided,
    ValidationPassed(String),
    ValidationFailed,
    ResetRequested,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotAction {
    ValidateValue,
    StoreValue,
    PromptAgain,
    ResetConversation,
    ClearSlot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTransition {
    pub from: SlotState,
    pub to: SlotState,
    pub event: SlotEvent,
    pub actions: Vec<SlotAction>,
}
