pub mod engine;
pub mod states;

pub use engine::{SlotFlow, SlotTransitionError, DEFAULT_MAX_SLOT_RETRIES};
pub use states::{SlotAction, SlotEvent, SlotState, SlotTransition};
