use serde::{Deserialize, Serialize};

use tapparelle_core::domain::slots::Slot;

/// Slot mutation handed back to the dialogue layer, in action-server wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum DialogueEvent {
    #[serde(rename = "slot")]
    SlotSet {
        #[serde(rename = "name")]
        slot: Slot,
        value: Option<String>,
    },
    #[serde(rename = "reset_slots")]
    AllSlotsReset,
}

impl DialogueEvent {
    pub fn set(slot: Slot, value: impl Into<String>) -> Self {
        Self::SlotSet { slot, value: Some(value.into()) }
    }

    pub fn clear(slot: Slot) -> Self {
        Self::SlotSet { slot, value: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub title: String,
    pub payload: String,
}

impl Button {
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { title: title.into(), payload: payload.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

impl BotMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), buttons: Vec::new() }
    }

    pub fn with_buttons(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self { text: text.into(), buttons }
    }
}

/// Everything one action or form validation produced during a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<DialogueEvent>,
    #[serde(rename = "responses")]
    pub messages: Vec<BotMessage>,
}

impl ActionResponse {
    pub fn message(text: impl Into<String>) -> Self {
        Self { events: Vec::new(), messages: vec![BotMessage::text(text)] }
    }

    pub fn say(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages.push(BotMessage::text(text));
        self
    }

    pub fn say_with_buttons(&mut self, text: impl Into<String>, buttons: Vec<Button>) -> &mut Self {
        self.messages.push(BotMessage::with_buttons(text, buttons));
        self
    }

    pub fn emit(&mut self, event: DialogueEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|message| message.text.as_str()).collect()
    }
}
