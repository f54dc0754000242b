use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "dimensione")]
    Dimension,
    #[serde(rename = "materiale")]
    Material,
    #[serde(rename = "colore")]
    Color,
    #[serde(rename = "motore")]
    Motor,
    #[serde(rename = "pulsante")]
    Button,
    #[serde(rename = "accessori")]
    Accessories,
    #[serde(rename = "manovra")]
    Manovra,
}

impl Slot {
    /// Slot name as known to the dialogue framework.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dimension => "dimensione",
            Self::Material => "materiale",
            Self::Color => "colore",
            Self::Motor => "motore",
            Self::Button => "pulsante",
            Self::Accessories => "accessori",
            Self::Manovra => "manovra",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Slot values of one conversation, handed to validators and actions for a single turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotContext {
    pub dimension: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub motor: Option<String>,
    pub button: Option<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
    pub manovra: Option<String>,
    pub latest_intent: Option<String>,
}

impl SlotContext {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        let value = match slot {
            Slot::Dimension => self.dimension.as_deref(),
            Slot::Material => self.material.as_deref(),
            Slot::Color => self.color.as_deref(),
            Slot::Motor => self.motor.as_deref(),
            Slot::Button => self.button.as_deref(),
            Slot::Manovra => self.manovra.as_deref(),
            Slot::Accessories => None,
        };
        value.filter(|value| !value.trim().is_empty())
    }

    pub fn set(&mut self, slot: Slot, value: Option<String>) {
        match slot {
            Slot::Dimension => self.dimension = value,
            Slot::Material => self.material = value,
            Slot::Color => self.color = value,
            Slot::Motor => self.motor = value,
            Slot::Button => self.button = value,
            Slot::Manovra => self.manovra = value,
            Slot::Accessories => {
                self.accessories = value
                    .map(|raw| {
                        raw.split(',')
                            .map(str::trim)
                            .filter(|item| !item.is_empty())
                            .map(str::to_owned)
                            .collect()
                    })
                    .unwrap_or_default();
            }
        }
    }

    pub fn missing(&self, required: &[Slot]) -> Vec<Slot> {
        required
            .iter()
            .copied()
            .filter(|slot| match slot {
                Slot::Accessories => self.accessories.is_empty(),
                other => self.get(*other).is_none(),
            })
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
