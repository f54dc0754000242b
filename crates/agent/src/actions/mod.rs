pub mod motor;
pub mod preventivo;
pub mod tapparella;

use std::collections::BTreeMap;

use async_trait::async_trait;

use tapparelle_core::domain::slots::SlotContext;
use tapparelle_core::errors::ApplicationError;

use crate::events::ActionResponse;

pub use motor::{ConfirmMotor, FinalizeMotor, GenerateMotorQuote, ResetSlots};
pub use preventivo::GeneratePreventivo;
pub use tapparella::GenerateTapparellaQuote;

/// One named dialogue action. Errors are turned into user replies by the runtime.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self, context: &SlotContext) -> Result<ActionResponse, ApplicationError>;
}

#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn register<A>(&mut self, action: A)
    where
        A: Action + 'static,
    {
        self.actions.insert(action.name(), Box::new(action));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(Box::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use tapparelle_core::cpq::catalog::{CatalogSource, ConfiguredQuote, StaticCatalog};
    use tapparelle_core::domain::product::Product;
    use tapparelle_core::domain::slots::SlotContext;

    pub fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            Product::motor("Somfy Oximo 20", Decimal::new(14_900, 2), 20),
            Product::motor("Nice Era M 20", Decimal::new(13_900, 2), 20),
            Product::motor("Nice Era M 10", Decimal::new(9_900, 2), 10),
            Product::motor("Somfy Oximo 50", Decimal::new(26_000, 2), 50),
            Product::button("Pulsante Doppio", Decimal::new(2_500, 2)),
            Product::accessory("Zanzariera", Decimal::new(6_000, 2)),
        ])
        .with_colors("pvc", ["Bianco", "Avorio"])
        .with_configured_quote(ConfiguredQuote {
            dimensions: "120x100".to_owned(),
            color: "bianco".to_owned(),
            total_price: Decimal::new(31_040, 2),
        })
    }

    pub fn shared(catalog: StaticCatalog) -> Arc<dyn CatalogSource> {
        Arc::new(catalog)
    }

    pub fn context(dimension: &str, material: &str) -> SlotContext {
        SlotContext {
            dimension: Some(dimension.to_owned()),
            material: Some(material.to_owned()),
            ..SlotContext::default()
        }
    }
}
