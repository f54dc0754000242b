use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use tapparelle_core::cpq::catalog::{CatalogSource, ShutterConfiguration};
use tapparelle_core::cpq::pricing::format_eur;
use tapparelle_core::domain::dimension::Dimension;
use tapparelle_core::domain::slots::{Slot, SlotContext};
use tapparelle_core::errors::{ApplicationError, CatalogError};

use crate::actions::Action;
use crate::events::{ActionResponse, Button};

/// Lets the catalog backend price a full configuration.
pub struct GenerateTapparellaQuote {
    catalog: Arc<dyn CatalogSource>,
}

impl GenerateTapparellaQuote {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Action for GenerateTapparellaQuote {
    fn name(&self) -> &'static str {
        "action_generate_tapparella_quote"
    }

    async fn run(&self, context: &SlotContext) -> Result<ActionResponse, ApplicationError> {
        let (Some(dimension), Some(material), Some(color)) = (
            context.get(Slot::Dimension),
            context.get(Slot::Material),
            context.get(Slot::Color),
        ) else {
            return Ok(ActionResponse::message(
                "Mi servono le dimensioni, il materiale e il colore per calcolare il preventivo.",
            ));
        };

        let dimension = Dimension::parse(dimension)?;
        let configuration = ShutterConfiguration {
            material: material.to_owned(),
            width_cm: dimension.width_cm,
            height_cm: dimension.height_cm,
            color: color.to_owned(),
            accessories: context.accessories.clone(),
        };

        let quote = match self.catalog.configure(&configuration).await {
            Ok(quote) => quote,
            Err(CatalogError::Rejected(reason)) => {
                warn!(
                    event_name = "quote.configuration_rejected",
                    material,
                    reason = %reason,
                    "catalog rejected shutter configuration"
                );
                return Ok(ActionResponse::message(format!("Errore: {reason}")));
            }
            Err(error) => return Err(error.into()),
        };

        info!(
            event_name = "quote.configured",
            dimension = %quote.dimensions,
            total = %quote.total_price,
            "catalog priced shutter configuration"
        );

        let accessories = if configuration.accessories.is_empty() {
            "Nessuno".to_owned()
        } else {
            configuration.accessories.join(", ")
        };

        let mut response = ActionResponse::default();
        response
            .say(format!(
                "Preventivo per la tua tapparella\nDimensioni: {}\nMateriale: {material}\nColore: {}\nAccessori: {accessories}\nTotale preventivo: {}",
                quote.dimensions,
                quote.color,
                format_eur(quote.total_price)
            ))
            .say_with_buttons(
                "Vuoi confermare questo preventivo o preferisci modificarlo?",
                vec![
                    Button::new("Sì, conferma", "/confirm_tapparella"),
                    Button::new("Voglio cambiare opzioni", "/change_tapparella"),
                ],
            );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use tapparelle_core::cpq::catalog::StaticCatalog;
    use tapparelle_core::domain::product::Product;
    use tapparelle_core::domain::slots::SlotContext;
    use tapparelle_core::errors::ApplicationError;

    use super::GenerateTapparellaQuote;
    use crate::actions::fixtures::{catalog, context, shared};
    use crate::actions::Action;

    fn full_context() -> SlotContext {
        let mut slots = context("120x100", "pvc");
        slots.color = Some("bianco".to_owned());
        slots.accessories = vec!["Zanzariera".to_owned()];
        slots
    }

    #[tokio::test]
    async fn backend_quote_is_rendered_with_buttons() {
        let action = GenerateTapparellaQuote::new(shared(catalog()));
        let response = action.run(&full_context()).await.expect("quote");

        let summary = response.texts()[0];
        assert!(summary.contains("Dimensioni: 120x100"), "{summary}");
        assert!(summary.contains("Accessori: Zanzariera"), "{summary}");
        assert!(summary.ends_with("Totale preventivo: 310.40€"), "{summary}");
        assert_eq!(response.messages[1].buttons[0].payload, "/confirm_tapparella");
    }

    #[tokio::test]
    async fn backend_error_is_shown_to_the_user() {
        let catalog = StaticCatalog::new(Vec::<Product>::new());
        let action = GenerateTapparellaQuote::new(shared(catalog));
        let response = action.run(&full_context()).await.expect("reply");

        assert_eq!(response.texts(), vec!["Errore: configurazione non disponibile per pvc"]);
        assert!(response.events.is_empty());
    }

    #[tokio::test]
    async fn missing_slots_are_requested() {
        let action = GenerateTapparellaQuote::new(shared(catalog()));
        let response = action.run(&context("120x100", "pvc")).await.expect("prompt");
        assert!(response.texts()[0].starts_with("Mi servono"));
    }

    #[tokio::test]
    async fn outage_is_an_error() {
        let action = GenerateTapparellaQuote::new(shared(StaticCatalog::unavailable()));
        let error = action.run(&full_context()).await.expect_err("catalog down");
        assert!(matches!(error, ApplicationError::Catalog(_)));
    }
}
