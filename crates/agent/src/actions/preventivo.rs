use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use tapparelle_core::cpq::catalog::{Catalog, CatalogSource};
use tapparelle_core::cpq::motor::{required_power_tier, select_motor, select_motor_by_brand};
use tapparelle_core::cpq::pricing::{build_quote, render_summary, QuoteRequest};
use tapparelle_core::cpq::weight::estimate_weight_for;
use tapparelle_core::domain::dimension::Dimension;
use tapparelle_core::domain::product::{Product, ProductCategory};
use tapparelle_core::domain::slots::{Slot, SlotContext};
use tapparelle_core::errors::{ApplicationError, CatalogError};

use crate::actions::Action;
use crate::events::ActionResponse;

/// Full shutter quote: motor (chosen or automatic), optional button and accessories.
pub struct GeneratePreventivo {
    catalog: Arc<dyn CatalogSource>,
}

impl GeneratePreventivo {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }

    /// Resolves each requested name against the catalog. Resolved names are replaced by the
    /// catalog's own spelling; unresolved ones are kept so the quote reports them as skipped.
    async fn resolve(
        &self,
        category: ProductCategory,
        requested: &[String],
        slice: &mut Catalog,
    ) -> Result<Vec<String>, CatalogError> {
        let mut names = Vec::with_capacity(requested.len());
        for name in requested {
            match self.catalog.find_by_name(category, name).await? {
                Some(product) => {
                    names.push(product.name.clone());
                    slice.push(product);
                }
                None => names.push(name.clone()),
            }
        }
        Ok(names)
    }
}

fn choose_motor<'a>(
    weight_kg: Decimal,
    requested: Option<&str>,
    motors: &'a [Product],
) -> Option<&'a Product> {
    match requested {
        None => select_motor(weight_kg, motors),
        Some(choice) => motors
            .iter()
            .find(|motor| motor.matches_name(choice))
            .or_else(|| select_motor_by_brand(weight_kg, choice, motors)),
    }
}

#[async_trait]
impl Action for GeneratePreventivo {
    fn name(&self) -> &'static str {
        "action_generate_preventivo"
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
        let weight = estimate_weight_for(&dimension, material);
        let motors = self.catalog.motors(required_power_tier(weight)).await?;

        let requested_motor = context.get(Slot::Motor);
        let Some(motor) = choose_motor(weight, requested_motor, &motors).cloned() else {
            let item = match requested_motor {
                Some(choice) => format!("motore {choice}"),
                None => "motore".to_owned(),
            };
            return Err(ApplicationError::NoMatchFound { item });
        };

        let mut slice = Catalog::default();
        let button = match context.get(Slot::Button) {
            Some(name) => self
                .resolve(ProductCategory::Button, &[name.to_owned()], &mut slice)
                .await?
                .into_iter()
                .next(),
            None => None,
        };
        let accessories =
            self.resolve(ProductCategory::Accessory, &context.accessories, &mut slice).await?;

        let quote = build_quote(
            QuoteRequest {
                dimension,
                material: material.to_owned(),
                color: color.to_owned(),
                manovra: context.get(Slot::Manovra).map(str::to_owned),
                motor,
                button,
                accessories,
            },
            &slice,
        );

        info!(
            event_name = "quote.generated",
            quote_id = %quote.id.0,
            motor = %quote.motor.name,
            skipped = quote.skipped.len(),
            total = %quote.total,
            "quote generated"
        );

        Ok(ActionResponse::message(render_summary(&quote)))
    }
}
