use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cpq::catalog::Catalog;
use crate::cpq::weight::estimate_weight_for;
use crate::domain::dimension::Dimension;
use crate::domain::product::{Product, ProductCategory};
use crate::domain::quote::{Quote, QuoteId, QuoteLine, SkippedItem};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub dimension: Dimension,
    pub material: String,
    pub color: String,
    pub manovra: Option<String>,
    pub motor: Product,
    pub button: Option<String>,
    pub accessories: Vec<String>,
}

/// Prices a shutter assembly against an already fetched catalog slice.
///
/// Button and accessories are best effort: names the catalog cannot resolve are left out
/// of the total and reported in [`Quote::skipped`].
pub fn build_quote(request: QuoteRequest, catalog: &Catalog) -> Quote {
    let estimated_weight_kg = estimate_weight_for(&request.dimension, &request.material);
    let motor = QuoteLine::from(&request.motor);
    let mut total = motor.price;
    let mut skipped = Vec::new();

    let button = request.button.as_deref().map(str::trim).filter(|name| !name.is_empty()).and_then(
        |name| match catalog.find(ProductCategory::Button, name) {
            Some(product) => Some(QuoteLine::from(product)),
            None => {
                skipped.push(skip(ProductCategory::Button, name));
                None
            }
        },
    );
    if let Some(button) = &button {
        total += button.price;
    }

    let mut accessories = Vec::with_capacity(request.accessories.len());
    for name in request.accessories.iter().map(|name| name.trim()).filter(|name| !name.is_empty())
    {
        match catalog.find(ProductCategory::Accessory, name) {
            Some(product) => {
                total += product.price;
                accessories.push(QuoteLine::from(product));
            }
            None => skipped.push(skip(ProductCategory::Accessory, name)),
        }
    }

    Quote {
        id: QuoteId::generate(),
        dimension: request.dimension,
        material: request.material,
        color: request.color,
        manovra: request.manovra,
        estimated_weight_kg,
        motor,
        button,
        accessories,
        skipped,
        total: total.round_dp(2),
        created_at: Utc::now(),
    }
}

fn skip(category: ProductCategory, name: &str) -> SkippedItem {
    warn!(
        event_name = "quote.item_skipped",
        category = %category,
        requested_name = name,
        "requested item not found in catalog, continuing without it"
    );
    SkippedItem { category, requested_name: name.to_owned() }
}

pub fn format_eur(amount: Decimal) -> String {
    format!("{:.2}€", amount.round_dp(2))
}

pub fn render_summary(quote: &Quote) -> String {
    let mut lines = vec![
        "Preventivo per la tua tapparella".to_owned(),
        format!("Dimensioni: {}", quote.dimension),
        format!("Materiale: {}", quote.material),
        format!("Colore: {}", quote.color),
    ];
    if let Some(manovra) = &quote.manovra {
        lines.push(format!("Manovra: {manovra}"));
    }
    lines.push(format!("Peso stimato: {:.2} kg", quote.estimated_weight_kg));
    lines.push(format!("Motore: {} - {}", quote.motor.name, format_eur(quote.motor.price)));
    lines.push(match &quote.button {
        Some(button) => format!("Pulsante: {} - {}", button.name, format_eur(button.price)),
        None => "Pulsante: Nessuno".to_owned(),
    });
    lines.push(if quote.accessories.is_empty() {
        "Accessori: Nessuno".to_owned()
    } else {
        let rendered = quote
            .accessories
            .iter()
            .map(|line| format!("{} ({})", line.name, format_eur(line.price)))
            .collect::<Vec<_>>();
        format!("Accessori: {}", rendered.join(", "))
    });
    if !quote.skipped.is_empty() {
        let names =
            quote.skipped.iter().map(|item| item.requested_name.as_str()).collect::<Vec<_>>();
        lines.push(format!("Non disponibili a catalogo: {}", names.join(", ")));
    }
    lines.push(format!("Totale preventivo: {}", format_eur(quote.total)));
    lines.join("\n")
}
