pub mod config;
pub mod cpq;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod validators;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use cpq::catalog::{
    Catalog, CatalogQuery, CatalogSource, ConfiguredQuote, ShutterConfiguration, StaticCatalog,
};
pub use cpq::pricing::{build_quote, format_eur, render_summary, QuoteRequest};
pub use cpq::{recommend_motor, MotorRecommendation};
pub use domain::dimension::Dimension;
pub use domain::material::Material;
pub use domain::product::{Product, ProductCategory, ProductKind};
pub use domain::quote::{Quote, QuoteId, QuoteLine, SkippedItem};
pub use domain::slots::{Slot, SlotContext};
pub use errors::{ApplicationError, CatalogError, DomainError, FailureKind, InterfaceError};
pub use flows::{SlotFlow, SlotState};
pub use validators::SlotValidation;
