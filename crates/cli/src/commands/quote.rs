use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;
use uuid::Uuid;

use tapparelle_agent::actions::{Action, GeneratePreventivo};
use tapparelle_catalog::HttpCatalogClient;
use tapparelle_core::config::{AppConfig, LoadOptions};
use tapparelle_core::cpq::catalog::CatalogSource;
use tapparelle_core::domain::slots::{Slot, SlotContext};
use tapparelle_core::errors::ApplicationError;
use tapparelle_core::validators::{
    validate_color, validate_dimension, validate_material, validate_motor, SlotValidation,
};

use crate::commands::CommandResult;

const COMMAND: &str = "quote";

#[derive(Clone, Debug, Default)]
pub struct QuoteArgs {
    pub dimension: String,
    pub material: String,
    pub color: String,
    pub manovra: Option<String>,
    pub motor: Option<String>,
    pub button: Option<String>,
    pub accessories: Vec<String>,
}

pub fn run(args: QuoteArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2)
        }
    };

    match HttpCatalogClient::new(&config.catalog) {
        Ok(client) => run_with_catalog(args, Arc::new(client)),
        Err(error) => interface_failure(ApplicationError::from(error)),
    }
}

/// Prices a quote against any catalog source; used directly by tests with a static catalog.
pub fn run_with_catalog(args: QuoteArgs, catalog: Arc<dyn CatalogSource>) -> CommandResult {
    let runtime = match current_thread_runtime() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure(COMMAND, "runtime", format!("{error:#}"), 1),
    };

    runtime.block_on(async move {
        let slots = match collect_slots(&args, catalog.as_ref()).await {
            Ok(slots) => slots,
            Err(outcome) => return outcome,
        };

        match GeneratePreventivo::new(catalog).run(&slots).await {
            Ok(response) => CommandResult::success(COMMAND, response.texts().join("\n")),
            Err(error) => interface_failure(error),
        }
    })
}

fn current_thread_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")
}

async fn collect_slots(
    args: &QuoteArgs,
    catalog: &dyn CatalogSource,
) -> Result<SlotContext, CommandResult> {
    let mut slots = SlotContext::default();

    let dimension = validate_dimension(&args.dimension, &slots);
    store(&mut slots, dimension)?;
    let material = validate_material(&args.material, &slots);
    store(&mut slots, material)?;

    let material = slots.get(Slot::Material).unwrap_or_default().to_owned();
    let allowed = match catalog.colors(&material).await {
        Ok(allowed) => allowed,
        Err(error) => return Err(interface_failure(ApplicationError::from(error))),
    };
    let color = validate_color(&args.color, &slots, Ok(allowed.as_slice()));
    store(&mut slots, color)?;

    if let Some(raw) = args.motor.as_deref() {
        let named = validate_motor(raw, &slots);
        slots.motor = named.value.or_else(|| Some(raw.trim().to_owned()));
    }
    slots.button = args.button.clone();
    slots.manovra = args.manovra.clone();
    slots.accessories = args.accessories.clone();

    Ok(slots)
}

fn store(slots: &mut SlotContext, validation: SlotValidation) -> Result<(), CommandResult> {
    match validation.value {
        Some(value) => {
            slots.set(validation.slot, Some(value));
            Ok(())
        }
        None => Err(CommandResult::failure(
            COMMAND,
            "invalid_input",
            validation
                .message
                .unwrap_or_else(|| format!("valore non valido per {}", validation.slot)),
            2,
        )),
    }
}

fn interface_failure(error: ApplicationError) -> CommandResult {
    let interface = error.into_interface(Uuid::new_v4().to_string());
    warn!(
        event_name = "cli.quote_failed",
        correlation_id = interface.correlation_id(),
        error = %interface,
        "quote command failed"
    );
    CommandResult::from_interface(COMMAND, &interface)
}
