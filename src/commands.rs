//! Commands run by the `crust` binary.

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::Columns},
};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{
        CartItem,
        selection::{CakeSelection, Selection, SelectionError},
    },
    catalog::{ALL_CATEGORIES, Catalog},
    checkout::DeliveryMethod,
    config::{Command, CrustConfig, QuoteCommand},
    fixtures::{Fixture, FixtureError},
    products::Product,
    receipt::{Receipt, ReceiptError},
};

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Fixture loading error.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// No product with the given id.
    #[error("no product with id {0}")]
    UnknownProduct(String),

    /// The product cannot be configured as asked.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Receipt rendering error.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Run the configured command, writing its output to `out`.
///
/// # Errors
///
/// Returns a [`CommandError`] if fixtures cannot be loaded, a product is
/// missing or misconfigured, or output cannot be written.
pub fn run(config: &CrustConfig, mut out: impl io::Write) -> Result<(), CommandError> {
    let mut fixture = Fixture::with_base_path(&config.fixtures);

    fixture.load_catalog(&config.catalog)?;

    info!(
        catalog = %config.catalog,
        products = fixture.catalog().len(),
        "loaded catalog"
    );

    match &config.command {
        Command::Catalog { category, featured } => {
            write_catalog(&mut out, fixture.catalog(), category, *featured)
        }
        Command::Quote { item } => write_quote(&mut out, fixture.catalog(), item),
        Command::Summary { cart, delivery } => write_summary(&mut out, &fixture, cart, *delivery),
    }
}

fn write_catalog(
    out: &mut impl io::Write,
    catalog: &Catalog<'_>,
    category: &str,
    featured_only: bool,
) -> Result<(), CommandError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Category", "Price", "Available"]);

    for product in catalog
        .by_category(category)
        .filter(|product| !featured_only || product.featured)
    {
        builder.push_record([
            product.id.clone(),
            if product.featured {
                format!("{} *", product.name)
            } else {
                product.name.clone()
            },
            product.category.clone(),
            format!("from {}", product.price),
            if product.available { "yes" } else { "no" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());
    table.modify(Columns::first(), Color::BOLD);

    writeln!(out, "{table}").map_err(|_err| CommandError::IO)?;

    if category != ALL_CATEGORIES || featured_only {
        return Ok(());
    }

    writeln!(out, "* featured").map_err(|_err| CommandError::IO)
}

fn write_quote(
    out: &mut impl io::Write,
    catalog: &Catalog<'_>,
    command: &QuoteCommand,
) -> Result<(), CommandError> {
    let (product_id, selection, quantity) = match command {
        QuoteCommand::Cake {
            product_id,
            size,
            layers,
            flavor,
            quantity,
        } => (
            product_id,
            Selection::Cake(CakeSelection {
                flavor: flavor.clone(),
                ..CakeSelection::new(size.clone(), *layers)
            }),
            *quantity,
        ),
        QuoteCommand::Pastry {
            product_id,
            size,
            quantity,
        } => (product_id, Selection::Pastry(*size), *quantity),
    };

    let product = find_product(catalog, product_id)?;
    let item = CartItem::from_selection(product, &selection, quantity)?;

    writeln!(
        out,
        "{} x {}: {}",
        item.quantity(),
        item.name(),
        item.total_price()
    )
    .map_err(|_err| CommandError::IO)?;

    for line in item.customizations().describe() {
        writeln!(out, "  {line}").map_err(|_err| CommandError::IO)?;
    }

    if item.pack_eligible() {
        writeln!(out, "  Counts towards the bulk pack discount")
            .map_err(|_err| CommandError::IO)?;
    }

    Ok(())
}

fn write_summary(
    out: &mut impl io::Write,
    fixture: &Fixture,
    cart_name: &str,
    delivery: Option<DeliveryMethod>,
) -> Result<(), CommandError> {
    let cart = fixture.cart(cart_name)?;

    let receipt = match delivery {
        Some(delivery) => Receipt::from_checkout(&cart, delivery)?,
        None => Receipt::from_cart(&cart)?,
    };

    receipt.write_to(out, &cart)?;

    Ok(())
}

fn find_product<'c, 'a>(
    catalog: &'c Catalog<'a>,
    product_id: &str,
) -> Result<&'c Product<'a>, CommandError> {
    catalog
        .get(product_id)
        .ok_or_else(|| CommandError::UnknownProduct(product_id.to_string()))
}
