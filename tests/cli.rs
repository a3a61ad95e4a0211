//! Integration tests for the `crust` commands against the bakery fixtures.

use clap::Parser;
use testresult::TestResult;

use crust::{
    commands::{self, CommandError},
    config::CrustConfig,
};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

fn run(args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let config = CrustConfig::try_parse_from(
        ["crust", "--fixtures", FIXTURES, "--catalog", "bakery"]
            .iter()
            .chain(args),
    )?;

    let mut out = Vec::new();

    commands::run(&config, &mut out)?;

    Ok(String::from_utf8(out)?)
}

#[test]
fn catalog_lists_products_in_category() -> TestResult {
    let output = run(&["catalog", "--category", "meat-pies"])?;

    assert!(output.contains("Meat Pie"));
    assert!(!output.contains("Sausage Roll"));
    assert!(!output.contains("Wedding Cake"));

    Ok(())
}

#[test]
fn catalog_lists_featured_products() -> TestResult {
    let output = run(&["catalog", "--featured"])?;

    assert!(output.contains("Wedding Cake"));
    assert!(!output.contains("Chocolate Fudge Cake"));

    Ok(())
}

#[test]
fn quote_prices_a_cake() -> TestResult {
    let output = run(&["quote", "cake", "cake-4", "--size", "8", "--layers", "2"])?;

    assert!(output.contains("Heart-Shaped Red Velvet Cake"));
    assert!(output.contains("60.00"));
    assert!(output.contains("Flavor: Red Velvet"));

    Ok(())
}

#[test]
fn quote_prices_pastry_packs() -> TestResult {
    let output = run(&["quote", "pastry", "pastry-1", "--size", "midi", "--quantity", "4"])?;

    assert!(output.contains("4 x Meat Pie"));
    assert!(output.contains("6.00"));
    assert!(output.contains("bulk pack discount"));

    Ok(())
}

#[test]
fn quote_for_unknown_product_errors() -> TestResult {
    let config = CrustConfig::try_parse_from([
        "crust",
        "--fixtures",
        FIXTURES,
        "quote",
        "pastry",
        "pastry-9",
    ])?;

    let result = commands::run(&config, Vec::new());

    assert!(matches!(result, Err(CommandError::UnknownProduct(id)) if id == "pastry-9"));

    Ok(())
}

#[test]
fn summary_prints_receipt_with_delivery() -> TestResult {
    let output = run(&["summary", "bulk-pastries", "--delivery", "express"])?;

    assert!(output.contains("Meat Pie"));
    assert!(output.contains("Discount (15%):"));
    assert!(output.contains("Delivery (Express):"));
    assert!(output.contains("73.99"));

    Ok(())
}

#[test]
fn summary_of_missing_cart_errors() -> TestResult {
    let config =
        CrustConfig::try_parse_from(["crust", "--fixtures", FIXTURES, "summary", "no-such-cart"])?;

    assert!(matches!(
        commands::run(&config, Vec::new()),
        Err(CommandError::Fixture(_))
    ));

    Ok(())
}
