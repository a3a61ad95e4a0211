//! Receipt

use std::{fmt::Write, io};

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem},
    checkout::{Checkout, CheckoutError, DeliveryMethod},
    discounts::pack_discount_points,
    summary::{OrderSummary, SummaryError},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error summarising the cart.
    #[error(transparent)]
    Summary(#[from] SummaryError),

    /// Error totalling the checkout.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Printable summary of a cart, with delivery when the shopper has picked one.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    summary: OrderSummary<'a>,
    checkout: Option<Checkout<'a>>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt for a cart without delivery.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart cannot be summarised.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, ReceiptError> {
        Ok(Receipt {
            summary: cart.summary()?,
            checkout: None,
        })
    }

    /// Build a receipt for a cart being checked out with `delivery`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart is empty or cannot be totalled.
    pub fn from_checkout(cart: &Cart<'a>, delivery: DeliveryMethod) -> Result<Self, ReceiptError> {
        let checkout = Checkout::new(cart, delivery)?;

        Ok(Receipt {
            summary: *checkout.summary(),
            checkout: Some(checkout),
        })
    }

    /// Order summary the receipt was built from.
    #[must_use]
    pub fn summary(&self) -> &OrderSummary<'a> {
        &self.summary
    }

    /// Checkout details, when a delivery method was chosen.
    #[must_use]
    pub fn checkout(&self) -> Option<&Checkout<'a>> {
        self.checkout.as_ref()
    }

    /// Amount payable, including delivery when there is any.
    #[must_use]
    pub fn amount_due(&self) -> Money<'a, Currency> {
        self.checkout
            .map_or(self.summary.total(), |checkout| checkout.grand_total())
    }

    /// Amount saved by the bulk discount.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.summary.subtotal().sub(self.summary.total())
    }

    /// Writes the receipt table and summary for `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, cart: &Cart<'_>) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Options", "Qty", "Line Total", "Pack"]);

        let mut item_boundary_rows: SmallVec<[usize; 16]> = smallvec![];
        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

        for (item_idx, item) in cart.iter().enumerate() {
            let row = item_idx + 1; // header is row 0

            item_boundary_rows.push(row);
            push_item_row(&mut builder, item_idx, item);

            color_ops.push((row, 2, color_dark_grey()));

            if item.pack_eligible() {
                color_ops.push((row, 5, Color::FG_GREEN));
            }
        }

        write_receipt_table(&mut out, builder, &item_boundary_rows, color_ops)?;

        write_receipt_summary(&mut out, self)?;

        Ok(())
    }
}

fn push_item_row(builder: &mut Builder, item_idx: usize, item: &CartItem<'_>) {
    let options = item.customizations().describe().join("\n");

    builder.push_record([
        format!("#{:<3}", item_idx + 1),
        item.name().to_string(),
        options,
        item.quantity().to_string(),
        format!("{}", item.total_price()),
        if item.pack_eligible() {
            "yes".to_string()
        } else {
            String::new()
        },
    ]);
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    item_boundary_rows: &[usize],
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in item_boundary_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..5), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let summary = receipt.summary();

    let mut rows: SmallVec<[(String, String); 5]> = smallvec![(
        " Subtotal:".to_string(),
        format!("{}  ", summary.subtotal())
    )];

    if summary.has_discount() {
        rows.push((
            format!(" Discount ({}%):", summary.discount_points().normalize()),
            format!("-{}  ", summary.discount()),
        ));
    }

    rows.push((
        " \x1b[1mTotal:\x1b[0m".to_string(),
        format!("\x1b[1m{}  \x1b[0m", summary.total()),
    ));

    if let Some(checkout) = receipt.checkout() {
        rows.push((
            format!(" Delivery ({}):", checkout.delivery()),
            format!("{}  ", checkout.delivery_charge()),
        ));

        rows.push((
            " \x1b[1mAmount Due:\x1b[0m".to_string(),
            format!("\x1b[1m{}  \x1b[0m", checkout.grand_total()),
        ));
    }

    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)?;

    if summary.has_discount() {
        writeln!(
            out,
            " \x1b[32mYou're saving {} with our bulk discount!\x1b[0m",
            receipt.savings()?
        )
        .map_err(|_err| ReceiptError::IO)?;
    }

    if let Some(packs) = summary
        .packs_to_next_discount()
        .filter(|_| summary.eligible_packs() > 0)
    {
        let next_points = pack_discount_points(summary.eligible_packs().saturating_add(packs));

        writeln!(
            out,
            " Add {packs} more {} to get {}% off.",
            if packs == 1 { "pack" } else { "packs" },
            next_points.normalize()
        )
        .map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        cart::{CakeSize, Customizations},
        products::{CakeShape, PastrySize},
    };

    use super::*;

    fn gbp<'a>(minor: i64) -> Money<'a, Currency> {
        Money::from_minor(minor, GBP)
    }

    fn cart<'a>(pies: u32) -> Result<Cart<'a>, crate::cart::CartError> {
        let pies = CartItem::new("pastry-1", "Meat Pie", pies, gbp(100), gbp(150 * i64::from(pies)))?
            .with_customizations(Customizations {
                pack_size: Some(PastrySize::Midi),
                ..Customizations::default()
            })
            .with_pack_eligible(true);

        let cake = CartItem::new("cake-5", "Square Corporate Cake", 1, gbp(2_000), gbp(3_000))?
            .with_customizations(Customizations {
                shape: Some(CakeShape::Square),
                size: Some(CakeSize::Inches(8)),
                layers: Some(1),
                flavor: Some("Chocolate".to_string()),
                ..Customizations::default()
            });

        Cart::with_items([pies, cake], GBP)
    }

    fn render(receipt: &Receipt<'_>, cart: &Cart<'_>) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();

        receipt.write_to(&mut out, cart)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn savings_is_subtotal_minus_total() -> TestResult {
        let cart = cart(20)?;

        let receipt = Receipt::from_cart(&cart)?;

        // 10% of £60.00
        assert_eq!(receipt.savings()?, gbp(600));
        assert_eq!(receipt.amount_due(), gbp(5_400));

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_discount() -> TestResult {
        let cart = cart(40)?;
        let receipt = Receipt::from_cart(&cart)?;

        let output = render(&receipt, &cart)?;

        assert!(output.contains("Meat Pie"));
        assert!(output.contains("Square Corporate Cake"));
        assert!(output.contains("Size: midi"));
        assert!(output.contains("Flavor: Chocolate"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Discount (12.5%):"));
        assert!(output.contains("Total:"));
        assert!(output.contains("with our bulk discount!"));
        assert!(output.contains("Add 20 more packs to get 15% off."));

        Ok(())
    }

    #[test]
    fn write_to_omits_discount_below_threshold() -> TestResult {
        let cart = cart(19)?;
        let receipt = Receipt::from_cart(&cart)?;

        let output = render(&receipt, &cart)?;

        assert!(!output.contains("Discount ("));
        assert!(!output.contains("bulk discount"));
        assert!(output.contains("Add 1 more pack to get 10% off."));

        Ok(())
    }

    #[test]
    fn write_to_includes_delivery_when_checking_out() -> TestResult {
        let cart = cart(4)?;
        let receipt = Receipt::from_checkout(&cart, DeliveryMethod::Express)?;

        let output = render(&receipt, &cart)?;

        assert!(output.contains("Delivery (Express):"));
        assert!(output.contains("Amount Due:"));
        assert_eq!(receipt.amount_due(), gbp(3_600 + 599));

        Ok(())
    }

    #[test]
    fn empty_cart_receipt_is_all_zero() -> TestResult {
        let cart = Cart::new(GBP);
        let receipt = Receipt::from_cart(&cart)?;

        let output = render(&receipt, &cart)?;

        assert!(output.contains("Subtotal:"));
        assert_eq!(receipt.amount_due(), gbp(0));
        assert!(!output.contains("Add "));

        Ok(())
    }

    #[test]
    fn visible_width_ignores_ansi_codes() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
    }

    #[test]
    fn colorize_borders_wraps_box_runs() {
        assert_eq!(colorize_borders("a──b"), "a\x1b[90m──\x1b[0mb");
    }
}
