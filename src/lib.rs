//! Crust
//!
//! Crust is the pricing and order-summary engine behind a bakery storefront. It
//! prices configured cakes and packs of pastries, keeps cart lines as immutable
//! snapshots and summarises a cart into a subtotal, a tiered bulk pack discount
//! and a total.
//!
//! Money is held in exact minor units. The pack discount is the only step that
//! can produce a fraction of a penny, and it is rounded once, half away from
//! zero, before being taken off the subtotal.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod commands;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod summary;
