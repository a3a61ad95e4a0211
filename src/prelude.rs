//! Crust prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CakeSize, Cart, CartError, CartItem, Customizations,
        selection::{CakeSelection, Selection, SelectionError, quote},
    },
    catalog::{ALL_CATEGORIES, Catalog, CatalogError},
    checkout::{Checkout, CheckoutError, DeliveryMethod, checkout_total},
    discounts::{DiscountError, pack_discount, pack_discount_points, packs_to_next_discount},
    pricing::{PricingError, cake_price, pastry_price},
    products::{
        CakeProduct, CakeShape, PastryProduct, PastrySize, PastrySizes, Product, ProductKey,
        ProductKind, SizeOption,
    },
    receipt::{Receipt, ReceiptError},
    summary::{OrderSummary, SummaryError},
};
