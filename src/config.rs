//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    cart::CakeSize, catalog::ALL_CATEGORIES, checkout::DeliveryMethod, products::PastrySize,
};

/// Crust configuration
#[derive(Debug, Parser)]
#[command(name = "crust", about = "Bakery pricing and order summaries", long_about = None)]
pub struct CrustConfig {
    /// Directory holding `catalogs/` and `carts/`
    #[arg(short, long, env = "CRUST_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Catalog to load from `catalogs/`
    #[arg(short, long, env = "CRUST_CATALOG", default_value = "bakery")]
    pub catalog: String,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

impl CrustConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products in the catalog
    Catalog {
        /// Only list this category
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,

        /// Only list featured products
        #[arg(long)]
        featured: bool,
    },

    /// Price a configured product
    Quote {
        /// Product family and options
        #[command(subcommand)]
        item: QuoteCommand,
    },

    /// Print the receipt for a saved cart
    Summary {
        /// Cart to load from `carts/`
        cart: String,

        /// Delivery method to check out with
        #[arg(long, value_enum)]
        delivery: Option<DeliveryMethod>,
    },
}

/// Quote subcommands
#[derive(Debug, Subcommand)]
pub enum QuoteCommand {
    /// Price a cake
    Cake {
        /// Catalog id of the cake
        product_id: String,

        /// Size in inches, or a free-text description
        #[arg(short, long, default_value = "6")]
        size: CakeSize,

        /// Number of layers
        #[arg(short, long, default_value_t = 1)]
        layers: u32,

        /// Flavour; the cake's first flavour when omitted
        #[arg(long)]
        flavor: Option<String>,

        /// Number of cakes
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Price pastries
    Pastry {
        /// Catalog id of the pastry
        product_id: String,

        /// Size (small, midi, large)
        #[arg(short, long, default_value = "small")]
        size: PastrySize,

        /// Number of packs
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
}
