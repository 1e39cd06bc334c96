//! eMarket CLI - Browse the catalog and manage the local cart and favorites.
//!
//! # Usage
//!
//! ```bash
//! # First page of the catalog
//! emarket catalog
//!
//! # Search and filter, three pages deep
//! emarket catalog --search shoe --max-price 50 --pages 3
//!
//! # Product detail
//! emarket product 12
//!
//! # Cart
//! emarket cart add 12
//! emarket cart increase 12
//! emarket cart show
//!
//! # Favorites
//! emarket favorites toggle 12
//! emarket favorites list
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products with search, price filter and pagination
//! - `product` - Show one product
//! - `cart` - Show, count, total and mutate the persisted cart
//! - `favorites` - List and mutate the persisted favorites

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use emarket_core::{ProductId, QuantityChange};
use emarket_storefront::{Storefront, StorefrontConfig, StorefrontError};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "emarket")]
#[command(author, version, about = "eMarket storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Catalog {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum price (inclusive)
        #[arg(short, long)]
        max_price: Option<String>,

        /// Number of pages to show
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Show one product
    Product {
        /// Product ID
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and the total
    Show,
    /// Print the total quantity
    Count,
    /// Print the total price
    Total,
    /// Add one unit of a catalog product
    Add {
        /// Product ID
        id: String,
    },
    /// Increase a line quantity by one
    Increase {
        /// Product ID
        id: String,
    },
    /// Decrease a line quantity by one, removing it at zero
    Decrease {
        /// Product ID
        id: String,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    List,
    /// Add a catalog product to favorites
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a product from favorites
    Remove {
        /// Product ID
        id: String,
    },
    /// Flip the favorite state of a catalog product
    Toggle {
        /// Product ID
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            StorefrontError::from(e).report();
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "emarket=info,emarket_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let storefront = Storefront::new(config);
    storefront.start().await;

    if let Err(e) = run(cli, &storefront).await {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, storefront: &Storefront) -> emarket_storefront::Result<()> {
    match cli.command {
        Commands::Catalog {
            search,
            max_price,
            pages,
        } => {
            commands::catalog::list(storefront, search.as_deref(), max_price.as_deref(), pages)
                .await?;
        }
        Commands::Product { id } => {
            commands::catalog::show(storefront, &ProductId::new(id)).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(storefront).await,
            CartAction::Count => commands::cart::count(storefront),
            CartAction::Total => commands::cart::total(storefront).await,
            CartAction::Add { id } => commands::cart::add(storefront, &ProductId::new(id)).await?,
            CartAction::Increase { id } => {
                commands::cart::change(storefront, &ProductId::new(id), QuantityChange::Increase)
                    .await;
            }
            CartAction::Decrease { id } => {
                commands::cart::change(storefront, &ProductId::new(id), QuantityChange::Decrease)
                    .await;
            }
            CartAction::Remove { id } => {
                commands::cart::remove(storefront, &ProductId::new(id)).await;
            }
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(storefront).await,
            FavoritesAction::Add { id } => {
                commands::favorites::add(storefront, &ProductId::new(id)).await?;
            }
            FavoritesAction::Remove { id } => {
                commands::favorites::remove(storefront, &ProductId::new(id)).await;
            }
            FavoritesAction::Toggle { id } => {
                commands::favorites::toggle(storefront, &ProductId::new(id)).await?;
            }
        },
    }
    Ok(())
}
