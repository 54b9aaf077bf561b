//! ShopEase CLI - terminal front end for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopease products
//! shopease products --featured
//! shopease product 64f0c2a1 --add-to-cart --email ada@example.com
//!
//! # Wishlist (signs in first)
//! SHOPEASE_PASSWORD=... shopease --email ada@example.com wishlist
//! shopease --email ada@example.com wishlist toggle 64f0c2a1
//!
//! # Account
//! shopease --email ada@example.com login
//! shopease --email ada@example.com register --name "Ada" --phone "+1 555 010 9999"
//! shopease session
//!
//! # Static pages
//! shopease page about
//! ```
//!
//! # Commands
//!
//! - `products` - List products (or the featured three)
//! - `product` - Show one product, optionally add it to the cart
//! - `wishlist` - Show the wishlist, or toggle a product
//! - `cart` - Show the cart badge and line items
//! - `session` - Probe the session
//! - `login` / `register` / `logout` - Account actions
//! - `page` - Print the home, about or footer copy

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopease_client::{ClientConfig, Storefront};

mod commands;

use commands::terminal::Terminal;

#[derive(Parser)]
#[command(name = "shopease")]
#[command(author, version, about = "ShopEase storefront in the terminal")]
struct Cli {
    /// Sign in with this email before running the command
    #[arg(long, global = true, env = "SHOPEASE_EMAIL")]
    email: Option<String>,

    /// Password for `--email`
    #[arg(long, global = true, env = "SHOPEASE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only the first three (home page collection)
        #[arg(long)]
        featured: bool,
    },
    /// Show one product
    Product {
        /// Product id
        id: String,

        /// Add the product to the cart after showing it
        #[arg(long)]
        add_to_cart: bool,
    },
    /// Show the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
    /// Show the cart
    Cart,
    /// Probe the session
    Session,
    /// Sign in with `--email` and `--password`
    Login,
    /// Create an account with `--email` and `--password`
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Phone number
        #[arg(short, long)]
        phone: String,
    },
    /// End the session
    Logout,
    /// Print a static page
    Page {
        #[arg(value_enum)]
        page: Page,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Add or remove a product
    Toggle {
        /// Product id
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Page {
    Home,
    About,
    Footer,
}

/// Credentials from the global flags.
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Cli {
    fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            email: self.email.clone()?,
            password: SecretString::from(self.password.clone().unwrap_or_default()),
        })
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
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
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopease_client=info,shopease_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let terminal = Arc::new(Terminal);
    let storefront = Storefront::new(config, terminal.clone(), terminal)?;
    let credentials = cli.credentials();

    let signs_in_itself = matches!(cli.command, Commands::Login | Commands::Register { .. });
    if !signs_in_itself && let Some(credentials) = &credentials {
        commands::account::login(&storefront, credentials).await?;
    }

    // Mount after signing in so the probe and cart sync see the new cookie.
    storefront.on_mount().await;

    match cli.command {
        Commands::Products { featured } => {
            commands::catalog::products(&storefront, featured).await?;
        }
        Commands::Product { id, add_to_cart } => {
            commands::catalog::product(&storefront, &id, add_to_cart).await?;
        }
        Commands::Wishlist { action } => match action {
            None => commands::account::wishlist(&storefront).await,
            Some(WishlistAction::Toggle { id }) => {
                commands::account::toggle_wishlist(&storefront, &id).await?;
            }
        },
        Commands::Cart => commands::account::cart(&storefront).await,
        Commands::Session => commands::account::session(&storefront).await,
        Commands::Login => {
            let credentials = credentials.ok_or(commands::CommandError::MissingCredentials)?;
            commands::account::login(&storefront, &credentials).await?;
        }
        Commands::Register { name, phone } => {
            let credentials = credentials.ok_or(commands::CommandError::MissingCredentials)?;
            commands::account::register(&storefront, &name, &credentials, &phone).await?;
        }
        Commands::Logout => commands::account::logout(&storefront).await?,
        Commands::Page { page } => match page {
            Page::Home => commands::pages::home(&storefront).await,
            Page::About => commands::pages::about(),
            Page::Footer => commands::pages::footer(),
        },
    }

    storefront.shutdown();
    Ok(())
}
