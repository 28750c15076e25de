//! Tote CLI - Browse, buy and manage products from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! tote products list
//!
//! # Add a product (uploading its image first)
//! tote upload-image ./tote.jpg --email me@example.com
//! tote products add --name "Canvas Tote" --price 24.50 \
//!     --image-url https://.../tote.jpg --description "Heavy cotton bag"
//!
//! # Create an account, then verify the credentials
//! TOTE_PASSWORD=... tote account sign-up --email me@example.com
//! TOTE_PASSWORD=... tote account check --email me@example.com
//!
//! # Place an order
//! TOTE_PASSWORD=... tote checkout --email me@example.com \
//!     --item 7d0b5b5e-2f52-4c43-8d8e-2b3c3d9a1e01:2 \
//!     --address "1 Main St" --city Springfield --postal-code 12345
//! ```
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY` - Backend project (required)
//! - `TOTE_EMAIL`, `TOTE_PASSWORD` - Default credentials
//! - `SENTRY_DSN` - Error reporting (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tote_storefront::config::StorefrontConfig;
use tote_storefront::error::{self, AppError};
use tote_storefront::state::AppState;
use tote_storefront::telemetry;

mod commands;
mod output;

use commands::checkout::ItemSpec;

#[derive(Parser)]
#[command(name = "tote")]
#[command(author, version, about = "Tote storefront CLI")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true, env = "TOTE_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and add products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Upload a product image and print its public URL
    UploadImage {
        /// Image file to upload
        path: PathBuf,

        /// MIME type; guessed from the file extension when omitted
        #[arg(long)]
        content_type: Option<String>,

        #[command(flatten)]
        credentials: Credentials,
    },
    /// Manage your account
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Place an order
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products by name
    List,
    /// Add a product to the catalog
    Add {
        #[arg(long)]
        name: String,

        /// Price in the store currency, e.g. `24.50`
        #[arg(long)]
        price: String,

        #[arg(long)]
        image_url: String,

        #[arg(long)]
        description: String,

        #[command(flatten)]
        credentials: Credentials,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account
    SignUp {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Sign in, show the session user, sign out
    Check {
        #[command(flatten)]
        credentials: Credentials,
    },
}

/// Email/password pair. Both must be given to sign in.
#[derive(Args, Clone)]
pub struct Credentials {
    #[arg(long, env = "TOTE_EMAIL")]
    pub email: Option<String>,

    #[arg(long, env = "TOTE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct CheckoutArgs {
    /// Product to buy as `<id>` or `<id>:<quantity>`; repeat for more lines
    #[arg(long = "item", required = true, value_parser = commands::checkout::parse_item)]
    pub items: Vec<ItemSpec>,

    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub postal_code: String,

    #[command(flatten)]
    pub credentials: Credentials,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::error(&AppError::from(e).user_message());
            return ExitCode::FAILURE;
        }
    };

    // Sentry first so the tracing layer has a client to report to
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(cli.log_json);

    let result = match AppState::new(config) {
        Ok(state) => run(&state, cli.command, cli.json).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.report());
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Commands, json: bool) -> error::Result<()> {
    match command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(state, json).await,
            ProductsAction::Add {
                name,
                price,
                image_url,
                description,
                credentials,
            } => {
                let form = tote_core::product_form::ProductForm {
                    name,
                    price,
                    image_url,
                    description,
                };
                commands::products::add(state, &form, &credentials, json).await
            }
        },
        Commands::UploadImage {
            path,
            content_type,
            credentials,
        } => {
            commands::products::upload_image(state, &path, content_type, &credentials, json).await
        }
        Commands::Account { action } => match action {
            AccountAction::SignUp { credentials } => {
                commands::account::sign_up(state, &credentials, json).await
            }
            AccountAction::Check { credentials } => {
                commands::account::check(state, &credentials, json).await
            }
        },
        Commands::Checkout(args) => commands::checkout::run(state, args, json).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_checkout_requires_an_item() {
        let parsed = Cli::try_parse_from([
            "tote",
            "checkout",
            "--address",
            "1 Main St",
            "--city",
            "Springfield",
            "--postal-code",
            "12345",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_checkout_collects_items() {
        let parsed = Cli::try_parse_from([
            "tote",
            "checkout",
            "--item",
            "7d0b5b5e-2f52-4c43-8d8e-2b3c3d9a1e01:2",
            "--item",
            "0b4f3c2a-9a64-4b70-8d8a-5f2f0b7b9c11",
            "--address",
            "1 Main St",
            "--city",
            "Springfield",
            "--postal-code",
            "12345",
        ]);
        let Ok(Cli {
            command: Commands::Checkout(args),
            ..
        }) = parsed
        else {
            panic!("checkout did not parse");
        };
        assert_eq!(args.items.len(), 2);
        assert_eq!(args.items.first().map(|i| i.quantity), Some(2));
        assert_eq!(args.items.get(1).map(|i| i.quantity), Some(1));
    }
}
