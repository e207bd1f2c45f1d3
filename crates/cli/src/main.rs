//! Vitrine CLI - exercise the client SDK against a live backend.
//!
//! # Usage
//!
//! ```bash
//! # Check that the API is reachable
//! vitrine health
//!
//! # Login (remember the email for next time)
//! vitrine login -e maria@example.com -p senha --remember
//!
//! # Manage products
//! vitrine products list
//! vitrine products create -t "Caneca" -p 49.90 -s 10
//! vitrine products delete p1
//!
//! # Drive a storefront cart
//! vitrine cart -s minha-loja add p1
//! vitrine cart -s minha-loja show
//! ```
//!
//! Set `VITRINE_STORAGE_PATH` to persist session and cart state between
//! invocations; without it everything is in-memory and gone at exit.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine client CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API is reachable
    Health,
    /// Login and persist the session
    Login {
        /// Login email
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Remember the email for next time
        #[arg(long)]
        remember: bool,
    },
    /// End the session (remote logout is best-effort)
    Logout,
    /// Manage the merchant's products
    Products {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },
    /// Drive a storefront cart
    Cart {
        /// Storefront subdomain scoping the cart
        #[arg(short, long, default_value = "")]
        subdomain: String,

        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Health => commands::health::run().await,
        Commands::Login {
            email,
            password,
            remember,
        } => commands::auth::login(&email, &password, remember).await,
        Commands::Logout => commands::auth::logout().await,
        Commands::Products { action } => commands::products::run(action).await,
        Commands::Cart { subdomain, action } => commands::cart::run(&subdomain, action).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
