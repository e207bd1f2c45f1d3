//! Cart commands: drive a storefront cart from the terminal.

use clap::Subcommand;

use vitrine_core::ProductId;
use vitrine_client::cart::AddOutcome;

use super::{CliError, build_app};

/// Cart subcommands.
#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add a product to the cart by ID (fetched from the API)
    Add {
        /// Product ID
        id: String,
    },
    /// Remove an item from the cart
    Remove {
        /// Product ID
        id: String,
    },
    /// Set an item's quantity (0 removes; above stock clamps)
    SetQty {
        /// Product ID
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

/// Run a cart subcommand against the given storefront scope.
#[allow(clippy::print_stdout)]
pub async fn run(subdomain: &str, action: CartAction) -> Result<(), CliError> {
    let app = build_app()?;

    let cart = app.cart(subdomain);
    cart.restore().await;

    match action {
        CartAction::Show => {
            let snapshot = cart.snapshot().await;
            if snapshot.items.is_empty() {
                println!("Cart is empty");
                return Ok(());
            }

            for item in &snapshot.items {
                println!(
                    "{}  {}  x{}  R$ {:.2}",
                    item.id,
                    item.title,
                    item.quantity,
                    item.effective_price(),
                );
            }
            println!(
                "-- {} item(s), total R$ {:.2}",
                snapshot.item_count, snapshot.total
            );
        }
        CartAction::Add { id } => {
            let product = app.products().get(&ProductId::new(id)).await?;
            match cart.add((&product).into()).await {
                AddOutcome::Added { quantity } => {
                    println!("Added {} (quantity {quantity})", product.title);
                }
                AddOutcome::StockExceeded => {
                    println!("Only {} in stock for {}", product.stock, product.title);
                }
            }
        }
        CartAction::Remove { id } => {
            cart.remove(&ProductId::new(id)).await;
            println!("Removed");
        }
        CartAction::SetQty { id, quantity } => {
            cart.update_quantity(&ProductId::new(id), quantity).await;
            println!("Quantity updated");
        }
        CartAction::Clear => {
            cart.clear().await;
            println!("Cart cleared");
        }
    }

    Ok(())
}
