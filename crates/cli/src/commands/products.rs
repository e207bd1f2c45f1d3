//! Product management commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use vitrine_core::ProductId;
use vitrine_client::models::ProductCreate;

use super::{CliError, build_app};

/// Product subcommands.
#[derive(Subcommand)]
pub enum ProductAction {
    /// List the merchant's products
    List,
    /// Create a product
    Create {
        /// Product title
        #[arg(short, long)]
        title: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Unit price (e.g. 49.90)
        #[arg(short, long)]
        price: Decimal,

        /// Promotional price, if any
        #[arg(long)]
        promotional_price: Option<Decimal>,

        /// Units in stock
        #[arg(short, long)]
        stock: u32,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
}

/// Run a product subcommand.
#[allow(clippy::print_stdout)]
pub async fn run(action: ProductAction) -> Result<(), CliError> {
    let app = build_app()?;
    app.session().restore().await;

    match action {
        ProductAction::List => {
            let products = app.products().list().await?;
            if products.is_empty() {
                println!("No products yet");
                return Ok(());
            }

            for product in products {
                let pricing = product.pricing();
                println!(
                    "{}  {}  {}  stock {}{}",
                    product.id,
                    product.title,
                    pricing.display(),
                    product.stock,
                    if product.active { "" } else { "  (inactive)" },
                );
            }
        }
        ProductAction::Create {
            title,
            description,
            price,
            promotional_price,
            stock,
        } => {
            let created = app
                .products()
                .create(&ProductCreate {
                    title,
                    description,
                    image_url: None,
                    price,
                    promotional_price,
                    stock,
                    category_id: None,
                })
                .await?;
            println!("Created product {}", created.id);
        }
        ProductAction::Delete { id } => {
            let id = ProductId::new(id);
            app.products().delete(&id).await?;
            println!("Deleted product {id}");
        }
    }

    Ok(())
}
