//! `tote checkout`

use tote_core::{Cart, ProductId};
use tote_storefront::error::{self, add_breadcrumb};
use tote_storefront::state::AppState;
use tracing::info;

use super::account::sign_in_if_given;
use crate::{CheckoutArgs, output};

/// One `--item` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Parse `<id>` or `<id>:<quantity>`.
///
/// # Errors
///
/// Returns a message for clap when the ID is not a UUID or the quantity is not
/// a positive integer.
pub fn parse_item(raw: &str) -> Result<ItemSpec, String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, qty)) => {
            let quantity = qty
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid quantity '{qty}': {e}"))?;
            (id, quantity)
        }
        None => (raw, 1),
    };

    if quantity < 1 {
        return Err(format!("quantity must be at least 1, got {quantity}"));
    }

    let product_id = id
        .parse::<ProductId>()
        .map_err(|e| format!("invalid product ID '{id}': {e}"))?;

    Ok(ItemSpec {
        product_id,
        quantity,
    })
}

/// Sign in, fill a cart from `--item` arguments and submit it.
pub async fn run(state: &AppState, args: CheckoutArgs, json: bool) -> error::Result<()> {
    let mut auth = state.auth();
    sign_in_if_given(&mut auth, &args.credentials).await?;

    let catalog = state.catalog();
    let mut cart = Cart::new();
    for item in &args.items {
        let product = catalog.find_product(item.product_id).await?;
        let id = product.id.to_string();
        cart.add_to_cart(product, item.quantity);
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    }
    info!(lines = cart.len(), items = cart.total_items(), total = %cart.total(), "Cart ready");
    output::cart(&cart.snapshot(), json);

    let mut workflow = state.checkout();
    workflow.set_address(args.address);
    workflow.set_city(args.city);
    workflow.set_postal_code(args.postal_code);

    let result = workflow.place_order(auth.user(), &mut cart).await;
    output::checkout(&workflow.view(), json);
    result?;
    Ok(())
}
