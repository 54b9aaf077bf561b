//! `products` and `product` commands.

use shopease_client::Storefront;
use shopease_client::catalog::{
    ProductDetailView, ProductListView, ViewState, featured_products, stock_label,
};
use shopease_core::{Product, ProductId};

use super::CommandError;

fn print_product_line(product: &Product, wishlist_label: Option<&str>) {
    let mut line = format!("{}  {}  {}", product.id, product.name, product.price);
    if let Some(label) = wishlist_label {
        line.push_str(&format!("  [{label}]"));
    }
    if let Some(stock) = stock_label(product) {
        line.push_str(&format!("  ({stock})"));
    }
    println!("{line}");
}

/// List the catalog, or just the featured collection.
///
/// # Errors
///
/// Returns an error if the product list could not be fetched.
pub async fn products(storefront: &Storefront, featured: bool) -> Result<(), CommandError> {
    if featured {
        for product in featured_products(storefront).await {
            print_product_line(&product, None);
        }
        return Ok(());
    }

    let mut view = ProductListView::new(storefront);
    view.load().await;

    if let Some(message) = view.empty_message() {
        println!("{message}");
        return Ok(());
    }
    match view.state() {
        ViewState::Ready(products) => {
            for product in products {
                print_product_line(product, Some(view.wishlist().label(product.id.as_str())));
            }
            Ok(())
        }
        ViewState::Failed(message) => Err(CommandError::Rejected(message.clone())),
        ViewState::Loading => Ok(()),
    }
}

/// Show one product and optionally add it to the cart.
///
/// # Errors
///
/// Returns an error if the product could not be fetched or added.
pub async fn product(
    storefront: &Storefront,
    id: &str,
    add_to_cart: bool,
) -> Result<(), CommandError> {
    let mut view = ProductDetailView::new(storefront, ProductId::from(id));
    view.load().await;

    match view.state() {
        ViewState::Ready(product) => {
            println!("{}", product.name);
            if !product.brand.is_empty() {
                println!("Brand: {}", product.brand);
            }
            if !product.category.is_empty() {
                println!("Category: {}", product.category);
            }
            println!("Price: {}", product.price);
            println!(
                "In Stock: {}",
                if product.in_stock { "Yes" } else { "No" }
            );
            if !product.description.is_empty() {
                println!();
                println!("{}", product.description);
            }
        }
        ViewState::Failed(message) => return Err(CommandError::Rejected(message.clone())),
        ViewState::Loading => return Ok(()),
    }

    if add_to_cart {
        view.add_to_cart().await?;
        if let Some(count) = storefront.cart().badge().await {
            println!("Cart: {count} item(s)");
        }
    }
    Ok(())
}
