//! Product page commands.

use pasar_core::ProductId;
use pasar_storefront::api::ApiClient;
use pasar_storefront::config::ApiConfig;
use pasar_storefront::product::ProductPage;

type BoxError = Box<dyn std::error::Error>;

async fn open_page(id: &str) -> Result<ProductPage, BoxError> {
    let client = ApiClient::new(&ApiConfig::from_env()?)?;
    Ok(ProductPage::load(client, &ProductId::new(id)).await?)
}

/// Print a product.
#[allow(clippy::print_stdout)]
pub async fn show(id: &str) -> Result<(), BoxError> {
    let page = open_page(id).await?;
    let product = page.product();

    println!("{}", product.name);
    println!("Price: {}", product.price);
    println!("Stock: {}", product.stock);
    if let Some(image) = page.display_image() {
        println!("Image: {image}");
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}

/// Add a product to the cart, optionally continuing to checkout.
#[allow(clippy::print_stdout)]
pub async fn add(id: &str, quantity: u32, buy_now: bool) -> Result<(), BoxError> {
    let mut page = open_page(id).await?;
    page.set_quantity(quantity);
    if page.quantity() != quantity {
        tracing::warn!(
            requested = quantity,
            quantity = page.quantity(),
            "Quantity adjusted to available stock"
        );
    }

    if buy_now {
        let destination = page.buy_now().await?;
        println!(
            "Added {} x {}. Continue at {destination}",
            page.quantity(),
            page.product().name
        );
    } else {
        let notice = page.add_to_cart().await?;
        println!("{notice}");
    }
    Ok(())
}
