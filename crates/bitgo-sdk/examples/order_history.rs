//! Example: Paging through order and trade history
//!
//! This example demonstrates:
//! - Lazy cursor pagination, one request per page
//! - Flattening pages into a stream of orders
//! - Collecting every trade of an account
//!
//! Run with: cargo run --example order_history
//!
//! Requires BITGO_ACCESS_TOKEN (and optionally BITGO_ENV=test).

use bitgo_sdk::prelude::*;
use futures::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Order History Example ===\n");

    let client = BitgoClient::from_env()?;
    println!("Environment: {}", client.environment());

    let accounts = client.rest().list_accounts().await?;
    let Some(account) = accounts.first() else {
        println!("No trading accounts");
        return Ok(());
    };
    println!("Account: {} ({})\n", account.name, account.id);

    // Page by page, stopping early after three pages
    println!("--- Orders, 50 per page ---");
    let mut pages = client
        .rest()
        .list_orders(&account.id, &OrderQuery::new().with_limit(50))?;
    while let Some(page) = pages.next_page().await {
        let page = page?;
        println!("Page {}: {} orders", pages.pages_fetched(), page.data.len());
        for order in &page.data {
            println!(
                "  {} {} {} {} @ {} [{}]",
                order.id, order.side, order.product, order.quantity, order.average_price, order.status
            );
        }
        if pages.pages_fetched() == 3 {
            println!("  ... stopping early");
            break;
        }
    }

    // As a stream of individual orders
    println!("\n--- Filled BTC-USD orders ---");
    let mut orders = Box::pin(
        client
            .rest()
            .list_orders(&account.id, &OrderQuery::new())?
            .into_items(),
    );
    while let Some(order) = orders.next().await {
        let order = order?;
        if order.product == "BTC-USD" && order.remaining_quantity().is_zero() {
            println!("  {} {} {}", order.id, order.side, order.filled_quantity);
        }
    }

    // Everything at once
    let trades = client.all_trades(&account.id, &TradeQuery::new()).await?;
    let unsettled = trades.iter().filter(|t| !t.settled).count();
    println!("\n{} trades, {} unsettled", trades.len(), unsettled);

    Ok(())
}
